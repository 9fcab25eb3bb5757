//! Plain-text edge-list loading and score-table writing
//!
//! # Format
//!
//! ```text
//! # optional comments ('#' or '%')
//! 4 3          <- optional header: numNodes numEdges
//! 0 1 2.5      <- source target [weight]
//! 1 2          <- weight defaults to 1.0
//! 2 3 1
//! ```
//!
//! Malformed lines (bad fields, invalid UTF-8, ids beyond
//! [`EdgeListOptions::max_vertices`]) are skipped with a warning and recorded
//! in the [`EdgeListReport`]; they never fail the whole load. Score tables
//! are written as `vertexId score` lines.

use super::{GraphStore, NodeId};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

/// How the first content line is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HeaderMode {
    /// Header if the line holds two non-negative integers and more content
    /// lines follow; a lone `a b` line is an edge
    #[default]
    Auto,
    /// First content line is always a header
    Present,
    /// Every content line is an edge
    Absent,
}

/// Options for edge-list loading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeListOptions {
    /// Build a directed graph
    pub directed: bool,
    /// Header handling
    pub header: HeaderMode,
    /// Largest vertex-id space a file may request. Header counts above it
    /// and edge endpoints at or above it skip their line.
    pub max_vertices: usize,
}

impl Default for EdgeListOptions {
    fn default() -> Self {
        Self {
            directed: true,
            header: HeaderMode::Auto,
            max_vertices: DEFAULT_MAX_VERTICES,
        }
    }
}

/// Default for [`EdgeListOptions::max_vertices`] (2^24 ids)
pub const DEFAULT_MAX_VERTICES: usize = 1 << 24;

/// A line the loader skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    /// Why the line was rejected
    pub reason: String,
}

/// Summary of an edge-list load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeListReport {
    /// Vertex count declared by the header
    pub declared_nodes: Option<usize>,
    /// Edge count declared by the header
    pub declared_edges: Option<usize>,
    /// Edge lines accepted
    pub edges_loaded: usize,
    /// Rejected lines, in file order
    pub skipped: Vec<SkippedLine>,
}

/// Graph plus the report produced while loading it
#[derive(Debug, Clone)]
pub struct EdgeListLoad {
    /// Loaded graph
    pub graph: GraphStore,
    /// Load diagnostics
    pub report: EdgeListReport,
}

struct ParsedEdge {
    src: NodeId,
    dst: NodeId,
    weight: f64,
}

/// Read an edge list from any buffered reader
///
/// # Errors
///
/// Returns error only if reading from `reader` fails; malformed content is
/// reported in [`EdgeListReport::skipped`].
///
/// # Example
///
/// ```
/// use trueno_graph_analytics::{read_edge_list, EdgeListOptions, NodeId};
///
/// let text = "3 2\n0 1\n1 2 4.0\n";
/// let load = read_edge_list(text.as_bytes(), &EdgeListOptions::default()).unwrap();
///
/// assert_eq!(load.report.declared_nodes, Some(3));
/// assert_eq!(load.graph.edge_weight(NodeId(1), NodeId(2)).unwrap(), 4.0);
/// ```
pub fn read_edge_list<R: BufRead>(reader: R, options: &EdgeListOptions) -> Result<EdgeListLoad> {
    let mut graph = GraphStore::new(options.directed);
    let mut report = EdgeListReport::default();
    let limit = vertex_limit(options);

    let mut content: Vec<(usize, String)> = Vec::new();
    for (idx, bytes) in reader.split(b'\n').enumerate() {
        let line_no = idx + 1;
        let bytes = bytes.with_context(|| format!("Failed to read edge list line {line_no}"))?;
        let Ok(line) = std::str::from_utf8(&bytes) else {
            skip(&mut report, line_no, "line is not valid UTF-8");
            continue;
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('%') {
            continue;
        }
        content.push((line_no, trimmed.to_string()));
    }

    let mut body = content.as_slice();

    if let Some(((line_no, first), rest)) = content.split_first() {
        let header = parse_header(first);
        let is_header = match options.header {
            HeaderMode::Absent => false,
            HeaderMode::Present => true,
            HeaderMode::Auto => header.is_some() && !rest.is_empty(),
        };

        if is_header {
            body = rest;
            match header {
                Some((nodes, _)) if u64::try_from(nodes).unwrap_or(u64::MAX) > limit => {
                    let reason = format!("header declares {nodes} vertices, limit is {limit}");
                    skip(&mut report, *line_no, &reason);
                }
                Some((nodes, edges)) => {
                    report.declared_nodes = Some(nodes);
                    report.declared_edges = Some(edges);
                    (0..nodes)
                        .map_while(|id| u32::try_from(id).ok())
                        .for_each(|id| graph.add_vertex(NodeId(id)));
                }
                None => {
                    skip(&mut report, *line_no, "malformed header, expected `numNodes numEdges`");
                }
            }
        }
    }

    for (line_no, line) in body {
        match parse_edge(line, limit) {
            Ok(edge) => match graph.add_edge(edge.src, edge.dst, edge.weight) {
                Ok(()) => report.edges_loaded += 1,
                Err(err) => skip(&mut report, *line_no, &err.to_string()),
            },
            Err(reason) => skip(&mut report, *line_no, &reason),
        }
    }

    // UTF-8 failures were recorded during the read
    report.skipped.sort_by_key(|skipped| skipped.line);

    if let Some(declared) = report.declared_edges {
        if declared != report.edges_loaded {
            warn!(
                declared,
                loaded = report.edges_loaded,
                "edge count differs from header"
            );
        }
    }

    info!(
        vertices = graph.vertex_count(),
        edges = graph.num_edges(),
        skipped = report.skipped.len(),
        "loaded edge list"
    );

    Ok(EdgeListLoad { graph, report })
}

/// Effective id-space size: the configured cap, never beyond `u32` ids
fn vertex_limit(options: &EdgeListOptions) -> u64 {
    let id_space = u64::from(u32::MAX) + 1;
    u64::try_from(options.max_vertices).map_or(id_space, |max| max.min(id_space))
}

fn skip(report: &mut EdgeListReport, line: usize, reason: &str) {
    warn!(line, reason, "skipping edge-list line");
    report.skipped.push(SkippedLine {
        line,
        reason: reason.to_string(),
    });
}

fn parse_header(line: &str) -> Option<(usize, usize)> {
    let mut fields = line.split_whitespace();
    let nodes = fields.next()?.parse::<usize>().ok()?;
    let edges = fields.next()?.parse::<usize>().ok()?;
    if fields.next().is_some() {
        return None;
    }
    Some((nodes, edges))
}

fn parse_edge(line: &str, limit: u64) -> std::result::Result<ParsedEdge, String> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let (src, dst, weight) = match fields.as_slice() {
        [src, dst] => (*src, *dst, None),
        [src, dst, weight] => (*src, *dst, Some(*weight)),
        _ => {
            return Err(format!(
                "expected `source target [weight]`, found {} fields",
                fields.len()
            ))
        }
    };

    let weight = match weight {
        None => 1.0,
        Some(raw) => {
            let weight: f64 = raw
                .parse()
                .map_err(|_| format!("weight `{raw}` is not a number"))?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("weight {weight} must be finite and non-negative"));
            }
            weight
        }
    };

    Ok(ParsedEdge {
        src: parse_vertex(src, limit)?,
        dst: parse_vertex(dst, limit)?,
        weight,
    })
}

fn parse_vertex(raw: &str, limit: u64) -> std::result::Result<NodeId, String> {
    let id: i64 = raw
        .parse()
        .map_err(|_| format!("vertex id `{raw}` is not an integer"))?;
    if id < 0 {
        return Err(format!("vertex id {id} is negative"));
    }
    match u32::try_from(id) {
        Ok(id) if u64::from(id) < limit => Ok(NodeId(id)),
        _ => Err(format!("vertex id {id} is out of range (limit {limit})")),
    }
}

/// Write one `vertexId score` line per present vertex
///
/// `scores` is indexed by vertex id; vertices beyond its end are skipped.
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub fn write_scores<W: Write>(
    mut out: W,
    graph: &GraphStore,
    scores: &[f64],
    precision: usize,
) -> std::io::Result<()> {
    for node in graph.vertex_iter() {
        if let Some(score) = scores.get(node.index()) {
            writeln!(out, "{node} {score:.precision$}")?;
        }
    }
    out.flush()
}

impl GraphStore {
    /// Load a graph from an edge-list file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read
    pub async fn read_edge_list_file<P: AsRef<Path>>(
        path: P,
        options: &EdgeListOptions,
    ) -> Result<EdgeListLoad> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        read_edge_list(bytes.as_slice(), options)
    }

    /// Write a score table (`vertexId score` lines) to a file
    ///
    /// # Errors
    ///
    /// Returns error if file I/O fails
    pub async fn write_scores_file<P: AsRef<Path>>(
        &self,
        path: P,
        scores: &[f64],
        precision: usize,
    ) -> Result<()> {
        let path = path.as_ref();
        let mut buffer = Vec::new();
        write_scores(&mut buffer, self, scores, precision)
            .context("Failed to format score table")?;
        tokio::fs::write(path, buffer)
            .await
            .with_context(|| format!("Failed to create {}", path.display()))
    }
}
