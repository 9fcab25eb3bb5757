//! Integration tests for trueno-graph-analytics
//!
//! Runs every engine over the same small reference graphs and exercises the
//! edge-list file round trip.

use trueno_graph_analytics::{
    bfs, conductance, core_decomposition, dfs, dijkstra, generators, hits, louvain, pagerank,
    EdgeListOptions, GraphError, GraphStore, HeaderMode, HitsConfig, LouvainConfig, NodeId,
    PageRankConfig,
};

fn directed(edges: &[(u32, u32, f64)]) -> GraphStore {
    let edges: Vec<_> = edges
        .iter()
        .map(|&(s, t, w)| (NodeId(s), NodeId(t), w))
        .collect();
    GraphStore::from_edge_list(&edges, true).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected ≈{expected}, got {actual}"
    );
}

#[test]
fn test_directed_cycle_scenario() {
    let graph = directed(&[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);

    let levels = bfs(&graph, NodeId(0)).unwrap();
    assert_eq!(levels.order, vec![NodeId(0), NodeId(1), NodeId(2)]);
    assert_eq!(levels.distances, vec![Some(0), Some(1), Some(2)]);

    let paths = dijkstra(&graph, NodeId(0)).unwrap();
    assert_eq!(paths.distances, vec![0.0, 1.0, 2.0]);

    let scores = hits(&graph, &HitsConfig::default()).unwrap();
    assert_close(scores.max_hub(), 0.5774);
    assert_close(scores.max_authority(), 0.5774);

    assert_eq!(core_decomposition(&graph).unwrap().max_core, 1);
}

#[test]
fn test_directed_star_scenario() {
    let graph = directed(&[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0), (0, 4, 1.0)]);

    let levels = bfs(&graph, NodeId(0)).unwrap();
    assert_eq!(
        levels.distances,
        vec![Some(0), Some(1), Some(1), Some(1), Some(1)]
    );

    let paths = dijkstra(&graph, NodeId(0)).unwrap();
    assert_eq!(paths.distances, vec![0.0, 1.0, 1.0, 1.0, 1.0]);

    let scores = hits(&graph, &HitsConfig::default()).unwrap();
    assert_close(scores.max_hub(), 1.0);
    assert_close(scores.max_authority(), 0.5);

    assert_eq!(core_decomposition(&graph).unwrap().max_core, 0);
}

#[test]
fn test_disconnected_scenario() {
    let graph = directed(&[(0, 1, 1.0), (2, 3, 1.0)]);

    let levels = bfs(&graph, NodeId(0)).unwrap();
    assert_eq!(levels.distances, vec![Some(0), Some(1), None, None]);

    let paths = dijkstra(&graph, NodeId(0)).unwrap();
    assert_eq!(paths.distances[..2], [0.0, 1.0]);
    assert!(paths.distances[2].is_infinite());
    assert!(paths.distances[3].is_infinite());

    let scores = hits(&graph, &HitsConfig::default()).unwrap();
    assert_close(scores.max_hub(), 0.7071);
    assert_close(scores.max_authority(), 0.7071);

    let communities = louvain(&graph, &LouvainConfig::default()).unwrap();
    assert!(communities.num_communities() >= 2);
}

#[test]
fn test_weighted_scenario() {
    let graph = directed(&[(0, 1, 2.0), (1, 2, 3.0), (2, 0, 1.0), (0, 2, 10.0)]);

    let paths = dijkstra(&graph, NodeId(0)).unwrap();
    assert_eq!(paths.distances, vec![0.0, 2.0, 5.0]);
    assert_eq!(
        paths.path_to(NodeId(2)).unwrap(),
        vec![NodeId(0), NodeId(1), NodeId(2)]
    );

    // Synchronous HITS on this graph settles at the golden-ratio eigenvector
    let scores = hits(&graph, &HitsConfig::default()).unwrap();
    assert!(scores.converged);
    assert_close(scores.max_hub(), 0.8507);
    assert_close(scores.max_authority(), 0.8507);
    assert_eq!(scores.top_hubs(1).unwrap()[0].0, NodeId(0));
    assert_eq!(scores.top_authorities(1).unwrap()[0].0, NodeId(2));

    assert_eq!(core_decomposition(&graph).unwrap().max_core, 1);
}

#[test]
fn test_engines_reject_empty_graph() {
    let graph = GraphStore::new(true);

    assert!(matches!(bfs(&graph, NodeId(0)), Err(GraphError::InvalidArgument(_))));
    assert_eq!(
        pagerank(&graph, &PageRankConfig::default()).unwrap_err(),
        GraphError::GraphEmpty
    );
    assert_eq!(
        hits(&graph, &HitsConfig::default()).unwrap_err(),
        GraphError::GraphEmpty
    );
    assert_eq!(core_decomposition(&graph).unwrap_err(), GraphError::GraphEmpty);
    assert_eq!(
        louvain(&graph, &LouvainConfig::default()).unwrap_err(),
        GraphError::GraphEmpty
    );
}

#[test]
fn test_generated_grid_analysis() {
    let graph = generators::grid(4, 4, 1.0, false).unwrap();

    let levels = bfs(&graph, NodeId(0)).unwrap();
    assert_eq!(levels.distance(NodeId(15)), Some(6));

    let walk = dfs(&graph, NodeId(0)).unwrap();
    assert_eq!(walk.order.len(), 16);

    let ranks = pagerank(&graph, &PageRankConfig::default()).unwrap();
    assert!(ranks.converged);
    // Corners have the fewest neighbors
    let corner = ranks.score(NodeId(0));
    assert!(ranks.scores.iter().all(|&score| score >= corner - 1e-12));
    assert!(ranks.score(NodeId(5)) > corner);

    let cores = core_decomposition(&graph).unwrap();
    assert_eq!(cores.max_core, 2);

    let communities = louvain(&graph, &LouvainConfig::default()).unwrap();
    assert!(communities.converged);
    for members in communities.members().values() {
        let phi = conductance(&graph, members).unwrap();
        assert!((0.0..=1.0).contains(&phi));
    }
}

#[tokio::test]
async fn test_edge_list_file_roundtrip() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let input = dir.path().join("web.txt");
    let output = dir.path().join("ranks.txt");

    tokio::fs::write(
        &input,
        "# tiny web graph\n4 4\n0 1\n1 2\n2 0\n3 2 0.5\n",
    )
    .await
    .unwrap();

    let options = EdgeListOptions {
        directed: true,
        header: HeaderMode::Auto,
        ..EdgeListOptions::default()
    };
    let load = GraphStore::read_edge_list_file(&input, &options)
        .await
        .unwrap();
    assert_eq!(load.report.declared_nodes, Some(4));
    assert_eq!(load.report.edges_loaded, 4);
    assert!(load.report.skipped.is_empty());
    assert_eq!(load.graph.edge_weight(NodeId(3), NodeId(2)).unwrap(), 0.5);

    let ranks = pagerank(&load.graph, &PageRankConfig::default()).unwrap();
    load.graph
        .write_scores_file(&output, &ranks.scores, 4)
        .await
        .unwrap();

    let written = tokio::fs::read_to_string(&output).await.unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 4);
    for (line, node) in lines.iter().zip(0..) {
        let (id, score) = line.split_once(' ').unwrap();
        assert_eq!(id.parse::<u32>().unwrap(), node);
        let score: f64 = score.parse().unwrap();
        assert!((score - ranks.scores[node as usize]).abs() < 1e-4);
    }
}

#[tokio::test]
async fn test_edge_list_file_with_binary_line() {
    use tempfile::tempdir;

    let dir = tempdir().unwrap();
    let input = dir.path().join("mixed.txt");
    let mut bytes = b"3 2\n0 1\n".to_vec();
    bytes.extend_from_slice(&[0xc3, 0x28, b' ', b'1', b'\n']);
    bytes.extend_from_slice(b"1 2\n");
    tokio::fs::write(&input, bytes).await.unwrap();

    let load = GraphStore::read_edge_list_file(&input, &EdgeListOptions::default())
        .await
        .unwrap();
    assert_eq!(load.report.declared_nodes, Some(3));
    assert_eq!(load.report.edges_loaded, 2);
    assert_eq!(load.report.skipped.len(), 1);
    assert_eq!(load.report.skipped[0].line, 3);
    assert!(load.graph.has_edge(NodeId(1), NodeId(2)));
}

#[tokio::test]
async fn test_missing_file_reports_path() {
    let err = GraphStore::read_edge_list_file("/nonexistent/graph.txt", &EdgeListOptions::default())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("/nonexistent/graph.txt"));
}

#[cfg(feature = "serde")]
#[test]
fn test_results_serialize() {
    let graph = directed(&[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);

    let config: PageRankConfig =
        serde_json::from_str(r#"{"damping_factor":0.9,"max_iterations":50,"tolerance":1e-8}"#)
            .unwrap();
    assert_eq!(config.damping_factor, 0.9);

    let ranks = pagerank(&graph, &config).unwrap();
    let json = serde_json::to_string(&ranks).unwrap();
    let back: trueno_graph_analytics::PageRankResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back.vertices, ranks.vertices);
    assert_eq!(back.iterations, ranks.iterations);

    let cores = core_decomposition(&graph).unwrap();
    let value = serde_json::to_value(&cores).unwrap();
    assert_eq!(value["max_core"], 1);
}
