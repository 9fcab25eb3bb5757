//! Run every analysis engine over an edge-list file
//!
//! Run with: `cargo run --example analyze_edge_list -- graph.txt [--undirected] [--scores ranks.txt]`
//!
//! Without a path a seeded random graph is analyzed instead. Set
//! `RUST_LOG=trueno_graph_analytics=debug` to see convergence events.

use anyhow::Context;
use trueno_graph_analytics::{
    bfs, conductance, core_decomposition, dijkstra, generators, hits, louvain, pagerank,
    EdgeListOptions, GraphStore, HitsConfig, LouvainConfig, PageRankConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut path = None;
    let mut scores_path = None;
    let mut directed = true;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--undirected" => directed = false,
            "--scores" => scores_path = Some(args.next().context("--scores needs a path")?),
            _ => path = Some(arg),
        }
    }

    let graph = match &path {
        Some(path) => {
            let options = EdgeListOptions {
                directed,
                ..EdgeListOptions::default()
            };
            let load = GraphStore::read_edge_list_file(path, &options).await?;
            for skipped in &load.report.skipped {
                println!("skipped line {}: {}", skipped.line, skipped.reason);
            }
            load.graph
        }
        None => generators::random(60, 0.06, 1.0, directed, 2024)?,
    };

    println!("{graph}");
    let Some(source) = graph.vertex_iter().next() else {
        println!("nothing to analyze");
        return Ok(());
    };

    println!("{}", bfs(&graph, source)?);
    match dijkstra(&graph, source) {
        Ok(paths) => println!("{paths}"),
        Err(err) => println!("Dijkstra skipped: {err}"),
    }

    let ranks = pagerank(&graph, &PageRankConfig::default())?;
    print!("{ranks}");

    if graph.is_directed() {
        print!("{}", hits(&graph, &HitsConfig::default())?);
    }

    print!("{}", core_decomposition(&graph)?);

    match louvain(&graph, &LouvainConfig::default()) {
        Ok(communities) => {
            print!("{communities}");
            if let Some((id, members)) = communities.members().into_iter().max_by_key(|(_, m)| m.len()) {
                println!(
                    "  largest community {id}: conductance {:.4}",
                    conductance(&graph, &members)?
                );
            }
        }
        Err(err) => println!("Louvain skipped: {err}"),
    }

    if let Some(scores_path) = scores_path {
        graph.write_scores_file(&scores_path, &ranks.scores, 6).await?;
        println!("PageRank scores written to {scores_path}");
    }

    Ok(())
}
