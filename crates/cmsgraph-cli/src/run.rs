//! Ingestion run driven by command-line arguments.

use std::io::Write;

use tracing::{info, warn};

use cmsgraph::{JsonExportSource, MemoryGraph, Node, Pipeline, RunReport, SledGraph};

use crate::args::Args;
use crate::error::Error;

/// Run the pipeline for `args`.
///
/// With `--print-nodes`, every node is written to `out` as one JSON line.
pub async fn execute(args: Args, out: &mut impl Write) -> Result<RunReport, Error> {
    let sled = args.sled_config();
    let print_nodes = args.print_nodes;
    let input = args.input.clone();
    let config = args.into_config();

    let source = JsonExportSource::open(&input, &config.source).await?;

    let (report, nodes) = match sled {
        Some(sled) => {
            let path = sled.path.clone();
            let graph = SledGraph::open(sled)?;
            if graph.was_recovered() {
                info!(data_path = %path.display(), "reopened existing graph database");
            }

            let pipeline = Pipeline::new(source, graph, config);
            let report = pipeline.run().await?;
            let graph = pipeline.into_store();
            graph.flush()?;
            info!(data_path = %path.display(), nodes = graph.node_count(), "graph persisted");

            let mut nodes: Vec<Node> = Vec::new();
            if print_nodes {
                for type_name in graph.type_names()? {
                    nodes.extend(graph.nodes_of(&type_name)?);
                }
            }
            (report, nodes)
        }
        None => {
            let pipeline = Pipeline::new(source, MemoryGraph::new(), config);
            let report = pipeline.run().await?;
            let graph = pipeline.into_store();

            let dangling = graph.dangling_references();
            if !dangling.is_empty() {
                warn!(count = dangling.len(), "references to nodes never ingested");
            }

            let nodes = if print_nodes {
                graph.nodes()
            } else {
                Vec::new()
            };
            (report, nodes)
        }
    };

    for node in &nodes {
        serde_json::to_writer(&mut *out, node)?;
        writeln!(out)?;
    }
    out.flush()?;

    Ok(report)
}

/// Fail a strict run that left entries out of the graph.
pub fn require_complete(report: &RunReport, strict: bool) -> Result<(), Error> {
    if strict && !report.is_complete() {
        return Err(Error::Incomplete {
            skipped: report.nodes.skipped.len(),
        });
    }
    Ok(())
}
