//! cmsgraph - ingest a content export into a typed node graph.

mod args;
mod error;
mod run;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cmsgraph::RunReport;

use args::Args;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cmsgraph=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let strict = args.strict;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        input = %args.input.display(),
        environment = %args.environment,
        prefix = %args.prefix,
        workers = args.workers,
        "configuration loaded"
    );

    let report = run::execute(args, &mut std::io::stdout()).await?;
    print_summary(&report);
    run::require_complete(&report, strict)?;

    Ok(())
}

fn print_summary(report: &RunReport) {
    eprintln!(
        "types: {}  references: {} ({} unions)  excluded fields: {}",
        report.schema.types_registered,
        report.schema.references_declared,
        report.schema.union_references,
        report.schema.excluded_fields,
    );
    for id in &report.schema.overwritten {
        eprintln!("  duplicate content type overwritten: {id}");
    }
    for type_name in &report.schema.name_collisions {
        eprintln!("  content types merged into one type: {type_name}");
    }

    eprintln!("nodes: {}", report.nodes.registered);
    for (type_name, count) in &report.nodes.per_type {
        eprintln!("  {type_name}: {count}");
    }

    if !report.nodes.skipped.is_empty() {
        eprintln!("skipped: {}", report.nodes.skipped.len());
        for skipped in &report.nodes.skipped {
            eprintln!("  {skipped}");
        }
    }
}
