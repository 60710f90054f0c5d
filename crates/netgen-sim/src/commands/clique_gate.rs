use std::error::Error;
use std::io::{self, Write};

use clap::Args;
use netgen_graph::{make_complete_clique_gate_graph, write_interchange, ForceLayout, Layouter};
use tracing::info;

use super::export::{NetworkExport, OutputFormat};

#[derive(Args, Debug)]
pub struct CliqueGateArgs {
    /// Number of big components (at least 2).
    pub num_big_components: usize,
    /// Number of nodes in every big component.
    pub big_component_size: usize,
    /// Number of nodes in every gate (even, at most twice the component size).
    pub gate_size: usize,
    /// Force layout simulation steps.
    #[arg(long, default_value_t = 500)]
    pub iterations: usize,
    /// Output format written to stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn run(args: &CliqueGateArgs) -> Result<(), Box<dyn Error>> {
    let built = make_complete_clique_gate_graph(
        args.num_big_components,
        args.big_component_size,
        args.gate_size,
    )?;
    info!(
        nodes = built.graph.node_count(),
        edges = built.graph.edge_count(),
        gates = built.num_gates(),
        "clique-gate graph built"
    );
    let layout = ForceLayout {
        iterations: args.iterations,
        ..ForceLayout::default()
    }
    .layout(&built.graph)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        OutputFormat::Text => write_interchange(&built.graph, Some(&layout), &mut out)?,
        OutputFormat::Json => {
            let export = NetworkExport::new(&built.graph, &layout);
            writeln!(out, "{}", export.to_json()?)?;
        }
    }
    out.flush()?;
    Ok(())
}
