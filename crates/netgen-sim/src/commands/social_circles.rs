use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use netgen_core::provenance::GenerationProvenance;
use netgen_core::rng::RngHandle;
use netgen_graph::{canonical_hash, Graph};
use netgen_social::{
    make_social_circles_network, SocialCirclesConfig, SocialCirclesNetwork, SocialCirclesOutcome,
};
use tracing::info;

use super::export::{write_network, NetworkExport};

#[derive(Args, Debug)]
pub struct SocialCirclesArgs {
    /// Output name; `<output>.txt` and `<output>.json` are written.
    pub output: PathBuf,
    /// YAML configuration overriding the default population.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Master seed, overriding the configuration.
    #[arg(long)]
    pub seed: Option<u64>,
    /// Keep the first generated network without prompting.
    #[arg(long)]
    pub yes: bool,
}

pub fn run(args: &SocialCirclesArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => SocialCirclesConfig::load(path)?,
        None => SocialCirclesConfig::default(),
    };
    let seed = args.seed.unwrap_or(config.seed);
    let population = config.population()?;
    let grid_size = config.grid_size();
    let options = config.options();
    info!(
        agents = population.total(),
        width = grid_size.0,
        height = grid_size.1,
        seed,
        "generating social circles network"
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    for round in 0u64.. {
        let mut rng = if round == 0 {
            RngHandle::from_seed(seed)
        } else {
            RngHandle::for_substream(seed, round)
        };
        let started = Instant::now();
        let outcome = make_social_circles_network(&population, grid_size, &options, &mut rng)?;
        let network = match outcome {
            SocialCirclesOutcome::Generated(network) => network,
            SocialCirclesOutcome::Exhausted { attempts } => {
                info!(attempts, "giving up");
                println!("Generation failed.");
                std::process::exit(1);
            }
        };
        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            attempts = network.attempts,
            "finished social circles network"
        );
        log_degree_summary(&network.graph);

        if args.yes || confirm(&mut stdin.lock(), &mut stdout.lock())? {
            let export = export_for(&network, rng.seed());
            let (text, json) =
                write_network(&args.output, &network.graph, &network.layout, &export)?;
            info!(text = %text.display(), json = %json.display(), "network written");
            return Ok(());
        }
        info!(round, "network discarded, regenerating");
    }
    Ok(())
}

/// Asks whether to keep the network; only an explicit `n` declines.
fn confirm<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "Keep? ")?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(!answer.trim().eq_ignore_ascii_case("n"))
}

fn export_for(network: &SocialCirclesNetwork, seed: u64) -> NetworkExport {
    let mut export = NetworkExport::new(&network.graph, &network.layout);
    export.colors = Some(network.colors.clone());
    export.provenance = Some(GenerationProvenance {
        generator: "social-circles".into(),
        seed,
        attempts: network.attempts,
        graph_hash: canonical_hash(&network.graph),
    });
    export
}

fn log_degree_summary(graph: &Graph) {
    let degrees: Vec<usize> = graph
        .nodes()
        .filter_map(|node| graph.degree(node).ok())
        .collect();
    let (Some(&min), Some(&max)) = (degrees.iter().min(), degrees.iter().max()) else {
        return;
    };
    let mean = degrees.iter().sum::<usize>() as f64 / degrees.len() as f64;
    info!(min, max, mean, "degree distribution");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str) -> (bool, String) {
        let mut input = answer.as_bytes();
        let mut output = Vec::new();
        let keep = confirm(&mut input, &mut output).unwrap();
        (keep, String::from_utf8(output).unwrap())
    }

    #[test]
    fn only_n_declines() {
        assert_eq!(ask("n\n"), (false, "Keep? ".to_string()));
        assert!(!ask("N\n").0);
        assert!(ask("y\n").0);
        assert!(ask("\n").0);
        assert!(ask("").0);
        assert!(ask("no\n").0);
    }
}
