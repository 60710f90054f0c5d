use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    clique_gate::{self, CliqueGateArgs},
    social_circles::{self, SocialCirclesArgs},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "netgen", about = "Synthetic network topology generators")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a clique-gate graph and print it in the interchange format.
    CliqueGate(CliqueGateArgs),
    /// Generate a social circles network and write it to disk.
    SocialCircles(SocialCirclesArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    // stdout carries the interchange format, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::CliqueGate(args) => clique_gate::run(&args),
        Command::SocialCircles(args) => social_circles::run(&args),
    }
}
