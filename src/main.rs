// Builds a model from a spec file, runs one forward pass on random features
// over the given topology and logs the output.
//
// Log level follows RUST_LOG (default: info).
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use simplex_nn::{Matrix, ModelSpec, TopoResult, TopologySpec};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "simplex-nn")]
#[command(about = "Run a topological neural network on a simplicial complex or hypergraph", long_about = None)]
struct Cli {
    /// Model spec (JSON)
    #[arg(value_name = "SPEC")]
    spec: PathBuf,

    /// Simplicial complex or hypergraph description (JSON)
    #[arg(value_name = "TOPOLOGY")]
    topology: PathBuf,

    /// Write the freshly initialized weights here
    #[arg(short, long, value_name = "FILE")]
    weights_out: Option<PathBuf>,
}

fn run(cli: &Cli) -> TopoResult<()> {
    let spec = ModelSpec::load_json(&cli.spec)?;
    let model = spec.build()?;
    info!(name = %spec.name, in_channels = model.in_channels(), "model built");

    let topology = TopologySpec::load_json(&cli.topology)?.build()?;
    let features = Matrix::random(topology.num_feature_cells(), model.in_channels());
    info!(cells = features.rows, "running forward pass");

    let output = model.forward_on(&topology, &features)?;
    info!(?output, "forward pass complete");

    if let Some(path) = cli.weights_out.as_deref() {
        model.save_json(path)?;
        info!(path = %path.display(), "weights saved");
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_positionals_and_weights_flag() {
        let cli = Cli::try_parse_from(["simplex-nn", "spec.json", "topo.json", "-w", "out.json"]).unwrap();
        assert_eq!(cli.spec, PathBuf::from("spec.json"));
        assert_eq!(cli.topology, PathBuf::from("topo.json"));
        assert_eq!(cli.weights_out, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn help_is_not_treated_as_a_path() {
        let err = Cli::try_parse_from(["simplex-nn", "--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn missing_topology_is_a_usage_error() {
        assert!(Cli::try_parse_from(["simplex-nn", "spec.json"]).is_err());
    }
}
