//! Command-line entry point: run a mass-mapping configuration file.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Create weak-lensing mass maps from a shear catalog.
#[derive(Parser, Debug)]
#[command(name = "massmap", version)]
struct Args {
    /// Path to the JSON run configuration
    config: PathBuf,

    /// Override the output FITS path from the configuration
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut config = match massmap::Config::from_file(&args.config) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    if args.output.is_some() {
        config.output_path = args.output;
    }

    match massmap::run_mapping(&config) {
        Ok(output) => {
            let (n_rows, n_cols) = (output.maps.e.nrows(), output.maps.e.ncols());
            println!(
                "mapped {} x {} field ({} {} to {} {}), {} diagnostics",
                n_rows,
                n_cols,
                output.true_boundaries.coord1_min,
                output.true_boundaries.coord2_min,
                output.true_boundaries.coord1_max,
                output.true_boundaries.coord2_max,
                output.diagnostics.len()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
