//! Dataset Compiler Binary
//!
//! Stacks solver result files into one persisted dataset file.

use clap::Parser;
use std::path::PathBuf;
use tourneybench::results::Dataset;

#[derive(Parser)]
#[command(author, version, about = "Compile solver result files into a dataset", long_about = None)]
struct Args {
    /// result files to compile; defaults to every *.txt under --dir
    #[arg(short = 'i', value_delimiter = ',')]
    inputs: Vec<PathBuf>,
    /// directory scanned when no inputs are given
    #[arg(long, default_value = "data")]
    dir: PathBuf,
    /// output dataset file
    #[arg(short = 'o')]
    output: PathBuf,
    /// also write a JSON sidecar next to the dataset
    #[arg(long)]
    json: bool,
}

fn main() {
    tourneybench::log();
    let args = Args::parse();
    let dataset = match Dataset::compile(&args.dir, &args.inputs) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "compiled {} rows and {} convergence runs",
        dataset.rows.len(),
        dataset.runs.len()
    );
    if let Err(e) = dataset.save(&args.output) {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
    log::info!("saved {}", args.output.display());
    if args.json {
        let sidecar = args.output.with_extension("json");
        if let Err(e) = dataset.to_json(&sidecar) {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
        log::info!("saved {}", sidecar.display());
    }
}
