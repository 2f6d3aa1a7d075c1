//! Experiment Runner Binary
//!
//! Translates dotted experiment identifiers into solver invocations
//! and runs them, capturing stdout under the data directory.

use clap::Parser;
use std::path::Path;
use std::path::PathBuf;
use tourneybench::experiment::Experiment;

#[derive(Parser)]
#[command(author, version, about = "Run solver experiments from dotted identifiers", long_about = None)]
struct Args {
    /// directory holding the solver executables; falls back to the
    /// LTBR_EXE_DIR environment variable
    #[arg(long)]
    exe_dir: Option<PathBuf>,
    /// directory for captured solver output
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,
    /// singularity image to run the solver inside
    #[arg(long)]
    sif: Option<PathBuf>,
    /// print the parsed identifier and invocation without running
    #[arg(long)]
    explain: bool,
    /// dotted identifiers, suite.game.sampler.mode[.seed]
    #[arg(required = true)]
    ids: Vec<String>,
}

fn main() {
    tourneybench::log();
    let args = Args::parse();
    let exe_dir = args
        .exe_dir
        .or_else(|| std::env::var("LTBR_EXE_DIR").ok().map(PathBuf::from))
        .expect("pass --exe-dir or set LTBR_EXE_DIR");
    for id in &args.ids {
        let x = match Experiment::try_from(id.as_str()) {
            Ok(x) => x,
            Err(e) => {
                log::error!("{}: {:#}", id, e);
                std::process::exit(2);
            }
        };
        if args.explain {
            explain(&x, &exe_dir, args.sif.as_deref());
            continue;
        }
        match tourneybench::experiment::run(&x, &exe_dir, &args.out_dir, args.sif.as_deref()) {
            Ok(path) => log::info!("captured {}", path.display()),
            Err(e) => {
                log::error!("{}: {:#}", x, e);
                std::process::exit(1);
            }
        }
    }
}

fn explain(x: &Experiment, exe_dir: &Path, sif: Option<&Path>) {
    println!("identifier  {}", x);
    println!("game        {}", x.game.spiel());
    println!("players     {}", x.game.players());
    println!("iterations  {}", x.game.iterations());
    println!("sampler     {} ({})", x.sampler, x.sampler.label());
    println!("mode        {} -> {}", x.mode, x.mode.executable());
    println!(
        "groups      cfr={} cfr_plus={} non_cfr={}",
        x.suite.cfr_group(),
        x.suite.cfr_plus_group(),
        x.suite.non_cfr_group()
    );
    match x.seed {
        Some(seed) => println!("seed        {}", seed),
        None => println!("seed        -"),
    }
    println!("command     {}", x.rendered(exe_dir, sif));
}
