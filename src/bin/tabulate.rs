//! Tabulation Binary
//!
//! Pivot queries and heatmap rendering over a compiled dataset.
//! With trailing arguments it runs one query; without, it drops into
//! a `> ` prompt.

use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use tourneybench::experiment::Mode;
use tourneybench::plot;
use tourneybench::plot::HeatmapOptions;
use tourneybench::plot::Palette;
use tourneybench::tournament::Data;
use tourneybench::tournament::order;

#[derive(Parser)]
#[command(author, version, about = "Tabulate tournament results", long_about = None)]
struct Args {
    /// dataset file produced by compile
    #[arg(long, default_value = "results/tourney.tbd")]
    data: PathBuf,
    /// query to run; drops into a prompt when absent
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    query: Vec<String>,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
enum Query {
    #[command(about = "List the games in the dataset")]
    Games,
    #[command(about = "List the shuffle seeds in the dataset")]
    Seeds,
    #[command(about = "List the convergence runs in the dataset")]
    Runs,
    #[command(about = "Show a tournament table", alias = "tab")]
    Table {
        #[arg(required = true)]
        game: String,
        #[arg(long, default_value = "fixed")]
        mode: String,
        /// time step; latest recorded when omitted
        #[arg(long)]
        t: Option<u64>,
        /// average over all steps below the horizon instead
        #[arg(long)]
        time_avg: bool,
    },
    #[command(about = "Show one shuffled repetition, or the mean across seeds", alias = "shf")]
    Shuffled {
        #[arg(required = true)]
        game: String,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        t: Option<u64>,
    },
    #[command(about = "Show the per-pair spread across shuffle seeds")]
    Spread {
        #[arg(required = true)]
        game: String,
        #[arg(long)]
        t: Option<u64>,
        /// largest one-sided deviation from the seed mean
        #[arg(long)]
        from_mean: bool,
    },
    #[command(about = "Cross-game average per learner, utilities normalized", alias = "sum")]
    Summary {
        #[arg(long, default_value = "fixed")]
        mode: String,
        #[arg(long)]
        t: Option<u64>,
        /// average over all steps below the horizon instead
        #[arg(long)]
        time_avg: bool,
        /// skip per-game utility normalization
        #[arg(long)]
        raw: bool,
    },
    #[command(about = "Render a heatmap PNG", alias = "map")]
    Heatmap {
        #[arg(required = true)]
        game: String,
        #[arg(long, default_value = "fixed")]
        mode: String,
        #[arg(long)]
        t: Option<u64>,
        #[arg(short = 'o', default_value = "heatmap.png")]
        output: PathBuf,
        /// best-response-fraction transform
        #[arg(long)]
        br_fraction: bool,
        /// sequential palette instead of the diverging default
        #[arg(long)]
        sequential: bool,
    },
}

fn main() {
    tourneybench::log();
    let args = Args::parse();
    let data = Data::load(&args.data).expect("load dataset");
    if args.query.is_empty() {
        repl(&data);
    } else {
        let words = std::iter::once("tabulate".to_string()).chain(args.query.iter().cloned());
        match Query::try_parse_from(words) {
            Ok(query) => {
                if let Err(e) = query.run(&data) {
                    log::error!("{:#}", e);
                    std::process::exit(1);
                }
            }
            Err(e) => e.exit(),
        }
    }
}

fn repl(data: &Data) {
    loop {
        print!("> ");
        let ref mut input = String::new();
        std::io::stdout().flush().unwrap();
        if std::io::stdin().read_line(input).unwrap() == 0 {
            break;
        }
        match input.trim() {
            "" => continue,
            "quit" => break,
            "exit" => break,
            _ => match Query::try_parse_from(std::iter::once("> ").chain(input.split_whitespace())) {
                Ok(query) => {
                    if let Err(e) = query.run(data) {
                        eprintln!("{:#}", e);
                    }
                }
                Err(e) => {
                    let _ = e.print();
                }
            },
        }
    }
}

impl Query {
    fn run(&self, data: &Data) -> anyhow::Result<()> {
        match self {
            Self::Games => {
                for game in data.games() {
                    println!("{}  {}", game, order::game_label(&game, None).dimmed());
                }
            }
            Self::Seeds => {
                for seed in data.seeds() {
                    println!("{}", seed);
                }
            }
            Self::Runs => {
                for run in data.runs() {
                    println!(
                        "{:<16} {:<24} {:<12} final avg {:>10.3}{}",
                        run.label,
                        run.game,
                        run.sampler,
                        run.exploit_avg.last().copied().unwrap_or(f64::NAN),
                        if run.is_rep {
                            format!("  (rep {})", run.seed.unwrap_or_default())
                        } else {
                            String::new()
                        }
                    );
                }
            }
            Self::Table {
                game,
                mode,
                t,
                time_avg,
            } => {
                let mode = Mode::try_from(mode.as_str())?;
                let t = horizon(data, game, mode, *t)?;
                let table = match time_avg {
                    true => data.time_avg_table(game, mode, t)?,
                    false => data.table(game, mode, t)?,
                };
                println!("{}", format!("{} / {} / t={}", game, mode, t).bold());
                print!("{}", table.with_avg().sorted());
            }
            Self::Shuffled { game, seed, t } => {
                let t = horizon(data, game, Mode::Shuffled, *t)?;
                let table = match seed {
                    Some(seed) => data.shuffled_table(game, *seed, t)?,
                    None => data.avg_shuffled_table(game, t)?,
                };
                let title = match seed {
                    Some(seed) => format!("{} / shuffled seed={} / t={}", game, seed, t),
                    None => format!("{} / shuffled mean / t={}", game, t),
                };
                println!("{}", title.bold());
                print!("{}", table.with_avg().sorted());
            }
            Self::Spread { game, t, from_mean } => {
                let t = horizon(data, game, Mode::Shuffled, *t)?;
                println!("{}", format!("{} / shuffled spread / t={}", game, t).bold());
                print!("{}", data.spread(game, t, *from_mean)?.sorted());
            }
            Self::Summary {
                mode,
                t,
                time_avg,
                raw,
            } => {
                let mode = Mode::try_from(mode.as_str())?;
                let t = match t {
                    Some(t) => *t,
                    None => data
                        .games()
                        .iter()
                        .filter_map(|game| data.last_t(game, mode))
                        .max()
                        .ok_or_else(|| anyhow::anyhow!("dataset holds no {} rows", mode))?,
                };
                let table = match time_avg {
                    true => data.time_avg_mode_avg_table(mode, t, !*raw)?,
                    false => data.mode_avg_table(mode, t, !*raw)?,
                };
                println!("{}", format!("cross-game summary / {} / t={}", mode, t).bold());
                print!("{}", table.with_avg().sorted_by_game_cols());
            }
            Self::Heatmap {
                game,
                mode,
                t,
                output,
                br_fraction,
                sequential,
            } => {
                let mode = Mode::try_from(mode.as_str())?;
                let t = horizon(data, game, mode, *t)?;
                let table = data.table(game, mode, t)?;
                let opts = HeatmapOptions {
                    title: Some(order::game_label(game, Some(t))),
                    palette: match sequential {
                        true => Palette::Sequential,
                        false => Palette::Diverging,
                    },
                    ..HeatmapOptions::default()
                };
                match br_fraction {
                    true => plot::br_fraction_heatmap(&table, &opts, output)?,
                    false => plot::heatmap(&table, &opts, output)?,
                }
                println!("wrote {}", output.display());
            }
        }
        Ok(())
    }
}

fn horizon(data: &Data, game: &str, mode: Mode, t: Option<u64>) -> anyhow::Result<u64> {
    t.or_else(|| data.last_t(game, mode))
        .ok_or_else(|| anyhow::anyhow!("no {} rows for {}", mode, game))
}
