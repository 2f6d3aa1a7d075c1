use super::game::Game;
use super::mode::Mode;
use super::sampler::Sampler;
use super::suite::Suite;
use std::path::Path;

/// A parsed experiment identifier.
///
/// The dotted form `<suite>.<game>.<sampler>.<mode>[.<seed>]` names one
/// solver run; it doubles as the stem of the run's output file, which
/// is how results recover their identity at compile time. A leading
/// `data/` prefix is tolerated so file paths parse as identifiers.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Experiment {
    pub suite: Suite,
    pub game: Game,
    pub sampler: Sampler,
    pub mode: Mode,
    pub seed: Option<u64>,
}

impl Experiment {
    /// Solver flags in command-line order.
    pub fn flags(&self) -> Vec<String> {
        let mut flags = vec![
            "--game".to_string(),
            self.game.spiel(),
            "--sampler".to_string(),
            self.sampler.to_string(),
            "--t".to_string(),
            self.game.iterations().to_string(),
            "--cfr_group".to_string(),
            self.suite.cfr_group().to_string(),
            "--non_cfr_group".to_string(),
            self.suite.non_cfr_group().to_string(),
        ];
        if self.mode.shuffles() {
            flags.push("--shuffle".to_string());
            if let Some(seed) = self.seed {
                flags.push("--random_seed".to_string());
                flags.push(seed.to_string());
            }
        }
        flags
    }

    /// The ready-to-spawn solver invocation, optionally wrapped in
    /// `singularity exec <image>` for container execution.
    pub fn command(&self, exe_dir: &Path, sif: Option<&Path>) -> std::process::Command {
        let exe = exe_dir.join(self.mode.executable());
        let mut command = match sif {
            Some(sif) => {
                let mut command = std::process::Command::new("singularity");
                command.arg("exec").arg(sif).arg(&exe);
                command
            }
            None => std::process::Command::new(&exe),
        };
        command.args(self.flags());
        command
    }

    /// Shell-style rendering of the invocation, game string quoted.
    pub fn rendered(&self, exe_dir: &Path, sif: Option<&Path>) -> String {
        let exe = exe_dir.join(self.mode.executable()).display().to_string();
        let mut words = match sif {
            Some(sif) => vec![
                "singularity".to_string(),
                "exec".to_string(),
                sif.display().to_string(),
                exe,
            ],
            None => vec![exe],
        };
        let mut quote_next = false;
        for flag in self.flags() {
            if quote_next {
                words.push(format!("\"{}\"", flag));
            } else {
                words.push(flag.clone());
            }
            quote_next = flag == "--game";
        }
        words.join(" ")
    }
}

impl TryFrom<&str> for Experiment {
    type Error = anyhow::Error;
    fn try_from(id: &str) -> Result<Self, Self::Error> {
        let id = id.strip_prefix("data/").unwrap_or(id);
        let fields = id.split('.').collect::<Vec<&str>>();
        if fields.len() < 4 {
            return Err(anyhow::anyhow!(
                "identifier needs suite.game.sampler.mode[.seed]: {}",
                id
            ));
        }
        Ok(Self {
            suite: Suite::from(fields[0]),
            game: Game::try_from(fields[1])?,
            sampler: Sampler::try_from(fields[2])?,
            mode: Mode::try_from(fields[3])?,
            seed: fields.get(4).and_then(|f| f.parse().ok()),
        })
    }
}

impl std::fmt::Display for Experiment {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}.{}.{}.{}", self.suite, self.game, self.sampler, self.mode)?;
        match self.seed {
            Some(seed) => write!(f, ".{}", seed),
            None => Ok(()),
        }
    }
}
