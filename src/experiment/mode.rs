/// Execution mode of a tournament run.
///
/// `Fixed` plays each learner against frozen opponents, `Sim` lets all
/// learners update simultaneously, `Shuffled` is `Fixed` with shuffled
/// matchup order under a seed.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Fixed,
    Sim,
    Shuffled,
}

impl Mode {
    /// Solver binary implementing this mode.
    pub const fn executable(&self) -> &'static str {
        match self {
            Self::Sim => "run_simultaneous_ltbr",
            Self::Fixed | Self::Shuffled => "run_fixed_ltbr",
        }
    }

    pub const fn shuffles(&self) -> bool {
        matches!(self, Self::Shuffled)
    }
}

impl TryFrom<&str> for Mode {
    type Error = anyhow::Error;
    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        match tag {
            "fixed" => Ok(Self::Fixed),
            "sim" => Ok(Self::Sim),
            "shuffled" => Ok(Self::Shuffled),
            _ => Err(anyhow::anyhow!("unknown mode tag: {}", tag)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Fixed => "fixed",
                Self::Sim => "sim",
                Self::Shuffled => "shuffled",
            }
        )
    }
}
