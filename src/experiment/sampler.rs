/// Monte Carlo sampling scheme requested from the solver.
#[derive(Debug, Default, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Sampler {
    #[default]
    Null,
    External,
    Outcome,
}

impl Sampler {
    /// Label used on result axes. The outcome sampler always runs at
    /// exploration 0.6 upstream, so the constant is part of the label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Null => "No",
            Self::External => "External",
            Self::Outcome => "Outcome(0.6)",
        }
    }
}

impl TryFrom<&str> for Sampler {
    type Error = anyhow::Error;
    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        match tag {
            "null" => Ok(Self::Null),
            "external" => Ok(Self::External),
            "outcome" => Ok(Self::Outcome),
            _ => Err(anyhow::anyhow!("unknown sampler tag: {}", tag)),
        }
    }
}

impl std::fmt::Display for Sampler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Null => "null",
                Self::External => "external",
                Self::Outcome => "outcome",
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_str() {
        for sampler in [Sampler::Null, Sampler::External, Sampler::Outcome] {
            assert_eq!(
                sampler,
                Sampler::try_from(sampler.to_string().as_str()).unwrap()
            );
        }
    }

    #[test]
    fn labels() {
        assert_eq!(Sampler::Null.label(), "No");
        assert_eq!(Sampler::Outcome.label(), "Outcome(0.6)");
    }
}
