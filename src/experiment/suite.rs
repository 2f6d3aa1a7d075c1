/// The leading algorithm-group field of an experiment identifier,
/// dash-separated: a family tag followed by feature tags, e.g.
/// `ltbr-cfr-cfr_plus`.
///
/// The family decides which flag value enables a feature group: the
/// `ltbr` family maps to 1, every other family to 2. A feature group
/// whose tag is absent maps to 0.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct Suite {
    family: String,
    features: Vec<String>,
}

impl Suite {
    fn version(&self) -> u8 {
        if self.family == "ltbr" { 1 } else { 2 }
    }

    fn group(&self, feature: &str) -> u8 {
        if self.features.iter().any(|f| f == feature) {
            self.version()
        } else {
            0
        }
    }

    pub fn cfr_group(&self) -> u8 {
        self.group("cfr")
    }

    pub fn cfr_plus_group(&self) -> u8 {
        self.group("cfr_plus")
    }

    pub const fn non_cfr_group(&self) -> u8 {
        0
    }
}

impl From<&str> for Suite {
    fn from(field: &str) -> Self {
        let mut tags = field.split('-').map(String::from);
        Self {
            family: tags.next().unwrap_or_default(),
            features: tags.collect(),
        }
    }
}

impl std::fmt::Display for Suite {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.family)?;
        for feature in &self.features {
            write!(f, "-{}", feature)?;
        }
        Ok(())
    }
}
