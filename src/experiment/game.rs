use crate::Utility;

/// Parameters of the crewmates family, encoded as suffixes of the
/// game tag: `crewmates_3p[_10r][_5h][_<10|20|30>g][_1l]`.
///
/// A tag without a growth suffix plays at 10% growth; an explicit
/// `_10g` selects the same rate but is labeled `G=0.10` instead of
/// `G=0.1`, as in the upstream experiment tables.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Crewmates {
    pub rounds: u8,
    pub ranks: u8,
    pub growth: u8, // percent, 10 | 20 | 30
    pub last_plunder: u8,
    pub explicit_growth: bool,
}

impl Default for Crewmates {
    fn default() -> Self {
        Self {
            rounds: 6,
            ranks: 4,
            growth: 10,
            last_plunder: 2,
            explicit_growth: false,
        }
    }
}

impl Crewmates {
    fn growth_flag(&self) -> String {
        format!("0.{}", self.growth / 10)
    }
    fn growth_label(&self) -> String {
        if self.explicit_growth {
            format!("0.{}0", self.growth / 10)
        } else {
            format!("0.{}", self.growth / 10)
        }
    }
}

/// A game tag recognized by the experiment identifier grammar.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Game {
    Sheriff,
    Leduc,
    Goofspiel,
    GoofspielAscending,
    RandomGoofspiel,
    Goofspiel3p,
    GoofspielAscending3p,
    TinyBridge,
    Kuhn3p,
    Kuhn4p,
    TinyHanabi,
    Crewmates(Crewmates),
}

impl Game {
    pub const fn base() -> &'static [Self] {
        &[
            Self::Sheriff,
            Self::Leduc,
            Self::Goofspiel,
            Self::GoofspielAscending,
            Self::RandomGoofspiel,
            Self::Goofspiel3p,
            Self::GoofspielAscending3p,
            Self::TinyBridge,
            Self::Kuhn3p,
            Self::Kuhn4p,
            Self::TinyHanabi,
        ]
    }

    /// The game string handed to the solver's `--game` flag.
    pub fn spiel(&self) -> String {
        match self {
            Self::Sheriff => "sheriff".to_string(),
            Self::Leduc => "leduc_poker".to_string(),
            Self::Goofspiel => {
                "goofspiel(imp_info=True,num_cards=5,points_order=descending)".to_string()
            }
            Self::GoofspielAscending => {
                "goofspiel(imp_info=True,num_cards=5,points_order=ascending)".to_string()
            }
            Self::RandomGoofspiel => {
                "goofspiel(imp_info=True,num_cards=4,points_order=random)".to_string()
            }
            Self::Goofspiel3p => {
                "goofspiel(imp_info=True,num_cards=4,points_order=descending,players=3)"
                    .to_string()
            }
            Self::GoofspielAscending3p => {
                "goofspiel(imp_info=True,num_cards=4,points_order=ascending,players=3)".to_string()
            }
            Self::TinyBridge => "tiny_bridge_2p".to_string(),
            Self::Kuhn3p => "kuhn_poker(players=3)".to_string(),
            Self::Kuhn4p => "kuhn_poker(players=4)".to_string(),
            Self::TinyHanabi => "tiny_hanabi".to_string(),
            Self::Crewmates(c) => format!(
                "crewmates(rounds={},ranks={},stack=2,players=3,growth={},last_plunder_reward={})",
                c.rounds,
                c.ranks,
                c.growth_flag(),
                c.last_plunder
            ),
        }
    }

    pub const fn players(&self) -> usize {
        match self {
            Self::Sheriff => 2,
            Self::Leduc => 2,
            Self::Goofspiel => 2,
            Self::GoofspielAscending => 2,
            Self::RandomGoofspiel => 2,
            Self::TinyBridge => 2,
            Self::TinyHanabi => 2,
            Self::Goofspiel3p => 3,
            Self::GoofspielAscending3p => 3,
            Self::Kuhn3p => 3,
            Self::Kuhn4p => 4,
            Self::Crewmates(_) => 3,
        }
    }

    /// How many iterations a solver run gets on this game.
    pub const fn iterations(&self) -> u64 {
        match self {
            Self::Crewmates(_) => 400,
            _ => 1000,
        }
    }

    /// Extra parameters carried into the table label, when the game
    /// has any beyond player count.
    pub fn extras(&self) -> Vec<String> {
        match self {
            Self::Goofspiel => vec!["5".to_string(), "desc".to_string()],
            Self::GoofspielAscending => vec!["5".to_string(), "asc".to_string()],
            Self::RandomGoofspiel => vec!["4".to_string(), "R".to_string()],
            Self::Goofspiel3p => vec!["4".to_string(), "desc".to_string()],
            Self::GoofspielAscending3p => vec!["4".to_string(), "asc".to_string()],
            Self::Crewmates(c) => vec![
                format!("R={}", c.rounds),
                format!("H={}", c.ranks),
                "S=2".to_string(),
                format!("G={}", c.growth_label()),
                format!("L={}", c.last_plunder),
            ],
            _ => vec![],
        }
    }

    /// Human label for table axes, optionally carrying the time step.
    pub fn label(&self, t: Option<u64>) -> String {
        let name = match self {
            Self::Sheriff => "Sheriff",
            Self::TinyBridge => "tiny bridge",
            Self::Kuhn3p | Self::Kuhn4p => "Kuhn poker",
            Self::Leduc => "Leduc hold'em",
            Self::TinyHanabi => "tiny Hanabi",
            Self::Goofspiel
            | Self::GoofspielAscending
            | Self::RandomGoofspiel
            | Self::Goofspiel3p
            | Self::GoofspielAscending3p => "goofspiel",
            Self::Crewmates(_) => "crewmates",
        };
        let mut params = self.extras();
        params.push(format!("N={}", self.players()));
        if let Some(t) = t {
            params.push(format!("T={}", t));
        }
        format!("{}({})", name, params.join(","))
    }

    /// Rescale a raw utility into [0, 1] so values are comparable
    /// across games. Only registered for the games whose utility
    /// ranges the upstream experiments published.
    pub fn normalize(&self, value: Utility) -> anyhow::Result<Utility> {
        match self {
            Self::Leduc => Ok(value / 13.),
            Self::Kuhn3p => Ok((value - 1.) / 3.),
            Self::TinyBridge => Ok((value + 2.) / 38.),
            Self::Goofspiel | Self::RandomGoofspiel => Ok(value),
            _ => Err(anyhow::anyhow!("no normalization registered for {}", self)),
        }
    }
}

impl TryFrom<&str> for Game {
    type Error = anyhow::Error;
    fn try_from(tag: &str) -> Result<Self, Self::Error> {
        match tag {
            "sheriff" => Ok(Self::Sheriff),
            "leduc" => Ok(Self::Leduc),
            "goofspiel" => Ok(Self::Goofspiel),
            "goofspiel_ascending" => Ok(Self::GoofspielAscending),
            "random_goofspiel" => Ok(Self::RandomGoofspiel),
            "goofspiel_3p" => Ok(Self::Goofspiel3p),
            "goofspiel_ascending_3p" => Ok(Self::GoofspielAscending3p),
            "tiny_bridge" => Ok(Self::TinyBridge),
            "kuhn_3p" => Ok(Self::Kuhn3p),
            "kuhn_4p" => Ok(Self::Kuhn4p),
            "tiny_hanabi" => Ok(Self::TinyHanabi),
            _ => match tag.strip_prefix("crewmates_3p") {
                Some(rest) => Ok(Self::Crewmates(crewmates(rest)?)),
                None => Err(anyhow::anyhow!("unknown game tag: {}", tag)),
            },
        }
    }
}

fn crewmates(suffixes: &str) -> anyhow::Result<Crewmates> {
    let mut c = Crewmates::default();
    for token in suffixes.split('_').filter(|t| !t.is_empty()) {
        match token {
            "10r" => c.rounds = 10,
            "5h" => c.ranks = 5,
            "1l" => c.last_plunder = 1,
            "10g" => (c.growth, c.explicit_growth) = (10, true),
            "20g" => (c.growth, c.explicit_growth) = (20, true),
            "30g" => (c.growth, c.explicit_growth) = (30, true),
            _ => return Err(anyhow::anyhow!("unknown crewmates suffix: {}", token)),
        }
    }
    Ok(c)
}

impl std::fmt::Display for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Sheriff => write!(f, "sheriff"),
            Self::Leduc => write!(f, "leduc"),
            Self::Goofspiel => write!(f, "goofspiel"),
            Self::GoofspielAscending => write!(f, "goofspiel_ascending"),
            Self::RandomGoofspiel => write!(f, "random_goofspiel"),
            Self::Goofspiel3p => write!(f, "goofspiel_3p"),
            Self::GoofspielAscending3p => write!(f, "goofspiel_ascending_3p"),
            Self::TinyBridge => write!(f, "tiny_bridge"),
            Self::Kuhn3p => write!(f, "kuhn_3p"),
            Self::Kuhn4p => write!(f, "kuhn_4p"),
            Self::TinyHanabi => write!(f, "tiny_hanabi"),
            Self::Crewmates(c) => {
                write!(f, "crewmates_3p")?;
                if c.rounds == 10 {
                    write!(f, "_10r")?;
                }
                if c.ranks == 5 {
                    write!(f, "_5h")?;
                }
                if c.explicit_growth {
                    write!(f, "_{}g", c.growth)?;
                }
                if c.last_plunder == 1 {
                    write!(f, "_1l")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bijective_base_tags() {
        for game in Game::base() {
            assert_eq!(*game, Game::try_from(game.to_string().as_str()).unwrap());
        }
    }

    #[test]
    fn bijective_crewmates_tags() {
        for tag in [
            "crewmates_3p",
            "crewmates_3p_5h",
            "crewmates_3p_10r",
            "crewmates_3p_10r_20g",
            "crewmates_3p_10r_5h_30g_1l",
            "crewmates_3p_10r_1l",
        ] {
            assert_eq!(tag, Game::try_from(tag).unwrap().to_string());
        }
    }

    #[test]
    fn crewmates_growth_quirk() {
        let implicit = Game::try_from("crewmates_3p_10r").unwrap();
        let explicit = Game::try_from("crewmates_3p_10r_10g").unwrap();
        assert_eq!(implicit.spiel(), explicit.spiel());
        assert!(implicit.extras().contains(&"G=0.1".to_string()));
        assert!(explicit.extras().contains(&"G=0.10".to_string()));
    }

    #[test]
    fn spiel_strings() {
        assert_eq!(Game::Leduc.spiel(), "leduc_poker");
        assert_eq!(
            Game::Goofspiel.spiel(),
            "goofspiel(imp_info=True,num_cards=5,points_order=descending)"
        );
        assert_eq!(
            Game::try_from("crewmates_3p_10r_5h_20g").unwrap().spiel(),
            "crewmates(rounds=10,ranks=5,stack=2,players=3,growth=0.2,last_plunder_reward=2)"
        );
    }

    #[test]
    fn rejects_unknown_tags() {
        assert!(Game::try_from("chess").is_err());
        assert!(Game::try_from("crewmates_3p_7x").is_err());
    }

    #[test]
    fn normalization() {
        assert_eq!(Game::Leduc.normalize(13.).unwrap(), 1.);
        assert_eq!(Game::Kuhn3p.normalize(1.).unwrap(), 0.);
        assert_eq!(Game::TinyBridge.normalize(-2.).unwrap(), 0.);
        assert_eq!(Game::Goofspiel.normalize(0.5).unwrap(), 0.5);
        assert!(Game::Sheriff.normalize(1.).is_err());
    }

    #[test]
    fn labels() {
        assert_eq!(Game::Leduc.label(Some(1000)), "Leduc hold'em(N=2,T=1000)");
        assert_eq!(Game::Goofspiel.label(None), "goofspiel(5,desc,N=2)");
        assert_eq!(Game::Kuhn4p.label(None), "Kuhn poker(N=4)");
    }
}
