use super::order;
use super::table::Table;
use crate::Utility;
use crate::experiment::Game;
use crate::experiment::Mode;
use crate::results::Dataset;
use crate::results::Row;
use crate::results::Run;
use std::collections::HashMap;
use std::path::Path;

/// Query façade over a compiled dataset: every tournament view is a
/// filter over the flat rows followed by a pivot.
pub struct Data(Dataset);

impl From<Dataset> for Data {
    fn from(dataset: Dataset) -> Self {
        Self(dataset)
    }
}

impl Data {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        Ok(Self::from(Dataset::load(path)?))
    }

    /// Distinct game tags, in canonical display order.
    pub fn games(&self) -> Vec<String> {
        let mut games = Vec::<String>::new();
        for row in &self.0.rows {
            if !games.contains(&row.game) {
                games.push(row.game.clone());
            }
        }
        games.sort_by_key(|game| order::game_rank(game));
        games
    }

    /// Distinct shuffle seeds, ascending.
    pub fn seeds(&self) -> Vec<u64> {
        let mut seeds = self
            .0
            .rows
            .iter()
            .filter_map(|row| row.seed)
            .collect::<Vec<u64>>();
        seeds.sort();
        seeds.dedup();
        seeds
    }

    /// Convergence runs that were compiled alongside the tournament.
    pub fn runs(&self) -> &[Run] {
        &self.0.runs
    }

    /// Latest time step recorded for a game under a mode.
    pub fn last_t(&self, game: &str, mode: Mode) -> Option<u64> {
        let mode = mode.to_string();
        self.0
            .rows
            .iter()
            .filter(|row| row.game == game && row.mode == mode)
            .map(|row| row.t)
            .max()
    }

    /// The tournament table for one game, mode, and time step.
    pub fn table(&self, game: &str, mode: Mode, t: u64) -> anyhow::Result<Table> {
        if mode.shuffles() {
            return Err(anyhow::anyhow!("use the shuffled queries for shuffled mode"));
        }
        let mode = mode.to_string();
        self.pivot(
            |row| row.game == game && row.mode == mode && row.t == t,
            |row| (row.row_alg.clone(), row.col_alg.clone()),
            format!("{} {} t={}", game, mode, t),
        )
    }

    /// The tournament table averaged over all time steps below the
    /// horizon.
    pub fn time_avg_table(&self, game: &str, mode: Mode, horizon: u64) -> anyhow::Result<Table> {
        if mode.shuffles() {
            return Err(anyhow::anyhow!("use the shuffled queries for shuffled mode"));
        }
        let mode = mode.to_string();
        self.mean_pivot(
            |row| row.game == game && row.mode == mode && row.t < horizon,
            |row| (row.row_alg.clone(), row.col_alg.clone()),
            |row| Ok(row.value),
            format!("{} {} t<{}", game, mode, horizon),
        )
    }

    /// The tournament table of one shuffled repetition.
    pub fn shuffled_table(&self, game: &str, seed: u64, t: u64) -> anyhow::Result<Table> {
        self.pivot(
            |row| {
                row.game == game && row.mode == "shuffled" && row.seed == Some(seed) && row.t == t
            },
            |row| (row.row_alg.clone(), row.col_alg.clone()),
            format!("{} shuffled seed={} t={}", game, seed, t),
        )
    }

    /// One table per shuffle seed.
    pub fn shuffled_tables(&self, game: &str, t: u64) -> anyhow::Result<Vec<(u64, Table)>> {
        self.seeds()
            .into_iter()
            .map(|seed| Ok((seed, self.shuffled_table(game, seed, t)?)))
            .collect()
    }

    /// Mean across shuffle seeds.
    pub fn avg_shuffled_table(&self, game: &str, t: u64) -> anyhow::Result<Table> {
        self.mean_pivot(
            |row| row.game == game && row.mode == "shuffled" && row.t == t,
            |row| (row.row_alg.clone(), row.col_alg.clone()),
            |row| Ok(row.value),
            format!("{} shuffled t={}", game, t),
        )
    }

    /// Per-pair spread across shuffle seeds: max - min, or the larger
    /// one-sided deviation from the mean.
    pub fn spread(&self, game: &str, t: u64, from_mean: bool) -> anyhow::Result<Table> {
        let mut order_ = Vec::<(String, String)>::new();
        let mut stats = HashMap::<(String, String), (Utility, Utility, Utility, u32)>::new();
        for row in self.0.rows.iter().filter(|row| {
            row.game == game && row.mode == "shuffled" && row.t == t && !row.value.is_nan()
        }) {
            let key = (row.row_alg.clone(), row.col_alg.clone());
            if !stats.contains_key(&key) {
                order_.push(key.clone());
            }
            let (min, max, sum, n) = stats
                .entry(key)
                .or_insert((Utility::INFINITY, Utility::NEG_INFINITY, 0.0, 0));
            *min = min.min(row.value);
            *max = max.max(row.value);
            *sum += row.value;
            *n += 1;
        }
        if order_.is_empty() {
            return Err(anyhow::anyhow!("no rows for {} shuffled t={}", game, t));
        }
        Ok(Table::pivot(order_.into_iter().map(|key| {
            let (min, max, sum, n) = stats[&key];
            let value = match from_mean {
                false => max - min,
                true => {
                    let mean = sum / n as Utility;
                    (max - mean).max(mean - min)
                }
            };
            (key.0, key.1, value)
        })))
    }

    /// Per-game mean against all column algorithms: a `row_alg x game`
    /// matrix. With `normalized`, each game's utilities are rescaled
    /// into [0, 1] first, so the cross-game average is meaningful.
    pub fn mode_avg_table(&self, mode: Mode, t: u64, normalized: bool) -> anyhow::Result<Table> {
        if mode.shuffles() {
            return Err(anyhow::anyhow!("use the shuffled queries for shuffled mode"));
        }
        let mode = mode.to_string();
        self.mean_pivot(
            |row| row.mode == mode && row.t == t,
            |row| (row.row_alg.clone(), row.game.clone()),
            |row| scale(row, normalized),
            format!("{} t={}", mode, t),
        )
    }

    /// `mode_avg_table` additionally averaged over all time steps
    /// below the horizon.
    pub fn time_avg_mode_avg_table(
        &self,
        mode: Mode,
        horizon: u64,
        normalized: bool,
    ) -> anyhow::Result<Table> {
        if mode.shuffles() {
            return Err(anyhow::anyhow!("use the shuffled queries for shuffled mode"));
        }
        let mode = mode.to_string();
        self.mean_pivot(
            |row| row.mode == mode && row.t < horizon,
            |row| (row.row_alg.clone(), row.game.clone()),
            |row| scale(row, normalized),
            format!("{} t<{}", mode, horizon),
        )
    }

    /// Mean across shuffle seeds and games: a `row_alg x col_alg`
    /// matrix.
    pub fn shuffled_avg_table(&self, t: u64) -> anyhow::Result<Table> {
        self.mean_pivot(
            |row| row.mode == "shuffled" && row.t == t,
            |row| (row.row_alg.clone(), row.col_alg.clone()),
            |row| Ok(row.value),
            format!("shuffled t={}", t),
        )
    }

    fn pivot<F, K>(&self, keep: F, key: K, slice: String) -> anyhow::Result<Table>
    where
        F: Fn(&Row) -> bool,
        K: Fn(&Row) -> (String, String),
    {
        let table = Table::pivot(self.0.rows.iter().filter(|row| keep(row)).map(|row| {
            let (r, c) = key(row);
            (r, c, row.value)
        }));
        if table.is_empty() {
            return Err(anyhow::anyhow!("no rows for {}", slice));
        }
        Ok(table)
    }

    fn mean_pivot<F, K, V>(&self, keep: F, key: K, value: V, slice: String) -> anyhow::Result<Table>
    where
        F: Fn(&Row) -> bool,
        K: Fn(&Row) -> (String, String),
        V: Fn(&Row) -> anyhow::Result<Utility>,
    {
        let mut order_ = Vec::<(String, String)>::new();
        let mut sums = HashMap::<(String, String), (Utility, u32)>::new();
        for row in self.0.rows.iter().filter(|row| keep(row)) {
            let key = key(row);
            if !sums.contains_key(&key) {
                order_.push(key.clone());
            }
            let (sum, n) = sums.entry(key).or_insert((0.0, 0));
            let value = value(row)?;
            if !value.is_nan() {
                *sum += value;
                *n += 1;
            }
        }
        if order_.is_empty() {
            return Err(anyhow::anyhow!("no rows for {}", slice));
        }
        Ok(Table::pivot(order_.into_iter().map(|key| {
            let (sum, n) = sums[&key];
            let mean = if n == 0 { Utility::NAN } else { sum / n as Utility };
            (key.0, key.1, mean)
        })))
    }
}

fn scale(row: &Row, normalized: bool) -> anyhow::Result<Utility> {
    if normalized {
        Game::try_from(row.game.as_str())?.normalize(row.value)
    } else {
        Ok(row.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(game: &str, mode: &str, seed: Option<u64>, t: u64, r: &str, c: &str, v: f64) -> Row {
        Row {
            game: game.to_string(),
            sampler: "null".to_string(),
            mode: mode.to_string(),
            seed,
            t,
            row_alg: r.to_string(),
            col_alg: c.to_string(),
            value: v,
        }
    }

    fn data() -> Data {
        Data::from(Dataset {
            rows: vec![
                row("leduc", "fixed", None, 0, "CFR", "CFR", 1.0),
                row("leduc", "fixed", None, 0, "CFR", "CFR_IN", 3.0),
                row("leduc", "fixed", None, 1, "CFR", "CFR", 2.0),
                row("leduc", "fixed", None, 1, "CFR", "CFR_IN", 4.0),
                row("goofspiel", "fixed", None, 1, "CFR", "CFR", 0.5),
                row("leduc", "shuffled", Some(1), 1, "CFR", "CFR_IN", 1.0),
                row("leduc", "shuffled", Some(2), 1, "CFR", "CFR_IN", 5.0),
            ],
            runs: vec![],
        })
    }

    #[test]
    fn games_in_display_order() {
        assert_eq!(data().games(), vec!["leduc", "goofspiel"]);
    }

    #[test]
    fn seeds_sorted_and_unique() {
        assert_eq!(data().seeds(), vec![1, 2]);
    }

    #[test]
    fn last_t_per_game_and_mode() {
        assert_eq!(data().last_t("leduc", Mode::Fixed), Some(1));
        assert_eq!(data().last_t("leduc", Mode::Shuffled), Some(1));
        assert_eq!(data().last_t("sheriff", Mode::Fixed), None);
    }

    #[test]
    fn table_slices_one_time_step() {
        let table = data().table("leduc", Mode::Fixed, 1).unwrap();
        assert_eq!(table.get("CFR", "CFR"), Some(2.0));
        assert_eq!(table.get("CFR", "CFR_IN"), Some(4.0));
    }

    #[test]
    fn table_rejects_shuffled_mode() {
        assert!(data().table("leduc", Mode::Shuffled, 1).is_err());
    }

    #[test]
    fn missing_slice_is_an_error() {
        assert!(data().table("leduc", Mode::Fixed, 99).is_err());
        assert!(data().table("sheriff", Mode::Fixed, 0).is_err());
    }

    #[test]
    fn time_average_below_horizon() {
        let table = data().time_avg_table("leduc", Mode::Fixed, 2).unwrap();
        assert_eq!(table.get("CFR", "CFR"), Some(1.5));
        assert_eq!(table.get("CFR", "CFR_IN"), Some(3.5));
    }

    #[test]
    fn shuffled_queries() {
        let data = data();
        let one = data.shuffled_table("leduc", 1, 1).unwrap();
        assert_eq!(one.get("CFR", "CFR_IN"), Some(1.0));
        let avg = data.avg_shuffled_table("leduc", 1).unwrap();
        assert_eq!(avg.get("CFR", "CFR_IN"), Some(3.0));
        assert_eq!(data.shuffled_tables("leduc", 1).unwrap().len(), 2);
        let global = data.shuffled_avg_table(1).unwrap();
        assert_eq!(global.get("CFR", "CFR_IN"), Some(3.0));
    }

    #[test]
    fn spread_across_seeds() {
        let spread = data().spread("leduc", 1, false).unwrap();
        assert_eq!(spread.get("CFR", "CFR_IN"), Some(4.0));
        let deviation = data().spread("leduc", 1, true).unwrap();
        assert_eq!(deviation.get("CFR", "CFR_IN"), Some(2.0));
    }

    #[test]
    fn cross_game_average() {
        let table = data().mode_avg_table(Mode::Fixed, 1, false).unwrap();
        // leduc: mean over both opponents; goofspiel: single cell
        assert_eq!(table.get("CFR", "leduc"), Some(3.0));
        assert_eq!(table.get("CFR", "goofspiel"), Some(0.5));
    }

    #[test]
    fn normalized_cross_game_average() {
        let table = data().mode_avg_table(Mode::Fixed, 1, true).unwrap();
        // leduc utilities divide by 13, goofspiel passes through
        assert!((table.get("CFR", "leduc").unwrap() - 3.0 / 13.0).abs() < 1e-12);
        assert_eq!(table.get("CFR", "goofspiel"), Some(0.5));
    }

    #[test]
    fn time_avg_cross_game_average() {
        let table = data()
            .time_avg_mode_avg_table(Mode::Fixed, 2, false)
            .unwrap();
        assert_eq!(table.get("CFR", "leduc"), Some(2.5));
    }
}
