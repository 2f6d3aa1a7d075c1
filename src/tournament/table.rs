use super::order;
use crate::Utility;

/// A dense labeled matrix, the pivoted form of a dataset slice.
///
/// Labels keep first-appearance order until explicitly sorted; missing
/// row/column combinations hold NaN, and every aggregation skips NaN
/// the way the upstream dataframe `mean()` does.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    rows: Vec<String>,
    cols: Vec<String>,
    values: Vec<Vec<Utility>>,
}

impl Table {
    /// Pivot (row, col, value) triples. Later duplicates overwrite.
    pub fn pivot<I>(cells: I) -> Self
    where
        I: IntoIterator<Item = (String, String, Utility)>,
    {
        let mut table = Self {
            rows: Vec::new(),
            cols: Vec::new(),
            values: Vec::new(),
        };
        for (row, col, value) in cells {
            table.insert(&row, &col, value);
        }
        table
    }

    pub fn insert(&mut self, row: &str, col: &str, value: Utility) {
        let j = match self.cols.iter().position(|c| c == col) {
            Some(j) => j,
            None => {
                self.cols.push(col.to_string());
                for values in &mut self.values {
                    values.push(Utility::NAN);
                }
                self.cols.len() - 1
            }
        };
        let i = match self.rows.iter().position(|r| r == row) {
            Some(i) => i,
            None => {
                self.rows.push(row.to_string());
                self.values.push(vec![Utility::NAN; self.cols.len()]);
                self.rows.len() - 1
            }
        };
        self.values[i][j] = value;
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn cols(&self) -> &[String] {
        &self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at label coordinates. None when either label is absent;
    /// a held NaN passes through.
    pub fn get(&self, row: &str, col: &str) -> Option<Utility> {
        let i = self.rows.iter().position(|r| r == row)?;
        let j = self.cols.iter().position(|c| c == col)?;
        Some(self.values[i][j])
    }

    /// Cell at positional coordinates.
    pub fn at(&self, i: usize, j: usize) -> Utility {
        self.values[i][j]
    }

    /// Append an `avg` column of row means.
    pub fn with_avg_col(&self) -> Self {
        let mut table = self.clone();
        table.cols.push("avg".to_string());
        for values in &mut table.values {
            let mean = nanmean(values.iter().copied());
            values.push(mean);
        }
        table
    }

    /// Append an `avg` row and column. Column means exclude a `BR`
    /// row when one is present; the corner cell is the mean of the
    /// column means; the `avg` column holds row means over the
    /// original columns, `BR` included.
    pub fn with_avg(&self) -> Self {
        let col_avgs = (0..self.cols.len())
            .map(|j| {
                nanmean(
                    self.rows
                        .iter()
                        .zip(&self.values)
                        .filter(|(row, _)| *row != "BR")
                        .map(|(_, values)| values[j]),
                )
            })
            .collect::<Vec<Utility>>();
        let corner = nanmean(col_avgs.iter().copied());
        let row_avgs = self
            .values
            .iter()
            .map(|values| nanmean(values.iter().copied()))
            .collect::<Vec<Utility>>();
        let mut table = self.clone();
        table.rows.push("avg".to_string());
        table.values.push(col_avgs);
        table.cols.push("avg".to_string());
        for (i, values) in table.values.iter_mut().enumerate() {
            values.push(*row_avgs.get(i).unwrap_or(&corner));
        }
        table
    }

    /// The table minus its `BR` row, if any.
    pub fn without_br(&self) -> Self {
        let mut table = self.clone();
        if let Some(i) = table.rows.iter().position(|row| row == "BR") {
            table.rows.remove(i);
            table.values.remove(i);
        }
        table
    }

    /// The `BR` row, aligned with `cols()`.
    pub fn br_values(&self) -> Option<Vec<Utility>> {
        let i = self.rows.iter().position(|row| row == "BR")?;
        Some(self.values[i].clone())
    }

    /// Re-express each column as the fraction of the best-response
    /// payoff recovered above the column minimum, with `avg` row and
    /// column appended: `(v - col_min) / (br - col_min)`, so BR itself
    /// maps to 1 and the column's worst learner to 0.
    pub fn br_fraction(&self) -> anyhow::Result<Self> {
        let br = self
            .br_values()
            .ok_or_else(|| anyhow::anyhow!("table has no BR row"))?;
        let br_avg = nanmean(br.iter().copied());
        let mut table = self.without_br().with_avg();
        for j in 0..table.cols.len() {
            let bound = *br.get(j).unwrap_or(&br_avg);
            let floor = nanmin(table.values.iter().map(|values| values[j]));
            for values in &mut table.values {
                values[j] = (values[j] - floor) / (bound - floor);
            }
        }
        Ok(table)
    }

    pub fn max_element(&self) -> Utility {
        nanmax(self.values.iter().flatten().copied())
    }

    pub fn min_element(&self) -> Utility {
        nanmin(self.values.iter().flatten().copied())
    }

    /// Mean of column means, matching the upstream `mean().mean()`.
    pub fn mean_element(&self) -> Utility {
        nanmean(
            (0..self.cols.len())
                .map(|j| nanmean(self.values.iter().map(|values| values[j]))),
        )
    }

    pub fn midpoint(&self) -> Utility {
        (self.max_element() - self.min_element()) / 2.0
    }

    /// Rows and columns in canonical algorithm order.
    pub fn sorted(&self) -> Self {
        self.reordered(order::alg_rank, order::alg_rank)
    }

    /// Rows in algorithm order, columns in game order.
    pub fn sorted_by_game_cols(&self) -> Self {
        self.reordered(order::alg_rank, order::game_rank)
    }

    fn reordered(&self, row_rank: fn(&str) -> i32, col_rank: fn(&str) -> i32) -> Self {
        let mut ri = (0..self.rows.len()).collect::<Vec<usize>>();
        let mut ci = (0..self.cols.len()).collect::<Vec<usize>>();
        ri.sort_by_key(|&i| row_rank(&self.rows[i]));
        ci.sort_by_key(|&j| col_rank(&self.cols[j]));
        Self {
            rows: ri.iter().map(|&i| self.rows[i].clone()).collect(),
            cols: ci.iter().map(|&j| self.cols[j].clone()).collect(),
            values: ri
                .iter()
                .map(|&i| ci.iter().map(|&j| self.values[i][j]).collect())
                .collect(),
        }
    }

    pub fn transposed(&self) -> Self {
        Self {
            rows: self.cols.clone(),
            cols: self.rows.clone(),
            values: (0..self.cols.len())
                .map(|j| self.values.iter().map(|values| values[j]).collect())
                .collect(),
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let gutter = self.rows.iter().map(String::len).max().unwrap_or(0).max(4) + 2;
        let width = self.cols.iter().map(String::len).max().unwrap_or(0).max(9) + 2;
        write!(f, "{:<gutter$}", "")?;
        for col in &self.cols {
            write!(f, "{:>width$}", col)?;
        }
        writeln!(f)?;
        for (row, values) in self.rows.iter().zip(&self.values) {
            write!(f, "{:<gutter$}", row)?;
            for value in values {
                if value.is_nan() {
                    write!(f, "{:>width$}", "-")?;
                } else {
                    write!(f, "{:>width$.3}", value)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn nanmean<I: IntoIterator<Item = Utility>>(values: I) -> Utility {
    let (mut sum, mut n) = (0.0, 0u32);
    for value in values {
        if !value.is_nan() {
            sum += value;
            n += 1;
        }
    }
    if n == 0 { Utility::NAN } else { sum / n as Utility }
}

fn nanmin<I: IntoIterator<Item = Utility>>(values: I) -> Utility {
    values
        .into_iter()
        .filter(|value| !value.is_nan())
        .fold(Utility::NAN, Utility::min)
}

fn nanmax<I: IntoIterator<Item = Utility>>(values: I) -> Utility {
    values
        .into_iter()
        .filter(|value| !value.is_nan())
        .fold(Utility::NAN, Utility::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> Table {
        Table::pivot(vec![
            ("CFR".to_string(), "A".to_string(), 1.0),
            ("CFR".to_string(), "B".to_string(), 3.0),
            ("CFR_IN".to_string(), "A".to_string(), 3.0),
            ("CFR_IN".to_string(), "B".to_string(), 5.0),
            ("BR".to_string(), "A".to_string(), 5.0),
            ("BR".to_string(), "B".to_string(), 7.0),
        ])
    }

    #[test]
    fn pivot_keeps_first_appearance_order() {
        let table = toy();
        assert_eq!(table.rows(), &["CFR", "CFR_IN", "BR"]);
        assert_eq!(table.cols(), &["A", "B"]);
        assert_eq!(table.get("CFR_IN", "B"), Some(5.0));
        assert!(table.get("CFR", "missing").is_none());
    }

    #[test]
    fn missing_cells_are_nan() {
        let table = Table::pivot(vec![
            ("a".to_string(), "x".to_string(), 1.0),
            ("b".to_string(), "y".to_string(), 2.0),
        ]);
        assert!(table.get("a", "y").unwrap().is_nan());
        assert_eq!(nanmean(table.values[0].iter().copied()), 1.0);
    }

    #[test]
    fn avg_excludes_br_from_column_means() {
        let table = toy().with_avg();
        assert_eq!(table.get("avg", "A"), Some(2.0));
        assert_eq!(table.get("avg", "B"), Some(4.0));
        // row means still include BR, corner is the mean of col means
        assert_eq!(table.get("BR", "avg"), Some(6.0));
        assert_eq!(table.get("avg", "avg"), Some(3.0));
    }

    #[test]
    fn avg_col_is_row_means() {
        let table = toy().with_avg_col();
        assert_eq!(table.get("CFR", "avg"), Some(2.0));
        assert_eq!(table.get("BR", "avg"), Some(6.0));
    }

    #[test]
    fn br_fraction_spans_zero_to_one() {
        let table = toy().br_fraction().unwrap();
        assert!(table.rows().iter().all(|row| row != "BR"));
        assert_eq!(table.get("CFR", "A"), Some(0.0));
        assert_eq!(table.get("CFR_IN", "A"), Some(0.5));
        assert_eq!(table.get("avg", "A"), Some(0.25));
        assert_eq!(table.get("avg", "avg"), Some(0.25));
    }

    #[test]
    fn br_fraction_needs_a_br_row() {
        assert!(toy().without_br().br_fraction().is_err());
    }

    #[test]
    fn extrema_and_midpoint() {
        let table = toy();
        assert_eq!(table.max_element(), 7.0);
        assert_eq!(table.min_element(), 1.0);
        assert_eq!(table.midpoint(), 3.0);
        assert_eq!(table.mean_element(), 4.0);
    }

    #[test]
    fn sorted_puts_avg_before_br() {
        let table = toy().with_avg().sorted();
        assert_eq!(table.rows(), &["CFR", "CFR_IN", "avg", "BR"]);
        assert_eq!(table.get("CFR_IN", "B"), Some(5.0));
    }

    #[test]
    fn transpose_round_trips() {
        let table = toy();
        assert_eq!(table, table.transposed().transposed());
        assert_eq!(table.transposed().get("A", "BR"), Some(5.0));
    }

    #[test]
    fn renders_nan_as_dash() {
        let table = Table::pivot(vec![
            ("a".to_string(), "x".to_string(), 1.0),
            ("b".to_string(), "y".to_string(), 2.0),
        ]);
        let text = table.to_string();
        assert!(text.contains('-'));
        assert!(text.contains("1.000"));
    }
}
