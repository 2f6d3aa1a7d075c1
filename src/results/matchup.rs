use crate::Utility;
use anyhow::Context;
use std::io::BufRead;

/// One entry of a tournament matchup stream: the expected value (and
/// wall time) of `row` playing against a pool anchored on `col`,
/// observed after iteration `t`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub t: u64,
    pub row: String,
    pub col: String,
    pub value: Utility,
    pub millis: f64,
}

/// Parse the stdout of a tournament run.
///
/// The stream opens with `learner/env  <COL> <COL> ...`, then repeats
/// blocks of `t = <n>` followed by one line per row algorithm:
/// `<ROW>  (<value>, <millis>) (<value>, <millis>) ...` with exactly
/// one pair per header column. Fixed-mode streams carry a trailing
/// `BR` row per block.
pub fn parse<R: BufRead>(reader: R) -> anyhow::Result<Vec<Cell>> {
    let mut lines = reader.lines();
    let header = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("empty matchup stream"))?
        .context("read matchup header")?;
    let cols = header
        .split_whitespace()
        .skip(1)
        .map(String::from)
        .collect::<Vec<String>>();
    if cols.is_empty() {
        return Err(anyhow::anyhow!("matchup header names no columns: {}", header));
    }
    let mut cells = Vec::new();
    let mut t = None;
    for line in lines {
        let line = line.context("read matchup line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(rest) = line.strip_prefix("t =") {
            let next = rest.trim().parse::<u64>().context("iteration marker")?;
            if t.is_some_and(|t| next <= t) {
                return Err(anyhow::anyhow!("iteration markers must increase at t = {}", next));
            }
            t = Some(next);
            continue;
        }
        let t = t.ok_or_else(|| anyhow::anyhow!("row before any iteration marker: {}", line))?;
        let (row, rest) = line
            .split_once(char::is_whitespace)
            .ok_or_else(|| anyhow::anyhow!("malformed matchup row: {}", line))?;
        let pairs = pairs(rest).with_context(|| format!("row {}", row))?;
        if pairs.len() != cols.len() {
            return Err(anyhow::anyhow!(
                "row {} has {} entries, expected {}",
                row,
                pairs.len(),
                cols.len()
            ));
        }
        for (col, (value, millis)) in cols.iter().zip(pairs) {
            cells.push(Cell {
                t,
                row: row.to_string(),
                col: col.clone(),
                value,
                millis,
            });
        }
    }
    Ok(cells)
}

/// Scan `(value, millis)` groups off a row tail.
fn pairs(tail: &str) -> anyhow::Result<Vec<(Utility, f64)>> {
    let mut pairs = Vec::new();
    for group in tail.split(')') {
        let group = group.trim();
        if group.is_empty() {
            continue;
        }
        let group = group
            .strip_prefix('(')
            .ok_or_else(|| anyhow::anyhow!("expected '(' before: {}", group))?;
        let (value, millis) = group
            .split_once(',')
            .ok_or_else(|| anyhow::anyhow!("expected ',' inside: ({})", group))?;
        pairs.push((
            value.trim().parse().context("matchup value")?,
            millis.trim().parse().context("matchup millis")?,
        ));
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const STREAM: &str = "\
learner/env  CFR  CFR_EX+IN
t = 0
CFR  (0.5, 1.25) (-0.25, 2)
CFR_EX+IN  (1e-3, 0.5) (0, 0.75)
BR  (2, 10) (1.5, 12)
t = 1
CFR  (0.25, 1) (-0.125, 2)
CFR_EX+IN  (5e-4, 0.5) (0, 0.5)
BR  (1.9, 9) (1.4, 11)
";

    #[test]
    fn parses_blocks_and_br_rows() {
        let cells = parse(STREAM.as_bytes()).unwrap();
        assert_eq!(cells.len(), 12);
        assert_eq!(cells[0].row, "CFR");
        assert_eq!(cells[0].col, "CFR");
        assert_eq!(cells[0].value, 0.5);
        assert_eq!(cells[0].millis, 1.25);
        let br = cells.iter().find(|c| c.row == "BR" && c.t == 1).unwrap();
        assert_eq!(br.value, 1.9);
        assert!(cells.iter().all(|c| c.t < 2));
    }

    #[test]
    fn parses_scientific_notation() {
        let cells = parse(STREAM.as_bytes()).unwrap();
        let cell = cells
            .iter()
            .find(|c| c.row == "CFR_EX+IN" && c.col == "CFR" && c.t == 0)
            .unwrap();
        assert_eq!(cell.value, 1e-3);
    }

    #[test]
    fn rejects_column_mismatch() {
        let bad = "learner/env  A  B\nt = 0\nA  (1, 2)\n";
        let err = parse(bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("expected 2"));
    }

    #[test]
    fn rejects_rows_before_marker() {
        let bad = "learner/env  A\nA  (1, 2)\n";
        assert!(parse(bad.as_bytes()).is_err());
    }

    #[test]
    fn rejects_decreasing_markers() {
        let bad = "learner/env  A\nt = 1\nA  (1, 2)\nt = 1\nA  (1, 2)\n";
        assert!(parse(bad.as_bytes()).is_err());
    }

    #[test]
    fn rejects_empty_stream() {
        assert!(parse("".as_bytes()).is_err());
        assert!(parse("learner/env\n".as_bytes()).is_err());
    }
}
