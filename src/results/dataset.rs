use super::convergence::Run;
use super::matchup;
use crate::Utility;
use crate::experiment::Experiment;
use anyhow::Context;
use std::path::Path;
use std::path::PathBuf;

/// One flattened tournament record, the unit the analysis layer
/// pivots. Identity fields come from the result file's dotted name,
/// the rest from one parsed matchup cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub game: String,
    pub sampler: String,
    pub mode: String,
    pub seed: Option<u64>,
    pub t: u64,
    pub row_alg: String,
    pub col_alg: String,
    pub value: Utility,
}

/// All parsed results stacked into one table, plus the convergence
/// runs that rode along in the same directory.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dataset {
    pub rows: Vec<Row>,
    pub runs: Vec<Run>,
}

enum Parsed {
    Rows(Vec<Row>),
    Run(Run),
}

impl Dataset {
    /// Compile result files into one dataset. With no explicit inputs,
    /// every `*.txt` under `dir` is taken. Files named `*.gen.txt`
    /// parse as convergence runs, everything else as matchup streams
    /// whose identity is the dotted file stem.
    pub fn compile(dir: &Path, inputs: &[PathBuf]) -> anyhow::Result<Self> {
        use indicatif::ParallelProgressIterator;
        use rayon::prelude::*;
        let files = match inputs.is_empty() {
            true => Self::scan(dir)?,
            false => inputs.to_vec(),
        };
        if files.is_empty() {
            return Err(anyhow::anyhow!("no result files under {}", dir.display()));
        }
        let parsed = files
            .par_iter()
            .progress_count(files.len() as u64)
            .map(|path| Self::ingest(path).with_context(|| path.display().to_string()))
            .collect::<anyhow::Result<Vec<Parsed>>>()?;
        let mut dataset = Self::default();
        for file in parsed {
            match file {
                Parsed::Rows(mut rows) => dataset.rows.append(&mut rows),
                Parsed::Run(run) => dataset.runs.push(run),
            }
        }
        dataset.runs.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(dataset)
    }

    fn scan(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
        let mut files = std::fs::read_dir(dir)
            .with_context(|| format!("scan {}", dir.display()))?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect::<Vec<PathBuf>>();
        files.sort();
        Ok(files)
    }

    fn ingest(path: &Path) -> anyhow::Result<Parsed> {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("unreadable file name"))?;
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        if name.ends_with(".gen.txt") {
            Ok(Parsed::Run(Run::parse(name, reader)?))
        } else {
            let stem = name.strip_suffix(".txt").unwrap_or(name);
            let x = Experiment::try_from(stem)?;
            let cells = matchup::parse(reader)?;
            Ok(Parsed::Rows(
                cells
                    .into_iter()
                    .map(|cell| Row {
                        game: x.game.to_string(),
                        sampler: x.sampler.to_string(),
                        mode: x.mode.to_string(),
                        seed: x.seed,
                        t: cell.t,
                        row_alg: cell.row,
                        col_alg: cell.col,
                        value: cell.value,
                    })
                    .collect(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCHUP: &str = "\
learner/env  CFR  CFR_IN
t = 0
CFR  (0.5, 1) (0.25, 1)
CFR_IN  (0.125, 1) (0.75, 1)
BR  (2, 1) (1.5, 1)
";

    const GEN: &str = "10: 0.5, 0.25\n";

    #[test]
    fn compiles_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ltbr-cfr.leduc.null.fixed.txt"), MATCHUP).unwrap();
        std::fs::write(dir.path().join("leduc.null.rm.gen.txt"), GEN).unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();
        let dataset = Dataset::compile(dir.path(), &[]).unwrap();
        assert_eq!(dataset.rows.len(), 6);
        assert_eq!(dataset.runs.len(), 1);
        let row = &dataset.rows[0];
        assert_eq!(row.game, "leduc");
        assert_eq!(row.sampler, "null");
        assert_eq!(row.mode, "fixed");
        assert_eq!(row.seed, None);
    }

    #[test]
    fn explicit_inputs_override_scan() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("ltbr.leduc.null.fixed.txt");
        std::fs::write(&keep, MATCHUP).unwrap();
        std::fs::write(dir.path().join("ltbr.leduc.null.sim.txt"), MATCHUP).unwrap();
        let dataset = Dataset::compile(dir.path(), &[keep]).unwrap();
        assert_eq!(dataset.rows.len(), 6);
        assert!(dataset.rows.iter().all(|row| row.mode == "fixed"));
    }

    #[test]
    fn shuffled_seed_rides_along() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("efr.leduc.external.shuffled.7.txt"), MATCHUP).unwrap();
        let dataset = Dataset::compile(dir.path(), &[]).unwrap();
        assert!(dataset.rows.iter().all(|row| row.seed == Some(7)));
    }

    #[test]
    fn empty_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Dataset::compile(dir.path(), &[]).is_err());
    }

    #[test]
    fn bad_file_names_the_culprit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ltbr.leduc.null.fixed.txt"), "garbage").unwrap();
        let err = Dataset::compile(dir.path(), &[]).unwrap_err();
        assert!(format!("{:#}", err).contains("ltbr.leduc.null.fixed.txt"));
    }
}
