use super::convergence::Run;
use super::dataset::Dataset;
use super::dataset::Row;
use anyhow::Context;
use byteorder::BigEndian;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Read;
use std::io::Write;
use std::path::Path;

/// Signature header of a compiled dataset file.
const MAGIC: &[u8; 6] = b"TBNCH\n";
/// Bump when the record encoding changes.
const VERSION: u8 = 1;
/// Trailer marking a complete write.
const FOOTER: u16 = 0xFFFF;

/// Binary array-file persistence for compiled datasets: magic,
/// version, row block, run block, footer. Strings are u16
/// length-prefixed UTF-8, numerics are big-endian.
impl Dataset {
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        let ref mut w = std::io::BufWriter::new(file);
        w.write_all(MAGIC)?;
        w.write_u8(VERSION)?;
        w.write_u32::<BigEndian>(self.rows.len() as u32)?;
        for row in &self.rows {
            write_row(w, row)?;
        }
        w.write_u32::<BigEndian>(self.runs.len() as u32)?;
        for run in &self.runs {
            write_run(w, run)?;
        }
        w.write_u16::<BigEndian>(FOOTER)?;
        w.flush()?;
        Ok(())
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open {}", path.display()))?;
        let ref mut r = std::io::BufReader::new(file);
        let mut magic = [0u8; 6];
        r.read_exact(&mut magic).context("read magic")?;
        if &magic != MAGIC {
            return Err(anyhow::anyhow!("not a dataset file: {}", path.display()));
        }
        let version = r.read_u8()?;
        if version != VERSION {
            return Err(anyhow::anyhow!("unsupported dataset version: {}", version));
        }
        let mut dataset = Self::default();
        for _ in 0..r.read_u32::<BigEndian>()? {
            dataset.rows.push(read_row(r)?);
        }
        for _ in 0..r.read_u32::<BigEndian>()? {
            dataset.runs.push(read_run(r)?);
        }
        if r.read_u16::<BigEndian>()? != FOOTER {
            return Err(anyhow::anyhow!("truncated dataset file: {}", path.display()));
        }
        Ok(dataset)
    }

    pub fn to_json(&self, path: &Path) -> anyhow::Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("create {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open {}", path.display()))?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }
}

fn write_str<W: Write>(w: &mut W, s: &str) -> anyhow::Result<()> {
    w.write_u16::<BigEndian>(s.len() as u16)?;
    w.write_all(s.as_bytes())?;
    Ok(())
}

fn read_str<R: Read>(r: &mut R) -> anyhow::Result<String> {
    let n = r.read_u16::<BigEndian>()? as usize;
    let mut buf = vec![0u8; n];
    r.read_exact(&mut buf)?;
    Ok(String::from_utf8(buf)?)
}

fn write_seed<W: Write>(w: &mut W, seed: Option<u64>) -> anyhow::Result<()> {
    match seed {
        Some(seed) => {
            w.write_u8(1)?;
            w.write_u64::<BigEndian>(seed)?;
        }
        None => w.write_u8(0)?,
    }
    Ok(())
}

fn read_seed<R: Read>(r: &mut R) -> anyhow::Result<Option<u64>> {
    match r.read_u8()? {
        0 => Ok(None),
        1 => Ok(Some(r.read_u64::<BigEndian>()?)),
        flag => Err(anyhow::anyhow!("bad seed flag: {}", flag)),
    }
}

fn write_row<W: Write>(w: &mut W, row: &Row) -> anyhow::Result<()> {
    write_str(w, &row.game)?;
    write_str(w, &row.sampler)?;
    write_str(w, &row.mode)?;
    write_seed(w, row.seed)?;
    w.write_u64::<BigEndian>(row.t)?;
    write_str(w, &row.row_alg)?;
    write_str(w, &row.col_alg)?;
    w.write_f64::<BigEndian>(row.value)?;
    Ok(())
}

fn read_row<R: Read>(r: &mut R) -> anyhow::Result<Row> {
    Ok(Row {
        game: read_str(r)?,
        sampler: read_str(r)?,
        mode: read_str(r)?,
        seed: read_seed(r)?,
        t: r.read_u64::<BigEndian>()?,
        row_alg: read_str(r)?,
        col_alg: read_str(r)?,
        value: r.read_f64::<BigEndian>()?,
    })
}

fn write_run<W: Write>(w: &mut W, run: &Run) -> anyhow::Result<()> {
    write_str(w, &run.game)?;
    write_str(w, &run.sampler)?;
    write_str(w, &run.alg)?;
    write_seed(w, run.seed)?;
    write_str(w, &run.label)?;
    w.write_u8(run.is_rep as u8)?;
    w.write_u32::<BigEndian>(run.iterations.len() as u32)?;
    for t in &run.iterations {
        w.write_u64::<BigEndian>(*t)?;
    }
    w.write_u32::<BigEndian>(run.exploit_cur.len() as u32)?;
    for x in &run.exploit_cur {
        w.write_f64::<BigEndian>(*x)?;
    }
    w.write_u32::<BigEndian>(run.exploit_avg.len() as u32)?;
    for x in &run.exploit_avg {
        w.write_f64::<BigEndian>(*x)?;
    }
    w.write_u32::<BigEndian>(run.nodes_touched.len() as u32)?;
    for n in &run.nodes_touched {
        w.write_u64::<BigEndian>(*n)?;
    }
    Ok(())
}

fn read_run<R: Read>(r: &mut R) -> anyhow::Result<Run> {
    let game = read_str(r)?;
    let sampler = read_str(r)?;
    let alg = read_str(r)?;
    let seed = read_seed(r)?;
    let label = read_str(r)?;
    let is_rep = r.read_u8()? != 0;
    let mut iterations = Vec::new();
    for _ in 0..r.read_u32::<BigEndian>()? {
        iterations.push(r.read_u64::<BigEndian>()?);
    }
    let mut exploit_cur = Vec::new();
    for _ in 0..r.read_u32::<BigEndian>()? {
        exploit_cur.push(r.read_f64::<BigEndian>()?);
    }
    let mut exploit_avg = Vec::new();
    for _ in 0..r.read_u32::<BigEndian>()? {
        exploit_avg.push(r.read_f64::<BigEndian>()?);
    }
    let mut nodes_touched = Vec::new();
    for _ in 0..r.read_u32::<BigEndian>()? {
        nodes_touched.push(r.read_u64::<BigEndian>()?);
    }
    Ok(Run {
        game,
        sampler,
        alg,
        seed,
        label,
        is_rep,
        iterations,
        exploit_cur,
        exploit_avg,
        nodes_touched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset() -> Dataset {
        Dataset {
            rows: vec![
                Row {
                    game: "leduc".to_string(),
                    sampler: "null".to_string(),
                    mode: "fixed".to_string(),
                    seed: None,
                    t: 999,
                    row_alg: "CFR".to_string(),
                    col_alg: "CFR_IN".to_string(),
                    value: -0.125,
                },
                Row {
                    game: "goofspiel".to_string(),
                    sampler: "outcome".to_string(),
                    mode: "shuffled".to_string(),
                    seed: Some(7),
                    t: 0,
                    row_alg: "BR".to_string(),
                    col_alg: "CFR".to_string(),
                    value: 2.5,
                },
            ],
            runs: vec![Run {
                game: "leduc".to_string(),
                sampler: "null".to_string(),
                alg: "rm".to_string(),
                seed: Some(3),
                label: "RM".to_string(),
                is_rep: true,
                iterations: vec![10, 20],
                exploit_cur: vec![500., 125.],
                exploit_avg: vec![250., 62.5],
                nodes_touched: vec![],
            }],
        }
    }

    #[test]
    fn binary_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourney.tbd");
        let before = dataset();
        before.save(&path).unwrap();
        assert_eq!(before, Dataset::load(&path).unwrap());
    }

    #[test]
    fn json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourney.json");
        let before = dataset();
        before.to_json(&path).unwrap();
        assert_eq!(before, Dataset::from_json(&path).unwrap());
    }

    #[test]
    fn rejects_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.tbd");
        std::fs::write(&path, b"PGCOPY\nwhatever").unwrap();
        assert!(Dataset::load(&path).unwrap_err().to_string().contains("not a dataset"));
    }

    #[test]
    fn rejects_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tourney.tbd");
        dataset().save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::write(&path, &bytes[..bytes.len() - 1]).unwrap();
        assert!(Dataset::load(&path).is_err());
    }
}
