use anyhow::Context;
use std::io::BufRead;

/// Display label for a convergence-run algorithm tag.
pub fn alg_label(tag: &str) -> &str {
    match tag {
        "rm" => "RM",
        "hedge_s" => "S-Hedge",
        "hedge_m" => "M-Hedge",
        "hedge_h" => "H-Hedge",
        "hedge_k" => "K-Hedge",
        "ada_normal_hedge" => "AdaNormalHedge",
        "simple_ada_normal_hedge" => "SimpleANH",
        "max_simple_ada_normal_hedge" => "MaxSANH",
        "elm_mu" => "MU-ELM",
        _ => tag,
    }
}

/// One parsed convergence file: the exploitability trajectory of a
/// single algorithm run, identified by its dotted file name
/// `<game>.<sampler>.<alg>[.<seed>].gen.txt`.
///
/// Exploitabilities are stored in milli-units (scaled x1000 on load).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Run {
    pub game: String,
    pub sampler: String,
    pub alg: String,
    pub seed: Option<u64>,
    pub label: String,
    pub is_rep: bool,
    pub iterations: Vec<u64>,
    pub exploit_cur: Vec<f64>,
    pub exploit_avg: Vec<f64>,
    pub nodes_touched: Vec<u64>,
}

impl Run {
    /// Parse a convergence file. Lines opening with `#` are comments;
    /// data lines are `t: cur, avg[, nodes]`.
    pub fn parse<R: BufRead>(name: &str, reader: R) -> anyhow::Result<Self> {
        let fields = name.split('.').collect::<Vec<&str>>();
        if fields.len() < 3 {
            return Err(anyhow::anyhow!(
                "convergence file needs game.sampler.alg[.seed].gen.txt: {}",
                name
            ));
        }
        let seed = fields.get(3).and_then(|f| f.parse().ok());
        let mut run = Self {
            game: fields[0].to_string(),
            sampler: fields[1].to_string(),
            alg: fields[2].to_string(),
            seed,
            label: alg_label(fields[2]).to_string(),
            is_rep: seed.is_some(),
            iterations: Vec::new(),
            exploit_cur: Vec::new(),
            exploit_avg: Vec::new(),
            nodes_touched: Vec::new(),
        };
        for line in reader.lines() {
            let line = line.context("read convergence line")?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (t, data) = line
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("malformed convergence line: {}", line))?;
            run.iterations.push(t.trim().parse().context("iteration count")?);
            let data = data.split(',').map(str::trim).collect::<Vec<&str>>();
            if data.len() < 2 {
                return Err(anyhow::anyhow!("convergence line needs cur, avg: {}", line));
            }
            run.exploit_cur
                .push(data[0].parse::<f64>().context("current exploitability")? * 1000.);
            run.exploit_avg
                .push(data[1].parse::<f64>().context("average exploitability")? * 1000.);
            if let Some(nodes) = data.get(2) {
                run.nodes_touched.push(nodes.parse().context("nodes touched")?);
            }
        }
        Ok(run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &str = "\
# t: exploitability_cur, exploitability_avg, nodes_touched
10: 0.5, 0.25, 1200
20: 0.125, 0.0625, 2400
";

    #[test]
    fn parses_and_scales() {
        let run = Run::parse("leduc.null.rm.gen.txt", FILE.as_bytes()).unwrap();
        assert_eq!(run.game, "leduc");
        assert_eq!(run.sampler, "null");
        assert_eq!(run.alg, "rm");
        assert_eq!(run.label, "RM");
        assert_eq!(run.seed, None);
        assert!(!run.is_rep);
        assert_eq!(run.iterations, vec![10, 20]);
        assert_eq!(run.exploit_cur, vec![500., 125.]);
        assert_eq!(run.exploit_avg, vec![250., 62.5]);
        assert_eq!(run.nodes_touched, vec![1200, 2400]);
    }

    #[test]
    fn seed_component_marks_repetition() {
        let run = Run::parse("goofspiel3.outcome.hedge_s.17.gen.txt", FILE.as_bytes()).unwrap();
        assert_eq!(run.seed, Some(17));
        assert!(run.is_rep);
        assert_eq!(run.label, "S-Hedge");
    }

    #[test]
    fn nodes_column_is_optional() {
        let run = Run::parse("leduc.null.rm.gen.txt", "5: 1, 2\n".as_bytes()).unwrap();
        assert!(run.nodes_touched.is_empty());
        assert_eq!(run.exploit_cur, vec![1000.]);
    }

    #[test]
    fn unknown_alg_labels_as_itself() {
        let run = Run::parse("leduc.null.mystery.gen.txt", "".as_bytes()).unwrap();
        assert_eq!(run.label, "mystery");
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(Run::parse("leduc.null.rm.gen.txt", "nonsense\n".as_bytes()).is_err());
        assert!(Run::parse("leduc.null.rm.gen.txt", "5: 1\n".as_bytes()).is_err());
        assert!(Run::parse("short", "".as_bytes()).is_err());
    }
}
