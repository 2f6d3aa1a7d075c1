use super::id::Experiment;
use anyhow::Context;
use std::path::Path;
use std::path::PathBuf;

/// Run one experiment, capturing solver stdout into
/// `<out_dir>/<id>.txt`. Returns the capture path.
///
/// Solver stderr passes through so its own progress output stays
/// visible. A non-zero exit status is an error.
pub fn run(
    x: &Experiment,
    exe_dir: &Path,
    out_dir: &Path,
    sif: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("create output directory {}", out_dir.display()))?;
    let path = out_dir.join(format!("{}.txt", x));
    let capture = std::fs::File::create(&path)
        .with_context(|| format!("create capture file {}", path.display()))?;
    log::info!("{}", x.rendered(exe_dir, sif));
    let clock = std::time::Instant::now();
    let status = x
        .command(exe_dir, sif)
        .stdout(std::process::Stdio::from(capture))
        .status()
        .with_context(|| format!("spawn {}", x.mode.executable()))?;
    if !status.success() {
        return Err(anyhow::anyhow!("{} exited with {}", x.mode.executable(), status));
    }
    log::info!("{} finished in {:?}", x, clock.elapsed());
    Ok(path)
}
