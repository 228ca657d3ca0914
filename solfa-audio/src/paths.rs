use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Resolve the sample library directory.
///
/// Fallback chain:
/// 1. `--samples` on the command line
/// 2. `SOLFA_SAMPLES_DIR` env var
/// 3. `audio.samples_dir` from the config file
/// 4. `~/.config/solfa/samples` when it exists
///
/// `None` means sampled instruments are unavailable and playback starts at
/// the synthesizer.
pub fn samples_dir(cli: Option<&Path>, configured: Option<&Path>) -> Option<PathBuf> {
    resolve(
        cli,
        std::env::var_os("SOLFA_SAMPLES_DIR"),
        configured,
        user_samples_dir().filter(|d| d.is_dir()),
    )
}

fn resolve(
    cli: Option<&Path>,
    env: Option<OsString>,
    configured: Option<&Path>,
    user: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(dir) = cli {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = env.filter(|d| !d.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    if let Some(dir) = configured {
        return Some(dir.to_path_buf());
    }
    user
}

/// User-local sample library (`~/.config/solfa/samples/`).
pub fn user_samples_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("solfa").join("samples"))
}
