//! Utilities: logging setup (verbosity flags -> tracing filter) and data
//! directory bootstrap.
//!
//! Key items:
//!   init_logging / derive_level
//!   create_dir_if_needed

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Map `-v` count and `-q` to a level. Quiet wins.
pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Install a stderr fmt subscriber. `RUST_LOG` takes precedence when set.
/// Safe to call more than once; later calls are ignored.
pub fn init_logging(level: LevelFilter) {
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Create `dir` (one level) with permission bits `mode` unless it exists.
pub fn create_dir_if_needed(dir: &Path, mode: u32) -> Result<()> {
    if fs::metadata(dir).is_ok() {
        return Ok(());
    }
    fs::create_dir(dir).with_context(|| {
        format!("unable to create dir '{}' with permissions {mode:o}", dir.display())
    })?;
    set_mode(dir, mode).with_context(|| {
        format!("unable to chmod dir '{}' with permissions {mode:o}", dir.display())
    })?;
    tracing::debug!(dir = %dir.display(), mode = %format!("{mode:o}"), "created directory");
    Ok(())
}

#[cfg(unix)]
fn set_mode(dir: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(dir, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(_dir: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}
