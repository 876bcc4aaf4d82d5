use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured filter directive.
pub const LOG_ENV: &str = "PTOP_LOG";

/// Where log lines go.
#[derive(Debug, Clone, Copy)]
pub enum LogTarget<'a> {
    /// Appends to a file; used while the terminal is owned by the UI.
    File(&'a Path),
    Stderr,
}

pub fn init(target: LogTarget<'_>, default_directive: &str) -> Result<()> {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| eyre!("invalid log filter: {e}"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let result = match target {
        LogTarget::File(path) => {
            let file = Arc::new(open_log_file(path)?);
            builder.with_ansi(false).with_writer(file).try_init()
        }
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
    };

    result.map_err(|e| eyre!("failed to set tracing subscriber: {e}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    ensure_parent_dir(path)?;
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
