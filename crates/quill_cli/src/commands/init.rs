//! Init command implementation

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::config::WalkConfig;

/// Writes the default `.quill.jsonc` into `dir` and returns its path.
pub fn run_init(dir: &Path, force: bool) -> Result<PathBuf> {
    if let Some(existing) = WalkConfig::discover(dir) {
        if !force {
            return Err(miette::miette!(
                "{} already exists. Use --force to overwrite.",
                existing.display()
            ));
        }
        warn!("Overwriting {}", existing.display());
    }

    let path = dir.join(WalkConfig::CONFIG_FILES[0]);
    if force {
        remove_if_present(&path).into_diagnostic()?;
    }
    create_config(&path).into_diagnostic()?;

    info!("Created {}", path.display());
    Ok(path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Creates the file, refusing to follow a symlink at `path`.
fn create_config(path: &Path) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.custom_flags(libc::O_NOFOLLOW);
    }

    options
        .open(path)?
        .write_all(WalkConfig::DEFAULT_CONTENTS.as_bytes())
}
