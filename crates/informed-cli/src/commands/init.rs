use std::path::Path;

use anyhow::{bail, Result};

use informed_core::AppConfig;

pub fn run(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::default().save(path)?;
    println!("Wrote default configuration to {}", path.display());

    Ok(())
}
