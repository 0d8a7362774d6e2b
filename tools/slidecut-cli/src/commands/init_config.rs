//! Write a default config file.

use std::path::PathBuf;

use slidecut_common::config::AppConfig;

pub fn run(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = super::config_path(path.as_deref());
    if path.exists() && !force {
        return Err(anyhow::anyhow!(
            "Config already exists at {} (use --force to overwrite)",
            path.display()
        ));
    }

    AppConfig::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
