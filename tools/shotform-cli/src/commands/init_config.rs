//! Write the default configuration file.

use shotform_common::config::{config_file_path, AppConfig};

pub fn run(force: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if path.exists() && !force {
        println!("Config already exists at: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
        return Ok(());
    }

    let written = AppConfig::default()
        .save()
        .map_err(|e| anyhow::anyhow!("Failed to write config: {e}"))?;

    println!("Config written to: {}", written.display());
    Ok(())
}
