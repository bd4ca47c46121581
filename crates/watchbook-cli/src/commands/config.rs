use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchbook_config::{Config, PathManager};

pub fn run_show(paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let store_dir = config
        .storage
        .store_dir
        .clone()
        .unwrap_or_else(|| paths.store_dir());

    if !output.is_human() {
        output.json(&json!({
            "config_file": paths.config_file(),
            "store_dir": store_dir,
            "share": { "base_url": config.share.base_url, "param": config.share.param },
            "logging": { "level": config.logging.level, "file": config.logging.file },
        }));
        return Ok(());
    }

    output.info(format!("Config file: {}", paths.config_file().display()));
    output.info(format!("Store:       {}", store_dir.display()));
    output.info(format!("Share links: {}?{}=...", config.share.base_url, config.share.param));
    output.info(format!("Log level:   {}", config.logging.level));
    if let Some(file) = &config.logging.file {
        output.info(format!("Log file:    {}", file.display()));
    }
    Ok(())
}

pub fn run_init(paths: &PathManager, force: bool, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_file.display()
        ));
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create directories: {}", e))?;
    Config::for_paths(paths)
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default config to {}", config_file.display()));
    Ok(())
}
