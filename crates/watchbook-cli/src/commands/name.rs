use super::open_store;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use watchbook_config::{Config, PathManager};

pub fn run_name(paths: &PathManager, config: &Config, set: Option<String>, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;

    if let Some(name) = set {
        if name.trim().is_empty() {
            return Err(eyre!("Display name cannot be empty"));
        }
        store.set_user_name(&name)?;
    }

    let name = store.user_name();
    if !output.is_human() {
        output.json(&json!({ "name": name }));
        return Ok(());
    }

    match name {
        Some(name) => output.info(format!("Sharing as: {}", name)),
        None => output.info("No display name yet. You'll be asked the first time you share."),
    }
    Ok(())
}
