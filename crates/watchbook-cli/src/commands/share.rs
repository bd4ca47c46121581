use super::open_store;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use dialoguer::Input;
use serde_json::json;
use watchbook_config::{Config, PathManager};
use watchbook_core::{prepare_share, share, ShareReadiness};

pub fn run_share(paths: &PathManager, config: &Config, name: Option<String>, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;

    let owner = match (prepare_share(&mut store), name) {
        (ShareReadiness::NothingToShare, _) => {
            output.warn("Add some movies to your watched list first!");
            return Ok(());
        }
        (_, Some(name)) if !name.trim().is_empty() => {
            store.set_user_name(&name)?;
            name.trim().to_string()
        }
        (ShareReadiness::Ready(saved), _) => saved,
        (ShareReadiness::NeedsName, _) => {
            let name = prompt_name()?;
            store.set_user_name(&name)?;
            output.info("We'll remember this for future shares!");
            name
        }
    };

    let records = store.watched().own_records().to_vec();
    let url = share::share_url(&config.share.base_url, &config.share.param, &owner, &records);
    tracing::info!("Share link created for {} movies ({} chars)", records.len(), url.len());

    if !output.is_human() {
        output.json(&json!({ "name": owner, "movies": records.len(), "url": url }));
        return Ok(());
    }

    output.success(format!("Share link for {}'s {} movies:", owner, records.len()));
    println!("{}", url);
    Ok(())
}

fn prompt_name() -> Result<String> {
    let name: String = Input::new()
        .with_prompt("What's your name?")
        .validate_with(|input: &String| -> std::result::Result<(), &str> {
            if input.trim().is_empty() {
                Err("Please enter your name")
            } else {
                Ok(())
            }
        })
        .interact_text()
        .map_err(|e| eyre!("Failed to read name: {}", e))?;
    Ok(name.trim().to_string())
}
