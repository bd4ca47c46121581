use super::open_store;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use watchbook_config::{Config, PathManager};
use watchbook_core::{share, AdoptOutcome, SharedView};

pub fn run_open(
    paths: &PathManager,
    config: &Config,
    link: &str,
    adopt: Option<i64>,
    rating: Option<u8>,
    comment: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut store = open_store(paths, config)?;

    let code = share::extract_share_code(link, &config.share.param);
    let view = SharedView::from_share_param(&mut store, code.as_deref());
    let Some(owner) = view.owner().map(str::to_string) else {
        output.warn("That share link could not be read. Showing nothing shared.");
        return Ok(());
    };

    if let Some(id) = adopt {
        return report_adopt(view.adopt(&mut store, id, rating, comment)?, id, output);
    }

    let watched = store.watched();
    let movies = watched.watched_records();
    if !output.is_human() {
        output.json(&json!({ "name": owner, "movies": movies }));
        return Ok(());
    }

    output.info(format!("🎬 {}'s Movies ({})", owner, movies.len()));
    if movies.is_empty() {
        output.info("No movies in this list");
    } else {
        output.records_table(movies);
    }
    Ok(())
}

fn report_adopt(outcome: AdoptOutcome, id: i64, output: &Output) -> Result<()> {
    if !output.is_human() {
        let (status, movie) = match &outcome {
            AdoptOutcome::Added(record) => ("added", Some(record)),
            AdoptOutcome::AlreadyWatched => ("already_watched", None),
            AdoptOutcome::NotInSharedList => ("not_in_shared_list", None),
            AdoptOutcome::NotShared => ("not_shared", None),
        };
        output.json(&json!({ "id": id, "status": status, "movie": movie }));
        return Ok(());
    }

    match outcome {
        AdoptOutcome::Added(record) => {
            output.success(format!("\"{}\" added to your watched list!", record.title))
        }
        AdoptOutcome::AlreadyWatched => output.warn("Movie is already in your list!"),
        AdoptOutcome::NotInSharedList => {
            output.warn(format!("Movie {} is not in this shared list", id))
        }
        AdoptOutcome::NotShared => output.warn("No shared list is open"),
    }
    Ok(())
}
