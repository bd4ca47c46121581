use super::open_store;
use crate::output::{stars, Output};
use color_eyre::Result;
use serde_json::json;
use watchbook_config::{Config, PathManager};
use watchbook_models::{MovieRef, RecordCandidate};

pub fn run_list(paths: &PathManager, config: &Config, latest: Option<usize>, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;
    let watched = store.watched();
    let all = watched.watched_records();
    let records = match latest {
        Some(n) => watched.latest(n),
        None => all,
    };

    if !output.is_human() {
        output.json(&json!({ "total": all.len(), "movies": records }));
        return Ok(());
    }

    if records.is_empty() {
        output.info("No movies watched yet");
        return Ok(());
    }

    output.info(format!("My Movies ({})", all.len()));
    output.records_table(records);
    Ok(())
}

pub fn run_add(
    paths: &PathManager,
    config: &Config,
    movie: MovieRef,
    rating: Option<u8>,
    comment: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut store = open_store(paths, config)?;
    let title = movie.title.clone();
    let id = movie.id;

    let mut candidate = RecordCandidate::new(movie);
    if let Some(rating) = rating {
        candidate = candidate.with_rating(rating);
    }
    if let Some(comment) = comment {
        candidate = candidate.with_comment(comment);
    }

    let mut watched = store.watched();
    let already_watched = watched.is_watched(id);
    watched.mark_watched(candidate)?;

    let stored = watched.record(id).cloned();
    if !output.is_human() {
        output.json(&json!({ "updated": already_watched, "movie": stored }));
        return Ok(());
    }

    if already_watched {
        output.success(format!("Updated \"{}\" in your watched list", title));
    } else {
        output.success(format!("\"{}\" added to your watched list!", title));
    }
    if let Some(record) = stored.filter(|r| r.is_rated()) {
        output.info(format!("  {} {}/5", stars(record.rating), record.rating));
    }
    Ok(())
}

pub fn run_remove(paths: &PathManager, config: &Config, id: i64, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;
    let mut watched = store.watched();
    let removed = watched.record(id).map(|r| r.title.clone());
    watched.unmark(id)?;

    if !output.is_human() {
        output.json(&json!({ "id": id, "removed": removed.is_some() }));
        return Ok(());
    }

    match removed {
        Some(title) => output.success(format!("Removed \"{}\" from your watched list", title)),
        None => output.warn(format!("Movie {} is not on your watched list", id)),
    }
    Ok(())
}
