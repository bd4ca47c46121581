use super::open_store;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use watchbook_config::{Config, PathManager};
use watchbook_models::MovieRef;

pub fn run_view(paths: &PathManager, config: &Config, movie: MovieRef, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;
    store.recently_viewed().record_view(&movie)?;

    let watched = store.watched().record(movie.id).cloned();
    if !output.is_human() {
        output.json(&json!({ "movie": movie, "watched": watched }));
        return Ok(());
    }

    match movie.release_year() {
        Some(year) => output.info(format!("{} ({})", movie.title, year)),
        None => output.info(&movie.title),
    }
    if let Some(record) = watched {
        output.records_table(std::slice::from_ref(&record));
    } else {
        output.info(format!(
            "Not watched yet. Add it with: watchbook watched add --id {} --title {:?}",
            movie.id, movie.title
        ));
    }
    Ok(())
}

pub fn run_list(paths: &PathManager, config: &Config, output: &Output) -> Result<()> {
    let mut store = open_store(paths, config)?;
    let recent = store.recently_viewed();
    let movies = recent.list();

    if !output.is_human() {
        output.json(&json!({ "movies": movies }));
        return Ok(());
    }

    if movies.is_empty() {
        output.info("No recent views");
        return Ok(());
    }
    output.movies_table(movies);
    Ok(())
}
