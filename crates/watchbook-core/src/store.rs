use crate::backend::KeyValueBackend;
use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use watchbook_models::{MovieRef, WatchedRecord};

pub const WATCHED_KEY: &str = "watched";
pub const WATCHED_MOVIES_KEY: &str = "watchedMovies";
pub const RECENTLY_VIEWED_KEY: &str = "recentlyViewed";
pub const USER_NAME_KEY: &str = "userName";

/// Process-wide state: the four persisted collections mirrored in memory.
///
/// Opened once per process. Every mutation goes through one of the managers
/// ([`WatchedList`](crate::WatchedList), [`RecentlyViewed`](crate::RecentlyViewed))
/// and is flushed to the backend before the call returns, so there is nothing
/// to close.
pub struct PersistentStore<B: KeyValueBackend> {
    backend: B,
    pub(crate) watched_ids: Vec<i64>,
    pub(crate) watched_records: Vec<WatchedRecord>,
    pub(crate) recently_viewed: Vec<MovieRef>,
    pub(crate) user_name: Option<String>,
    /// Someone else's list shown in place of ours; never written to the backend
    pub(crate) shared_overlay: Option<Vec<WatchedRecord>>,
}

impl<B: KeyValueBackend> PersistentStore<B> {
    /// Load every collection from the backend, defaulting anything missing or corrupt.
    pub fn open(backend: B) -> Self {
        let watched_ids = dedup_by_id(
            load_json::<B, Vec<i64>>(&backend, WATCHED_KEY),
            |id| *id,
            WATCHED_KEY,
        );
        let watched_records = dedup_by_id(
            load_json::<B, Vec<WatchedRecord>>(&backend, WATCHED_MOVIES_KEY),
            |r| r.id,
            WATCHED_MOVIES_KEY,
        );
        let mut recently_viewed = dedup_by_id(
            load_json::<B, Vec<MovieRef>>(&backend, RECENTLY_VIEWED_KEY),
            |m| m.id,
            RECENTLY_VIEWED_KEY,
        );
        recently_viewed.truncate(crate::recent::RECENTLY_VIEWED_CAPACITY);
        let user_name = backend
            .get(USER_NAME_KEY)
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        info!(
            "Store opened: {} watched ids, {} watched movies, {} recently viewed",
            watched_ids.len(),
            watched_records.len(),
            recently_viewed.len()
        );

        Self {
            backend,
            watched_ids,
            watched_records,
            recently_viewed,
            user_name,
            shared_overlay: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    /// Remember the display name used for share links.
    pub fn set_user_name(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        self.backend.set(USER_NAME_KEY, name)?;
        self.user_name = Some(name.to_string()).filter(|n| !n.is_empty());
        Ok(())
    }

    pub(crate) fn persist_watched_ids(&mut self) -> Result<()> {
        save_json(&mut self.backend, WATCHED_KEY, &self.watched_ids)
    }

    pub(crate) fn persist_watched_records(&mut self) -> Result<()> {
        save_json(&mut self.backend, WATCHED_MOVIES_KEY, &self.watched_records)
    }

    pub(crate) fn persist_recently_viewed(&mut self) -> Result<()> {
        save_json(&mut self.backend, RECENTLY_VIEWED_KEY, &self.recently_viewed)
    }
}

fn load_json<B, T>(backend: &B, key: &str) -> T
where
    B: KeyValueBackend,
    T: DeserializeOwned + Default,
{
    let Some(content) = backend.get(key) else {
        return T::default();
    };

    match serde_json::from_str::<T>(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(
                "Stored data corrupted for {}: {}. Starting from an empty default.",
                key, e
            );
            T::default()
        }
    }
}

fn save_json<B, T>(backend: &mut B, key: &str, value: &T) -> Result<()>
where
    B: KeyValueBackend,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value)?;
    backend.set(key, &json)
}

/// Keep the first entry per id, preserving order.
fn dedup_by_id<T>(items: Vec<T>, id: impl Fn(&T) -> i64, key: &str) -> Vec<T> {
    let mut seen = HashSet::new();
    let before = items.len();
    let items: Vec<T> = items.into_iter().filter(|item| seen.insert(id(item))).collect();
    if items.len() != before {
        debug!("Dropped {} duplicate entries from {}", before - items.len(), key);
    }
    items
}
