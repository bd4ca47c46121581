use crate::backend::KeyValueBackend;
use crate::error::Result;
use crate::store::PersistentStore;
use tracing::debug;
use watchbook_models::MovieRef;

pub const RECENTLY_VIEWED_CAPACITY: usize = 5;

/// Most-recent-first history of movies opened for details.
pub struct RecentlyViewed<'s, B: KeyValueBackend> {
    store: &'s mut PersistentStore<B>,
}

impl<B: KeyValueBackend> PersistentStore<B> {
    pub fn recently_viewed(&mut self) -> RecentlyViewed<'_, B> {
        RecentlyViewed { store: self }
    }
}

impl<'s, B: KeyValueBackend> RecentlyViewed<'s, B> {
    pub fn list(&self) -> &[MovieRef] {
        &self.store.recently_viewed
    }

    /// Move `movie` to the front, dropping any older entry for the same id and
    /// evicting past capacity.
    pub fn record_view(&mut self, movie: &MovieRef) -> Result<()> {
        let entries = &mut self.store.recently_viewed;
        entries.retain(|m| m.id != movie.id);
        entries.insert(0, movie.clone());
        entries.truncate(RECENTLY_VIEWED_CAPACITY);
        debug!("Recorded view of movie {} ({} recent)", movie.id, entries.len());

        self.store.persist_recently_viewed()
    }
}
