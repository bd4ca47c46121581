use crate::backend::KeyValueBackend;
use crate::error::Result;
use crate::store::PersistentStore;
use tracing::{debug, info, warn};
use watchbook_models::{RecordCandidate, WatchedRecord};

/// Watched IDs and watched records, kept in agreement.
///
/// Callers go through [`mark_watched`](Self::mark_watched) and
/// [`unmark`](Self::unmark), which always touch both collections. The single
/// collection primitives stay crate-private.
pub struct WatchedList<'s, B: KeyValueBackend> {
    store: &'s mut PersistentStore<B>,
}

impl<B: KeyValueBackend> PersistentStore<B> {
    pub fn watched(&mut self) -> WatchedList<'_, B> {
        WatchedList { store: self }
    }
}

impl<'s, B: KeyValueBackend> WatchedList<'s, B> {
    pub fn watched_ids(&self) -> &[i64] {
        &self.store.watched_ids
    }

    pub fn is_watched(&self, id: i64) -> bool {
        self.store.watched_ids.contains(&id)
    }

    /// Records currently on display: the shared list while one is engaged,
    /// otherwise the user's own list. Insertion-ordered.
    pub fn watched_records(&self) -> &[WatchedRecord] {
        self.store
            .shared_overlay
            .as_deref()
            .unwrap_or(self.store.watched_records.as_slice())
    }

    /// The user's own persisted records, regardless of any shared overlay.
    pub fn own_records(&self) -> &[WatchedRecord] {
        &self.store.watched_records
    }

    pub fn record(&self, id: i64) -> Option<&WatchedRecord> {
        self.watched_records().iter().find(|r| r.id == id)
    }

    /// The `n` most recently added records, oldest first.
    pub fn latest(&self, n: usize) -> &[WatchedRecord] {
        let records = self.watched_records();
        &records[records.len().saturating_sub(n)..]
    }

    /// Mark a movie as watched, or update its rating/comment if it already is.
    ///
    /// A zero rating or empty comment on an already-watched movie leaves the
    /// stored value untouched.
    pub fn mark_watched(&mut self, candidate: RecordCandidate) -> Result<()> {
        let id = candidate.movie.id;
        self.all_or_nothing(|watched| {
            watched.add_watched_id(id)?;
            watched.upsert_watched_record(candidate)
        })?;
        info!("Marked movie {} as watched", id);
        Ok(())
    }

    /// Remove a movie from the watched list. No-op if it is not there.
    pub fn unmark(&mut self, id: i64) -> Result<()> {
        self.all_or_nothing(|watched| {
            watched.remove_watched_id(id)?;
            watched.remove_watched_record(id)
        })?;
        info!("Removed movie {} from watched list", id);
        Ok(())
    }

    /// Run `op` over both collections. If it fails, both are put back as they
    /// were, in memory and in the backend, and the original error is returned.
    fn all_or_nothing<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let ids = self.store.watched_ids.clone();
        let records = self.store.watched_records.clone();

        let result = op(self);
        if result.is_err() {
            self.store.watched_ids = ids;
            self.store.watched_records = records;
            for restored in [
                self.store.persist_watched_ids(),
                self.store.persist_watched_records(),
            ] {
                if let Err(e) = restored {
                    warn!("Failed to restore watched list after a write error: {}", e);
                }
            }
        }
        result
    }

    /// Show `records` in place of the user's list for this session only.
    pub(crate) fn replace_watched_records(&mut self, records: Vec<WatchedRecord>) {
        debug!("Substituting {} shared records (not persisted)", records.len());
        self.store.shared_overlay = Some(records);
    }

    /// Drop any shared records and show the user's own list again.
    pub(crate) fn restore_own_records(&mut self) {
        if self.store.shared_overlay.take().is_some() {
            debug!("Shared records dropped, showing own list");
        }
    }

    pub(crate) fn add_watched_id(&mut self, id: i64) -> Result<()> {
        if self.store.watched_ids.contains(&id) {
            return Ok(());
        }
        self.store.watched_ids.push(id);
        self.store.persist_watched_ids()
    }

    pub(crate) fn remove_watched_id(&mut self, id: i64) -> Result<()> {
        self.store.watched_ids.retain(|existing| *existing != id);
        self.store.persist_watched_ids()
    }

    pub(crate) fn upsert_watched_record(&mut self, candidate: RecordCandidate) -> Result<()> {
        let existing = self
            .store
            .watched_records
            .iter_mut()
            .find(|r| r.id == candidate.movie.id);

        match existing {
            Some(record) => {
                if let Some(rating) = candidate.effective_rating() {
                    record.rating = rating;
                }
                if let Some(comment) = candidate.effective_comment() {
                    record.comment = comment.to_string();
                }
                debug!(
                    "Updated watched movie {} (rating {}, comment {} chars)",
                    record.id,
                    record.rating,
                    record.comment.chars().count()
                );
            }
            None => {
                let record = candidate.into_record();
                debug!("Added watched movie {} ({})", record.id, record.title);
                self.store.watched_records.push(record);
            }
        }

        self.store.persist_watched_records()
    }

    pub(crate) fn remove_watched_record(&mut self, id: i64) -> Result<()> {
        self.store.watched_records.retain(|r| r.id != id);
        self.store.persist_watched_records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::error::StoreError;
    use crate::store::{WATCHED_KEY, WATCHED_MOVIES_KEY};
    use std::collections::BTreeSet;
    use watchbook_models::MovieRef;

    fn open() -> PersistentStore<MemoryBackend> {
        PersistentStore::open(MemoryBackend::new())
    }

    fn candidate(id: i64, title: &str) -> RecordCandidate {
        RecordCandidate::new(MovieRef::new(id, title))
    }

    /// Backend that rejects writes to one key.
    #[derive(Clone)]
    struct FailingBackend {
        inner: MemoryBackend,
        failing_key: &'static str,
    }

    impl FailingBackend {
        fn new(inner: MemoryBackend, failing_key: &'static str) -> Self {
            Self { inner, failing_key }
        }
    }

    impl KeyValueBackend for FailingBackend {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            if key == self.failing_key {
                return Err(StoreError::Backend(format!("write to {} refused", key)));
            }
            self.inner.set(key, value)
        }
    }

    fn assert_collections_agree<B: KeyValueBackend>(store: &mut PersistentStore<B>) {
        let watched = store.watched();
        let ids: BTreeSet<i64> = watched.watched_ids().iter().copied().collect();
        let record_ids: BTreeSet<i64> = watched.own_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, record_ids);
    }

    #[test]
    fn test_add_and_remove_ids_are_idempotent() {
        let mut store = open();
        let mut watched = store.watched();

        for id in [1, 2, 2, 3, 1] {
            watched.add_watched_id(id).unwrap();
        }
        for id in [2, 2, 9] {
            watched.remove_watched_id(id).unwrap();
        }

        assert_eq!(watched.watched_ids(), &[1, 3]);
    }

    /// Every add/remove sequence of length 4 over ids 1..=3 against a set model.
    #[test]
    fn test_id_set_matches_set_model_for_all_short_sequences() {
        // (add?, id)
        let ops: Vec<(bool, i64)> = [true, false]
            .into_iter()
            .flat_map(|add| (1..=3).map(move |id| (add, id)))
            .collect();
        let len = 4;

        for n in 0..ops.len().pow(len) {
            let mut store = open();
            let mut watched = store.watched();
            let mut model = BTreeSet::new();

            let mut rest = n;
            for _ in 0..len {
                let (add, id) = ops[rest % ops.len()];
                rest /= ops.len();
                if add {
                    watched.add_watched_id(id).unwrap();
                    model.insert(id);
                } else {
                    watched.remove_watched_id(id).unwrap();
                    model.remove(&id);
                }
            }

            let ids = watched.watched_ids();
            let as_set: BTreeSet<i64> = ids.iter().copied().collect();
            assert_eq!(as_set, model, "sequence #{}", n);
            assert_eq!(ids.len(), model.len(), "duplicate id after sequence #{}", n);
        }
    }

    /// Random-ish mark/unmark sequences keep the id set and record list in step.
    #[test]
    fn test_mark_unmark_sequences_keep_collections_in_agreement() {
        // Small LCG so the run is reproducible
        let mut seed: u64 = 0x5eed;
        let mut next = move || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (seed >> 33) as i64
        };

        for _ in 0..50 {
            let mut store = open();
            let mut model = BTreeSet::new();
            for _ in 0..12 {
                let id = next() % 4;
                if next() % 2 == 0 {
                    store.watched().mark_watched(candidate(id, "M")).unwrap();
                    model.insert(id);
                } else {
                    store.watched().unmark(id).unwrap();
                    model.remove(&id);
                }
                assert_collections_agree(&mut store);
            }
            let ids: BTreeSet<i64> = store.watched().watched_ids().iter().copied().collect();
            assert_eq!(ids, model);
        }
    }

    #[test]
    fn test_add_existing_id_does_not_write() {
        let mut store = PersistentStore::open(MemoryBackend::new().with_entry(WATCHED_KEY, "[1, 2]"));
        store.watched().add_watched_id(2).unwrap();
        // Stored text untouched: no rewrite happened
        assert_eq!(store.backend().get(WATCHED_KEY), Some("[1, 2]".to_string()));
    }

    #[test]
    fn test_remove_absent_id_still_writes() {
        let mut store = PersistentStore::open(MemoryBackend::new().with_entry(WATCHED_KEY, "[1, 2]"));
        store.watched().remove_watched_id(7).unwrap();
        assert_eq!(store.backend().get(WATCHED_KEY), Some("[1,2]".to_string()));
    }

    #[test]
    fn test_upsert_merges_instead_of_replacing() {
        let mut store = open();
        let mut watched = store.watched();

        watched
            .upsert_watched_record(candidate(1, "A").with_rating(0).with_comment(""))
            .unwrap();
        watched
            .upsert_watched_record(candidate(1, "A").with_rating(4).with_comment("Great"))
            .unwrap();

        let record = watched.record(1).unwrap();
        assert_eq!((record.rating, record.comment.as_str()), (4, "Great"));

        // Zero and empty never clear what is stored
        watched
            .upsert_watched_record(candidate(1, "A").with_rating(0).with_comment(""))
            .unwrap();
        let record = watched.record(1).unwrap();
        assert_eq!((record.rating, record.comment.as_str()), (4, "Great"));
        assert_eq!(watched.own_records().len(), 1);
    }

    #[test]
    fn test_upsert_updates_rating_and_comment_independently() {
        let mut store = open();
        let mut watched = store.watched();

        watched
            .upsert_watched_record(candidate(1, "A").with_rating(2).with_comment("meh"))
            .unwrap();
        watched.upsert_watched_record(candidate(1, "A").with_rating(5)).unwrap();
        let record = watched.record(1).unwrap();
        assert_eq!((record.rating, record.comment.as_str()), (5, "meh"));

        watched
            .upsert_watched_record(candidate(1, "A").with_comment("grew on me"))
            .unwrap();
        let record = watched.record(1).unwrap();
        assert_eq!((record.rating, record.comment.as_str()), (5, "grew on me"));
    }

    #[test]
    fn test_upsert_keeps_stored_identity_fields() {
        let mut store = open();
        let mut watched = store.watched();
        watched.upsert_watched_record(candidate(1, "Original")).unwrap();
        watched.upsert_watched_record(candidate(1, "Renamed").with_rating(3)).unwrap();
        assert_eq!(watched.record(1).unwrap().title, "Original");
    }

    #[test]
    fn test_upsert_appends_in_insertion_order() {
        let mut store = open();
        let mut watched = store.watched();
        for (id, title) in [(3, "C"), (1, "A"), (2, "B")] {
            watched.upsert_watched_record(candidate(id, title)).unwrap();
        }
        let ids: Vec<i64> = watched.watched_records().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
        assert_eq!(watched.latest(2).iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(watched.latest(10).len(), 3);
    }

    #[test]
    fn test_upsert_persists_on_every_call() {
        let mut store = open();
        store.watched().upsert_watched_record(candidate(1, "A")).unwrap();
        store
            .watched()
            .upsert_watched_record(candidate(1, "A").with_rating(3))
            .unwrap();

        let reopened = PersistentStore::open(
            MemoryBackend::new()
                .with_entry(WATCHED_MOVIES_KEY, &store.backend().get(WATCHED_MOVIES_KEY).unwrap()),
        );
        assert_eq!(reopened.watched_records[0].rating, 3);
    }

    #[test]
    fn test_mark_and_unmark_keep_collections_in_agreement() {
        let mut store = open();

        store.watched().mark_watched(candidate(1, "A")).unwrap();
        store.watched().mark_watched(candidate(2, "B").with_rating(4)).unwrap();
        store.watched().mark_watched(candidate(1, "A").with_comment("again")).unwrap();
        assert_collections_agree(&mut store);
        assert_eq!(store.watched().own_records().len(), 2);

        store.watched().unmark(1).unwrap();
        store.watched().unmark(1).unwrap();
        store.watched().unmark(42).unwrap();
        assert_collections_agree(&mut store);
        assert_eq!(store.watched().watched_ids(), &[2]);
        assert!(!store.watched().is_watched(1));
    }

    #[test]
    fn test_replace_is_not_persisted() {
        let mut store = open();
        store.watched().mark_watched(candidate(1, "Mine")).unwrap();
        let before = store.backend().get(WATCHED_MOVIES_KEY);

        let foreign = candidate(99, "Theirs").into_record();
        store.watched().replace_watched_records(vec![foreign]);

        let watched = store.watched();
        assert_eq!(watched.watched_records()[0].id, 99);
        assert_eq!(watched.own_records()[0].id, 1);
        assert_eq!(store.backend().get(WATCHED_MOVIES_KEY), before);
    }

    #[test]
    fn test_failed_mark_leaves_both_collections_untouched() {
        let backend = FailingBackend::new(MemoryBackend::new(), WATCHED_MOVIES_KEY);
        let mut store = PersistentStore::open(backend);

        let result = store.watched().mark_watched(candidate(7, "X"));
        assert!(matches!(result, Err(StoreError::Backend(_))));

        assert!(!store.watched().is_watched(7));
        assert!(store.watched().own_records().is_empty());
        assert_collections_agree(&mut store);

        // The id written before the failure was rolled back as well
        let mut reopened = PersistentStore::open(store.backend().clone());
        let watched = reopened.watched();
        assert_eq!(watched.is_watched(7), watched.record(7).is_some());
        assert!(watched.watched_ids().is_empty());
    }

    #[test]
    fn test_failed_update_keeps_previous_rating() {
        let seeded = MemoryBackend::new().with_entry(WATCHED_KEY, "[7]").with_entry(
            WATCHED_MOVIES_KEY,
            r#"[{"id":7,"title":"X","release_date":"","poster_path":null,"rating":3,"comment":"ok"}]"#,
        );
        let mut store = PersistentStore::open(FailingBackend::new(seeded, WATCHED_MOVIES_KEY));

        assert!(store
            .watched()
            .mark_watched(candidate(7, "X").with_rating(5).with_comment("better"))
            .is_err());

        let watched = store.watched();
        let record = watched.record(7).unwrap();
        assert_eq!((record.rating, record.comment.as_str()), (3, "ok"));
        assert_eq!(watched.watched_ids(), &[7]);
    }

    #[test]
    fn test_failed_unmark_restores_the_id() {
        let seeded = MemoryBackend::new().with_entry(WATCHED_KEY, "[7]").with_entry(
            WATCHED_MOVIES_KEY,
            r#"[{"id":7,"title":"X","release_date":"","poster_path":null,"rating":0,"comment":""}]"#,
        );
        let mut store = PersistentStore::open(FailingBackend::new(seeded, WATCHED_MOVIES_KEY));

        assert!(store.watched().unmark(7).is_err());
        assert!(store.watched().is_watched(7));
        assert_collections_agree(&mut store);
        assert_eq!(store.backend().get(WATCHED_KEY), Some("[7]".to_string()));

        let mut reopened = PersistentStore::open(store.backend().clone());
        let watched = reopened.watched();
        assert!(watched.is_watched(7));
        assert!(watched.record(7).is_some());
    }
}
