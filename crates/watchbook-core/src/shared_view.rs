use crate::backend::KeyValueBackend;
use crate::error::Result;
use crate::share;
use crate::store::PersistentStore;
use tracing::{info, warn};
use watchbook_models::{RecordCandidate, SharedList, WatchedRecord};

/// Whether this session is looking at someone else's list.
///
/// Session-local: nothing here is persisted, and the user's own list stays
/// intact underneath the shared one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedView {
    owner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdoptOutcome {
    Added(WatchedRecord),
    AlreadyWatched,
    NotInSharedList,
    /// No shared list is engaged
    NotShared,
}

impl SharedView {
    /// A normal session showing the user's own list. Any shared list engaged
    /// earlier is dropped from the store.
    pub fn disengaged<B: KeyValueBackend>(store: &mut PersistentStore<B>) -> Self {
        store.watched().restore_own_records();
        Self { owner: None }
    }

    /// Show `shared` in place of the user's list. A list without an owner name
    /// is ignored.
    pub fn engage<B: KeyValueBackend>(store: &mut PersistentStore<B>, shared: SharedList) -> Self {
        if shared.name.trim().is_empty() {
            warn!("Ignoring shared list without an owner name");
            return Self::disengaged(store);
        }

        info!("Viewing {}'s list ({} movies)", shared.name, shared.movies.len());
        store.watched().replace_watched_records(shared.movies);
        Self { owner: Some(shared.name) }
    }

    /// Engage from a raw share parameter, falling back to a normal session when
    /// it is absent or cannot be decoded.
    pub fn from_share_param<B: KeyValueBackend>(
        store: &mut PersistentStore<B>,
        param: Option<&str>,
    ) -> Self {
        let Some(code) = param.filter(|p| !p.trim().is_empty()) else {
            return Self::disengaged(store);
        };

        match share::decode(code) {
            Some(shared) => Self::engage(store, shared),
            None => {
                warn!("Share link could not be decoded, showing your own list");
                Self::disengaged(store)
            }
        }
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    pub fn is_shared(&self) -> bool {
        self.owner.is_some()
    }

    /// Copy a movie from the shared list into the user's own watched list.
    pub fn adopt<B: KeyValueBackend>(
        &self,
        store: &mut PersistentStore<B>,
        id: i64,
        rating: Option<u8>,
        comment: Option<String>,
    ) -> Result<AdoptOutcome> {
        if !self.is_shared() {
            return Ok(AdoptOutcome::NotShared);
        }

        let mut watched = store.watched();
        if watched.is_watched(id) {
            return Ok(AdoptOutcome::AlreadyWatched);
        }
        let Some(shared) = watched.record(id).cloned() else {
            return Ok(AdoptOutcome::NotInSharedList);
        };

        // The owner's rating and comment stay theirs
        let mut candidate = RecordCandidate::new(shared.movie());
        if let Some(rating) = rating {
            candidate = candidate.with_rating(rating);
        }
        if let Some(comment) = comment {
            candidate = candidate.with_comment(comment);
        }
        watched.mark_watched(candidate)?;

        let added = watched
            .own_records()
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .map_or(AdoptOutcome::NotInSharedList, AdoptOutcome::Added);
        Ok(added)
    }
}

/// What sharing the user's list needs next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareReadiness {
    NothingToShare,
    /// First share: ask for a display name, then [`PersistentStore::set_user_name`]
    NeedsName,
    Ready(String),
}

pub fn prepare_share<B: KeyValueBackend>(store: &mut PersistentStore<B>) -> ShareReadiness {
    if store.watched().own_records().is_empty() {
        return ShareReadiness::NothingToShare;
    }
    match store.user_name() {
        Some(name) => ShareReadiness::Ready(name.to_string()),
        None => ShareReadiness::NeedsName,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::store::WATCHED_MOVIES_KEY;
    use watchbook_models::MovieRef;

    fn friend_list() -> SharedList {
        let movies = [(10, "Alien", 5, "scary"), (20, "Aliens", 4, "")]
            .into_iter()
            .map(|(id, title, rating, comment)| {
                RecordCandidate::new(MovieRef::new(id, title).with_release_date("1986-01-01"))
                    .with_rating(rating)
                    .with_comment(comment)
                    .into_record()
            })
            .collect();
        SharedList { name: "Ripley".to_string(), movies }
    }

    fn store_with_own_movie() -> PersistentStore<MemoryBackend> {
        let mut store = PersistentStore::open(MemoryBackend::new());
        store
            .watched()
            .mark_watched(RecordCandidate::new(MovieRef::new(20, "Aliens")).with_rating(3))
            .unwrap();
        store
    }

    #[test]
    fn test_engage_substitutes_without_persisting() {
        let mut store = store_with_own_movie();
        let stored = store.backend().get(WATCHED_MOVIES_KEY);

        let view = SharedView::engage(&mut store, friend_list());
        assert!(view.is_shared());
        assert_eq!(view.owner(), Some("Ripley"));

        let watched = store.watched();
        assert_eq!(watched.watched_records().len(), 2);
        assert_eq!(watched.own_records().len(), 1);
        assert_eq!(store.backend().get(WATCHED_MOVIES_KEY), stored);
    }

    #[test]
    fn test_from_share_param() {
        let mut store = store_with_own_movie();
        let shared = friend_list();
        let code = share::encode(&shared.name, &shared.movies);

        let view = SharedView::from_share_param(&mut store, Some(&code));
        assert_eq!(view.owner(), Some("Ripley"));
        assert_eq!(store.watched().watched_records()[0].title, "Alien");
    }

    #[test]
    fn test_bad_or_missing_param_is_a_normal_session() {
        let mut store = store_with_own_movie();

        assert!(!SharedView::from_share_param(&mut store, None).is_shared());
        assert!(!SharedView::from_share_param(&mut store, Some("")).is_shared());
        assert!(!SharedView::from_share_param(&mut store, Some("not-valid-base64!!!")).is_shared());
        assert_eq!(store.watched().watched_records()[0].id, 20);
    }

    #[test]
    fn test_nameless_list_is_ignored() {
        let mut store = store_with_own_movie();
        let mut shared = friend_list();
        shared.name = String::new();

        let view = SharedView::engage(&mut store, shared);
        assert!(!view.is_shared());
        assert_eq!(store.watched().watched_records().len(), 1);
    }

    #[test]
    fn test_adopt_from_shared_list() {
        let mut store = store_with_own_movie();
        let view = SharedView::engage(&mut store, friend_list());

        let outcome = view.adopt(&mut store, 10, Some(4), None).unwrap();
        match outcome {
            AdoptOutcome::Added(record) => {
                assert_eq!(record.title, "Alien");
                assert_eq!(record.release_date, "1986-01-01");
                assert_eq!(record.rating, 4);
                assert_eq!(record.comment, "");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(store.watched().is_watched(10));
        assert_eq!(store.watched().own_records().len(), 2);

        assert_eq!(view.adopt(&mut store, 20, None, None).unwrap(), AdoptOutcome::AlreadyWatched);
        assert_eq!(view.adopt(&mut store, 99, None, None).unwrap(), AdoptOutcome::NotInSharedList);
    }

    #[test]
    fn test_adopt_requires_shared_mode() {
        let mut store = store_with_own_movie();
        let view = SharedView::disengaged(&mut store);
        assert_eq!(view.adopt(&mut store, 20, None, None).unwrap(), AdoptOutcome::NotShared);
    }

    #[test]
    fn test_disengaging_shows_own_list_again() {
        let mut store = store_with_own_movie();
        let view = SharedView::engage(&mut store, friend_list());
        assert!(view.is_shared());
        assert_eq!(store.watched().watched_records().len(), 2);

        let view = SharedView::disengaged(&mut store);
        assert!(!view.is_shared());
        let watched = store.watched();
        assert_eq!(watched.watched_records(), watched.own_records());
        assert_eq!(watched.watched_records()[0].id, 20);
    }

    #[test]
    fn test_failed_reengage_drops_previous_shared_list() {
        let mut store = store_with_own_movie();
        SharedView::engage(&mut store, friend_list());

        let view = SharedView::from_share_param(&mut store, Some("not-valid-base64!!!"));
        assert!(!view.is_shared());
        assert_eq!(store.watched().watched_records().len(), 1);

        SharedView::engage(&mut store, friend_list());
        let mut nameless = friend_list();
        nameless.name = String::new();
        assert!(!SharedView::engage(&mut store, nameless).is_shared());
        assert_eq!(store.watched().watched_records()[0].id, 20);
    }

    #[test]
    fn test_prepare_share() {
        let mut store = PersistentStore::open(MemoryBackend::new());
        assert_eq!(prepare_share(&mut store), ShareReadiness::NothingToShare);

        store
            .watched()
            .mark_watched(RecordCandidate::new(MovieRef::new(1, "A")))
            .unwrap();
        assert_eq!(prepare_share(&mut store), ShareReadiness::NeedsName);

        store.set_user_name("Ann").unwrap();
        assert_eq!(prepare_share(&mut store), ShareReadiness::Ready("Ann".to_string()));
    }
}
