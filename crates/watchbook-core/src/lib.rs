pub mod backend;
pub mod error;
pub mod recent;
pub mod share;
pub mod shared_view;
pub mod store;
pub mod watched;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};
pub use error::{Result, StoreError};
pub use recent::{RecentlyViewed, RECENTLY_VIEWED_CAPACITY};
pub use shared_view::{prepare_share, AdoptOutcome, ShareReadiness, SharedView};
pub use store::PersistentStore;
pub use watched::WatchedList;
