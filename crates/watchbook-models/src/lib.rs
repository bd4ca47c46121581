pub mod movie;
pub mod shared_list;
pub mod watched;

pub use movie::MovieRef;
pub use shared_list::SharedList;
pub use watched::{RecordCandidate, WatchedRecord, MAX_RATING};
