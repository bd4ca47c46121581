use serde::{Deserialize, Serialize};
use crate::watched::WatchedRecord;

/// Someone else's watched list, as reconstructed from a share link.
///
/// Release dates only carry year precision: they always read `YYYY-01-01`
/// (or empty), whatever the owner had stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SharedList {
    pub name: String,
    pub movies: Vec<WatchedRecord>,
}
