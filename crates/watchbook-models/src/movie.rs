use serde::{Deserialize, Deserializer, Serialize};

/// Minimal identity of a catalog movie.
///
/// Field names match the catalog's snake_case JSON so that stored blobs and
/// catalog payloads deserialize into the same type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MovieRef {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// ISO date (`YYYY-MM-DD`) or empty when the catalog has none
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieRef {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            release_date: String::new(),
            poster_path: None,
        }
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = release_date.into();
        self
    }

    pub fn with_poster_path(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    /// Release year as written in the date, i.e. everything before the first `-`.
    ///
    /// Returns `None` when the date is empty.
    pub fn release_year(&self) -> Option<&str> {
        release_year(&self.release_date)
    }
}

pub(crate) fn release_year(release_date: &str) -> Option<&str> {
    release_date
        .split('-')
        .next()
        .filter(|year| !year.is_empty())
}

/// Catalog payloads sometimes carry `null` where a string is expected.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
