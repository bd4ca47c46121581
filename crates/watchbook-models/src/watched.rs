use serde::{Deserialize, Serialize};
use crate::movie::{null_as_empty, MovieRef};

/// Highest star rating a user can give. 0 means unrated.
pub const MAX_RATING: u8 = 5;

/// A movie in the user's watched list, with the user's rating and comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedRecord {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub rating: u8, // 0-5, 0 = unrated
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

impl WatchedRecord {
    pub fn movie(&self) -> MovieRef {
        MovieRef {
            id: self.id,
            title: self.title.clone(),
            release_date: self.release_date.clone(),
            poster_path: self.poster_path.clone(),
        }
    }

    pub fn release_year(&self) -> Option<&str> {
        crate::movie::release_year(&self.release_date)
    }

    pub fn is_rated(&self) -> bool {
        self.rating > 0
    }
}

/// Input for adding or updating a watched record.
///
/// `rating` and `comment` are optional: an absent (or zero/empty) value never
/// clears what is already stored for the same movie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCandidate {
    pub movie: MovieRef,
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

impl RecordCandidate {
    pub fn new(movie: MovieRef) -> Self {
        Self {
            movie,
            rating: None,
            comment: None,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating.min(MAX_RATING));
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Rating if one was supplied and it is not the "unrated" zero.
    pub fn effective_rating(&self) -> Option<u8> {
        self.rating.filter(|r| *r > 0)
    }

    /// Comment if one was supplied and it is not empty.
    pub fn effective_comment(&self) -> Option<&str> {
        self.comment.as_deref().filter(|c| !c.is_empty())
    }

    pub fn into_record(self) -> WatchedRecord {
        let rating = self.effective_rating().unwrap_or(0);
        let comment = self.effective_comment().unwrap_or_default().to_string();
        WatchedRecord {
            id: self.movie.id,
            title: self.movie.title,
            release_date: self.movie.release_date,
            poster_path: self.movie.poster_path,
            rating,
            comment,
        }
    }
}
