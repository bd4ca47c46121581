//! Compact, lossy encoding of a watched list for share links.
//!
//! Wire form: JSON `{"n": owner, "m": [{"i", "t", "y", "p", "r", "c"}]}`, standard
//! base64, then the [`url_safe`] substitution. Only the release year survives.

pub mod url_safe;


use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::debug;
use watchbook_models::{SharedList, WatchedRecord};

pub use url_safe::{from_url_safe, to_url_safe};

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    #[serde(rename = "n")]
    name: String,
    #[serde(rename = "m")]
    movies: Vec<EnvelopeMovie>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EnvelopeMovie {
    #[serde(rename = "i")]
    id: i64,
    #[serde(rename = "t")]
    title: String,
    #[serde(rename = "y", default)]
    year: String,
    #[serde(rename = "p", default)]
    poster_path: Option<String>,
    #[serde(rename = "r", default)]
    rating: u8,
    #[serde(rename = "c", default)]
    comment: String,
}

impl From<&WatchedRecord> for EnvelopeMovie {
    fn from(record: &WatchedRecord) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            year: record.release_year().unwrap_or_default().to_string(),
            poster_path: record.poster_path.clone(),
            rating: record.rating,
            comment: record.comment.clone(),
        }
    }
}

impl From<EnvelopeMovie> for WatchedRecord {
    fn from(movie: EnvelopeMovie) -> Self {
        let release_date = if movie.year.is_empty() {
            String::new()
        } else {
            format!("{}-01-01", movie.year)
        };
        Self {
            id: movie.id,
            title: movie.title,
            release_date,
            poster_path: movie.poster_path,
            rating: movie.rating,
            comment: movie.comment,
        }
    }
}

/// Encode `owner`'s records into an opaque, URL-safe string.
pub fn encode(owner: &str, records: &[WatchedRecord]) -> String {
    let envelope = Envelope {
        name: owner.to_string(),
        movies: records.iter().map(EnvelopeMovie::from).collect(),
    };
    // Plain strings, integers and options: serializing cannot fail
    let json = serde_json::to_string(&envelope).unwrap_or_default();
    to_url_safe(&STANDARD.encode(json.as_bytes()))
}

/// Decode a string produced by [`encode`].
///
/// Returns `None` on any malformed input; callers treat that as "no shared list".
pub fn decode(encoded: &str) -> Option<SharedList> {
    let standard = from_url_safe(encoded.trim());

    let bytes = match STANDARD.decode(standard.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Ignoring share code: invalid base64: {}", e);
            return None;
        }
    };

    let envelope: Envelope = match serde_json::from_slice(&bytes) {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!("Ignoring share code: invalid payload: {}", e);
            return None;
        }
    };

    Some(SharedList {
        name: envelope.name,
        movies: envelope.movies.into_iter().map(WatchedRecord::from).collect(),
    })
}

/// Full share link: `base_url` with the encoded list in the `param` query parameter.
pub fn share_url(base_url: &str, param: &str, owner: &str, records: &[WatchedRecord]) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", base_url, separator, param, encode(owner, records))
}

/// Pull the share code out of a pasted link, or take the input as a bare code.
///
/// Returns `None` for a URL that carries no `param` query parameter.
pub fn extract_share_code(input: &str, param: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let Some((_, query)) = input.split_once('?') else {
        if input.contains("://") {
            return None;
        }
        return Some(input.to_string());
    };
    let query = query.split('#').next().unwrap_or_default();

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == param)
        .and_then(|(_, value)| match urlencoding::decode(value) {
            Ok(decoded) => Some(decoded.into_owned()),
            Err(e) => {
                debug!("Ignoring share parameter with invalid percent-encoding: {}", e);
                None
            }
        })
        .filter(|code| !code.is_empty())
}
