//! URL-safe rendition of standard base64.
//!
//! `+` becomes `-`, `/` becomes `_` and `=` padding is dropped. The inverse
//! re-derives the padding from the length, so any string produced by
//! [`to_url_safe`] maps back to exactly the standard base64 it came from.

const PAD: char = '=';

/// Turn standard base64 into a string that can sit in a query parameter.
pub fn to_url_safe(standard: &str) -> String {
    standard
        .chars()
        .filter_map(|c| match c {
            '+' => Some('-'),
            '/' => Some('_'),
            PAD => None,
            other => Some(other),
        })
        .collect()
}

/// Undo [`to_url_safe`]: restore `+` and `/` and append `(4 - len % 4) % 4` pads.
pub fn from_url_safe(url_safe: &str) -> String {
    let mut standard: String = url_safe
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    let padding = (4 - standard.len() % 4) % 4;
    standard.extend(std::iter::repeat(PAD).take(padding));
    standard
}
