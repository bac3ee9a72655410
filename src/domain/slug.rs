//! Deterministic slug derivation with timestamp disambiguation.
//!
//! Slugs are derived from titles by keeping only lowercase ASCII letters,
//! digits, spaces, and hyphens, then collapsing separator runs. Uniqueness
//! against an existing collection is the caller's concern: a collision is
//! resolved by suffixing the candidate with the current unix-millisecond
//! timestamp, which keeps the base slug stable for the common case.

use time::OffsetDateTime;

/// Derive the base slug for a title.
///
/// Lowercases, strips every character outside `[a-z0-9 -]`, turns
/// whitespace runs into single hyphens, collapses hyphen runs, and trims
/// leading/trailing hyphens. A title with no representable characters
/// yields an empty slug.
pub fn derive_slug(title: &str) -> String {
    let lowered = title.to_lowercase();

    let mut slug = String::with_capacity(lowered.len());
    let mut previous_was_hyphen = false;
    for ch in lowered.chars() {
        let mapped = match ch {
            'a'..='z' | '0'..='9' => Some(ch),
            ' ' | '-' => Some('-'),
            _ => None,
        };
        match mapped {
            Some('-') => {
                if !previous_was_hyphen && !slug.is_empty() {
                    slug.push('-');
                    previous_was_hyphen = true;
                }
            }
            Some(ch) => {
                slug.push(ch);
                previous_was_hyphen = false;
            }
            None => {}
        }
    }

    slug.trim_end_matches('-').to_string()
}

/// Produce a slug for `title` that is unique according to the predicate.
///
/// `is_unique` must return `true` when the candidate does not already exist
/// in the collection. On collision the candidate is suffixed with the
/// current timestamp in milliseconds.
pub fn unique_slug<F>(title: &str, is_unique: F) -> String
where
    F: Fn(&str) -> bool,
{
    let base = derive_slug(title);
    if is_unique(&base) {
        return base;
    }
    format!("{base}-{}", unix_millis())
}

fn unix_millis() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000
}
