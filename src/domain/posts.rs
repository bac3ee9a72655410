//! The blog post entity and its derived-value policies.
//!
//! Wire and storage representations share one shape: camelCase field names,
//! `publishDate` as an ISO calendar date. `read_time` is a presentation
//! string recomputed from the content on every create and update.

use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Reading speed assumed when estimating how long a post takes to read.
pub const WORDS_PER_MINUTE: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub content: String,
    pub author: String,
    #[serde(with = "iso_date")]
    pub publish_date: Date,
    pub read_time: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
    pub image: String,
}

/// Estimate the reading time of `content`, rounded up to whole minutes.
///
/// Words are whitespace-separated tokens. Anything shorter than a minute
/// still reads as `"1 min read"`.
pub fn estimate_read_time(content: &str) -> String {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}
