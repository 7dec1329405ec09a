use crate::{Author, DownloadLink};
use serde::{Deserialize, Serialize};

/// A fully populated catalog entry.
///
/// `id` is the stable upstream identifier and the join key for every
/// relationship; it is never reused or renumbered. `download_count` is the
/// popularity ranking key. The related collections are eagerly attached by
/// the store - a `Book` handed to a caller is always complete, never a bare
/// row awaiting lazy loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub subjects: Vec<String>,
    #[serde(default)]
    pub bookshelves: Vec<String>,
    #[serde(default)]
    pub download_links: Vec<DownloadLink>,
}
impl Book {
    /// A bare entry with empty related collections, useful as a struct
    /// update base when assembling aggregates.
    pub fn new(id: u64, title: impl Into<String>, download_count: u64) -> Self {
        Self {
            id,
            title: title.into(),
            download_count,
            authors: Vec::new(),
            genres: Vec::new(),
            languages: Vec::new(),
            subjects: Vec::new(),
            bookshelves: Vec::new(),
            download_links: Vec::new(),
        }
    }
}
