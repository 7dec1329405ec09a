use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// One downloadable rendition of a book, owned by exactly one [`Book`].
///
/// Links keep their dump order: upstream lists the preferred format first.
///
/// [`Book`]: crate::Book
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DownloadLink {
    /// MIME type of the rendition (e.g. "text/html", "application/epub+zip").
    pub mime_type: String,
    pub url: String,
}
impl DownloadLink {
    pub fn new(mime_type: impl Into<String>, url: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), url: url.into() }
    }
}

impl Display for DownloadLink {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{} <{}>", self.mime_type, self.url)
    }
}
