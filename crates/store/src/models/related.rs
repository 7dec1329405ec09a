use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_catalog::{Author, DownloadLink};

/// One author row from a batched attach query, tagged with its book.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub(crate) book_id: i64,
    pub(crate) name: String,
    #[sqlx(default)]
    pub(crate) birth_year: Option<i64>,
    #[sqlx(default)]
    pub(crate) death_year: Option<i64>,
}
impl AuthorRow {
    pub(crate) fn into_author(self) -> Result<Author> {
        let birth_year = self
            .birth_year
            .map(|y| i32::try_from(y).or_raise(|| ErrorKind::InvalidData("birth year")))
            .transpose()?;
        let death_year = self
            .death_year
            .map(|y| i32::try_from(y).or_raise(|| ErrorKind::InvalidData("death year")))
            .transpose()?;
        Ok(Author::new(self.name, birth_year, death_year))
    }
}

/// A (book, name) pair; covers subjects, bookshelves, genres, and language
/// codes, which all attach as plain string collections.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct NameRow {
    pub(crate) book_id: i64,
    pub(crate) name: String,
}

/// One download link row, tagged with its owning book.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct LinkRow {
    pub(crate) book_id: i64,
    pub(crate) mime_type: String,
    pub(crate) url: String,
}
impl LinkRow {
    pub(crate) fn into_link(self) -> (i64, DownloadLink) {
        (self.book_id, DownloadLink::new(self.mime_type, self.url))
    }
}
