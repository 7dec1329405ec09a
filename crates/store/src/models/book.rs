use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use folio_catalog::Book;

/// One row of the `books` table; related collections are attached
/// separately by the composer.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct BookRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) download_count: i64,
}

impl TryFrom<&Book> for BookRow {
    type Error = Error;
    fn try_from(book: &Book) -> Result<Self, Self::Error> {
        Ok(Self {
            id: i64::try_from(book.id).or_raise(|| ErrorKind::InvalidData("book id"))?,
            title: book.title.clone(),
            download_count: i64::try_from(book.download_count)
                .or_raise(|| ErrorKind::InvalidData("download count"))?,
        })
    }
}
impl TryFrom<BookRow> for Book {
    type Error = Error;
    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(Book::new(
            u64::try_from(row.id).or_raise(|| ErrorKind::InvalidData("book id"))?,
            row.title,
            u64::try_from(row.download_count).or_raise(|| ErrorKind::InvalidData("download count"))?,
        ))
    }
}
