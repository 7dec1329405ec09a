//! Domain models for the folio book catalog.
//!
//! These types describe the bibliographic dataset as served to callers: a
//! [`Book`] aggregate with its credited [`Author`]s, tag collections
//! (subjects, bookshelves, genres, languages) and ordered [`DownloadLink`]s.
//! The catalog is bulk-loaded once and treated as immutable afterwards, so
//! the models carry no mutation logic - construction and display only.

mod author;
mod book;
mod link;

pub use self::author::Author;
pub use self::book::Book;
pub use self::link::DownloadLink;
