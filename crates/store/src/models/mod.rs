mod book;
mod related;

pub(crate) use self::book::BookRow;
pub(crate) use self::related::{AuthorRow, LinkRow, NameRow};
