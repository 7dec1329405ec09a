//! Binary Error Types

use derive_more::{Display, Error};

pub type Error = exn::Exn<ErrorKind>;
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level failure categories reported to the terminal.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    #[display("configuration error")]
    Config,
    #[display("catalog store error")]
    Store,
    #[display("unable to read catalog dump")]
    Dump,
    #[display("catalog import failed")]
    Import,
    #[display("search failed")]
    Search,
}
