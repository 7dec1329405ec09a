//! Store Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction.

use derive_more::{Display, Error};

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong
/// internally. Validation failures (`InvalidFilterValue`,
/// `InvalidPagination`) belong to the request and map to a client error at
/// the outer surface; `StoreUnavailable` is fatal for the single request
/// only.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The underlying store is unreachable or a query failed.
    #[display("catalog store unavailable")]
    StoreUnavailable,
    #[display("database migration error")]
    Migration,
    /// A filter value cannot satisfy its criterion's type contract
    /// (e.g. a non-numeric book id). The value is reported, never dropped.
    #[display("invalid value {_1:?} for {_0} filter")]
    InvalidFilterValue(#[error(not(source))] &'static str, String),
    /// Page window out of bounds.
    #[display("invalid pagination: {_0} = {_1}")]
    InvalidPagination(#[error(not(source))] &'static str, u32),
    /// Row/domain conversion failure.
    #[display("invalid catalog data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::StoreUnavailable => true,
            _ => false,
        }
    }
}
