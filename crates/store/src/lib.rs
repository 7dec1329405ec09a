//! SQLite-backed catalog store and search engine.
//!
//! The crate owns the whole read/write path over the fixed bibliographic
//! dataset: [`Database`] manages the pooled SQLite connection and embedded
//! migrations, [`Loader`] bulk-imports book aggregates, and [`SearchEngine`]
//! answers paginated multi-criteria searches with fully populated
//! [`Book`](folio_catalog::Book) results.
//!
//! Internally a search flows through three stages. `filter` builds a
//! store-agnostic predicate tree from the request's criteria, `compose`
//! compiles that tree to SQL with only the joins it needs, and the engine
//! wraps both behind [`SearchEngine::search`].

mod compose;
mod db;
mod engine;
pub mod error;
mod filter;
mod loader;
mod models;
#[cfg(test)]
mod testutil;

pub use self::db::Database;
pub use self::engine::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SearchEngine, SearchPage, SearchRequest};
pub use self::loader::Loader;
