//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use folio_store::{DEFAULT_PAGE_SIZE, SearchRequest};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Search a fixed book catalog")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load a JSON catalog dump (an array of books) into the store.
    Import {
        /// Path to the dump file.
        dump: PathBuf,
    },
    /// Search the catalog and print the matching page as JSON.
    Search(SearchArgs),
}

/// Every filter takes a comma-separated value list; values within one
/// filter OR together, separate filters AND together.
#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Exact numeric book ids.
    #[arg(long)]
    pub book_id: Option<String>,
    /// Exact language codes, e.g. "en,fr".
    #[arg(long)]
    pub language: Option<String>,
    /// Exact mime types of download links.
    #[arg(long)]
    pub mime_type: Option<String>,
    /// Substrings matched against subject and bookshelf names.
    #[arg(long)]
    pub topic: Option<String>,
    /// Substrings of author names.
    #[arg(long)]
    pub author: Option<String>,
    /// Substrings of titles.
    #[arg(long)]
    pub title: Option<String>,
    /// 1-indexed result page.
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Results per page (at most 100).
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,
}

impl From<&SearchArgs> for SearchRequest {
    fn from(args: &SearchArgs) -> Self {
        Self {
            book_id: args.book_id.clone(),
            language: args.language.clone(),
            mime_type: args.mime_type.clone(),
            topic: args.topic.clone(),
            author: args.author.clone(),
            title: args.title.clone(),
            page: args.page,
            page_size: args.page_size,
        }
    }
}
