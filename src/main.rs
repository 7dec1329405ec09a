//! folio: paginated multi-criteria search over a fixed book catalog.

mod cli;
mod error;

use crate::cli::{Cli, Command, SearchArgs};
use crate::error::{ErrorKind, Result};
use clap::Parser;
use exn::ResultExt;
use folio_catalog::Book;
use folio_config::Settings;
use folio_store::{Database, Loader, SearchEngine, SearchRequest};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout is reserved for search results.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:?}");
            ExitCode::FAILURE
        },
    }
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::load().or_raise(|| ErrorKind::Config)?;
    let db = Database::connect_with(&settings.database.path, settings.database.max_connections)
        .await
        .or_raise(|| ErrorKind::Store)?;

    let outcome = match &cli.command {
        Command::Import { dump } => import_dump(&db, dump).await,
        Command::Search(args) => {
            let json = run_search(&db, args).await?;
            println!("{json}");
            Ok(())
        },
    };
    db.close().await;
    outcome
}

async fn import_dump(db: &Database, path: &Path) -> Result<()> {
    let raw = std::fs::read_to_string(path).or_raise(|| ErrorKind::Dump)?;
    let books: Vec<Book> = serde_json::from_str(&raw).or_raise(|| ErrorKind::Dump)?;
    Loader::from(db).import(&books).await.or_raise(|| ErrorKind::Import)?;
    info!(books = books.len(), dump = %path.display(), "catalog imported");
    Ok(())
}

async fn run_search(db: &Database, args: &SearchArgs) -> Result<String> {
    let request = SearchRequest::from(args);
    let page = SearchEngine::from(db).search(&request).await.or_raise(|| ErrorKind::Search)?;
    serde_json::to_string_pretty(&page).or_raise(|| ErrorKind::Search)
}
