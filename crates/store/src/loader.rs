//! Bulk catalog import.
//!
//! Loads the fixed dataset into the store once, up front. Each book is
//! written in its own transaction so a malformed entry rolls back cleanly
//! without poisoning the rest of the import.

use crate::error::{ErrorKind, Result};
use crate::models::BookRow;
use exn::ResultExt;
use folio_catalog::{Author, Book};
use sqlx::{SqlitePool, Transaction};
use tracing::{info, instrument};

use crate::Database;

const INSERT_BOOK: &str = include_str!("../queries/insert_book.sql");
const INSERT_LINK: &str = include_str!("../queries/insert_download_link.sql");
const SELECT_AUTHOR_ID: &str = include_str!("../queries/select_author_id.sql");
const INSERT_AUTHOR: &str = include_str!("../queries/insert_author.sql");
const UPSERT_SUBJECT: &str = include_str!("../queries/upsert_subject.sql");
const UPSERT_BOOKSHELF: &str = include_str!("../queries/upsert_bookshelf.sql");
const UPSERT_GENRE: &str = include_str!("../queries/upsert_genre.sql");
const UPSERT_LANGUAGE: &str = include_str!("../queries/upsert_language.sql");
const LINK_AUTHOR: &str = include_str!("../queries/link_author.sql");
const LINK_SUBJECT: &str = include_str!("../queries/link_subject.sql");
const LINK_BOOKSHELF: &str = include_str!("../queries/link_bookshelf.sql");
const LINK_GENRE: &str = include_str!("../queries/link_genre.sql");
const LINK_LANGUAGE: &str = include_str!("../queries/link_language.sql");

/// Writes book aggregates and their shared lookup rows into the store.
#[derive(Debug, Clone)]
pub struct Loader {
    pool: SqlitePool,
}

impl From<&Database> for Loader {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl Loader {
    /// Import every book in the slice, one transaction per book.
    ///
    /// Lookup rows (authors, subjects, bookshelves, genres, languages) are
    /// deduplicated across the whole catalog, so re-importing a book with
    /// known relations only adds the missing links.
    #[instrument(skip_all, fields(books = books.len()))]
    pub async fn import(&self, books: &[Book]) -> Result<()> {
        for book in books {
            let mut tx = self.pool.begin().await.or_raise(|| ErrorKind::StoreUnavailable)?;
            self.import_one(&mut tx, book).await?;
            tx.commit().await.or_raise(|| ErrorKind::StoreUnavailable)?;
        }
        info!(books = books.len(), "catalog import complete");
        Ok(())
    }

    async fn import_one(&self, tx: &mut Transaction<'_, sqlx::Sqlite>, book: &Book) -> Result<()> {
        let row = BookRow::try_from(book)?;
        sqlx::query(INSERT_BOOK)
            .bind(row.id)
            .bind(&row.title)
            .bind(row.download_count)
            .execute(&mut **tx)
            .await
            .or_raise(|| ErrorKind::StoreUnavailable)?;

        for author in &book.authors {
            let author_id = author_id(tx, author).await?;
            sqlx::query(LINK_AUTHOR)
                .bind(row.id)
                .bind(author_id)
                .execute(&mut **tx)
                .await
                .or_raise(|| ErrorKind::StoreUnavailable)?;
        }

        link_names(tx, row.id, &book.subjects, UPSERT_SUBJECT, LINK_SUBJECT).await?;
        link_names(tx, row.id, &book.bookshelves, UPSERT_BOOKSHELF, LINK_BOOKSHELF).await?;
        link_names(tx, row.id, &book.genres, UPSERT_GENRE, LINK_GENRE).await?;
        link_names(tx, row.id, &book.languages, UPSERT_LANGUAGE, LINK_LANGUAGE).await?;

        for link in &book.download_links {
            sqlx::query(INSERT_LINK)
                .bind(row.id)
                .bind(&link.mime_type)
                .bind(&link.url)
                .execute(&mut **tx)
                .await
                .or_raise(|| ErrorKind::StoreUnavailable)?;
        }
        Ok(())
    }
}

/// Select-or-insert the author, identified by name plus life years.
///
/// Authors carry no natural key in the source data, so two authors are the
/// same row only when all three attributes match.
async fn author_id(tx: &mut Transaction<'_, sqlx::Sqlite>, author: &Author) -> Result<i64> {
    let existing: Option<i64> = sqlx::query_scalar(SELECT_AUTHOR_ID)
        .bind(&author.name)
        .bind(author.birth_year)
        .bind(author.death_year)
        .fetch_optional(&mut **tx)
        .await
        .or_raise(|| ErrorKind::StoreUnavailable)?;
    if let Some(id) = existing {
        return Ok(id);
    }
    sqlx::query_scalar(INSERT_AUTHOR)
        .bind(&author.name)
        .bind(author.birth_year)
        .bind(author.death_year)
        .fetch_one(&mut **tx)
        .await
        .or_raise(|| ErrorKind::StoreUnavailable)
}

/// Upsert each name into its lookup table and link it to the book.
async fn link_names(
    tx: &mut Transaction<'_, sqlx::Sqlite>,
    book_id: i64,
    names: &[String],
    upsert_sql: &str,
    link_sql: &str,
) -> Result<()> {
    for name in names {
        let id: i64 = sqlx::query_scalar(upsert_sql)
            .bind(name)
            .fetch_one(&mut **tx)
            .await
            .or_raise(|| ErrorKind::StoreUnavailable)?;
        sqlx::query(link_sql)
            .bind(book_id)
            .bind(id)
            .execute(&mut **tx)
            .await
            .or_raise(|| ErrorKind::StoreUnavailable)?;
    }
    Ok(())
}
