//! Query composition and execution.
//!
//! Turns the combined predicate tree into one deduplicated, ordered,
//! paginated fetch plan against SQLite: a distinct-count query, a
//! page-of-ids query, and one batched attach query per related collection.
//! The attach step is bounded per page, never per book.

use crate::error::{ErrorKind, Result};
use crate::filter::{Field, Predicate, Value};
use crate::models::{AuthorRow, BookRow, LinkRow, NameRow};
use exn::{OptionExt, ResultExt};
use folio_catalog::{Author, Book, DownloadLink};
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteRow;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

const ATTACH_BOOKS: &str = include_str!("../queries/attach_books.sql");
const ATTACH_AUTHORS: &str = include_str!("../queries/attach_authors.sql");
const ATTACH_SUBJECTS: &str = include_str!("../queries/attach_subjects.sql");
const ATTACH_BOOKSHELVES: &str = include_str!("../queries/attach_bookshelves.sql");
const ATTACH_GENRES: &str = include_str!("../queries/attach_genres.sql");
const ATTACH_LANGUAGES: &str = include_str!("../queries/attach_languages.sql");
const ATTACH_LINKS: &str = include_str!("../queries/attach_links.sql");

/// Validated page window (1-indexed page).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Window {
    pub(crate) page: u32,
    pub(crate) page_size: u32,
}
impl Window {
    fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
    fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.page_size)
    }
}

/// Relations that must be joined for the WHERE clause to see their columns.
///
/// Joins are introduced only for relations a predicate actually references,
/// to avoid needless cross products. All of them are LEFT joins: the WHERE
/// clause filters non-matching rows either way, and `topic`'s OR across
/// subjects and bookshelves stays correct for books that have one relation
/// but not the other (an INNER join on both would drop them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Join {
    Authors,
    Subjects,
    Bookshelves,
    Languages,
    DownloadLinks,
}
impl Join {
    fn for_field(field: Field) -> Option<Self> {
        match field {
            Field::BookId | Field::BookTitle => None,
            Field::AuthorName => Some(Self::Authors),
            Field::SubjectName => Some(Self::Subjects),
            Field::BookshelfName => Some(Self::Bookshelves),
            Field::LanguageCode => Some(Self::Languages),
            Field::MimeType => Some(Self::DownloadLinks),
        }
    }

    fn clause(&self) -> &'static str {
        match self {
            Self::Authors => {
                " LEFT JOIN book_authors ba ON ba.book_id = b.id \
                 LEFT JOIN authors a ON a.id = ba.author_id"
            },
            Self::Subjects => {
                " LEFT JOIN book_subjects bs ON bs.book_id = b.id \
                 LEFT JOIN subjects s ON s.id = bs.subject_id"
            },
            Self::Bookshelves => {
                " LEFT JOIN book_bookshelves bb ON bb.book_id = b.id \
                 LEFT JOIN bookshelves sh ON sh.id = bb.bookshelf_id"
            },
            Self::Languages => {
                " LEFT JOIN book_languages bl ON bl.book_id = b.id \
                 LEFT JOIN languages l ON l.id = bl.language_id"
            },
            Self::DownloadLinks => " LEFT JOIN download_links dl ON dl.book_id = b.id",
        }
    }
}

fn column(field: Field) -> &'static str {
    match field {
        Field::BookId => "b.id",
        Field::BookTitle => "b.title",
        Field::AuthorName => "a.name",
        Field::SubjectName => "s.name",
        Field::BookshelfName => "sh.name",
        Field::LanguageCode => "l.code",
        Field::MimeType => "dl.mime_type",
    }
}

fn join_clauses(predicate: Option<&Predicate>) -> String {
    let Some(predicate) = predicate else {
        return String::new();
    };
    let joins: BTreeSet<Join> =
        predicate.fields().into_iter().filter_map(Join::for_field).collect();
    joins.iter().map(Join::clause).collect()
}

fn where_clause(predicate: Option<&Predicate>) -> (String, Vec<Value>) {
    let Some(predicate) = predicate else {
        return (String::new(), Vec::new());
    };
    let mut sql = String::from(" WHERE ");
    let mut binds = Vec::new();
    compile(predicate, &mut sql, &mut binds);
    (sql, binds)
}

/// Compile one predicate node to SQL, pushing bind values in emit order.
fn compile(predicate: &Predicate, sql: &mut String, binds: &mut Vec<Value>) {
    match predicate {
        Predicate::Equals(Field::BookId, value) => {
            sql.push_str("b.id = ?");
            binds.push(value.clone());
        },
        Predicate::Equals(field, value) => {
            // Text equality is case-insensitive across every criterion.
            sql.push_str("lower(");
            sql.push_str(column(*field));
            sql.push_str(") = lower(?)");
            binds.push(value.clone());
        },
        Predicate::SubstringMatch(field, needle) => {
            // instr() instead of LIKE, so user values cannot smuggle
            // wildcards into the pattern.
            sql.push_str("instr(lower(");
            sql.push_str(column(*field));
            sql.push_str("), lower(?)) > 0");
            binds.push(Value::Text(needle.clone()));
        },
        Predicate::And(arms) => compile_group(arms, " AND ", sql, binds),
        Predicate::Or(arms) => compile_group(arms, " OR ", sql, binds),
    }
}

fn compile_group(arms: &[Predicate], separator: &str, sql: &mut String, binds: &mut Vec<Value>) {
    sql.push('(');
    for (i, arm) in arms.iter().enumerate() {
        if i > 0 {
            sql.push_str(separator);
        }
        compile(arm, sql, binds);
    }
    sql.push(')');
}

/// Execute the composed plan.
///
/// Returns the total distinct-match count (independent of the window) and
/// the requested page of fully populated book aggregates in popularity
/// order (`download_count DESC, id ASC`).
pub(crate) async fn fetch_page(
    pool: &SqlitePool,
    predicate: Option<&Predicate>,
    window: Window,
) -> Result<(u64, Vec<Book>)> {
    let joins = join_clauses(predicate);
    let (filter_sql, binds) = where_clause(predicate);

    let count_sql = format!("SELECT COUNT(DISTINCT b.id) FROM books b{joins}{filter_sql}");
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for value in &binds {
        count_query = match value {
            Value::Int(i) => count_query.bind(*i),
            Value::Text(s) => count_query.bind(s.clone()),
        };
    }
    let total = count_query.fetch_one(pool).await.or_raise(|| ErrorKind::StoreUnavailable)?;
    let total = u64::try_from(total).or_raise(|| ErrorKind::InvalidData("match count"))?;

    // DISTINCT over (id, download_count) is distinct over id - the ranking
    // column is functionally dependent on the key - but SQLite requires
    // ORDER BY terms to appear in a DISTINCT select list.
    let page_sql = format!(
        "SELECT DISTINCT b.id, b.download_count FROM books b{joins}{filter_sql} \
         ORDER BY b.download_count DESC, b.id ASC LIMIT ? OFFSET ?"
    );
    debug!(sql = %page_sql, binds = binds.len(), "composed search query");
    let mut page_query = sqlx::query_as::<_, (i64, i64)>(&page_sql);
    for value in &binds {
        page_query = match value {
            Value::Int(i) => page_query.bind(*i),
            Value::Text(s) => page_query.bind(s.clone()),
        };
    }
    let rows = page_query
        .bind(window.limit())
        .bind(window.offset())
        .fetch_all(pool)
        .await
        .or_raise(|| ErrorKind::StoreUnavailable)?;
    let ids: Vec<i64> = rows.into_iter().map(|(id, _)| id).collect();

    if ids.is_empty() {
        return Ok((total, Vec::new()));
    }
    let books = attach(pool, &ids).await?;
    Ok((total, books))
}

/// Eagerly populate every related collection for the page's books.
///
/// One batched query per relation, filtered by the page's id set and
/// grouped in memory - never one fetch per book.
async fn attach(pool: &SqlitePool, ids: &[i64]) -> Result<Vec<Book>> {
    let book_rows: Vec<BookRow> = fetch_for_ids(pool, ATTACH_BOOKS, ids).await?;

    let mut authors: HashMap<i64, Vec<Author>> = HashMap::new();
    for row in fetch_for_ids::<AuthorRow>(pool, ATTACH_AUTHORS, ids).await? {
        let book_id = row.book_id;
        authors.entry(book_id).or_default().push(row.into_author()?);
    }

    let mut subjects = group_names(fetch_for_ids(pool, ATTACH_SUBJECTS, ids).await?);
    let mut bookshelves = group_names(fetch_for_ids(pool, ATTACH_BOOKSHELVES, ids).await?);
    let mut genres = group_names(fetch_for_ids(pool, ATTACH_GENRES, ids).await?);
    let mut languages = group_names(fetch_for_ids(pool, ATTACH_LANGUAGES, ids).await?);

    let mut links: HashMap<i64, Vec<DownloadLink>> = HashMap::new();
    for row in fetch_for_ids::<LinkRow>(pool, ATTACH_LINKS, ids).await? {
        let (book_id, link) = row.into_link();
        links.entry(book_id).or_default().push(link);
    }

    let mut books: HashMap<i64, Book> = HashMap::with_capacity(book_rows.len());
    for row in book_rows {
        let id = row.id;
        let mut book = Book::try_from(row)?;
        book.authors = authors.remove(&id).unwrap_or_default();
        book.subjects = subjects.remove(&id).unwrap_or_default();
        book.bookshelves = bookshelves.remove(&id).unwrap_or_default();
        book.genres = genres.remove(&id).unwrap_or_default();
        book.languages = languages.remove(&id).unwrap_or_default();
        book.download_links = links.remove(&id).unwrap_or_default();
        books.insert(id, book);
    }

    // Re-emit in the page's popularity order.
    ids.iter()
        .map(|id| books.remove(id).ok_or_raise(|| ErrorKind::InvalidData("page book id")))
        .collect()
}

/// Expand the `/*ids*/` marker to one `?` per id and run the query.
///
/// sqlx cannot bind a variadic `IN` list, so the placeholder count is baked
/// into the statement text per call.
async fn fetch_for_ids<T>(pool: &SqlitePool, template: &str, ids: &[i64]) -> Result<Vec<T>>
where
    T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
{
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = template.replace("/*ids*/", &placeholders);
    let mut query = sqlx::query_as::<_, T>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    query.fetch_all(pool).await.or_raise(|| ErrorKind::StoreUnavailable)
}

fn group_names(rows: Vec<NameRow>) -> HashMap<i64, Vec<String>> {
    let mut map: HashMap<i64, Vec<String>> = HashMap::new();
    for row in rows {
        map.entry(row.book_id).or_default().push(row.name);
    }
    map
}
