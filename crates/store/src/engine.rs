//! Search over the catalog.
//!
//! The engine turns one [`SearchRequest`] into a page of fully populated
//! books: it validates the page window, normalizes the raw comma-separated
//! filter values, builds the predicate tree, and delegates execution to the
//! composer. Results are always ranked by download count descending with
//! the id as a stable tiebreak.

use crate::compose::{self, Window};
use crate::error::{ErrorKind, Result};
use crate::filter::{self, Criterion, Predicate};
use crate::Database;
use folio_catalog::Book;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::instrument;

/// Page size applied when the request leaves it unset.
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Hard upper bound on the page size; larger requests are rejected, not
/// clamped.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One search over the catalog.
///
/// Every filter is optional and holds a raw comma-separated value list as
/// received from the caller; tokens are trimmed and empty ones dropped
/// before matching. Filters combine with AND, values within one filter
/// with OR.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Exact numeric book ids.
    pub book_id: Option<String>,
    /// Exact language codes (case-insensitive).
    pub language: Option<String>,
    /// Exact mime types of download links (case-insensitive).
    pub mime_type: Option<String>,
    /// Case-insensitive substrings matched against subject and bookshelf
    /// names alike.
    pub topic: Option<String>,
    /// Case-insensitive substrings of author names.
    pub author: Option<String>,
    /// Case-insensitive substrings of titles.
    pub title: Option<String>,
    /// 1-indexed page.
    pub page: u32,
    pub page_size: u32,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self {
            book_id: None,
            language: None,
            mime_type: None,
            topic: None,
            author: None,
            title: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchRequest {
    fn criteria(&self) -> [(Criterion, Option<&str>); 6] {
        [
            (Criterion::BookId, self.book_id.as_deref()),
            (Criterion::Language, self.language.as_deref()),
            (Criterion::MimeType, self.mime_type.as_deref()),
            (Criterion::Topic, self.topic.as_deref()),
            (Criterion::Author, self.author.as_deref()),
            (Criterion::Title, self.title.as_deref()),
        ]
    }
}

/// One page of search results plus the window-independent match count.
#[derive(Debug, Serialize)]
pub struct SearchPage {
    /// Total number of distinct matching books across all pages.
    pub count: u64,
    pub results: Vec<Book>,
    pub page: u32,
    pub total_pages: u64,
}

/// Read-side facade over the catalog store.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    pool: SqlitePool,
}

impl From<&Database> for SearchEngine {
    fn from(db: &Database) -> Self {
        Self { pool: db.pool().clone() }
    }
}

impl SearchEngine {
    /// Execute the request and return the requested page.
    ///
    /// A page beyond the last one is not an error; it returns the true
    /// `count` with empty `results`. Invalid filter values and an invalid
    /// window fail before any query runs.
    #[instrument(skip_all, fields(page = request.page, page_size = request.page_size))]
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let window = validate_window(request)?;

        let mut arms = Vec::new();
        for (criterion, raw) in request.criteria() {
            let values = split_values(raw);
            if let Some(predicate) = filter::build(criterion, &values)? {
                arms.push(predicate);
            }
        }
        let predicate = (!arms.is_empty()).then(|| Predicate::all(arms));

        let (count, results) = compose::fetch_page(&self.pool, predicate.as_ref(), window).await?;
        Ok(SearchPage {
            count,
            results,
            page: request.page,
            total_pages: count.div_ceil(u64::from(request.page_size)),
        })
    }
}

fn validate_window(request: &SearchRequest) -> Result<Window> {
    if request.page < 1 {
        exn::bail!(ErrorKind::InvalidPagination("page", request.page));
    }
    if request.page_size < 1 || request.page_size > MAX_PAGE_SIZE {
        exn::bail!(ErrorKind::InvalidPagination("page_size", request.page_size));
    }
    Ok(Window { page: request.page, page_size: request.page_size })
}

/// Split a raw comma-separated filter into trimmed, non-empty tokens.
fn split_values(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::seeded_db;
    use rstest::rstest;

    fn ids(page: &SearchPage) -> Vec<u64> {
        page.results.iter().map(|book| book.id).collect()
    }

    async fn run(request: SearchRequest) -> SearchPage {
        let db = seeded_db().await;
        let page = SearchEngine::from(&db).search(&request).await.unwrap();
        db.close().await;
        page
    }

    #[rstest]
    #[case(None, vec![])]
    #[case(Some("en"), vec!["en"])]
    #[case(Some(" en , fr "), vec!["en", "fr"])]
    #[case(Some(",, en ,"), vec!["en"])]
    #[case(Some(" , "), vec![])]
    fn test_split_values(#[case] raw: Option<&str>, #[case] expected: Vec<&str>) {
        assert_eq!(split_values(raw), expected);
    }

    #[tokio::test]
    async fn test_unfiltered_search_ranks_by_popularity() {
        let page = run(SearchRequest::default()).await;
        assert_eq!(page.count, 8);
        assert_eq!(page.total_pages, 1);
        // 1400 and 2650 tie on download_count; the lower id comes first.
        assert_eq!(ids(&page), vec![1342, 84, 11, 2701, 1400, 2650, 19033, 9042]);
    }

    #[tokio::test]
    async fn test_pagination_windows_the_ranking() {
        let db = seeded_db().await;
        let engine = SearchEngine::from(&db);

        let request = SearchRequest { page_size: 3, ..Default::default() };
        let first = engine.search(&request).await.unwrap();
        assert_eq!(first.count, 8);
        assert_eq!(first.total_pages, 3);
        assert_eq!(ids(&first), vec![1342, 84, 11]);

        let second =
            engine.search(&SearchRequest { page: 2, ..request.clone() }).await.unwrap();
        assert_eq!(ids(&second), vec![2701, 1400, 2650]);

        let third = engine.search(&SearchRequest { page: 3, ..request }).await.unwrap();
        assert_eq!(ids(&third), vec![19033, 9042]);
        db.close().await;
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty_not_an_error() {
        let page = run(SearchRequest { page: 99, ..Default::default() }).await;
        assert_eq!(page.count, 8);
        assert_eq!(page.page, 99);
        assert!(page.results.is_empty());
    }

    #[rstest]
    #[case(SearchRequest { page: 0, ..Default::default() })]
    #[case(SearchRequest { page_size: 0, ..Default::default() })]
    #[case(SearchRequest { page_size: MAX_PAGE_SIZE + 1, ..Default::default() })]
    #[tokio::test]
    async fn test_invalid_window_is_rejected(#[case] request: SearchRequest) {
        let db = seeded_db().await;
        let err = SearchEngine::from(&db).search(&request).await.unwrap_err();
        assert!(err.to_string().contains("invalid pagination"));
        db.close().await;
    }

    #[tokio::test]
    async fn test_max_page_size_is_accepted() {
        let page = run(SearchRequest { page_size: MAX_PAGE_SIZE, ..Default::default() }).await;
        assert_eq!(page.count, 8);
        assert_eq!(page.total_pages, 1);
    }

    #[tokio::test]
    async fn test_book_id_filter_is_exact() {
        let page = run(SearchRequest {
            book_id: Some("1342".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(page.count, 1);
        assert_eq!(ids(&page), vec![1342]);
    }

    #[tokio::test]
    async fn test_multiple_values_within_a_filter_or_together() {
        let page = run(SearchRequest {
            book_id: Some("1342,84,11".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&page), vec![1342, 84, 11], "popularity order preserved");
    }

    #[tokio::test]
    async fn test_non_numeric_book_id_is_an_error() {
        let db = seeded_db().await;
        let request = SearchRequest {
            book_id: Some("eighty-four".to_string()),
            ..Default::default()
        };
        let err = SearchEngine::from(&db).search(&request).await.unwrap_err();
        let message = err.to_string();
        assert!(message.contains("book_id") && message.contains("eighty-four"));
        db.close().await;
    }

    #[rstest]
    #[case("fr", vec![2650])]
    #[case("FR", vec![2650])]
    #[case("en,fr", vec![1342, 84, 11, 2701, 1400, 2650, 19033, 9042])]
    #[tokio::test]
    async fn test_language_filter_is_exact_and_case_insensitive(
        #[case] language: &str,
        #[case] expected: Vec<u64>,
    ) {
        let page = run(SearchRequest {
            language: Some(language.to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&page), expected);
    }

    #[rstest]
    // Exact match: the bare prefix of a parameterized mime type misses.
    #[case("text/plain; charset=us-ascii", vec![11, 2701])]
    #[case("text/plain", vec![])]
    #[case("text/html", vec![1342])]
    #[tokio::test]
    async fn test_mime_type_filter_is_exact(#[case] mime: &str, #[case] expected: Vec<u64>) {
        let page = run(SearchRequest {
            mime_type: Some(mime.to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&page), expected);
    }

    #[tokio::test]
    async fn test_topic_matches_subjects_and_bookshelves() {
        // 11 matches via a bookshelf, 19033 via two bookshelves (counted
        // once), and "infant" reaches 9042 through a subject.
        let page = run(SearchRequest {
            topic: Some("child, infant".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(page.count, 3);
        assert_eq!(ids(&page), vec![11, 19033, 9042]);
    }

    #[rstest]
    #[case("austen", vec![1342])]
    #[case("SHELLEY", vec![84])]
    #[case("nobody", vec![])]
    #[tokio::test]
    async fn test_author_substring_match(#[case] author: &str, #[case] expected: Vec<u64>) {
        let page = run(SearchRequest {
            author: Some(author.to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&page), expected);
    }

    #[tokio::test]
    async fn test_title_substring_match() {
        let page = run(SearchRequest {
            title: Some("alice".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&page), vec![11, 19033]);
    }

    #[tokio::test]
    async fn test_filters_combine_with_and() {
        let by_author = run(SearchRequest {
            author: Some("austen".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&by_author), vec![1342]);

        let narrowed = run(SearchRequest {
            title: Some("pride".to_string()),
            author: Some("austen".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(ids(&narrowed), vec![1342]);

        let disjoint = run(SearchRequest {
            title: Some("alice".to_string()),
            author: Some("austen".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(disjoint.count, 0);
    }

    #[tokio::test]
    async fn test_no_match_yields_zero_pages() {
        let page = run(SearchRequest {
            language: Some("de".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(page.count, 0);
        assert_eq!(page.total_pages, 0);
        assert!(page.results.is_empty());
    }

    #[tokio::test]
    async fn test_blank_filter_is_ignored() {
        let page = run(SearchRequest {
            language: Some(" , ".to_string()),
            ..Default::default()
        })
        .await;
        assert_eq!(page.count, 8, "only empty tokens means no filter");
    }

    #[tokio::test]
    async fn test_results_are_fully_populated() {
        let page = run(SearchRequest {
            book_id: Some("1342".to_string()),
            ..Default::default()
        })
        .await;
        let book = &page.results[0];
        assert_eq!(book.title, "Pride and Prejudice");
        assert_eq!(book.authors[0].name, "Austen, Jane");
        assert_eq!(book.authors[0].birth_year, Some(1775));
        assert_eq!(book.languages, vec!["en"]);
        assert_eq!(book.subjects.len(), 2);
        assert_eq!(book.bookshelves, vec!["Best Books Ever Listings"]);
        assert_eq!(book.genres, vec!["Romance"]);
        assert_eq!(book.download_links[0].mime_type, "text/html");
    }

    #[tokio::test]
    async fn test_page_serializes_with_stable_field_names() {
        let page = run(SearchRequest {
            book_id: Some("9042".to_string()),
            ..Default::default()
        })
        .await;
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["page"], 1);
        assert_eq!(json["total_pages"], 1);
        assert_eq!(json["results"][0]["id"], 9042);
    }
}
