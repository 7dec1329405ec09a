//! Shared fixture catalog for integration tests.

use crate::{Database, Loader};
use folio_catalog::{Author, Book, DownloadLink};

/// A small catalog exercising every search axis: substring matches on
/// titles, authors and topics, exact language and mime type matches,
/// a download-count tie (1400 vs 2650), and a book (19033) that matches a
/// topic through both its bookshelves at once.
pub(crate) fn fixture_catalog() -> Vec<Book> {
    vec![
        Book {
            authors: vec![Author::new("Austen, Jane", Some(1775), Some(1817))],
            languages: vec!["en".to_string()],
            subjects: vec!["England -- Fiction".to_string(), "Love stories".to_string()],
            bookshelves: vec!["Best Books Ever Listings".to_string()],
            genres: vec!["Romance".to_string()],
            download_links: vec![DownloadLink::new(
                "text/html",
                "https://www.gutenberg.org/ebooks/1342.html",
            )],
            ..Book::new(1342, "Pride and Prejudice", 50_000)
        },
        Book {
            authors: vec![Author::new(
                "Shelley, Mary Wollstonecraft",
                Some(1797),
                Some(1851),
            )],
            languages: vec!["en".to_string()],
            subjects: vec!["Horror tales".to_string(), "Science fiction".to_string()],
            genres: vec!["Gothic fiction".to_string()],
            download_links: vec![DownloadLink::new(
                "application/epub+zip",
                "https://www.gutenberg.org/ebooks/84.epub",
            )],
            ..Book::new(84, "Frankenstein; Or, The Modern Prometheus", 45_000)
        },
        Book {
            authors: vec![Author::new("Carroll, Lewis", Some(1832), Some(1898))],
            languages: vec!["en".to_string()],
            subjects: vec!["Fantasy fiction".to_string()],
            bookshelves: vec!["Children's Literature".to_string()],
            download_links: vec![DownloadLink::new(
                "text/plain; charset=us-ascii",
                "https://www.gutenberg.org/ebooks/11.txt",
            )],
            ..Book::new(11, "Alice's Adventures in Wonderland", 40_000)
        },
        Book {
            authors: vec![Author::new("Melville, Herman", Some(1819), Some(1891))],
            languages: vec!["en".to_string()],
            subjects: vec!["Whaling -- Fiction".to_string()],
            download_links: vec![DownloadLink::new(
                "text/plain; charset=us-ascii",
                "https://www.gutenberg.org/ebooks/2701.txt",
            )],
            ..Book::new(2701, "Moby Dick; Or, The Whale", 35_000)
        },
        // 1400 and 2650 tie on download_count; the lower id must win.
        Book {
            authors: vec![Author::new("Dickens, Charles", Some(1812), Some(1870))],
            languages: vec!["en".to_string()],
            subjects: vec!["Orphans -- Fiction".to_string()],
            ..Book::new(1400, "Great Expectations", 12_000)
        },
        Book {
            authors: vec![Author::new("Proust, Marcel", Some(1871), Some(1922))],
            languages: vec!["fr".to_string()],
            subjects: vec!["Autobiographical fiction".to_string()],
            ..Book::new(2650, "Du c\u{f4}t\u{e9} de chez Swann", 12_000)
        },
        // Matches topic "child" via both bookshelves; must count once.
        Book {
            languages: vec!["en".to_string()],
            bookshelves: vec![
                "Children's Literature".to_string(),
                "Children's Picture Books".to_string(),
            ],
            ..Book::new(19033, "Alice in Wonderland, Retold in Words of One Syllable", 8_000)
        },
        Book {
            languages: vec!["en".to_string()],
            subjects: vec!["Infants -- Care".to_string()],
            ..Book::new(9042, "Infant Care", 3_000)
        },
    ]
}

/// An in-memory database pre-loaded with [`fixture_catalog`].
pub(crate) async fn seeded_db() -> Database {
    let db = Database::connect_in_memory().await.expect("in-memory database");
    Loader::from(&db).import(&fixture_catalog()).await.expect("fixture import");
    db
}
