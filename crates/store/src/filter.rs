//! Predicate construction for search criteria.
//!
//! One criterion (a named filterable field group, e.g. `topic`) plus its
//! normalized values become one [`Predicate`] tree node. The tree is
//! store-agnostic: it names schema [`Field`]s and matching modes but no SQL,
//! so it can be built and inspected without a live database. The composer
//! compiles it to the store's native query form.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A named filterable field group carrying zero or more OR'd values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Criterion {
    BookId,
    Language,
    MimeType,
    Topic,
    Author,
    Title,
}
impl Criterion {
    /// Public name as it appears in requests and error messages.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::BookId => "book_id",
            Self::Language => "language",
            Self::MimeType => "mime_type",
            Self::Topic => "topic",
            Self::Author => "author",
            Self::Title => "title",
        }
    }
}
impl Display for Criterion {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A concrete schema column a predicate tests against.
///
/// The `Ord` derive only fixes the join emission order; it carries no
/// semantic meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum Field {
    BookId,
    BookTitle,
    AuthorName,
    SubjectName,
    BookshelfName,
    LanguageCode,
    MimeType,
}

/// A bindable comparison operand.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Int(i64),
    Text(String),
}

/// Store-agnostic boolean condition over schema fields, composable with
/// AND/OR.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Predicate {
    /// Exact match; case-insensitive on text fields.
    Equals(Field, Value),
    /// Case-insensitive substring containment.
    SubstringMatch(Field, String),
    And(Vec<Predicate>),
    Or(Vec<Predicate>),
}

impl Predicate {
    /// OR the arms together, collapsing a single arm instead of wrapping it.
    pub(crate) fn any(mut arms: Vec<Predicate>) -> Predicate {
        match arms.len() {
            1 => arms.pop().unwrap(),
            _ => Predicate::Or(arms),
        }
    }

    /// AND the arms together, collapsing a single arm instead of wrapping it.
    pub(crate) fn all(mut arms: Vec<Predicate>) -> Predicate {
        match arms.len() {
            1 => arms.pop().unwrap(),
            _ => Predicate::And(arms),
        }
    }

    /// Every field referenced anywhere in the tree, for join planning.
    pub(crate) fn fields(&self) -> BTreeSet<Field> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut BTreeSet<Field>) {
        match self {
            Self::Equals(field, _) | Self::SubstringMatch(field, _) => {
                fields.insert(*field);
            },
            Self::And(arms) | Self::Or(arms) => {
                for arm in arms {
                    arm.collect_fields(fields);
                }
            },
        }
    }
}

/// Build the predicate for one criterion from its normalized values.
///
/// Returns `Ok(None)` for an empty value list: an absent criterion
/// contributes nothing to the AND chain, and therefore introduces no join.
/// Multiple values OR together; `topic` additionally fans each value out
/// across both subject and bookshelf names.
///
/// A non-numeric `book_id` value fails with
/// [`ErrorKind::InvalidFilterValue`] naming the criterion and the offending
/// value - it is never silently dropped.
pub(crate) fn build(criterion: Criterion, values: &[String]) -> Result<Option<Predicate>> {
    if values.is_empty() {
        return Ok(None);
    }
    let mut arms = Vec::with_capacity(values.len());
    for value in values {
        arms.extend(arm(criterion, value)?);
    }
    Ok(Some(Predicate::any(arms)))
}

fn arm(criterion: Criterion, value: &str) -> Result<Vec<Predicate>> {
    Ok(match criterion {
        Criterion::BookId => {
            let id = value
                .parse::<i64>()
                .or_raise(|| ErrorKind::InvalidFilterValue(criterion.as_str(), value.to_string()))?;
            vec![Predicate::Equals(Field::BookId, Value::Int(id))]
        },
        Criterion::Language => {
            vec![Predicate::Equals(Field::LanguageCode, Value::Text(value.to_string()))]
        },
        Criterion::MimeType => {
            vec![Predicate::Equals(Field::MimeType, Value::Text(value.to_string()))]
        },
        // A topic matches through a book's subjects OR its bookshelves.
        Criterion::Topic => vec![
            Predicate::SubstringMatch(Field::SubjectName, value.to_string()),
            Predicate::SubstringMatch(Field::BookshelfName, value.to_string()),
        ],
        Criterion::Author => {
            vec![Predicate::SubstringMatch(Field::AuthorName, value.to_string())]
        },
        Criterion::Title => {
            vec![Predicate::SubstringMatch(Field::BookTitle, value.to_string())]
        },
    })
}
