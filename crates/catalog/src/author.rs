use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A person credited on a catalog entry.
///
/// Life years are optional: the upstream dump leaves them out for
/// anonymous, corporate, and insufficiently researched authors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    /// Catalog name, usually "Surname, Given" (e.g. "Austen, Jane").
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_year: Option<i32>,
}
impl Author {
    pub fn new(name: impl Into<String>, birth_year: Option<i32>, death_year: Option<i32>) -> Self {
        Self { name: name.into(), birth_year, death_year }
    }
}

impl From<String> for Author {
    fn from(name: String) -> Self {
        Self::new(name, None, None)
    }
}
impl From<&str> for Author {
    fn from(name: &str) -> Self {
        Self::new(name, None, None)
    }
}

impl Display for Author {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (self.birth_year, self.death_year) {
            (Some(b), Some(d)) => write!(f, "{} ({b}-{d})", self.name),
            (Some(b), None) => write!(f, "{} ({b}-)", self.name),
            (None, Some(d)) => write!(f, "{} (-{d})", self.name),
            (None, None) => write!(f, "{}", self.name),
        }
    }
}
