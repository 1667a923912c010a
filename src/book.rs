use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CatalogError, Result};

/// Availability of a book in the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// Book is on the shelf
    #[default]
    Available,
    /// Book has been lent out
    CheckedOut,
}

impl BookStatus {
    /// Both statuses, in menu order
    pub const ALL: [Self; 2] = [Self::Available, Self::CheckedOut];

    /// The string form used in the catalog file and at the prompt
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked_out",
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookStatus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CatalogError::InvalidStatus(s.to_string()))
    }
}

/// A single record in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Book {
    /// Unique, positive identifier assigned by the catalog
    pub id: u64,
    /// Title as entered
    pub title: String,
    /// Author as entered
    pub author: String,
    /// Publication year, always positive
    pub year: u32,
    /// Current availability
    pub status: BookStatus,
}

impl Book {
    /// Whether the record is acceptable in a stored catalog
    pub(crate) fn is_well_formed(&self) -> bool {
        self.id > 0 && self.year > 0
    }
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "id-{}: title: {}, author: {}, year: {}, status: {}",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

/// Validated input for a book that has not been assigned an id yet.
///
/// Constructing one is the only way into [`Catalog::add`](crate::Catalog::add),
/// so every stored record has passed these checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    /// Title as entered
    pub title: String,
    /// Author as entered
    pub author: String,
    /// Publication year
    pub year: u32,
}

impl NewBook {
    /// Build a draft from already typed fields.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidYear` if `year` is zero, negative, or
    /// does not fit a `u32`.
    pub fn new(title: &str, author: &str, year: i64) -> Result<Self> {
        let year = u32::try_from(year)
            .ok()
            .filter(|year| *year > 0)
            .ok_or_else(|| CatalogError::InvalidYear(year.to_string()))?;

        Ok(Self { title: title.to_string(), author: author.to_string(), year })
    }

    /// Build a draft from a loosely typed JSON object with `title`,
    /// `author` and `year` keys.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidType` if `title` or `author` is absent
    /// or not a string, and `CatalogError::InvalidYear` if `year` is absent,
    /// not an integer, or not positive. Type errors are reported first.
    pub fn from_value(value: &Value) -> Result<Self> {
        let title = string_field(value, "title")?;
        let author = string_field(value, "author")?;

        let year = match value.get("year") {
            Some(raw) => raw.as_i64().ok_or_else(|| CatalogError::InvalidYear(raw.to_string()))?,
            None => return Err(CatalogError::InvalidYear("nothing".to_string())),
        };

        Self::new(title, author, year)
    }
}

/// Look up `field` in `value` and require it to be a JSON string
fn string_field<'v>(value: &'v Value, field: &'static str) -> Result<&'v str> {
    value.get(field).and_then(Value::as_str).ok_or(CatalogError::InvalidType { field })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_status_round_trips_through_strings() {
        for status in BookStatus::ALL {
            assert_eq!(status.as_str().parse::<BookStatus>().ok(), Some(status));
        }
        assert!(matches!(
            "lost".parse::<BookStatus>(),
            Err(CatalogError::InvalidStatus(ref s)) if s == "lost"
        ));
        assert!("Available".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        assert_eq!(serde_json::to_value(BookStatus::CheckedOut).ok(), Some(json!("checked_out")));
        assert_eq!(BookStatus::default(), BookStatus::Available);
    }

    #[test]
    fn test_book_display() {
        let book = Book {
            id: 3,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            year: 1965,
            status: BookStatus::CheckedOut,
        };
        assert_eq!(
            book.to_string(),
            "id-3: title: Dune, author: Frank Herbert, year: 1965, status: checked_out"
        );
    }

    #[test]
    fn test_new_book_rejects_non_positive_years() {
        assert!(NewBook::new("A", "B", 2020).is_ok());
        assert!(matches!(NewBook::new("A", "B", 0), Err(CatalogError::InvalidYear(_))));
        assert!(matches!(NewBook::new("A", "B", -1), Err(CatalogError::InvalidYear(_))));
        assert!(matches!(
            NewBook::new("A", "B", i64::from(u32::MAX) + 1),
            Err(CatalogError::InvalidYear(_))
        ));
    }

    #[test]
    fn test_new_book_accepts_empty_strings() {
        let draft = NewBook::new("", "", 1);
        assert!(matches!(draft, Ok(NewBook { ref title, .. }) if title.is_empty()));
    }

    #[test]
    fn test_from_value_type_errors() {
        let missing_title = json!({ "author": "B", "year": 2020 });
        assert!(matches!(
            NewBook::from_value(&missing_title),
            Err(CatalogError::InvalidType { field: "title" })
        ));

        let numeric_author = json!({ "title": "A", "author": 7, "year": 2020 });
        assert!(matches!(
            NewBook::from_value(&numeric_author),
            Err(CatalogError::InvalidType { field: "author" })
        ));

        // type errors win over a bad year
        let both_bad = json!({ "title": null, "author": "B", "year": -5 });
        assert!(matches!(NewBook::from_value(&both_bad), Err(CatalogError::InvalidType { .. })));
    }

    #[test]
    fn test_from_value_year_errors() {
        for year in [json!(-1), json!(0), json!(2020.5), json!("2020"), Value::Null] {
            let value = json!({ "title": "A", "author": "B", "year": year });
            assert!(matches!(NewBook::from_value(&value), Err(CatalogError::InvalidYear(_))));
        }

        let ok = json!({ "title": "A", "author": "B", "year": 2020 });
        assert_eq!(
            NewBook::from_value(&ok).ok(),
            Some(NewBook { title: "A".to_string(), author: "B".to_string(), year: 2020 })
        );
    }
}
