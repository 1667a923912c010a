//! Reading and writing the catalog file.
//!
//! The file is a JSON array of book records, UTF-8, indented with four
//! spaces, with non-ASCII text written literally. It is always read and
//! written as a whole.

use std::{
    collections::HashSet,
    fs::File,
    io::{ErrorKind, Read, Write},
    path::Path,
};

use serde::Serialize;
use serde_json::{Serializer, ser::PrettyFormatter};

use crate::{
    book::Book,
    error::{CatalogError, Result},
};

/// Indentation used for the catalog file
const INDENT: &[u8] = b"    ";

/// Read every record from `path`.
///
/// Returns `Ok(None)` when there is nothing usable to load: the file does
/// not exist, is not valid JSON, or holds records that break the catalog
/// invariants (non-positive id or year, unknown status, duplicate ids).
/// Callers treat that as an empty catalog.
///
/// # Errors
///
/// Returns `CatalogError::Read` if the file exists but cannot be opened or
/// read.
pub fn read_books(path: &Path) -> Result<Option<Vec<Book>>> {
    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "catalog file does not exist yet");
            return Ok(None);
        }
        Err(source) => return Err(CatalogError::Read { path: path.to_path_buf(), source }),
    };

    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|source| CatalogError::Read { path: path.to_path_buf(), source })?;

    let books: Vec<Book> = match serde_json::from_slice(&contents) {
        Ok(books) => books,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable catalog file");
            return Ok(None);
        }
    };

    if let Some(reason) = find_violation(&books) {
        tracing::warn!(path = %path.display(), reason, "ignoring inconsistent catalog file");
        return Ok(None);
    }

    tracing::debug!(path = %path.display(), count = books.len(), "loaded catalog");
    Ok(Some(books))
}

/// Overwrite `path` with `books`.
///
/// # Errors
///
/// Returns `CatalogError::Encode` if the records cannot be serialized and
/// `CatalogError::Write` if the file cannot be created or written.
pub fn write_books(path: &Path, books: &[Book]) -> Result<()> {
    let mut buffer = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    books.serialize(&mut serializer)?;

    let mut file = File::create(path)
        .map_err(|source| CatalogError::Write { path: path.to_path_buf(), source })?;
    file.write_all(&buffer)
        .map_err(|source| CatalogError::Write { path: path.to_path_buf(), source })?;

    tracing::debug!(path = %path.display(), count = books.len(), "saved catalog");
    Ok(())
}

/// Describe the first record that could not have been produced by the
/// catalog itself, if any
fn find_violation(books: &[Book]) -> Option<&'static str> {
    let mut seen = HashSet::with_capacity(books.len());
    for book in books {
        if !book.is_well_formed() {
            return Some("record with a non-positive id or year");
        }
        if !seen.insert(book.id) {
            return Some("duplicate book id");
        }
    }
    None
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used)]

    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::book::BookStatus;

    /// A small catalog with one non-ASCII record
    fn sample_books() -> Vec<Book> {
        vec![
            Book {
                id: 1,
                title: "Маленькая жизнь".to_string(),
                author: "Ханья Янагихара".to_string(),
                year: 2015,
                status: BookStatus::Available,
            },
            Book {
                id: 4,
                title: "Dune".to_string(),
                author: "Frank Herbert".to_string(),
                year: 1965,
                status: BookStatus::CheckedOut,
            },
        ]
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        let loaded = read_books(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        write_books(&path, &sample_books()).unwrap();
        assert_eq!(read_books(&path).unwrap(), Some(sample_books()));
    }

    #[test]
    fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        write_books(&path, &sample_books()).unwrap();
        let text = fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("[\n    {\n        \"id\": 1,\n        \"title\": \"Маленькая жизнь\","));
        assert!(text.contains("\"status\": \"checked_out\""));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_empty_catalog_is_written_as_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        write_books(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(read_books(&path).unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_invalid_contents_read_as_none() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("books.json");

        let cases: [&[u8]; 6] = [
            b"{ not json",
            b"{\"id\": 1}",
            b"[{\"id\": 1, \"title\": \"A\", \"author\": \"B\", \"year\": 2020, \"status\": \"lost\"}]",
            b"[{\"id\": 1, \"title\": \"A\", \"author\": \"B\", \"year\": 0, \"status\": \"available\"}]",
            b"[{\"id\": 2, \"title\": \"A\", \"author\": \"B\", \"year\": 1, \"status\": \"available\"},\
               {\"id\": 2, \"title\": \"C\", \"author\": \"D\", \"year\": 1, \"status\": \"available\"}]",
            &[0xff, 0xfe, 0x5b, 0x5d],
        ];

        for contents in cases {
            fs::write(&path, contents).unwrap();
            assert!(read_books(&path).unwrap().is_none());
        }
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be read as a file
        assert!(matches!(read_books(dir.path()), Err(CatalogError::Read { .. })));
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("books.json");
        assert!(matches!(write_books(&path, &sample_books()), Err(CatalogError::Write { .. })));
    }
}
