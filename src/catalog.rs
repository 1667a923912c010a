use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::{
    book::{Book, BookStatus, NewBook},
    error::{CatalogError, Result},
    persistence,
};

/// Catalog of books backed by a single JSON file.
///
/// Every mutating operation rewrites the whole file before returning. There
/// is no locking: one process owns the file for the lifetime of the catalog.
#[derive(Debug)]
pub struct Catalog {
    /// Location of the backing file
    path: PathBuf,
    /// Records in insertion order
    books: Vec<Book>,
}

impl Catalog {
    /// Open the catalog stored at `path`.
    ///
    /// A missing file, or one whose contents are not a valid catalog, opens
    /// as an empty catalog. This is what makes the first run work, and a
    /// damaged file is replaced on the next save.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Read` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let mut catalog = Self { path: path.into(), books: Vec::new() };
        catalog.load()?;
        Ok(catalog)
    }

    /// Replace the in-memory records with the contents of the backing file,
    /// falling back to an empty catalog as described on [`Catalog::open`].
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Read` if the file exists but cannot be read.
    pub fn load(&mut self) -> Result<()> {
        self.books = persistence::read_books(&self.path)?.unwrap_or_default();
        Ok(())
    }

    /// Write every record to the backing file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Write` or `CatalogError::Encode` if the file
    /// cannot be written.
    pub fn save(&self) -> Result<()> {
        persistence::write_books(&self.path, &self.books)
    }

    /// The id the next added book will receive: one more than the largest
    /// id in use, or 1 for an empty catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::IdSpaceExhausted` if the largest id is
    /// `u64::MAX`.
    pub fn generate_id(&self) -> Result<u64> {
        self.books
            .iter()
            .map(|book| book.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(CatalogError::IdSpaceExhausted)
    }

    /// Add a book and persist the catalog. The new book is `Available`; a
    /// copy of the stored record is returned.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidYear` if `year` is not positive. Nothing
    /// is stored in that case. Write failures are returned as from
    /// [`Catalog::save`].
    pub fn add(&mut self, title: &str, author: &str, year: i64) -> Result<Book> {
        let draft = NewBook::new(title, author, year)?;
        self.insert(draft)
    }

    /// Add a book described by a loosely typed JSON object with `title`,
    /// `author` and `year` keys.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidType` if `title` or `author` is not a
    /// string and `CatalogError::InvalidYear` if `year` is not a positive
    /// integer. Nothing is stored in either case. Write failures are
    /// returned as from [`Catalog::save`].
    pub fn add_value(&mut self, value: &Value) -> Result<Book> {
        let draft = NewBook::from_value(value)?;
        self.insert(draft)
    }

    /// Store a validated draft under a fresh id and persist
    fn insert(&mut self, draft: NewBook) -> Result<Book> {
        let id = self.generate_id()?;
        let NewBook { title, author, year } = draft;
        let book = Book { id, title, author, year, status: BookStatus::Available };

        tracing::info!(id, title = %book.title, author = %book.author, year, "adding book");
        self.books.push(book.clone());
        self.save()?;
        Ok(book)
    }

    /// Look up a book by id
    #[must_use]
    pub fn find_by_id(&self, id: u64) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Remove the book with `id`, persisting the change.
    ///
    /// Returns `false` and leaves the file untouched if no such book exists.
    ///
    /// # Errors
    ///
    /// Write failures are returned as from [`Catalog::save`].
    pub fn delete(&mut self, id: u64) -> Result<bool> {
        let Some(pos) = self.books.iter().position(|book| book.id == id) else {
            tracing::debug!(id, "delete requested for unknown book");
            return Ok(false);
        };

        let removed = self.books.remove(pos);
        tracing::info!(id, title = %removed.title, "deleted book");
        self.save()?;
        Ok(true)
    }

    /// Books whose title or author contains `query`, ignoring case, or, if
    /// `query` is all ASCII digits, whose year equals it. Results keep
    /// catalog order.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        let year = parse_year_query(query);

        self.books
            .iter()
            .filter(|book| {
                book.title.to_lowercase().contains(&needle)
                    || book.author.to_lowercase().contains(&needle)
                    || year.is_some_and(|year| year == book.year)
            })
            .collect()
    }

    /// Change the status of the book with `id` to the status named by
    /// `new_status`.
    ///
    /// Returns `false` if no such book exists or `new_status` is not
    /// `"available"` or `"checked_out"`; the book is not modified then.
    ///
    /// # Errors
    ///
    /// Write failures are returned as from [`Catalog::save`].
    pub fn change_status(&mut self, id: u64, new_status: &str) -> Result<bool> {
        match new_status.parse::<BookStatus>() {
            Ok(status) => self.set_status(id, status),
            Err(err) => {
                tracing::debug!(id, error = %err, "status change rejected");
                Ok(false)
            }
        }
    }

    /// Set the status of the book with `id`, persisting the change.
    ///
    /// Returns `false` if no such book exists.
    ///
    /// # Errors
    ///
    /// Write failures are returned as from [`Catalog::save`].
    pub fn set_status(&mut self, id: u64, status: BookStatus) -> Result<bool> {
        let Some(book) = self.books.iter_mut().find(|book| book.id == id) else {
            tracing::debug!(id, "status change requested for unknown book");
            return Ok(false);
        };

        tracing::info!(id, from = %book.status, to = %status, "changing book status");
        book.status = status;
        self.save()?;
        Ok(true)
    }

    /// All books in catalog order
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Number of books in the catalog
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    /// Whether the catalog holds no books
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Location of the backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// The year a search query names, if it consists only of ASCII digits
fn parse_year_query(query: &str) -> Option<u32> {
    if query.is_empty() || !query.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    query.parse().ok()
}
