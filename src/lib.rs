//! Book catalog kept in a single local JSON file.
//!
//! This crate provides the [`Catalog`] store, which owns every book record
//! and rewrites the backing file after each change, and the interactive
//! [`Shell`] that drives it from a numbered console menu.

pub mod book;
pub mod catalog;
pub mod config;
pub mod error;
pub mod persistence;
pub mod shell;

pub use book::{Book, BookStatus, NewBook};
pub use catalog::Catalog;
pub use config::Config;
pub use error::{CatalogError, Result};
pub use shell::{Command, Shell};
