//! Command-line configuration.
//!
//! Every option can also be set from the environment:
//! - `BOOK_CATALOG_FILE`: path of the catalog file (default: `books.json`)
//! - `BOOK_CATALOG_LOG`: log filter (default: `warn`); `RUST_LOG` wins if set

use std::path::PathBuf;

use clap::Parser;

/// Manage a catalog of books stored in a local JSON file
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "book-catalog")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Catalog file to read and rewrite
    #[arg(long, env = "BOOK_CATALOG_FILE", default_value = "books.json")]
    pub data_file: PathBuf,

    /// Log filter for diagnostics written to stderr
    #[arg(long, env = "BOOK_CATALOG_LOG", default_value = "warn")]
    pub log_level: String,

    /// Print plain, uncolored output
    #[arg(long)]
    pub no_color: bool,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_definition_is_consistent() {
        Config::command().debug_assert();
    }

    #[test]
    fn test_explicit_flags() {
        let config = Config::try_parse_from([
            "book-catalog",
            "--data-file",
            "/tmp/library.json",
            "--log-level",
            "debug",
            "--no-color",
        ])
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/tmp/library.json"));
        assert_eq!(config.log_level, "debug");
        assert!(config.no_color);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Config::try_parse_from(["book-catalog", "--verbose"]).is_err());
    }
}
