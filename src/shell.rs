//! Interactive numbered menu over a [`Catalog`].
//!
//! The shell reads one line per prompt from any [`BufRead`] and writes to
//! any [`Write`], so it runs the same against a terminal or a script.

use std::io::{BufRead, Write};

use colored::Colorize;

use crate::{
    catalog::Catalog,
    error::{CatalogError, Result},
};

/// An action selectable from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// Prompt for title, author and year and add a book
    Add,
    /// Prompt for an id and delete that book
    Delete,
    /// Prompt for a query and list matching books
    Search,
    /// List every book
    List,
    /// Prompt for an id and a status and apply it
    ChangeStatus,
    /// Leave the menu
    Exit,
}

impl Command {
    /// Menu entries in display order
    pub const ALL: [Self; 6] =
        [Self::Add, Self::Delete, Self::Search, Self::List, Self::ChangeStatus, Self::Exit];

    /// Parse a menu choice; surrounding whitespace is ignored
    #[must_use]
    pub fn from_choice(choice: &str) -> Option<Self> {
        let choice = choice.trim();
        Self::ALL.into_iter().find(|command| command.key() == choice)
    }

    /// The string that selects this command
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Add => "1",
            Self::Delete => "2",
            Self::Search => "3",
            Self::List => "4",
            Self::ChangeStatus => "5",
            Self::Exit => "0",
        }
    }

    /// Menu text for this command
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add a book",
            Self::Delete => "Delete a book",
            Self::Search => "Search books",
            Self::List => "Show all books",
            Self::ChangeStatus => "Change book status",
            Self::Exit => "Exit",
        }
    }
}

/// Console session driving a catalog
#[derive(Debug)]
pub struct Shell<R, W> {
    /// The catalog being managed
    catalog: Catalog,
    /// Source of user input, one answer per line
    input: R,
    /// Destination for menus, prompts and results
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over `catalog` talking through `input` and `output`
    #[must_use]
    pub fn new(catalog: Catalog, input: R, output: W) -> Self {
        Self { catalog, input, output }
    }

    /// The catalog being managed
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Take the shell apart, returning the catalog and the output sink
    #[must_use]
    pub fn into_parts(self) -> (Catalog, W) {
        (self.catalog, self.output)
    }

    /// Show the menu and run commands until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Console` if the console cannot be read or
    /// written, and any error from saving the catalog. Rejected input is
    /// reported to the user and does not end the session.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Select an action: ")? else {
                tracing::debug!("input closed, leaving menu");
                return self.exit();
            };

            match Command::from_choice(&choice) {
                Some(Command::Exit) => return self.exit(),
                Some(command) => self.dispatch(command)?,
                None => self.error("invalid choice.")?,
            }
        }
    }

    /// Execute one command. `Command::Exit` only prints the farewell; the
    /// caller decides whether to stop.
    ///
    /// # Errors
    ///
    /// Same as [`Shell::run`].
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Add => self.add_book(),
            Command::Delete => self.delete_book(),
            Command::Search => self.search_books(),
            Command::List => self.list_books(),
            Command::ChangeStatus => self.change_status(),
            Command::Exit => self.exit(),
        }
    }

    /// Print the numbered menu
    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.output, "\n{}", "--- Library catalog ---".bold())?;
        for command in Command::ALL {
            writeln!(self.output, "{}. {}", command.key(), command.label())?;
        }
        Ok(())
    }

    /// Print the farewell line
    fn exit(&mut self) -> Result<()> {
        writeln!(self.output, "Exiting.")?;
        Ok(())
    }

    /// Prompt for a title, author and year and add the book
    fn add_book(&mut self) -> Result<()> {
        let Some(title) = self.prompt("Enter the book title: ")? else { return Ok(()) };
        let Some(author) = self.prompt("Enter the book author: ")? else { return Ok(()) };
        let Some(year) = self.prompt_number("Enter the publication year: ")? else {
            return Ok(());
        };

        match self.catalog.add(&title, &author, year) {
            Ok(book) => self.success(&format!("Book added with id {}!", book.id)),
            Err(err) => self.report(err),
        }
    }

    /// Prompt for an id and delete that book
    fn delete_book(&mut self) -> Result<()> {
        let Some(id) = self.prompt_number("Enter the id of the book to delete: ")? else {
            return Ok(());
        };

        let deleted = match u64::try_from(id) {
            Ok(id) => self.catalog.delete(id)?,
            Err(_) => false,
        };
        if deleted {
            self.success("Book deleted.")
        } else {
            self.error("no book with that id.")
        }
    }

    /// Prompt for a query and list the matches
    fn search_books(&mut self) -> Result<()> {
        let Some(query) = self.prompt("Enter a title, author or year to search for: ")? else {
            return Ok(());
        };

        let results = self.catalog.search(&query);
        if results.is_empty() {
            writeln!(self.output, "No books found.")?;
        } else {
            writeln!(self.output, "Books found:")?;
            for book in results {
                writeln!(self.output, "{book}")?;
            }
        }
        Ok(())
    }

    /// List every book
    fn list_books(&mut self) -> Result<()> {
        if self.catalog.is_empty() {
            writeln!(self.output, "The catalog is empty.")?;
        } else {
            writeln!(self.output, "Books:")?;
            for book in self.catalog.books() {
                writeln!(self.output, "{book}")?;
            }
        }
        Ok(())
    }

    /// Prompt for an id and a status and apply it
    fn change_status(&mut self) -> Result<()> {
        let Some(id) = self.prompt_number("Enter the book id: ")? else { return Ok(()) };
        let Some(status) = self.prompt("Enter the new status (available/checked_out): ")? else {
            return Ok(());
        };
        let status = status.trim().to_lowercase();

        let changed = match u64::try_from(id) {
            Ok(id) => self.catalog.change_status(id, &status)?,
            Err(_) => false,
        };
        if changed {
            self.success("Book status changed!")
        } else {
            self.error("no book with that id, or the status is not valid.")
        }
    }

    /// Show `text` and read one line without its line ending.
    /// Returns `None` once input is exhausted.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Prompt for an integer. Prints an error and returns `None` if the
    /// answer is not one, so the calling command is abandoned.
    fn prompt_number(&mut self, text: &str) -> Result<Option<i64>> {
        let Some(answer) = self.prompt(text)? else { return Ok(None) };
        match answer.trim().parse() {
            Ok(number) => Ok(Some(number)),
            Err(_) => {
                self.error("enter a valid number.")?;
                Ok(None)
            }
        }
    }

    /// Show rejected input to the user; propagate anything else
    fn report(&mut self, err: CatalogError) -> Result<()> {
        if err.is_validation() {
            self.error(&err.to_string())
        } else {
            Err(err)
        }
    }

    /// Print a success message
    fn success(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{}", message.green())?;
        Ok(())
    }

    /// Print an error message
    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{} {message}", "Error:".red().bold())?;
        Ok(())
    }
}
