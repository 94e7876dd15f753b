//! Interactive console menu over the movie manager.
//!
//! # Invariants
//! - Any failed operation prints a message and returns to the menu.
//! - End of input exits the loop as if `7` had been chosen.

use slasherstats_core::{MovieField, MovieForm, MovieManager, MovieRepository};
use std::io::{self, BufRead, Write};
use std::path::Path;

const MENU: &str = "
---*Welcome to the SlasherStats App*---
1. Create Horror Movie Entry
2. Add bulk Horror Movie Entries
3. View All Movies
4. Update Movie Entry
5. Delete Movie Entry
6. View Account Points
7. Exit
Enter your choice: ";

/// Console session bound to one manager and one input/output pair.
pub struct ConsoleMenu<R: MovieRepository, I: BufRead, O: Write> {
    manager: MovieManager<R>,
    input: I,
    output: O,
}

impl<R: MovieRepository, I: BufRead, O: Write> ConsoleMenu<R, I, O> {
    pub fn new(manager: MovieManager<R>, input: I, output: O) -> Self {
        Self {
            manager,
            input,
            output,
        }
    }

    /// Runs until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let Some(choice) = self.prompt(MENU)? else {
                break;
            };
            let keep_running = match choice.trim() {
                "1" => self.add_entry()?,
                "2" => self.bulk_import()?,
                "3" => self.view_all()?,
                "4" => self.update_entry()?,
                "5" => self.delete_entry()?,
                "6" => {
                    let points = self.manager.account_points();
                    writeln!(self.output, "Account points: {points}")?;
                    true
                }
                "7" => false,
                _ => {
                    writeln!(self.output, "Invalid input")?;
                    true
                }
            };
            if !keep_running {
                break;
            }
        }
        writeln!(self.output, "System is powering down...")?;
        self.output.flush()
    }

    fn add_entry(&mut self) -> io::Result<bool> {
        let mut form = MovieForm::default();
        for field in MovieField::ALL {
            let label = match field {
                MovieField::Rating => "Rating (0.0 - 10.0)".to_string(),
                MovieField::DateWatched => "Date Watched (MM-DD-YYYY)".to_string(),
                other => other.label().to_string(),
            };
            let Some(value) = self.prompt(&format!("Enter {label}: "))? else {
                return Ok(false);
            };
            form.set(field, value);
        }

        let movie = match form.bind(self.manager.config().validation) {
            Ok(movie) => movie,
            Err(err) => {
                writeln!(self.output, "Invalid input:")?;
                for field_error in err.errors() {
                    writeln!(
                        self.output,
                        "  {}: {}",
                        field_error.field.label(),
                        field_error.message
                    )?;
                }
                return Ok(true);
            }
        };

        match self.manager.try_add(&movie) {
            Ok(_) => writeln!(self.output, "Horror movie added.")?,
            Err(err) => writeln!(self.output, "Movie not added: {err}")?,
        }
        Ok(true)
    }

    fn bulk_import(&mut self) -> io::Result<bool> {
        let Some(filename) = self.prompt("Enter filename: ")? else {
            return Ok(false);
        };
        let report = self
            .manager
            .import_path_with_report(Path::new(filename.trim()));

        if let Some(err) = &report.source_error {
            writeln!(self.output, "Could not read file: {err}")?;
        }
        writeln!(self.output, "Added {} movies.", report.added.len())?;
        if !report.skipped.is_empty() {
            writeln!(self.output, "Skipped {} lines:", report.skipped.len())?;
            for skipped in &report.skipped {
                writeln!(self.output, "  line {}: {}", skipped.line_number, skipped.reason)?;
            }
        }
        Ok(true)
    }

    fn view_all(&mut self) -> io::Result<bool> {
        let movies = self.manager.list_movies();
        if movies.is_empty() {
            writeln!(self.output, "No movies in the database.")?;
        }
        for movie in movies {
            writeln!(self.output, "\n{movie}")?;
        }
        Ok(true)
    }

    fn update_entry(&mut self) -> io::Result<bool> {
        let Some(title) = self.prompt("Enter the title of the movie you want to update: ")? else {
            return Ok(false);
        };
        if self.manager.find_movie(&title).is_none() {
            writeln!(self.output, "Movie not found.")?;
            return Ok(true);
        }

        writeln!(self.output, "Select the field to update:")?;
        for field in MovieField::ALL {
            writeln!(self.output, "{}. {}", field.menu_index(), field.label())?;
        }
        let Some(choice) = self.prompt("Enter choice: ")? else {
            return Ok(false);
        };
        let Some(field) = choice
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(MovieField::from_menu_index)
        else {
            writeln!(self.output, "Invalid field.")?;
            return Ok(true);
        };
        let Some(value) = self.prompt("Enter the new field: ")? else {
            return Ok(false);
        };

        match self.manager.try_update_field(&title, field, &value) {
            Ok(_) => writeln!(self.output, "Movie updated.")?,
            Err(err) => writeln!(self.output, "Update failed: {err}")?,
        }
        Ok(true)
    }

    fn delete_entry(&mut self) -> io::Result<bool> {
        let Some(title) = self.prompt("Enter title of movie to delete: ")? else {
            return Ok(false);
        };
        let message = if self.manager.delete_movie(&title) {
            "Movie deleted."
        } else {
            "Movie not found."
        };
        writeln!(self.output, "{message}")?;
        Ok(true)
    }

    /// Prints `text` and reads one line without its terminator.
    /// Returns `None` at end of input.
    fn prompt(&mut self, text: &str) -> io::Result<Option<String>> {
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
}

#[cfg(test)]
mod tests {
    use super::ConsoleMenu;
    use slasherstats_core::{InMemoryMovieRepository, MovieManager};
    use std::io::{Cursor, Write};

    fn run_session(script: &str) -> String {
        let manager = MovieManager::new(InMemoryMovieRepository::new());
        let mut output = Vec::new();
        ConsoleMenu::new(manager, Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn add_list_points_and_exit() {
        let output = run_session(
            "1\nScream\nWes Craven\n1996\n111\nHBO Max\n7.8\nslasher\n10-30-2021\n3\n6\n7\n",
        );
        assert!(output.contains("Horror movie added."));
        assert!(output.contains("Title: Scream"));
        assert!(output.contains("Account points: 10"));
        assert!(output.ends_with("System is powering down...\n"));
    }

    #[test]
    fn add_with_bad_fields_reports_each_one() {
        let output = run_session("1\nScream\nWes Craven\nsoon\n111\nHBO Max\n12\nslasher\n10-30-2021\n6\n");
        assert!(output.contains("Invalid input:"));
        assert!(output.contains("  Release Year:"));
        assert!(output.contains("  Rating:"));
        assert!(output.contains("Account points: 0"));
    }

    #[test]
    fn update_and_delete_flow() {
        let output = run_session(concat!(
            "1\nScream\nWes Craven\n1996\n111\nHBO Max\n7.8\nslasher\n10-30-2021\n",
            "4\nscream\n6\n9.5\n",
            "4\nScream\n9\n",
            "4\nScream\n1\nScream 2\n",
            "4\nNope\n",
            "5\nSCREAM\n",
            "5\nScream\n",
            "7\n",
        ));
        assert!(output.contains("Movie updated."));
        assert!(output.contains("Invalid field."));
        assert!(output.contains("Update failed: invalid movie: title:"));
        assert!(output.contains("Movie not found."));
        assert!(output.contains("Movie deleted."));
    }

    #[test]
    fn bulk_import_reports_counts_and_skips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bulk.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "It Follows,David Robert Mitchell,2014,100,Netflix,6.8,supernatural,10-29-2021"
        )
        .unwrap();
        writeln!(file, "broken line").unwrap();
        drop(file);

        let output = run_session(&format!("2\n{}\n6\n", path.display()));
        assert!(output.contains("Added 1 movies."));
        assert!(output.contains("line 2: expected 8 fields, found 1"));
        assert!(output.contains("Account points: 10"));
    }

    #[test]
    fn unknown_choice_and_eof_exit_cleanly() {
        let output = run_session("42\n");
        assert!(output.contains("Invalid input"));
        assert!(output.ends_with("System is powering down...\n"));
    }
}
