//! Line-oriented bulk import of movie records.
//!
//! # Responsibility
//! - Read `title,director,year,runtime,platform,rating,tags,MM-DD-YYYY`
//!   records into candidate movies.
//! - Feed valid candidates through `MovieManager::try_add`.
//! - Report skipped lines with reasons without failing the import.
//!
//! # Invariants
//! - A bad line skips that line only; no partial record is ever added.
//! - Only a source open/read failure stops the import early; records added
//!   before the failure stay added and are returned.
//! - There is no header row, quoting or escaping. A comma inside a field
//!   changes the field count and skips the line, and so does a trailing comma.
//! - Blank lines are not records. Line numbers still count them.

use crate::model::movie::{parse_float, parse_int, MovieField, MovieRecord};
use crate::repo::movie_repo::MovieRepository;
use crate::service::movie_manager::MovieManager;
use crate::validation::{is_valid_date, is_valid_rating};
use csv::{ByteRecord, Reader, ReaderBuilder, Trim};
use log::{error, info, warn};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use uuid::Uuid;

/// Number of comma-separated fields in one import line.
pub const IMPORT_FIELD_COUNT: usize = 8;

/// Why one import line was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Line did not split into exactly eight fields.
    FieldCount(usize),
    /// Line bytes are not valid UTF-8.
    InvalidEncoding,
    /// A numeric field did not parse.
    InvalidNumber(MovieField),
    InvalidDate,
    RatingOutOfRange,
    /// The manager refused the record; carries `ManagerError::code()`.
    Rejected(&'static str),
}

impl Display for SkipReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FieldCount(count) => {
                write!(f, "expected {IMPORT_FIELD_COUNT} fields, found {count}")
            }
            Self::InvalidEncoding => write!(f, "line is not valid UTF-8"),
            Self::InvalidNumber(field) => write!(f, "{field} is not a number"),
            Self::InvalidDate => write!(f, "dateWatched is not a valid MM-DD-YYYY date"),
            Self::RatingOutOfRange => write!(f, "rating is outside 0.0-10.0"),
            Self::Rejected(code) => write!(f, "rejected by manager: {code}"),
        }
    }
}

/// One skipped line, numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub reason: SkipReason,
}

/// Outcome of one import run.
#[derive(Debug)]
pub struct ImportReport {
    /// Correlates this run's log lines.
    pub batch_id: Uuid,
    /// Stored records, in source order.
    pub added: Vec<MovieRecord>,
    pub skipped: Vec<SkippedLine>,
    /// Line number of the last record read.
    pub lines_read: usize,
    /// Set when the source could not be opened or read to the end.
    pub source_error: Option<io::Error>,
}

impl ImportReport {
    fn new() -> Self {
        Self {
            batch_id: Uuid::new_v4(),
            added: Vec::new(),
            skipped: Vec::new(),
            lines_read: 0,
            source_error: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.source_error.is_none()
    }
}

// Literal commas only: no header, no quotes, fields trimmed, any field count.
fn import_reader<S: Read>(source: S) -> Reader<S> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(Trim::All)
        .from_reader(source)
}

/// Parses one import line into an unsaved record.
///
/// An empty line has no fields and reports `FieldCount(0)`.
pub fn parse_import_line(line: &str) -> Result<MovieRecord, SkipReason> {
    let mut record = ByteRecord::new();
    match import_reader(line.as_bytes()).read_byte_record(&mut record) {
        Ok(true) => parse_import_record(&record),
        Ok(false) | Err(_) => Err(SkipReason::FieldCount(0)),
    }
}

/// Interprets one raw import record.
///
/// Date and rating are checked here so the skip reason names them; the
/// manager re-validates on add.
pub fn parse_import_record(record: &ByteRecord) -> Result<MovieRecord, SkipReason> {
    let fields = record
        .iter()
        .map(std::str::from_utf8)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| SkipReason::InvalidEncoding)?;
    let [title, director, year, runtime, platform, rating, tags, date_watched] = fields[..] else {
        return Err(SkipReason::FieldCount(fields.len()));
    };

    let release_year = parse_int(MovieField::ReleaseYear, year)
        .map_err(|err| SkipReason::InvalidNumber(err.field))?;
    let runtime_minutes = parse_int(MovieField::RuntimeMinutes, runtime)
        .map_err(|err| SkipReason::InvalidNumber(err.field))?;
    let rating = parse_float(MovieField::Rating, rating)
        .map_err(|err| SkipReason::InvalidNumber(err.field))?;

    if !is_valid_date(date_watched) {
        return Err(SkipReason::InvalidDate);
    }
    if !is_valid_rating(rating) {
        return Err(SkipReason::RatingOutOfRange);
    }

    Ok(MovieRecord::new(
        title,
        director,
        release_year,
        runtime_minutes,
        platform,
        rating,
        tags,
        date_watched,
    ))
}

fn into_io_error(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(err) => err,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{other:?}")),
    }
}

impl<R: MovieRepository> MovieManager<R> {
    /// Imports every valid line from `reader`, returning the stored records.
    pub fn import_from(&mut self, reader: impl BufRead) -> Vec<MovieRecord> {
        self.import_with_report(reader).added
    }

    /// Imports from a file path; an unopenable file yields an empty list.
    pub fn import_from_path(&mut self, path: impl AsRef<Path>) -> Vec<MovieRecord> {
        self.import_path_with_report(path).added
    }

    /// Like `import_from_path`, returning the full report.
    pub fn import_path_with_report(&mut self, path: impl AsRef<Path>) -> ImportReport {
        match File::open(path.as_ref()) {
            Ok(file) => self.import_with_report(BufReader::new(file)),
            Err(err) => {
                let mut report = ImportReport::new();
                error!(
                    "event=bulk_import module=import status=error batch_id={} error_code=source_open_failed error={err}",
                    report.batch_id
                );
                report.source_error = Some(err);
                report
            }
        }
    }

    /// Imports every valid line from `reader`, returning the full report.
    pub fn import_with_report(&mut self, reader: impl BufRead) -> ImportReport {
        let mut report = ImportReport::new();
        let batch_id = report.batch_id;
        info!("event=bulk_import module=import status=start batch_id={batch_id}");

        let mut source = import_reader(reader);
        let mut record = ByteRecord::new();
        loop {
            match source.read_byte_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(err) => {
                    error!(
                        "event=bulk_import module=import status=error batch_id={batch_id} after_line={} error_code=source_read_failed error={err}",
                        report.lines_read
                    );
                    report.source_error = Some(into_io_error(err));
                    break;
                }
            }
            let line_number = record
                .position()
                .and_then(|position| usize::try_from(position.line()).ok())
                .unwrap_or(report.lines_read + 1);
            report.lines_read = line_number;

            let outcome = parse_import_record(&record).and_then(|candidate| {
                self.try_add(&candidate)
                    .map_err(|err| SkipReason::Rejected(err.code()))
            });
            match outcome {
                Ok(stored) => report.added.push(stored),
                Err(reason) => {
                    warn!(
                        "event=bulk_import_line module=import status=skipped batch_id={batch_id} line={line_number} reason=\"{reason}\""
                    );
                    report.skipped.push(SkippedLine {
                        line_number,
                        reason,
                    });
                }
            }
        }

        info!(
            "event=bulk_import module=import status={} batch_id={batch_id} lines={} added={} skipped={}",
            if report.is_complete() { "ok" } else { "partial" },
            report.lines_read,
            report.added.len(),
            report.skipped.len()
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_import_line, parse_import_record, SkipReason};
    use csv::ByteRecord;
    use crate::model::movie::{MovieField, MovieRecord};

    #[test]
    fn parses_trimmed_fields_in_positional_order() {
        let movie = parse_import_line(
            " It Follows , David Robert Mitchell ,2014, 100 ,Netflix, 6.8 ,supernatural, 10-29-2021 ",
        )
        .unwrap();
        assert_eq!(
            movie,
            MovieRecord::new(
                "It Follows",
                "David Robert Mitchell",
                2014,
                100,
                "Netflix",
                6.8,
                "supernatural",
                "10-29-2021"
            )
        );
    }

    #[test]
    fn wrong_field_counts_are_skipped() {
        assert_eq!(parse_import_line(""), Err(SkipReason::FieldCount(0)));
        assert_eq!(
            parse_import_line("Alien,Ridley Scott,1979,117,Hulu,8.5,space,creature,10-01-2021"),
            Err(SkipReason::FieldCount(9))
        );
    }

    #[test]
    fn each_numeric_field_names_itself() {
        assert_eq!(
            parse_import_line("A,B,year,90,P,5.0,t,10-01-2021"),
            Err(SkipReason::InvalidNumber(MovieField::ReleaseYear))
        );
        assert_eq!(
            parse_import_line("A,B,1990,long,P,5.0,t,10-01-2021"),
            Err(SkipReason::InvalidNumber(MovieField::RuntimeMinutes))
        );
        assert_eq!(
            parse_import_line("A,B,1990,90,P,great,t,10-01-2021"),
            Err(SkipReason::InvalidNumber(MovieField::Rating))
        );
    }

    #[test]
    fn date_and_rating_rules_apply() {
        assert_eq!(
            parse_import_line("A,B,1990,90,P,5.0,t,30-10-2021"),
            Err(SkipReason::InvalidDate)
        );
        assert_eq!(
            parse_import_line("A,B,1990,90,P,10.5,t,10-30-2021"),
            Err(SkipReason::RatingOutOfRange)
        );
    }

    #[test]
    fn trailing_comma_counts_as_an_extra_field() {
        assert_eq!(
            parse_import_line("Alien,Ridley Scott,1979,117,Hulu,8.5,space,10-01-2021,"),
            Err(SkipReason::FieldCount(9))
        );
    }

    #[test]
    fn quotes_are_literal_text() {
        let movie =
            parse_import_line("\"Tusk\",Kevin Smith,2014,102,Prime,5.4,body horror,09-19-2021")
                .unwrap();
        assert_eq!(movie.title, "\"Tusk\"");
    }

    #[test]
    fn undecodable_field_is_reported_as_encoding() {
        let fields: [&[u8]; 8] = [
            b"Bad\xff",
            b"X",
            b"2000",
            b"90",
            b"P",
            b"5.0",
            b"t",
            b"01-01-2020",
        ];
        let record = ByteRecord::from(fields.to_vec());
        assert_eq!(
            parse_import_record(&record),
            Err(SkipReason::InvalidEncoding)
        );
    }
}
