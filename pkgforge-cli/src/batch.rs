//! Batch import files
//!
//! One model per line, three `;`-separated columns and no header:
//!
//! ```text
//! book;books;title:string:f:100 published:bool
//! author;authors;name:string:f:80 born:timestamp:t
//! ```
//!
//! Records are read lazily so that models before a malformed line are
//! generated before the import stops.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use csv::{ReaderBuilder, StringRecordsIntoIter};

/// Columns per record
pub const COLUMNS: usize = 3;

/// One model to scaffold
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    /// Line number in the import file
    pub line: u64,
    /// Model name
    pub name: String,
    /// Table name
    pub table: String,
    /// Field specification
    pub fields: String,
}

/// Outcome of reading one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEntry {
    /// A model to scaffold
    Model(BatchRecord),
    /// A record whose field column is empty
    Skipped {
        /// Line number in the import file
        line: u64,
        /// Model name
        name: String,
    },
}

/// Streaming reader over an import file
pub struct BatchReader<R: Read> {
    records: StringRecordsIntoIter<R>,
}

impl BatchReader<File> {
    /// Open an import file
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not end in `.csv` or the file
    /// cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if !is_csv {
            bail!(
                "Import file {} must have the .csv extension",
                path.display()
            );
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open import file {}", path.display()))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> BatchReader<R> {
    /// Read records from any source
    pub fn from_reader(reader: R) -> Self {
        let records = ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_records();
        Self { records }
    }
}

impl<R: Read> Iterator for BatchReader<R> {
    type Item = Result<BatchEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = match self.records.next()? {
            Ok(record) => record,
            Err(err) => return Some(Err(err).context("Failed to read import record")),
        };
        let line = record.position().map_or(0, csv::Position::line);

        if record.len() != COLUMNS {
            return Some(Err(anyhow::anyhow!(
                "Line {line}: expected {COLUMNS} columns (model;table;fields), found {}",
                record.len()
            )));
        }

        let name = record[0].trim().to_string();
        let table = record[1].trim().to_string();
        let fields = record[2].trim().to_string();

        Some(Ok(if fields.is_empty() {
            BatchEntry::Skipped { line, name }
        } else {
            BatchEntry::Model(BatchRecord {
                line,
                name,
                table,
                fields,
            })
        }))
    }
}
