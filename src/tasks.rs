//! CSV task file reader.
//!
//! Each data row becomes a [`TaskRow`] keyed by lower-cased header name.
//! Values are kept verbatim; interpretation happens in [`crate::issue`].

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Writer};
use thiserror::Error;
use tracing::debug;

/// Columns understood by the importer, in template order.
pub const COLUMNS: [&str; 6] = ["title", "description", "assignee", "labels", "type", "milestone"];

const TEMPLATE_EXAMPLE: [&str; 6] = [
    "Set up CI",
    "Run tests on every push",
    "alice, bob",
    "infra, ci",
    "Task",
    "Sprint 1",
];

#[derive(Debug, Error)]
pub enum TaskFileError {
    #[error("CSV file {path} not found or unreadable")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("error reading CSV file: {0}")]
    Parse(#[from] csv::Error),
}

/// One input record, keyed by lower-cased column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskRow {
    fields: HashMap<String, String>,
}

impl TaskRow {
    /// Raw value of a column, `None` if the row has no such column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Raw value of a column, empty if absent.
    pub fn field(&self, column: &str) -> &str {
        self.get(column).unwrap_or_default()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TaskRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into().to_lowercase(), v.into()))
                .collect(),
        }
    }
}

/// Reads every row of the CSV file at `path`, in file order.
pub fn read_tasks(path: &Path) -> Result<Vec<TaskRow>, TaskFileError> {
    let file = File::open(path).map_err(|source| TaskFileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_tasks_from(BufReader::new(file))
}

pub fn read_tasks_from<R: Read>(reader: R) -> Result<Vec<TaskRow>, TaskFileError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    debug!("CSV headers: {:?}", headers);

    let mut tasks = Vec::new();
    for record in rdr.records() {
        let record = record?;
        // Short rows leave trailing columns absent; extra values are dropped.
        let row: TaskRow = headers
            .iter()
            .zip(record.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        tasks.push(row);
    }

    if let Some(first) = tasks.first() {
        debug!("First task values: {:?}", first.fields);
    }
    Ok(tasks)
}

/// Writes a header row with every recognized column plus one example task.
pub fn write_template<W: Write>(out: W) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(COLUMNS)?;
    wtr.write_record(TEMPLATE_EXAMPLE)?;
    wtr.flush()?;
    Ok(())
}
