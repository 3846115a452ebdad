// CSV loading for the sleep-health dataset

use crate::data::RawTable;
use crate::error::Result;
use log::debug;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read a comma-delimited table with a header row.
///
/// Cells are trimmed; ragged rows are accepted and short rows read as
/// missing values.
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(String::from).collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(record.iter().map(String::from).collect());
    }

    debug!("read {} rows across {} columns", rows.len(), headers.len());
    Ok(RawTable::new(headers, rows))
}

pub fn read_csv_from_path(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    read_csv(file)
}

pub fn read_csv_from_stdin() -> Result<RawTable> {
    read_csv(io::stdin().lock())
}
