use std::path::Path;

use crate::{FitError, FitResult};

/// Raw tabular data: an ordered header plus rows of string cells.
///
/// Cells stay unparsed strings until the encoder casts them; this is the
/// whole contract with whatever produced the file.
pub struct RawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> FitResult<usize> {
        self.header
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| FitError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// All raw values of one column, in row order.
    pub fn column(&self, name: &str) -> FitResult<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// Keep `take` rows starting at `skip`, dropping the rest.
    pub fn slice(&self, skip: usize, take: usize) -> RawTable {
        RawTable {
            header: self.header.clone(),
            rows: self.rows.iter().skip(skip).take(take).cloned().collect(),
        }
    }
}

/// Parse CSV text with a header line into a raw table.
pub fn parse_csv(data: &str) -> FitResult<RawTable> {
    read_table(
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(data.as_bytes()),
    )
}

/// Read a CSV file with a header line into a raw table.
pub fn read_csv(path: impl AsRef<Path>) -> FitResult<RawTable> {
    read_table(
        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)?,
    )
}

fn read_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> FitResult<RawTable> {
    let header: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    let mut rows = Vec::new();
    // The reader rejects rows whose cell count differs from the header's
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(|cell| cell.to_string()).collect());
    }
    Ok(RawTable { header, rows })
}
