use crate::error::{LoanError, Result};
use serde::de::DeserializeOwned;
use std::io::Read;

/// Reads seed records from a CSV source.
///
/// Wraps `csv::Reader` and yields one `Result<T>` per row. Whitespace around
/// fields is trimmed and empty fields deserialize to `None`.
pub struct SeedReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SeedReader<R> {
    /// Creates a new `SeedReader` from any `Read` source (e.g., File, a byte slice).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes records.
    pub fn records<T: DeserializeOwned>(self) -> impl Iterator<Item = Result<T>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(LoanError::from))
    }

    /// Reads every record, stopping at the first malformed row.
    pub fn read_all<T: DeserializeOwned>(self) -> Result<Vec<T>> {
        self.records().collect()
    }
}
