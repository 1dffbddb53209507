//! Raw CSV records and the sources that supply them.

use crate::error::{Result, SummaryError};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// One input row as an ordered list of string fields.
///
/// The row is not interpreted here. The first record of every source is the
/// header row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    fields: Vec<String>,
}

impl RawRecord {
    /// Creates a record from its fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RawRecord {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the field at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<csv::StringRecord> for RawRecord {
    fn from(record: csv::StringRecord) -> Self {
        RawRecord::new(record.iter())
    }
}

/// Something that can produce the raw records of an origin.
pub trait RecordSource {
    /// Reads every record of `origin`, header first.
    ///
    /// Fails with [`SummaryError::SourceUnavailable`] when the origin cannot
    /// be opened or read and with [`SummaryError::MalformedInput`] when its
    /// content is not delimited text.
    fn read(&self, origin: &Path) -> Result<Vec<RawRecord>>;
}

/// Reads comma-delimited files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFileSource;

impl RecordSource for CsvFileSource {
    fn read(&self, origin: &Path) -> Result<Vec<RawRecord>> {
        let unavailable = |source| SummaryError::SourceUnavailable {
            path: origin.to_path_buf(),
            source,
        };

        let file = File::open(origin).map_err(unavailable)?;
        read_records(BufReader::new(file)).map_err(|e| match e {
            SummaryError::Io(source) => unavailable(source),
            other => other,
        })
    }
}

/// Parses all records from a comma-delimited reader.
///
/// The header is returned as the first record. Rows may have differing
/// field counts; deciding what to do with short rows is left to the caller.
/// I/O failures are returned as [`SummaryError::Io`], everything else the
/// CSV parser rejects as [`SummaryError::MalformedInput`].
pub fn read_records<R: Read>(reader: R) -> Result<Vec<RawRecord>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in csv_reader.records() {
        match result {
            Ok(record) => records.push(RawRecord::from(record)),
            Err(e) if e.is_io_error() => return Err(SummaryError::Io(std::io::Error::other(e))),
            Err(e) => return Err(SummaryError::MalformedInput(e)),
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_header_and_rows() {
        let csv = "Id,Date,Transaction\n0,7/15,+60.5\n1,7/28,-10.3\n";
        let records = read_records(Cursor::new(csv)).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0], RawRecord::new(["Id", "Date", "Transaction"]));
        assert_eq!(records[1].get(1), Some("7/15"));
        assert_eq!(records[2].get(2), Some("-10.3"));
    }

    #[test]
    fn test_trims_fields() {
        let csv = "Id, Date, Transaction\n0 ,  7/15 , +60.5 \n";
        let records = read_records(Cursor::new(csv)).unwrap();
        assert_eq!(records[1], RawRecord::new(["0", "7/15", "+60.5"]));
    }

    #[test]
    fn test_short_rows_are_not_structural_errors() {
        let csv = "Id,Date,Transaction\n0,7/15\n1,7/28,-10.3,extra\n";
        let records = read_records(Cursor::new(csv)).unwrap();
        assert_eq!(records[1].len(), 2);
        assert_eq!(records[2].len(), 4);
    }

    #[test]
    fn test_empty_input_has_no_records() {
        let records = read_records(Cursor::new("")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"Id,Date,Transaction\n0,7/15,\xff\xfe\n";
        let err = read_records(Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, SummaryError::MalformedInput(_)));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = CsvFileSource
            .read(Path::new("definitely/not/here.csv"))
            .unwrap_err();
        match err {
            SummaryError::SourceUnavailable { path, .. } => {
                assert_eq!(path, Path::new("definitely/not/here.csv"));
            }
            other => panic!("Expected SourceUnavailable, got {:?}", other),
        }
    }
}
