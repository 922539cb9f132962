//! CSV encoder and decoder for [`Address`] records.

use ::csv::{ReaderBuilder, Writer};
use thiserror::Error;

use crate::store::{Address, AddressFields};

/// Header row written by [`encode`] and skipped by [`decode`].
pub const CSV_HEADER: [&str; 4] = ["First", "Last", "Email", "Phone"];

/// Error type for CSV transcoding.
#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("line {line}: expected 4 fields, found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("CSV writer failed: {0}")]
    Write(#[from] std::io::Error),

    #[error("CSV output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize records as CSV text: the header row, then one row per record.
pub fn encode(records: &[Address]) -> Result<String, TranscodeError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for record in records {
        writer.write_record([&record.first, &record.last, &record.email, &record.phone])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Parse CSV text into address fields.
///
/// Every row must carry exactly four fields. A first row equal to
/// [`CSV_HEADER`] (ignoring case and surrounding whitespace) is skipped.
pub fn decode(text: &str) -> Result<Vec<AddressFields>, TranscodeError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result?;

        if index == 0 && is_header(&record) {
            continue;
        }

        if record.len() != CSV_HEADER.len() {
            return Err(TranscodeError::FieldCount {
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
            });
        }

        rows.push(AddressFields {
            first: record[0].to_string(),
            last: record[1].to_string(),
            email: record[2].to_string(),
            phone: record[3].to_string(),
        });
    }

    Ok(rows)
}

fn is_header(record: &::csv::StringRecord) -> bool {
    record.len() == CSV_HEADER.len()
        && record
            .iter()
            .zip(CSV_HEADER)
            .all(|(field, expected)| field.trim().eq_ignore_ascii_case(expected))
}
