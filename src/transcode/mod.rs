//! CSV transcoding of address records.
//!
//! # Data Flow
//! ```text
//! Export: RecordStore::list() → csv.rs encode → text/csv body
//! Import: request body → csv.rs decode → Vec<AddressFields> → RecordStore::insert_many
//! ```
//!
//! # Design Decisions
//! - Quoting and escaping are left to the `csv` crate writer
//! - Import is all-or-nothing: the whole body is decoded before any insert
//! - A leading header row matching the export header is skipped, so an
//!   export can be fed straight back into import

pub mod csv;

pub use self::csv::{decode, encode, TranscodeError, CSV_HEADER};
