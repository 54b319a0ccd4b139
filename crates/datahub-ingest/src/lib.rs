//! Ingestion layer: object storage, CSV decoding and trigger events.

pub mod csv_table;
pub mod error;
pub mod event;
pub mod storage;

pub use csv_table::{
    CsvTable, NULL_MARKER, decode_text, get_field, get_optional, read_csv_rows, read_csv_table,
};
pub use error::{IngestError, Result, StorageError};
pub use event::{EventDetail, RequestParameters, TriggerEvent};
pub use storage::{LocalObjectStore, MemoryObjectStore, ObjectStore};
