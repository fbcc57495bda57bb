//! Storage layer for fintrack
//!
//! Loads the record snapshot the engine works on and writes small JSON
//! files (settings) atomically. The engine itself never touches storage.

pub mod file_io;
pub mod snapshot;

pub use file_io::{read_json_required, write_json_atomic};
pub use snapshot::{LoadReport, Snapshot};
