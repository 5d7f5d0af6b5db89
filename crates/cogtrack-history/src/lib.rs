//! cogtrack-history — history provider implementations.
//!
//! Implements the `HistoryProvider` trait over an in-memory store (for
//! tests and embedding) and a JSON file (for the CLI), so the trend
//! analyzer can read a subject's scored history from multiple backends.

pub mod file;
pub mod memory;
pub mod record;

pub use file::JsonFileHistory;
pub use memory::MemoryHistory;
pub use record::StoredResult;
