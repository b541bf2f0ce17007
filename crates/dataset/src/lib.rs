//! # Ripple Dataset Crate
//!
//! This crate owns the one and only source of market data: a headerless CSV
//! file of klines with twelve fixed columns. It is loaded once, kept
//! immutable, and handed out to the analytics as a shared snapshot.
//!
//! ## Public API
//!
//! - `load_dataset`: Reads and validates a source file into a `Dataset`.
//! - `Dataset`: The immutable, ordered table of `Kline` rows.
//! - `DatasetStore`: Holds the current snapshot and swaps in reloads atomically.
//! - `LoadError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod error;
pub mod loader;
pub mod store;
pub mod table;

// Re-export the key components to create a clean, public-facing API.
pub use error::LoadError;
pub use loader::{load_dataset, read_dataset};
pub use store::DatasetStore;
pub use table::Dataset;
