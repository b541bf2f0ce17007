pub mod column;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use column::Column;
pub use error::CoreError;
pub use structs::{millis_to_datetime, Kline};
