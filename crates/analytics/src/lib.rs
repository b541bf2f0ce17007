//! # Ripple Analytics Engine
//!
//! Read-only analytics over a single instrument's kline history: descriptive
//! statistics, row cleaning impact, calendar resampling, the RSI indicator and
//! Pearson correlation.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** This crate has no knowledge of HTTP, JSON encoding or the
//!   filesystem. It depends only on `core-types` and the `Dataset` table.
//! - **Snapshot in, records out:** Every operation borrows an immutable
//!   `Dataset`, builds its own scratch columns and returns plain serializable
//!   records. Nothing is written back, so queries can run concurrently.
//! - **Explicit absence:** Undefined results (0/0 ratios, too little history,
//!   all-missing columns) are `None`, never a numeric sentinel.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: The query facade, one method per analytics view.
//! - The engine modules (`stats`, `cleaning`, `resample`, `indicators`,
//!   `correlation`) for callers that want a single computation.
//! - `report`: The result records.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod cleaning;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod indicators;
pub mod report;
pub mod resample;
pub mod stats;

#[cfg(test)]
mod test_support;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use correlation::DEFAULT_CORRELATION_COLUMNS;
pub use error::AnalyticsError;
pub use indicators::DEFAULT_RSI_WINDOW;
pub use report::{
    CleanReport, CorrelationMatrix, DailyClosingPrices, MonthlyStatistics, MonthlyTrades,
    PricePrediction, RsiPoint, SummaryRow, TrendPoint,
};
