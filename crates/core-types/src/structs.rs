use crate::column::Column;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV candlestick row, exactly as it appears in the source file.
///
/// Every field is optional: a cell that is empty (or a `NaN` literal) in the
/// source is kept as `None` so the analytics can tell "missing" from zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Kline {
    /// Open timestamp in milliseconds since the Unix epoch.
    pub open_time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    /// Close timestamp in milliseconds since the Unix epoch.
    pub close_time: Option<i64>,
    pub quote_asset_volume: Option<f64>,
    pub number_of_trades: Option<i64>,
    pub taker_buy_base_asset_volume: Option<f64>,
    pub taker_buy_quote_asset_volume: Option<f64>,
    /// Opaque passthrough field; never read by any analytic.
    pub ignore: Option<String>,
}

impl Kline {
    /// Returns the value of a numeric column as `f64`, or `None` if missing.
    ///
    /// `Column::Ignore` always yields `None`.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::OpenTime => self.open_time.map(|v| v as f64),
            Column::Open => self.open,
            Column::High => self.high,
            Column::Low => self.low,
            Column::Close => self.close,
            Column::Volume => self.volume,
            Column::CloseTime => self.close_time.map(|v| v as f64),
            Column::QuoteAssetVolume => self.quote_asset_volume,
            Column::NumberOfTrades => self.number_of_trades.map(|v| v as f64),
            Column::TakerBuyBaseAssetVolume => self.taker_buy_base_asset_volume,
            Column::TakerBuyQuoteAssetVolume => self.taker_buy_quote_asset_volume,
            Column::Ignore => None,
        }
    }

    /// True when at least one of the twelve cells is missing.
    pub fn has_missing(&self) -> bool {
        Column::NUMERIC.iter().any(|c| self.value(*c).is_none()) || self.ignore.is_none()
    }

    /// The open timestamp as a UTC datetime.
    pub fn open_datetime(&self) -> Result<DateTime<Utc>, CoreError> {
        let millis = self.open_time.ok_or_else(|| {
            CoreError::InvalidInput("open_time".to_string(), "missing value".to_string())
        })?;
        millis_to_datetime(millis)
    }
}

/// Converts epoch milliseconds into a UTC datetime.
pub fn millis_to_datetime(millis: i64) -> Result<DateTime<Utc>, CoreError> {
    DateTime::<Utc>::from_timestamp_millis(millis).ok_or(CoreError::TimestampOutOfRange(millis))
}
