use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the twelve fixed columns of a kline source file, in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    OpenTime,
    Open,
    High,
    Low,
    Close,
    Volume,
    CloseTime,
    QuoteAssetVolume,
    NumberOfTrades,
    TakerBuyBaseAssetVolume,
    TakerBuyQuoteAssetVolume,
    Ignore,
}

impl Column {
    /// All columns in source file order.
    pub const ALL: [Column; 12] = [
        Column::OpenTime,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::CloseTime,
        Column::QuoteAssetVolume,
        Column::NumberOfTrades,
        Column::TakerBuyBaseAssetVolume,
        Column::TakerBuyQuoteAssetVolume,
        Column::Ignore,
    ];

    /// Columns that carry numbers the analytics can aggregate. `Ignore` is passthrough.
    pub const NUMERIC: [Column; 11] = [
        Column::OpenTime,
        Column::Open,
        Column::High,
        Column::Low,
        Column::Close,
        Column::Volume,
        Column::CloseTime,
        Column::QuoteAssetVolume,
        Column::NumberOfTrades,
        Column::TakerBuyBaseAssetVolume,
        Column::TakerBuyQuoteAssetVolume,
    ];

    /// The human-readable label used in reports (e.g. `"Number of trades"`).
    pub fn label(&self) -> &'static str {
        match self {
            Column::OpenTime => "Open time",
            Column::Open => "Open",
            Column::High => "High",
            Column::Low => "Low",
            Column::Close => "Close",
            Column::Volume => "Volume",
            Column::CloseTime => "Close time",
            Column::QuoteAssetVolume => "Quote asset volume",
            Column::NumberOfTrades => "Number of trades",
            Column::TakerBuyBaseAssetVolume => "Taker buy base asset volume",
            Column::TakerBuyQuoteAssetVolume => "Taker buy quote asset volume",
            Column::Ignore => "Ignore",
        }
    }

    /// The snake_case identifier accepted in configuration and query strings.
    pub fn key(&self) -> &'static str {
        match self {
            Column::OpenTime => "open_time",
            Column::Open => "open",
            Column::High => "high",
            Column::Low => "low",
            Column::Close => "close",
            Column::Volume => "volume",
            Column::CloseTime => "close_time",
            Column::QuoteAssetVolume => "quote_asset_volume",
            Column::NumberOfTrades => "number_of_trades",
            Column::TakerBuyBaseAssetVolume => "taker_buy_base_asset_volume",
            Column::TakerBuyQuoteAssetVolume => "taker_buy_quote_asset_volume",
            Column::Ignore => "ignore",
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Ignore)
    }

    /// Position of the column in a source row.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Column {
    type Err = CoreError;

    /// Accepts either the snake_case key or the report label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Column::ALL
            .into_iter()
            .find(|c| c.key().eq_ignore_ascii_case(wanted) || c.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::InvalidInput("column".to_string(), s.to_string()))
    }
}
