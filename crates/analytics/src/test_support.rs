use core_types::Kline;
use dataset::Dataset;

pub const JAN_1_2023_MS: i64 = 1_672_531_200_000;
pub const MINUTE_MS: i64 = 60_000;
pub const DAY_MS: i64 = 86_400_000;

/// A complete kline with the fields the analytics care about set explicitly.
pub fn kline(open_time: i64, close: f64, volume: f64, trades: i64) -> Kline {
    Kline {
        open_time: Some(open_time),
        open: Some(close),
        high: Some(close + 1.0),
        low: Some(close - 1.0),
        close: Some(close),
        volume: Some(volume),
        close_time: Some(open_time + MINUTE_MS - 1),
        quote_asset_volume: Some(close * volume),
        number_of_trades: Some(trades),
        taker_buy_base_asset_volume: Some(volume / 2.0),
        taker_buy_quote_asset_volume: Some(close * volume / 2.0),
        ignore: Some("0".to_string()),
    }
}

/// One-minute klines starting at 2023-01-01 with the given closes.
pub fn closes(values: &[f64]) -> Dataset {
    values
        .iter()
        .enumerate()
        .map(|(i, c)| kline(JAN_1_2023_MS + i as i64 * MINUTE_MS, *c, 1.0, 1))
        .collect()
}
