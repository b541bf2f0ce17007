use crate::error::AnalyticsError;
use crate::report::{DailyClosingPrices, MonthlyStatistics, MonthlyTrades, TrendPoint};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dataset::Dataset;
use std::collections::BTreeMap;

/// Parses every `open_time` of the dataset as a UTC timestamp.
///
/// A single unparseable row fails the whole call: bucketing around it would
/// silently change the totals.
pub fn open_times(dataset: &Dataset) -> Result<Vec<DateTime<Utc>>, AnalyticsError> {
    dataset
        .iter()
        .enumerate()
        .map(|(row, kline)| {
            kline
                .open_datetime()
                .map_err(|source| AnalyticsError::Parse { row, source })
        })
        .collect()
}

#[derive(Default)]
struct MonthAccumulator {
    close_sum: f64,
    close_count: usize,
    close_max: Option<f64>,
    close_min: Option<f64>,
    volume_sum: f64,
    volume_count: usize,
}

impl MonthAccumulator {
    fn push(&mut self, close: Option<f64>, volume: Option<f64>) {
        if let Some(close) = close {
            self.close_sum += close;
            self.close_count += 1;
            self.close_max = Some(self.close_max.map_or(close, |m| m.max(close)));
            self.close_min = Some(self.close_min.map_or(close, |m| m.min(close)));
        }
        if let Some(volume) = volume {
            self.volume_sum += volume;
            self.volume_count += 1;
        }
    }

    fn finish(self, month: u32) -> MonthlyStatistics {
        MonthlyStatistics {
            month,
            close_mean: mean(self.close_sum, self.close_count),
            close_max: self.close_max,
            close_min: self.close_min,
            volume_sum: self.volume_sum,
            volume_mean: mean(self.volume_sum, self.volume_count),
        }
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Close and Volume aggregates grouped by month of the year (UTC).
///
/// Rows from the same month of different years share a bucket. Months are
/// returned in ascending order; months with no rows are absent.
pub fn monthly_statistics(dataset: &Dataset) -> Result<Vec<MonthlyStatistics>, AnalyticsError> {
    let times = open_times(dataset)?;
    let mut buckets: BTreeMap<u32, MonthAccumulator> = BTreeMap::new();

    for (kline, time) in dataset.iter().zip(&times) {
        buckets
            .entry(time.month())
            .or_default()
            .push(kline.close, kline.volume);
    }

    Ok(buckets
        .into_iter()
        .map(|(month, acc)| acc.finish(month))
        .collect())
}

/// Total `number_of_trades` per `YYYY-MM` bucket (UTC), oldest first.
///
/// Missing trade counts contribute nothing to their bucket. Totals saturate at `i64::MAX`.
pub fn trade_analysis(dataset: &Dataset) -> Result<Vec<MonthlyTrades>, AnalyticsError> {
    let times = open_times(dataset)?;
    let mut buckets: BTreeMap<(i32, u32), i64> = BTreeMap::new();

    for (kline, time) in dataset.iter().zip(&times) {
        let total = buckets.entry((time.year(), time.month())).or_insert(0);
        *total = total.saturating_add(kline.number_of_trades.unwrap_or(0));
    }

    Ok(buckets
        .into_iter()
        .map(|((year, month), number_of_trades)| MonthlyTrades {
            year_month: format!("{year:04}-{month:02}"),
            number_of_trades,
        })
        .collect())
}

/// Mean Close per UTC calendar date. A date whose closes are all missing maps to `None`.
pub fn daily_closing_price(dataset: &Dataset) -> Result<DailyClosingPrices, AnalyticsError> {
    let times = open_times(dataset)?;
    let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for (kline, time) in dataset.iter().zip(&times) {
        let entry = buckets.entry(time.date_naive()).or_insert((0.0, 0));
        if let Some(close) = kline.close {
            entry.0 += close;
            entry.1 += 1;
        }
    }

    Ok(buckets
        .into_iter()
        .map(|(date, (sum, count))| (date, mean(sum, count)))
        .collect())
}

/// Replaces each missing value with the last present value before it.
pub(crate) fn forward_fill(values: impl IntoIterator<Item = Option<f64>>) -> Vec<Option<f64>> {
    let mut last = None;
    values
        .into_iter()
        .map(|value| {
            if value.is_some() {
                last = value;
            }
            last
        })
        .collect()
}

/// Open/High/Low/Close for every row with a parsed open time, forward-filled per column.
pub fn price_trends(dataset: &Dataset) -> Result<Vec<TrendPoint>, AnalyticsError> {
    let times = open_times(dataset)?;
    let open = forward_fill(dataset.iter().map(|k| k.open));
    let high = forward_fill(dataset.iter().map(|k| k.high));
    let low = forward_fill(dataset.iter().map(|k| k.low));
    let close = forward_fill(dataset.iter().map(|k| k.close));

    Ok(times
        .iter()
        .enumerate()
        .map(|(i, time)| TrendPoint {
            open_time: time.naive_utc(),
            open: open[i],
            high: high[i],
            low: low[i],
            close: close[i],
        })
        .collect())
}
