use crate::correlation::{self, DEFAULT_CORRELATION_COLUMNS};
use crate::error::AnalyticsError;
use crate::report::{
    CleanReport, CorrelationMatrix, DailyClosingPrices, MonthlyStatistics, MonthlyTrades,
    PricePrediction, RsiPoint, SummaryRow, TrendPoint,
};
use crate::{cleaning, indicators, resample, stats};
use core_types::Column;
use dataset::Dataset;
use std::sync::Arc;

/// The query facade: one method per analytics view over a dataset snapshot.
///
/// The engine only ever borrows the dataset. Build one per request from the
/// current snapshot, or share one across threads; both are safe.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    dataset: Arc<Dataset>,
}

impl AnalyticsEngine {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Descriptive statistics per numeric column, plus a trailing record count.
    pub fn summarize(&self) -> Vec<SummaryRow> {
        let rows = stats::summarize(&self.dataset);
        tracing::debug!(records = self.dataset.len(), "Computed data summary.");
        rows
    }

    /// How many rows survive duplicate and missing-value removal.
    pub fn clean(&self) -> CleanReport {
        let report = cleaning::clean(&self.dataset);
        tracing::debug!(
            original = report.original_count,
            cleaned = report.cleaned_count,
            "Computed cleaning impact."
        );
        report
    }

    pub fn monthly_statistics(&self) -> Result<Vec<MonthlyStatistics>, AnalyticsError> {
        let months = resample::monthly_statistics(&self.dataset)?;
        tracing::debug!(months = months.len(), "Computed monthly statistics.");
        Ok(months)
    }

    pub fn price_trends(&self) -> Result<Vec<TrendPoint>, AnalyticsError> {
        resample::price_trends(&self.dataset)
    }

    pub fn trade_analysis(&self) -> Result<Vec<MonthlyTrades>, AnalyticsError> {
        let buckets = resample::trade_analysis(&self.dataset)?;
        tracing::debug!(buckets = buckets.len(), "Computed trade analysis.");
        Ok(buckets)
    }

    /// Correlation matrix over `columns`, or Volume/Number of trades when `None`.
    pub fn correlate(&self, columns: Option<&[Column]>) -> Result<CorrelationMatrix, AnalyticsError> {
        correlation::correlate(&self.dataset, columns.unwrap_or(&DEFAULT_CORRELATION_COLUMNS))
    }

    /// RSI rows over the Close series; `window` defaults to 14.
    pub fn rsi(&self, window: Option<usize>) -> Result<Vec<RsiPoint>, AnalyticsError> {
        let window = window.unwrap_or(indicators::DEFAULT_RSI_WINDOW);
        let points = indicators::rsi(&self.dataset, window)?;
        tracing::debug!(window, points = points.len(), "Computed RSI.");
        Ok(points)
    }

    pub fn daily_closing_price(&self) -> Result<DailyClosingPrices, AnalyticsError> {
        resample::daily_closing_price(&self.dataset)
    }

    /// There is no prediction model; this always reports that.
    pub fn price_prediction(&self) -> PricePrediction {
        PricePrediction::not_implemented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::closes;
    use std::thread;

    #[test]
    fn facade_delegates_with_defaults() {
        let series: Vec<f64> = (1..=20i32).map(f64::from).collect();
        let engine = AnalyticsEngine::new(Arc::new(closes(&series)));

        assert_eq!(engine.rsi(None).unwrap().len(), 7);
        assert_eq!(engine.rsi(Some(5)).unwrap().len(), 16);
        assert_eq!(engine.summarize().len(), stats::STATISTICS.len() + 1);
        assert_eq!(engine.clean().cleaned_count, 20);
        assert_eq!(engine.trade_analysis().unwrap()[0].number_of_trades, 20);
        assert_eq!(engine.daily_closing_price().unwrap().len(), 1);
        assert_eq!(engine.price_trends().unwrap().len(), 20);
        assert_eq!(engine.monthly_statistics().unwrap().len(), 1);

        // Every row has volume 1.0, so the default pair is undefined.
        let matrix = engine.correlate(None).unwrap();
        assert_eq!(matrix.columns(), &DEFAULT_CORRELATION_COLUMNS);
        assert_eq!(matrix.get(Column::Volume, Column::NumberOfTrades), None);
    }

    #[test]
    fn price_prediction_is_a_stub() {
        let engine = AnalyticsEngine::new(Arc::new(Dataset::default()));
        assert_eq!(
            engine.price_prediction().message,
            "Price prediction model not implemented"
        );
    }

    #[test]
    fn concurrent_queries_leave_the_snapshot_untouched() {
        let series: Vec<f64> = (0..200i32).map(|i| f64::from(i % 17)).collect();
        let dataset = Arc::new(closes(&series));
        let before = (*dataset).clone();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = AnalyticsEngine::new(dataset.clone());
                thread::spawn(move || {
                    engine.rsi(None).unwrap();
                    engine.price_trends().unwrap();
                    engine.clean()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().cleaned_count, 200);
        }
        assert_eq!(*dataset, before);
    }
}
