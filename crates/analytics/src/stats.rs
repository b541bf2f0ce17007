use crate::report::SummaryRow;
use core_types::Column;
use dataset::Dataset;
use std::collections::BTreeMap;

/// Statistic names in report order.
pub const STATISTICS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Descriptive statistics for one column. Missing cells are skipped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: Option<f64>,
    /// Sample standard deviation (n - 1); undefined below two values.
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

impl ColumnSummary {
    fn get(&self, statistic: &str) -> Option<f64> {
        match statistic {
            "count" => Some(self.count as f64),
            "mean" => self.mean,
            "std" => self.std,
            "min" => self.min,
            "25%" => self.p25,
            "50%" => self.p50,
            "75%" => self.p75,
            "max" => self.max,
            _ => None,
        }
    }
}

/// Computes the summary of a single column of optional values.
pub fn describe(values: &[Option<f64>]) -> ColumnSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    let n = present.len();
    if n == 0 {
        return ColumnSummary::default();
    }
    present.sort_by(f64::total_cmp);

    let mean = present.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let variance =
            present.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    });

    ColumnSummary {
        count: n,
        mean: Some(mean),
        std,
        min: present.first().copied(),
        p25: Some(quantile(&present, 0.25)),
        p50: Some(quantile(&present, 0.50)),
        p75: Some(quantile(&present, 0.75)),
        max: present.last().copied(),
    }
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Summarizes every numeric column of the dataset.
///
/// Returns one row per name in `STATISTICS`, followed by a `count` row holding
/// the number of records in the table.
pub fn summarize(dataset: &Dataset) -> Vec<SummaryRow> {
    let summaries: Vec<(Column, ColumnSummary)> = Column::NUMERIC
        .iter()
        .map(|column| (*column, describe(&dataset.column(*column))))
        .collect();

    let mut rows: Vec<SummaryRow> = STATISTICS
        .iter()
        .map(|statistic| {
            let values: BTreeMap<String, Option<f64>> = summaries
                .iter()
                .map(|(column, summary)| (column.label().to_string(), summary.get(statistic)))
                .collect();
            SummaryRow::Statistic {
                statistic: statistic.to_string(),
                values,
            }
        })
        .collect();

    rows.push(SummaryRow::RecordCount {
        statistic: "count".to_string(),
        value: dataset.len(),
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::closes;
    use core_types::Kline;

    #[test]
    fn describe_matches_sample_statistics() {
        let summary = describe(&[Some(1.0), Some(2.0), None, Some(3.0), Some(4.0)]);
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(2.5));
        assert!((summary.std.unwrap() - 1.290_994_448_735_805_6).abs() < 1e-12);
        assert_eq!(summary.min, Some(1.0));
        assert_eq!(summary.p25, Some(1.75));
        assert_eq!(summary.p50, Some(2.5));
        assert_eq!(summary.p75, Some(3.25));
        assert_eq!(summary.max, Some(4.0));
    }

    #[test]
    fn undefined_statistics_are_none_not_zero() {
        let single = describe(&[Some(5.0)]);
        assert_eq!(single.std, None);
        assert_eq!(single.mean, Some(5.0));

        let empty = describe(&[None, None]);
        assert_eq!(empty.count, 0);
        assert_eq!(empty.mean, None);
        assert_eq!(empty.max, None);
    }

    #[test]
    fn summary_has_one_row_per_statistic_plus_record_count() {
        let dataset = closes(&[1.0, 2.0, 3.0]);
        let rows = summarize(&dataset);

        assert_eq!(rows.len(), STATISTICS.len() + 1);
        assert_eq!(
            rows.last(),
            Some(&SummaryRow::RecordCount {
                statistic: "count".to_string(),
                value: 3
            })
        );
        let mean_row = rows.iter().find(|r| r.statistic() == "mean").unwrap();
        assert_eq!(mean_row.value(Column::Close), Some(2.0));
    }

    #[test]
    fn empty_dataset_still_reports_every_row() {
        let rows = summarize(&Dataset::new(Vec::<Kline>::new()));
        assert_eq!(rows.len(), STATISTICS.len() + 1);
        assert_eq!(rows[0].value(Column::Volume), Some(0.0));
        assert_eq!(rows[1].value(Column::Volume), None);
    }
}
