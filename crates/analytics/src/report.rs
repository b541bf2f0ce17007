use chrono::{NaiveDate, NaiveDateTime};
use core_types::Column;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the data summary.
///
/// Statistic rows carry one value per numeric column, keyed by column label.
/// The summary always ends with a `RecordCount` row holding the table length.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SummaryRow {
    Statistic {
        statistic: String,
        #[serde(flatten)]
        values: BTreeMap<String, Option<f64>>,
    },
    RecordCount {
        statistic: String,
        value: usize,
    },
}

impl SummaryRow {
    pub fn statistic(&self) -> &str {
        match self {
            SummaryRow::Statistic { statistic, .. } | SummaryRow::RecordCount { statistic, .. } => {
                statistic
            }
        }
    }

    /// The value reported for `column`, if this is a statistic row.
    pub fn value(&self, column: Column) -> Option<f64> {
        match self {
            SummaryRow::Statistic { values, .. } => values.get(column.label()).copied().flatten(),
            SummaryRow::RecordCount { .. } => None,
        }
    }
}

/// How many rows survive de-duplication and missing-value removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub original_count: usize,
    pub cleaned_count: usize,
}

/// Close and Volume aggregates for one month of the year (1 = January).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStatistics {
    pub month: u32,
    pub close_mean: Option<f64>,
    pub close_max: Option<f64>,
    pub close_min: Option<f64>,
    /// Missing volumes contribute nothing; an all-missing month sums to 0.
    pub volume_sum: f64,
    pub volume_mean: Option<f64>,
}

/// A forward-filled price point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    #[serde(rename = "Open time")]
    pub open_time: NaiveDateTime,
    #[serde(rename = "Open")]
    pub open: Option<f64>,
    #[serde(rename = "High")]
    pub high: Option<f64>,
    #[serde(rename = "Low")]
    pub low: Option<f64>,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
}

/// Total trade count for one `YYYY-MM` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTrades {
    #[serde(rename = "YearMonth")]
    pub year_month: String,
    #[serde(rename = "Number of trades")]
    pub number_of_trades: i64,
}

/// Mean close per UTC calendar date.
pub type DailyClosingPrices = BTreeMap<NaiveDate, Option<f64>>;

/// A row with a defined RSI value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsiPoint {
    /// `%Y-%m-%dT%H:%M:%S`, UTC, no offset.
    #[serde(rename = "Open time")]
    pub open_time: String,
    #[serde(rename = "Close")]
    pub close: Option<f64>,
    #[serde(rename = "RSI")]
    pub rsi: f64,
}

/// A symmetric Pearson correlation matrix over a set of columns.
///
/// Serializes as a nested map `{row label: {column label: value}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    columns: Vec<Column>,
    values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub(crate) fn new(columns: Vec<Column>, values: Vec<Vec<Option<f64>>>) -> Self {
        Self { columns, values }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The correlation between `a` and `b`; `None` if undefined or either column is absent.
    pub fn get(&self, a: Column, b: Column) -> Option<f64> {
        let i = self.columns.iter().position(|c| *c == a)?;
        let j = self.columns.iter().position(|c| *c == b)?;
        self.values[i][j]
    }
}

struct MatrixRow<'a> {
    columns: &'a [Column],
    values: &'a [Option<f64>],
}

impl Serialize for MatrixRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.columns.iter().map(Column::label).zip(self.values))
    }
}

impl Serialize for CorrelationMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, values) in self.columns.iter().zip(&self.values) {
            let row = MatrixRow {
                columns: &self.columns,
                values,
            };
            map.serialize_entry(column.label(), &row)?;
        }
        map.end()
    }
}

/// Placeholder answer for the price prediction view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePrediction {
    pub message: String,
}

impl PricePrediction {
    pub const NOT_IMPLEMENTED: &'static str = "Price prediction model not implemented";

    pub fn not_implemented() -> Self {
        Self {
            message: Self::NOT_IMPLEMENTED.to_string(),
        }
    }
}
