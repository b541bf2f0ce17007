use crate::report::CleanReport;
use core_types::{Column, Kline};
use dataset::Dataset;
use std::collections::HashSet;

/// Identity of a complete row for duplicate detection.
#[derive(Hash, PartialEq, Eq)]
struct RowKey {
    bits: [u64; 11],
    ignore: String,
}

impl RowKey {
    /// `None` if any cell of the row is missing.
    fn of(kline: &Kline) -> Option<Self> {
        let mut bits = [0u64; 11];
        for (slot, column) in bits.iter_mut().zip(Column::NUMERIC) {
            let value = kline.value(column)?;
            // -0.0 and 0.0 are the same cell value.
            *slot = if value == 0.0 { 0 } else { value.to_bits() };
        }
        Some(Self {
            bits,
            ignore: kline.ignore.clone()?,
        })
    }
}

/// Drops rows with any missing cell and every repeat of an earlier identical row.
///
/// The first occurrence of each row is kept, in table order.
pub fn clean_records(records: &[Kline]) -> Vec<Kline> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|kline| RowKey::of(kline).is_some_and(|key| seen.insert(key)))
        .cloned()
        .collect()
}

/// Reports how many rows a clean pass would keep. The dataset is not modified.
pub fn clean(dataset: &Dataset) -> CleanReport {
    let cleaned = clean_records(dataset.records());
    CleanReport {
        original_count: dataset.len(),
        cleaned_count: cleaned.len(),
    }
}
