use crate::error::LoadError;
use crate::table::Dataset;
use core_types::{Column, Kline};
use csv::{ReaderBuilder, StringRecord};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads the kline source file at `path`.
///
/// The file has no header row and exactly twelve comma-separated columns in
/// `Column::ALL` order. Empty cells and `NaN` literals become `None`; any other
/// non-numeric cell, or a row with the wrong column count, fails the whole load.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = read_dataset(file)?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "Loaded kline dataset.");
    Ok(dataset)
}

/// Parses kline rows from any reader. See `load_dataset` for the format.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        // Column counts are validated per row below so the error names the line.
        .flexible(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, result) in csv_reader.records().enumerate() {
        let fallback_line = index as u64 + 1;
        let record = result.map_err(|source| LoadError::Csv {
            line: source
                .position()
                .map(|p| p.line())
                .unwrap_or(fallback_line),
            source,
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(fallback_line);
        records.push(parse_row(&record, line)?);
    }

    Ok(Dataset::new(records))
}

fn parse_row(record: &StringRecord, line: u64) -> Result<Kline, LoadError> {
    if record.len() != Column::ALL.len() {
        return Err(LoadError::ColumnCount {
            line,
            expected: Column::ALL.len(),
            found: record.len(),
        });
    }

    let cell = |column: Column| record.get(column.index()).unwrap_or("");
    let float = |column: Column| parse_float(cell(column), column, line);
    let int = |column: Column| parse_int(cell(column), column, line);

    let ignore = cell(Column::Ignore).trim();

    Ok(Kline {
        open_time: int(Column::OpenTime)?,
        open: float(Column::Open)?,
        high: float(Column::High)?,
        low: float(Column::Low)?,
        close: float(Column::Close)?,
        volume: float(Column::Volume)?,
        close_time: int(Column::CloseTime)?,
        quote_asset_volume: float(Column::QuoteAssetVolume)?,
        number_of_trades: int(Column::NumberOfTrades)?,
        taker_buy_base_asset_volume: float(Column::TakerBuyBaseAssetVolume)?,
        taker_buy_quote_asset_volume: float(Column::TakerBuyQuoteAssetVolume)?,
        ignore: (!is_missing(ignore)).then(|| ignore.to_string()),
    })
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}

fn invalid(raw: &str, column: Column, line: u64) -> LoadError {
    LoadError::InvalidValue {
        line,
        column,
        value: raw.to_string(),
    }
}

fn parse_float(raw: &str, column: Column, line: u64) -> Result<Option<f64>, LoadError> {
    let cell = raw.trim();
    if is_missing(cell) {
        return Ok(None);
    }
    let value: f64 = cell.parse().map_err(|_| invalid(raw, column, line))?;
    Ok((!value.is_nan()).then_some(value))
}

/// Integers may be written in float notation (`1.6725312e12`) as long as they are whole.
fn parse_int(raw: &str, column: Column, line: u64) -> Result<Option<i64>, LoadError> {
    let cell = raw.trim();
    if is_missing(cell) {
        return Ok(None);
    }
    if let Ok(value) = cell.parse::<i64>() {
        return Ok(Some(value));
    }
    match cell.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            Ok(Some(value as i64))
        }
        _ => Err(invalid(raw, column, line)),
    }
}
