use crate::error::AnalyticsError;
use crate::report::CorrelationMatrix;
use core_types::Column;
use dataset::Dataset;

/// The column pair correlated when the caller does not pick one.
pub const DEFAULT_CORRELATION_COLUMNS: [Column; 2] = [Column::Volume, Column::NumberOfTrades];

/// Pearson correlation over the rows where both values are present.
///
/// `None` with fewer than two paired rows or when either side is constant.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return None;
    }
    Some((sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0))
}

/// True when the column has at least two present values that are not all equal.
fn has_variance(values: &[Option<f64>]) -> bool {
    let mut present = values.iter().flatten();
    match present.next() {
        Some(first) => present.any(|v| v != first),
        None => false,
    }
}

/// Builds the symmetric correlation matrix for `columns`.
///
/// The diagonal is exactly 1 for a column with variance and `None` otherwise.
pub fn correlate(dataset: &Dataset, columns: &[Column]) -> Result<CorrelationMatrix, AnalyticsError> {
    if columns.is_empty() {
        return Err(AnalyticsError::InvalidParameter(
            "at least one column is required for correlation".to_string(),
        ));
    }
    for (i, column) in columns.iter().enumerate() {
        if !column.is_numeric() {
            return Err(AnalyticsError::InvalidParameter(format!(
                "column '{column}' is not numeric"
            )));
        }
        if columns[..i].contains(column) {
            return Err(AnalyticsError::InvalidParameter(format!(
                "column '{column}' is listed more than once"
            )));
        }
    }

    let series: Vec<Vec<Option<f64>>> = columns.iter().map(|c| dataset.column(*c)).collect();
    let mut values = vec![vec![None; columns.len()]; columns.len()];

    for i in 0..columns.len() {
        values[i][i] = has_variance(&series[i]).then_some(1.0);
        for j in (i + 1)..columns.len() {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix::new(columns.to_vec(), values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{kline, JAN_1_2023_MS, MINUTE_MS};

    fn dataset(rows: &[(f64, f64, i64)]) -> Dataset {
        rows.iter()
            .enumerate()
            .map(|(i, (close, volume, trades))| {
                kline(JAN_1_2023_MS + i as i64 * MINUTE_MS, *close, *volume, *trades)
            })
            .collect()
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let data = dataset(&[(1.0, 10.0, 1), (2.0, 20.0, 2), (3.0, 30.0, 3)]);
        let matrix = correlate(&data, &DEFAULT_CORRELATION_COLUMNS).unwrap();

        assert_eq!(matrix.get(Column::Volume, Column::Volume), Some(1.0));
        let r = matrix.get(Column::Volume, Column::NumberOfTrades).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn matrix_is_symmetric() {
        let data = dataset(&[(3.0, 1.0, 9), (1.0, 4.0, 2), (4.0, 1.5, 6), (1.5, 9.0, 5)]);
        let columns = [Column::Close, Column::Volume, Column::NumberOfTrades];
        let matrix = correlate(&data, &columns).unwrap();

        for a in columns {
            assert_eq!(matrix.get(a, a), Some(1.0));
            for b in columns {
                assert_eq!(matrix.get(a, b), matrix.get(b, a));
                if let Some(r) = matrix.get(a, b) {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
        let r = matrix.get(Column::Close, Column::Volume).unwrap();
        assert!(r < 0.0);
    }

    #[test]
    fn constant_column_has_undefined_correlation() {
        let data = dataset(&[(1.0, 5.0, 1), (2.0, 5.0, 2), (3.0, 5.0, 3)]);
        let matrix = correlate(&data, &DEFAULT_CORRELATION_COLUMNS).unwrap();

        assert_eq!(matrix.get(Column::Volume, Column::Volume), None);
        assert_eq!(matrix.get(Column::Volume, Column::NumberOfTrades), None);
        assert_eq!(matrix.get(Column::NumberOfTrades, Column::NumberOfTrades), Some(1.0));
    }

    #[test]
    fn pairs_with_a_missing_side_are_skipped() {
        let r = pearson(
            &[Some(1.0), Some(2.0), None, Some(3.0)],
            &[Some(2.0), Some(4.0), Some(100.0), Some(6.0)],
        );
        assert!((r.unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(pearson(&[Some(1.0)], &[Some(1.0)]), None);
    }

    #[test]
    fn result_does_not_depend_on_scale() {
        let unit = |xs: [f64; 3]| xs.map(Some);
        let base = pearson(&unit([0.0, 1.0, 2.0]), &unit([0.0, 2.0, 1.0])).unwrap();
        assert!((base - 0.5).abs() < 1e-12);

        for scale in [1e-150, 1e150] {
            let x = unit([0.0, scale, 2.0 * scale]);
            let y = unit([0.0, 2.0 * scale, scale]);
            let r = pearson(&x, &y).unwrap();
            assert!((r - base).abs() < 1e-9, "scale {scale}: {r}");
        }
    }

    #[test]
    fn rejects_bad_column_lists() {
        let data = dataset(&[(1.0, 1.0, 1)]);
        assert!(correlate(&data, &[]).is_err());
        assert!(correlate(&data, &[Column::Ignore]).is_err());
        assert!(correlate(&data, &[Column::Close, Column::Close]).is_err());
    }
}
