use crate::error::AnalyticsError;
use crate::report::RsiPoint;
use dataset::Dataset;

/// The customary RSI lookback.
pub const DEFAULT_RSI_WINDOW: usize = 14;

const RSI_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Simple moving average over the trailing `window` values.
///
/// The first `window - 1` entries are `None`. Inputs are non-negative; a window
/// holding only zeros averages to exactly zero regardless of running-sum drift.
fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut sum = 0.0;
    let mut non_zero = 0usize;
    let mut means = Vec::with_capacity(values.len());

    for (i, &value) in values.iter().enumerate() {
        sum += value;
        if value != 0.0 {
            non_zero += 1;
        }
        if i >= window {
            let leaving = values[i - window];
            sum -= leaving;
            if leaving != 0.0 {
                non_zero -= 1;
            }
        }

        means.push((i + 1 >= window).then(|| {
            if non_zero == 0 {
                0.0
            } else {
                (sum / window as f64).max(0.0)
            }
        }));
    }
    means
}

/// Computes the simple-moving-average RSI for a close series, row for row.
///
/// A missing close makes the deltas on both sides of it count as zero change.
/// Rows without enough history, and rows where both averages are zero, are `None`.
pub fn relative_strength_index(
    closes: &[Option<f64>],
    window: usize,
) -> Result<Vec<Option<f64>>, AnalyticsError> {
    if window == 0 {
        return Err(AnalyticsError::InvalidParameter(
            "RSI window must be at least 1".to_string(),
        ));
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    for i in 0..closes.len() {
        let delta = match (i.checked_sub(1).and_then(|p| closes[p]), closes[i]) {
            (Some(previous), Some(current)) => current - previous,
            _ => 0.0,
        };
        gains.push(if delta > 0.0 { delta } else { 0.0 });
        losses.push(if delta < 0.0 { -delta } else { 0.0 });
    }

    let avg_gain = rolling_mean(&gains, window);
    let avg_loss = rolling_mean(&losses, window);

    Ok(avg_gain
        .into_iter()
        .zip(avg_loss)
        .map(|(gain, loss)| match (gain?, loss?) {
            (gain, loss) if loss == 0.0 && gain == 0.0 => None,
            (_, loss) if loss == 0.0 => Some(100.0),
            (gain, loss) => {
                let rs = gain / loss;
                Some((100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0))
            }
        })
        .collect())
}

/// RSI over the dataset's Close column, keeping only rows where it is defined.
pub fn rsi(dataset: &Dataset, window: usize) -> Result<Vec<RsiPoint>, AnalyticsError> {
    let closes: Vec<Option<f64>> = dataset.iter().map(|k| k.close).collect();
    let values = relative_strength_index(&closes, window)?;

    dataset
        .iter()
        .zip(values)
        .enumerate()
        .filter_map(|(row, (kline, value))| value.map(|rsi| (row, kline, rsi)))
        .map(|(row, kline, rsi)| {
            let open_time = kline
                .open_datetime()
                .map_err(|source| AnalyticsError::Parse { row, source })?;
            Ok(RsiPoint {
                open_time: open_time.format(RSI_TIME_FORMAT).to_string(),
                close: kline.close,
                rsi,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::closes;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn rising_closes_saturate_at_100() {
        let series: Vec<f64> = (1..=20i32).map(f64::from).collect();
        let values = relative_strength_index(&some(&series), 14).unwrap();

        assert!(values[..13].iter().all(Option::is_none));
        assert!(values[13..].iter().all(|v| *v == Some(100.0)));
        assert_eq!(values[19], Some(100.0));
    }

    #[test]
    fn flat_closes_have_no_rsi() {
        let dataset = closes(&[100.0; 15]);
        assert!(rsi(&dataset, 14).unwrap().is_empty());
    }

    #[test]
    fn falling_closes_bottom_out_at_zero() {
        let series: Vec<f64> = (1..=10i32).rev().map(f64::from).collect();
        let values = relative_strength_index(&some(&series), 3).unwrap();
        assert!(values[2..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn mixed_moves_follow_the_sma_formula() {
        // deltas: -, +2, -1, +3, -2
        let values = relative_strength_index(&some(&[10.0, 12.0, 11.0, 14.0, 12.0]), 3).unwrap();
        assert_eq!(values[..2], [None, None]);
        // gains [0,2,0] / losses [0,0,1] -> rs = 2
        assert!((values[2].unwrap() - 100.0 * 2.0 / 3.0).abs() < 1e-9);
        // gains [2,0,3] / losses [0,1,0] -> rs = 5
        assert!((values[3].unwrap() - 100.0 * 5.0 / 6.0).abs() < 1e-9);
        // gains [0,3,0] / losses [1,0,2] -> rs = 1
        assert!((values[4].unwrap() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn missing_closes_count_as_no_change() {
        let values = relative_strength_index(&[Some(1.0), None, Some(3.0), Some(4.0)], 2).unwrap();
        assert_eq!(values, vec![None, None, None, Some(100.0)]);
    }

    #[test]
    fn values_stay_in_range() {
        let series = [5.0, 7.0, 6.5, 6.0, 9.0, 8.0, 8.5, 3.0, 4.0, 10.0, 9.5, 9.0];
        for value in relative_strength_index(&some(&series), 4).unwrap().into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn running_mean_matches_windowed_sums() {
        let values: Vec<f64> = (0..500i32)
            .map(|i| if i % 7 < 3 { 0.0 } else { f64::from(i % 13) * 0.37 })
            .collect();
        for window in [1, 2, 14, 250, 499, 500, 501] {
            let means = rolling_mean(&values, window);
            assert_eq!(means.len(), values.len());
            for (i, mean) in means.iter().enumerate() {
                if i + 1 < window {
                    assert_eq!(*mean, None);
                    continue;
                }
                let slice = &values[i + 1 - window..=i];
                let expected = slice.iter().sum::<f64>() / window as f64;
                let mean = mean.unwrap();
                if slice.iter().all(|v| *v == 0.0) {
                    assert_eq!(mean, 0.0);
                } else {
                    assert!((mean - expected).abs() < 1e-9, "window {window}, row {i}");
                }
            }
        }
    }

    #[test]
    fn large_windows_keep_flat_stretches_undefined() {
        // gain at row 1, loss at row 2, then a long flat tail
        let mut series = vec![1.0, 2.0, 1.5];
        series.extend(std::iter::repeat_n(1.5, 5_000));
        let values = relative_strength_index(&some(&series), 2_000).unwrap();

        assert!(values[..1_999].iter().all(Option::is_none));
        let expected = 100.0 - 100.0 / (1.0 + 1.0 / 0.5);
        assert!((values[1_999].unwrap() - expected).abs() < 1e-9);
        assert!((values[2_000].unwrap() - expected).abs() < 1e-9);
        // the gain has left the window, the loss has not
        assert_eq!(values[2_001], Some(0.0));
        assert!(values[2_002..].iter().all(Option::is_none));
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            relative_strength_index(&some(&[1.0, 2.0]), 0),
            Err(AnalyticsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn output_rows_carry_formatted_time_and_close() {
        let series: Vec<f64> = (1..=15i32).map(f64::from).collect();
        let points = rsi(&closes(&series), 14).unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].open_time, "2023-01-01T00:13:00");
        assert_eq!(points[0].close, Some(14.0));
        assert_eq!(points[1].rsi, 100.0);
    }
}
