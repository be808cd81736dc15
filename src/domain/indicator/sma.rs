//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(values[i-n+1..=i]), maintained with a running sum.
//! Warmup: first (n-1) values are undefined. A non-finite value leaves every
//! window containing it undefined, and the average recovers once it slides out.

use super::{finite, Series};

pub fn calculate_sma(values: &[f64], period: usize) -> Series {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut non_finite = 0usize;

    for (i, &value) in values.iter().enumerate() {
        if value.is_finite() {
            sum += value;
        } else {
            non_finite += 1;
        }

        if i >= period {
            let dropped = values[i - period];
            if dropped.is_finite() {
                sum -= dropped;
            } else {
                non_finite -= 1;
            }
        }

        if i + 1 >= period && non_finite == 0 {
            out.push(finite(sum / period as f64));
        } else {
            out.push(None);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const PRICES: [f64; 10] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0];

    #[test]
    fn sma_warmup() {
        let series = calculate_sma(&PRICES, 3);
        assert_eq!(series.len(), PRICES.len());
        assert_eq!(series[0], None);
        assert_eq!(series[1], None);
        assert!(series[2].is_some());
    }

    #[test]
    fn sma_three_period() {
        let series = calculate_sma(&PRICES, 3);
        assert_eq!(series[2], Some(20.0));
        assert_eq!(series[3], Some(30.0));
        assert_eq!(series[4], Some(40.0));
        assert_relative_eq!(series[9].unwrap(), 90.0, epsilon = 1e-9);
    }

    #[test]
    fn sma_shorter_than_period() {
        assert_eq!(calculate_sma(&[10.0, 20.0], 3), vec![None, None]);
    }

    #[test]
    fn sma_period_1_is_identity() {
        let series = calculate_sma(&[5.0, 7.0, 9.0], 1);
        assert_eq!(series, vec![Some(5.0), Some(7.0), Some(9.0)]);
    }

    #[test]
    fn sma_period_0() {
        assert_eq!(calculate_sma(&[1.0, 2.0], 0), vec![None, None]);
    }

    #[test]
    fn sma_empty() {
        assert!(calculate_sma(&[], 3).is_empty());
    }

    #[test]
    fn sma_recovers_after_non_finite_leaves_window() {
        let values = [1.0, 2.0, f64::NAN, 4.0, 5.0, 6.0, 7.0];
        let series = calculate_sma(&values, 2);
        assert_eq!(series[1], Some(1.5));
        assert_eq!(series[2], None);
        assert_eq!(series[3], None);
        assert_eq!(series[4], Some(4.5));
        assert_eq!(series[6], Some(6.5));
    }

    proptest! {
        #[test]
        fn sma_seed_is_mean_of_first_window(
            values in prop::collection::vec(1.0f64..1000.0, 1..60),
            period in 1usize..20,
        ) {
            let series = calculate_sma(&values, period);
            prop_assert_eq!(series.len(), values.len());
            for i in 0..values.len().min(period - 1) {
                prop_assert!(series[i].is_none());
            }
            if values.len() >= period {
                let mean = values[..period].iter().sum::<f64>() / period as f64;
                prop_assert!((series[period - 1].unwrap() - mean).abs() < 1e-9);
            }
        }

        #[test]
        fn sma_matches_window_mean_everywhere(
            values in prop::collection::vec(1.0f64..1000.0, 1..80),
            period in 1usize..15,
        ) {
            let series = calculate_sma(&values, period);
            for i in (period - 1)..values.len() {
                let window = &values[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                prop_assert!((series[i].unwrap() - mean).abs() < 1e-6);
            }
        }
    }
}
