//! Momentum indicators.

use aiquant_core::traits::Indicator;
use serde::{Deserialize, Serialize};

use crate::moving_average::Ema;

/// Relative Strength Index (RSI).
///
/// Over a trailing window of price changes, the average gain divided by the
/// average absolute loss, mapped to a 0-100 scale. Uses a fixed rolling mean
/// of gains and losses rather than Wilder's recursive smoothing; that is the
/// documented behavior of this engine, not an approximation to be fixed.
/// When the average loss over the window is zero the value saturates at 100.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
}

impl Rsi {
    /// Create a new RSI indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Rsi {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() <= self.period {
            return result;
        }

        // changes[j] is the move into price index j + 1
        let changes: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
        let period_f64 = self.period as f64;

        for i in self.period..data.len() {
            let window = &changes[i - self.period..i];
            let avg_gain: f64 =
                window.iter().filter(|&&c| c > 0.0).sum::<f64>() / period_f64;
            let avg_loss: f64 =
                window.iter().filter(|&&c| c < 0.0).map(|c| -c).sum::<f64>() / period_f64;

            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
            };
            result[i] = Some(rsi);
        }

        result
    }

    fn period(&self) -> usize {
        // One extra point for the first price change
        self.period + 1
    }

    fn name(&self) -> &str {
        "RSI"
    }
}

/// MACD output: three aligned series of the input length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacdSeries {
    /// Fast EMA minus slow EMA
    pub macd: Vec<Option<f64>>,
    /// EMA of the MACD line, computed only over available values and
    /// re-aligned to the input index space
    pub signal: Vec<Option<f64>>,
    /// MACD minus signal
    pub histogram: Vec<Option<f64>>,
}

/// MACD (Moving Average Convergence Divergence) indicator.
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Macd {
    /// Create a new MACD with default parameters (12, 26, 9).
    pub fn new() -> Self {
        Self::with_periods(12, 26, 9)
    }

    /// Create a MACD with custom periods.
    pub fn with_periods(fast: usize, slow: usize, signal: usize) -> Self {
        assert!(fast > 0 && slow > 0 && signal > 0);
        assert!(fast < slow, "Fast period must be less than slow period");
        Self {
            fast_period: fast,
            slow_period: slow,
            signal_period: signal,
        }
    }

    /// Bars of history needed before the signal line is available.
    pub fn warmup(&self) -> usize {
        self.slow_period + self.signal_period - 1
    }

    /// Calculate all three series for the given close prices.
    pub fn calculate(&self, data: &[f64]) -> MacdSeries {
        let fast = Ema::new(self.fast_period).calculate(data);
        let slow = Ema::new(self.slow_period).calculate(data);

        let macd: Vec<Option<f64>> = fast
            .iter()
            .zip(slow.iter())
            .map(|(f, s)| match (f, s) {
                (Some(f), Some(s)) => Some(f - s),
                _ => None,
            })
            .collect();

        // Signal line: EMA over the compacted available MACD values,
        // scattered back to the original indices.
        let available: Vec<(usize, f64)> = macd
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();
        let compact: Vec<f64> = available.iter().map(|(_, v)| *v).collect();
        let signal_compact = Ema::new(self.signal_period).calculate(&compact);

        let mut signal = vec![None; data.len()];
        for ((orig_idx, _), value) in available.iter().zip(signal_compact.iter()) {
            signal[*orig_idx] = *value;
        }

        let histogram: Vec<Option<f64>> = macd
            .iter()
            .zip(signal.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => Some(m - s),
                _ => None,
            })
            .collect();

        MacdSeries {
            macd,
            signal,
            histogram,
        }
    }
}

impl Default for Macd {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi_warmup_markers() {
        let rsi = Rsi::new(14);
        let data: Vec<f64> = (0..30)
            .map(|i| 100.0 + (i as f64 * 0.5).sin() * 5.0)
            .collect();
        let result = rsi.calculate(&data);

        assert_eq!(result.len(), data.len());
        for value in &result[..14] {
            assert!(value.is_none());
        }
        for value in result[14..].iter().flatten() {
            assert!(*value >= 0.0 && *value <= 100.0);
        }
    }

    #[test]
    fn test_rsi_all_gains_saturates() {
        let rsi = Rsi::new(5);
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0];
        let result = rsi.calculate(&data);
        assert!((result[5].unwrap() - 100.0).abs() < 1e-10);
        assert!((result[6].unwrap() - 100.0).abs() < 1e-10);
    }

    #[test]
    fn test_rsi_all_losses() {
        let rsi = Rsi::new(5);
        let data = vec![7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let result = rsi.calculate(&data);
        assert!(result[5].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_rsi_rolling_mean_not_wilder() {
        // With a rolling mean, a spike leaving the window disappears
        // completely instead of decaying; pin that behavior.
        let rsi = Rsi::new(2);
        let data = vec![100.0, 110.0, 109.0, 108.0, 107.0];
        let result = rsi.calculate(&data);
        // Window at index 4 holds two losses only
        assert!(result[4].unwrap().abs() < 1e-10);
    }

    #[test]
    fn test_macd_alignment() {
        let macd = Macd::with_periods(5, 10, 3);
        let data: Vec<f64> = (0..40).map(|i| 100.0 + i as f64).collect();
        let series = macd.calculate(&data);

        assert_eq!(series.macd.len(), data.len());
        assert_eq!(series.signal.len(), data.len());
        assert_eq!(series.histogram.len(), data.len());

        // MACD line appears with the slow EMA
        assert!(series.macd[8].is_none());
        assert!(series.macd[9].is_some());
        // Signal needs signal_period available MACD values
        assert!(series.signal[10].is_none());
        assert!(series.signal[11].is_some());
        // Histogram only where both exist
        assert!(series.histogram[11].is_some());

        // In a steady uptrend the MACD line is positive
        assert!(series.macd.last().unwrap().unwrap() > 0.0);
    }

    #[test]
    fn test_macd_histogram_is_difference() {
        let macd = Macd::new();
        let data: Vec<f64> = (0..80)
            .map(|i| 100.0 + (i as f64 * 0.3).sin() * 8.0)
            .collect();
        let series = macd.calculate(&data);

        for i in 0..data.len() {
            if let (Some(m), Some(s), Some(h)) =
                (series.macd[i], series.signal[i], series.histogram[i])
            {
                assert!((h - (m - s)).abs() < 1e-10);
            }
        }
    }
}
