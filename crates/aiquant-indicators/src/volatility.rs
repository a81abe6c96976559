//! Volatility indicators.

use aiquant_core::traits::Indicator;
use serde::{Deserialize, Serialize};

/// Standard deviation over a trailing window (population form).
#[derive(Debug, Clone)]
pub struct StdDev {
    period: usize,
}

impl StdDev {
    /// Create a new standard deviation indicator.
    pub fn new(period: usize) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        Self { period }
    }
}

impl Indicator for StdDev {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        for (i, window) in data.windows(self.period).enumerate() {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            result[i + self.period - 1] = Some(variance.sqrt());
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "StdDev"
    }
}

/// Bollinger Bands output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerOutput {
    /// Upper band
    pub upper: f64,
    /// Middle band (SMA)
    pub middle: f64,
    /// Lower band
    pub lower: f64,
}

/// Bollinger Bands.
///
/// Middle band is the trailing SMA; upper and lower bands sit k standard
/// deviations away, computed over the same window as the average.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev_multiplier: f64,
}

impl BollingerBands {
    /// Create new Bollinger Bands with default parameters (20, 2.0).
    pub fn new() -> Self {
        Self::with_params(20, 2.0)
    }

    /// Create Bollinger Bands with custom parameters.
    pub fn with_params(period: usize, std_dev_multiplier: f64) -> Self {
        assert!(period > 1, "Period must be greater than 1");
        assert!(
            std_dev_multiplier > 0.0,
            "Std dev multiplier must be positive"
        );
        Self {
            period,
            std_dev_multiplier,
        }
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new()
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerOutput;

    fn calculate(&self, data: &[f64]) -> Vec<Option<BollingerOutput>> {
        let mut result = vec![None; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        for (i, window) in data.windows(self.period).enumerate() {
            let mean: f64 = window.iter().sum::<f64>() / period_f64;
            let variance: f64 =
                window.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / period_f64;
            let band = self.std_dev_multiplier * variance.sqrt();

            result[i + self.period - 1] = Some(BollingerOutput {
                upper: mean + band,
                middle: mean,
                lower: mean - band,
            });
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }
}

/// Average True Range (ATR).
///
/// True range (max of high-low, |high - prevClose|, |low - prevClose|)
/// smoothed with the EMA recurrence, seeded with the simple average of the
/// first `period` true ranges.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    multiplier: f64,
}

impl Atr {
    /// Create a new ATR indicator. The common period is 14.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        let multiplier = 2.0 / (period as f64 + 1.0);
        Self { period, multiplier }
    }

    /// Lookback period.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Calculate ATR from OHLC data. The output is aligned to the input
    /// bars; the first `period` indices are `None` (the first true range
    /// needs a previous close).
    pub fn calculate_ohlc(&self, high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
        let len = high.len().min(low.len()).min(close.len());
        let mut result = vec![None; len];
        if len < self.period + 1 {
            return result;
        }

        // tr[j] belongs to bar j + 1
        let tr: Vec<f64> = (1..len)
            .map(|i| {
                let hl = high[i] - low[i];
                let hc = (high[i] - close[i - 1]).abs();
                let lc = (low[i] - close[i - 1]).abs();
                hl.max(hc).max(lc)
            })
            .collect();

        let mut atr: f64 = tr[..self.period].iter().sum::<f64>() / self.period as f64;
        result[self.period] = Some(atr);

        for (j, &tr_val) in tr.iter().enumerate().skip(self.period) {
            atr = (tr_val - atr) * self.multiplier + atr;
            result[j + 1] = Some(atr);
        }

        result
    }
}
