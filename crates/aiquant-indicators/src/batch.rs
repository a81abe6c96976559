//! Batch indicator computation over a full bar series.

use aiquant_core::traits::Indicator;
use aiquant_core::types::{Bar, IndicatorSnapshot};
use serde::{Deserialize, Serialize};

use crate::levels::{find_levels, PriceLevels};
use crate::momentum::{Macd, MacdSeries, Rsi};
use crate::moving_average::Ema;
use crate::trend::{classify_trend, Trend};
use crate::volatility::{Atr, BollingerBands, BollingerOutput};

/// Lookback configuration for the indicator set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub ema_short: usize,
    pub ema_medium: usize,
    pub ema_long: usize,
    pub bollinger_period: usize,
    pub bollinger_k: f64,
    pub atr_period: usize,
    pub levels_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            ema_short: 20,
            ema_medium: 50,
            ema_long: 200,
            bollinger_period: 20,
            bollinger_k: 2.0,
            atr_period: 14,
            levels_window: 5,
        }
    }
}

impl IndicatorParams {
    /// Bars of history required before every indicator is available.
    pub fn warmup(&self) -> usize {
        [
            self.rsi_period + 1,
            self.macd_slow + self.macd_signal - 1,
            self.ema_long,
            self.bollinger_period,
            self.atr_period + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }
}

/// Every derived series for one OHLCV sequence, index-aligned with the bars.
///
/// Values at index `i` use only bars `0..=i`; reading `snapshot(i)` during a
/// sequential replay therefore never sees future bars.
#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub rsi: Vec<Option<f64>>,
    pub macd: MacdSeries,
    pub ema_short: Vec<Option<f64>>,
    pub ema_medium: Vec<Option<f64>>,
    pub ema_long: Vec<Option<f64>>,
    pub bollinger: Vec<Option<BollingerOutput>>,
    pub atr: Vec<Option<f64>>,
    pub trend: Vec<Trend>,
    /// Local extrema over the whole series (batch output, not per-bar)
    pub levels: PriceLevels,
    len: usize,
}

impl IndicatorSeries {
    /// Compute the full indicator set for the given bars.
    pub fn compute(bars: &[Bar], params: &IndicatorParams) -> Self {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

        let rsi = Rsi::new(params.rsi_period).calculate(&closes);
        let macd = Macd::with_periods(params.macd_fast, params.macd_slow, params.macd_signal)
            .calculate(&closes);
        let ema_short = Ema::new(params.ema_short).calculate(&closes);
        let ema_medium = Ema::new(params.ema_medium).calculate(&closes);
        let ema_long = Ema::new(params.ema_long).calculate(&closes);
        let bollinger =
            BollingerBands::with_params(params.bollinger_period, params.bollinger_k)
                .calculate(&closes);
        let atr = Atr::new(params.atr_period).calculate_ohlc(&highs, &lows, &closes);

        let trend = (0..bars.len())
            .map(|i| classify_trend(ema_short[i], ema_medium[i], ema_long[i]))
            .collect();

        let levels = find_levels(&highs, &lows, params.levels_window);

        Self {
            rsi,
            macd,
            ema_short,
            ema_medium,
            ema_long,
            bollinger,
            atr,
            trend,
            levels,
            len: bars.len(),
        }
    }

    /// Number of bars covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the series covers no bars.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Project bar `i` into the oracle's indicator snapshot.
    pub fn snapshot(&self, i: usize) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: self.rsi[i],
            macd: self.macd.macd[i],
            macd_signal: self.macd.signal[i],
            macd_histogram: self.macd.histogram[i],
            ema20: self.ema_short[i],
            ema50: self.ema_medium[i],
            ema200: self.ema_long[i],
            bollinger_upper: self.bollinger[i].map(|b| b.upper),
            bollinger_middle: self.bollinger[i].map(|b| b.middle),
            bollinger_lower: self.bollinger[i].map(|b| b.lower),
            atr: self.atr[i],
            open_interest: None,
            funding_rate: None,
        }
    }
}
