//! Local support/resistance levels.

use serde::{Deserialize, Serialize};

/// Support and resistance price levels found in a series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    /// Lows that are local minima over the symmetric window
    pub support: Vec<f64>,
    /// Highs that are local maxima over the symmetric window
    pub resistance: Vec<f64>,
}

/// Find local extrema over a symmetric lookback window.
///
/// A bar is a resistance level when its high strictly exceeds every high
/// within `window` bars on both sides, and a support level when its low is
/// strictly below every low in the same neighborhood. Bars too close to
/// either edge are never levels.
pub fn find_levels(highs: &[f64], lows: &[f64], window: usize) -> PriceLevels {
    let len = highs.len().min(lows.len());
    let mut levels = PriceLevels::default();
    if window == 0 || len < 2 * window + 1 {
        return levels;
    }

    for i in window..len - window {
        let neighborhood = (i - window..=i + window).filter(|&j| j != i);

        if neighborhood.clone().all(|j| highs[i] > highs[j]) {
            levels.resistance.push(highs[i]);
        }
        if neighborhood.clone().all(|j| lows[i] < lows[j]) {
            levels.support.push(lows[i]);
        }
    }

    levels
}
