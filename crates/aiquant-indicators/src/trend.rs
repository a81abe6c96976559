//! Trend classification from stacked moving averages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse trend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trend::Up => write!(f, "uptrend"),
            Trend::Down => write!(f, "downtrend"),
            Trend::Sideways => write!(f, "sideways"),
        }
    }
}

/// Classify the trend from short/medium/long moving averages.
///
/// Strictly ascending (short > medium > long) is an uptrend, strictly
/// descending a downtrend; anything else, including any unavailable input,
/// is sideways.
pub fn classify_trend(
    short: Option<f64>,
    medium: Option<f64>,
    long: Option<f64>,
) -> Trend {
    match (short, medium, long) {
        (Some(s), Some(m), Some(l)) => {
            if s > m && m > l {
                Trend::Up
            } else if s < m && m < l {
                Trend::Down
            } else {
                Trend::Sideways
            }
        }
        _ => Trend::Sideways,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptrend() {
        assert_eq!(
            classify_trend(Some(105.0), Some(102.0), Some(100.0)),
            Trend::Up
        );
    }

    #[test]
    fn test_downtrend() {
        assert_eq!(
            classify_trend(Some(95.0), Some(98.0), Some(100.0)),
            Trend::Down
        );
    }

    #[test]
    fn test_mixed_is_sideways() {
        assert_eq!(
            classify_trend(Some(101.0), Some(99.0), Some(100.0)),
            Trend::Sideways
        );
        // Equality breaks strictness
        assert_eq!(
            classify_trend(Some(100.0), Some(100.0), Some(99.0)),
            Trend::Sideways
        );
    }

    #[test]
    fn test_unavailable_input_is_sideways() {
        assert_eq!(classify_trend(Some(105.0), Some(102.0), None), Trend::Sideways);
        assert_eq!(classify_trend(None, None, None), Trend::Sideways);
    }
}
