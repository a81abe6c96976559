//! Technical indicator library.
//!
//! Every indicator returns a sequence of the same length as its input;
//! indices inside the warm-up window hold `None` rather than a numeric
//! value. See [`aiquant_core::traits::Indicator`].

mod batch;
mod levels;
mod momentum;
mod moving_average;
mod trend;
mod volatility;

pub use batch::{IndicatorParams, IndicatorSeries};
pub use levels::{find_levels, PriceLevels};
pub use momentum::{Macd, MacdSeries, Rsi};
pub use moving_average::{Ema, Sma};
pub use trend::{classify_trend, Trend};
pub use volatility::{Atr, BollingerBands, BollingerOutput, StdDev};
