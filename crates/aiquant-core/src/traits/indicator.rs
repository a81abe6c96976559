//! Indicator trait definition.

use crate::error::DataError;

/// Trait for technical indicators.
///
/// Indicators process an ordered price sequence and produce a sequence of
/// derived values of the **same length**: indices inside the warm-up window
/// (fewer than `period() - 1` bars of history) carry `None`. Consumers must
/// treat `None` as "not yet available", which is distinct from zero.
pub trait Indicator: Send + Sync {
    /// The output type of the indicator.
    type Output;

    /// Calculate indicator values for the given data.
    ///
    /// The result has exactly `data.len()` entries.
    fn calculate(&self, data: &[f64]) -> Vec<Option<Self::Output>>;

    /// Get the lookback period.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;

    /// Validate that there's enough data for at least one value.
    fn validate_data(&self, data: &[f64]) -> Result<(), DataError> {
        if data.len() < self.period() {
            return Err(DataError::InsufficientHistory {
                required: self.period(),
                available: data.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct WindowSum {
        period: usize,
    }

    impl Indicator for WindowSum {
        type Output = f64;

        fn calculate(&self, data: &[f64]) -> Vec<Option<f64>> {
            (0..data.len())
                .map(|i| {
                    if i + 1 < self.period {
                        None
                    } else {
                        Some(data[i + 1 - self.period..=i].iter().sum())
                    }
                })
                .collect()
        }

        fn period(&self) -> usize {
            self.period
        }

        fn name(&self) -> &str {
            "WindowSum"
        }
    }

    #[test]
    fn test_full_length_output_with_warmup() {
        let indicator = WindowSum { period: 3 };
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = indicator.calculate(&data);

        assert_eq!(result.len(), data.len());
        assert!(result[0].is_none());
        assert!(result[1].is_none());
        assert_eq!(result[2], Some(6.0));
        assert_eq!(result[4], Some(12.0));
    }

    #[test]
    fn test_validation() {
        let indicator = WindowSum { period: 5 };
        assert!(indicator.validate_data(&[1.0, 2.0]).is_err());
        assert!(indicator
            .validate_data(&[1.0, 2.0, 3.0, 4.0, 5.0])
            .is_ok());
    }
}
