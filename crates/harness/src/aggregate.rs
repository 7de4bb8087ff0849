//! Reduction of episode results into a single fitness.

use serde::{Deserialize, Serialize};

use crate::error::EvalError;

/// How repeated episode results of one candidate become its fitness.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Worst episode. A policy that fails badly once is scored by that failure.
    #[default]
    Min,
    Mean,
    /// Nearest-rank percentile, `p` in `[0, 100]`.
    Percentile(f64),
}

impl Aggregation {
    /// Reduce `results`; an empty slice reduces to `0.0`.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn reduce(&self, results: &[u64]) -> f64 {
        if results.is_empty() {
            return 0.0;
        }
        match *self {
            Aggregation::Min => results.iter().copied().min().unwrap_or(0) as f64,
            Aggregation::Mean => results.iter().map(|&r| r as f64).sum::<f64>() / results.len() as f64,
            Aggregation::Percentile(p) => {
                let mut sorted = results.to_vec();
                sorted.sort_unstable();
                let rank = (p / 100.0 * sorted.len() as f64).ceil() as usize;
                sorted[rank.clamp(1, sorted.len()) - 1] as f64
            }
        }
    }

    /// # Errors
    ///
    /// [`EvalError::InvalidConfig`] for a percentile outside `[0, 100]`.
    pub fn validate(&self) -> Result<(), EvalError> {
        match *self {
            Aggregation::Percentile(p) if !(0.0..=100.0).contains(&p) => Err(EvalError::InvalidConfig(
                format!("percentile must lie in [0, 100], got {p}"),
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_is_the_worst_episode() {
        assert_eq!(Aggregation::Min.reduce(&[10, 3, 7]), 3.0);
    }

    #[test]
    fn mean_averages() {
        assert_eq!(Aggregation::Mean.reduce(&[10, 3, 8]), 7.0);
    }

    #[test]
    fn percentile_uses_nearest_rank() {
        let results = [15, 20, 35, 40, 50];
        assert_eq!(Aggregation::Percentile(0.0).reduce(&results), 15.0);
        assert_eq!(Aggregation::Percentile(30.0).reduce(&results), 20.0);
        assert_eq!(Aggregation::Percentile(40.0).reduce(&results), 20.0);
        assert_eq!(Aggregation::Percentile(50.0).reduce(&results), 35.0);
        assert_eq!(Aggregation::Percentile(100.0).reduce(&results), 50.0);
    }

    #[test]
    fn empty_results_reduce_to_zero() {
        assert_eq!(Aggregation::Min.reduce(&[]), 0.0);
        assert_eq!(Aggregation::Percentile(50.0).reduce(&[]), 0.0);
    }

    #[test]
    fn out_of_range_percentile_is_rejected() {
        assert!(Aggregation::Percentile(101.0).validate().is_err());
        assert!(Aggregation::Percentile(f64::NAN).validate().is_err());
        assert!(Aggregation::Percentile(99.0).validate().is_ok());
    }
}
