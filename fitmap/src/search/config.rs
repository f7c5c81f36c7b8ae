use super::errors::SearchConfigError;

use serde::{Deserialize, Serialize};

use std::num::NonZeroUsize;

/// Configuration data for a MAP-Elites search.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SearchConfigFields")]
pub struct SearchConfig {
    /// Number of bins in each dimension of the archive.
    pub bins: NonZeroUsize,
    /// Total number of evaluations, including initialization.
    pub evaluations: usize,
    /// Number of evaluations spent generating random
    /// genomes before switching to mutation of elites.
    pub initial_evaluations: NonZeroUsize,
}

impl SearchConfig {
    /// Returns a validated configuration.
    ///
    /// # Errors
    /// Returns an error if `bins` or `initial_evaluations`
    /// are zero, or if `initial_evaluations` exceeds
    /// the total number of `evaluations`.
    ///
    /// # Examples
    /// ```
    /// use fitmap::SearchConfig;
    ///
    /// let config = SearchConfig::new(20, 5000, 1000).unwrap();
    /// assert_eq!(config.bins.get(), 20);
    ///
    /// assert!(SearchConfig::new(0, 5000, 1000).is_err());
    /// assert!(SearchConfig::new(20, 5000, 0).is_err());
    /// assert!(SearchConfig::new(20, 500, 1000).is_err());
    /// ```
    pub fn new(
        bins: usize,
        evaluations: usize,
        initial_evaluations: usize,
    ) -> Result<SearchConfig, SearchConfigError> {
        let bins = NonZeroUsize::new(bins).ok_or(SearchConfigError::ZeroBins)?;
        let initial_evaluations = NonZeroUsize::new(initial_evaluations)
            .ok_or(SearchConfigError::ZeroInitialEvaluations)?;
        if initial_evaluations.get() > evaluations {
            return Err(SearchConfigError::InitialExceedsTotal {
                initial: initial_evaluations.get(),
                total: evaluations,
            });
        }
        Ok(SearchConfig {
            bins,
            evaluations,
            initial_evaluations,
        })
    }
}

#[derive(Deserialize)]
struct SearchConfigFields {
    bins: usize,
    evaluations: usize,
    initial_evaluations: usize,
}

impl TryFrom<SearchConfigFields> for SearchConfig {
    type Error = SearchConfigError;

    fn try_from(fields: SearchConfigFields) -> Result<SearchConfig, SearchConfigError> {
        SearchConfig::new(fields.bins, fields.evaluations, fields.initial_evaluations)
    }
}

impl Default for SearchConfig {
    /// 20 bins, 5000 evaluations of which the first
    /// 1000 are random.
    fn default() -> SearchConfig {
        SearchConfig {
            // SAFETY: 20 and 1000 are valid NonZeroUsizes.
            bins: unsafe { NonZeroUsize::new_unchecked(20) },
            evaluations: 5000,
            initial_evaluations: unsafe { NonZeroUsize::new_unchecked(1000) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_round_trip() {
        let config = SearchConfig::new(7, 300, 30).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<SearchConfig>(&json).unwrap(), config);
    }

    #[test]
    fn initial_may_equal_total() {
        assert!(SearchConfig::new(1, 1, 1).is_ok());
    }

    #[test]
    fn zero_bins_rejected_on_deserialization() {
        let json = r#"{"bins":0,"evaluations":10,"initial_evaluations":1}"#;
        assert!(serde_json::from_str::<SearchConfig>(json).is_err());
    }

    #[test]
    fn excessive_initial_evaluations_rejected_on_deserialization() {
        let json = r#"{"bins":5,"evaluations":10,"initial_evaluations":11}"#;
        assert!(serde_json::from_str::<SearchConfig>(json).is_err());
    }
}
