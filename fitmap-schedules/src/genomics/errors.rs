use thiserror::Error;

/// An error type indicating an invalid
/// configuration value.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("upper bound {hi} is below lower bound {lo}")]
    InvalidRange { lo: usize, hi: usize },
    #[error("range step must be positive")]
    ZeroStep,
    #[error("bounds {lo} and {hi} must be divisible by {step}")]
    NotDivisible { lo: usize, hi: usize, step: usize },
    #[error("{name} {value} lies outside [{lo}, {hi}]")]
    OutOfBounds {
        name: &'static str,
        value: usize,
        lo: usize,
        hi: usize,
    },
    #[error("{name} rate {rate} lies outside its valid interval")]
    InvalidRate { name: &'static str, rate: f64 },
    #[error("alteration, addition and deletion rates are all zero")]
    DegenerateRates,
    #[error("gene count {count} must lie in [1, {max}]")]
    InvalidGeneCount { count: usize, max: usize },
    #[error("chromosome holds no genes")]
    EmptyChromosome,
    #[error("exercise catalog is empty")]
    EmptyCatalog,
    #[error("invalid weight goal: {0}")]
    InvalidGoal(String),
}
