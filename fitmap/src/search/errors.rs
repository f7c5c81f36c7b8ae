use thiserror::Error;

/// An error type indicating an invalid search configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchConfigError {
    #[error("archive must have at least one bin per dimension")]
    ZeroBins,
    #[error("at least one initial random evaluation is required")]
    ZeroInitialEvaluations,
    #[error("{initial} initial evaluations exceed the total budget of {total}")]
    InitialExceedsTotal { initial: usize, total: usize },
}

/// An error type indicating a failed search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    /// Every initial evaluation was skipped, leaving
    /// no elite to mutate.
    #[error("attempted parent selection from an empty archive at evaluation {evaluation}")]
    EmptyArchive { evaluation: usize },
}
