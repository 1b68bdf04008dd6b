use thiserror::Error;

/// Contract violations raised by the analysis core.
///
/// Data-shape conditions (empty subsets, constant columns, all-missing
/// fields) are never errors; they come back as empty results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurveyError {
    #[error("unknown field '{0}'")]
    UnknownField(String),

    #[error("unknown indicator group '{0}'")]
    UnknownGroup(String),

    /// Filters only apply to fixed fields, never to indicator columns.
    #[error("field '{0}' is an indicator column and cannot be used as a filter")]
    IndicatorCriterion(String),

    #[error("field '{0}' is not an indicator column")]
    NotAnIndicator(String),

    #[error("field '{0}' is an indicator column, expected a categorical field")]
    NotCategorical(String),
}

pub type Result<T, E = SurveyError> = std::result::Result<T, E>;
