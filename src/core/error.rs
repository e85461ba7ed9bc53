use super::validate::FieldErrors;

/// A typed profile that breaks the validator's guarantees. Raised only when a
/// caller bypasses `validate` and hands the engine something it never accepts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ContractViolation {
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("{field} = {value} must be > 0")]
    NotPositive { field: &'static str, value: f64 },
    #[error("{field} = {value} must be >= 0")]
    Negative { field: &'static str, value: f64 },
    #[error("householdSize is required when rent subsidy eligibility is set")]
    MissingHouseholdSize,
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] FieldErrors),
    #[error("contract violation: {0}")]
    ContractViolation(#[from] ContractViolation),
}
