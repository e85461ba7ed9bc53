mod engine;
mod error;
mod types;
mod validate;

pub use engine::{
    EWF_RATE, MORTGAGE_TERM_MONTHS, SUBSIDY_BASE_RENT, SUBSIDY_COVERAGE,
    SUBSIDY_INCOME_LIMIT_COUPLE, SUBSIDY_INCOME_LIMIT_SINGLE, SUBSIDY_MAX, SUBSIDY_RENT_LIMIT,
    TRANSFER_TAX_WAIVER_AGE_LIMIT, analyze, compute, rent_subsidy,
};
pub use error::{AnalysisError, ContractViolation};
pub use types::{AnalysisResult, EmploymentStatus, HouseholdSize, InputProfile, ProjectionYear};
pub use validate::{FieldErrors, RawRecord, example_record, field, validate};
