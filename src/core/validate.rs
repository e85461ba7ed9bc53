use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Value, json};

use super::error::ContractViolation;
use super::types::{EmploymentStatus, HouseholdSize, InputProfile};

/// Untyped form input: a flat object keyed by the camelCase field names.
pub type RawRecord = serde_json::Map<String, Value>;

pub mod field {
    pub const AGE: &str = "age";
    pub const ANNUAL_INCOME: &str = "annualIncome";
    pub const EMPLOYMENT_STATUS: &str = "employmentStatus";
    pub const SAVINGS: &str = "savings";
    pub const CURRENT_RENTAL_EXPENSES: &str = "currentRentalExpenses";
    pub const MAX_MORTGAGE: &str = "maxMortgage";
    pub const OVERBID_AMOUNT: &str = "overbidAmount";
    pub const INTEREST_RATE: &str = "interestRate";
    pub const PROPERTY_TRANSFER_TAX: &str = "propertyTransferTaxPercentage";
    pub const OTHER_UPFRONT_COSTS: &str = "otherUpfrontCostsPercentage";
    pub const MAINTENANCE: &str = "maintenancePercentage";
    pub const IS_FIRST_TIME_BUYER: &str = "isFirstTimeBuyer";
    pub const MARGINAL_TAX_RATE: &str = "marginalTaxRate";
    pub const MID_ELIGIBLE: &str = "midEligible";
    pub const INTENDED_LENGTH_OF_STAY: &str = "intendedLengthOfStay";
    pub const PROPERTY_APPRECIATION_RATE: &str = "propertyAppreciationRate";
    pub const SELLING_COSTS: &str = "estimatedSellingCostsPercentage";
    pub const IS_ELIGIBLE_FOR_RENT_SUBSIDY: &str = "isEligibleForRentSubsidy";
    pub const HOUSEHOLD_SIZE: &str = "householdSize";

    /// Older records used the Dutch name for the rent subsidy flag.
    pub const IS_ELIGIBLE_FOR_RENT_SUBSIDY_ALIAS: &str = "isEligibleForHuurtoeslag";
}

const DEFAULT_TRANSFER_TAX_PERCENT: f64 = 2.0;

const MSG_REQUIRED: &str = "Required";
const MSG_NOT_A_NUMBER: &str = "Expected a number";
const MSG_NOT_FINITE: &str = "Must be a finite number";
const MSG_NOT_WHOLE: &str = "Must be a whole number";
const MSG_NOT_A_FLAG: &str = "Expected true or false";
const MSG_HOUSEHOLD_REQUIRED: &str = "Household size is required when rent allowance is selected.";

#[derive(Copy, Clone, Debug, PartialEq)]
enum Bound {
    NonNegative,
    Positive,
    Between(f64, f64),
}

impl Bound {
    fn check(self, value: f64) -> Result<(), String> {
        match self {
            Bound::NonNegative if value < 0.0 => Err("Must be 0 or more".to_string()),
            Bound::Positive if value <= 0.0 => Err("Must be greater than 0".to_string()),
            Bound::Between(min, max) if !(min..=max).contains(&value) => {
                Err(format!("Must be between {min} and {max}"))
            }
            _ => Ok(()),
        }
    }

    fn scaled(self, scale: f64) -> Self {
        match self {
            Bound::Between(min, max) => Bound::Between(min / scale, max / scale),
            other => other,
        }
    }
}

const AGE: Bound = Bound::Between(18.0, 100.0);
const STAY: Bound = Bound::Between(1.0, 30.0);
const INTEREST: Bound = Bound::Between(0.0, 20.0);
const MARGINAL_TAX: Bound = Bound::Between(0.0, 100.0);
const COST_PERCENT: Bound = Bound::Between(0.0, 10.0);
const APPRECIATION: Bound = Bound::Between(-5.0, 20.0);

/// Field name to human-readable message, one entry per offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("invalid input: {}", describe(.0))]
pub struct FieldErrors(BTreeMap<String, String>);

fn describe(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }
}

struct FieldReader<'a> {
    raw: &'a RawRecord,
    errors: FieldErrors,
}

impl<'a> FieldReader<'a> {
    fn new(raw: &'a RawRecord) -> Self {
        Self {
            raw,
            errors: FieldErrors::default(),
        }
    }

    fn lookup(&self, key: &str) -> Option<&'a Value> {
        match self.raw.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    fn number(&mut self, key: &str, bound: Bound, default: Option<f64>) -> Option<f64> {
        let value = match self.lookup(key) {
            Some(value) => match coerce_number(value) {
                Ok(n) => n,
                Err(msg) => {
                    self.errors.insert(key, msg);
                    return None;
                }
            },
            None => match default {
                Some(d) => d,
                None => {
                    self.errors.insert(key, MSG_REQUIRED);
                    return None;
                }
            },
        };
        match bound.check(value) {
            Ok(()) => Some(value),
            Err(msg) => {
                self.errors.insert(key, msg);
                None
            }
        }
    }

    fn percent(&mut self, key: &str, bound: Bound, default: Option<f64>) -> Option<f64> {
        self.number(key, bound, default).map(|v| v / 100.0)
    }

    fn whole(&mut self, key: &str, bound: Bound) -> Option<u32> {
        let value = self.number(key, bound, None)?;
        if value.fract() != 0.0 {
            self.errors.insert(key, MSG_NOT_WHOLE);
            return None;
        }
        Some(value as u32)
    }

    fn flag(&mut self, keys: &[&str], default: bool) -> Option<bool> {
        let Some((key, value)) = keys
            .iter()
            .find_map(|key| self.lookup(key).map(|value| (*key, value)))
        else {
            return Some(default);
        };
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) if s.trim() == "true" => Some(true),
            Value::String(s) if s.trim() == "false" => Some(false),
            _ => {
                self.errors.insert(key, MSG_NOT_A_FLAG);
                None
            }
        }
    }

    fn choice<T>(
        &mut self,
        key: &str,
        parse: fn(&str) -> Option<T>,
        variants: &[&str],
    ) -> Option<Option<T>> {
        let Some(value) = self.lookup(key) else {
            return Some(None);
        };
        match value.as_str().and_then(parse) {
            Some(parsed) => Some(Some(parsed)),
            None => {
                self.errors
                    .insert(key, format!("Expected one of: {}", variants.join(", ")));
                None
            }
        }
    }

    fn required_choice<T>(
        &mut self,
        key: &str,
        parse: fn(&str) -> Option<T>,
        variants: &[&str],
    ) -> Option<T> {
        match self.choice(key, parse, variants)? {
            Some(parsed) => Some(parsed),
            None => {
                self.errors.insert(key, MSG_REQUIRED);
                None
            }
        }
    }
}

fn coerce_number(value: &Value) -> Result<f64, &'static str> {
    let n = match value {
        Value::Number(n) => n.as_f64().ok_or(MSG_NOT_A_NUMBER)?,
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| MSG_NOT_A_NUMBER)?,
        _ => return Err(MSG_NOT_A_NUMBER),
    };
    if !n.is_finite() {
        return Err(MSG_NOT_FINITE);
    }
    Ok(n)
}

/// Coerces and range-checks a raw record. Every failing field is reported;
/// the household-size requirement is checked only once all fields pass.
pub fn validate(raw: &RawRecord) -> Result<InputProfile, FieldErrors> {
    let mut r = FieldReader::new(raw);

    let age = r.whole(field::AGE, AGE);
    let annual_income = r.number(field::ANNUAL_INCOME, Bound::Positive, None);
    let employment_status = r.required_choice(
        field::EMPLOYMENT_STATUS,
        EmploymentStatus::parse,
        &EmploymentStatus::VARIANTS,
    );
    let household_size = r.choice(
        field::HOUSEHOLD_SIZE,
        HouseholdSize::parse,
        &HouseholdSize::VARIANTS,
    );

    let savings = r.number(field::SAVINGS, Bound::NonNegative, None);
    let current_rental_expenses = r.number(field::CURRENT_RENTAL_EXPENSES, Bound::Positive, None);
    let max_mortgage = r.number(field::MAX_MORTGAGE, Bound::Positive, None);
    let overbid_amount = r.number(field::OVERBID_AMOUNT, Bound::NonNegative, Some(0.0));

    let interest_rate = r.percent(field::INTEREST_RATE, INTEREST, None);
    let marginal_tax_rate = r.percent(field::MARGINAL_TAX_RATE, MARGINAL_TAX, None);
    let property_transfer_tax_rate = r.percent(
        field::PROPERTY_TRANSFER_TAX,
        COST_PERCENT,
        Some(DEFAULT_TRANSFER_TAX_PERCENT),
    );
    let other_upfront_costs_rate = r.percent(field::OTHER_UPFRONT_COSTS, COST_PERCENT, None);
    let maintenance_rate = r.percent(field::MAINTENANCE, COST_PERCENT, None);
    let property_appreciation_rate = r.percent(field::PROPERTY_APPRECIATION_RATE, APPRECIATION, None);
    let selling_costs_rate = r.percent(field::SELLING_COSTS, COST_PERCENT, None);

    let is_first_time_buyer = r.flag(&[field::IS_FIRST_TIME_BUYER], false);
    let mid_eligible = r.flag(&[field::MID_ELIGIBLE], true);
    let is_eligible_for_rent_subsidy = r.flag(
        &[
            field::IS_ELIGIBLE_FOR_RENT_SUBSIDY,
            field::IS_ELIGIBLE_FOR_RENT_SUBSIDY_ALIAS,
        ],
        false,
    );

    let intended_length_of_stay = r.whole(field::INTENDED_LENGTH_OF_STAY, STAY);

    let FieldReader { mut errors, .. } = r;
    let (
        Some(age),
        Some(annual_income),
        Some(employment_status),
        Some(household_size),
        Some(savings),
        Some(current_rental_expenses),
        Some(max_mortgage),
        Some(overbid_amount),
        Some(interest_rate),
        Some(marginal_tax_rate),
        Some(property_transfer_tax_rate),
        Some(other_upfront_costs_rate),
        Some(maintenance_rate),
        Some(property_appreciation_rate),
        Some(selling_costs_rate),
        Some(is_first_time_buyer),
        Some(mid_eligible),
        Some(is_eligible_for_rent_subsidy),
        Some(intended_length_of_stay),
    ) = (
        age,
        annual_income,
        employment_status,
        household_size,
        savings,
        current_rental_expenses,
        max_mortgage,
        overbid_amount,
        interest_rate,
        marginal_tax_rate,
        property_transfer_tax_rate,
        other_upfront_costs_rate,
        maintenance_rate,
        property_appreciation_rate,
        selling_costs_rate,
        is_first_time_buyer,
        mid_eligible,
        is_eligible_for_rent_subsidy,
        intended_length_of_stay,
    )
    else {
        return Err(errors);
    };

    if is_eligible_for_rent_subsidy && household_size.is_none() {
        errors.insert(field::HOUSEHOLD_SIZE, MSG_HOUSEHOLD_REQUIRED);
        return Err(errors);
    }

    Ok(InputProfile {
        age,
        annual_income,
        employment_status,
        household_size,
        savings,
        current_rental_expenses,
        max_mortgage,
        overbid_amount,
        interest_rate,
        marginal_tax_rate,
        property_transfer_tax_rate,
        other_upfront_costs_rate,
        maintenance_rate,
        property_appreciation_rate,
        selling_costs_rate,
        is_first_time_buyer,
        mid_eligible,
        is_eligible_for_rent_subsidy,
        intended_length_of_stay,
    })
}

impl InputProfile {
    /// Re-checks the guarantees `validate` establishes, on the typed values.
    pub fn contract_violation(&self) -> Option<ContractViolation> {
        let in_range = |field: &'static str, value: f64, bound: Bound, scale: f64| {
            let bound = bound.scaled(scale);
            if value.is_finite() && bound.check(value).is_ok() {
                return None;
            }
            Some(match bound {
                Bound::Between(min, max) => ContractViolation::OutOfRange {
                    field,
                    value,
                    min,
                    max,
                },
                Bound::Positive => ContractViolation::NotPositive { field, value },
                Bound::NonNegative => ContractViolation::Negative { field, value },
            })
        };

        let checks = [
            in_range(field::AGE, f64::from(self.age), AGE, 1.0),
            in_range(field::ANNUAL_INCOME, self.annual_income, Bound::Positive, 1.0),
            in_range(field::SAVINGS, self.savings, Bound::NonNegative, 1.0),
            in_range(
                field::CURRENT_RENTAL_EXPENSES,
                self.current_rental_expenses,
                Bound::Positive,
                1.0,
            ),
            in_range(field::MAX_MORTGAGE, self.max_mortgage, Bound::Positive, 1.0),
            in_range(field::OVERBID_AMOUNT, self.overbid_amount, Bound::NonNegative, 1.0),
            in_range(field::INTEREST_RATE, self.interest_rate, INTEREST, 100.0),
            in_range(field::MARGINAL_TAX_RATE, self.marginal_tax_rate, MARGINAL_TAX, 100.0),
            in_range(
                field::PROPERTY_TRANSFER_TAX,
                self.property_transfer_tax_rate,
                COST_PERCENT,
                100.0,
            ),
            in_range(
                field::OTHER_UPFRONT_COSTS,
                self.other_upfront_costs_rate,
                COST_PERCENT,
                100.0,
            ),
            in_range(field::MAINTENANCE, self.maintenance_rate, COST_PERCENT, 100.0),
            in_range(
                field::PROPERTY_APPRECIATION_RATE,
                self.property_appreciation_rate,
                APPRECIATION,
                100.0,
            ),
            in_range(field::SELLING_COSTS, self.selling_costs_rate, COST_PERCENT, 100.0),
            in_range(
                field::INTENDED_LENGTH_OF_STAY,
                f64::from(self.intended_length_of_stay),
                STAY,
                1.0,
            ),
        ];
        if let Some(violation) = checks.into_iter().flatten().next() {
            return Some(violation);
        }

        if self.is_eligible_for_rent_subsidy && self.household_size.is_none() {
            return Some(ContractViolation::MissingHouseholdSize);
        }
        None
    }
}

/// The sample scenario offered as "load example". Always validates.
pub fn example_record() -> RawRecord {
    let value = json!({
        "age": 30,
        "annualIncome": 65000,
        "employmentStatus": "employed",
        "savings": 30000,
        "currentRentalExpenses": 1600,
        "maxMortgage": 350000,
        "overbidAmount": 25000,
        "interestRate": 4.2,
        "propertyTransferTaxPercentage": 0,
        "otherUpfrontCostsPercentage": 3,
        "maintenancePercentage": 1,
        "isFirstTimeBuyer": true,
        "marginalTaxRate": 37,
        "midEligible": true,
        "intendedLengthOfStay": 10,
        "propertyAppreciationRate": 2.5,
        "estimatedSellingCostsPercentage": 2,
        "isEligibleForRentSubsidy": false,
        "householdSize": "single"
    });
    match value {
        Value::Object(map) => map,
        _ => RawRecord::new(),
    }
}
