use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmploymentStatus {
    Employed,
    SelfEmployed,
    Other,
}

impl EmploymentStatus {
    pub const VARIANTS: [&'static str; 3] = ["employed", "self-employed", "other"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "employed" => Some(Self::Employed),
            "self-employed" => Some(Self::SelfEmployed),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseholdSize {
    Single,
    Couple,
}

impl HouseholdSize {
    pub const VARIANTS: [&'static str; 2] = ["single", "couple"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "single" => Some(Self::Single),
            "couple" => Some(Self::Couple),
            _ => None,
        }
    }
}

/// A validated household profile. Rates are stored as fractions (4.1% is
/// `0.041`). Only the validator builds these outside the crate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct InputProfile {
    pub age: u32,
    pub annual_income: f64,
    pub employment_status: EmploymentStatus,
    pub household_size: Option<HouseholdSize>,

    pub savings: f64,
    pub current_rental_expenses: f64,
    pub max_mortgage: f64,
    pub overbid_amount: f64,

    pub interest_rate: f64,
    pub marginal_tax_rate: f64,
    pub property_transfer_tax_rate: f64,
    pub other_upfront_costs_rate: f64,
    pub maintenance_rate: f64,
    pub property_appreciation_rate: f64,
    pub selling_costs_rate: f64,

    pub is_first_time_buyer: bool,
    pub mid_eligible: bool,
    pub is_eligible_for_rent_subsidy: bool,

    pub intended_length_of_stay: u32,
}

/// End-of-year snapshot of the buy-vs-rent projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionYear {
    pub year: u32,
    pub cumulative_buying_cost: f64,
    pub cumulative_renting_cost: f64,
    pub property_value: f64,
    pub accumulated_equity: f64,
    pub total_net_ownership_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub gross_monthly_mortgage: f64,
    pub monthly_interest: f64,
    pub monthly_principal: f64,

    pub estimated_sale_price: f64,
    pub transfer_tax_cost: f64,
    pub other_upfront_costs: f64,
    pub overbid_amount: f64,
    pub total_upfront_costs: f64,
    pub remaining_savings: f64,

    pub monthly_maintenance: f64,
    pub monthly_tax_benefit: f64,
    pub monthly_ewf_cost: f64,
    pub total_net_monthly_buying_cost: f64,

    pub current_rental_expenses: f64,
    pub rent_subsidy_amount: f64,
    pub net_monthly_rental_cost: f64,
    pub monthly_cost_differential: f64,

    pub monthly_equity_accumulation: f64,
    pub realized_value_on_sale: f64,

    pub projection: Vec<ProjectionYear>,
    pub breakeven_point: Option<u32>,
    pub investment_breakeven_point: Option<u32>,

    pub inputs: InputProfile,
}

impl AnalysisResult {
    pub fn buying_is_cheaper_monthly(&self) -> bool {
        self.total_net_monthly_buying_cost < self.net_monthly_rental_cost
    }

    pub fn breaks_even(&self) -> bool {
        self.breakeven_point.is_some()
    }

    pub fn has_enough_savings(&self) -> bool {
        self.remaining_savings >= 0.0
    }
}
