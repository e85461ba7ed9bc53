use super::error::AnalysisError;
use super::types::{AnalysisResult, HouseholdSize, InputProfile, ProjectionYear};
use super::validate::{RawRecord, validate};

/// Fixed mortgage term: 30 years of monthly payments.
pub const MORTGAGE_TERM_MONTHS: u32 = 360;

/// Notional rental value (eigenwoningforfait) as a share of the assessed value per year.
pub const EWF_RATE: f64 = 0.0035;

pub const TRANSFER_TAX_WAIVER_AGE_LIMIT: u32 = 35;

pub const SUBSIDY_INCOME_LIMIT_SINGLE: f64 = 30_000.0;
pub const SUBSIDY_INCOME_LIMIT_COUPLE: f64 = 38_000.0;
pub const SUBSIDY_RENT_LIMIT: f64 = 808.0;
pub const SUBSIDY_BASE_RENT: f64 = 250.0;
pub const SUBSIDY_COVERAGE: f64 = 0.75;
pub const SUBSIDY_MAX: f64 = 350.0;

#[derive(Debug, Clone, Copy, PartialEq)]
struct MortgageSplit {
    payment: f64,
    interest: f64,
    principal: f64,
}

/// Level annuity payment and its first-month interest/principal split.
fn mortgage_split(principal: f64, annual_rate: f64) -> MortgageSplit {
    let monthly_rate = annual_rate / 12.0;
    let n = f64::from(MORTGAGE_TERM_MONTHS);

    let payment = if principal <= 0.0 {
        0.0
    } else if monthly_rate == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + monthly_rate).powf(n);
        principal * (monthly_rate * growth) / (growth - 1.0)
    };

    let interest = principal * monthly_rate;
    MortgageSplit {
        payment,
        interest,
        principal: payment - interest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct UpfrontCosts {
    transfer_tax: f64,
    other: f64,
    overbid: f64,
}

impl UpfrontCosts {
    fn total(self) -> f64 {
        self.transfer_tax + self.other + self.overbid
    }
}

fn transfer_tax_waived(profile: &InputProfile) -> bool {
    profile.is_first_time_buyer && profile.age < TRANSFER_TAX_WAIVER_AGE_LIMIT
}

fn upfront_costs(profile: &InputProfile, property_value: f64) -> UpfrontCosts {
    let transfer_tax = if transfer_tax_waived(profile) {
        0.0
    } else {
        property_value * profile.property_transfer_tax_rate
    };
    UpfrontCosts {
        transfer_tax,
        other: property_value * profile.other_upfront_costs_rate,
        overbid: profile.overbid_amount,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct MonthlyBuyingCost {
    mortgage: f64,
    maintenance: f64,
    tax_benefit: f64,
    ewf: f64,
}

impl MonthlyBuyingCost {
    fn net(self) -> f64 {
        self.mortgage + self.maintenance - self.tax_benefit + self.ewf
    }
}

fn monthly_buying_cost(
    profile: &InputProfile,
    property_value: f64,
    mortgage: MortgageSplit,
) -> MonthlyBuyingCost {
    let tax_benefit = if profile.mid_eligible && mortgage.interest > 0.0 {
        mortgage.interest * profile.marginal_tax_rate
    } else {
        0.0
    };
    MonthlyBuyingCost {
        mortgage: mortgage.payment,
        maintenance: property_value * profile.maintenance_rate / 12.0,
        tax_benefit,
        ewf: property_value * EWF_RATE / 12.0,
    }
}

fn subsidy_income_limit(household: HouseholdSize) -> f64 {
    match household {
        HouseholdSize::Single => SUBSIDY_INCOME_LIMIT_SINGLE,
        HouseholdSize::Couple => SUBSIDY_INCOME_LIMIT_COUPLE,
    }
}

/// Simplified monthly rent allowance. Zero once income or rent passes its limit.
pub fn rent_subsidy(annual_income: f64, monthly_rent: f64, household: HouseholdSize) -> f64 {
    let income_limit = subsidy_income_limit(household);
    if annual_income > income_limit || monthly_rent > SUBSIDY_RENT_LIMIT {
        return 0.0;
    }
    let income_ratio = 1.0 - annual_income / income_limit;
    let potential = (monthly_rent - SUBSIDY_BASE_RENT) * SUBSIDY_COVERAGE;
    (potential * income_ratio).max(0.0).min(SUBSIDY_MAX)
}

fn profile_rent_subsidy(profile: &InputProfile) -> f64 {
    match (profile.is_eligible_for_rent_subsidy, profile.household_size) {
        (true, Some(household)) => rent_subsidy(
            profile.annual_income,
            profile.current_rental_expenses,
            household,
        ),
        _ => 0.0,
    }
}

/// Fixed per-year cash flows that drive the projection.
#[derive(Debug, Clone, Copy)]
struct ProjectionFlows {
    upfront_cost: f64,
    annual_buying_cost: f64,
    annual_renting_cost: f64,
    annual_principal_paid: f64,
    appreciation_rate: f64,
    selling_costs_rate: f64,
}

#[derive(Debug, Clone, Copy)]
struct ProjectionState {
    year: u32,
    cumulative_buying_cost: f64,
    cumulative_renting_cost: f64,
    remaining_principal: f64,
    property_value: f64,
}

impl ProjectionState {
    fn opening(flows: &ProjectionFlows, principal: f64, property_value: f64) -> Self {
        Self {
            year: 0,
            cumulative_buying_cost: flows.upfront_cost,
            cumulative_renting_cost: 0.0,
            remaining_principal: principal,
            property_value,
        }
    }

    fn advance(&mut self, flows: &ProjectionFlows) -> ProjectionYear {
        self.year += 1;
        self.cumulative_buying_cost += flows.annual_buying_cost;
        self.cumulative_renting_cost += flows.annual_renting_cost;
        self.remaining_principal = (self.remaining_principal - flows.annual_principal_paid).max(0.0);
        self.property_value *= 1.0 + flows.appreciation_rate;

        let net_sale_proceeds = net_sale_proceeds(
            self.property_value,
            self.remaining_principal,
            flows.selling_costs_rate,
        );

        ProjectionYear {
            year: self.year,
            cumulative_buying_cost: self.cumulative_buying_cost,
            cumulative_renting_cost: self.cumulative_renting_cost,
            property_value: self.property_value,
            accumulated_equity: (self.property_value - self.remaining_principal).max(0.0),
            total_net_ownership_cost: self.cumulative_buying_cost - net_sale_proceeds,
        }
    }
}

/// Cash left after repaying the mortgage and paying selling costs. Negative
/// when the home is under water.
fn net_sale_proceeds(property_value: f64, remaining_principal: f64, selling_costs_rate: f64) -> f64 {
    property_value - remaining_principal - property_value * selling_costs_rate
}

/// First-crossing markers. Each is latched on the first qualifying year.
#[derive(Debug, Clone, Copy, Default)]
struct BreakevenTracker {
    breakeven: Option<u32>,
    investment_breakeven: Option<u32>,
}

impl BreakevenTracker {
    fn observe(&mut self, point: &ProjectionYear) {
        if self.breakeven.is_none()
            && point.total_net_ownership_cost < point.cumulative_renting_cost
        {
            self.breakeven = Some(point.year);
        }
        if self.investment_breakeven.is_none() && point.total_net_ownership_cost <= 0.0 {
            self.investment_breakeven = Some(point.year);
        }
    }
}

struct ProjectionOutcome {
    years: Vec<ProjectionYear>,
    breakeven: Option<u32>,
    investment_breakeven: Option<u32>,
    final_state: ProjectionState,
}

fn run_projection(
    flows: &ProjectionFlows,
    principal: f64,
    property_value: f64,
    horizon_years: u32,
) -> ProjectionOutcome {
    let mut state = ProjectionState::opening(flows, principal, property_value);
    let mut tracker = BreakevenTracker::default();
    let mut years = Vec::with_capacity(horizon_years as usize);

    for _ in 0..horizon_years {
        let point = state.advance(flows);
        tracker.observe(&point);
        years.push(point);
    }

    ProjectionOutcome {
        years,
        breakeven: tracker.breakeven,
        investment_breakeven: tracker.investment_breakeven,
        final_state: state,
    }
}

/// Buy-vs-rent analysis for a validated profile.
///
/// The projection amortizes with the first month's principal share held flat
/// for every year, so remaining principal declines linearly rather than along
/// the true annuity schedule.
pub fn compute(profile: &InputProfile) -> AnalysisResult {
    debug_assert!(
        profile.contract_violation().is_none(),
        "compute called with an invalid profile: {:?}",
        profile.contract_violation()
    );

    let principal = profile.max_mortgage;
    let property_value = principal;
    let mortgage = mortgage_split(principal, profile.interest_rate);
    let upfront = upfront_costs(profile, property_value);
    let buying = monthly_buying_cost(profile, property_value, mortgage);
    let net_monthly_buying_cost = buying.net();

    let rent_subsidy_amount = profile_rent_subsidy(profile);
    let net_monthly_rental_cost = profile.current_rental_expenses - rent_subsidy_amount;

    let flows = ProjectionFlows {
        upfront_cost: upfront.total(),
        annual_buying_cost: 12.0 * net_monthly_buying_cost,
        annual_renting_cost: 12.0 * net_monthly_rental_cost,
        annual_principal_paid: 12.0 * mortgage.principal,
        appreciation_rate: profile.property_appreciation_rate,
        selling_costs_rate: profile.selling_costs_rate,
    };
    let outcome = run_projection(
        &flows,
        principal,
        property_value,
        profile.intended_length_of_stay,
    );

    let realized_value_on_sale = net_sale_proceeds(
        outcome.final_state.property_value,
        outcome.final_state.remaining_principal,
        profile.selling_costs_rate,
    );

    AnalysisResult {
        gross_monthly_mortgage: mortgage.payment,
        monthly_interest: mortgage.interest,
        monthly_principal: mortgage.principal,
        estimated_sale_price: property_value,
        transfer_tax_cost: upfront.transfer_tax,
        other_upfront_costs: upfront.other,
        overbid_amount: upfront.overbid,
        total_upfront_costs: upfront.total(),
        remaining_savings: profile.savings - upfront.total(),
        monthly_maintenance: buying.maintenance,
        monthly_tax_benefit: buying.tax_benefit,
        monthly_ewf_cost: buying.ewf,
        total_net_monthly_buying_cost: net_monthly_buying_cost,
        current_rental_expenses: profile.current_rental_expenses,
        rent_subsidy_amount,
        net_monthly_rental_cost,
        monthly_cost_differential: net_monthly_buying_cost - profile.current_rental_expenses,
        monthly_equity_accumulation: mortgage.principal,
        realized_value_on_sale,
        projection: outcome.years,
        breakeven_point: outcome.breakeven,
        investment_breakeven_point: outcome.investment_breakeven,
        inputs: profile.clone(),
    }
}

/// Validates a raw record and runs the analysis on it.
pub fn analyze(raw: &RawRecord) -> Result<AnalysisResult, AnalysisError> {
    let profile = validate(raw)?;
    if let Some(violation) = profile.contract_violation() {
        return Err(violation.into());
    }
    Ok(compute(&profile))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::EmploymentStatus;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_profile() -> InputProfile {
        InputProfile {
            age: 30,
            annual_income: 65_000.0,
            employment_status: EmploymentStatus::Employed,
            household_size: Some(HouseholdSize::Single),
            savings: 30_000.0,
            current_rental_expenses: 1_600.0,
            max_mortgage: 350_000.0,
            overbid_amount: 25_000.0,
            interest_rate: 0.042,
            marginal_tax_rate: 0.37,
            property_transfer_tax_rate: 0.0,
            other_upfront_costs_rate: 0.03,
            maintenance_rate: 0.01,
            property_appreciation_rate: 0.025,
            selling_costs_rate: 0.02,
            is_first_time_buyer: true,
            mid_eligible: true,
            is_eligible_for_rent_subsidy: false,
            intended_length_of_stay: 10,
        }
    }

    #[test]
    fn annuity_matches_reference_scenario() {
        let split = mortgage_split(300_000.0, 0.041);
        assert_approx_tol(split.payment, 1_449.60, 0.01);
        assert_approx(split.interest, 1_025.0);
        assert_approx_tol(split.principal, 424.60, 0.01);
        assert_approx(split.principal + split.interest, split.payment);
    }

    #[test]
    fn zero_interest_pays_straight_line() {
        let mut profile = sample_profile();
        profile.interest_rate = 0.0;
        let result = compute(&profile);

        assert_eq!(result.gross_monthly_mortgage, 350_000.0 / 360.0);
        assert_eq!(result.monthly_interest, 0.0);
        assert_eq!(result.monthly_tax_benefit, 0.0);
        assert_eq!(result.monthly_principal, result.gross_monthly_mortgage);
    }

    #[test]
    fn zero_principal_has_no_payment() {
        let split = mortgage_split(0.0, 0.05);
        assert_eq!(split.payment, 0.0);
        assert_eq!(split.interest, 0.0);
        assert_eq!(split.principal, 0.0);
    }

    #[test]
    fn transfer_tax_waived_only_for_first_time_buyers_under_35() {
        let mut profile = sample_profile();
        profile.property_transfer_tax_rate = 0.02;

        profile.age = 34;
        let result = compute(&profile);
        assert_eq!(result.transfer_tax_cost, 0.0);

        profile.age = 35;
        let result = compute(&profile);
        assert_approx(result.transfer_tax_cost, 350_000.0 * 0.02);

        profile.age = 30;
        profile.is_first_time_buyer = false;
        let result = compute(&profile);
        assert_approx(result.transfer_tax_cost, 7_000.0);
    }

    #[test]
    fn upfront_costs_include_overbid_and_other_fees() {
        let mut profile = sample_profile();
        profile.is_first_time_buyer = false;
        profile.property_transfer_tax_rate = 0.02;
        let result = compute(&profile);

        assert_approx(result.other_upfront_costs, 10_500.0);
        assert_approx(result.overbid_amount, 25_000.0);
        assert_approx(result.total_upfront_costs, 42_500.0);
        assert_approx(result.remaining_savings, -12_500.0);
        assert!(!result.has_enough_savings());
    }

    #[test]
    fn example_scenario_monthly_figures() {
        let result = compute(&sample_profile());

        assert_approx_tol(result.gross_monthly_mortgage, 1_711.560_108, 1e-5);
        assert_approx(result.monthly_interest, 1_225.0);
        assert_approx(result.monthly_tax_benefit, 453.25);
        assert_approx(result.monthly_ewf_cost, 350_000.0 * 0.0035 / 12.0);
        assert_approx(result.monthly_maintenance, 350_000.0 * 0.01 / 12.0);
        assert_approx_tol(result.total_net_monthly_buying_cost, 1_652.060_108, 1e-5);
        assert_approx(result.total_upfront_costs, 35_500.0);
        assert_approx(result.estimated_sale_price, 350_000.0);
        assert_approx(
            result.monthly_cost_differential,
            result.total_net_monthly_buying_cost - 1_600.0,
        );
        assert_approx(result.monthly_equity_accumulation, result.monthly_principal);
        assert!(!result.buying_is_cheaper_monthly());
    }

    #[test]
    fn example_scenario_projection_and_breakeven() {
        let result = compute(&sample_profile());

        assert_eq!(result.projection.len(), 10);
        let first = &result.projection[0];
        assert_eq!(first.year, 1);
        assert_approx_tol(first.cumulative_buying_cost, 55_324.721_296, 1e-4);
        assert_approx(first.cumulative_renting_cost, 19_200.0);
        assert_approx(first.property_value, 358_750.0);
        assert_approx_tol(first.accumulated_equity, 14_588.721_296, 1e-4);
        assert_approx_tol(first.total_net_ownership_cost, 47_911.0, 1e-4);

        assert_eq!(result.breakeven_point, Some(4));
        assert!(result.breaks_even());
        assert_eq!(result.investment_breakeven_point, None);
        assert_approx_tol(result.realized_value_on_sale, 147_456.211_619, 1e-4);
    }

    #[test]
    fn strong_appreciation_reaches_investment_breakeven() {
        let mut profile = sample_profile();
        profile.property_appreciation_rate = 0.08;
        profile.intended_length_of_stay = 30;
        let result = compute(&profile);

        assert_eq!(result.breakeven_point, Some(2));
        assert_eq!(result.investment_breakeven_point, Some(3));
        assert!(result.projection[2].total_net_ownership_cost <= 0.0);
        assert!(result.projection[1].total_net_ownership_cost > 0.0);
    }

    #[test]
    fn cheap_rent_never_breaks_even() {
        let mut profile = sample_profile();
        profile.current_rental_expenses = 800.0;
        profile.property_appreciation_rate = 0.02;
        profile.intended_length_of_stay = 10;
        let result = compute(&profile);

        assert_eq!(result.breakeven_point, None);
        assert_eq!(result.investment_breakeven_point, None);
        assert!(
            result
                .projection
                .iter()
                .all(|y| y.total_net_ownership_cost >= y.cumulative_renting_cost)
        );
    }

    #[test]
    fn subsidy_zero_when_rent_exceeds_cap() {
        assert_eq!(rent_subsidy(60_000.0, 1_500.0, HouseholdSize::Single), 0.0);
        assert_eq!(rent_subsidy(10_000.0, 1_500.0, HouseholdSize::Couple), 0.0);

        let mut profile = sample_profile();
        profile.annual_income = 60_000.0;
        profile.current_rental_expenses = 1_500.0;
        profile.is_eligible_for_rent_subsidy = true;
        let result = compute(&profile);
        assert_eq!(result.rent_subsidy_amount, 0.0);
        assert_eq!(result.net_monthly_rental_cost, 1_500.0);
    }

    #[test]
    fn subsidy_scales_with_income_and_household() {
        assert_approx(rent_subsidy(20_000.0, 700.0, HouseholdSize::Single), 112.5);
        assert_approx(
            rent_subsidy(20_000.0, 700.0, HouseholdSize::Couple),
            450.0 * 0.75 * (1.0 - 20_000.0 / 38_000.0),
        );
        assert_approx(rent_subsidy(30_001.0, 700.0, HouseholdSize::Single), 0.0);
        assert_approx(rent_subsidy(5_000.0, 200.0, HouseholdSize::Single), 0.0);
    }

    #[test]
    fn subsidy_is_capped() {
        assert_approx(rent_subsidy(0.0, 808.0, HouseholdSize::Couple), SUBSIDY_MAX);
        assert_approx(rent_subsidy(5_000.0, 800.0, HouseholdSize::Single), 343.75);
    }

    #[test]
    fn subsidy_ignored_without_eligibility() {
        let mut profile = sample_profile();
        profile.annual_income = 20_000.0;
        profile.current_rental_expenses = 700.0;
        profile.is_eligible_for_rent_subsidy = false;
        assert_eq!(compute(&profile).rent_subsidy_amount, 0.0);

        profile.is_eligible_for_rent_subsidy = true;
        let result = compute(&profile);
        assert_approx(result.rent_subsidy_amount, 112.5);
        assert_approx(result.net_monthly_rental_cost, 587.5);
        assert_approx(result.projection[0].cumulative_renting_cost, 12.0 * 587.5);
    }

    #[test]
    fn mid_benefit_requires_eligibility() {
        let mut profile = sample_profile();
        profile.mid_eligible = false;
        let result = compute(&profile);
        assert_eq!(result.monthly_tax_benefit, 0.0);
        assert_approx(
            result.total_net_monthly_buying_cost,
            result.gross_monthly_mortgage + result.monthly_maintenance + result.monthly_ewf_cost,
        );
    }

    #[test]
    fn underwater_equity_is_floored_but_sale_value_goes_negative() {
        let mut profile = sample_profile();
        profile.property_appreciation_rate = -0.05;
        profile.intended_length_of_stay = 30;
        let result = compute(&profile);

        let last = result.projection.last().expect("projection is non-empty");
        assert_eq!(last.accumulated_equity, 0.0);
        assert!(result.realized_value_on_sale < 0.0);
    }

    #[test]
    fn analyze_validates_then_computes() {
        let raw = crate::core::example_record();
        let result = analyze(&raw).expect("example analyzes");
        assert_eq!(result, compute(&sample_profile()));

        let mut raw = raw;
        raw.insert("age".to_string(), serde_json::json!(12));
        let err = analyze(&raw).expect_err("age is out of range");
        assert!(matches!(err, AnalysisError::Validation(ref fields) if fields.get("age").is_some()));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_monthly_identities_hold(
            age in 18u32..=100,
            principal in 1_000u32..2_000_000,
            rate_bp in 0u32..=2_000,
            marginal_bp in 0u32..=10_000,
            maintenance_bp in 0u32..=1_000,
            mid_eligible in proptest::bool::ANY,
        ) {
            let mut profile = sample_profile();
            profile.age = age;
            profile.max_mortgage = f64::from(principal);
            profile.interest_rate = f64::from(rate_bp) / 10_000.0;
            profile.marginal_tax_rate = f64::from(marginal_bp) / 10_000.0;
            profile.maintenance_rate = f64::from(maintenance_bp) / 10_000.0;
            profile.mid_eligible = mid_eligible;

            let r = compute(&profile);
            let tol = 1e-9 * r.gross_monthly_mortgage.max(1.0);
            prop_assert!((r.monthly_principal + r.monthly_interest - r.gross_monthly_mortgage).abs() <= tol);
            let expected_net = r.gross_monthly_mortgage + r.monthly_maintenance - r.monthly_tax_benefit
                + r.monthly_ewf_cost;
            prop_assert!((r.total_net_monthly_buying_cost - expected_net).abs() <= tol);
            prop_assert!(r.monthly_principal >= 0.0);
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_projection_is_sequential_and_breakeven_is_first_crossing(
            rent in 300u32..4_000,
            principal in 50_000u32..1_500_000,
            rate_bp in 0u32..=2_000,
            appreciation_bp in -500i32..=2_000,
            selling_bp in 0u32..=1_000,
            stay in 1u32..=30,
        ) {
            let mut profile = sample_profile();
            profile.current_rental_expenses = f64::from(rent);
            profile.max_mortgage = f64::from(principal);
            profile.interest_rate = f64::from(rate_bp) / 10_000.0;
            profile.property_appreciation_rate = f64::from(appreciation_bp) / 10_000.0;
            profile.selling_costs_rate = f64::from(selling_bp) / 10_000.0;
            profile.intended_length_of_stay = stay;

            let r = compute(&profile);
            prop_assert_eq!(r.projection.len(), stay as usize);
            for (idx, point) in r.projection.iter().enumerate() {
                prop_assert_eq!(point.year, idx as u32 + 1);
                prop_assert!(point.accumulated_equity >= 0.0);
            }

            match r.breakeven_point {
                Some(year) => {
                    let idx = year as usize - 1;
                    let hit = &r.projection[idx];
                    prop_assert!(hit.total_net_ownership_cost < hit.cumulative_renting_cost);
                    prop_assert!(r.projection[..idx]
                        .iter()
                        .all(|p| p.total_net_ownership_cost >= p.cumulative_renting_cost));
                }
                None => prop_assert!(r.projection
                    .iter()
                    .all(|p| p.total_net_ownership_cost >= p.cumulative_renting_cost)),
            }

            match r.investment_breakeven_point {
                Some(year) => {
                    let idx = year as usize - 1;
                    prop_assert!(r.projection[idx].total_net_ownership_cost <= 0.0);
                    prop_assert!(r.projection[..idx].iter().all(|p| p.total_net_ownership_cost > 0.0));
                }
                None => prop_assert!(r.projection.iter().all(|p| p.total_net_ownership_cost > 0.0)),
            }
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(32))]

        #[test]
        fn prop_compute_is_idempotent(
            rent in 300u32..4_000,
            appreciation_bp in -500i32..=2_000,
            stay in 1u32..=30,
            subsidy in proptest::bool::ANY,
        ) {
            let mut profile = sample_profile();
            profile.current_rental_expenses = f64::from(rent);
            profile.property_appreciation_rate = f64::from(appreciation_bp) / 10_000.0;
            profile.intended_length_of_stay = stay;
            profile.is_eligible_for_rent_subsidy = subsidy;

            prop_assert_eq!(compute(&profile), compute(&profile));
        }
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_realized_value_non_decreasing_in_appreciation(
            low_bp in -500i32..=2_000,
            bump_bp in 0i32..=500,
            principal in 50_000u32..1_500_000,
            selling_bp in 0u32..=1_000,
            stay in 1u32..=30,
        ) {
            let high_bp = (low_bp + bump_bp).min(2_000);
            let mut profile = sample_profile();
            profile.max_mortgage = f64::from(principal);
            profile.selling_costs_rate = f64::from(selling_bp) / 10_000.0;
            profile.intended_length_of_stay = stay;

            profile.property_appreciation_rate = f64::from(low_bp) / 10_000.0;
            let low = compute(&profile);
            profile.property_appreciation_rate = f64::from(high_bp) / 10_000.0;
            let high = compute(&profile);

            prop_assert!(high.realized_value_on_sale + 1e-6 >= low.realized_value_on_sale);
        }
    }
}
