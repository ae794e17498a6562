use serde::Serialize;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Buy,
    RentAndInvest,
}

/// Parameters for one buy-vs-rent comparison. Rates are annual fractions
/// (0.04 = 4%); terms and horizons are in months.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationInput {
    pub home_price: f64,
    pub down_payment_fraction: f64,
    pub mortgage_rate: f64,
    pub loan_term_months: u32,
    pub grace_period_months: u32,
    pub monthly_rent: f64,
    pub rent_growth_rate: f64,
    pub home_appreciation_rate: f64,
    pub investment_return_rate: f64,
    pub horizon_months: u32,
    pub invest_difference: bool,
}

impl SimulationInput {
    pub fn down_payment(&self) -> f64 {
        self.home_price * self.down_payment_fraction
    }

    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment()
    }

    pub fn monthly_mortgage_rate(&self) -> f64 {
        self.mortgage_rate / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageMonth {
    pub month: u32,
    pub payment: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    pub remaining_balance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySnapshot {
    pub month: u32,
    pub mortgage_payment: f64,
    pub rent: f64,
    pub contribution: f64,
    pub remaining_principal: f64,
    pub home_value: f64,
    pub buy_net_worth: f64,
    pub portfolio_value: f64,
    pub cash_savings: f64,
    pub rent_net_worth: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonSummary {
    pub down_payment: f64,
    pub loan_amount: f64,
    pub grace_monthly_payment: f64,
    pub amortizing_monthly_payment: f64,
    pub total_mortgage_paid: f64,
    pub total_rent_paid: f64,
    pub buy_total_spent: f64,
    pub final_buy_net_worth: f64,
    pub final_rent_net_worth: f64,
    pub winner: Strategy,
    pub advantage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub input: SimulationInput,
    pub summary: ComparisonSummary,
    pub snapshots: Vec<MonthlySnapshot>,
}
