mod engine;
mod error;
mod types;

pub use engine::{
    MAX_AMOUNT, MAX_ANNUAL_RATE, MAX_MONTHS, amortizing_payment, investment_growth,
    investment_growth_with, monthly_rate_from_annual, mortgage_schedule, run_comparison,
    validate_input,
};
pub use error::InvalidInputError;
pub use types::{
    Comparison, ComparisonSummary, MonthlySnapshot, MortgageMonth, SimulationInput, Strategy,
};
