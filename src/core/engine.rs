use tracing::debug;

use super::error::InvalidInputError;
use super::types::{
    Comparison, ComparisonSummary, MonthlySnapshot, MortgageMonth, SimulationInput, Strategy,
};

/// Upper bound on loan terms and horizons (100 years).
pub const MAX_MONTHS: u32 = 1200;
/// Upper bound on annual rates (1000% a year).
pub const MAX_ANNUAL_RATE: f64 = 10.0;
/// Upper bound on the home price and the monthly rent.
pub const MAX_AMOUNT: f64 = 1e12;

pub fn validate_input(input: &SimulationInput) -> Result<(), InvalidInputError> {
    if !input.home_price.is_finite() || input.home_price <= 0.0 {
        return Err(InvalidInputError::new("home_price", "must be > 0"));
    }

    if input.home_price > MAX_AMOUNT {
        return Err(InvalidInputError::new(
            "home_price",
            format!("must be <= {MAX_AMOUNT}"),
        ));
    }

    if !input.down_payment_fraction.is_finite() || input.down_payment_fraction < 0.0 {
        return Err(InvalidInputError::new(
            "down_payment_fraction",
            "must be >= 0",
        ));
    }

    if input.down_payment_fraction > 1.0 {
        return Err(InvalidInputError::new(
            "down_payment_fraction",
            "down payment cannot exceed the home price",
        ));
    }

    for (field, rate) in [
        ("mortgage_rate", input.mortgage_rate),
        ("rent_growth_rate", input.rent_growth_rate),
        ("home_appreciation_rate", input.home_appreciation_rate),
        ("investment_return_rate", input.investment_return_rate),
    ] {
        if !rate.is_finite() || rate < 0.0 {
            return Err(InvalidInputError::new(field, "must be >= 0"));
        }
        if rate > MAX_ANNUAL_RATE {
            return Err(InvalidInputError::new(
                field,
                format!("must be <= {MAX_ANNUAL_RATE}"),
            ));
        }
    }

    if !input.monthly_rent.is_finite() || input.monthly_rent < 0.0 {
        return Err(InvalidInputError::new("monthly_rent", "must be >= 0"));
    }

    if input.monthly_rent > MAX_AMOUNT {
        return Err(InvalidInputError::new(
            "monthly_rent",
            format!("must be <= {MAX_AMOUNT}"),
        ));
    }

    if input.loan_term_months == 0 || input.loan_term_months > MAX_MONTHS {
        return Err(InvalidInputError::new(
            "loan_term_months",
            format!("must be between 1 and {MAX_MONTHS}"),
        ));
    }

    if input.grace_period_months > input.loan_term_months {
        return Err(InvalidInputError::new(
            "grace_period_months",
            "cannot exceed loan_term_months",
        ));
    }

    if input.horizon_months == 0 || input.horizon_months > MAX_MONTHS {
        return Err(InvalidInputError::new(
            "horizon_months",
            format!("must be between 1 and {MAX_MONTHS}"),
        ));
    }

    Ok(())
}

/// Converts an annual growth rate into the monthly rate that compounds back
/// to it after twelve months.
pub fn monthly_rate_from_annual(annual_rate: f64) -> f64 {
    (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0
}

/// Level payment that retires `principal` over `months` at `monthly_rate`.
/// A zero rate falls back to straight-line repayment; a zero-month term is due in full.
pub fn amortizing_payment(principal: f64, monthly_rate: f64, months: u32) -> f64 {
    if months == 0 {
        return principal;
    }

    if monthly_rate.abs() < 1e-12 {
        return principal / months as f64;
    }

    // Discounting form: (1+r)^-n underflows towards zero instead of overflowing.
    let discount = (1.0 + monthly_rate).powf(-f64::from(months));
    principal * monthly_rate / (1.0 - discount)
}

/// Month-by-month repayment schedule over the full loan term.
pub fn mortgage_schedule(input: &SimulationInput) -> Result<Vec<MortgageMonth>, InvalidInputError> {
    validate_input(input)?;
    Ok(build_mortgage_schedule(input))
}

fn build_mortgage_schedule(input: &SimulationInput) -> Vec<MortgageMonth> {
    let term = input.loan_term_months;
    let rate = input.monthly_mortgage_rate();
    let mut balance = input.loan_amount();
    let mut schedule = Vec::with_capacity(term as usize);

    for month in 1..=term {
        let interest = balance * rate;
        let remaining_months = term - month + 1;

        // The last month of the term always clears the balance, even when the
        // grace period covers the whole loan.
        let (payment, principal) = if remaining_months == 1 {
            (balance + interest, balance)
        } else if month <= input.grace_period_months {
            (interest, 0.0)
        } else {
            let payment = amortizing_payment(balance, rate, remaining_months);
            (payment, payment - interest)
        };

        balance = if remaining_months == 1 {
            0.0
        } else {
            balance - principal
        };

        schedule.push(MortgageMonth {
            month,
            payment,
            principal_paid: principal,
            interest_paid: interest,
            remaining_balance: balance,
        });
    }

    schedule
}

/// Portfolio value at the end of each month, growing first and then adding
/// the same contribution every month.
pub fn investment_growth(
    initial: f64,
    monthly_contribution: f64,
    monthly_return_rate: f64,
    months: u32,
) -> Vec<f64> {
    investment_growth_with(
        initial,
        std::iter::repeat_n(monthly_contribution, months as usize),
        monthly_return_rate,
    )
}

/// Like [`investment_growth`] with one contribution per month. Negative
/// contributions withdraw from the portfolio and may take it below zero.
pub fn investment_growth_with<I>(initial: f64, contributions: I, monthly_return_rate: f64) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut value = initial;
    contributions
        .into_iter()
        .map(|contribution| {
            value = value * (1.0 + monthly_return_rate) + contribution;
            value
        })
        .collect()
}

fn rent_path(input: &SimulationInput) -> Vec<f64> {
    let mut rent = input.monthly_rent;
    (1..=input.horizon_months)
        .map(|month| {
            if month > 1 && (month - 1) % 12 == 0 {
                rent *= 1.0 + input.rent_growth_rate;
            }
            rent
        })
        .collect()
}

pub fn run_comparison(input: &SimulationInput) -> Result<Comparison, InvalidInputError> {
    validate_input(input)?;
    debug!(
        home_price = input.home_price,
        loan_term_months = input.loan_term_months,
        horizon_months = input.horizon_months,
        "running buy vs rent comparison"
    );

    let horizon = input.horizon_months as usize;
    let schedule = build_mortgage_schedule(input);
    let rents = rent_path(input);
    let payments = (0..horizon)
        .map(|idx| schedule.get(idx).map_or(0.0, |m| m.payment))
        .collect::<Vec<_>>();
    let contributions = payments
        .iter()
        .zip(&rents)
        .map(|(payment, rent)| payment - rent)
        .collect::<Vec<_>>();

    let monthly_return = monthly_rate_from_annual(input.investment_return_rate);
    let invested = contributions
        .iter()
        .map(|&c| if input.invest_difference { c } else { 0.0 });
    let portfolio = investment_growth_with(input.down_payment(), invested, monthly_return);

    let monthly_appreciation = monthly_rate_from_annual(input.home_appreciation_rate);
    let mut home_value = input.home_price;
    let mut cash_savings = 0.0;
    let mut snapshots = Vec::with_capacity(horizon);

    for idx in 0..horizon {
        home_value *= 1.0 + monthly_appreciation;
        if !input.invest_difference {
            cash_savings += contributions[idx];
        }

        let remaining_principal = schedule.get(idx).map_or(0.0, |m| m.remaining_balance);
        snapshots.push(MonthlySnapshot {
            month: idx as u32 + 1,
            mortgage_payment: payments[idx],
            rent: rents[idx],
            contribution: contributions[idx],
            remaining_principal,
            home_value,
            buy_net_worth: home_value - remaining_principal,
            portfolio_value: portfolio[idx],
            cash_savings,
            rent_net_worth: portfolio[idx] + cash_savings,
        });
    }

    let summary = summarize(input, &payments, &rents, &snapshots);
    debug!(
        final_buy_net_worth = summary.final_buy_net_worth,
        final_rent_net_worth = summary.final_rent_net_worth,
        winner = ?summary.winner,
        "comparison finished"
    );

    Ok(Comparison {
        input: input.clone(),
        summary,
        snapshots,
    })
}

fn summarize(
    input: &SimulationInput,
    payments: &[f64],
    rents: &[f64],
    snapshots: &[MonthlySnapshot],
) -> ComparisonSummary {
    let loan_amount = input.loan_amount();
    let rate = input.monthly_mortgage_rate();
    let grace = input.grace_period_months;
    let term = input.loan_term_months;

    let total_mortgage_paid = payments.iter().sum::<f64>();
    let (final_buy_net_worth, final_rent_net_worth) = snapshots
        .last()
        .map_or((0.0, 0.0), |s| (s.buy_net_worth, s.rent_net_worth));
    let edge = final_buy_net_worth - final_rent_net_worth;

    ComparisonSummary {
        down_payment: input.down_payment(),
        loan_amount,
        grace_monthly_payment: if grace > 0 { loan_amount * rate } else { 0.0 },
        amortizing_monthly_payment: if grace < term {
            amortizing_payment(loan_amount, rate, term - grace)
        } else {
            0.0
        },
        total_mortgage_paid,
        total_rent_paid: rents.iter().sum(),
        buy_total_spent: input.down_payment() + total_mortgage_paid,
        final_buy_net_worth,
        final_rent_net_worth,
        winner: if edge > 0.0 {
            Strategy::Buy
        } else {
            Strategy::RentAndInvest
        },
        advantage: edge.abs(),
    }
}
