use crate::core::{Comparison, MonthlySnapshot, Strategy};

const RULE_WIDTH: usize = 96;

/// Formats an amount rounded to whole units with thousands separators.
pub fn format_amount(value: f64) -> String {
    let rounded = value.abs().round() as u64;
    let digits = rounded.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0.0 && rounded > 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn format_percent(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Snapshots printed in the table: every `every` months plus the final month.
pub fn selected_snapshots(snapshots: &[MonthlySnapshot], every: u32) -> Vec<&MonthlySnapshot> {
    let every = every.max(1);
    let last_month = snapshots.last().map_or(0, |s| s.month);
    snapshots
        .iter()
        .filter(|s| s.month % every == 0 || s.month == last_month)
        .collect()
}

pub fn render_report(comparison: &Comparison, every: u32) -> String {
    let input = &comparison.input;
    let summary = &comparison.summary;
    let rule = "-".repeat(RULE_WIDTH);
    let heavy = "=".repeat(RULE_WIDTH);

    let mut lines = vec![
        heavy.clone(),
        format!(
            "  Buy with a mortgage vs rent and invest, over {} months",
            input.horizon_months
        ),
        heavy.clone(),
        format!(
            "  Home price        {:>14} | Loan term          {:>6} months",
            format_amount(input.home_price),
            input.loan_term_months
        ),
        format!(
            "  Down payment      {:>14} | Grace period       {:>6} months",
            format_amount(summary.down_payment),
            input.grace_period_months
        ),
        format!(
            "  Mortgage rate     {:>14} | Home appreciation  {:>8}/yr",
            format_percent(input.mortgage_rate),
            format_percent(input.home_appreciation_rate)
        ),
        format!(
            "  Initial rent      {:>14} | Rent growth        {:>8}/yr",
            format_amount(input.monthly_rent),
            format_percent(input.rent_growth_rate)
        ),
        format!(
            "  Investment return {:>11}/yr | Invest difference  {:>8}",
            format_percent(input.investment_return_rate),
            if input.invest_difference { "yes" } else { "no" }
        ),
        rule.clone(),
    ];

    if input.grace_period_months > 0 {
        lines.push(format!(
            "  Grace period payment (interest only): {}",
            format_amount(summary.grace_monthly_payment)
        ));
        lines.push(format!(
            "  Payment after grace period:           {}",
            format_amount(summary.amortizing_monthly_payment)
        ));
    } else {
        lines.push(format!(
            "  Monthly payment:                      {}",
            format_amount(summary.amortizing_monthly_payment)
        ));
    }
    lines.push(rule.clone());

    lines.push(format!(
        "{:>6} {:>10} {:>9} {:>13} {:>13} {:>13} {:>13} {:>13}",
        "month", "payment", "rent", "principal", "home value", "buy worth", "portfolio", "rent worth"
    ));
    lines.extend(
        selected_snapshots(&comparison.snapshots, every)
            .into_iter()
            .map(table_row),
    );
    lines.push(rule);

    lines.push(format!(
        "  Buy:  spent {} (down payment + mortgage), final net worth {}",
        format_amount(summary.buy_total_spent),
        format_amount(summary.final_buy_net_worth)
    ));
    lines.push(format!(
        "  Rent: paid {} in rent, final net worth {}",
        format_amount(summary.total_rent_paid),
        format_amount(summary.final_rent_net_worth)
    ));
    if !input.invest_difference {
        let cash = comparison.snapshots.last().map_or(0.0, |s| s.cash_savings);
        lines.push(format!("        uninvested cash {}", format_amount(cash)));
    }
    lines.push(heavy.clone());
    lines.push(summary_line(comparison));
    lines.push(heavy);
    lines.push("  Taxes, transaction costs and maintenance are not modeled.".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn table_row(snap: &MonthlySnapshot) -> String {
    format!(
        "{:>6} {:>10} {:>9} {:>13} {:>13} {:>13} {:>13} {:>13}",
        snap.month,
        format_amount(snap.mortgage_payment),
        format_amount(snap.rent),
        format_amount(snap.remaining_principal),
        format_amount(snap.home_value),
        format_amount(snap.buy_net_worth),
        format_amount(snap.portfolio_value),
        format_amount(snap.rent_net_worth),
    )
}

pub fn summary_line(comparison: &Comparison) -> String {
    let summary = &comparison.summary;
    let winner = match summary.winner {
        Strategy::Buy => "buying wins",
        Strategy::RentAndInvest => "renting and investing wins",
    };
    format!(
        "RESULT after {} months: {winner}, ending net worth higher by {}",
        comparison.input.horizon_months,
        format_amount(summary.advantage)
    )
}
