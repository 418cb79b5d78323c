use std::fmt::Write;

use crate::models::{Expense, MonthlySummary};

pub(crate) const NO_EXPENSES: &str = "No expenses found.";
pub(crate) const NO_MONTHLY_DATA: &str = "No data for this month.";

const LISTING_HEADER: &str = "ID | Amount | Category | Description | Date";
const SEPARATOR_WIDTH: usize = 50;

/// Render an amount as entered: shortest round-trip form, whole numbers
/// keep a trailing `.0` (`7.0`, `12.5`, `-3.25`). Magnitudes with a decimal
/// exponent below -4 or at least 16 switch to exponent form (`1e+16`,
/// `1.5e-05`).
pub(crate) fn format_amount(amount: f64) -> String {
    if !amount.is_finite() || amount == 0.0 {
        return format!("{amount:?}");
    }

    let sci = format!("{amount:e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if !(-4..16).contains(&exp) {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}e{sign}{:02}", exp.abs());
    }

    if amount.fract() == 0.0 {
        format!("{amount:.1}")
    } else {
        format!("{amount}")
    }
}

pub(crate) fn render_confirmation(expense: &Expense) -> String {
    format!(
        "Successfully added ${} under '{}'.",
        format_amount(expense.amount),
        expense.category
    )
}

pub(crate) fn render_listing(expenses: &[Expense]) -> String {
    if expenses.is_empty() {
        return NO_EXPENSES.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{LISTING_HEADER}");
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    for e in expenses {
        let _ = writeln!(
            out,
            "{} | ${} | {} | {} | {}",
            e.id,
            format_amount(e.amount),
            e.category,
            e.description,
            e.date
        );
    }
    out
}

pub(crate) fn render_summary(summary: &MonthlySummary) -> String {
    if summary.is_empty() {
        return NO_MONTHLY_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Summary for {}:", summary.month);
    for line in &summary.categories {
        let _ = writeln!(out, "- {}: ${:.2}", line.category, line.amount);
    }
    let _ = write!(out, "**Total: ${:.2}**", summary.total());
    out
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
