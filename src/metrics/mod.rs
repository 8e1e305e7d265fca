//! Derived dashboard figures: balance, this month against last month, the
//! six-month expense trend and the category breakdown of this month's spending.

mod aggregation;

use serde::Serialize;
use time::Date;

use crate::{balance::total_balance, transaction::Transaction};

use aggregation::{
    category_shares, month_start, monthly_expenses, percent_change, previous_month,
    round_to_cents, summarize_month, trailing_months,
};

/// The number of months in the expense trend, including the current month.
pub const TREND_MONTHS: usize = 6;

/// Income, expenses and savings for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    /// The first day of the month.
    pub month: Date,
    /// Sum of income magnitudes in the month.
    pub income: f64,
    /// Sum of expense magnitudes in the month.
    pub expenses: f64,
    /// `income - expenses`.
    pub savings: f64,
}

impl MonthSummary {
    fn rounded(self) -> Self {
        Self {
            month: self.month,
            income: round_to_cents(self.income),
            expenses: round_to_cents(self.expenses),
            savings: round_to_cents(self.savings),
        }
    }
}

/// Percentage changes from the previous month to the current month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthOverMonth {
    /// Change in income, in percent.
    pub income: f64,
    /// Change in expenses, in percent.
    pub expenses: f64,
    /// Change in savings, in percent.
    pub savings: f64,
}

/// Total expenses for one month of the trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// The first day of the month.
    pub month: Date,
    /// Three-letter month name, e.g. "Mar".
    pub label: String,
    /// Sum of expense magnitudes in the month.
    pub amount: f64,
}

/// A category's portion of the current month's expenses.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    /// The category name.
    pub category: String,
    /// Sum of the category's expense magnitudes this month.
    pub amount: f64,
    /// The share of this month's expenses, in percent to one decimal place.
    pub percent: f64,
}

/// Everything the dashboard shows, derived from the transaction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Income minus expenses over every transaction, scheduled income included.
    pub total_balance: f64,
    /// Totals for the month containing today.
    pub current_month: MonthSummary,
    /// Totals for the month before.
    pub previous_month: MonthSummary,
    /// Percentage change between the two months.
    pub changes: MonthOverMonth,
    /// Expenses per month, oldest first, ending with the current month.
    pub monthly_expenses: Vec<MonthlyTotal>,
    /// The current month's expenses by category, largest first.
    pub category_shares: Vec<CategoryShare>,
}

/// Derive the dashboard metrics from `transactions` as of `today`.
///
/// Monetary figures are rounded to cents and percentages to one decimal place.
/// An empty list yields zero totals and a trend of zero-valued months.
pub fn derive_metrics(transactions: &[Transaction], today: Date) -> Metrics {
    let current = month_start(today);
    let previous = previous_month(current);

    let current_month = summarize_month(transactions, current).rounded();
    let previous_month = summarize_month(transactions, previous);

    let changes = MonthOverMonth {
        income: percent_change(current_month.income, previous_month.income),
        expenses: percent_change(current_month.expenses, previous_month.expenses),
        savings: percent_change(current_month.savings, previous_month.savings),
    };

    let months = trailing_months(today, TREND_MONTHS);

    Metrics {
        total_balance: round_to_cents(total_balance(transactions)),
        current_month,
        previous_month: previous_month.rounded(),
        changes,
        monthly_expenses: monthly_expenses(transactions, &months),
        category_shares: category_shares(transactions, current),
    }
}
