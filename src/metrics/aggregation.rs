//! Calendar-month bucketing and the arithmetic behind the dashboard figures.

use std::collections::HashMap;

use time::{Date, Duration, Month};

use crate::{
    balance::to_cents,
    metrics::{CategoryShare, MonthSummary, MonthlyTotal},
    transaction::{Transaction, TransactionKind},
};

/// The label used for expenses with a blank category.
pub(super) const UNCATEGORISED_LABEL: &str = "Other";

/// The first day of the month `date` falls in.
pub(super) fn month_start(date: Date) -> Date {
    date.replace_day(1).expect("every month has a first day")
}

/// The first day of the month before the one starting at `month`.
pub(super) fn previous_month(month: Date) -> Date {
    month_start(month_start(month) - Duration::days(1))
}

/// The first day of each of the `count` months up to and including the month
/// of `today`, oldest first.
pub(super) fn trailing_months(today: Date, count: usize) -> Vec<Date> {
    let mut months = Vec::with_capacity(count);
    let mut month = month_start(today);

    for _ in 0..count {
        months.push(month);
        month = previous_month(month);
    }

    months.reverse();
    months
}

/// Formats a month as a three-letter abbreviation, e.g. "Jan".
pub(super) fn month_label(date: Date) -> &'static str {
    match date.month() {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

fn in_month(transaction: &Transaction, month: Date) -> bool {
    transaction.date.year() == month.year() && transaction.date.month() == month.month()
}

fn month_total(transactions: &[Transaction], kind: TransactionKind, month: Date) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind && in_month(transaction, month))
        .map(Transaction::magnitude)
        .sum()
}

/// Income, expenses and savings for the month starting at `month`, unrounded.
pub(super) fn summarize_month(transactions: &[Transaction], month: Date) -> MonthSummary {
    let income = month_total(transactions, TransactionKind::Income, month);
    let expenses = month_total(transactions, TransactionKind::Expense, month);

    MonthSummary {
        month,
        income,
        expenses,
        savings: income - expenses,
    }
}

/// Total expenses for each month in `months`. Months without expenses are zero.
pub(super) fn monthly_expenses(transactions: &[Transaction], months: &[Date]) -> Vec<MonthlyTotal> {
    months
        .iter()
        .map(|&month| MonthlyTotal {
            month,
            label: month_label(month).to_owned(),
            amount: round_to_cents(month_total(transactions, TransactionKind::Expense, month)),
        })
        .collect()
}

/// Each category's share of the expenses in the month starting at `month`,
/// largest share first.
pub(super) fn category_shares(transactions: &[Transaction], month: Date) -> Vec<CategoryShare> {
    let mut totals: HashMap<&str, f64> = HashMap::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.is_expense() && in_month(transaction, month))
    {
        let category = match transaction.category.trim() {
            "" => UNCATEGORISED_LABEL,
            category => category,
        };
        *totals.entry(category).or_insert(0.0) += transaction.magnitude();
    }

    let month_expenses: f64 = totals.values().sum();
    if month_expenses <= 0.0 {
        return Vec::new();
    }

    let mut shares: Vec<CategoryShare> = totals
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_owned(),
            amount: round_to_cents(amount),
            percent: round_to_tenths(100.0 * amount / month_expenses),
        })
        .collect();

    shares.sort_by(|a, b| {
        b.percent
            .total_cmp(&a.percent)
            .then_with(|| a.category.cmp(&b.category))
    });

    shares
}

/// Percentage change from `previous` to `current`, to one decimal place.
///
/// When `previous` is zero the change is 100 if `current` is positive, otherwise 0.
pub(super) fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }

    round_to_tenths(100.0 * (current - previous) / previous)
}

pub(super) fn round_to_cents(value: f64) -> f64 {
    to_cents(value) as f64 / 100.0
}

fn round_to_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use time::{Date, macros::date};

    use super::{
        UNCATEGORISED_LABEL, category_shares, month_label, monthly_expenses, percent_change,
        previous_month, summarize_month, trailing_months,
    };
    use crate::transaction::{Transaction, TransactionKind};

    fn create_test_transaction(
        kind: TransactionKind,
        amount: f64,
        date: Date,
        category: &str,
    ) -> Transaction {
        Transaction::build(kind, amount, date)
            .category(category)
            .with_id(0)
    }

    #[test]
    fn previous_month_wraps_to_december() {
        assert_eq!(previous_month(date!(2024 - 01 - 01)), date!(2023 - 12 - 01));
        assert_eq!(previous_month(date!(2024 - 03 - 31)), date!(2024 - 02 - 01));
    }

    #[test]
    fn trailing_months_are_oldest_first_and_include_current() {
        let months = trailing_months(date!(2024 - 02 - 29), 6);

        assert_eq!(
            months,
            vec![
                date!(2023 - 09 - 01),
                date!(2023 - 10 - 01),
                date!(2023 - 11 - 01),
                date!(2023 - 12 - 01),
                date!(2024 - 01 - 01),
                date!(2024 - 02 - 01),
            ]
        );
    }

    #[test]
    fn month_label_creates_three_letter_abbreviations() {
        let labels: Vec<_> = [
            date!(2024 - 01 - 01),
            date!(2024 - 02 - 01),
            date!(2024 - 12 - 01),
        ]
        .into_iter()
        .map(month_label)
        .collect();

        assert_eq!(labels, vec!["Jan", "Feb", "Dec"]);
    }

    #[test]
    fn summarize_month_matches_month_and_year() {
        let transactions = vec![
            create_test_transaction(TransactionKind::Income, 1000.0, date!(2024 - 03 - 01), "Salary"),
            create_test_transaction(TransactionKind::Expense, -250.0, date!(2024 - 03 - 31), "Rent"),
            create_test_transaction(TransactionKind::Expense, 99.0, date!(2023 - 03 - 15), "Rent"),
            create_test_transaction(TransactionKind::Income, 5.0, date!(2024 - 04 - 01), "Gift"),
        ];

        let summary = summarize_month(&transactions, date!(2024 - 03 - 01));

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.expenses, 250.0);
        assert_eq!(summary.savings, 750.0);
    }

    #[test]
    fn monthly_expenses_reports_zero_for_empty_months() {
        let transactions = vec![
            create_test_transaction(TransactionKind::Expense, 100.0, date!(2024 - 01 - 15), "Food"),
            create_test_transaction(TransactionKind::Expense, 50.0, date!(2024 - 01 - 20), "Food"),
            create_test_transaction(TransactionKind::Income, 500.0, date!(2024 - 02 - 10), "Pay"),
        ];
        let months = vec![date!(2024 - 01 - 01), date!(2024 - 02 - 01)];

        let result = monthly_expenses(&transactions, &months);

        assert_eq!(result.len(), 2);
        assert_eq!(result[0].amount, 150.0);
        assert_eq!(result[0].label, "Jan");
        assert_eq!(result[1].amount, 0.0);
        assert_eq!(result[1].label, "Feb");
    }

    #[test]
    fn category_shares_are_sorted_and_rounded() {
        let month = date!(2024 - 01 - 01);
        let transactions = vec![
            create_test_transaction(TransactionKind::Expense, 10.0, date!(2024 - 01 - 02), "Food"),
            create_test_transaction(TransactionKind::Expense, 20.0, date!(2024 - 01 - 03), "Rent"),
            create_test_transaction(TransactionKind::Expense, 0.0, date!(2024 - 01 - 03), "Rent"),
            create_test_transaction(TransactionKind::Income, 90.0, date!(2024 - 01 - 03), "Pay"),
            create_test_transaction(TransactionKind::Expense, 70.0, date!(2023 - 12 - 31), "Food"),
        ];

        let shares = category_shares(&transactions, month);

        assert_eq!(shares.len(), 2);
        assert_eq!(shares[0].category, "Rent");
        assert_eq!(shares[0].percent, 66.7);
        assert_eq!(shares[0].amount, 20.0);
        assert_eq!(shares[1].category, "Food");
        assert_eq!(shares[1].percent, 33.3);
    }

    #[test]
    fn blank_categories_are_grouped_as_other() {
        let transactions = vec![
            create_test_transaction(TransactionKind::Expense, 10.0, date!(2024 - 01 - 02), ""),
            create_test_transaction(TransactionKind::Expense, 10.0, date!(2024 - 01 - 02), "  "),
        ];

        let shares = category_shares(&transactions, date!(2024 - 01 - 01));

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].category, UNCATEGORISED_LABEL);
        assert_eq!(shares[0].percent, 100.0);
    }

    #[test]
    fn category_shares_empty_without_expenses() {
        let transactions = vec![create_test_transaction(
            TransactionKind::Income,
            10.0,
            date!(2024 - 01 - 02),
            "Pay",
        )];

        assert!(category_shares(&transactions, date!(2024 - 01 - 01)).is_empty());
    }

    #[test]
    fn percent_change_handles_zero_previous() {
        assert_eq!(percent_change(50.0, 0.0), 100.0);
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        assert_eq!(percent_change(-20.0, 0.0), 0.0);
    }

    #[test]
    fn percent_change_rounds_to_one_decimal() {
        assert_eq!(percent_change(150.0, 100.0), 50.0);
        assert_eq!(percent_change(100.0, 300.0), -66.7);
    }
}
