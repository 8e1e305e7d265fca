use serde::Serialize;
use time::Date;

use crate::transaction::{Transaction, TransactionKind};

/// The running balance at the end of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyBalance {
    /// The day the balance was evaluated at.
    pub date: Date,
    /// Cumulative income minus cumulative expenses up to and including `date`.
    pub balance: f64,
}

/// Convert an amount to whole cents.
///
/// Balances are compared in cents so that sums such as `0.3 - 0.1` equal the
/// amount shown to the user.
pub fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Sum of all income dated on or before `as_of`.
pub fn cumulative_income(transactions: &[Transaction], as_of: Date) -> f64 {
    cumulative_total(transactions, TransactionKind::Income, as_of)
}

/// Sum of all expenses dated on or before `as_of`.
pub fn cumulative_expense(transactions: &[Transaction], as_of: Date) -> f64 {
    cumulative_total(transactions, TransactionKind::Expense, as_of)
}

/// The running balance at the end of `as_of`.
pub fn available_balance(transactions: &[Transaction], as_of: Date) -> f64 {
    cumulative_income(transactions, as_of) - cumulative_expense(transactions, as_of)
}

/// All-time income minus all-time expenses, including scheduled income.
pub fn total_balance(transactions: &[Transaction]) -> f64 {
    available_balance(transactions, Date::MAX)
}

fn cumulative_total(transactions: &[Transaction], kind: TransactionKind, as_of: Date) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == kind && transaction.date <= as_of)
        .map(Transaction::magnitude)
        .sum()
}

/// The running balance at the end of each day that has at least one transaction,
/// oldest first.
///
/// The balance only changes on those days, so this series covers every date.
pub fn running_balances(transactions: &[Transaction]) -> Vec<DailyBalance> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|transaction| transaction.date);

    let mut balances: Vec<DailyBalance> = Vec::new();
    let mut running = 0.0;

    for transaction in sorted {
        running += match transaction.kind {
            TransactionKind::Income => transaction.magnitude(),
            TransactionKind::Expense => -transaction.magnitude(),
        };

        match balances.last_mut() {
            Some(current) if current.date == transaction.date => current.balance = running,
            _ => balances.push(DailyBalance {
                date: transaction.date,
                balance: running,
            }),
        }
    }

    balances
}

/// The earliest day on which the running balance drops below zero, if any.
pub fn first_negative_balance(transactions: &[Transaction]) -> Option<DailyBalance> {
    running_balances(transactions)
        .into_iter()
        .find(|daily| daily.balance < 0.0)
}
