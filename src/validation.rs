//! Business rules that decide whether a proposed change keeps the ledger consistent.
//!
//! The rules are:
//! - amounts must be finite and greater than zero once the sign is dropped,
//! - expenses may not be dated after today, income may be scheduled ahead,
//! - an expense may not exceed the running balance at the end of its date,
//! - an income that later expenses depend on may not be deleted if that would
//!   leave them unfunded.
//!
//! Every function is stateless: callers pass in the current transactions and
//! today's date. The checks are an advisory pre-check, the transaction store
//! remains the authority.

use serde::Serialize;
use time::Date;

use crate::{
    Error,
    balance::{cumulative_expense, cumulative_income, to_cents},
    error::{ErrorKind, MessageFormat},
    transaction::{NewTransaction, Transaction, TransactionId, TransactionKind},
};

/// The fields of a proposed transaction that the rules look at.
#[derive(Debug, Clone, Copy)]
struct Proposal {
    kind: TransactionKind,
    amount: f64,
    date: Date,
}

/// Check that `candidate` may be added to `existing`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidAmount] if the amount is zero or not a finite number,
/// - [Error::FutureExpenseNotAllowed] if an expense is dated after `today`,
/// - or [Error::InsufficientBalance] if an expense exceeds the running balance
///   at the end of its date.
pub fn validate_create(
    candidate: &NewTransaction,
    existing: &[Transaction],
    today: Date,
) -> Result<(), Error> {
    let proposal = Proposal {
        kind: candidate.kind,
        amount: candidate.amount,
        date: candidate.date,
    };

    check_proposal(proposal, existing, today, None)
}

/// Check that `original` may be replaced by `candidate`.
///
/// `existing` is expected to still contain `original`. When both are expenses
/// the original's amount is added back to the running balance, so that it is
/// not counted against the candidate that replaces it.
///
/// # Errors
/// Returns the same errors as [validate_create].
pub fn validate_update(
    candidate: &Transaction,
    original: &Transaction,
    existing: &[Transaction],
    today: Date,
) -> Result<(), Error> {
    let proposal = Proposal {
        kind: candidate.kind,
        amount: candidate.amount,
        date: candidate.date,
    };

    check_proposal(proposal, existing, today, Some(original))
}

fn check_proposal(
    proposal: Proposal,
    existing: &[Transaction],
    today: Date,
    replacing: Option<&Transaction>,
) -> Result<(), Error> {
    let amount = proposal.amount.abs();
    if !amount.is_finite() || amount <= 0.0 {
        tracing::debug!("Rejected amount {}", proposal.amount);
        return Err(Error::InvalidAmount);
    }

    if proposal.kind == TransactionKind::Income {
        return Ok(());
    }

    if proposal.date > today {
        tracing::debug!("Rejected expense dated {} after today ({today})", proposal.date);
        return Err(Error::FutureExpenseNotAllowed(proposal.date));
    }

    let check_date = proposal.date;
    let mut available =
        cumulative_income(existing, check_date) - cumulative_expense(existing, check_date);

    if let Some(original) = replacing
        && original.is_expense()
        && original.date <= check_date
    {
        available += original.magnitude();
    }

    let available_cents = to_cents(available);
    if to_cents(amount) > available_cents {
        tracing::debug!("Rejected expense of {amount} on {check_date}, {available} available");
        return Err(Error::InsufficientBalance {
            available: available_cents as f64 / 100.0,
            check_date,
        });
    }

    Ok(())
}

/// Check that `target` may be removed from `all`.
///
/// Removing an expense can only raise the running balance, so it is always
/// allowed. Removing an income is checked against the expenses dated after it,
/// but only when the income is dated on or before `today`.
///
/// Scheduled income (dated after `today`) is not checked at all, even when
/// later expenses depend on it. This is a known gap rather than a policy.
///
/// # Errors
/// Returns [Error::CascadingDeleteInvalid] if the expenses dated after an
/// income would no longer be covered once it is removed.
pub fn validate_delete(target: &Transaction, all: &[Transaction], today: Date) -> Result<(), Error> {
    if !target.is_income() {
        return Ok(());
    }

    let future_expenses: Vec<&Transaction> = all
        .iter()
        .filter(|transaction| transaction.is_expense() && transaction.date > target.date)
        .collect();

    if future_expenses.is_empty() {
        return Ok(());
    }

    if target.date > today {
        tracing::debug!(
            "Skipped dependent expense check for scheduled income {} dated {}",
            target.id,
            target.date
        );
        return Ok(());
    }

    let income_up_to_now = cumulative_income(all, today);
    let expenses_up_to_now = cumulative_expense(all, today);
    let updated_income = income_up_to_now - target.magnitude();
    let future_expense_total: f64 = future_expenses
        .iter()
        .map(|transaction| transaction.magnitude())
        .sum();

    if to_cents(updated_income - (expenses_up_to_now - future_expense_total)) < 0 {
        tracing::debug!(
            "Rejected deleting income {}, {} later expense(s) depend on it",
            target.id,
            future_expenses.len()
        );
        return Err(Error::CascadingDeleteInvalid {
            affected_expenses: future_expenses.len(),
        });
    }

    Ok(())
}

/// Extra detail about why a change was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationContext {
    /// The expense was dated after today.
    FutureExpense {
        /// The date of the rejected expense.
        date: Date,
    },
    /// The expense exceeded the running balance.
    InsufficientBalance {
        /// The running balance at the end of `check_date`.
        available: f64,
        /// The date the balance was evaluated at.
        check_date: Date,
    },
    /// The income could not be deleted.
    CascadingDelete {
        /// The number of later expenses that depend on the income.
        affected_expenses: usize,
    },
    /// The target transaction was missing.
    TransactionNotFound {
        /// The ID that was looked up.
        id: TransactionId,
    },
}

/// The outcome of a validation in the shape the presentation layer consumes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    /// Whether the change may go ahead.
    pub valid: bool,
    /// The kind of error that blocked the change.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<ErrorKind>,
    /// A message to show the user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Values the message was built from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ValidationContext>,
}

impl ValidationReport {
    /// Build a report from the result of a validation, rendering any message with `format`.
    pub fn new(result: &Result<(), Error>, format: &MessageFormat) -> Self {
        match result {
            Ok(()) => Self {
                valid: true,
                reason: None,
                message: None,
                context: None,
            },
            Err(error) => Self {
                valid: false,
                reason: Some(error.kind()),
                message: Some(error.user_message(format)),
                context: context_for(error),
            },
        }
    }
}

fn context_for(error: &Error) -> Option<ValidationContext> {
    match error {
        Error::FutureExpenseNotAllowed(date) => Some(ValidationContext::FutureExpense { date: *date }),
        Error::InsufficientBalance {
            available,
            check_date,
        } => Some(ValidationContext::InsufficientBalance {
            available: *available,
            check_date: *check_date,
        }),
        Error::CascadingDeleteInvalid { affected_expenses } => {
            Some(ValidationContext::CascadingDelete {
                affected_expenses: *affected_expenses,
            })
        }
        Error::TransactionNotFound(id) => Some(ValidationContext::TransactionNotFound { id: *id }),
        Error::InvalidAmount | Error::RemoteFailure(_) => None,
    }
}
