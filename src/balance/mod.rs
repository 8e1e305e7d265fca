//! Running-balance arithmetic over a collection of transactions.
//!
//! Every function here is pure and ignores the order of its input. Inclusion is
//! decided per calendar day: a transaction dated `d` counts towards the balance
//! "as of" `d` regardless of when on that day it happened.

mod core;

pub use core::{
    DailyBalance, available_balance, cumulative_expense, cumulative_income, first_negative_balance,
    running_balances, to_cents, total_balance,
};
