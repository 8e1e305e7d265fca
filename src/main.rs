use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use rusqlite::Connection;
use serde::Serialize;
use time::{Date, macros::format_description};

use budget_ledger::{
    CategoryName, ChangeCoordinator, Clock, DEFAULT_CURRENCY_SYMBOL, DEFAULT_TIMEZONE, Error, LedgerConfig,
    NewTransaction, Transaction, TransactionId, TransactionKind, ValidationReport,
    first_negative_balance, setup_logging,
    stores::{categories_or_default, sqlite::create_stores},
};

/// Record income and expenses without ever spending money that has not been earned yet.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the ledger's SQLite database.
    #[arg(long, env = "LEDGER_DB_PATH", default_value = "ledger.db")]
    db_path: PathBuf,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    #[arg(long, env = "LEDGER_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// The symbol shown in front of amounts.
    #[arg(long, env = "LEDGER_CURRENCY", default_value = DEFAULT_CURRENCY_SYMBOL)]
    currency: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every transaction as JSON, most recent first.
    List,
    /// Record a new transaction.
    Add {
        /// "income" or "expense".
        #[arg(long)]
        kind: TransactionKind,
        /// The amount, the sign is ignored.
        #[arg(long, allow_negative_numbers = true)]
        amount: f64,
        /// The date in YYYY-MM-DD format. Defaults to today.
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change an existing transaction. Fields that are not given keep their value.
    Edit {
        id: TransactionId,
        #[arg(long)]
        kind: Option<TransactionKind>,
        #[arg(long, allow_negative_numbers = true)]
        amount: Option<f64>,
        #[arg(long, value_parser = parse_date)]
        date: Option<Date>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Remove a transaction.
    Delete { id: TransactionId },
    /// Print the dashboard metrics as JSON.
    Summary,
    /// Check that the running balance never drops below zero.
    Check,
    /// Print the available categories as JSON.
    Categories {
        /// Add a category with this name before printing.
        #[arg(long)]
        add: Option<CategoryName>,
    },
}

/// The result of the `check` command.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceCheck {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_negative: Option<budget_ledger::DailyBalance>,
}

fn parse_date(text: &str) -> Result<Date, time::error::Parse> {
    Date::parse(text, format_description!("[year]-[month]-[day]"))
}

fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            tracing::error!("Could not serialize output: {error}");
            ExitCode::FAILURE
        }
    }
}

/// Print the report for a change that was blocked, or the error for one that failed.
fn print_failure(error: &Error, report: ValidationReport) -> ExitCode {
    if error.is_validation() {
        print_json(&report);
    } else {
        eprintln!("{}", report.message.unwrap_or_else(|| error.to_string()));
    }

    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    let args = Args::parse();

    let config = LedgerConfig::new(args.db_path)
        .local_timezone(&args.timezone)
        .currency_symbol(&args.currency);

    let clock = match config.clock() {
        Ok(clock) => clock,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let connection = match Connection::open(&config.db_path) {
        Ok(connection) => connection,
        Err(error) => {
            eprintln!("Could not open {}: {error}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let (transaction_store, category_store) = match create_stores(connection, clock) {
        Ok(stores) => stores,
        Err(error) => {
            eprintln!("{error}");
            return ExitCode::FAILURE;
        }
    };

    let today = clock.today();
    let mut ledger = ChangeCoordinator::new(transaction_store, clock, config.message_format());

    if let Err(error) = ledger.load().await {
        eprintln!("{}", error.user_message(ledger.message_format()));
        return ExitCode::FAILURE;
    }

    match args.command {
        Command::List => print_json(&ledger.transactions()),
        Command::Add {
            kind,
            amount,
            date,
            category,
            description,
        } => {
            let transaction = Transaction::build(kind, amount, date.unwrap_or(today))
                .category(&category)
                .description(&description);
            add(&mut ledger, transaction).await
        }
        Command::Edit {
            id,
            kind,
            amount,
            date,
            category,
            description,
        } => {
            let Some(mut changed) = ledger.transactions().iter().find(|t| t.id == id).cloned()
            else {
                let error = Error::TransactionNotFound(id);
                let report = ValidationReport::new(&Err(error), ledger.message_format());
                print_json(&report);
                return ExitCode::FAILURE;
            };

            if let Some(kind) = kind {
                changed.kind = kind;
            }
            if let Some(amount) = amount {
                changed.amount = amount;
            }
            if let Some(date) = date {
                changed.date = date;
            }
            if let Some(category) = category {
                changed.category = category;
            }
            if let Some(description) = description {
                changed.description = description;
            }

            let report = ledger.check_update(&changed);
            match ledger.update(changed).await {
                Ok(updated) => print_json(&updated),
                Err(error) => print_failure(&error, report),
            }
        }
        Command::Delete { id } => {
            let report = ledger.check_delete(id);
            match ledger.delete(id).await {
                Ok(()) => print_json(&report),
                Err(error) => print_failure(&error, report),
            }
        }
        Command::Summary => print_json(&ledger.metrics()),
        Command::Check => {
            let first_negative = first_negative_balance(ledger.transactions());
            let exit_code = print_json(&BalanceCheck {
                ok: first_negative.is_none(),
                first_negative,
            });

            if first_negative.is_some() {
                ExitCode::FAILURE
            } else {
                exit_code
            }
        }
        Command::Categories { add } => {
            if let Some(name) = add
                && let Err(error) = category_store.add(name)
            {
                eprintln!("{error}");
                return ExitCode::FAILURE;
            }

            print_json(&categories_or_default(&category_store).await)
        }
    }
}

async fn add<S, C>(ledger: &mut ChangeCoordinator<S, C>, transaction: NewTransaction) -> ExitCode
where
    S: budget_ledger::TransactionStore,
    C: Clock,
{
    let report = ledger.check_create(&transaction);

    match ledger.create(transaction).await {
        Ok(created) => print_json(&created),
        Err(error) => print_failure(&error, report),
    }
}
