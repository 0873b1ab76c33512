use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use loanbook::application::loan_service::LoanService;
use loanbook::bootstrap::build_loan_service;
use loanbook::config::Config;
use loanbook::domain::loan::LoanFilter;
use loanbook::interfaces::http;
use loanbook::seed::SeedData;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Backing store: `in_memory` or `database`.
    #[arg(long, env = "DATASTORE_TYPE", default_value = "in_memory")]
    datastore_type: String,

    /// Location of the persistent store. Required for `database`.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Directory holding `loans.csv` and `loan_payments.csv`. Defaults to the built-in seed.
    #[arg(long, env = "SEED_DIR")]
    seed_dir: Option<PathBuf>,

    /// Address the HTTP API listens on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:5432")]
    bind: SocketAddr,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// List loans
    Loans {
        #[arg(long)]
        cursor: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
        /// Case-insensitive part of the loan name
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        max_interest_rate: Option<Decimal>,
        #[arg(long)]
        max_principal: Option<Decimal>,
        /// Only loans due on or before this date (YYYY-MM-DD)
        #[arg(long)]
        due_by: Option<NaiveDate>,
    },
    /// Show a single loan
    Loan { id: i64 },
    /// List a loan's payments with their status
    Payments {
        loan_id: i64,
        #[arg(long)]
        cursor: Option<i64>,
        #[arg(long)]
        limit: Option<i64>,
    },
    /// Submit a payment given as JSON, e.g. '{"loan_id": 1, "amount": 100}'
    Pay { payload: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Overpayment messages carry several figures; keep them on one line.
    miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().width(200).build())
    }))
    .into_diagnostic()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::new(&cli.datastore_type, cli.database_url)?;
    let seed = match &cli.seed_dir {
        Some(dir) => SeedData::from_dir(dir)?,
        None => SeedData::embedded()?,
    };
    let service = build_loan_service(&config, seed).await?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(service, cli.bind).await,
        Command::Loans {
            cursor,
            limit,
            name,
            max_interest_rate,
            max_principal,
            due_by,
        } => {
            let filter = LoanFilter {
                name,
                interest_rate: max_interest_rate,
                principal: max_principal,
                due_date: due_by,
            };
            print_json(&service.get_loans(cursor, limit, Some(filter)).await?)
        }
        Command::Loan { id } => match service.get_loan_by_id(id).await? {
            Some(loan) => print_json(&loan),
            None => Err(loanbook::error::LoanError::NotFound { loan_id: id }.into()),
        },
        Command::Payments {
            loan_id,
            cursor,
            limit,
        } => print_json(&service.get_loan_payments(loan_id, cursor, limit).await?),
        Command::Pay { payload } => {
            let raw: serde_json::Value = serde_json::from_str(&payload).into_diagnostic()?;
            let input = service.validate_and_format_loan_payment_request(&raw)?;
            print_json(&service.add_loan_payment(input).await?)
        }
    }
}

async fn serve(service: LoanService, bind: SocketAddr) -> Result<()> {
    let app = http::router(Arc::new(service));
    let listener = tokio::net::TcpListener::bind(bind).await.into_diagnostic()?;
    tracing::info!(%bind, "listening");
    axum::serve(listener, app).await.into_diagnostic()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
