use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum LoanError {
    #[error("{0}")]
    #[diagnostic(code(loanbook::validation))]
    Validation(String),

    #[error("Loan with id {loan_id} does not exist.")]
    #[diagnostic(code(loanbook::not_found))]
    NotFound { loan_id: i64 },

    #[error(
        "Payment exceeds total amount due for loan id {}. Total due: {}, already paid: {}, attempted payment: {}.",
        .loan_id,
        normalized(.total_due),
        normalized(.already_paid),
        normalized(.attempted)
    )]
    #[diagnostic(
        code(loanbook::overpayment),
        help("the sum of all payments on a loan may not exceed principal plus interest")
    )]
    Overpayment {
        loan_id: i64,
        total_due: Decimal,
        already_paid: Decimal,
        attempted: Decimal,
    },

    #[error("Item with id {0} already exists.")]
    #[diagnostic(code(loanbook::duplicate_id))]
    DuplicateId(i64),

    #[error("{0}")]
    #[diagnostic(code(loanbook::config))]
    Configuration(String),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl LoanError {
    /// Failures caused by the request itself rather than by the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            LoanError::Validation(_) | LoanError::NotFound { .. } | LoanError::Overpayment { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;

/// Drops trailing zeros so `550.00` prints as `550`.
fn normalized(value: &Decimal) -> Decimal {
    value.normalize()
}
