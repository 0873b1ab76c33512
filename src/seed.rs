//! Initial loans and payments a fresh store starts from.

use crate::domain::loan::Loan;
use crate::domain::payment::LoanPayment;
use crate::error::Result;
use crate::interfaces::csv::SeedReader;
use std::fs::File;
use std::path::Path;

const LOANS_FILE: &str = "loans.csv";
const PAYMENTS_FILE: &str = "loan_payments.csv";

const EMBEDDED_LOANS: &str = include_str!("../data/loans.csv");
const EMBEDDED_PAYMENTS: &str = include_str!("../data/loan_payments.csv");

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub loans: Vec<Loan>,
    pub payments: Vec<LoanPayment>,
}

impl SeedData {
    /// The seed data compiled into the binary.
    pub fn embedded() -> Result<Self> {
        Ok(Self {
            loans: SeedReader::new(EMBEDDED_LOANS.as_bytes()).read_all()?,
            payments: SeedReader::new(EMBEDDED_PAYMENTS.as_bytes()).read_all()?,
        })
    }

    /// Reads `loans.csv` and `loan_payments.csv` from `dir`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let loans = SeedReader::new(File::open(dir.join(LOANS_FILE))?).read_all()?;
        let payments = SeedReader::new(File::open(dir.join(PAYMENTS_FILE))?).read_all()?;
        Ok(Self { loans, payments })
    }
}
