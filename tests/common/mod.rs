#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use loanbook::application::loan_service::LoanService;
use loanbook::domain::loan::{Loan, LoanFilter};
use loanbook::domain::payment::LoanPayment;
use loanbook::infrastructure::in_memory::InMemoryStore;
use rand::Rng;
use rust_decimal::Decimal;
use std::sync::Arc;

const NAMES: [&str; 8] = [
    "Tom's Loan",
    "Chris Wailaka",
    "NP Mobile Money",
    "Esther's Autoparts",
    "Amina's Bakery",
    "Kofi Logistics",
    "Sunrise Salon",
    "Green Valley Farms",
];

pub fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
}

pub fn loan(id: i64, interest_rate: Decimal, principal: Decimal) -> Loan {
    Loan {
        id,
        name: format!("Loan {id}"),
        interest_rate,
        principal,
        due_date: base_date(),
    }
}

/// A loan with random name, rate (1-15%), principal (1000-100000) and due date.
pub fn random_loan(rng: &mut impl Rng, id: i64) -> Loan {
    Loan {
        id,
        name: NAMES[rng.gen_range(0..NAMES.len())].to_string(),
        interest_rate: Decimal::new(rng.gen_range(100..=1500), 2),
        principal: Decimal::new(rng.gen_range(100_000..=10_000_000), 2),
        due_date: base_date() + Duration::days(rng.gen_range(0..365)),
    }
}

/// A filter where each field is present about half of the time.
pub fn random_filter(rng: &mut impl Rng) -> LoanFilter {
    LoanFilter {
        name: rng
            .gen_bool(0.5)
            .then(|| ["loan", "ESTHER", "a", "money", "zzz"][rng.gen_range(0..5)].to_string()),
        interest_rate: rng.gen_bool(0.5).then(|| Decimal::new(rng.gen_range(100..=1500), 2)),
        principal: rng
            .gen_bool(0.5)
            .then(|| Decimal::new(rng.gen_range(100_000..=10_000_000), 2)),
        due_date: rng
            .gen_bool(0.5)
            .then(|| base_date() + Duration::days(rng.gen_range(0..365))),
    }
}

pub async fn service_with(loans: Vec<Loan>, payments: Vec<LoanPayment>) -> LoanService {
    let loans = InMemoryStore::seeded(loans).unwrap();
    let payments = InMemoryStore::seeded(payments).unwrap();
    LoanService::new(Arc::new(loans), Arc::new(payments))
        .await
        .unwrap()
}
