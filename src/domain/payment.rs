use super::loan::Loan;
use super::ports::Identifiable;
use crate::error::LoanError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Id of the synthesized row returned for loans without payment history.
pub const UNPAID_SENTINEL_ID: i64 = -1;

/// Represents a positive monetary amount for a new payment. Only
/// [`Amount::new`] builds one.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self, LoanError> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(LoanError::Validation(
                "amount must be a positive number.".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// A recorded payment. `payment_date` is `None` while the payment is outstanding.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LoanPayment {
    pub id: i64,
    pub loan_id: i64,
    pub payment_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

impl Identifiable for LoanPayment {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A validated payment request, not yet checked against the loan balance.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LoanPaymentInput {
    pub loan_id: i64,
    pub amount: Amount,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    OnTime,
    Late,
    Defaulted,
    Unpaid,
}

impl PaymentStatus {
    /// Classifies a payment by how many days after the due date it was made.
    ///
    /// Up to 5 days late (or early) is on time, 6 to 30 is late and anything
    /// beyond that defaulted. No payment date means unpaid.
    pub fn classify(due_date: NaiveDate, payment_date: Option<NaiveDate>) -> Self {
        let Some(payment_date) = payment_date else {
            return PaymentStatus::Unpaid;
        };

        let days_late = (payment_date - due_date).num_days();
        match days_late {
            ..=5 => PaymentStatus::OnTime,
            6..=30 => PaymentStatus::Late,
            _ => PaymentStatus::Defaulted,
        }
    }
}

/// A payment row enriched with a snapshot of its loan and a derived status.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LoanPaymentResponse {
    pub id: i64,
    pub loan_id: i64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub principal: Decimal,
    pub due_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub status: PaymentStatus,
}

impl LoanPaymentResponse {
    pub fn from_payment(loan: &Loan, payment: LoanPayment) -> Self {
        Self {
            id: payment.id,
            loan_id: loan.id,
            name: loan.name.clone(),
            interest_rate: loan.interest_rate,
            principal: loan.principal,
            due_date: loan.due_date,
            status: PaymentStatus::classify(loan.due_date, payment.payment_date),
            payment_date: payment.payment_date,
            amount: payment.amount,
        }
    }

    /// The "no payment yet" row shown for a loan without any payments.
    pub fn unpaid(loan: &Loan) -> Self {
        Self {
            id: UNPAID_SENTINEL_ID,
            loan_id: loan.id,
            name: loan.name.clone(),
            interest_rate: loan.interest_rate,
            principal: loan.principal,
            due_date: loan.due_date,
            payment_date: None,
            amount: Decimal::ZERO,
            status: PaymentStatus::Unpaid,
        }
    }
}
