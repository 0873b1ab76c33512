use crate::domain::loan::{Loan, LoanFilter};
use crate::domain::pagination::Page;
use crate::domain::payment::{Amount, LoanPayment, LoanPaymentInput, LoanPaymentResponse};
use crate::domain::ports::{PaginatedStore, StoreHandle};
use crate::error::{LoanError, Result};
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const INVALID_LOAN_ID: &str = "loan_id must be a positive integer.";
const INVALID_AMOUNT: &str = "amount must be a positive number.";
const AMOUNT_OUT_OF_RANGE: &str = "amount is outside the supported range.";

/// Loan queries and the payment submission rules.
///
/// `LoanService` shares the loan and payment stores with whoever built it and
/// owns the payment id counter. The counter sits behind a mutex that also
/// covers the balance check in [`LoanService::add_loan_payment`], so the
/// scan of existing payments and the append of the new one happen as one step.
pub struct LoanService {
    loan_store: StoreHandle<Loan>,
    payment_store: StoreHandle<LoanPayment>,
    next_payment_id: Mutex<i64>,
}

impl LoanService {
    /// Creates a new `LoanService`.
    ///
    /// Scans the payment store once so new payment ids start above every
    /// id already present.
    ///
    /// # Arguments
    ///
    /// * `loan_store` - The store holding loans.
    /// * `payment_store` - The store holding loan payments.
    pub async fn new(
        loan_store: StoreHandle<Loan>,
        payment_store: StoreHandle<LoanPayment>,
    ) -> Result<Self> {
        let highest_id = payment_store
            .find_all(None)
            .await?
            .iter()
            .map(|payment| payment.id)
            .max()
            .unwrap_or(0);

        Ok(Self {
            loan_store,
            payment_store,
            next_payment_id: Mutex::new(highest_id + 1),
        })
    }

    pub async fn get_loans(
        &self,
        cursor: Option<i64>,
        limit: Option<i64>,
        filter: Option<LoanFilter>,
    ) -> Result<Page<Loan>> {
        debug!(?cursor, ?limit, ?filter, "listing loans");
        match filter.filter(|f| !f.is_empty()) {
            Some(filter) => {
                let predicate = move |loan: &Loan| filter.matches(loan);
                self.loan_store.get_all(cursor, limit, Some(&predicate)).await
            }
            None => self.loan_store.get_all(cursor, limit, None).await,
        }
    }

    pub async fn get_loan_by_id(&self, loan_id: i64) -> Result<Option<Loan>> {
        self.loan_store.get_by_id(loan_id).await
    }

    /// Lists a loan's payments with their derived status.
    ///
    /// A loan without any payments yields a single unpaid row (id `-1`) while
    /// the pagination metadata still describes the empty payment query.
    pub async fn get_loan_payments(
        &self,
        loan_id: i64,
        cursor: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Page<LoanPaymentResponse>> {
        let Some(loan) = self.get_loan_by_id(loan_id).await? else {
            return Ok(Page::empty());
        };

        let for_loan = move |payment: &LoanPayment| payment.loan_id == loan_id;
        let page = self
            .payment_store
            .get_all(cursor, limit, Some(&for_loan))
            .await?;

        if page.pagination.total_items == 0 {
            return Ok(Page {
                items: vec![LoanPaymentResponse::unpaid(&loan)],
                pagination: page.pagination,
            });
        }

        Ok(page.map(|payment| LoanPaymentResponse::from_payment(&loan, payment)))
    }

    /// Checks the shape of a raw payment request.
    ///
    /// Only field presence, type and sign are checked here. Whether the loan
    /// exists or can take the payment is decided by [`Self::add_loan_payment`].
    pub fn validate_and_format_loan_payment_request(&self, raw: &Value) -> Result<LoanPaymentInput> {
        let loan_id = raw
            .get("loan_id")
            .and_then(Value::as_i64)
            .filter(|id| *id > 0)
            .ok_or_else(|| LoanError::Validation(INVALID_LOAN_ID.to_string()))?;

        let amount = decimal_from_json(raw.get("amount").unwrap_or(&Value::Null))?;

        Ok(LoanPaymentInput {
            loan_id,
            amount: Amount::new(amount)?,
        })
    }

    /// Records a payment dated today, unless it would push the loan's
    /// cumulative payments past principal plus interest.
    pub async fn add_loan_payment(&self, input: LoanPaymentInput) -> Result<LoanPayment> {
        let loan = self
            .get_loan_by_id(input.loan_id)
            .await?
            .ok_or(LoanError::NotFound {
                loan_id: input.loan_id,
            })?;

        let mut next_payment_id = self.next_payment_id.lock().await;

        let total_due = loan.total_due();
        // TODO: keep a running total per loan once payment volume makes this scan costly
        let already_paid = self.total_paid(loan.id).await?;
        let attempted = input.amount.value();

        if already_paid + attempted > total_due {
            warn!(
                loan_id = loan.id,
                %total_due, %already_paid, %attempted,
                "rejected payment exceeding amount due"
            );
            return Err(LoanError::Overpayment {
                loan_id: loan.id,
                total_due,
                already_paid,
                attempted,
            });
        }

        let payment = LoanPayment {
            id: *next_payment_id,
            loan_id: loan.id,
            payment_date: Some(today()),
            amount: attempted,
        };
        let payment = self.payment_store.add(payment).await?;
        *next_payment_id += 1;

        info!(payment_id = payment.id, loan_id = loan.id, amount = %attempted, "recorded payment");
        Ok(payment)
    }

    async fn total_paid(&self, loan_id: i64) -> Result<Decimal> {
        let for_loan = move |payment: &LoanPayment| payment.loan_id == loan_id;
        let payments = self.payment_store.find_all(Some(&for_loan)).await?;
        Ok(payments.iter().map(|payment| payment.amount).sum())
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Accepts JSON integers and decimals. Strings and booleans are rejected, as
/// are positive numbers too large or too precise for a `Decimal`.
fn decimal_from_json(value: &Value) -> Result<Decimal> {
    let Value::Number(number) = value else {
        return Err(LoanError::Validation(INVALID_AMOUNT.to_string()));
    };
    if let Some(n) = number.as_i64() {
        return Ok(Decimal::from(n));
    }
    if let Some(n) = number.as_u64() {
        return Ok(Decimal::from(n));
    }
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| {
            let message = match number.as_f64() {
                Some(n) if n > 0.0 => AMOUNT_OUT_OF_RANGE,
                _ => INVALID_AMOUNT,
            };
            LoanError::Validation(message.to_string())
        })
}
