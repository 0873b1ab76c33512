//! Application layer containing the loan business rules.
//!
//! `LoanService` sits between the transports and the stores: it turns loan
//! filters into store predicates, derives payment statuses and guards
//! payment submission against overpaying a loan.

pub mod loan_service;
