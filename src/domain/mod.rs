//! Entity model and the storage port the application layer depends on.

pub mod loan;
pub mod pagination;
pub mod payment;
pub mod ports;
