//! Wires stores and the loan service together from a [`Config`].

use crate::application::loan_service::LoanService;
use crate::config::{Config, DatastoreType};
use crate::domain::loan::Loan;
use crate::domain::payment::LoanPayment;
use crate::domain::ports::StoreHandle;
use crate::error::Result;
use crate::infrastructure::in_memory::InMemoryStore;
use crate::seed::SeedData;
use std::sync::Arc;
use tracing::info;

/// Builds the stores selected by `config` and a `LoanService` on top of them.
pub async fn build_loan_service(config: &Config, seed: SeedData) -> Result<LoanService> {
    let (loans, payments) = match &config.datastore {
        DatastoreType::InMemory => in_memory_stores(seed)?,
        DatastoreType::Database { url } => database_stores(url, seed).await?,
    };
    info!(datastore = %config.datastore, "stores ready");

    LoanService::new(loans, payments).await
}

fn in_memory_stores(seed: SeedData) -> Result<(StoreHandle<Loan>, StoreHandle<LoanPayment>)> {
    let loans: StoreHandle<Loan> = Arc::new(InMemoryStore::seeded(seed.loans)?);
    let payments: StoreHandle<LoanPayment> = Arc::new(InMemoryStore::seeded(seed.payments)?);
    Ok((loans, payments))
}

#[cfg(feature = "storage-rocksdb")]
async fn database_stores(
    url: &str,
    seed: SeedData,
) -> Result<(StoreHandle<Loan>, StoreHandle<LoanPayment>)> {
    use crate::infrastructure::rocksdb::{
        CF_LOANS, CF_LOANS_BY_ID, CF_PAYMENTS, CF_PAYMENTS_BY_ID, RocksDbStore, open_database,
    };

    let path = url.strip_prefix("rocksdb://").unwrap_or(url);
    let db = open_database(path)?;
    let loans: StoreHandle<Loan> = Arc::new(RocksDbStore::new(db.clone(), CF_LOANS, CF_LOANS_BY_ID)?);
    let payments: StoreHandle<LoanPayment> =
        Arc::new(RocksDbStore::new(db, CF_PAYMENTS, CF_PAYMENTS_BY_ID)?);

    // A limit of zero only counts.
    let existing = loans.get_all(None, Some(0), None).await?;
    if existing.pagination.total_items == 0 {
        info!(
            loans = seed.loans.len(),
            payments = seed.payments.len(),
            "importing seed data into empty database"
        );
        for loan in seed.loans {
            loans.add(loan).await?;
        }
        for payment in seed.payments {
            payments.add(payment).await?;
        }
    }

    Ok((loans, payments))
}

#[cfg(not(feature = "storage-rocksdb"))]
async fn database_stores(
    _url: &str,
    _seed: SeedData,
) -> Result<(StoreHandle<Loan>, StoreHandle<LoanPayment>)> {
    Err(crate::error::LoanError::Configuration(
        "DATASTORE_TYPE 'database' requires a build with the storage-rocksdb feature.".to_string(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoanError;

    #[tokio::test]
    async fn test_in_memory_service_uses_seed() {
        let seed = SeedData::embedded().unwrap();
        let loan_count = seed.loans.len();

        let service = build_loan_service(&Config::default(), seed).await.unwrap();
        let page = service.get_loans(None, Some(100), None).await.unwrap();
        assert_eq!(page.pagination.total_items, loan_count);
    }

    #[tokio::test]
    async fn test_duplicate_seed_ids_are_rejected() {
        let mut seed = SeedData::embedded().unwrap();
        let first = seed.loans[0].clone();
        seed.loans.push(first);

        let result = build_loan_service(&Config::default(), seed).await;
        assert!(matches!(result, Err(LoanError::DuplicateId(_))));
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    #[tokio::test]
    async fn test_database_without_feature_is_a_config_error() {
        let config = Config::new("database", Some("/tmp/loanbook".to_string())).unwrap();
        let result = build_loan_service(&config, SeedData::default()).await;
        assert!(matches!(result, Err(LoanError::Configuration(_))));
    }

    #[cfg(feature = "storage-rocksdb")]
    #[tokio::test]
    async fn test_database_imports_seed_once() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("rocksdb://{}", dir.path().display());
        let config = Config::new("database", Some(url)).unwrap();
        let seed = SeedData::embedded().unwrap();

        {
            let service = build_loan_service(&config, seed.clone()).await.unwrap();
            let page = service.get_loans(None, Some(100), None).await.unwrap();
            assert_eq!(page.pagination.total_items, seed.loans.len());
        }

        let service = build_loan_service(&config, seed.clone()).await.unwrap();
        let page = service.get_loans(None, Some(100), None).await.unwrap();
        assert_eq!(page.pagination.total_items, seed.loans.len());
    }
}
