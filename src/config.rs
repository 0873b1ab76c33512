use crate::error::{LoanError, Result};
use std::fmt;

/// Which backing store the process runs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatastoreType {
    /// Seed data held in process memory.
    InMemory,
    /// Persistent store at `url`.
    Database { url: String },
}

impl fmt::Display for DatastoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatastoreType::InMemory => f.write_str("in_memory"),
            DatastoreType::Database { .. } => f.write_str("database"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub datastore: DatastoreType,
}

impl Config {
    /// Validates the raw `DATASTORE_TYPE` / `DATABASE_URL` settings.
    pub fn new(datastore_type: &str, database_url: Option<String>) -> Result<Self> {
        let datastore = match datastore_type {
            "in_memory" => DatastoreType::InMemory,
            "database" => match database_url.filter(|url| !url.trim().is_empty()) {
                Some(url) => DatastoreType::Database { url },
                None => {
                    return Err(LoanError::Configuration(
                        "DATABASE_URL must be set when DATASTORE_TYPE is 'database'.".to_string(),
                    ));
                }
            },
            other => {
                return Err(LoanError::Configuration(format!(
                    "Invalid DATASTORE_TYPE: {other}. Must be 'in_memory' or 'database'."
                )));
            }
        };

        Ok(Self { datastore })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datastore: DatastoreType::InMemory,
        }
    }
}
