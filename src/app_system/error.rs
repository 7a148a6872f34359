use thiserror::Error;

use crate::error::{CatalogError, LedgerError};

#[derive(Debug, Error)]
pub enum SystemError {
    #[error("actor task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
