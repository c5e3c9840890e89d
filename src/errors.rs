use thiserror::Error;

use crate::decimal::Money;
use crate::types::{LoanId, LoanState};

#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("loan not found: {id}")]
    NotFound {
        id: LoanId,
    },

    #[error("invalid state transition: cannot move from {from} to {to}")]
    InvalidTransition {
        from: LoanState,
        to: LoanState,
    },

    #[error("invalid state: current {current}, expected {expected}")]
    InvalidState {
        current: LoanState,
        expected: String,
    },

    #[error("validation failed: {message}")]
    ValidationFailure {
        message: String,
    },

    #[error("investment exceeds loan principal: principal {principal}, invested {total_invested}, requested {requested}")]
    OverInvestment {
        principal: Money,
        total_invested: Money,
        requested: Money,
    },

    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl LifecycleError {
    /// map a fetch failure, keeping a miss distinct from other store errors
    pub(crate) fn from_fetch(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id } => LifecycleError::NotFound { id },
            other => LifecycleError::StoreFailure(other),
        }
    }
}

/// errors raised by a loan store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("loan not found in store: {id}")]
    NotFound {
        id: LoanId,
    },

    #[error("version conflict on loan {id}: expected {expected}, found {found}")]
    VersionConflict {
        id: LoanId,
        expected: u64,
        found: u64,
    },

    #[error("store unavailable: {message}")]
    Unavailable {
        message: String,
    },
}

/// error raised by a notifier, never surfaced to lifecycle callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to notify investor {investor_id}: {message}")]
pub struct NotifyError {
    pub investor_id: String,
    pub message: String,
}

pub type Result<T> = std::result::Result<T, LifecycleError>;
