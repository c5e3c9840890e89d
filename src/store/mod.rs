mod memory;

pub use memory::InMemoryStore;

use std::sync::Arc;

use crate::errors::StoreError;
use crate::state::{Loan, NewLoan};
use crate::types::LoanId;

/// storage backend for loans
pub trait LoanStore: Send + Sync {
    /// assign identity and timestamps, always stored as `Proposed`
    fn create(&self, new_loan: NewLoan) -> Result<Loan, StoreError>;

    fn fetch(&self, id: &LoanId) -> Result<Loan, StoreError>;

    /// persist a fetched copy; stale versions fail with `VersionConflict`, unknown ids are never inserted
    fn update(&self, loan: &Loan) -> Result<Loan, StoreError>;

    /// all loans, oldest first
    fn list(&self) -> Result<Vec<Loan>, StoreError>;
}

impl<S: LoanStore + ?Sized> LoanStore for Arc<S> {
    fn create(&self, new_loan: NewLoan) -> Result<Loan, StoreError> {
        (**self).create(new_loan)
    }

    fn fetch(&self, id: &LoanId) -> Result<Loan, StoreError> {
        (**self).fetch(id)
    }

    fn update(&self, loan: &Loan) -> Result<Loan, StoreError> {
        (**self).update(loan)
    }

    fn list(&self) -> Result<Vec<Loan>, StoreError> {
        (**self).list()
    }
}
