use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::debug;
use uuid::Uuid;

use super::LoanStore;
use crate::errors::StoreError;
use crate::state::{Loan, NewLoan};
use crate::types::LoanId;

/// in-memory loan store, versions checked under the entry's shard lock
pub struct InMemoryStore {
    loans: DashMap<LoanId, Loan>,
    time: Arc<SafeTimeProvider>,
}

impl InMemoryStore {
    pub fn new(time: Arc<SafeTimeProvider>) -> Self {
        Self {
            loans: DashMap::new(),
            time,
        }
    }

    /// store stamped with wall-clock time
    pub fn with_system_time() -> Self {
        Self::new(Arc::new(SafeTimeProvider::new(TimeSource::System)))
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::with_system_time()
    }
}

impl LoanStore for InMemoryStore {
    fn create(&self, new_loan: NewLoan) -> Result<Loan, StoreError> {
        let mut id = Uuid::new_v4();
        while self.loans.contains_key(&id) {
            id = Uuid::new_v4();
        }

        let loan = Loan::proposed(new_loan, id, self.time.now());
        self.loans.insert(id, loan.clone());
        debug!(loan_id = %id, borrower_id = %loan.borrower_id, "loan stored");
        Ok(loan)
    }

    fn fetch(&self, id: &LoanId) -> Result<Loan, StoreError> {
        self.loans
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or(StoreError::NotFound { id: *id })
    }

    fn update(&self, loan: &Loan) -> Result<Loan, StoreError> {
        match self.loans.entry(loan.id) {
            Entry::Vacant(_) => Err(StoreError::NotFound { id: loan.id }),
            Entry::Occupied(mut entry) => {
                let stored = entry.get();
                if stored.version != loan.version {
                    return Err(StoreError::VersionConflict {
                        id: loan.id,
                        expected: loan.version,
                        found: stored.version,
                    });
                }

                let mut updated = loan.clone();
                // identity and creation time belong to the store
                updated.created_at = stored.created_at;
                updated.updated_at = self.time.now().max(stored.updated_at);
                updated.version = stored.version + 1;

                entry.insert(updated.clone());
                debug!(loan_id = %loan.id, version = updated.version, "loan updated");
                Ok(updated)
            }
        }
    }

    fn list(&self) -> Result<Vec<Loan>, StoreError> {
        let mut loans: Vec<Loan> = self.loans.iter().map(|entry| entry.value().clone()).collect();
        loans.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(loans)
    }
}
