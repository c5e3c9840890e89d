use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::config::LifecycleConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LifecycleError, Result};
use crate::notifier::Notifier;
use crate::state::{Loan, NewLoan};
use crate::store::LoanStore;
use crate::transition::validate_transition;
use crate::types::{Approval, Disbursement, Investor, LoanId, LoanState};

/// drives loans from proposal to disbursement; mutations on one loan are serialized by a per-loan lock
pub struct LifecycleService<S, N> {
    store: S,
    notifier: N,
    config: LifecycleConfig,
    locks: DashMap<LoanId, Arc<Mutex<()>>>,
}

impl<S: LoanStore, N: Notifier> LifecycleService<S, N> {
    /// create service with default configuration
    pub fn new(store: S, notifier: N) -> Self {
        Self::with_config(store, notifier, LifecycleConfig::default())
    }

    pub fn with_config(store: S, notifier: N, config: LifecycleConfig) -> Self {
        Self {
            store,
            notifier,
            config,
            locks: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    /// propose a new loan
    pub fn create_loan(
        &self,
        borrower_id: impl Into<String>,
        principal: Money,
        rate: Rate,
        roi: Rate,
    ) -> Result<Loan> {
        let borrower_id = borrower_id.into();
        debug!(%borrower_id, %principal, "creating loan");

        if self.config.strict_amounts && !principal.is_positive() {
            return Err(LifecycleError::ValidationFailure {
                message: format!("principal must be positive, got {}", principal),
            });
        }

        let loan = self.store.create(NewLoan::new(borrower_id, principal, rate, roi))?;
        info!(loan_id = %loan.id, borrower_id = %loan.borrower_id, "loan proposed");
        Ok(loan)
    }

    /// record the field validator's visit and open the loan for investment
    pub fn approve_loan(&self, loan_id: &LoanId, approval: Approval) -> Result<Loan> {
        debug!(%loan_id, "approving loan");
        self.with_loan_lock(loan_id, || self.apply_approval(loan_id, approval))
    }

    fn apply_approval(&self, loan_id: &LoanId, approval: Approval) -> Result<Loan> {
        let mut loan = self.fetch(loan_id)?;
        validate_transition(loan.state, LoanState::Approved)?;

        let missing = approval.missing_fields();
        if !missing.is_empty() {
            return Err(LifecycleError::ValidationFailure {
                message: format!("missing approval fields: {}", missing.join(", ")),
            });
        }

        loan.advance_to(LoanState::Approved)?;
        loan.approval = Some(approval);

        let loan = self.store.update(&loan)?;
        info!(%loan_id, validator_id = ?loan.approval.as_ref().map(|a| &a.validator_id), "loan approved");
        Ok(loan)
    }

    /// add a contribution; reaching the principal exactly moves the loan to
    /// `Invested` and notifies every investor on the book
    pub fn invest_loan(&self, loan_id: &LoanId, investor: Investor) -> Result<Loan> {
        debug!(%loan_id, investor_id = %investor.investor_id, amount = %investor.amount, "investing in loan");

        let (loan, funded) = self.with_loan_lock(loan_id, || self.apply_investment(loan_id, investor))?;

        if funded {
            info!(
                %loan_id,
                total_invested = %loan.total_invested,
                investors = loan.investor_count(),
                "loan fully funded"
            );
            self.notify_investors(&loan);
        }

        Ok(loan)
    }

    /// hand the funds to the borrower
    pub fn disburse_loan(
        &self,
        loan_id: &LoanId,
        disbursement: Disbursement,
        agreement_link: impl Into<String>,
    ) -> Result<Loan> {
        debug!(%loan_id, "disbursing loan");
        let agreement_link = agreement_link.into();
        self.with_loan_lock(loan_id, || self.apply_disbursement(loan_id, disbursement, agreement_link))
    }

    fn apply_disbursement(
        &self,
        loan_id: &LoanId,
        disbursement: Disbursement,
        agreement_link: String,
    ) -> Result<Loan> {
        let mut loan = self.fetch(loan_id)?;
        validate_transition(loan.state, LoanState::Disbursed)?;

        let missing = disbursement.missing_fields();
        if !missing.is_empty() {
            return Err(LifecycleError::ValidationFailure {
                message: format!("missing disbursement fields: {}", missing.join(", ")),
            });
        }

        loan.disbursement = Some(disbursement);
        loan.agreement_letter_link = agreement_link;
        loan.advance_to(LoanState::Disbursed)?;

        let loan = self.store.update(&loan)?;
        info!(%loan_id, agreement_letter_link = %loan.agreement_letter_link, "loan disbursed");
        Ok(loan)
    }

    pub fn get_loan(&self, loan_id: &LoanId) -> Result<Loan> {
        self.fetch(loan_id)
    }

    pub fn list_loans(&self) -> Result<Vec<Loan>> {
        Ok(self.store.list()?)
    }

    /// validate, append and persist one investment; caller holds the loan lock
    fn apply_investment(&self, loan_id: &LoanId, investor: Investor) -> Result<(Loan, bool)> {
        let mut loan = self.fetch(loan_id)?;

        if !loan.can_accept_investment() {
            return Err(LifecycleError::InvalidState {
                current: loan.state,
                expected: format!("{} or {}", LoanState::Approved, LoanState::Invested),
            });
        }

        if self.config.strict_amounts && !investor.amount.is_positive() {
            return Err(LifecycleError::ValidationFailure {
                message: format!("investment amount must be positive, got {}", investor.amount),
            });
        }

        if loan.would_overfund(investor.amount) {
            return Err(LifecycleError::OverInvestment {
                principal: loan.principal_amount,
                total_invested: loan.total_invested,
                requested: investor.amount,
            });
        }

        loan.record_investment(investor);

        let funded = loan.is_fully_funded();
        if funded {
            loan.advance_to(LoanState::Invested)?;
        }

        let loan = self.store.update(&loan)?;
        Ok((loan, funded))
    }

    /// best-effort: failures are logged, never returned
    fn notify_investors(&self, loan: &Loan) {
        if !self.config.notify_investors {
            debug!(loan_id = %loan.id, "investor notifications disabled");
            return;
        }

        for investor in &loan.investors {
            if let Err(err) = self.notifier.notify(&investor.investor_id, &loan.agreement_letter_link) {
                warn!(
                    loan_id = %loan.id,
                    investor_id = %investor.investor_id,
                    error = %err,
                    "investor notification failed"
                );
            }
        }
    }

    fn fetch(&self, loan_id: &LoanId) -> Result<Loan> {
        self.store.fetch(loan_id).map_err(LifecycleError::from_fetch)
    }

    /// run `op` holding the loan's lock, then drop the lock entry if nobody else is waiting on it
    fn with_loan_lock<T>(&self, loan_id: &LoanId, op: impl FnOnce() -> Result<T>) -> Result<T> {
        let lock = self.locks.entry(*loan_id).or_default().value().clone();
        let result = {
            let _guard = lock.lock();
            op()
        };
        drop(lock);
        // only the table's own handle left
        self.locks.remove_if(loan_id, |_, lock| Arc::strong_count(lock) == 1);
        result
    }
}
