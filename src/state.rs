use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::Result;
use crate::transition::validate_transition;
use crate::types::{Approval, Disbursement, Investor, LoanId, LoanState};

/// loan terms as proposed, before a store assigns identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub borrower_id: String,
    pub principal_amount: Money,
    pub rate: Rate,
    pub roi: Rate,
}

impl NewLoan {
    pub fn new(borrower_id: impl Into<String>, principal_amount: Money, rate: Rate, roi: Rate) -> Self {
        Self {
            borrower_id: borrower_id.into(),
            principal_amount,
            rate,
            roi,
        }
    }
}

/// loan aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    // identification
    pub id: LoanId,
    pub borrower_id: String,

    // terms
    pub principal_amount: Money,
    /// rate the borrower pays
    pub rate: Rate,
    /// return promised to investors
    pub roi: Rate,

    // lifecycle
    pub state: LoanState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval: Option<Approval>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disbursement: Option<Disbursement>,
    #[serde(default)]
    pub agreement_letter_link: String,

    // funding
    #[serde(default)]
    pub investors: Vec<Investor>,
    pub total_invested: Money,

    // bookkeeping
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub version: u64,
}

impl Loan {
    /// build a freshly proposed loan; stores call this when assigning identity
    pub fn proposed(new_loan: NewLoan, id: LoanId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            borrower_id: new_loan.borrower_id,
            principal_amount: new_loan.principal_amount,
            rate: new_loan.rate,
            roi: new_loan.roi,
            state: LoanState::Proposed,
            approval: None,
            disbursement: None,
            agreement_letter_link: String::new(),
            investors: Vec::new(),
            total_invested: Money::ZERO,
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// principal still open for investment, clamped at the decimal limits
    pub fn remaining_principal(&self) -> Money {
        self.principal_amount.saturating_sub(self.total_invested)
    }

    /// exact match between contributions and principal
    pub fn is_fully_funded(&self) -> bool {
        self.total_invested == self.principal_amount
    }

    pub fn investor_count(&self) -> usize {
        self.investors.len()
    }

    /// investments are only taken once approved and until disbursed
    pub fn can_accept_investment(&self) -> bool {
        matches!(self.state, LoanState::Approved | LoanState::Invested)
    }

    pub fn is_terminal(&self) -> bool {
        self.state.next().is_none()
    }

    /// would `amount` push contributions past the principal; an unrepresentable sum always does
    pub fn would_overfund(&self, amount: Money) -> bool {
        match self.total_invested.checked_add(amount) {
            Some(total) => total > self.principal_amount,
            None => true,
        }
    }

    /// move to `to`, failing unless it is the next lifecycle step
    pub fn advance_to(&mut self, to: LoanState) -> Result<()> {
        validate_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }

    /// append a contribution to the investor book
    pub fn record_investment(&mut self, investor: Investor) {
        self.total_invested += investor.amount;
        self.investors.push(investor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LifecycleError;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn proposed_loan(principal: i64) -> Loan {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Loan::proposed(
            NewLoan::new("B001", Money::from_major(principal), Rate::from_percentage(10), Rate::from_percentage(8)),
            Uuid::new_v4(),
            now,
        )
    }

    #[test]
    fn test_proposed_loan_starts_empty() {
        let loan = proposed_loan(1_000_000);
        assert_eq!(loan.state, LoanState::Proposed);
        assert_eq!(loan.total_invested, Money::ZERO);
        assert!(loan.investors.is_empty());
        assert!(loan.approval.is_none());
        assert!(loan.disbursement.is_none());
        assert!(loan.agreement_letter_link.is_empty());
        assert_eq!(loan.created_at, loan.updated_at);
        assert_eq!(loan.version, 1);
    }

    #[test]
    fn test_record_investment_accumulates() {
        let mut loan = proposed_loan(1_000_000);
        loan.record_investment(Investor::new("INV001", Money::from_major(400_000)));
        loan.record_investment(Investor::new("INV002", Money::from_major(600_000)));

        assert_eq!(loan.investor_count(), 2);
        assert_eq!(loan.total_invested, Money::from_major(1_000_000));
        assert_eq!(loan.remaining_principal(), Money::ZERO);
        assert!(loan.is_fully_funded());
        assert_eq!(loan.investors[0].investor_id, "INV001");
    }

    #[test]
    fn test_would_overfund() {
        let mut loan = proposed_loan(1_000);
        loan.record_investment(Investor::new("INV001", Money::from_major(600)));
        assert!(!loan.would_overfund(Money::from_major(400)));
        assert!(loan.would_overfund(Money::from_major(401)));
    }

    #[test]
    fn test_overflowing_sum_counts_as_overfunding() {
        let mut loan = proposed_loan(0);
        loan.principal_amount = Money::from_decimal(Decimal::MAX);
        loan.record_investment(Investor::new("INV001", Money::from_str_exact("79228162514264337593543950000").unwrap()));
        assert!(loan.would_overfund(Money::from_decimal(Decimal::MAX)));
        assert_eq!(loan.remaining_principal(), Money::from_major(335));
    }

    #[test]
    fn test_remaining_principal_saturates() {
        let mut loan = proposed_loan(-1);
        loan.total_invested = Money::from_decimal(Decimal::MAX);
        assert_eq!(loan.remaining_principal(), Money::from_decimal(Decimal::MIN));
    }

    #[test]
    fn test_deserialized_amounts_are_rounded() {
        let mut json = serde_json::to_value(proposed_loan(0)).unwrap();
        json["principal_amount"] = serde_json::json!("1000.00004");
        let mut loan: Loan = serde_json::from_value(json).unwrap();
        assert_eq!(loan.principal_amount, Money::from_major(1_000));

        loan.record_investment(Investor::new("INV001", Money::from_major(1_000)));
        assert!(loan.is_fully_funded());
    }

    #[test]
    fn test_advance_to_rejects_skip() {
        let mut loan = proposed_loan(1_000);
        let err = loan.advance_to(LoanState::Invested).unwrap_err();
        assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
        assert_eq!(loan.state, LoanState::Proposed);

        loan.advance_to(LoanState::Approved).unwrap();
        assert_eq!(loan.state, LoanState::Approved);
        assert!(loan.can_accept_investment());
        assert!(!loan.is_terminal());
    }

    #[test]
    fn test_json_shape_omits_absent_records() {
        let loan = proposed_loan(1_000);
        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["state"], "proposed");
        assert_eq!(value["borrower_id"], "B001");
        assert!(value.get("approval").is_none());
        assert!(value.get("disbursement").is_none());
        assert_eq!(value["investors"], serde_json::json!([]));

        let back: Loan = serde_json::from_value(value).unwrap();
        assert_eq!(back, loan);
    }
}
