use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::state::Loan;
use crate::types::{LoanId, LoanState};

/// flat, serializable summary of a loan
#[derive(Debug, Serialize, Deserialize)]
pub struct LoanView {
    pub id: LoanId,
    pub borrower_id: String,
    pub state: LoanState,
    pub funding: FundingView,
    pub terms: TermsView,
    pub approval_date: Option<DateTime<Utc>>,
    pub disbursement_date: Option<DateTime<Utc>>,
    pub agreement_letter_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FundingView {
    pub principal_amount: Money,
    pub total_invested: Money,
    pub remaining_principal: Money,
    /// None for a zero principal
    pub funded_ratio: Option<Rate>,
    pub investor_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TermsView {
    pub rate: Rate,
    pub roi: Rate,
}

impl LoanView {
    pub fn from_loan(loan: &Loan) -> Self {
        LoanView {
            id: loan.id,
            borrower_id: loan.borrower_id.clone(),
            state: loan.state,
            funding: FundingView {
                principal_amount: loan.principal_amount,
                total_invested: loan.total_invested,
                remaining_principal: loan.remaining_principal(),
                funded_ratio: loan.total_invested.ratio_of(loan.principal_amount),
                investor_count: loan.investor_count(),
            },
            terms: TermsView {
                rate: loan.rate,
                roi: loan.roi,
            },
            approval_date: loan.approval.as_ref().and_then(|a| a.approval_date),
            disbursement_date: loan.disbursement.as_ref().and_then(|d| d.disbursement_date),
            agreement_letter_link: loan.agreement_letter_link.clone(),
            created_at: loan.created_at,
            updated_at: loan.updated_at,
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::NewLoan;
    use crate::types::{Approval, Investor};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    #[test]
    fn test_view_of_partially_funded_loan() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut loan = Loan::proposed(
            NewLoan::new("B001", Money::from_major(1_000_000), Rate::from_percentage(10), Rate::from_percentage(12)),
            Uuid::new_v4(),
            now,
        );
        loan.state = LoanState::Approved;
        loan.approval = Some(Approval::new("proof.jpg", "EMP001", now));
        loan.record_investment(Investor::new("INV001", Money::from_major(400_000)));

        let view = LoanView::from_loan(&loan);
        assert_eq!(view.funding.remaining_principal, Money::from_major(600_000));
        assert_eq!(view.funding.funded_ratio, Some(Rate::from_decimal(dec!(0.4))));
        assert_eq!(view.funding.investor_count, 1);
        assert_eq!(view.approval_date, Some(now));
        assert_eq!(view.disbursement_date, None);

        let json = view.to_json_pretty().unwrap();
        assert!(json.contains("\"state\": \"approved\""));
    }

    #[test]
    fn test_zero_principal_has_no_ratio() {
        let loan = Loan::proposed(
            NewLoan::new("B002", Money::ZERO, Rate::ZERO, Rate::ZERO),
            Uuid::new_v4(),
            Utc::now(),
        );
        assert_eq!(LoanView::from_loan(&loan).funding.funded_ratio, None);
    }
}
