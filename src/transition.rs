use crate::errors::{LifecycleError, Result};
use crate::types::LoanState;

/// true when `to` is the immediate successor of `from`
pub fn can_transition(from: LoanState, to: LoanState) -> bool {
    from.next() == Some(to)
}

/// reject any move that is not a single forward step
pub fn validate_transition(from: LoanState, to: LoanState) -> Result<()> {
    if !can_transition(from, to) {
        return Err(LifecycleError::InvalidTransition { from, to });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_forward_steps_allowed() {
        assert!(can_transition(LoanState::Proposed, LoanState::Approved));
        assert!(can_transition(LoanState::Approved, LoanState::Invested));
        assert!(can_transition(LoanState::Invested, LoanState::Disbursed));
    }

    #[test]
    fn test_skips_and_reverses_rejected() {
        let rejected = [
            (LoanState::Proposed, LoanState::Invested),
            (LoanState::Proposed, LoanState::Disbursed),
            (LoanState::Approved, LoanState::Disbursed),
            (LoanState::Disbursed, LoanState::Proposed),
            (LoanState::Invested, LoanState::Approved),
        ];
        for (from, to) in rejected {
            assert!(!can_transition(from, to), "{from} -> {to} should be rejected");
        }
    }

    #[test]
    fn test_self_transition_rejected() {
        for state in LoanState::ALL {
            match validate_transition(state, state) {
                Err(LifecycleError::InvalidTransition { from, to }) => {
                    assert_eq!(from, state);
                    assert_eq!(to, state);
                }
                other => panic!("expected InvalidTransition, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_disbursed_is_terminal() {
        for target in LoanState::ALL {
            assert!(validate_transition(LoanState::Disbursed, target).is_err());
        }
    }

    #[test]
    fn test_error_message_names_both_states() {
        let err = validate_transition(LoanState::Approved, LoanState::Disbursed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid state transition: cannot move from approved to disbursed"
        );
    }

    fn any_state() -> impl Strategy<Value = LoanState> {
        prop::sample::select(LoanState::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_allowed_moves_advance_exactly_one_step(from in any_state(), to in any_state()) {
            let from_idx = LoanState::ALL.iter().position(|s| *s == from).unwrap();
            let to_idx = LoanState::ALL.iter().position(|s| *s == to).unwrap();
            prop_assert_eq!(can_transition(from, to), to_idx == from_idx + 1);
            prop_assert_eq!(validate_transition(from, to).is_ok(), can_transition(from, to));
        }
    }
}
