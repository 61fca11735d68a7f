//! Checks run before the participant or expense lists are mutated.
//!
//! Each boolean predicate has a `check_*` twin that says why an input was
//! rejected, so the caller can pick the message shown to the user.
use crate::ledger::LedgerError;
use crate::schemas::{Expense, Participant, ParticipantId};

pub fn can_add_participant(name: &str, existing: &[Participant]) -> bool {
    check_new_participant(name, existing).is_ok()
}

pub fn can_remove_participant(participant_id: ParticipantId, expenses: &[Expense]) -> bool {
    check_participant_removal(participant_id, expenses).is_ok()
}

pub fn can_add_expense(
    payer_id: Option<ParticipantId>,
    amount_text: &str,
    description: &str,
) -> bool {
    check_new_expense(payer_id, amount_text, description).is_ok()
}

/// Returns the trimmed name when it can join `existing`.
pub fn check_new_participant<'a>(
    name: &'a str,
    existing: &[Participant],
) -> Result<&'a str, LedgerError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::EmptyName);
    }
    let lowered = trimmed.to_lowercase();
    if existing
        .iter()
        .any(|p| p.name.trim().to_lowercase() == lowered)
    {
        return Err(LedgerError::DuplicateParticipant(trimmed.to_string()));
    }
    Ok(trimmed)
}

pub fn check_participant_removal(
    participant_id: ParticipantId,
    expenses: &[Expense],
) -> Result<(), LedgerError> {
    if expenses.iter().any(|e| e.payer_id == participant_id) {
        return Err(LedgerError::ParticipantHasExpenses(participant_id));
    }
    Ok(())
}

/// Returns the payer and the parsed amount when the expense form is complete.
pub fn check_new_expense(
    payer_id: Option<ParticipantId>,
    amount_text: &str,
    description: &str,
) -> Result<(ParticipantId, f64), LedgerError> {
    let payer_id = match payer_id {
        Some(id) if !amount_text.trim().is_empty() && !description.trim().is_empty() => id,
        _ => return Err(LedgerError::IncompleteExpense),
    };
    let amount = parse_amount(amount_text).ok_or(LedgerError::InvalidAmount)?;
    Ok((payer_id, amount))
}

/// Parses a user-typed amount. Only finite values above zero are accepted.
pub fn parse_amount(text: &str) -> Option<f64> {
    let amount: f64 = text.trim().parse().ok()?;
    (amount.is_finite() && amount > 0.0).then_some(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::ExpenseId;

    fn alice() -> Vec<Participant> {
        vec![Participant {
            id: ParticipantId(1),
            name: "Alice".to_string(),
        }]
    }

    fn paid_by(payer: u64) -> Expense {
        Expense {
            id: ExpenseId(10),
            payer_id: ParticipantId(payer),
            amount: 12.5,
            description: "taxi".to_string(),
        }
    }

    #[test]
    fn duplicate_names_are_case_insensitive() {
        assert!(!can_add_participant("alice", &alice()));
        assert!(!can_add_participant("  ALICE ", &alice()));
        assert!(can_add_participant("Bob", &alice()));
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(!can_add_participant("", &[]));
        assert!(!can_add_participant("   ", &alice()));
        assert_eq!(check_new_participant("   ", &[]), Err(LedgerError::EmptyName));
    }

    #[test]
    fn new_participant_name_is_trimmed() {
        assert_eq!(check_new_participant("  Bob ", &alice()), Ok("Bob"));
    }

    #[test]
    fn payers_cannot_be_removed() {
        let expenses = [paid_by(1)];
        assert!(!can_remove_participant(ParticipantId(1), &expenses));
        assert!(can_remove_participant(ParticipantId(2), &expenses));
        assert!(can_remove_participant(ParticipantId(1), &[]));
    }

    #[test]
    fn expense_form_validation() {
        let payer = Some(ParticipantId(1));
        assert!(!can_add_expense(None, "10", "lunch"));
        assert!(!can_add_expense(payer, "0", "lunch"));
        assert!(!can_add_expense(payer, "-4", "lunch"));
        assert!(!can_add_expense(payer, "10", ""));
        assert!(!can_add_expense(payer, "10", "   "));
        assert!(!can_add_expense(payer, "", "lunch"));
        assert!(!can_add_expense(payer, "ten", "lunch"));
        assert!(!can_add_expense(payer, "inf", "lunch"));
        assert!(!can_add_expense(payer, "NaN", "lunch"));
        assert!(can_add_expense(payer, "10", "lunch"));
        assert!(can_add_expense(payer, " 0.5 ", "coffee"));
    }

    #[test]
    fn expense_rejections_carry_a_reason() {
        assert_eq!(
            check_new_expense(None, "10", "lunch"),
            Err(LedgerError::IncompleteExpense)
        );
        assert_eq!(
            check_new_expense(Some(ParticipantId(1)), "0", "lunch"),
            Err(LedgerError::InvalidAmount)
        );
        assert_eq!(
            check_new_expense(Some(ParticipantId(1)), "10", "lunch"),
            Ok((ParticipantId(1), 10.0))
        );
    }
}
