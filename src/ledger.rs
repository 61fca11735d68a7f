use thiserror::Error;

use crate::balance::compute_report;
use crate::schemas::{
    BalanceReport, Expense, ExpenseId, GroupSnapshot, NewExpense, Participant, ParticipantId,
};
use crate::validation::{check_new_expense, check_new_participant, check_participant_removal};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    #[error("Person name cannot be empty.")]
    EmptyName,
    #[error("This person is already in the list.")]
    DuplicateParticipant(String),
    #[error("Cannot remove a person who has paid for an item.")]
    ParticipantHasExpenses(ParticipantId),
    #[error("All expense fields must be filled out.")]
    IncompleteExpense,
    #[error("Amount must be a positive number.")]
    InvalidAmount,
    #[error("Total amount is too large.")]
    AmountTooLarge,
    #[error("Payer {0} is not part of this group.")]
    UnknownPayer(ParticipantId),
    #[error("Person {0} not found.")]
    ParticipantNotFound(ParticipantId),
    #[error("Expense {0} not found.")]
    ExpenseNotFound(ExpenseId),
}

/// The people and expenses of one group.
#[derive(Clone, Debug, Default)]
pub struct Ledger {
    pub name: String,
    participants: Vec<Participant>,
    expenses: Vec<Expense>,
    next_id: u64,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            participants: Vec::new(),
            expenses: Vec::new(),
            next_id: 1,
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    // Participants and expenses draw from the same counter.
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn add_participant(&mut self, name: &str) -> Result<&Participant, LedgerError> {
        let name = check_new_participant(name, &self.participants)?.to_string();
        let id = ParticipantId(self.allocate_id());
        tracing::debug!(%id, %name, "participant added");
        self.participants.push(Participant { id, name });
        Ok(&self.participants[self.participants.len() - 1])
    }

    pub fn remove_participant(&mut self, id: ParticipantId) -> Result<Participant, LedgerError> {
        let position = self
            .participants
            .iter()
            .position(|p| p.id == id)
            .ok_or(LedgerError::ParticipantNotFound(id))?;
        check_participant_removal(id, &self.expenses)?;
        tracing::debug!(%id, "participant removed");
        Ok(self.participants.remove(position))
    }

    pub fn add_expense(&mut self, expense: NewExpense) -> Result<&Expense, LedgerError> {
        let (payer_id, amount) =
            check_new_expense(expense.payer_id, &expense.amount, &expense.description)?;
        if !self.participants.iter().any(|p| p.id == payer_id) {
            return Err(LedgerError::UnknownPayer(payer_id));
        }
        let total = self.expenses.iter().map(|e| e.amount).sum::<f64>() + amount;
        if !total.is_finite() {
            return Err(LedgerError::AmountTooLarge);
        }
        let id = ExpenseId(self.allocate_id());
        tracing::debug!(%id, %payer_id, amount, "expense added");
        self.expenses.push(Expense {
            id,
            payer_id,
            amount,
            description: expense.description.trim().to_string(),
        });
        Ok(&self.expenses[self.expenses.len() - 1])
    }

    pub fn remove_expense(&mut self, id: ExpenseId) -> Result<Expense, LedgerError> {
        let position = self
            .expenses
            .iter()
            .position(|e| e.id == id)
            .ok_or(LedgerError::ExpenseNotFound(id))?;
        tracing::debug!(%id, "expense removed");
        Ok(self.expenses.remove(position))
    }

    pub fn report(&self) -> BalanceReport {
        compute_report(&self.participants, &self.expenses)
    }

    pub fn snapshot(&self, id: &str) -> GroupSnapshot {
        GroupSnapshot {
            id: id.to_string(),
            name: self.name.clone(),
            participants: self.participants.clone(),
            expenses: self.expenses.clone(),
        }
    }
}
