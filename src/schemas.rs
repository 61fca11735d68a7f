use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

pub type UserName = String;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ParticipantId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub payer_id: ParticipantId,
    pub amount: f64,
    pub description: String,
}

/// One row of the balance sheet. Positive means the group owes this person.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PersonalBalance {
    pub name: String,
    pub balance: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct BalanceReport {
    pub total: f64,
    pub average: f64,
    pub balances: Vec<PersonalBalance>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GroupName {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewParticipant {
    pub name: String,
}

// The amount stays as text so it goes through the same parse rule as a form field.
// Missing fields come through empty and are rejected by the ledger.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct NewExpense {
    #[serde(default)]
    pub payer_id: Option<ParticipantId>,
    #[serde(default, deserialize_with = "amount_text")]
    pub amount: String,
    #[serde(default)]
    pub description: String,
}

/// Accepts `"12.5"`, `12.5` or `null` for an amount.
fn amount_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountField {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<AmountField>::deserialize(deserializer)? {
        Some(AmountField::Text(text)) => text,
        Some(AmountField::Number(number)) => number.to_string(),
        None => String::new(),
    })
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct GroupSnapshot {
    pub id: String,
    pub name: String,
    pub participants: Vec<Participant>,
    pub expenses: Vec<Expense>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Every payload exchanged with the login and lookup endpoints is wrapped in `value`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Envelope<T> {
    pub value: T,
}
