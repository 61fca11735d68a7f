use std::collections::HashMap;

use crate::schemas::{BalanceReport, Expense, Participant, ParticipantId, PersonalBalance};

/// Balances closer to zero than this are shown as settled.
const SETTLED_THRESHOLD: f64 = 1.0;

type Paid = HashMap<ParticipantId, f64>;

/// Computes how far each participant is from an even split of all expenses.
///
/// Participants are reported in list order. An expense whose payer is not in
/// `participants` still counts towards the total but is not attributed to
/// anybody.
pub fn compute_report(participants: &[Participant], expenses: &[Expense]) -> BalanceReport {
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();
    let average = if participants.is_empty() {
        0.0
    } else {
        total / participants.len() as f64
    };

    let mut paid: Paid = participants.iter().map(|p| (p.id, 0.0)).collect();
    for expense in expenses {
        match paid.get_mut(&expense.payer_id) {
            Some(amount) => *amount += expense.amount,
            None => tracing::warn!(
                payer_id = %expense.payer_id,
                expense_id = %expense.id,
                "expense paid by an unknown participant, left out of the balances"
            ),
        }
    }

    let balances = participants
        .iter()
        .map(|participant| PersonalBalance {
            name: participant.name.clone(),
            balance: paid.get(&participant.id).copied().unwrap_or_default() - average,
        })
        .collect();

    BalanceReport {
        total,
        average,
        balances,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BalanceStatus {
    SettledUp,
    ShouldReceive(f64),
    ShouldPay(f64),
}

impl BalanceStatus {
    pub fn from_balance(balance: f64) -> Self {
        if balance.abs() < SETTLED_THRESHOLD {
            BalanceStatus::SettledUp
        } else if balance > 0.0 {
            BalanceStatus::ShouldReceive(balance.abs())
        } else {
            BalanceStatus::ShouldPay(balance.abs())
        }
    }

    pub fn describe(&self) -> String {
        match self {
            BalanceStatus::SettledUp => "Settled up".to_string(),
            BalanceStatus::ShouldReceive(amount) => format!("Should receive {}", format_vnd(*amount)),
            BalanceStatus::ShouldPay(amount) => format!("Should pay {}", format_vnd(*amount)),
        }
    }
}

impl PersonalBalance {
    pub fn status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance)
    }
}

/// Formats an amount as Vietnamese dong: no decimals, `.` between thousands.
pub fn format_vnd(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("{amount} ₫");
    }
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    if rounded < 0.0 {
        format!("-{grouped} ₫")
    } else {
        format!("{grouped} ₫")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::ExpenseId;
    use proptest::prelude::*;

    fn person(id: u64, name: &str) -> Participant {
        Participant {
            id: ParticipantId(id),
            name: name.to_string(),
        }
    }

    fn paid(id: u64, payer: u64, amount: f64) -> Expense {
        Expense {
            id: ExpenseId(id),
            payer_id: ParticipantId(payer),
            amount,
            description: "x".to_string(),
        }
    }

    #[test]
    fn empty_state_is_all_zero() {
        let report = compute_report(&[], &[]);
        assert_eq!(report.total, 0.0);
        assert_eq!(report.average, 0.0);
        assert!(report.balances.is_empty());
    }

    #[test]
    fn expenses_without_participants_do_not_divide_by_zero() {
        let report = compute_report(&[], &[paid(1, 1, 30.0)]);
        assert_eq!(report.total, 30.0);
        assert_eq!(report.average, 0.0);
        assert!(report.balances.is_empty());
    }

    #[test]
    fn single_payer_single_expense() {
        let report = compute_report(&[person(1, "A"), person(2, "B")], &[paid(1, 1, 100.0)]);
        assert_eq!(report.total, 100.0);
        assert_eq!(report.average, 50.0);
        assert_eq!(
            report.balances,
            vec![
                PersonalBalance {
                    name: "A".to_string(),
                    balance: 50.0
                },
                PersonalBalance {
                    name: "B".to_string(),
                    balance: -50.0
                },
            ]
        );
    }

    #[test]
    fn balances_follow_participant_order() {
        let people = [person(7, "Zoe"), person(3, "Adam"), person(5, "Mia")];
        let expenses = [paid(1, 3, 90.0), paid(2, 5, 30.0)];
        let names: Vec<_> = compute_report(&people, &expenses)
            .balances
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["Zoe", "Adam", "Mia"]);
    }

    #[test]
    fn unknown_payer_counts_in_total_only() {
        let report = compute_report(&[person(1, "A"), person(2, "B")], &[paid(1, 9, 40.0)]);
        assert_eq!(report.total, 40.0);
        assert_eq!(report.average, 20.0);
        assert_eq!(report.balances[0].balance, -20.0);
        assert_eq!(report.balances[1].balance, -20.0);
    }

    #[test]
    fn status_thresholds() {
        assert_eq!(BalanceStatus::from_balance(0.5), BalanceStatus::SettledUp);
        assert_eq!(BalanceStatus::from_balance(-0.99), BalanceStatus::SettledUp);
        assert_eq!(
            BalanceStatus::from_balance(50.0),
            BalanceStatus::ShouldReceive(50.0)
        );
        assert_eq!(BalanceStatus::from_balance(-12.0), BalanceStatus::ShouldPay(12.0));
        assert_eq!(
            BalanceStatus::from_balance(-150000.0).describe(),
            "Should pay 150.000 ₫"
        );
    }

    #[test]
    fn vnd_formatting() {
        assert_eq!(format_vnd(0.0), "0 ₫");
        assert_eq!(format_vnd(999.4), "999 ₫");
        assert_eq!(format_vnd(1000.0), "1.000 ₫");
        assert_eq!(format_vnd(1234567.6), "1.234.568 ₫");
        assert_eq!(format_vnd(-25000.0), "-25.000 ₫");
        assert_eq!(format_vnd(-0.2), "0 ₫");
    }

    fn ledger_inputs() -> impl Strategy<Value = (Vec<Participant>, Vec<Expense>)> {
        (1usize..12).prop_flat_map(|count| {
            let expenses = prop::collection::vec((0..count as u64, 0.01f64..1_000_000.0), 0..40);
            expenses.prop_map(move |raw| {
                let people = (0..count as u64)
                    .map(|id| person(id, &format!("p{id}")))
                    .collect::<Vec<_>>();
                let expenses = raw
                    .into_iter()
                    .enumerate()
                    .map(|(i, (payer, amount))| paid(i as u64, payer, amount))
                    .collect::<Vec<_>>();
                (people, expenses)
            })
        })
    }

    proptest! {
        #[test]
        fn balances_sum_to_zero((people, expenses) in ledger_inputs()) {
            let report = compute_report(&people, &expenses);
            let sum: f64 = report.balances.iter().map(|b| b.balance).sum();
            let tolerance = 1e-9 * report.total.max(1.0);
            prop_assert!(sum.abs() <= tolerance, "sum {} over total {}", sum, report.total);
        }

        #[test]
        fn report_is_idempotent((people, expenses) in ledger_inputs()) {
            prop_assert_eq!(
                compute_report(&people, &expenses),
                compute_report(&people, &expenses)
            );
        }
    }
}
