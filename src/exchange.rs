use serde::Serialize;

use crate::schemas::BalanceReport;

/// Remainders below one cent are treated as settled.
const CENT: f64 = 0.01;

#[derive(Clone, Debug)]
struct Party {
    name: String,
    amount: f64,
    order: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Exchange {
    pub payer: String,
    pub receiver: String,
    pub amount: f64,
}

fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

// Ascending by amount so `last_mut` is the largest; on ties the earliest
// participant ends up last.
fn sort_parties(parties: &mut [Party]) {
    parties.sort_by(|a, b| a.amount.total_cmp(&b.amount).then(b.order.cmp(&a.order)));
}

/// Suggests who should pay whom so that every balance in `report` reaches zero.
///
/// The largest debtor always pays the largest creditor, which needs at most
/// one exchange less than the number of people who are not settled.
pub fn settle(report: &BalanceReport) -> Vec<Exchange> {
    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for (order, person) in report.balances.iter().enumerate() {
        let party = Party {
            name: person.name.clone(),
            amount: round_to_2_decimals(person.balance.abs()),
            order,
        };
        if party.amount < CENT {
            continue;
        }
        if person.balance < 0.0 {
            payers.push(party);
        } else {
            receivers.push(party);
        }
    }

    let mut exchanges = Vec::new();

    while !payers.is_empty() && !receivers.is_empty() {
        sort_parties(&mut payers);
        sort_parties(&mut receivers);
        let (Some(payer), Some(receiver)) = (payers.last_mut(), receivers.last_mut()) else {
            break;
        };

        let amount = payer.amount.min(receiver.amount);
        exchanges.push(Exchange {
            payer: payer.name.clone(),
            receiver: receiver.name.clone(),
            amount,
        });
        payer.amount = round_to_2_decimals(payer.amount - amount);
        receiver.amount = round_to_2_decimals(receiver.amount - amount);

        if payer.amount < CENT {
            payers.pop();
        }
        if receiver.amount < CENT {
            receivers.pop();
        }
    }
    exchanges
}
