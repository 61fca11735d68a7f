pub mod auth;
pub mod balance;
pub mod config;
pub mod error;
pub mod exchange;
pub mod ledger;
pub mod remote;
pub mod routes;
pub mod schemas;
pub mod session;
pub mod validation;

pub use balance::compute_report;
pub use validation::{can_add_expense, can_add_participant, can_remove_participant};
