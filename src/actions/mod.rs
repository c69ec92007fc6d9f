//! Server actions
//!
//! One orchestration method per use case. Each runs a fixed, linear sequence
//! of calls to the hosted services and stops at the first failure.

mod bank_actions;
mod user_actions;

pub use bank_actions::BankActions;
pub use user_actions::{SignedIn, UserActions};
