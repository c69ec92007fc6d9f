//! Domain module
//!
//! Records, views and pure rules shared by the clients and actions.

pub mod bank;
pub mod pagination;
pub mod shareable_id;
pub mod transaction;
pub mod user;
pub mod validation;

pub use bank::{
    Account, AccountDetail, AccountsSummary, AggregatedAccount, BankAccount, BankFilter,
    ExchangedToken, Institution, ItemAccounts, LinkToken, NewBankAccount,
};
pub use pagination::{paginate, Page, ROWS_PER_PAGE};
pub use transaction::{AggregatedTransaction, Transaction, TransactionType, TransferRecord};
pub use user::{IdentityAccount, NewCustomer, NewUser, Session, SignInParams, SignUpParams, User};
pub use validation::{FieldError, ValidationErrors};
