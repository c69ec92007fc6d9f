//! Bank types
//!
//! Linked bank records persisted in the bank collection, the aggregator's
//! account shapes, and the account views assembled for the dashboard.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Transaction;

/// Linked bank account record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(rename = "$id")]
    pub id: String,
    /// Owning user document id
    pub user_id: String,
    /// Aggregator item id
    pub bank_id: String,
    /// Aggregator account id
    pub account_id: String,
    #[serde(default, skip_serializing)]
    pub access_token: String,
    pub funding_source_url: String,
    pub shareable_id: String,
}

/// Fields written when creating a bank record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBankAccount {
    pub user_id: String,
    pub bank_id: String,
    pub account_id: String,
    pub access_token: String,
    pub funding_source_url: String,
    pub shareable_id: String,
}

/// Equality filter over the bank collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankFilter {
    UserId(String),
    AccountId(String),
}

impl BankFilter {
    /// Stored attribute the filter matches on
    pub fn attribute(&self) -> &'static str {
        match self {
            BankFilter::UserId(_) => "userId",
            BankFilter::AccountId(_) => "accountId",
        }
    }

    pub fn value(&self) -> &str {
        match self {
            BankFilter::UserId(v) | BankFilter::AccountId(v) => v,
        }
    }

    pub fn matches(&self, bank: &BankAccount) -> bool {
        match self {
            BankFilter::UserId(v) => &bank.user_id == v,
            BankFilter::AccountId(v) => &bank.account_id == v,
        }
    }
}

/// Short-lived token for the linking widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkToken {
    pub link_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

/// Result of exchanging a public token
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExchangedToken {
    pub access_token: String,
    pub item_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balances {
    #[serde(default)]
    pub available: Option<Decimal>,
    #[serde(default)]
    pub current: Option<Decimal>,
    #[serde(default)]
    pub iso_currency_code: Option<String>,
}

/// Account as reported by the aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedAccount {
    pub account_id: String,
    pub name: String,
    #[serde(default)]
    pub official_name: Option<String>,
    #[serde(default)]
    pub mask: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub balances: Balances,
}

/// Accounts of one linked item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemAccounts {
    pub accounts: Vec<AggregatedAccount>,
    pub institution_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Institution {
    pub institution_id: String,
    pub name: String,
}

/// Account view rendered on the dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    pub id: String,
    pub available_balance: Decimal,
    pub current_balance: Decimal,
    pub institution_id: Option<String>,
    pub institution_name: Option<String>,
    pub name: String,
    pub official_name: Option<String>,
    pub mask: Option<String>,
    #[serde(rename = "type")]
    pub account_type: String,
    pub subtype: Option<String>,
    /// Bank record document id
    pub bank_id: String,
    pub shareable_id: String,
}

impl Account {
    pub fn from_aggregated(
        account: &AggregatedAccount,
        bank: &BankAccount,
        institution: Option<&Institution>,
    ) -> Self {
        Self {
            id: account.account_id.clone(),
            available_balance: account.balances.available.unwrap_or_default(),
            current_balance: account.balances.current.unwrap_or_default(),
            institution_id: institution.map(|i| i.institution_id.clone()),
            institution_name: institution.map(|i| i.name.clone()),
            name: account.name.clone(),
            official_name: account.official_name.clone(),
            mask: account.mask.clone(),
            account_type: account.account_type.clone(),
            subtype: account.subtype.clone(),
            bank_id: bank.id.clone(),
            shareable_id: bank.shareable_id.clone(),
        }
    }
}

/// Home dashboard totals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountsSummary {
    pub accounts: Vec<Account>,
    pub total_banks: usize,
    pub total_current_balance: Decimal,
}

impl AccountsSummary {
    pub fn from_accounts(accounts: Vec<Account>) -> Self {
        let total_current_balance = accounts.iter().map(|a| a.current_balance).sum();
        Self {
            total_banks: accounts.len(),
            total_current_balance,
            accounts,
        }
    }
}

/// One account with its transactions, newest first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountDetail {
    pub account: Account,
    pub transactions: Vec<Transaction>,
}
