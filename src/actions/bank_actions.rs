//! Bank Actions
//!
//! Bank linking and the account/transaction views built on linked banks.

use std::sync::Arc;

use crate::clients::{AggregationService, IdentityService, PaymentRailService};
use crate::domain::shareable_id::encrypt_id;
use crate::domain::transaction::sort_newest_first;
use crate::domain::{
    Account, AccountDetail, AccountsSummary, BankAccount, BankFilter, LinkToken, NewBankAccount,
    Transaction, User,
};
use crate::error::{AppError, AppResult};
use crate::home_view::HomeViewSignal;

/// Orchestration of bank linking and reads
#[derive(Clone)]
pub struct BankActions {
    identity: Arc<dyn IdentityService>,
    aggregation: Arc<dyn AggregationService>,
    payments: Arc<dyn PaymentRailService>,
    home_view: HomeViewSignal,
}

impl BankActions {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        aggregation: Arc<dyn AggregationService>,
        payments: Arc<dyn PaymentRailService>,
        home_view: HomeViewSignal,
    ) -> Self {
        Self {
            identity,
            aggregation,
            payments,
            home_view,
        }
    }

    /// Refresh signal raised whenever a user's home view changes
    pub fn home_view(&self) -> &HomeViewSignal {
        &self.home_view
    }

    pub async fn create_link_token(&self, user: &User) -> AppResult<LinkToken> {
        Ok(self.aggregation.create_link_token(user).await?)
    }

    /// Link the bank behind a public token to `user`.
    ///
    /// Creates exactly one bank record on success and none on failure. Tokens
    /// minted before a failing step are not revoked, and repeated calls with
    /// the same public token are not deduplicated.
    pub async fn exchange_public_token(
        &self,
        user: &User,
        public_token: &str,
    ) -> AppResult<BankAccount> {
        let exchanged = self
            .aggregation
            .exchange_public_token(public_token)
            .await?;

        let item = self.aggregation.get_accounts(&exchanged.access_token).await?;
        let account = item
            .accounts
            .into_iter()
            .next()
            .ok_or_else(|| AppError::AccountNotFound(exchanged.item_id.clone()))?;

        let processor_token = self
            .aggregation
            .create_processor_token(&exchanged.access_token, &account.account_id)
            .await?;

        let funding_source_url = self
            .payments
            .add_funding_source(&user.dwolla_customer_id, &processor_token, &account.name)
            .await?
            .ok_or(AppError::FundingSourceMissing)?;

        let bank = self
            .identity
            .create_bank_document(&NewBankAccount {
                user_id: user.id.clone(),
                bank_id: exchanged.item_id,
                account_id: account.account_id.clone(),
                access_token: exchanged.access_token,
                funding_source_url,
                shareable_id: encrypt_id(&account.account_id),
            })
            .await?;

        self.home_view.invalidate(&user.id);

        tracing::info!("Linked bank {} for user {}", bank.id, user.id);
        Ok(bank)
    }

    /// Bank records owned by a user document
    pub async fn get_banks(&self, user_id: &str) -> AppResult<Vec<BankAccount>> {
        Ok(self
            .identity
            .list_bank_documents(&BankFilter::UserId(user_id.to_string()))
            .await?)
    }

    pub async fn get_bank(&self, document_id: &str) -> AppResult<Option<BankAccount>> {
        Ok(self.identity.get_bank_document(document_id).await?)
    }

    /// The bank record for an aggregator account, only when exactly one matches
    pub async fn get_bank_by_account_id(&self, account_id: &str) -> AppResult<Option<BankAccount>> {
        let mut banks = self
            .identity
            .list_bank_documents(&BankFilter::AccountId(account_id.to_string()))
            .await?;

        if banks.len() != 1 {
            if banks.len() > 1 {
                tracing::warn!("{} bank records share account {}", banks.len(), account_id);
            }
            return Ok(None);
        }
        Ok(banks.pop())
    }

    /// Dashboard summary across every bank the user linked, with balances
    /// read from the aggregation API on every call
    pub async fn get_accounts(&self, user_id: &str) -> AppResult<AccountsSummary> {
        let banks = self.get_banks(user_id).await?;

        let mut accounts = Vec::with_capacity(banks.len());
        for bank in &banks {
            accounts.push(self.load_account(bank).await?);
        }

        Ok(AccountsSummary::from_accounts(accounts))
    }

    /// One bank's account with aggregator transactions and transfers merged
    pub async fn get_account(&self, bank: &BankAccount) -> AppResult<AccountDetail> {
        let account = self.load_account(bank).await?;

        let mut transactions: Vec<Transaction> = self
            .identity
            .list_transfer_documents(&bank.id)
            .await?
            .iter()
            .map(|t| t.to_transaction(&bank.id))
            .collect();

        let aggregated = self.aggregation.get_transactions(&bank.access_token).await?;
        transactions.extend(aggregated.into_iter().map(Transaction::from));

        sort_newest_first(&mut transactions);

        Ok(AccountDetail {
            account,
            transactions,
        })
    }

    async fn load_account(&self, bank: &BankAccount) -> AppResult<Account> {
        let item = self.aggregation.get_accounts(&bank.access_token).await?;

        let aggregated = item
            .accounts
            .iter()
            .find(|a| a.account_id == bank.account_id)
            .or_else(|| item.accounts.first())
            .ok_or_else(|| AppError::AccountNotFound(bank.account_id.clone()))?;

        let institution = match item.institution_id {
            Some(ref id) => Some(self.aggregation.get_institution(id).await?),
            None => None,
        };

        Ok(Account::from_aggregated(aggregated, bank, institution.as_ref()))
    }
}
