//! Hosted service clients
//!
//! One trait per external collaborator. Actions only see the traits, so the
//! REST implementations here can be swapped for in-memory fakes in tests.

pub mod appwrite;
pub mod dwolla;
pub mod error;
pub mod plaid;

use async_trait::async_trait;

use crate::domain::{
    AggregatedTransaction, BankAccount, BankFilter, ExchangedToken, IdentityAccount, Institution,
    ItemAccounts, LinkToken, NewBankAccount, NewCustomer, NewUser, Session, TransferRecord, User,
};

pub use appwrite::AppwriteClient;
pub use dwolla::{extract_customer_id, DwollaClient};
pub use error::{ClientError, Service};
pub use plaid::PlaidClient;

/// Identity and document store
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Create an identity account, returning its id
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<String, ClientError>;

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, ClientError>;

    async fn delete_session(&self, secret: &str) -> Result<(), ClientError>;

    /// Account behind a session secret; `None` when the session is not valid
    async fn get_current_account(
        &self,
        secret: &str,
    ) -> Result<Option<IdentityAccount>, ClientError>;

    /// User document whose identity id is `user_id`
    async fn find_user_document(&self, user_id: &str) -> Result<Option<User>, ClientError>;

    async fn create_user_document(&self, user: &NewUser) -> Result<User, ClientError>;

    async fn create_bank_document(
        &self,
        bank: &NewBankAccount,
    ) -> Result<BankAccount, ClientError>;

    async fn list_bank_documents(
        &self,
        filter: &BankFilter,
    ) -> Result<Vec<BankAccount>, ClientError>;

    async fn get_bank_document(&self, document_id: &str)
        -> Result<Option<BankAccount>, ClientError>;

    /// Transfers sent from or received by the bank record `bank_id`
    async fn list_transfer_documents(
        &self,
        bank_id: &str,
    ) -> Result<Vec<TransferRecord>, ClientError>;
}

/// Bank-data aggregation API
#[async_trait]
pub trait AggregationService: Send + Sync {
    async fn create_link_token(&self, user: &User) -> Result<LinkToken, ClientError>;

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedToken, ClientError>;

    async fn get_accounts(&self, access_token: &str) -> Result<ItemAccounts, ClientError>;

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<String, ClientError>;

    /// Every transaction of the item
    async fn get_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<AggregatedTransaction>, ClientError>;

    async fn get_institution(&self, institution_id: &str) -> Result<Institution, ClientError>;
}

/// Payment-rail API
#[async_trait]
pub trait PaymentRailService: Send + Sync {
    /// Register a customer, returning the customer URL
    async fn create_customer(&self, customer: &NewCustomer) -> Result<String, ClientError>;

    /// Register a funding source, returning its URL when one was created
    async fn add_funding_source(
        &self,
        customer_id: &str,
        processor_token: &str,
        bank_name: &str,
    ) -> Result<Option<String>, ClientError>;
}
