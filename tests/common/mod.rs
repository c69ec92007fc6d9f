//! Common test utilities
//!
//! In-memory stand-ins for the three hosted services. Each fake records the
//! operations it served and can be told to fail a named operation.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use horizon_banking::clients::{
    AggregationService, ClientError, IdentityService, PaymentRailService, Service,
};
use horizon_banking::domain::bank::Balances;
use horizon_banking::domain::{
    AggregatedAccount, AggregatedTransaction, BankAccount, BankFilter, ExchangedToken,
    IdentityAccount, Institution, ItemAccounts, LinkToken, NewBankAccount, NewCustomer, NewUser,
    Session, SignInParams, SignUpParams, TransferRecord, User,
};
use horizon_banking::AppState;
use rust_decimal::Decimal;

fn status(service: Service, status: u16) -> ClientError {
    ClientError::Status {
        service,
        status,
        message: "injected failure".to_string(),
    }
}

/// Operation log and failure switches shared by the fakes
#[derive(Default)]
pub struct Script {
    calls: Mutex<Vec<&'static str>>,
    failures: Mutex<HashMap<&'static str, u16>>,
}

impl Script {
    fn enter(&self, service: Service, op: &'static str) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(op);
        match self.failures.lock().unwrap().get(op) {
            Some(code) => Err(status(service, *code)),
            None => Ok(()),
        }
    }

    pub fn fail(&self, op: &'static str, code: u16) {
        self.failures.lock().unwrap().insert(op, code);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }
}

// =========================================================================
// Identity
// =========================================================================

struct StoredAccount {
    id: String,
    email: String,
    password: String,
    name: String,
}

#[derive(Default)]
struct IdentityData {
    next_id: u32,
    accounts: Vec<StoredAccount>,
    sessions: HashMap<String, Session>,
    users: Vec<User>,
    banks: Vec<BankAccount>,
    transfers: Vec<TransferRecord>,
}

impl IdentityData {
    fn next(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct FakeIdentity {
    pub script: Script,
    data: Mutex<IdentityData>,
}

impl FakeIdentity {
    pub fn users(&self) -> Vec<User> {
        self.data.lock().unwrap().users.clone()
    }

    pub fn banks(&self) -> Vec<BankAccount> {
        self.data.lock().unwrap().banks.clone()
    }

    pub fn account_ids(&self) -> Vec<String> {
        self.data.lock().unwrap().accounts.iter().map(|a| a.id.clone()).collect()
    }

    pub fn live_sessions(&self) -> usize {
        self.data.lock().unwrap().sessions.len()
    }

    pub fn insert_bank(&self, bank: BankAccount) {
        self.data.lock().unwrap().banks.push(bank);
    }

    pub fn insert_transfer(&self, transfer: TransferRecord) {
        self.data.lock().unwrap().transfers.push(transfer);
    }
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<String, ClientError> {
        self.script.enter(Service::Appwrite, "create_account")?;
        let mut data = self.data.lock().unwrap();
        if data.accounts.iter().any(|a| a.email == email) {
            return Err(status(Service::Appwrite, 409));
        }
        let id = data.next("acct");
        data.accounts.push(StoredAccount {
            id: id.clone(),
            email: email.to_string(),
            password: password.to_string(),
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        self.script.enter(Service::Appwrite, "create_session")?;
        let mut data = self.data.lock().unwrap();
        let user_id = data
            .accounts
            .iter()
            .find(|a| a.email == email && a.password == password)
            .map(|a| a.id.clone())
            .ok_or_else(|| status(Service::Appwrite, 401))?;

        let session = Session {
            id: data.next("sess"),
            user_id,
            secret: data.next("secret"),
            expire: Utc::now() + Duration::days(365),
        };
        data.sessions.insert(session.secret.clone(), session.clone());
        Ok(session)
    }

    async fn delete_session(&self, secret: &str) -> Result<(), ClientError> {
        self.script.enter(Service::Appwrite, "delete_session")?;
        match self.data.lock().unwrap().sessions.remove(secret) {
            Some(_) => Ok(()),
            None => Err(status(Service::Appwrite, 401)),
        }
    }

    async fn get_current_account(
        &self,
        secret: &str,
    ) -> Result<Option<IdentityAccount>, ClientError> {
        self.script.enter(Service::Appwrite, "get_current_account")?;
        let data = self.data.lock().unwrap();
        let Some(session) = data.sessions.get(secret) else {
            return Ok(None);
        };
        Ok(data
            .accounts
            .iter()
            .find(|a| a.id == session.user_id)
            .map(|a| IdentityAccount {
                id: a.id.clone(),
                email: a.email.clone(),
                name: a.name.clone(),
            }))
    }

    async fn find_user_document(&self, user_id: &str) -> Result<Option<User>, ClientError> {
        self.script.enter(Service::Appwrite, "find_user_document")?;
        let data = self.data.lock().unwrap();
        Ok(data.users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn create_user_document(&self, user: &NewUser) -> Result<User, ClientError> {
        self.script.enter(Service::Appwrite, "create_user_document")?;
        let mut data = self.data.lock().unwrap();
        let stored = User {
            id: data.next("user"),
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            address1: user.address1.clone(),
            city: user.city.clone(),
            state: user.state.clone(),
            postal_code: user.postal_code.clone(),
            date_of_birth: user.date_of_birth.clone(),
            ssn: user.ssn.clone(),
            dwolla_customer_url: user.dwolla_customer_url.clone(),
            dwolla_customer_id: user.dwolla_customer_id.clone(),
        };
        data.users.push(stored.clone());
        Ok(stored)
    }

    async fn create_bank_document(
        &self,
        bank: &NewBankAccount,
    ) -> Result<BankAccount, ClientError> {
        self.script.enter(Service::Appwrite, "create_bank_document")?;
        let mut data = self.data.lock().unwrap();
        let stored = BankAccount {
            id: data.next("bank"),
            user_id: bank.user_id.clone(),
            bank_id: bank.bank_id.clone(),
            account_id: bank.account_id.clone(),
            access_token: bank.access_token.clone(),
            funding_source_url: bank.funding_source_url.clone(),
            shareable_id: bank.shareable_id.clone(),
        };
        data.banks.push(stored.clone());
        Ok(stored)
    }

    async fn list_bank_documents(
        &self,
        filter: &BankFilter,
    ) -> Result<Vec<BankAccount>, ClientError> {
        self.script.enter(Service::Appwrite, "list_bank_documents")?;
        let data = self.data.lock().unwrap();
        Ok(data.banks.iter().filter(|b| filter.matches(b)).cloned().collect())
    }

    async fn get_bank_document(
        &self,
        document_id: &str,
    ) -> Result<Option<BankAccount>, ClientError> {
        self.script.enter(Service::Appwrite, "get_bank_document")?;
        let data = self.data.lock().unwrap();
        Ok(data.banks.iter().find(|b| b.id == document_id).cloned())
    }

    async fn list_transfer_documents(
        &self,
        bank_id: &str,
    ) -> Result<Vec<TransferRecord>, ClientError> {
        self.script.enter(Service::Appwrite, "list_transfer_documents")?;
        let data = self.data.lock().unwrap();
        Ok(data
            .transfers
            .iter()
            .filter(|t| t.sender_bank_id == bank_id || t.receiver_bank_id == bank_id)
            .cloned()
            .collect())
    }
}

// =========================================================================
// Aggregation
// =========================================================================

pub struct FakeAggregation {
    pub script: Script,
    pub accounts: Mutex<Vec<AggregatedAccount>>,
    pub transactions: Mutex<Vec<AggregatedTransaction>>,
    pub institution: Mutex<Option<Institution>>,
}

impl Default for FakeAggregation {
    fn default() -> Self {
        Self {
            script: Script::default(),
            accounts: Mutex::new(vec![checking_account("acc-1", Decimal::new(11000, 2))]),
            transactions: Mutex::new(vec![]),
            institution: Mutex::new(Some(Institution {
                institution_id: "ins_1".to_string(),
                name: "First Platypus Bank".to_string(),
            })),
        }
    }
}

#[async_trait]
impl AggregationService for FakeAggregation {
    async fn create_link_token(&self, user: &User) -> Result<LinkToken, ClientError> {
        self.script.enter(Service::Plaid, "create_link_token")?;
        Ok(LinkToken {
            link_token: format!("link-sandbox-{}", user.user_id),
            expiration: None,
        })
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedToken, ClientError> {
        self.script.enter(Service::Plaid, "exchange_public_token")?;
        Ok(ExchangedToken {
            access_token: format!("access-{}", public_token),
            item_id: format!("item-{}", public_token),
        })
    }

    async fn get_accounts(&self, _access_token: &str) -> Result<ItemAccounts, ClientError> {
        self.script.enter(Service::Plaid, "get_accounts")?;
        Ok(ItemAccounts {
            accounts: self.accounts.lock().unwrap().clone(),
            institution_id: self
                .institution
                .lock()
                .unwrap()
                .as_ref()
                .map(|i| i.institution_id.clone()),
        })
    }

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<String, ClientError> {
        self.script.enter(Service::Plaid, "create_processor_token")?;
        Ok(format!("processor-{}-{}", access_token, account_id))
    }

    async fn get_transactions(
        &self,
        _access_token: &str,
    ) -> Result<Vec<AggregatedTransaction>, ClientError> {
        self.script.enter(Service::Plaid, "get_transactions")?;
        Ok(self.transactions.lock().unwrap().clone())
    }

    async fn get_institution(&self, institution_id: &str) -> Result<Institution, ClientError> {
        self.script.enter(Service::Plaid, "get_institution")?;
        self.institution
            .lock()
            .unwrap()
            .clone()
            .filter(|i| i.institution_id == institution_id)
            .ok_or_else(|| status(Service::Plaid, 404))
    }
}

// =========================================================================
// Payments
// =========================================================================

pub struct FakePayments {
    pub script: Script,
    pub customer_url: Mutex<String>,
    pub funding_source: Mutex<Option<String>>,
    pub customers: Mutex<Vec<NewCustomer>>,
}

impl Default for FakePayments {
    fn default() -> Self {
        Self {
            script: Script::default(),
            customer_url: Mutex::new("https://api-sandbox.dwolla.com/customers/cust-1".to_string()),
            funding_source: Mutex::new(Some(
                "https://api-sandbox.dwolla.com/funding-sources/fs-1".to_string(),
            )),
            customers: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl PaymentRailService for FakePayments {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<String, ClientError> {
        self.script.enter(Service::Dwolla, "create_customer")?;
        self.customers.lock().unwrap().push(customer.clone());
        Ok(self.customer_url.lock().unwrap().clone())
    }

    async fn add_funding_source(
        &self,
        _customer_id: &str,
        _processor_token: &str,
        _bank_name: &str,
    ) -> Result<Option<String>, ClientError> {
        self.script.enter(Service::Dwolla, "add_funding_source")?;
        Ok(self.funding_source.lock().unwrap().clone())
    }
}

// =========================================================================
// Harness
// =========================================================================

#[derive(Clone, Default)]
pub struct Harness {
    pub identity: Arc<FakeIdentity>,
    pub aggregation: Arc<FakeAggregation>,
    pub payments: Arc<FakePayments>,
}

impl Harness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.identity.clone(),
            self.aggregation.clone(),
            self.payments.clone(),
        )
    }
}

pub fn checking_account(id: &str, current: Decimal) -> AggregatedAccount {
    AggregatedAccount {
        account_id: id.to_string(),
        name: "Plaid Checking".to_string(),
        official_name: Some("Plaid Gold Standard 0% Interest Checking".to_string()),
        mask: Some("0000".to_string()),
        account_type: "depository".to_string(),
        subtype: Some("checking".to_string()),
        balances: Balances {
            available: Some(current),
            current: Some(current),
            iso_currency_code: Some("USD".to_string()),
        },
    }
}

pub fn aggregated_transaction(id: &str, amount: Decimal, date: NaiveDate) -> AggregatedTransaction {
    AggregatedTransaction {
        transaction_id: id.to_string(),
        account_id: "acc-1".to_string(),
        amount,
        name: format!("Merchant {}", id),
        merchant_name: None,
        date,
        pending: false,
        payment_channel: "online".to_string(),
        personal_finance_category: None,
        category: Some(vec!["Shops".to_string()]),
        logo_url: None,
    }
}

pub fn sign_up_params(email: &str) -> SignUpParams {
    SignUpParams {
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: email.to_string(),
        password: "password123".to_string(),
        address1: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        state: "NY".to_string(),
        postal_code: "10001".to_string(),
        date_of_birth: "1990-01-01".to_string(),
        ssn: "1234".to_string(),
    }
}

pub fn sign_in_params(email: &str) -> SignInParams {
    SignInParams {
        email: email.to_string(),
        password: "password123".to_string(),
    }
}
