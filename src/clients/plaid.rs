//! Plaid REST client
//!
//! Every Plaid endpoint is a JSON POST with the client id and secret in the
//! body.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::PlaidConfig;
use crate::domain::{
    AggregatedAccount, AggregatedTransaction, ExchangedToken, Institution, ItemAccounts,
    LinkToken, User,
};

use super::error::{decode, ClientError, Service};
use super::AggregationService;

const SERVICE: Service = Service::Plaid;

/// Processor the processor tokens are minted for
const PROCESSOR: &str = "dwolla";

#[derive(Debug, Deserialize)]
struct AccountsGetResponse {
    accounts: Vec<AggregatedAccount>,
    item: ItemInfo,
}

#[derive(Debug, Deserialize)]
struct ItemInfo {
    #[serde(default)]
    institution_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProcessorTokenResponse {
    processor_token: String,
}

#[derive(Debug, Deserialize)]
struct TransactionsSyncResponse {
    added: Vec<AggregatedTransaction>,
    next_cursor: String,
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct InstitutionResponse {
    institution: Institution,
}

/// Plaid client
#[derive(Debug, Clone)]
pub struct PlaidClient {
    client: Client,
    config: PlaidConfig,
}

impl PlaidClient {
    pub fn new(config: PlaidConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, mut body: Value) -> Result<T, ClientError> {
        if let Some(fields) = body.as_object_mut() {
            fields.insert("client_id".to_string(), json!(self.config.client_id));
            fields.insert("secret".to_string(), json!(self.config.secret));
        }

        let response = self
            .client
            .post(format!("{}{}", self.config.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        decode(SERVICE, response).await
    }
}

#[async_trait]
impl AggregationService for PlaidClient {
    async fn create_link_token(&self, user: &User) -> Result<LinkToken, ClientError> {
        self.post(
            "/link/token/create",
            json!({
                "user": { "client_user_id": user.user_id },
                "client_name": user.full_name(),
                "products": self.config.products,
                "language": "en",
                "country_codes": self.config.country_codes,
            }),
        )
        .await
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<ExchangedToken, ClientError> {
        self.post(
            "/item/public_token/exchange",
            json!({ "public_token": public_token }),
        )
        .await
    }

    async fn get_accounts(&self, access_token: &str) -> Result<ItemAccounts, ClientError> {
        let response: AccountsGetResponse = self
            .post("/accounts/get", json!({ "access_token": access_token }))
            .await?;

        Ok(ItemAccounts {
            accounts: response.accounts,
            institution_id: response.item.institution_id,
        })
    }

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
    ) -> Result<String, ClientError> {
        let response: ProcessorTokenResponse = self
            .post(
                "/processor/token/create",
                json!({
                    "access_token": access_token,
                    "account_id": account_id,
                    "processor": PROCESSOR,
                }),
            )
            .await?;

        Ok(response.processor_token)
    }

    async fn get_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<AggregatedTransaction>, ClientError> {
        let mut transactions = vec![];
        let mut cursor: Option<String> = None;

        loop {
            let mut body = json!({ "access_token": access_token });
            if let Some(ref c) = cursor {
                body["cursor"] = json!(c);
            }

            let batch: TransactionsSyncResponse = self.post("/transactions/sync", body).await?;
            transactions.extend(batch.added);

            if !batch.has_more {
                break;
            }
            cursor = Some(batch.next_cursor);
        }

        tracing::debug!("Fetched {} transactions", transactions.len());
        Ok(transactions)
    }

    async fn get_institution(&self, institution_id: &str) -> Result<Institution, ClientError> {
        let response: InstitutionResponse = self
            .post(
                "/institutions/get_by_id",
                json!({
                    "institution_id": institution_id,
                    "country_codes": self.config.country_codes,
                }),
            )
            .await?;

        Ok(response.institution)
    }
}
