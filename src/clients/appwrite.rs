//! Appwrite REST client
//!
//! Admin calls authenticate with the project API key; calls on behalf of a
//! signed-in user carry the session secret instead.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::config::AppwriteConfig;
use crate::domain::{
    BankAccount, BankFilter, IdentityAccount, NewBankAccount, NewUser, Session, TransferRecord,
    User,
};

use super::error::{check_status, decode, ClientError, Service};
use super::IdentityService;

const SERVICE: Service = Service::Appwrite;

/// Documents requested per list page
const PAGE_LIMIT: usize = 100;

/// Stored document with an id usable as a list cursor
trait Document {
    fn document_id(&self) -> &str;
}

impl Document for User {
    fn document_id(&self) -> &str {
        &self.id
    }
}

impl Document for BankAccount {
    fn document_id(&self) -> &str {
        &self.id
    }
}

impl Document for TransferRecord {
    fn document_id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Deserialize)]
struct DocumentList<T> {
    documents: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocument<'a, T> {
    document_id: String,
    data: &'a T,
}

/// Appwrite client
#[derive(Debug, Clone)]
pub struct AppwriteClient {
    client: Client,
    config: AppwriteConfig,
}

impl AppwriteClient {
    pub fn new(config: AppwriteConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn admin(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
    }

    fn as_session(&self, builder: RequestBuilder, secret: &str) -> RequestBuilder {
        builder
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Session", secret)
    }

    fn documents_url(&self, collection_id: &str) -> String {
        self.url(&format!(
            "/databases/{}/collections/{}/documents",
            self.config.database_id, collection_id
        ))
    }

    /// Every document where `attribute` equals `value`, following the
    /// cursor until a short page comes back
    async fn list_documents<T: DeserializeOwned + Document + Send>(
        &self,
        collection_id: &str,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<T>, ClientError> {
        let mut documents: Vec<T> = vec![];

        loop {
            let mut queries = vec![
                ("queries[]", equal_query(attribute, value)),
                ("queries[]", limit_query(PAGE_LIMIT)),
            ];
            if let Some(last) = documents.last() {
                queries.push(("queries[]", cursor_after_query(last.document_id())));
            }

            let response = self
                .admin(self.client.get(self.documents_url(collection_id)))
                .query(&queries)
                .send()
                .await
                .map_err(|e| ClientError::transport(SERVICE, e))?;

            let page: DocumentList<T> = decode(SERVICE, response).await?;
            let fetched = page.documents.len();
            documents.extend(page.documents);

            if fetched < PAGE_LIMIT {
                break;
            }
        }

        Ok(documents)
    }

    async fn create_document<T: Serialize + Sync, R: DeserializeOwned>(
        &self,
        collection_id: &str,
        data: &T,
    ) -> Result<R, ClientError> {
        let body = CreateDocument {
            document_id: unique_id(),
            data,
        };

        let response = self
            .admin(self.client.post(self.documents_url(collection_id)))
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        decode(SERVICE, response).await
    }
}

/// Fresh id accepted by Appwrite (at most 36 chars of `[a-z0-9]`)
fn unique_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Serialized `equal` query in Appwrite's JSON query syntax
fn equal_query(attribute: &str, value: &str) -> String {
    json!({
        "method": "equal",
        "attribute": attribute,
        "values": [value],
    })
    .to_string()
}

fn limit_query(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

fn cursor_after_query(document_id: &str) -> String {
    json!({ "method": "cursorAfter", "values": [document_id] }).to_string()
}

#[async_trait]
impl IdentityService for AppwriteClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<String, ClientError> {
        let response = self
            .admin(self.client.post(self.url("/users")))
            .json(&json!({
                "userId": unique_id(),
                "email": email,
                "password": password,
                "name": name,
            }))
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        let account: IdentityAccount = decode(SERVICE, response).await?;
        tracing::info!("Created identity account {}", account.id);
        Ok(account.id)
    }

    async fn create_session(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .admin(self.client.post(self.url("/account/sessions/email")))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        let session: Session = decode(SERVICE, response).await?;
        if session.secret.is_empty() {
            return Err(ClientError::MissingField {
                service: SERVICE,
                field: "secret",
            });
        }
        Ok(session)
    }

    async fn delete_session(&self, secret: &str) -> Result<(), ClientError> {
        let response = self
            .as_session(self.client.delete(self.url("/account/sessions/current")), secret)
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        check_status(SERVICE, response).await?;
        Ok(())
    }

    async fn get_current_account(
        &self,
        secret: &str,
    ) -> Result<Option<IdentityAccount>, ClientError> {
        let response = self
            .as_session(self.client.get(self.url("/account")), secret)
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        match decode(SERVICE, response).await {
            Ok(account) => Ok(Some(account)),
            Err(e) if e.is_unauthorized() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn find_user_document(&self, user_id: &str) -> Result<Option<User>, ClientError> {
        let users: Vec<User> = self
            .list_documents(&self.config.user_collection_id, "userId", user_id)
            .await?;
        Ok(users.into_iter().next())
    }

    async fn create_user_document(&self, user: &NewUser) -> Result<User, ClientError> {
        self.create_document(&self.config.user_collection_id, user)
            .await
    }

    async fn create_bank_document(
        &self,
        bank: &NewBankAccount,
    ) -> Result<BankAccount, ClientError> {
        self.create_document(&self.config.bank_collection_id, bank)
            .await
    }

    async fn list_bank_documents(
        &self,
        filter: &BankFilter,
    ) -> Result<Vec<BankAccount>, ClientError> {
        self.list_documents(
            &self.config.bank_collection_id,
            filter.attribute(),
            filter.value(),
        )
        .await
    }

    async fn get_bank_document(
        &self,
        document_id: &str,
    ) -> Result<Option<BankAccount>, ClientError> {
        let url = format!(
            "{}/{}",
            self.documents_url(&self.config.bank_collection_id),
            document_id
        );

        let response = self
            .admin(self.client.get(url))
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        match decode(SERVICE, response).await {
            Ok(bank) => Ok(Some(bank)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn list_transfer_documents(
        &self,
        bank_id: &str,
    ) -> Result<Vec<TransferRecord>, ClientError> {
        let collection = &self.config.transaction_collection_id;

        let mut transfers: Vec<TransferRecord> = self
            .list_documents(collection, "senderBankId", bank_id)
            .await?;
        let received: Vec<TransferRecord> = self
            .list_documents(collection, "receiverBankId", bank_id)
            .await?;
        transfers.extend(received);

        Ok(transfers)
    }
}
