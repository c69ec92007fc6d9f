//! Dwolla REST client
//!
//! Each call first obtains an application token with the client-credentials
//! grant. Created resources are identified by the `Location` header of the
//! response, not by the body.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::DwollaConfig;
use crate::domain::NewCustomer;

use super::error::{check_status, decode, encode, ClientError, Service};
use super::PaymentRailService;

const SERVICE: Service = Service::Dwolla;

const HAL_JSON: &str = "application/vnd.dwolla.v1.hal+json";

/// Customer id from a customer URL: the last `/`-separated segment.
///
/// `None` when the URL ends in a separator.
pub fn extract_customer_id(customer_url: &str) -> Option<&str> {
    customer_url
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct Link {
    href: String,
}

#[derive(Debug, Deserialize)]
struct AuthorizationLinks {
    #[serde(rename = "self")]
    this: Link,
}

#[derive(Debug, Deserialize)]
struct OnDemandAuthorization {
    #[serde(rename = "_links")]
    links: AuthorizationLinks,
}

/// Dwolla client
#[derive(Debug, Clone)]
pub struct DwollaClient {
    client: Client,
    config: DwollaConfig,
}

impl DwollaClient {
    pub fn new(config: DwollaConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn access_token(&self) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url("/token"))
            .basic_auth(&self.config.key, Some(&self.config.secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        let token: TokenResponse = decode(SERVICE, response).await?;
        Ok(token.access_token)
    }

    async fn post(&self, path: &str, body: &Value) -> Result<Response, ClientError> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .header(ACCEPT, HAL_JSON)
            .header(CONTENT_TYPE, HAL_JSON)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::transport(SERVICE, e))?;

        check_status(SERVICE, response).await
    }
}

fn location(response: &Response) -> Option<String> {
    response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl PaymentRailService for DwollaClient {
    async fn create_customer(&self, customer: &NewCustomer) -> Result<String, ClientError> {
        let body = encode(SERVICE, customer)?;

        let response = self.post("/customers", &body).await?;

        let url = location(&response).ok_or(ClientError::MissingField {
            service: SERVICE,
            field: "Location",
        })?;
        tracing::info!("Created payment customer {}", url);
        Ok(url)
    }

    async fn add_funding_source(
        &self,
        customer_id: &str,
        processor_token: &str,
        bank_name: &str,
    ) -> Result<Option<String>, ClientError> {
        let response = self.post("/on-demand-authorizations", &json!({})).await?;
        let authorization: OnDemandAuthorization =
            response.json().await.map_err(|e| ClientError::Decode {
                service: SERVICE,
                message: e.to_string(),
            })?;

        let body = json!({
            "plaidToken": processor_token,
            "name": bank_name,
            "_links": {
                "on-demand-authorization": { "href": authorization.links.this.href }
            }
        });

        let response = self
            .post(&format!("/customers/{}/funding-sources", customer_id), &body)
            .await?;

        Ok(location(&response))
    }
}
