//! Configuration module
//!
//! Loads configuration from environment variables once at startup.
//! Every hosted-service setting is required; the process refuses to start
//! when one is missing or malformed.

use std::env;

/// Identity / document store settings
#[derive(Debug, Clone)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub api_key: String,
    pub database_id: String,
    pub user_collection_id: String,
    pub bank_collection_id: String,
    pub transaction_collection_id: String,
}

/// Plaid environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaidEnvironment {
    Sandbox,
    Development,
    Production,
}

impl PlaidEnvironment {
    fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sandbox" => Some(Self::Sandbox),
            "development" => Some(Self::Development),
            "production" => Some(Self::Production),
            _ => None,
        }
    }

    /// Base URL of the Plaid API for this environment
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Sandbox => "https://sandbox.plaid.com",
            Self::Development => "https://development.plaid.com",
            Self::Production => "https://production.plaid.com",
        }
    }
}

/// Bank-data aggregation settings
#[derive(Debug, Clone)]
pub struct PlaidConfig {
    pub client_id: String,
    pub secret: String,
    pub environment: PlaidEnvironment,
    pub base_url: String,
    pub products: Vec<String>,
    pub country_codes: Vec<String>,
}

/// Dwolla environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DwollaEnvironment {
    Sandbox,
    Production,
}

/// Payment-rail settings
#[derive(Debug, Clone)]
pub struct DwollaConfig {
    pub key: String,
    pub secret: String,
    pub base_url: String,
    pub environment: DwollaEnvironment,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    pub appwrite: AppwriteConfig,
    pub plaid: PlaidConfig,
    pub dwolla: DwollaConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnv(name))
        };

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let appwrite = AppwriteConfig {
            endpoint: required("NEXT_PUBLIC_APPWRITE_ENDPOINT")?
                .trim_end_matches('/')
                .to_string(),
            project_id: required("NEXT_PUBLIC_APPWRITE_PROJECT")?,
            api_key: required("NEXT_APPWRITE_KEY")?,
            database_id: required("APPWRITE_DATABASE_ID")?,
            user_collection_id: required("APPWRITE_USER_COLLECTION_ID")?,
            bank_collection_id: required("APPWRITE_BANK_COLLECTION_ID")?,
            transaction_collection_id: required("APPWRITE_TRANSACTION_COLLECTION_ID")?,
        };

        let plaid_environment = PlaidEnvironment::parse(&required("PLAID_ENV")?)
            .ok_or(ConfigError::InvalidValue("PLAID_ENV"))?;

        let products = split_list(&required("PLAID_PRODUCTS")?);
        if products.is_empty() {
            return Err(ConfigError::InvalidValue("PLAID_PRODUCTS"));
        }

        let country_codes = split_list(&required("PLAID_COUNTRY_CODES")?);
        if country_codes.is_empty() {
            return Err(ConfigError::InvalidValue("PLAID_COUNTRY_CODES"));
        }

        let plaid = PlaidConfig {
            client_id: required("PLAID_CLIENT_ID")?,
            secret: required("PLAID_SECRET")?,
            environment: plaid_environment,
            base_url: lookup("PLAID_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| plaid_environment.base_url().to_string()),
            products,
            country_codes,
        };

        let dwolla_environment = match required("DWOLLA_ENV")?.to_ascii_lowercase().as_str() {
            "sandbox" => DwollaEnvironment::Sandbox,
            "production" => DwollaEnvironment::Production,
            _ => return Err(ConfigError::InvalidValue("DWOLLA_ENV")),
        };

        let dwolla = DwollaConfig {
            key: required("DWOLLA_KEY")?,
            secret: required("DWOLLA_SECRET")?,
            base_url: required("DWOLLA_BASE_URL")?.trim_end_matches('/').to_string(),
            environment: dwolla_environment,
        };

        Ok(Self {
            host,
            port,
            appwrite,
            plaid,
            dwolla,
        })
    }

    /// Check if running against production services
    pub fn is_production(&self) -> bool {
        self.plaid.environment == PlaidEnvironment::Production
            && self.dwolla.environment == DwollaEnvironment::Production
    }
}

/// Split a comma separated list, dropping blanks
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration error types
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
