//! User and session types
//!
//! Documents stored in the user collection plus the identity service's
//! account and session shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity-service account attached to a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityAccount {
    #[serde(rename = "$id")]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
}

/// A logged-in session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    pub user_id: String,
    /// Opaque secret stored in the session cookie
    #[serde(default)]
    pub secret: String,
    pub expire: DateTime<Utc>,
}

/// User document as persisted in the user collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "$id")]
    pub id: String,
    /// Identity-service account id
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default, skip_serializing)]
    pub ssn: String,
    pub dwolla_customer_url: String,
    pub dwolla_customer_id: String,
}

impl User {
    /// Display name, as given to the identity service at sign-up
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields written when creating a user document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub dwolla_customer_url: String,
    pub dwolla_customer_id: String,
}

/// Sign-up form input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignUpParams {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
}

impl SignUpParams {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Sign-in form input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignInParams {
    pub email: String,
    pub password: String,
}

/// Personal details submitted to the payment rail when registering a customer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub customer_type: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
}

impl From<&SignUpParams> for NewCustomer {
    fn from(params: &SignUpParams) -> Self {
        Self {
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            email: params.email.clone(),
            customer_type: "personal".to_string(),
            address1: params.address1.clone(),
            city: params.city.clone(),
            state: params.state.clone(),
            postal_code: params.postal_code.clone(),
            date_of_birth: params.date_of_birth.clone(),
            ssn: params.ssn.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_document_from_store_json() {
        let json = serde_json::json!({
            "$id": "doc-1",
            "userId": "acct-1",
            "email": "jane@example.com",
            "firstName": "Jane",
            "lastName": "Doe",
            "address1": "1 Main St",
            "city": "Springfield",
            "state": "NY",
            "postalCode": "10001",
            "dateOfBirth": "1990-01-01",
            "ssn": "1234",
            "dwollaCustomerUrl": "https://api-sandbox.dwolla.com/customers/c-1",
            "dwollaCustomerId": "c-1",
            "$createdAt": "2024-01-01T00:00:00.000+00:00"
        });

        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.id, "doc-1");
        assert_eq!(user.user_id, "acct-1");
        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.ssn, "1234");
    }

    #[test]
    fn test_ssn_never_serialized() {
        let user = User {
            id: "doc-1".to_string(),
            user_id: "acct-1".to_string(),
            email: "jane@example.com".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            address1: String::new(),
            city: String::new(),
            state: String::new(),
            postal_code: String::new(),
            date_of_birth: String::new(),
            ssn: "1234".to_string(),
            dwolla_customer_url: String::new(),
            dwolla_customer_id: String::new(),
        };

        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("ssn").is_none());
        assert_eq!(value["$id"], "doc-1");
    }

    #[test]
    fn test_customer_is_personal() {
        let params = SignUpParams {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            password: "password123".to_string(),
            address1: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "NY".to_string(),
            postal_code: "10001".to_string(),
            date_of_birth: "1990-01-01".to_string(),
            ssn: "1234".to_string(),
        };

        let customer = NewCustomer::from(&params);
        let value = serde_json::to_value(&customer).unwrap();
        assert_eq!(value["type"], "personal");
        assert_eq!(value["postalCode"], "10001");
        assert_eq!(params.full_name(), "Jane Doe");
    }
}
