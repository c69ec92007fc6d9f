//! Shared application state
//!
//! Clients are built once from `Config` and shared by every request.

use std::sync::Arc;

use crate::actions::{BankActions, UserActions};
use crate::clients::{
    AggregationService, AppwriteClient, DwollaClient, IdentityService, PaymentRailService,
    PlaidClient,
};
use crate::config::Config;
use crate::home_view::HomeViewSignal;

#[derive(Clone)]
pub struct AppState {
    pub users: UserActions,
    pub banks: BankActions,
}

impl AppState {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        aggregation: Arc<dyn AggregationService>,
        payments: Arc<dyn PaymentRailService>,
    ) -> Self {
        Self {
            users: UserActions::new(identity.clone(), payments.clone()),
            banks: BankActions::new(identity, aggregation, payments, HomeViewSignal::new()),
        }
    }

    /// Build the REST clients for the configured services
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(AppwriteClient::new(config.appwrite.clone())),
            Arc::new(PlaidClient::new(config.plaid.clone())),
            Arc::new(DwollaClient::new(config.dwolla.clone())),
        )
    }
}
