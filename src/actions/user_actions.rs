//! User Actions
//!
//! Sign-up, sign-in, logout and profile lookups.

use std::sync::Arc;

use crate::clients::{extract_customer_id, IdentityService, PaymentRailService};
use crate::domain::validation::{validate_sign_in, validate_sign_up};
use crate::domain::{NewCustomer, NewUser, Session, SignInParams, SignUpParams, User};
use crate::error::{AppError, AppResult};

/// A user together with the session that was opened for them
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub session: Session,
}

/// Orchestration of identity and customer registration
#[derive(Clone)]
pub struct UserActions {
    identity: Arc<dyn IdentityService>,
    payments: Arc<dyn PaymentRailService>,
}

impl UserActions {
    pub fn new(identity: Arc<dyn IdentityService>, payments: Arc<dyn PaymentRailService>) -> Self {
        Self { identity, payments }
    }

    /// Register a user and open a session for them.
    ///
    /// Steps run in order and stop at the first failure. Nothing created by
    /// an earlier step is rolled back.
    pub async fn sign_up(&self, params: SignUpParams) -> AppResult<SignedIn> {
        validate_sign_up(&params)?;

        let account_id = self
            .identity
            .create_account(&params.email, &params.password, &params.full_name())
            .await
            .map_err(|e| {
                if e.is_conflict() {
                    AppError::EmailAlreadyRegistered
                } else {
                    AppError::from(e)
                }
            })?;

        let customer_url = self
            .payments
            .create_customer(&NewCustomer::from(&params))
            .await?;

        let customer_id = extract_customer_id(&customer_url)
            .ok_or_else(|| {
                AppError::MalformedUpstream(format!("customer url without id: {}", customer_url))
            })?
            .to_string();

        let user = self
            .identity
            .create_user_document(&NewUser {
                user_id: account_id,
                email: params.email.clone(),
                first_name: params.first_name,
                last_name: params.last_name,
                address1: params.address1,
                city: params.city,
                state: params.state,
                postal_code: params.postal_code,
                date_of_birth: params.date_of_birth,
                ssn: params.ssn,
                dwolla_customer_url: customer_url,
                dwolla_customer_id: customer_id,
            })
            .await?;

        let session = self
            .identity
            .create_session(&params.email, &params.password)
            .await?;

        tracing::info!("Signed up user {}", user.id);
        Ok(SignedIn { user, session })
    }

    /// Open a session and load the user document behind it
    pub async fn sign_in(&self, params: SignInParams) -> AppResult<SignedIn> {
        validate_sign_in(&params)?;

        let session = self
            .identity
            .create_session(&params.email, &params.password)
            .await
            .map_err(|e| {
                if e.is_unauthorized() {
                    AppError::InvalidCredentials
                } else {
                    AppError::from(e)
                }
            })?;

        let user = self
            .identity
            .find_user_document(&session.user_id)
            .await?
            .ok_or_else(|| AppError::UserNotFound(session.user_id.clone()))?;

        tracing::info!("Signed in user {}", user.id);
        Ok(SignedIn { user, session })
    }

    /// End the session behind `secret`.
    ///
    /// Succeeds when there is no session or it is already gone.
    pub async fn logout(&self, secret: Option<&str>) -> AppResult<()> {
        let Some(secret) = secret else {
            return Ok(());
        };

        match self.identity.delete_session(secret).await {
            Ok(()) => Ok(()),
            Err(e) if e.is_unauthorized() || e.is_not_found() => {
                tracing::debug!("Session already ended: {}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// User behind a session secret; every failure reads as signed out
    pub async fn get_logged_in_user(&self, secret: &str) -> Option<User> {
        let account = match self.identity.get_current_account(secret).await {
            Ok(account) => account?,
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                return None;
            }
        };

        match self.get_user_info(&account.id).await {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!("User lookup failed for {}: {}", account.id, e);
                None
            }
        }
    }

    /// User document by identity id
    pub async fn get_user_info(&self, user_id: &str) -> AppResult<Option<User>> {
        Ok(self.identity.find_user_document(user_id).await?)
    }
}
