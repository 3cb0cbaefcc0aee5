//! Account-service contract and its HTTPS implementation.
//!
//! Covers sign-up, email sessions, and current-account lookup, plus the
//! derived initials-avatar URL handed to fresh profiles.

use crate::error::Result;
use crate::http::HttpTransport;
use crate::wire;
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// An account held by the external account service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A login session for an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub account_id: String,
}

/// External account/auth service.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Register an account under the caller-generated id.
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account>;

    /// Open an email/password session (login).
    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session>;

    /// Close the session attached to the current client (logout).
    async fn delete_current_session(&self) -> Result<()>;

    /// The account behind the current session.
    async fn current_account(&self) -> Result<Account>;

    /// Derive the initials-avatar URL for a display name. Purely local.
    fn initials_avatar_url(&self, name: &str) -> Result<Url>;
}

/// Account service backed by the platform's account API.
pub struct HttpAccountService {
    transport: Arc<HttpTransport>,
}

impl HttpAccountService {
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }
}

fn account_from_value(value: Value) -> Result<Account> {
    let map = wire::object(value, "account")?;
    Ok(Account {
        id: wire::string_field(&map, "$id")?,
        name: wire::string_field(&map, "name")?,
        email: wire::string_field(&map, "email")?,
    })
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn create_account(
        &self,
        account_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account> {
        let body = serde_json::json!({
            "userId": account_id,
            "email": email,
            "password": password,
            "name": name,
        });
        let value = self
            .transport
            .request(Method::POST, "account", &[], Some(&body))
            .await?;
        let account = account_from_value(value)?;
        tracing::info!(account_id = %account.id, "account created");
        Ok(account)
    }

    async fn create_email_session(&self, email: &str, password: &str) -> Result<Session> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .transport
            .request(Method::POST, "account/sessions/email", &[], Some(&body))
            .await?;
        let map = wire::object(value, "session")?;
        Ok(Session {
            id: wire::string_field(&map, "$id")?,
            account_id: wire::string_field(&map, "userId")?,
        })
    }

    async fn delete_current_session(&self) -> Result<()> {
        self.transport
            .request(Method::DELETE, "account/sessions/current", &[], None)
            .await?;
        Ok(())
    }

    async fn current_account(&self) -> Result<Account> {
        let value = self
            .transport
            .request(Method::GET, "account", &[], None)
            .await?;
        account_from_value(value)
    }

    fn initials_avatar_url(&self, name: &str) -> Result<Url> {
        let mut url = self.transport.url("avatars/initials")?;
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("project", self.transport.project_id());
        Ok(url)
    }
}
