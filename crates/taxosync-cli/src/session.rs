//! Authenticated session against the remote store
//!
//! The store uses Django-style session auth: a CSRF token travels as a
//! cookie and must be echoed back in an `X-CSRFToken` header on every
//! mutating request. [`Session::connect`] probes `/context/login/` to
//! obtain the token and the available collections, [`Session::login`]
//! establishes the user session for one collection.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use taxosync_core::GatewayError;

use crate::api::endpoints;
use crate::api::types::{parse_resource_id, LoginContext};
use crate::config::RunConfig;
use crate::error::{CliError, Result};

const CSRF_COOKIE: &str = "csrftoken";
const CSRF_HEADER: &str = "X-CSRFToken";

/// Logged-in HTTP session holding the CSRF token and user context.
pub struct Session {
    client: reqwest::Client,
    base_url: String,
    csrf_token: String,
    collections: HashMap<String, i64>,
    user_uri: Option<String>,
    collection_id: Option<i64>,
}

impl Session {
    /// Open an anonymous session: fetch the CSRF token and the
    /// collections available on this server.
    pub async fn connect(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(RunConfig::api_timeout_secs()))
            .build()?;

        let response = client.get(endpoints::login_url(base_url)).send().await?;
        let csrf_token = cookie_value(&response, CSRF_COOKIE)
            .ok_or_else(|| CliError::api("server did not send a CSRF token"))?;
        let context: LoginContext = response.json().await?;

        debug!(
            collections = context.collections.len(),
            "connected to remote store"
        );

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            csrf_token,
            collections: context.collections,
            user_uri: None,
            collection_id: None,
        })
    }

    /// Log in as `username` into the named collection.
    pub async fn login(&mut self, username: &str, password: &str, collection: &str) -> Result<()> {
        let collection_id = *self.collections.get(collection).ok_or_else(|| {
            let mut known: Vec<&str> = self.collections.keys().map(String::as_str).collect();
            known.sort_unstable();
            CliError::auth(format!(
                "unknown collection '{}' (available: {})",
                collection,
                known.join(", ")
            ))
        })?;

        let response = self
            .client
            .put(endpoints::login_url(&self.base_url))
            .header(CSRF_HEADER, &self.csrf_token)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "collection": collection_id,
            }))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::FORBIDDEN {
            return Err(CliError::auth(format!(
                "server rejected credentials for '{username}'"
            )));
        }
        if !response.status().is_success() {
            return Err(CliError::api(format!(
                "login failed with status {}",
                response.status()
            )));
        }

        // The token rotates on login; pick up the fresh one.
        if let Some(token) = cookie_value(&response, CSRF_COOKIE) {
            self.csrf_token = token;
        }

        let user: Value = self
            .client
            .get(endpoints::user_url(&self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        let user_uri = user
            .get("resource_uri")
            .and_then(Value::as_str)
            .ok_or_else(|| CliError::api("user context has no resource_uri"))?
            .to_string();

        info!(username, collection, collection_id, "logged in");
        self.user_uri = Some(user_uri);
        self.collection_id = Some(collection_id);
        Ok(())
    }

    /// Resource URI of the logged-in user.
    pub fn user_uri(&self) -> Result<&str> {
        self.user_uri
            .as_deref()
            .ok_or_else(|| CliError::auth("not logged in".to_string()))
    }

    /// Id of the collection the session is scoped to.
    pub fn collection_id(&self) -> Result<i64> {
        self.collection_id
            .ok_or_else(|| CliError::auth("not logged in".to_string()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Walk collection -> discipline and return the discipline id.
    pub async fn discipline_id(&self) -> Result<i64> {
        let collection = self
            .get_json(&endpoints::resource_url(
                &self.base_url,
                "collection",
                self.collection_id()?,
            ))
            .await?;
        let uri = collection
            .get("discipline")
            .and_then(Value::as_str)
            .ok_or_else(|| CliError::api("collection has no discipline"))?;
        parse_resource_id(uri)
            .ok_or_else(|| CliError::api(format!("malformed discipline URI '{uri}'")))
    }

    // ------------------------------------------------------------------
    // Low-level JSON requests used by the gateway. Error mapping follows
    // the gateway contract so row processing can classify failures.
    // ------------------------------------------------------------------

    pub async fn get_json(&self, url: &str) -> std::result::Result<Value, GatewayError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        read_json(response, reqwest::StatusCode::OK).await
    }

    pub async fn post_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<Value, GatewayError> {
        let response = self
            .client
            .post(url)
            .header(CSRF_HEADER, &self.csrf_token)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        read_json(response, reqwest::StatusCode::CREATED).await
    }

    pub async fn put_json(
        &self,
        url: &str,
        body: &Value,
    ) -> std::result::Result<Value, GatewayError> {
        let response = self
            .client
            .put(url)
            .header(CSRF_HEADER, &self.csrf_token)
            .json(body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;
        read_json(response, reqwest::StatusCode::OK).await
    }
}

/// Extract a cookie value from a response.
fn cookie_value(response: &reqwest::Response, name: &str) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.value().to_string())
}

async fn read_json(
    response: reqwest::Response,
    expected: reqwest::StatusCode,
) -> std::result::Result<Value, GatewayError> {
    let status = response.status();
    if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
        return Err(GatewayError::Unauthorized(format!("status {status}")));
    }
    if status != expected {
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::rejected(format!("status {status}: {body}")));
    }
    response
        .json()
        .await
        .map_err(|e| GatewayError::malformed(e.to_string()))
}
