//! The API request gateway.
//!
//! Every HTTP call the application makes goes through [`ApiGateway`], so
//! authentication headers, error interpretation, and session-expiry
//! handling are applied in exactly one place. The gateway performs no
//! retries; retry policy belongs to the calling data-fetch layer.
//!
//! # 401 handling
//!
//! A 401 response takes one of three branches, checked in order:
//!
//! 1. **Auth-flow endpoint** (login/register/password reset): raised
//!    as-is, so forms can show precise credential-rejection messages.
//! 2. **Public endpoint or public page**: raised as-is with the stored
//!    token untouched; the absence of a session is expected there.
//! 3. **Protected endpoint on a non-public page**: the stored token is
//!    cleared, the injected session-expired callback runs, and the error
//!    is still raised so in-flight UI can react.

use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::GatewayConfig;
use crate::credentials::{CredentialStore, SessionTokens};
use crate::endpoints::{self, EndpointClass};
use crate::envelope::{ApiResponse, ErrorEnvelope};
use crate::errors::ApiError;
use crate::Result;

type SessionExpiredCallback = Box<dyn Fn() + Send + Sync>;

/// Session-aware HTTP gateway over a credential store `S`.
pub struct ApiGateway<S> {
    config: GatewayConfig,
    client: reqwest::Client,
    tokens: SessionTokens<S>,
    current_page: RwLock<Option<String>>,
    on_session_expired: Option<SessionExpiredCallback>,
}

impl<S: CredentialStore> ApiGateway<S> {
    /// Create a gateway with the given configuration and credential store.
    ///
    /// The underlying client keeps a cookie jar, so session cookies are
    /// carried on every request alongside the bearer header.
    pub fn new(config: GatewayConfig, store: S) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            client,
            tokens: SessionTokens::new(store),
            current_page: RwLock::new(None),
            on_session_expired: None,
        })
    }

    /// Install the session-expired strategy.
    ///
    /// The hosting application decides what expiry means: a browser shell
    /// navigates to `/login`, a TUI swaps screens, a test flips a flag.
    pub fn with_session_expired<F>(mut self, callback: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_session_expired = Some(Box::new(callback));
        self
    }

    /// Record the page route the host is currently showing.
    ///
    /// Until set, the gateway assumes a non-public page, so a 401 on a
    /// protected endpoint invalidates the session.
    pub fn set_current_page(&self, page: impl Into<String>) {
        if let Ok(mut slot) = self.current_page.write() {
            *slot = Some(page.into());
        }
    }

    /// Session token view backed by the injected store.
    pub fn session(&self) -> &SessionTokens<S> {
        &self.tokens
    }

    /// Gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Issue a GET request with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Option<&[(&str, &str)]>,
    ) -> Result<ApiResponse<T>> {
        self.dispatch(Method::GET, path, params, Option::<&()>::None)
            .await
    }

    /// Issue a POST request with an optional JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        self.dispatch(Method::POST, path, None, body).await
    }

    /// Issue a PATCH request with an optional JSON body.
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        self.dispatch(Method::PATCH, path, None, body).await
    }

    /// Issue a PUT request with an optional JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>> {
        self.dispatch(Method::PUT, path, None, body).await
    }

    /// Issue a DELETE request.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<ApiResponse<T>> {
        self.dispatch(Method::DELETE, path, None, Option::<&()>::None)
            .await
    }

    /// Build the full URL for a request path.
    ///
    /// Absolute URLs pass through verbatim. Same-origin-forced paths
    /// resolve against the application origin regardless of the configured
    /// API base; everything else prefers the API base when one is set.
    pub fn build_url(&self, path: &str) -> String {
        if endpoints::is_absolute_url(path) {
            return path.to_string();
        }
        if endpoints::is_same_origin(path) {
            return join(&self.config.origin, path);
        }
        match &self.config.api_base_url {
            Some(base) => join(base, path),
            None => join(&self.config.origin, path),
        }
    }

    /// Shared dispatcher behind every verb.
    async fn dispatch<T, B>(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, &str)]>,
        body: Option<&B>,
    ) -> Result<ApiResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.build_url(path);
        debug!(%method, %url, "dispatching API request");

        let mut request = self.client.request(method.clone(), url.as_str());

        if let Some(params) = params {
            request = request.query(params);
        }

        // GET/HEAD skip the content type so read-only calls stay free of
        // CORS preflights.
        if method != Method::GET && method != Method::HEAD {
            request = request.header(CONTENT_TYPE, "application/json");
        }

        if let Some(token) = self.tokens.token().await? {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<ApiResponse<T>>()
                .await
                .map_err(|e| ApiError::network(format!("failed to parse response body: {}", e)));
        }

        let body_text = response.text().await.unwrap_or_default();
        let envelope: Option<ErrorEnvelope> = serde_json::from_str(&body_text).ok();
        let error = match &envelope {
            Some(env) => ApiError::from_envelope(status.as_u16(), env),
            None if body_text.is_empty() => ApiError::new(status.as_u16(), "request failed"),
            None => ApiError::new(status.as_u16(), body_text),
        };

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(path).await;
        }

        Err(error)
    }

    /// Apply the three-branch 401 policy for `path`.
    ///
    /// Only the protected branch has side effects; failures while clearing
    /// the token are logged, never allowed to mask the original error.
    async fn handle_unauthorized(&self, path: &str) {
        match endpoints::classify(path) {
            EndpointClass::AuthFlow | EndpointClass::Public => {}
            EndpointClass::Protected => {
                if self.current_page_is_public() {
                    return;
                }
                warn!(path, "session rejected on protected endpoint, clearing stored token");
                if let Err(store_err) = self.tokens.clear().await {
                    warn!(error = %store_err, "failed to clear session token");
                }
                if let Some(callback) = &self.on_session_expired {
                    callback();
                }
            }
        }
    }

    fn current_page_is_public(&self) -> bool {
        self.current_page
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .is_some_and(|page| endpoints::is_public_page(&page))
    }

    fn map_transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::network(format!(
                "request timed out after {}s",
                self.config.timeout_secs
            ))
        } else if e.is_connect() {
            ApiError::network(format!("connection failed: {}", e))
        } else {
            ApiError::network(format!("request failed: {}", e))
        }
    }
}

fn join(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}
