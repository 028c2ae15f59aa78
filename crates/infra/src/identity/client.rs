//! HTTP client for the hosted identity provider.
//!
//! Account deletion exists only as the registration workflow's compensating
//! action; there is no user-facing delete-account feature.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use slipway_core::identity::ports::{AuthSession, IdentityPort, SessionEvent};
use slipway_domain::{IdentityError, IdentityErrorKind};
use tokio::sync::watch;
use tracing::{debug, info};
use url::Url;

use crate::config::IdentityProviderConfig;
use crate::errors::InfraError;

const API_KEY_HEADER: &str = "x-api-key";

/// Broadcasts session transitions over a watch channel.
///
/// New subscribers observe the current state immediately, so the startup
/// session (or its absence) is always delivered.
pub struct SessionHub {
    tx: watch::Sender<SessionEvent>,
}

impl Default for SessionHub {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHub {
    /// Create a hub in the signed-out state.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionEvent::SignedOut);
        Self { tx }
    }

    /// Publish a transition to every subscriber.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.tx.send(event);
    }

    /// Subscribe to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionEvent> {
        self.tx.subscribe()
    }
}

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AccountDoc {
    id: String,
    #[serde(default)]
    email: String,
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
}

/// HTTP implementation of the identity provider port.
pub struct HttpIdentityClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    hub: SessionHub,
}

impl HttpIdentityClient {
    /// Build a client from the identity provider configuration.
    pub fn new(config: &IdentityProviderConfig) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| InfraError::Http(format!("build http client: {err}")))?;

        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| InfraError::Config(format!("identity base url: {err}")))?;

        Ok(Self { http, base_url, api_key: config.api_key.clone(), hub: SessionHub::new() })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, IdentityError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| IdentityError::new(IdentityErrorKind::Internal, err.to_string()))?;
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, IdentityError> {
        builder
            .send()
            .await
            .map_err(|err| IdentityError::new(IdentityErrorKind::Network, err.to_string()))
    }

    async fn check(&self, response: Response) -> Result<Response, IdentityError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(error_from_response(status, response).await)
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    code: String,
    #[serde(default)]
    message: String,
}

async fn error_from_response(status: StatusCode, response: Response) -> IdentityError {
    let body = response.text().await.unwrap_or_default();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        let kind = match parsed.error.code.as_str() {
            "email-in-use" | "email-already-in-use" => IdentityErrorKind::EmailInUse,
            "invalid-credentials" | "wrong-password" => IdentityErrorKind::InvalidCredentials,
            "weak-password" => IdentityErrorKind::WeakPassword,
            "user-not-found" => IdentityErrorKind::UserNotFound,
            _ => kind_from_status(status),
        };
        let message = if parsed.error.message.is_empty() {
            parsed.error.code
        } else {
            parsed.error.message
        };
        return IdentityError::new(kind, message);
    }

    let message = if body.is_empty() { status.to_string() } else { body };
    IdentityError::new(kind_from_status(status), message)
}

fn kind_from_status(status: StatusCode) -> IdentityErrorKind {
    match status {
        StatusCode::CONFLICT => IdentityErrorKind::EmailInUse,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => IdentityErrorKind::InvalidCredentials,
        StatusCode::BAD_REQUEST => IdentityErrorKind::WeakPassword,
        StatusCode::NOT_FOUND => IdentityErrorKind::UserNotFound,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            IdentityErrorKind::Network
        }
        _ => IdentityErrorKind::Internal,
    }
}

#[async_trait]
impl IdentityPort for HttpIdentityClient {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<String, IdentityError> {
        debug!(email, "creating identity account");
        let builder =
            self.request(Method::POST, "accounts")?.json(&CredentialsBody { email, password });
        let response = self.check(self.send(builder).await?).await?;
        let account: AccountDoc = response
            .json()
            .await
            .map_err(|err| IdentityError::new(IdentityErrorKind::Internal, err.to_string()))?;
        info!(account_id = %account.id, "identity account created");
        Ok(account.id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, IdentityError> {
        debug!(email, "signing in");
        let builder =
            self.request(Method::POST, "sessions")?.json(&CredentialsBody { email, password });
        let response = self.check(self.send(builder).await?).await?;
        let account: AccountDoc = response
            .json()
            .await
            .map_err(|err| IdentityError::new(IdentityErrorKind::Internal, err.to_string()))?;

        let session = AuthSession {
            account_id: account.id,
            email: if account.email.is_empty() { email.to_string() } else { account.email },
            display_name: account.display_name,
        };
        self.hub.emit(SessionEvent::SignedIn(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        let builder = self.request(Method::DELETE, "sessions/current")?;
        let response = self.send(builder).await?;
        // The local session ends regardless of what the server thought of it
        self.hub.emit(SessionEvent::SignedOut);
        self.check(response).await.map(|_| ())
    }

    async fn delete_account(&self, account_id: &str) -> Result<(), IdentityError> {
        let builder = self.request(Method::DELETE, &format!("accounts/{account_id}"))?;
        let response = self.send(builder).await?;
        self.check(response).await.map(|_| ())
    }

    fn subscribe_sessions(&self) -> watch::Receiver<SessionEvent> {
        self.hub.subscribe()
    }
}
