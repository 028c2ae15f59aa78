//! HTTP JSON client for the hosted document store.

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slipway_domain::{RemoteError, RemoteErrorCode};
use tracing::{debug, warn};
use url::Url;

use crate::config::RemoteStoreConfig;
use crate::errors::InfraError;

const API_KEY_HEADER: &str = "x-api-key";

/// JSON client over the document store REST surface.
///
/// Single-attempt by design: the only automatic retry anywhere is the
/// pending-sync sweep, so the client never retries on its own.
pub struct DocStoreClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl DocStoreClient {
    /// Build a client from the remote store configuration.
    pub fn new(config: &RemoteStoreConfig) -> Result<Self, InfraError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| InfraError::Http(format!("build http client: {err}")))?;

        let mut base = config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|err| InfraError::Config(format!("remote base url: {err}")))?;

        Ok(Self { http, base_url, api_key: config.api_key.clone() })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|err| RemoteError::new(RemoteErrorCode::Internal, err.to_string()))?;
        let mut builder = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        Ok(builder)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, RemoteError> {
        builder.send().await.map_err(|err| RemoteError::network(err.to_string()))
    }

    async fn parse<T: DeserializeOwned>(&self, response: Response) -> Result<T, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        response
            .json()
            .await
            .map_err(|err| RemoteError::new(RemoteErrorCode::Internal, format!("parse response: {err}")))
    }

    /// GET returning the deserialized document.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        debug!(path, "doc store GET");
        let response = self.send(self.request(Method::GET, path)?).await?;
        self.parse(response).await
    }

    /// GET where a 404 means "document absent", distinct from an error.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, RemoteError> {
        debug!(path, "doc store GET (optional)");
        let response = self.send(self.request(Method::GET, path)?).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        self.parse(response).await.map(Some)
    }

    /// GET with query parameters.
    pub async fn get_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        debug!(path, ?query, "doc store GET");
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder).await?;
        self.parse(response).await
    }

    /// POST returning the deserialized response document.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        debug!(path, "doc store POST");
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.send(builder).await?;
        self.parse(response).await
    }

    /// POST where the response body is irrelevant.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        debug!(path, "doc store POST");
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        Ok(())
    }

    /// PATCH merge write; the response body is irrelevant.
    pub async fn patch_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        debug!(path, "doc store PATCH");
        let builder = self.request(Method::PATCH, path)?.json(body);
        let response = self.send(builder).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(error_from_response(status, response).await);
        }
        Ok(())
    }

    /// Equality-filtered query ordered by `order_field` descending, with the
    /// documented degraded mode: when the store rejects the ordered form for
    /// lack of a composite index (`failed-precondition`), the same filter is
    /// retried unordered and the unordered results are returned.
    pub async fn query_ordered_desc<T: DeserializeOwned>(
        &self,
        path: &str,
        filter: &[(&str, &str)],
        order_field: &str,
    ) -> Result<Vec<T>, RemoteError> {
        let mut ordered: Vec<(&str, &str)> = filter.to_vec();
        ordered.push(("orderBy", order_field));
        ordered.push(("direction", "desc"));

        match self.get_query(path, &ordered).await {
            Ok(results) => Ok(results),
            Err(err) if err.code == RemoteErrorCode::FailedPrecondition => {
                warn!(path, order_field, "ordered query rejected, degrading to unordered");
                self.get_query(path, filter).await
            }
            Err(err) => Err(err),
        }
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

/// Translate a non-success response into a `RemoteError`.
///
/// The provider reports its own code inside the body (`failed-precondition`,
/// `unavailable`, ...); when the body carries one it wins over the blunt
/// HTTP status mapping.
async fn error_from_response(status: StatusCode, response: Response) -> RemoteError {
    let body = response.text().await.unwrap_or_default();

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(&body) {
        let value = serde_json::Value::String(parsed.error.code.clone());
        if let Ok(code) = serde_json::from_value::<RemoteErrorCode>(value) {
            let message = if parsed.error.message.is_empty() {
                parsed.error.code
            } else {
                parsed.error.message
            };
            return RemoteError::new(code, message);
        }
    }

    let code = match status {
        StatusCode::BAD_REQUEST => RemoteErrorCode::InvalidArgument,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => RemoteErrorCode::PermissionDenied,
        StatusCode::NOT_FOUND => RemoteErrorCode::NotFound,
        StatusCode::CONFLICT => RemoteErrorCode::AlreadyExists,
        StatusCode::PRECONDITION_FAILED => RemoteErrorCode::FailedPrecondition,
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            RemoteErrorCode::Unavailable
        }
        _ => RemoteErrorCode::Internal,
    };

    let message = if body.is_empty() { status.to_string() } else { body };
    RemoteError::new(code, message)
}
