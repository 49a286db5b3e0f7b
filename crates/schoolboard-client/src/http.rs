//! REST backend over reqwest.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::instrument;

use schoolboard_core::error::ApiError;
use schoolboard_core::model::ResourceKind;
use schoolboard_core::session::Session;
use schoolboard_core::traits::{Credentials, SchoolApi};

use crate::envelope::{extract_error_message, normalize_item, normalize_list, parse_login};

const LOGIN_PATH: &str = "/auth/login";

/// The school-management REST API.
pub struct HttpBackend {
    base_url: String,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, ApiError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, path))
            .map_err(|e| ApiError::Network(format!("invalid URL: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    /// URL of one record. The id becomes a single escaped path segment.
    fn item_endpoint(&self, kind: ResourceKind, id: &str) -> Result<Url, ApiError> {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(ApiError::NotFound(format!("invalid {kind} id '{id}'")));
        }
        let mut url = self.endpoint(kind.path(), &[])?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Network(format!("invalid URL: {}", self.base_url)))?
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, session: &Session) -> Result<RequestBuilder, ApiError> {
        let token = session.bearer_token()?;
        Ok(self
            .client
            .request(method, url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Accept", "application/json"))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout_secs)
            } else {
                ApiError::Network(e.to_string())
            }
        })?;
        check_status(response).await
    }

    async fn send_json(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = self.send(request).await?;
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("response is not JSON: {e}")))
    }
}

/// Map non-success responses onto `ApiError`, keeping the backend's message.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body);
    tracing::debug!(status = status.as_u16(), %message, "request failed");

    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Api {
            status: status.as_u16(),
            message,
        },
    })
}

#[async_trait]
impl SchoolApi for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<Session, ApiError> {
        let request = self
            .client
            .post(self.endpoint(LOGIN_PATH, &[])?)
            .json(credentials);
        let body = self.send_json(request).await?;
        let payload = parse_login(body)?;
        Ok(Session::from_login(
            payload.access_token,
            payload.user,
            payload.expires_in,
            Utc::now(),
        ))
    }

    #[instrument(skip(self, session, query), fields(resource = %kind))]
    async fn list(
        &self,
        session: &Session,
        kind: ResourceKind,
        query: &[(&str, &str)],
    ) -> Result<Vec<Value>, ApiError> {
        let request = self.request(Method::GET, self.endpoint(kind.path(), query)?, session)?;
        let body = self.send_json(request).await?;
        let items = normalize_list(body);
        tracing::debug!(count = items.len(), "fetched");
        Ok(items)
    }

    #[instrument(skip(self, session), fields(resource = %kind))]
    async fn get(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<Value, ApiError> {
        let request = self.request(Method::GET, self.item_endpoint(kind, id)?, session)?;
        Ok(normalize_item(self.send_json(request).await?))
    }

    #[instrument(skip(self, session, body), fields(resource = %kind))]
    async fn create(
        &self,
        session: &Session,
        kind: ResourceKind,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let request = self.request(Method::POST, self.endpoint(kind.path(), &[])?, session)?.json(body);
        Ok(normalize_item(self.send_json(request).await?))
    }

    #[instrument(skip(self, session, body), fields(resource = %kind))]
    async fn update(
        &self,
        session: &Session,
        kind: ResourceKind,
        id: &str,
        body: &Map<String, Value>,
    ) -> Result<Value, ApiError> {
        let request = self
            .request(Method::PUT, self.item_endpoint(kind, id)?, session)?
            .json(body);
        Ok(normalize_item(self.send_json(request).await?))
    }

    #[instrument(skip(self, session), fields(resource = %kind))]
    async fn delete(&self, session: &Session, kind: ResourceKind, id: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, self.item_endpoint(kind, id)?, session)?;
        self.send(request).await?;
        Ok(())
    }
}
