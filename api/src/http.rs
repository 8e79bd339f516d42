//! The request pipeline every API call goes through.
//!
//! DESIGN
//! ======
//! `ApiClient::execute` is the only place a request leaves the process. It
//! reads the session credential at send time and attaches it as
//! `X-auth-token`. On the way back a 401 means the credential is dead: the
//! session is cleared, cached responses are dropped and the navigator is sent
//! to `/login`. The password-reset and OTP endpoints are exempt; a 401 there
//! answers "wrong code" and is returned as an ordinary business error.
//!
//! A forced logout does not cancel other requests already in flight. Late
//! identity results and late cacheable bodies are fenced by the session
//! generation instead.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{StatusCode, Url};
use serde::Serialize;
use serde_json::Value;
use session::{Credential, LOGIN_PATH, Navigator, Session};

use crate::cache::QueryCache;
use crate::config::{AUTH_HEADER, ClientConfig};
use crate::endpoint::Endpoint;
use crate::error::{ApiError, server_message};

/// Request body variants the API accepts.
pub(crate) enum Payload {
    Empty,
    Json(Value),
    Form(Vec<(&'static str, String)>),
    Multipart(reqwest::multipart::Form),
}

impl Payload {
    /// Serialize `body` as a JSON payload.
    pub(crate) fn json<T: Serialize>(endpoint: &Endpoint, body: &T) -> Result<Self, ApiError> {
        serde_json::to_value(body)
            .map(Self::Json)
            .map_err(|e| ApiError::Encode { endpoint: endpoint.name(), message: e.to_string() })
    }

    fn cache_suffix(&self) -> String {
        match self {
            Self::Json(body) => body.to_string(),
            _ => String::new(),
        }
    }
}

/// Authorized client for the supplier API. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Session,
    navigator: Arc<dyn Navigator>,
    cache: Arc<QueryCache>,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the TLS backend cannot be
    /// initialized.
    pub fn new(config: &ClientConfig, session: Session, navigator: Arc<dyn Navigator>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone(), session, navigator, cache: Arc::new(QueryCache::new()) })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Send with whatever credential the session holds right now.
    pub(crate) async fn execute(&self, endpoint: &Endpoint, payload: Payload) -> Result<Value, ApiError> {
        let token = self.session.token();
        self.execute_as(endpoint, payload, token.as_ref()).await
    }

    /// Serve from the cache while fresh, otherwise send and remember the body.
    ///
    /// A body fetched under a credential that was replaced or cleared while
    /// the request was in flight is returned but not cached.
    pub(crate) async fn execute_cached(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
        ttl: Duration,
    ) -> Result<Value, ApiError> {
        let key = format!("{} {}", endpoint.path(), payload.cache_suffix());
        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!(endpoint = endpoint.name(), "cache hit");
            return Ok(hit);
        }
        let generation = self.session.generation();
        let body = self.execute(endpoint, payload).await?;
        if self.session.generation() == generation {
            self.cache.insert(key, ttl, body.clone());
        } else {
            tracing::debug!(endpoint = endpoint.name(), "session changed in flight; not caching");
        }
        Ok(body)
    }

    /// Send with an explicit credential, for validating one the session
    /// has not adopted yet. The 401 handling is the same as [`Self::execute`].
    pub(crate) async fn execute_as(
        &self,
        endpoint: &Endpoint,
        payload: Payload,
        token: Option<&Credential>,
    ) -> Result<Value, ApiError> {
        let name = endpoint.name();
        let url = self.url(endpoint)?;
        tracing::debug!(endpoint = name, method = %endpoint.method(), authorized = token.is_some(), "request");

        let mut request = self.http.request(endpoint.method(), url);
        if let Some(token) = token {
            request = request.header(AUTH_HEADER, token.as_str());
        }
        request = match payload {
            Payload::Empty => request,
            Payload::Json(body) => request.json(&body),
            Payload::Form(fields) => request.form(&fields),
            Payload::Multipart(form) => request.multipart(form),
        };

        let response = request.send().await.map_err(|e| ApiError::transport(name, e))?;
        let status = response.status();
        let text = response.text().await.map_err(|e| ApiError::transport(name, e))?;

        if status == StatusCode::UNAUTHORIZED {
            if endpoint.is_session_exempt() {
                tracing::debug!(endpoint = name, "401 on session-exempt endpoint");
                return Err(ApiError::Business { endpoint: name, status: 401, message: server_message(&text, status) });
            }
            self.expire_session(name);
            return Err(ApiError::SessionExpired { endpoint: name });
        }
        if !status.is_success() {
            let message = server_message(&text, status);
            tracing::warn!(endpoint = name, status = status.as_u16(), %message, "request failed");
            return Err(ApiError::Business { endpoint: name, status: status.as_u16(), message });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::decode(name, &e))
    }

    fn url(&self, endpoint: &Endpoint) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl { endpoint: endpoint.name() })?
            .pop_if_empty()
            .extend(endpoint.segments());
        Ok(url)
    }

    fn expire_session(&self, endpoint: &'static str) {
        tracing::warn!(endpoint, "credential rejected, forcing logout");
        self.session.logout();
        self.cache.clear();
        if self.navigator.current_path() != LOGIN_PATH {
            self.navigator.redirect(LOGIN_PATH);
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url.as_str()).finish_non_exhaustive()
    }
}
