use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult, PortalError, Result};
use crate::session::SessionManager;

/// Issues one request and classifies the response.
///
/// Failures never escape as panics: transport errors, non-2xx statuses and
/// unparseable bodies all come back as [`ApiError`], logged here once.
pub struct HttpClient {
    client: reqwest::Client,
    session: Arc<SessionManager>,
}

impl HttpClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| PortalError::HttpClient(e.to_string()))?;

        Ok(Self { client, session })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Starts a request with the JSON headers and, when signed in, the bearer token
    pub async fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.request_anonymous(method, url);

        match self.session.token().await {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Starts a request with the JSON headers only, for endpoints that issue tokens
    pub fn request_anonymous(&self, method: Method, url: &str) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
    }

    /// Sends and returns the JSON body; an empty 2xx body becomes `{}`
    pub async fn send(&self, builder: RequestBuilder) -> ApiResult<Value> {
        self.read_body(builder, Access::Session).await
    }

    /// Sends and decodes the JSON body into `T`
    pub async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let value = self.send(builder).await?;
        decode(value)
    }

    /// Like [`send`](Self::send), but a 401/403 means bad credentials and
    /// leaves the session untouched
    pub async fn send_anonymous(&self, builder: RequestBuilder) -> ApiResult<Value> {
        self.read_body(builder, Access::Anonymous).await
    }

    /// Sends and returns the raw body bytes (images)
    pub async fn send_bytes(&self, builder: RequestBuilder) -> ApiResult<Vec<u8>> {
        let (url, response) = self.dispatch(builder, Access::Session).await?;
        let bytes = response.bytes().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read response bytes");
            ApiError::Transport(e.to_string())
        })?;
        Ok(bytes.to_vec())
    }

    async fn read_body(&self, builder: RequestBuilder, access: Access) -> ApiResult<Value> {
        let (url, response) = self.dispatch(builder, access).await?;
        let body = response.text().await.map_err(|e| {
            tracing::error!(url = %url, error = %e, "Failed to read response body");
            ApiError::Transport(e.to_string())
        })?;

        parse_body(&body).map_err(|e| {
            tracing::error!(url = %url, error = %e, "Response body is not valid JSON");
            e
        })
    }

    async fn dispatch(
        &self,
        builder: RequestBuilder,
        access: Access,
    ) -> ApiResult<(String, Response)> {
        let request = builder.build().map_err(|e| {
            tracing::error!(error = %e, "Failed to build request");
            ApiError::Transport(e.to_string())
        })?;
        let url = request.url().to_string();
        let method = request.method().clone();

        tracing::debug!(method = %method, url = %url, "Sending request");

        let response = self.client.execute(request).await.map_err(|e| {
            tracing::error!(method = %method, url = %url, error = %e, "Fetch error");
            ApiError::from(e)
        })?;

        let status = response.status();
        if is_unauthorized(status) {
            return Err(match access {
                Access::Session => {
                    tracing::warn!(status = %status, url = %url, "Unauthorized response");
                    self.session.invalidate().await;
                    ApiError::Unauthorized {
                        status: status.as_u16(),
                    }
                }
                Access::Anonymous => {
                    tracing::warn!(status = %status, url = %url, "Credentials rejected");
                    ApiError::InvalidCredentials {
                        status: status.as_u16(),
                    }
                }
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, url = %url, body = %body, "Backend returned an error");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok((url, response))
    }
}

/// Whether a 401/403 reflects on the held session
#[derive(Debug, Clone, Copy)]
enum Access {
    Session,
    Anonymous,
}

pub(crate) fn is_unauthorized(status: StatusCode) -> bool {
    status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
}

pub(crate) fn parse_body(body: &str) -> ApiResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(body).map_err(|e| ApiError::MalformedBody(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| {
        tracing::error!(error = %e, "Response body has an unexpected shape");
        ApiError::MalformedBody(e.to_string())
    })
}
