use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};

use super::client::decode;
use super::{routes, ApiClient};
use crate::domain::Registration;
use crate::error::{ApiError, ApiResult, PortalError, Result};
use crate::session::{Session, UserProfile};

/// Login response; the token field name varies between backend versions
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(alias = "accessToken", alias = "jwt")]
    token: String,
    #[serde(default)]
    user: Option<UserProfile>,
}

impl ApiClient {
    pub async fn register(&self, registration: &Registration) -> ApiResult<Value> {
        let request = self
            .http
            .request_anonymous(Method::POST, &self.routes.api(routes::AUTH_REGISTER))
            .json(registration);
        let created = self.http.send_anonymous(request).await?;
        tracing::info!(email = %registration.email, "Registered account");
        Ok(created)
    }

    /// Signs in and persists the returned token and profile
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let request = self
            .http
            .request_anonymous(Method::POST, &self.routes.api(routes::AUTH_LOGIN))
            .json(&json!({ "email": email, "password": password }));
        let response: LoginResponse = decode(self.http.send_anonymous(request).await?)?;

        if response.token.is_empty() {
            return Err(PortalError::Api(ApiError::MalformedBody(
                "login response carried an empty token".to_string(),
            )));
        }

        let session = Session {
            token: response.token,
            user: response.user,
        };
        self.session().begin(session.clone()).await?;
        tracing::info!(email = %email, "Logged in");
        Ok(session)
    }

    pub async fn logout(&self) -> Result<()> {
        self.session().logout().await
    }
}
