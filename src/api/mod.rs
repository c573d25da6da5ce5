//! Backend facades.
//!
//! [`ApiClient`] owns the HTTP wrapper and exposes one method per backend
//! intent, grouped by resource in the submodules. Every method returns an
//! [`ApiResult`]; none of them substitutes defaults on failure. Callers that
//! want "empty on failure" say so explicitly with [`ApiResultExt::or_empty`].

mod assignments;
mod attendance;
mod auth;
pub mod client;
mod courses;
mod grades;
mod messages;
mod payments;
pub mod routes;
mod students;

pub use client::HttpClient;
pub use routes::Routes;
pub use students::StudentQuery;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::ApiConfig;
use crate::domain::Message;
use crate::error::{ApiResult, Result};
use crate::session::SessionManager;

#[derive(Clone)]
pub struct ApiClient {
    http: Arc<HttpClient>,
    routes: Routes,
    /// The backend has no message routes; the inbox lives with the client
    inbox: Arc<Mutex<Vec<Message>>>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Arc<SessionManager>) -> Result<Self> {
        let http = HttpClient::new(config, session)?;

        tracing::debug!(
            api_url = %config.base_url,
            payment_url = %config.payment_url,
            "API client initialized"
        );

        Ok(Self {
            http: Arc::new(http),
            routes: Routes::new(config),
            inbox: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        self.http.session()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }
}

/// Explicit fallbacks for list-shaped results
pub trait ApiResultExt<T> {
    /// Replaces any failure except `Unauthorized` with an empty value.
    ///
    /// An invalid session still propagates so the caller can stop and
    /// send the user to login.
    fn or_empty(self, what: &str) -> ApiResult<T>;
}

impl<T: Default> ApiResultExt<T> for ApiResult<T> {
    fn or_empty(self, what: &str) -> ApiResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(e) if e.is_unauthorized() => Err(e),
            Err(e) => {
                tracing::warn!(resource = %what, error = %e, "Using empty fallback");
                Ok(T::default())
            }
        }
    }
}
