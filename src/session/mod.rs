//! Signed-in state shared by every facade.
//!
//! The bearer token and the cached user profile are persisted through a
//! [`SessionStore`]. A 401/403 from the backend calls
//! [`SessionManager::invalidate`], which clears both and broadcasts
//! [`SessionEvent::Expired`] so the front end can send the user back to login.

mod store;

pub use store::{FileSessionStore, MemorySessionStore, SessionStore};

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, RwLock};

use crate::error::Result;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl UserProfile {
    /// Profile used for payments when nobody is cached
    pub fn fallback_student() -> Self {
        Self {
            id: None,
            full_name: "Student".to_string(),
            email: "student@school.edu".to_string(),
            phone_number: Some("012000000".to_string()),
            role: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub user: Option<UserProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn,
    SignedOut,
    /// The backend rejected the token
    Expired,
}

pub struct SessionManager {
    store: Box<dyn SessionStore>,
    current: RwLock<Option<Session>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// Creates a manager, restoring any session the store already holds
    pub fn new(store: impl SessionStore + 'static) -> Result<Self> {
        let restored = store.load()?;
        if restored.is_some() {
            tracing::debug!("Restored persisted session");
        }
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            store: Box::new(store),
            current: RwLock::new(restored),
            events,
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn token(&self) -> Option<String> {
        self.current.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn user(&self) -> Option<UserProfile> {
        self.current.read().await.as_ref().and_then(|s| s.user.clone())
    }

    pub async fn is_signed_in(&self) -> bool {
        self.current.read().await.is_some()
    }

    /// Stores a freshly issued session
    pub async fn begin(&self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        *self.current.write().await = Some(session);
        let _ = self.events.send(SessionEvent::SignedIn);
        tracing::info!("Session started");
        Ok(())
    }

    pub async fn logout(&self) -> Result<()> {
        *self.current.write().await = None;
        self.store.clear()?;
        let _ = self.events.send(SessionEvent::SignedOut);
        tracing::info!("Signed out");
        Ok(())
    }

    /// Forced logout after the backend rejected the token
    pub async fn invalidate(&self) {
        if self.current.write().await.take().is_none() {
            tracing::debug!("Unauthorized response while signed out");
            return;
        }
        if let Err(e) = self.store.clear() {
            tracing::error!(error = %e, "Failed to clear persisted session");
        }
        let _ = self.events.send(SessionEvent::Expired);
        tracing::warn!("Session expired, login required");
    }
}
