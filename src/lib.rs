//! Client for the school portal backend.
//!
//! - [`api`]: one method per backend call, explicit `Result` outcomes
//! - [`session`]: bearer token and cached profile, invalidated on 401/403
//! - [`attendance`]: roster plus unsaved status edits, saved in one bulk write
//! - [`directory`]: paged and searchable student listing
//! - [`dashboard`]: aggregate loaders for the teacher and student views
//! - [`view`]: display models derived from the state above

pub mod api;
pub mod attendance;
pub mod config;
pub mod dashboard;
pub mod directory;
pub mod domain;
pub mod error;
pub mod logging;
pub mod session;
pub mod view;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, ApiResult, PortalError, Result};
