use std::env;
use std::path::PathBuf;

use crate::error::{PortalError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/api";
pub const DEFAULT_PAYMENT_URL: &str = "http://127.0.0.1:8080";

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL for courses, students, attendance, grades and auth routes
    pub base_url: String,
    /// Base URL for payment and QR routes
    pub payment_url: String,
    /// No timeout when unset
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub file: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// Unrecognised `LOG_FORMAT` value, reported once logging is up
    pub rejected_format: Option<String>,
}

impl Config {
    /// Creates configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first. Recognised
    /// variables:
    /// - `PORTAL_API_URL`: backend API base (default: `http://127.0.0.1:8080/api`)
    /// - `PORTAL_PAYMENT_URL`: payment service base (default: `http://127.0.0.1:8080`)
    /// - `PORTAL_SESSION_FILE`: where the token and cached profile live
    /// - `PORTAL_REQUEST_TIMEOUT_SECS`: optional per-request timeout
    /// - `LOG_FORMAT`: `pretty` (default) or `json`
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let request_timeout_secs = match env::var("PORTAL_REQUEST_TIMEOUT_SECS") {
            Ok(raw) if !raw.is_empty() => Some(raw.parse().map_err(|_| {
                PortalError::InvalidConfiguration(format!(
                    "PORTAL_REQUEST_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })?),
            _ => None,
        };

        let session_file = match env::var("PORTAL_SESSION_FILE") {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => default_session_file()?,
        };

        let log_format = env::var("LOG_FORMAT").ok();
        let (format, rejected_format) = match parse_log_format(log_format.as_deref()) {
            Ok(format) => (format, None),
            Err(raw) => (LogFormat::Pretty, Some(raw)),
        };

        Ok(Self {
            api: ApiConfig {
                base_url: normalize_url(
                    &env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
                ),
                payment_url: normalize_url(
                    &env::var("PORTAL_PAYMENT_URL")
                        .unwrap_or_else(|_| DEFAULT_PAYMENT_URL.to_string()),
                ),
                request_timeout_secs,
            },
            session: SessionConfig { file: session_file },
            logging: LoggingConfig {
                format,
                rejected_format,
            },
        })
    }
}

impl ApiConfig {
    pub fn new(base_url: &str, payment_url: &str) -> Self {
        Self {
            base_url: normalize_url(base_url),
            payment_url: normalize_url(payment_url),
            request_timeout_secs: None,
        }
    }
}

/// Strips trailing slashes so route suffixes can be appended verbatim
pub fn normalize_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

/// `Err` carries the unrecognised value
fn parse_log_format(raw: Option<&str>) -> std::result::Result<LogFormat, String> {
    match raw.map(|v| v.trim().to_lowercase()) {
        Some(v) if v == "json" => Ok(LogFormat::Json),
        Some(v) if v.is_empty() || v == "pretty" => Ok(LogFormat::Pretty),
        Some(other) => Err(other),
        None => Ok(LogFormat::Pretty),
    }
}

fn default_session_file() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| {
            PortalError::MissingConfiguration(
                "PORTAL_SESSION_FILE (no data or home directory found)".to_string(),
            )
        })?;
    Ok(base.join("school-portal").join("session.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_trailing_slash() {
        assert_eq!(normalize_url("http://host/api/"), "http://host/api");
        assert_eq!(normalize_url("http://host/api//"), "http://host/api");
        assert_eq!(normalize_url(" http://host "), "http://host");
    }

    #[test]
    fn test_api_config_new_normalizes() {
        let config = ApiConfig::new("http://localhost:9000/api/", "http://localhost:9000/");
        assert_eq!(config.base_url, "http://localhost:9000/api");
        assert_eq!(config.payment_url, "http://localhost:9000");
        assert!(config.request_timeout_secs.is_none());
    }

    #[test]
    fn test_parse_log_format() {
        assert_eq!(parse_log_format(Some("json")), Ok(LogFormat::Json));
        assert_eq!(parse_log_format(Some("JSON")), Ok(LogFormat::Json));
        assert_eq!(parse_log_format(Some("pretty")), Ok(LogFormat::Pretty));
        assert_eq!(parse_log_format(None), Ok(LogFormat::Pretty));
    }

    #[test]
    fn test_unknown_log_format_is_kept_for_reporting() {
        assert_eq!(parse_log_format(Some("XML")), Err("xml".to_string()));
    }

    #[test]
    fn test_default_session_file_location() {
        if let Ok(path) = default_session_file() {
            assert!(path.ends_with("school-portal/session.json"));
        }
    }
}
