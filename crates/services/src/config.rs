//! Client configuration loaded from the environment.
//!
//! The binary loads `.env` before calling `ClientConfig::from_env`; this
//! module only reads variables.

use std::env;
use std::time::Duration;

use backend::HttpConfig;
use exam_core::model::{AuthToken, SessionContext, UserProfile};
use thiserror::Error;

pub const API_URL_VAR: &str = "EXAMPREP_API_URL";
pub const TOKEN_VAR: &str = "EXAMPREP_TOKEN";
pub const USER_NAME_VAR: &str = "EXAMPREP_USER_NAME";
pub const TIMEOUT_VAR: &str = "EXAMPREP_TIMEOUT_SECS";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_url: String,
    pub token: Option<AuthToken>,
    pub user_name: Option<String>,
    pub timeout: Duration,
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            token: None,
            user_name: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is missing or the timeout is not
    /// a positive number of seconds.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as `from_env`, reading variables through `lookup`.
    ///
    /// Blank values count as unset.
    ///
    /// # Errors
    ///
    /// See `from_env`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_url = read(API_URL_VAR).ok_or(ConfigError::MissingVar(API_URL_VAR))?;
        let timeout = match read(TIMEOUT_VAR) {
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: TIMEOUT_VAR,
                        reason: format!("'{raw}' is not a positive number of seconds"),
                    });
                }
            },
        };

        Ok(Self {
            api_url,
            token: read(TOKEN_VAR).and_then(AuthToken::new),
            user_name: read(USER_NAME_VAR),
            timeout,
        })
    }

    #[must_use]
    pub fn with_token(mut self, token: Option<AuthToken>) -> Self {
        self.token = token;
        self
    }

    #[must_use]
    pub fn session(&self) -> SessionContext {
        SessionContext::anonymous()
            .with_token(self.token.clone())
            .with_user(self.user_name.as_deref().map(UserProfile::new))
    }

    #[must_use]
    pub fn http(&self) -> HttpConfig {
        HttpConfig::new(self.api_url.clone()).with_timeout(self.timeout)
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("has_token", &self.token.is_some())
            .field("user_name", &self.user_name)
            .field("timeout", &self.timeout)
            .finish()
    }
}
