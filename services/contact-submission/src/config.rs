// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact submission service.
//!
//! Loaded once at startup from environment variables (a `.env` file is
//! honoured). The mail relay section is validated into [`MailSettings`]
//! before any dispatch is attempted.

use crate::error::{ConfigError, MailConfigError, MailSetting, Result};
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Standard implicit-TLS mail submission port.
pub const IMPLICIT_TLS_PORT: u16 = 465;

/// Longest accepted rate limit window (one week).
pub const MAX_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Configuration for the contact submission service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Mail relay configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// HTTP surface configuration
    #[serde(default)]
    pub http: HttpConfig,
}

/// Fixed window rate limiting per client identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in seconds (default: 600)
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Accepted submissions per identifier per window (default: 5)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,
}

/// Raw mail relay options as supplied by the environment.
///
/// Every field except the port is optional here; [`MailConfig::settings`]
/// decides whether the relay is usable.
#[derive(Clone, Serialize, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub host: Option<String>,

    /// Relay port (default: 587)
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub user: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    #[serde(default)]
    pub from_address: Option<String>,

    #[serde(default)]
    pub to_address: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics endpoint (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Metrics endpoint path (default: /metrics)
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

/// HTTP surface configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Origins allowed to post the form cross-origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Redirect plain-HTTP requests seen through a proxy (default: true)
    #[serde(default = "default_true")]
    pub enforce_https: bool,
}

/// Validated mail relay settings. Only constructed by [`MailConfig::settings`].
#[derive(Clone)]
pub struct MailSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub from: Mailbox,
    pub to: Mailbox,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_window_secs() -> u64 {
    10 * 60
}

fn default_max_submissions() -> u32 {
    5
}

fn default_smtp_port() -> u16 {
    587
}

fn default_true() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

fn default_allowed_origins() -> Vec<String> {
    vec!["https://localhost".to_string()]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::default(),
            metrics: MetricsConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_secs: default_window_secs(),
            max_submissions: default_max_submissions(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            user: None,
            password: None,
            from_address: None,
            to_address: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            path: default_metrics_path(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
            enforce_https: default_true(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration, capped at [`MAX_WINDOW_SECS`]
    pub fn window_duration(&self) -> Duration {
        Duration::from_secs(self.window_secs.min(MAX_WINDOW_SECS))
    }

    /// Reject limits that would disable throttling or overflow the clock.
    pub fn validate(&self) -> Result<()> {
        if self.window_secs == 0 || self.window_secs > MAX_WINDOW_SECS {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_WINDOW_SECS",
                value: self.window_secs.to_string(),
            });
        }
        if self.max_submissions == 0 {
            return Err(ConfigError::InvalidValue {
                var: "RATE_LIMIT_MAX",
                value: self.max_submissions.to_string(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from_address", &self.from_address)
            .field("to_address", &self.to_address)
            .finish()
    }
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("from", &self.from.to_string())
            .field("to", &self.to.to_string())
            .finish()
    }
}

impl MailConfig {
    /// Settings that are absent or blank, in declaration order.
    pub fn missing(&self) -> Vec<MailSetting> {
        MailSetting::REQUIRED
            .into_iter()
            .filter(|setting| self.value(*setting).is_none())
            .collect()
    }

    /// Validate the raw options into usable relay settings.
    ///
    /// All missing settings are reported together so an operator can fix
    /// the environment in one pass.
    pub fn settings(&self) -> std::result::Result<MailSettings, MailConfigError> {
        let missing = self.missing();
        if !missing.is_empty() {
            return Err(MailConfigError::Missing(missing));
        }

        let required = |setting| {
            self.value(setting)
                .map(str::to_string)
                .ok_or_else(|| MailConfigError::Missing(vec![setting]))
        };

        Ok(MailSettings {
            host: required(MailSetting::Host)?,
            port: self.port,
            user: required(MailSetting::User)?,
            password: required(MailSetting::Password)?,
            from: parse_mailbox(MailSetting::FromAddress, &required(MailSetting::FromAddress)?)?,
            to: parse_mailbox(MailSetting::ToAddress, &required(MailSetting::ToAddress)?)?,
        })
    }

    fn value(&self, setting: MailSetting) -> Option<&str> {
        let raw = match setting {
            MailSetting::Host => self.host.as_deref(),
            MailSetting::User => self.user.as_deref(),
            MailSetting::Password => self.password.as_deref(),
            MailSetting::FromAddress => self.from_address.as_deref(),
            MailSetting::ToAddress => self.to_address.as_deref(),
        };
        raw.map(str::trim).filter(|v| !v.is_empty())
    }
}

impl MailSettings {
    /// Whether the relay expects TLS from the first byte.
    pub fn implicit_tls(&self) -> bool {
        self.port == IMPLICIT_TLS_PORT
    }
}

fn parse_mailbox(setting: MailSetting, raw: &str) -> std::result::Result<Mailbox, MailConfigError> {
    raw.parse::<Mailbox>()
        .map_err(|e| MailConfigError::InvalidMailbox {
            setting,
            reason: e.to_string(),
        })
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Config::default();

        let bind_addr = var("BIND_ADDR").unwrap_or(defaults.bind_addr);
        bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_addr.clone()))?;

        let user = var(MailSetting::User.env_var());
        let mail = MailConfig {
            host: var(MailSetting::Host.env_var()),
            port: parse_var(&var, "SMTP_PORT")?.unwrap_or(defaults.mail.port),
            password: var(MailSetting::Password.env_var()),
            from_address: var(MailSetting::FromAddress.env_var()).or_else(|| user.clone()),
            to_address: var(MailSetting::ToAddress.env_var()).or_else(|| user.clone()),
            user,
        };

        let rate_limit = RateLimitConfig {
            window_secs: parse_var(&var, "RATE_LIMIT_WINDOW_SECS")?
                .unwrap_or(defaults.rate_limit.window_secs),
            max_submissions: parse_var(&var, "RATE_LIMIT_MAX")?
                .unwrap_or(defaults.rate_limit.max_submissions),
        };
        rate_limit.validate()?;

        let metrics = MetricsConfig {
            enabled: parse_var(&var, "METRICS_ENABLED")?.unwrap_or(defaults.metrics.enabled),
            ..defaults.metrics
        };

        let http = HttpConfig {
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|list| {
                    list.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.http.allowed_origins),
            enforce_https: parse_var(&var, "ENFORCE_HTTPS")?
                .unwrap_or(defaults.http.enforce_https),
        };

        Ok(Config {
            bind_addr,
            rate_limit,
            mail,
            metrics,
            http,
        })
    }
}

fn parse_var<T, F>(var: &F, key: &'static str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var: key, value: raw }),
    }
}
