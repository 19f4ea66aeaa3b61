//! Configuration for Nexx notifications
//!
//! Example config:
//! ```toml
//! [api]
//! base_url = "https://api.nexx.cloud/"
//! installation_id = "1234"
//! auth_key = "installation-code"
//! shared_secret = "api-secret"
//!
//! [http]
//! timeout_secs = 30
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NexxConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl NexxConfig {
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Configuration(format!("Failed to read config {:?}: {}", path, e))
        })?;

        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content)
            .map_err(|e| crate::Error::Configuration(format!("Failed to parse config: {}", e)))
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Overlay `NEXX_*` environment variables on this config
    pub fn apply_env(&mut self) {
        self.apply_vars(|name| std::env::var(name).ok());
    }

    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("NEXX_API_URL") {
            self.api.base_url = url;
        }
        if let Some(id) = lookup("NEXX_OMNIA_ID") {
            self.api.installation_id = id;
        }
        if let Some(key) = lookup("NEXX_API_AUTHKEY") {
            self.api.auth_key = key;
        }
        if let Some(secret) = lookup("NEXX_API_SECRET") {
            self.api.shared_secret = secret;
        }

        if let Some(timeout) = lookup("NEXX_HTTP_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(t) => self.http.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid NEXX_HTTP_TIMEOUT_SECS"),
            }
        }
        if let Some(timeout) = lookup("NEXX_HTTP_CONNECT_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(t) => self.http.connect_timeout_secs = t,
                Err(_) => warn!(
                    value = %timeout,
                    "Ignoring invalid NEXX_HTTP_CONNECT_TIMEOUT_SECS"
                ),
            }
        }
        if let Some(no_proxy) = lookup("NEXX_HTTP_NO_PROXY") {
            self.http.no_proxy = matches!(no_proxy.as_str(), "1" | "true");
        }

        if let Some(level) = lookup("NEXX_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("NEXX_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Credentials and endpoint of the manage API
#[derive(Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// API base URL, expected to end with a slash
    #[serde(default)]
    pub base_url: String,
    /// Installation (omnia) ID
    #[serde(default)]
    pub installation_id: String,
    /// Installation code sent as `X-Request-CID`
    #[serde(default)]
    pub auth_key: String,
    /// Secret mixed into the request token
    #[serde(default)]
    pub shared_secret: String,
}

impl ApiConfig {
    pub fn new(
        base_url: impl Into<String>,
        installation_id: impl Into<String>,
        auth_key: impl Into<String>,
        shared_secret: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            installation_id: installation_id.into(),
            auth_key: auth_key.into(),
            shared_secret: shared_secret.into(),
        }
    }

    /// Both the base URL and the auth key are required to send anything
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.auth_key.is_empty()
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !self.is_complete() {
            return Err(crate::Error::Configuration(
                "API Url and/or Installation Code (API Key) not set".into(),
            ));
        }

        url::Url::parse(&self.base_url).map_err(|e| {
            crate::Error::Configuration(format!("Invalid API Url {}: {}", self.base_url, e))
        })?;

        if !self.base_url.ends_with('/') {
            warn!(
                base_url = %self.base_url,
                "API Url does not end with a slash, the manage path is appended verbatim"
            );
        }

        Ok(())
    }
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("installation_id", &self.installation_id)
            .field("auth_key", &redact(&self.auth_key))
            .field("shared_secret", &redact(&self.shared_secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "***"
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Ignore proxies configured through the environment
    #[serde(default)]
    pub no_proxy: bool,
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("nexx-notify/{}", crate::VERSION)
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            user_agent: default_user_agent(),
            no_proxy: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = NexxConfig::default();
        assert!(!config.api.is_complete());
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert!(!config.http.no_proxy);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_from_toml_partial() {
        let config = NexxConfig::from_toml(
            r#"
            [api]
            base_url = "https://api.nexx.cloud/"
            auth_key = "cid"

            [http]
            timeout_secs = 5
            "#,
        )
        .unwrap();

        assert!(config.api.is_complete());
        assert_eq!(config.api.installation_id, "");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(config.http.connect_timeout_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[api]\nbase_url = \"https://api.nexx.cloud/\"\ninstallation_id = \"99\"\nauth_key = \"cid\"\nshared_secret = \"s3cret\""
        )
        .unwrap();

        let config = NexxConfig::from_file(file.path()).unwrap();
        assert_eq!(config.api.installation_id, "99");
        assert_eq!(config.api.shared_secret, "s3cret");
    }

    #[test]
    fn test_from_file_errors_are_configuration_errors() {
        let err = NexxConfig::from_file("/nonexistent/nexx.toml").unwrap_err();
        assert_eq!(err.code(), "ConfigurationError");

        let err = NexxConfig::from_toml("[api\nbase_url = 1").unwrap_err();
        assert_eq!(err.code(), "ConfigurationError");
    }

    #[test]
    fn test_apply_vars() {
        let vars: HashMap<&str, &str> = [
            ("NEXX_API_URL", "https://api.example.com/"),
            ("NEXX_OMNIA_ID", "42"),
            ("NEXX_API_AUTHKEY", "cid"),
            ("NEXX_API_SECRET", "secret"),
            ("NEXX_HTTP_TIMEOUT_SECS", "not-a-number"),
            ("NEXX_HTTP_CONNECT_TIMEOUT_SECS", "3"),
            ("NEXX_HTTP_NO_PROXY", "true"),
            ("NEXX_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = NexxConfig::default();
        config.apply_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://api.example.com/");
        assert_eq!(config.api.installation_id, "42");
        assert_eq!(config.api.auth_key, "cid");
        assert_eq!(config.api.shared_secret, "secret");
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.connect_timeout_secs, 3);
        assert!(config.http.no_proxy);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_is_complete_requires_url_and_key() {
        assert!(!ApiConfig::new("", "1", "cid", "s").is_complete());
        assert!(!ApiConfig::new("https://api.nexx.cloud/", "1", "", "s").is_complete());
        assert!(ApiConfig::new("https://api.nexx.cloud/", "", "cid", "").is_complete());
    }

    #[test]
    fn test_validate() {
        assert!(ApiConfig::new("https://api.nexx.cloud/", "1", "cid", "s")
            .validate()
            .is_ok());
        assert!(ApiConfig::new("not a url", "1", "cid", "s").validate().is_err());
        assert!(ApiConfig::new("", "1", "cid", "s").validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ApiConfig::new("https://api.nexx.cloud/", "1", "cid-value", "secret-value");
        let debug = format!("{:?}", config);

        assert!(debug.contains("https://api.nexx.cloud/"));
        assert!(!debug.contains("cid-value"));
        assert!(!debug.contains("secret-value"));
    }
}
