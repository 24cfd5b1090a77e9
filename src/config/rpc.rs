//! RPC endpoint configuration
//!
//! Resolved from environment variables, following the usual node conventions:
//!
//! ```bash
//! export FTR_RPC_URL="http://localhost:38332"
//! export FTR_RPC_USER="rpcuser"
//! export FTR_RPC_PASSWORD="rpcpassword"
//! ```
//!
//! The endpoint URL is the only part that changes at runtime (network switch).

use crate::{Error, Result};
use secrecy::SecretString;
use std::time::Duration;

/// Local node endpoint used when `FTR_RPC_URL` is unset
pub const DEFAULT_RPC_URL: &str = "http://localhost:38332";

/// Upper bound on a single RPC round trip
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable names
pub mod env_vars {
    pub const RPC_URL: &str = "FTR_RPC_URL";
    pub const RPC_USER: &str = "FTR_RPC_USER";
    pub const RPC_PASSWORD: &str = "FTR_RPC_PASSWORD";
}

/// Endpoint and credentials for the JSON-RPC transport
pub struct TransportConfig {
    url: String,
    user: String,
    password: SecretString,
    timeout: Duration,
}

impl TransportConfig {
    /// Create with an explicit endpoint and basic-auth credentials
    pub fn new(
        url: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let url = url.into();
        validate_url(&url)?;
        Ok(Self {
            url,
            user: user.into(),
            password: SecretString::from(password.into()),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Create from `FTR_RPC_URL`, `FTR_RPC_USER` and `FTR_RPC_PASSWORD`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = match lookup(env_vars::RPC_URL) {
            Some(url) => {
                tracing::debug!("Using FTR_RPC_URL for the node endpoint");
                url
            }
            None => {
                tracing::info!(url = DEFAULT_RPC_URL, "FTR_RPC_URL not set, using local node");
                DEFAULT_RPC_URL.to_string()
            }
        };

        let user = lookup(env_vars::RPC_USER).unwrap_or_default();
        let password = lookup(env_vars::RPC_PASSWORD).unwrap_or_default();
        if user.is_empty() || password.is_empty() {
            tracing::warn!("FTR_RPC_USER/FTR_RPC_PASSWORD not set, node may reject requests");
        }

        Self::new(url, user, password)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Point the transport at a different endpoint
    ///
    /// The URL is validated first; on error the current endpoint is kept.
    pub fn set_url(&mut self, url: impl Into<String>) -> Result<()> {
        let url = url.into();
        validate_url(&url)?;
        self.url = url;
        Ok(())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl std::fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransportConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub(crate) fn validate_url(url: &str) -> Result<()> {
    let parsed = url::Url::parse(url)
        .map_err(|e| Error::Config(format!("invalid RPC URL '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "unsupported RPC URL scheme '{}' in '{}'",
            other, url
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_to_local_node() {
        let config = TransportConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.url(), DEFAULT_RPC_URL);
        assert_eq!(config.user(), "");
        assert_eq!(config.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn reads_endpoint_and_credentials() {
        let config = TransportConfig::from_lookup(lookup_from(&[
            (env_vars::RPC_URL, "https://node.example:8332"),
            (env_vars::RPC_USER, "alice"),
            (env_vars::RPC_PASSWORD, "hunter2"),
        ]))
        .unwrap();

        assert_eq!(config.url(), "https://node.example:8332");
        assert_eq!(config.user(), "alice");
        assert_eq!(config.password().expose_secret(), "hunter2");
    }

    #[test]
    fn rejects_invalid_url() {
        let err = TransportConfig::new("not a url", "u", "p").unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = TransportConfig::new("ftp://node.example", "u", "p").unwrap_err();
        assert!(err.to_string().contains("scheme"));
    }

    #[test]
    fn set_url_keeps_old_endpoint_on_error() {
        let mut config = TransportConfig::new(DEFAULT_RPC_URL, "u", "p").unwrap();
        assert!(config.set_url("::bad::").is_err());
        assert_eq!(config.url(), DEFAULT_RPC_URL);

        config.set_url("http://testnet.rpc.url").unwrap();
        assert_eq!(config.url(), "http://testnet.rpc.url");
    }

    #[test]
    fn debug_redacts_password() {
        let config = TransportConfig::new(DEFAULT_RPC_URL, "alice", "hunter2").unwrap();
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("hunter2"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
