//! Connection settings for a UFM server.
//!
//! [`UfmConfig`] is populated once by the caller (the CLI reads it from the
//! environment) and is immutable afterwards. [`Endpoint`] is the part of it
//! needed to build request URLs.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Result, UfmError};

// ---------------------------------------------------------------------------
// Scheme
// ---------------------------------------------------------------------------

/// URL scheme used to reach the UFM REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    #[default]
    Https,
}

impl Scheme {
    /// Port used when none is configured.
    pub fn default_port(self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    /// Returns `true` for the TLS scheme.
    pub fn is_secure(self) -> bool {
        self == Self::Https
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = UfmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "" | "https" => Ok(Self::Https),
            "http" => Ok(Self::Http),
            other => Err(UfmError::unknown(format!(
                "invalid http schema '{other}', expected 'http' or 'https'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// Where the UFM REST API lives: `<scheme>://<address>:<port>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub scheme: Scheme,
    pub address: String,
    pub port: u16,
}

impl Endpoint {
    /// Returns the absolute URL of `path` (which must start with `/`).
    pub fn url(&self, path: &str) -> String {
        format!("{}://{}:{}{}", self.scheme, self.address, self.port, path)
    }
}

// ---------------------------------------------------------------------------
// UfmConfig
// ---------------------------------------------------------------------------

/// Everything needed to construct a client for one UFM server.
#[derive(Clone, PartialEq, Eq)]
pub struct UfmConfig {
    pub username: String,
    pub password: String,
    /// IP address or host name of the UFM server.
    pub address: String,
    /// REST API port; `None` selects the scheme's default.
    pub port: Option<u16>,
    pub scheme: Scheme,
    /// PEM-encoded CA certificate. When absent over https, the server
    /// certificate is not verified.
    pub certificate: Option<String>,
    /// Per-request deadline enforced by the transport.
    pub timeout: Option<Duration>,
}

impl UfmConfig {
    /// Creates a config with the default scheme and port and no certificate.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            address: address.into(),
            port: None,
            scheme: Scheme::default(),
            certificate: None,
            timeout: None,
        }
    }

    /// Fails if any of the required connection fields is empty.
    ///
    /// A missing address is [`UfmError::Unknown`]; missing credentials alone
    /// are [`UfmError::Auth`].
    pub fn validate(&self) -> Result<()> {
        if self.address.is_empty() {
            return Err(UfmError::unknown(
                "missing one or more required fields for ufm [\"username\", \"password\", \"address\"]",
            ));
        }
        if self.username.is_empty() || self.password.is_empty() {
            return Err(UfmError::auth(format!(
                "missing credentials for ufm at '{}': username and password are required",
                self.address
            )));
        }
        Ok(())
    }

    /// Port to connect to, after applying the scheme default.
    pub fn effective_port(&self) -> u16 {
        match self.port {
            Some(port) if port != 0 => port,
            _ => self.scheme.default_port(),
        }
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            scheme: self.scheme,
            address: self.address.clone(),
            port: self.effective_port(),
        }
    }
}

// Keep the password and certificate out of logs.
impl fmt::Debug for UfmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UfmConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("address", &self.address)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("certificate", &self.certificate.as_ref().map(|_| "<pem>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_defaults_follow_the_scheme() {
        let mut config = UfmConfig::new("admin", "secret", "ufm.local");
        assert_eq!(config.effective_port(), 443);

        config.scheme = Scheme::Http;
        assert_eq!(config.effective_port(), 80);

        config.port = Some(8080);
        assert_eq!(config.effective_port(), 8080);
    }

    #[test]
    fn scheme_parsing_is_case_insensitive_and_defaults_to_https() {
        assert_eq!("HTTP".parse::<Scheme>().unwrap(), Scheme::Http);
        assert_eq!("".parse::<Scheme>().unwrap(), Scheme::Https);
        assert!("ftp".parse::<Scheme>().is_err());
    }

    #[test]
    fn endpoint_builds_absolute_urls() {
        let config = UfmConfig::new("admin", "secret", "10.0.0.1");
        assert_eq!(
            config.endpoint().url("/ufmRest/app/ufm_version"),
            "https://10.0.0.1:443/ufmRest/app/ufm_version"
        );
    }

    #[test]
    fn validate_requires_credentials_and_address() {
        assert!(UfmConfig::new("admin", "secret", "ufm").validate().is_ok());
        assert!(UfmConfig::new("admin", "secret", "").validate().is_err());
    }

    #[test]
    fn missing_credentials_are_an_auth_error() {
        for config in [
            UfmConfig::new("", "secret", "ufm"),
            UfmConfig::new("admin", "", "ufm"),
        ] {
            assert!(matches!(config.validate(), Err(UfmError::Auth { .. })));
        }
        assert!(matches!(
            UfmConfig::new("", "", "").validate(),
            Err(UfmError::Unknown { .. })
        ));
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let rendered = format!("{:?}", UfmConfig::new("admin", "hunter2", "ufm"));
        assert!(!rendered.contains("hunter2"));
    }
}
