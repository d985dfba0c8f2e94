//! UFM REST transport adapter.
//!
//! Implements the [`fabric::UfmClient`] trait over `reqwest`: every request
//! carries HTTP Basic credentials and a JSON content type, and every outcome is
//! normalised into [`fabric::UfmError`].
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Connection setup, TLS trust, authentication and status
//! mapping all live here. The `manager` crate sees only [`fabric::UfmClient`].
//!
//! ## TLS
//!
//! Over `https`, the server certificate is verified only when a PEM
//! certificate is configured; that certificate then becomes the *only* trust
//! root for this client. Without one, peer verification is disabled. This is
//! insecure and intended for lab fabrics whose UFM uses a self-signed
//! certificate.
//!
//! ## Response mapping
//!
//! | Outcome | Result |
//! |---------|--------|
//! | HTTP 200 | `Ok(body)` |
//! | HTTP 404 | [`UfmError::NotFound`] |
//! | any other status | [`UfmError::Unknown`] carrying the status text |
//! | malformed URL, connection failure, unreadable body | [`UfmError::Unknown`] carrying the cause |
//!
//! No request is ever retried.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use fabric::{Result, Scheme, UfmClient, UfmConfig, UfmError};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Certificate, Method, StatusCode, Url};
use tracing::debug;

/// Content type sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// HTTP Basic credentials for the UFM REST API.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    /// Creates credentials, failing with [`UfmError::Auth`] if either part is
    /// empty.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return Err(UfmError::auth(format!(
                "invalid basic auth for user '{username}': username and password are required"
            )));
        }
        Ok(Self { username, password })
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// `reqwest`-backed [`UfmClient`].
///
/// Immutable after construction and cheap to share: the inner
/// [`reqwest::Client`] pools connections internally.
#[derive(Debug, Clone)]
pub struct HttpUfmClient {
    auth: BasicAuth,
    http: reqwest::Client,
}

impl HttpUfmClient {
    /// Builds a client from the connection settings in `config`.
    pub fn new(config: &UfmConfig) -> Result<Self> {
        let auth = BasicAuth::new(config.username.as_str(), config.password.as_str())?;
        Self::with_auth(
            config.scheme,
            auth,
            config.certificate.as_deref(),
            config.timeout,
        )
    }

    /// Builds a client with explicit credentials and TLS trust material.
    ///
    /// `certificate` is ignored unless `scheme` is [`Scheme::Https`]; an empty
    /// string is treated as absent.
    pub fn with_auth(
        scheme: Scheme,
        auth: BasicAuth,
        certificate: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        debug!(
            scheme = %scheme,
            user = auth.username(),
            has_certificate = certificate.is_some_and(|pem| !pem.is_empty()),
            "creating UFM http client"
        );

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        if scheme.is_secure() {
            builder = match certificate.filter(|pem| !pem.is_empty()) {
                None => builder.danger_accept_invalid_certs(true),
                Some(pem) => {
                    let roots = Certificate::from_pem_bundle(pem.as_bytes()).map_err(|e| {
                        UfmError::unknown(format!("failed to load ufm certificate: {e}"))
                    })?;
                    if roots.is_empty() {
                        return Err(UfmError::unknown(
                            "failed to load ufm certificate: no certificate found in PEM",
                        ));
                    }
                    roots
                        .into_iter()
                        .fold(builder.tls_built_in_root_certs(false), |b, root| {
                            b.add_root_certificate(root)
                        })
                }
            };
        }

        let http = builder
            .build()
            .map_err(|e| UfmError::unknown(format!("failed to create http client: {e}")))?;

        Ok(Self { auth, http })
    }

    async fn execute(&self, method: Method, url: &str, body: Option<Vec<u8>>) -> Result<Vec<u8>> {
        let target = Url::parse(url).map_err(|e| {
            UfmError::unknown(format!("failed to create request object for '{url}': {e}"))
        })?;

        let mut request = self
            .http
            .request(method.clone(), target)
            .basic_auth(&self.auth.username, Some(&self.auth.password))
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            debug!(%method, url, error = %e, "UFM request failed");
            UfmError::unknown(e.to_string())
        })?;

        let status = response.status();
        debug!(%method, url, status = status.as_u16(), "UFM response received");

        match status {
            StatusCode::OK => {
                let bytes = response.bytes().await.map_err(|e| {
                    UfmError::unknown(format!("failed to read response body: {e}"))
                })?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(UfmError::not_found(reason(StatusCode::NOT_FOUND))),
            other => Err(UfmError::unknown(format!(
                "http status ({}): {}",
                other.as_u16(),
                reason(other)
            ))),
        }
    }
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

#[async_trait]
impl UfmClient for HttpUfmClient {
    async fn get(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "UFM GET");
        self.execute(Method::GET, url, None).await
    }

    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!(url, body = %String::from_utf8_lossy(&body), "UFM POST");
        self.execute(Method::POST, url, Some(body)).await
    }

    async fn put(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        debug!(url, body = %String::from_utf8_lossy(&body), "UFM PUT");
        self.execute(Method::PUT, url, Some(body)).await
    }

    async fn delete(&self, url: &str) -> Result<Vec<u8>> {
        debug!(url, "UFM DELETE");
        self.execute(Method::DELETE, url, None).await
    }
}
