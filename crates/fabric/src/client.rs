//! Transport port: the capability set the manager needs from an HTTP client.
//!
//! The `rest` crate supplies the production implementation over `reqwest`;
//! tests substitute an in-memory double without touching the manager.

use async_trait::async_trait;

use crate::Result;

/// Authenticated JSON transport to a UFM server.
///
/// Every method performs exactly one request and returns the response body on
/// HTTP 200. Implementations map HTTP 404 to [`crate::UfmError::NotFound`] and
/// every other outcome to [`crate::UfmError::Unknown`]. Nothing is retried.
#[async_trait]
pub trait UfmClient: Send + Sync {
    /// Issues a `GET` to `url`.
    async fn get(&self, url: &str) -> Result<Vec<u8>>;

    /// Issues a `POST` of `body` to `url`.
    async fn post(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>>;

    /// Issues a `PUT` of `body` to `url`.
    async fn put(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>>;

    /// Issues a `DELETE` to `url`.
    async fn delete(&self, url: &str) -> Result<Vec<u8>>;
}
