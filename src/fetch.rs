//! Opaque fetch capability
//!
//! The crate never owns an HTTP client. Callers hand in something that can
//! GET a Figma API path as parsed JSON and an absolute asset URL as bytes;
//! retry, backoff and authentication all live behind this trait. A failure
//! here is a typed upstream error, never retried by the pipeline.

use crate::error::Result;

#[allow(async_fn_in_trait)]
pub trait FetchClient {
    /// GET an API path (e.g. `/v1/files/KEY/images`) and parse the body as
    /// JSON
    async fn get_json(&self, path: &str) -> Result<serde_json::Value>;

    /// GET an absolute URL (e.g. a signed asset URL) and return the raw body
    async fn get_bytes(&self, url: &str) -> Result<Vec<u8>>;
}
