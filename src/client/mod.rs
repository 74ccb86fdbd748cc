use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

pub mod api;

pub use api::ApiClient;

/// Media type every request declares and every response must carry.
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    #[error("failed to load settings: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} responded with {status}")]
    Status { url: Url, status: StatusCode },
    #[error("{url} responded with content type `{content_type}`, expected JSON")]
    ContentType { url: Url, content_type: String },
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Builds the underlying [`reqwest::Client`] identifying itself as
/// `user_agent`.
pub fn build_reqwest_client(user_agent: &str) -> ClientResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(ClientError::Build)
}

/// JSON `Content-Type` and `Accept` headers sent unless the caller
/// replaces them.
pub fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
    headers
}
