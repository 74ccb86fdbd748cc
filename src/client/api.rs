use reqwest::Method;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::DEFAULT_BASE_URL;
use crate::client::{
    ClientError, ClientResult, JSON_MEDIA_TYPE, build_reqwest_client, default_headers,
};
use crate::models::config::{DEFAULT_USER_AGENT, Settings};

/// Test client performing one request per [`fetch`](ApiClient::fetch).
///
/// The request is assembled from the public fields at call time, so a test
/// adjusts `method`, `headers` or `body` and then fires.
pub struct ApiClient {
    pub base_url: Url,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    client: reqwest::Client,
}

impl ApiClient {
    /// Creates a client for [`DEFAULT_BASE_URL`].
    pub fn new() -> ClientResult<Self> {
        Self::with_base_url(Url::parse(DEFAULT_BASE_URL)?)
    }

    pub fn with_base_url(base_url: Url) -> ClientResult<Self> {
        Self::build(base_url, DEFAULT_USER_AGENT)
    }

    pub fn from_settings(settings: &Settings) -> ClientResult<Self> {
        Self::build(settings.base_url.clone(), &settings.user_agent)
    }

    fn build(base_url: Url, user_agent: &str) -> ClientResult<Self> {
        Ok(Self {
            base_url,
            method: Method::GET,
            headers: default_headers(),
            body: None,
            client: build_reqwest_client(user_agent)?,
        })
    }

    /// Creates a client from [`Settings::load`].
    pub fn from_env() -> ClientResult<Self> {
        let settings = Settings::load()?;
        Self::from_settings(&settings)
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serializes `payload` into the request body.
    pub fn with_json_body<T: Serialize>(mut self, payload: &T) -> ClientResult<Self> {
        self.body = Some(serde_json::to_value(payload).map_err(ClientError::Encode)?);
        Ok(self)
    }

    /// Resolves `path` against the base URL the way a browser resolves a
    /// relative link. Without a path the base URL is used as is.
    pub fn url_for(&self, path: Option<&str>) -> ClientResult<Url> {
        match path {
            Some(path) => Ok(self.base_url.join(path)?),
            None => Ok(self.base_url.clone()),
        }
    }

    /// Sends the configured request and decodes the JSON response as `T`.
    ///
    /// Fails with [`ClientError::Status`] on a non-2xx status and with
    /// [`ClientError::ContentType`] when the response is not declared as
    /// JSON. The payload itself is not validated here.
    pub async fn fetch<T: DeserializeOwned>(&self, path: Option<&str>) -> ClientResult<T> {
        let url = self.url_for(path)?;
        log::debug!("{} {}", self.method, url);

        let mut request = self
            .client
            .request(self.method.clone(), url.clone())
            .headers(self.headers.clone());
        if let Some(body) = &self.body {
            request = request.body(serde_json::to_vec(body).map_err(ClientError::Encode)?);
        }

        let res = request.send().await?;
        let status = res.status();
        log::debug!("{} {} -> {}", self.method, url, status);
        if !status.is_success() {
            log::error!("Failed to {} {}: {}", self.method, url, status);
            return Err(ClientError::Status { url, status });
        }

        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.contains(JSON_MEDIA_TYPE) {
            log::error!("Unexpected content type from {url}: {content_type:?}");
            return Err(ClientError::ContentType { url, content_type });
        }

        let bytes = res.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}
