//! Yandex Disk client implementation
//!
//! Wraps reqwest and implements the DiskApi trait from yd-core.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Method, Response, StatusCode, header};
use url::Url;

use yd_core::{
    ByteStream, DiskApi, Error, FilePage, MkdirOutcome, RemoteConfig, ResourceInfo, Result,
    UploadLink,
};

use crate::models::{ApiError, Link};

/// Base URL of the public REST API
pub const DEFAULT_ENDPOINT: &str = "https://cloud-api.yandex.net/v1/disk/";

/// Yandex Disk REST client
pub struct YandexClient {
    inner: reqwest::Client,
    base: Url,
    access_token: String,
}

impl YandexClient {
    /// Create a client for an access token, optionally against another endpoint
    pub fn new(access_token: impl Into<String>, endpoint: Option<&str>) -> Result<Self> {
        let mut endpoint = endpoint.unwrap_or(DEFAULT_ENDPOINT).to_string();
        if !endpoint.ends_with('/') {
            endpoint.push('/');
        }
        let base = Url::parse(&endpoint)?;

        let inner = reqwest::Client::builder()
            .user_agent(concat!("ydisk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self {
            inner,
            base,
            access_token: access_token.into(),
        })
    }

    /// Create a client from a configured remote
    ///
    /// Fails with a configuration error when the stored token cannot be decoded.
    pub fn from_remote(remote: &RemoteConfig) -> Result<Self> {
        let token = remote.oauth_token()?;
        Self::new(token.access_token, remote.endpoint.as_deref())
    }

    /// Build an API URL from a relative endpoint and query pairs
    pub fn url(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = self.base.join(endpoint)?;
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }

    async fn call(&self, method: Method, url: Url) -> Result<Response> {
        tracing::debug!(%method, %url, "disk api request");
        self.inner
            .request(method, url)
            .header(header::AUTHORIZATION, format!("OAuth {}", self.access_token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(network_error)
    }

    /// Ask the API for an upload or download link
    async fn link(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Link> {
        let response = self.call(Method::GET, self.url(endpoint, query)?).await?;
        check(response)
            .await?
            .json::<Link>()
            .await
            .map_err(network_error)
    }
}

fn network_error(e: reqwest::Error) -> Error {
    Error::Network(e.to_string())
}

/// Map a non-success status and its body onto an error
pub fn status_error(status: StatusCode, body: &str) -> Error {
    let text = ApiError::describe(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Auth(text),
        StatusCode::NOT_FOUND => Error::NotFound(text),
        StatusCode::CONFLICT => Error::Conflict(text),
        _ => Error::Remote {
            status: status.as_u16(),
            body: text,
        },
    }
}

async fn into_error(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    status_error(status, &body)
}

async fn check(response: Response) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(into_error(response).await)
    }
}

#[async_trait]
impl DiskApi for YandexClient {
    async fn create_dir(&self, path: &str) -> Result<MkdirOutcome> {
        let url = self.url("resources", &[("path", path)])?;
        let response = self.call(Method::PUT, url).await?;

        match response.status() {
            StatusCode::CREATED => Ok(MkdirOutcome::Created),
            StatusCode::CONFLICT => Ok(MkdirOutcome::AlreadyExists),
            _ => Err(into_error(response).await),
        }
    }

    async fn list_files(&self, limit: u32, offset: u32) -> Result<FilePage> {
        let limit = limit.to_string();
        let offset = offset.to_string();
        let url = self.url(
            "resources/files",
            &[("limit", limit.as_str()), ("offset", offset.as_str())],
        )?;

        check(self.call(Method::GET, url).await?)
            .await?
            .json::<FilePage>()
            .await
            .map_err(network_error)
    }

    async fn resource_info(&self, path: &str) -> Result<ResourceInfo> {
        let url = self.url("resources", &[("path", path)])?;

        check(self.call(Method::GET, url).await?)
            .await?
            .json::<ResourceInfo>()
            .await
            .map_err(network_error)
    }

    async fn upload_link(&self, path: &str, overwrite: bool) -> Result<UploadLink> {
        let overwrite = overwrite.to_string();
        let link = self
            .link(
                "resources/upload",
                &[("path", path), ("overwrite", overwrite.as_str())],
            )
            .await?;

        Ok(UploadLink {
            path: path.to_string(),
            href: link.href,
            method: link.method,
        })
    }

    async fn upload(&self, link: &UploadLink, body: ByteStream) -> Result<()> {
        let method = Method::from_bytes(link.method.to_ascii_uppercase().as_bytes())
            .unwrap_or(Method::PUT);
        tracing::debug!(path = %link.path, %method, "uploading to link");

        let response = self
            .inner
            .request(method, link.href.as_str())
            .body(reqwest::Body::wrap_stream(body))
            .send()
            .await
            .map_err(network_error)?;
        check(response).await?;

        Ok(())
    }

    async fn download(&self, path: &str) -> Result<ByteStream> {
        let link = self.link("resources/download", &[("path", path)]).await?;

        let response = self
            .inner
            .get(link.href.as_str())
            .send()
            .await
            .map_err(network_error)?;
        let response = check(response).await?;

        Ok(response.bytes_stream().map_err(network_error).boxed())
    }

    async fn delete(&self, path: &str, permanently: bool) -> Result<()> {
        let permanently = permanently.to_string();
        let url = self.url(
            "resources",
            &[("path", path), ("permanently", permanently.as_str())],
        )?;

        check(self.call(Method::DELETE, url).await?).await?;
        Ok(())
    }
}
