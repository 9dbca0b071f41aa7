use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use tracing::debug;

use super::{ActionReply, ApiEnvelope, TargetApi};
use crate::board::model::Target;
use crate::board::validate::NewTargetRequest;
use crate::error::BoardError;

#[derive(Clone, Debug)]
pub struct ClientOptions {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub proxy: Option<String>,
    /// Raw `Cookie` header, e.g. a copied session cookie.
    pub cookie: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            timeout_seconds: 10,
            proxy: None,
            cookie: None,
        }
    }
}

/// [`TargetApi`] over reqwest.
#[derive(Clone, Debug)]
pub struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    pub fn new(options: &ClientOptions) -> Result<Self, BoardError> {
        let base = Url::parse(options.base_url.trim()).map_err(|_| BoardError::InvalidUrl {
            url: options.base_url.clone(),
        })?;
        if base.cannot_be_a_base() {
            return Err(BoardError::InvalidUrl {
                url: options.base_url.clone(),
            });
        }
        let client = build_client(options)?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, BoardError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BoardError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<ApiEnvelope, BoardError> {
        let response = request
            .send()
            .await
            .map_err(|source| BoardError::Transport { source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| BoardError::Transport { source })?;
        debug!(status = status.as_u16(), bytes = body.len(), "api response");
        serde_json::from_slice::<ApiEnvelope>(&body).map_err(|source| BoardError::Decode {
            status: status.as_u16(),
            source,
        })
    }
}

fn build_client(options: &ClientOptions) -> Result<reqwest::Client, BoardError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    if let Some(cookie) = options.cookie.as_deref().filter(|c| !c.trim().is_empty()) {
        let value = reqwest::header::HeaderValue::from_str(cookie.trim())
            .map_err(|_| BoardError::InvalidCookie)?;
        headers.insert(reqwest::header::COOKIE, value);
    }

    let timeout = Duration::from_secs(options.timeout_seconds.max(1));
    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .cookie_store(true)
        .timeout(timeout);

    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|e| BoardError::ProxySetup {
            proxy: proxy.to_string(),
            source: e,
        })?;
        builder = builder.proxy(proxy_cfg);
    }

    builder
        .build()
        .map_err(|source| BoardError::HttpClientBuild { source })
}

#[async_trait]
impl TargetApi for HttpApi {
    async fn list_targets(&self, status: &str) -> Result<Vec<Target>, BoardError> {
        let url = self.endpoint(&["api", "targets"])?;
        debug!(%url, status, "listing targets");
        self.send(self.client.get(url).query(&[("status", status)]))
            .await?
            .into_targets()
    }

    async fn create_target(&self, request: &NewTargetRequest) -> Result<ActionReply, BoardError> {
        let url = self.endpoint(&["api", "targets"])?;
        debug!(%url, nickname = %request.nickname, "creating target");
        self.send(self.client.post(url).json(request))
            .await?
            .into_reply()
    }

    async fn delete_target(&self, id: u64) -> Result<ActionReply, BoardError> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "targets", &id])?;
        debug!(%url, "deleting target");
        self.send(self.client.delete(url)).await?.into_reply()
    }

    async fn complete_target(&self, id: u64) -> Result<ActionReply, BoardError> {
        let id = id.to_string();
        let url = self.endpoint(&["api", "targets", &id, "complete"])?;
        debug!(%url, "completing target");
        self.send(self.client.post(url)).await?.into_reply()
    }

    async fn delete_image(&self, filename: &str) -> Result<ActionReply, BoardError> {
        let url = self.endpoint(&["delete", filename])?;
        debug!(%url, "deleting gallery image");
        self.send(
            self.client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json"),
        )
        .await?
        .into_reply()
    }
}
