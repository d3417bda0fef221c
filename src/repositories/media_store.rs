use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    config::{Config, DEFAULT_MAX_MEDIA_BYTES},
    errors::{AppError, AppResult},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Turns a stored media reference into bytes.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn resolve(&self, media_url: &str) -> AppResult<MediaPayload>;
}

/// Resolves inline `data:` references, files under a root directory and,
/// for allowlisted hosts only, http(s) urls. Remote fetch is off until hosts
/// are configured.
pub struct LocalMediaStore {
    root: PathBuf,
    allowed_hosts: Vec<String>,
    max_bytes: usize,
    http: Option<reqwest::Client>,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            allowed_hosts: Vec::new(),
            max_bytes: DEFAULT_MAX_MEDIA_BYTES,
            http: None,
        }
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(&config.media_root)
            .with_max_bytes(config.media_max_bytes)
            .with_remote_hosts(&config.media_allowed_hosts)
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    /// Enables remote fetch for exactly these hosts. Redirects are not
    /// followed, so a listed host cannot bounce a request elsewhere.
    pub fn with_remote_hosts(mut self, hosts: &[String]) -> AppResult<Self> {
        self.allowed_hosts = hosts
            .iter()
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();
        self.http = if self.allowed_hosts.is_empty() {
            None
        } else {
            Some(
                reqwest::Client::builder()
                    .redirect(reqwest::redirect::Policy::none())
                    .no_proxy()
                    .build()?,
            )
        };
        Ok(self)
    }

    fn remote_client(&self, media_url: &str) -> AppResult<&reqwest::Client> {
        let Some(http) = &self.http else {
            return Err(AppError::ValidationError(
                "Remote media is disabled on this server".to_string(),
            ));
        };
        let url = reqwest::Url::parse(media_url)
            .map_err(|err| AppError::ValidationError(format!("Invalid media url '{}': {}", media_url, err)))?;
        let host = url.host_str().unwrap_or_default().to_lowercase();
        if !self.allowed_hosts.contains(&host) {
            return Err(AppError::ValidationError(format!(
                "Media host '{}' is not allowed",
                host
            )));
        }
        Ok(http)
    }

    async fn fetch(&self, media_url: &str) -> AppResult<MediaPayload> {
        let http = self.remote_client(media_url)?;
        let mut response = http.get(media_url).send().await?;
        if !response.status().is_success() {
            return Err(AppError::MediaError(format!(
                "Fetching '{}' returned {}",
                media_url,
                response.status()
            )));
        }
        let too_large = || {
            AppError::MediaError(format!(
                "Media '{}' exceeds {} bytes",
                media_url, self.max_bytes
            ))
        };
        if response.content_length().is_some_and(|len| len > self.max_bytes as u64) {
            return Err(too_large());
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if bytes.len() + chunk.len() > self.max_bytes {
                return Err(too_large());
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(MediaPayload { bytes, content_type })
    }

    fn local_path(&self, reference: &str) -> AppResult<PathBuf> {
        let relative = Path::new(reference);
        let escapes_root = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes_root {
            return Err(AppError::ValidationError(format!(
                "Media path '{}' must stay inside the media root",
                reference
            )));
        }
        Ok(self.root.join(relative))
    }
}

/// Decodes `data:<mime>;base64,<payload>`. A bare base64 string without a
/// comma is accepted as the payload itself.
pub fn decode_inline(reference: &str) -> AppResult<MediaPayload> {
    let (header, data) = match reference.split_once(',') {
        Some((header, data)) => (Some(header), data),
        None => (None, reference),
    };
    let content_type = header
        .and_then(|h| h.strip_prefix("data:"))
        .and_then(|h| h.split(';').next())
        .filter(|mime| !mime.is_empty())
        .map(str::to_string);
    let bytes = STANDARD.decode(data.trim())?;
    Ok(MediaPayload { bytes, content_type })
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn resolve(&self, media_url: &str) -> AppResult<MediaPayload> {
        if media_url.starts_with("data:") {
            return decode_inline(media_url);
        }

        if media_url.starts_with("http://") || media_url.starts_with("https://") {
            return self.fetch(media_url).await;
        }

        let path = self.local_path(media_url)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(MediaPayload {
                bytes,
                content_type: None,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound(
                format!("Media '{}' not found", media_url),
            )),
            Err(err) => Err(err.into()),
        }
    }
}
