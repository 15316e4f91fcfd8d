use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode, Url};

use crate::catalog::SoundMap;

#[cfg(test)]
pub(crate) mod fake;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: String, status: StatusCode },
    #[error("decoding response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("base url {0} cannot carry path segments")]
    InvalidBaseUrl(String),
    #[error("reading upload file {path}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A validated upload, ready to post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundUpload {
    pub name: String,
    pub price: u64,
    pub cooldown_millis: u64,
    pub file: PathBuf,
}

impl SoundUpload {
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }
}

/// Remote sound catalog.
#[async_trait]
pub trait SoundApi: Send + Sync {
    async fn fetch_sounds(&self) -> Result<SoundMap, ApiError>;

    async fn delete_sound(&self, id: &str) -> Result<(), ApiError>;

    async fn upload_sound(&self, upload: &SoundUpload) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpSoundApi {
    client: Client,
    base_url: Url,
}

impl HttpSoundApi {
    pub fn new(base_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building http client")?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl SoundApi for HttpSoundApi {
    async fn fetch_sounds(&self) -> Result<SoundMap, ApiError> {
        let url = self.endpoint(&["sounds"])?;
        tracing::debug!(%url, "fetching sound catalog");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        let response = ensure_success(&url, response)?;
        response
            .json::<SoundMap>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    async fn delete_sound(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["sound", id])?;
        tracing::debug!(%url, id, "deleting sound");
        let response = self
            .client
            .delete(url.clone())
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        ensure_success(&url, response)?;
        Ok(())
    }

    async fn upload_sound(&self, upload: &SoundUpload) -> Result<(), ApiError> {
        let url = self.endpoint(&["sound"])?;
        let bytes = tokio::fs::read(&upload.file)
            .await
            .map_err(|source| ApiError::ReadFile {
                path: upload.file.clone(),
                source,
            })?;
        tracing::debug!(%url, name = %upload.name, size = bytes.len(), "uploading sound");
        let form = Form::new().part("file", Part::bytes(bytes).file_name(upload.file_name()));
        let response = self
            .client
            .post(url.clone())
            .query(&[
                ("price", upload.price.to_string()),
                ("cooldown", upload.cooldown_millis.to_string()),
                ("name", upload.name.clone()),
            ])
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        ensure_success(&url, response)?;
        Ok(())
    }
}

fn ensure_success(url: &Url, response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            url: url.to_string(),
            status,
        })
    }
}
