use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;

use super::{ApiError, SoundApi, SoundUpload};
use crate::catalog::SoundMap;

/// In-memory stand-in for the sound server.
#[derive(Debug, Default)]
pub(crate) struct FakeSoundApi {
    catalog: Option<SoundMap>,
    fail_deletes: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeSoundApi {
    pub(crate) fn with_catalog(catalog: SoundMap) -> Self {
        Self {
            catalog: Some(catalog),
            ..Self::default()
        }
    }

    pub(crate) fn unreachable() -> Self {
        Self::default()
    }

    pub(crate) fn failing_deletes(mut self) -> Self {
        self.fail_deletes = true;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn unavailable(path: &str) -> ApiError {
        ApiError::Status {
            url: format!("http://fake.test{path}"),
            status: StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[async_trait]
impl SoundApi for FakeSoundApi {
    async fn fetch_sounds(&self) -> Result<SoundMap, ApiError> {
        self.calls.lock().push("GET /sounds".to_string());
        self.catalog
            .clone()
            .ok_or_else(|| Self::unavailable("/sounds"))
    }

    async fn delete_sound(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/sound/{id}");
        self.calls.lock().push(format!("DELETE {path}"));
        if self.fail_deletes {
            return Err(Self::unavailable(&path));
        }
        Ok(())
    }

    async fn upload_sound(&self, upload: &SoundUpload) -> Result<(), ApiError> {
        self.calls
            .lock()
            .push(format!("POST /sound?name={}", upload.name));
        Ok(())
    }
}
