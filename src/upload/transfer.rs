use crate::upload::error::UploadError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

/// Step 2 of the upload pipeline: the raw byte transfer to a pre-signed URL.
/// No bearer token is sent; the URL itself carries the authorization.
#[async_trait]
pub trait ObjectTransfer: Send + Sync + 'static {
    async fn put(
        &self,
        upload_url: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), UploadError>;
}

#[async_trait]
impl<T: ObjectTransfer + ?Sized> ObjectTransfer for Arc<T> {
    async fn put(
        &self,
        upload_url: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), UploadError> {
        (**self).put(upload_url, file_name, content_type, data).await
    }
}

/// Real transfer over HTTP PUT.
#[derive(Clone)]
pub struct HttpObjectTransfer {
    http: reqwest::Client,
}

impl Default for HttpObjectTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpObjectTransfer {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        HttpObjectTransfer { http }
    }
}

#[async_trait]
impl ObjectTransfer for HttpObjectTransfer {
    async fn put(
        &self,
        upload_url: &str,
        file_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<(), UploadError> {
        debug!("Transferring {} ({} bytes)", file_name, data.len());
        let response = self
            .http
            .put(upload_url)
            .header("Content-Type", content_type)
            .body(data)
            .send()
            .await
            .map_err(|e| UploadError::Transport {
                file_name: file_name.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::Transfer {
                file_name: file_name.to_string(),
                status: status.as_u16(),
            });
        }
        debug!("Transferred {file_name}");
        Ok(())
    }
}

/// In-memory transfer for testing, with per-file failure injection
pub struct FakeObjectTransfer {
    objects: Mutex<HashMap<String, Bytes>>,
    fail_files: Mutex<HashSet<String>>,
}

impl Default for FakeObjectTransfer {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeObjectTransfer {
    pub fn new() -> Self {
        FakeObjectTransfer {
            objects: Mutex::new(HashMap::new()),
            fail_files: Mutex::new(HashSet::new()),
        }
    }

    /// Make transfers of the named file fail
    pub fn fail_file(&self, file_name: &str) {
        self.fail_files.lock().unwrap().insert(file_name.to_string());
    }

    /// Bytes stored under an upload URL, if that transfer happened
    pub fn stored(&self, upload_url: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(upload_url).cloned()
    }

    pub fn transfer_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectTransfer for FakeObjectTransfer {
    async fn put(
        &self,
        upload_url: &str,
        file_name: &str,
        _content_type: &str,
        data: Bytes,
    ) -> Result<(), UploadError> {
        if self.fail_files.lock().unwrap().contains(file_name) {
            debug!("[FAKE] Simulating transfer failure for {file_name}");
            return Err(UploadError::Transfer {
                file_name: file_name.to_string(),
                status: 403,
            });
        }
        debug!("[FAKE] Storing {} bytes at {}", data.len(), upload_url);
        self.objects
            .lock()
            .unwrap()
            .insert(upload_url.to_string(), data);
        Ok(())
    }
}
