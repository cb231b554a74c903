use crate::api::client::ApiClient;
use crate::api::error::ApiError;
use crate::api::models::{
    ConfirmUploadRequest, GenerateUploadUrlRequest, UploadedFile,
};
use crate::session::token::TokenStore;
use crate::upload::error::UploadError;
use crate::upload::transfer::ObjectTransfer;
use bytes::Bytes;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A file selected for upload, read fully into memory.
#[derive(Debug, Clone)]
pub struct FileToUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Runs the three-step upload pipeline: request a pre-signed target,
/// transfer the bytes, confirm. Each file either completes all three steps
/// or fails; there is no partial descriptor.
pub struct Uploader {
    api: Arc<dyn ApiClient>,
    transfer: Arc<dyn ObjectTransfer>,
    token_store: Arc<dyn TokenStore>,
    max_concurrent: usize,
}

impl Uploader {
    pub fn new(
        api: Arc<dyn ApiClient>,
        transfer: Arc<dyn ObjectTransfer>,
        token_store: Arc<dyn TokenStore>,
        max_concurrent: usize,
    ) -> Self {
        Uploader {
            api,
            transfer,
            token_store,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Upload a single file through all three steps. The token is read
    /// fresh from the store; a missing token fails before any network
    /// traffic.
    pub async fn upload(&self, file: &FileToUpload) -> Result<UploadedFile, UploadError> {
        let token = self
            .token_store
            .load()
            .await
            .map_err(|_| UploadError::MissingToken)?
            .ok_or(UploadError::MissingToken)?;

        debug!("Starting upload pipeline for {}", file.file_name);

        let target = self
            .api
            .generate_upload_url(
                &GenerateUploadUrlRequest {
                    file_name: file.file_name.clone(),
                    content_type: file.content_type.clone(),
                },
                &token,
            )
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => UploadError::Unauthorized,
                ApiError::Cancelled => UploadError::Cancelled {
                    file_name: file.file_name.clone(),
                },
                other => UploadError::Presign {
                    file_name: file.file_name.clone(),
                    message: other.to_string(),
                },
            })?;

        self.transfer
            .put(
                &target.upload_url,
                &file.file_name,
                &file.content_type,
                file.data.clone(),
            )
            .await?;

        let confirmed = self
            .api
            .confirm_upload(
                &ConfirmUploadRequest {
                    file_name: file.file_name.clone(),
                    content_type: file.content_type.clone(),
                    s3_key: target.s3_key.clone(),
                },
                &token,
            )
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized => UploadError::Unauthorized,
                ApiError::Cancelled => UploadError::Cancelled {
                    file_name: file.file_name.clone(),
                },
                other => UploadError::Confirm {
                    file_name: file.file_name.clone(),
                    message: other.to_string(),
                },
            })?;

        info!("Uploaded {} -> {}", file.file_name, confirmed.file);
        Ok(UploadedFile {
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
            s3_key: target.s3_key,
            file_url: confirmed.file,
        })
    }

    /// Upload a batch with bounded concurrency. Outcomes come back in the
    /// input order; one file failing never aborts the others.
    pub async fn upload_all(
        self: &Arc<Self>,
        files: Vec<FileToUpload>,
    ) -> Vec<Result<UploadedFile, UploadError>> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));
        let file_names: Vec<String> = files.iter().map(|f| f.file_name.clone()).collect();
        let mut tasks = JoinSet::new();

        for (index, file) in files.into_iter().enumerate() {
            let uploader = Arc::clone(self);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                // Semaphore is never closed, so acquire cannot fail
                let _permit = semaphore.acquire().await;
                (index, uploader.upload(&file).await)
            });
        }

        let mut outcomes: Vec<Option<Result<UploadedFile, UploadError>>> = Vec::new();
        outcomes.resize_with(file_names.len(), || None);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => {
                    outcomes[index] = Some(outcome);
                }
                Err(e) => {
                    warn!("Upload task failed to complete: {e}");
                }
            }
        }

        outcomes
            .into_iter()
            .zip(file_names)
            .map(|(outcome, file_name)| {
                outcome.unwrap_or(Err(UploadError::Transport {
                    file_name,
                    message: "upload task aborted".to_string(),
                }))
            })
            .collect()
    }
}
