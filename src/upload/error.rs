use thiserror::Error;

/// Errors from the three-step file upload pipeline
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Debes iniciar sesión para continuar")]
    MissingToken,

    #[error("Failed to obtain upload target for {file_name}: {message}")]
    Presign { file_name: String, message: String },

    #[error("Transfer of {file_name} rejected with status {status}")]
    Transfer { file_name: String, status: u16 },

    #[error("Failed to transfer {file_name}: {message}")]
    Transport { file_name: String, message: String },

    #[error("Failed to confirm upload of {file_name}: {message}")]
    Confirm { file_name: String, message: String },

    #[error("Debes iniciar sesión para continuar")]
    Unauthorized,

    #[error("Upload of {file_name} was cancelled")]
    Cancelled { file_name: String },
}

impl UploadError {
    /// The file the failure belongs to, when the pipeline had one in hand.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            UploadError::Presign { file_name, .. }
            | UploadError::Transfer { file_name, .. }
            | UploadError::Transport { file_name, .. }
            | UploadError::Confirm { file_name, .. }
            | UploadError::Cancelled { file_name } => Some(file_name),
            UploadError::MissingToken | UploadError::Unauthorized => None,
        }
    }
}
