pub mod error;
pub mod pipeline;
pub mod transfer;

pub use error::UploadError;
pub use pipeline::{FileToUpload, Uploader};
pub use transfer::{HttpObjectTransfer, ObjectTransfer};
