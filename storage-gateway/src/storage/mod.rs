// Local filesystem storage for uploaded files

pub mod local;
pub mod sanitize;

pub use local::{FileStore, StagedFile, UploadBatch};
pub use sanitize::{sanitize_filename, StoredName, STAGING_DIR};
