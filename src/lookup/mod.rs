//! Collaborator seams consumed by the resolver.
//!
//! The resolver never reaches for globals: the picture setting, the binary
//! image store and the external URL directory are injected as trait objects.
//! Implementations here cover the configuration-backed and filesystem-backed
//! cases plus an in-memory store for tests and embedding.

pub mod fs_store;
pub mod memory;
pub mod url_directory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::profile::{ImageSize, PictureType};

pub use fs_store::FsImageStore;
pub use memory::InMemoryImageStore;
pub use url_directory::ConfiguredUrlDirectory;

/// Failure inside a lookup collaborator
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid user id: {0:?}")]
    InvalidUserId(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Source of the installation-wide picture setting
pub trait PictureSettings: Send + Sync {
    fn picture_type(&self) -> PictureType;
}

/// Binary store of uploaded profile images
#[async_trait]
pub trait ProfileImageStore: Send + Sync {
    /// Current image for `user_id` at `size`, `None` when nothing is uploaded
    async fn current_image(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<Bytes>, LookupError>;
}

/// Resolver for externally hosted profile image URLs
#[async_trait]
pub trait ExternalImageUrls: Send + Sync {
    /// External URL for `user_id` at `size`, `None` when the user has none
    async fn external_url(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<String>, LookupError>;
}

/// Picture setting fixed at construction, typically from the config file
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredPictureSettings {
    picture_type: PictureType,
}

impl ConfiguredPictureSettings {
    pub fn new(picture_type: PictureType) -> Self {
        Self { picture_type }
    }
}

impl PictureSettings for ConfiguredPictureSettings {
    fn picture_type(&self) -> PictureType {
        self.picture_type
    }
}

/// Reject user ids that could escape a per-user directory or a URL path segment
pub(crate) fn validate_user_id(user_id: &str) -> Result<(), LookupError> {
    let suspicious = user_id.is_empty()
        || user_id == "."
        || user_id.contains("..")
        || user_id.contains('/')
        || user_id.contains('\\')
        || user_id.contains('\0');
    if suspicious {
        return Err(LookupError::InvalidUserId(user_id.to_string()));
    }
    Ok(())
}
