//! Filesystem-backed profile image store.
//!
//! Layout: `<root>/<user_id>/<size>.<ext>` where `size` is `main` or
//! `thumbnail` and `ext` is one of [`IMAGE_EXTENSIONS`], probed in order.

use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{validate_user_id, LookupError, ProfileImageStore};
use crate::constants::IMAGE_EXTENSIONS;
use crate::profile::ImageSize;

/// Profile image store reading uploaded images from a directory tree
#[derive(Debug, Clone)]
pub struct FsImageStore {
    root: PathBuf,
}

impl FsImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Candidate paths for one user and size, in probe order
    fn candidates(&self, user_id: &str, size: ImageSize) -> Vec<PathBuf> {
        let user_dir = self.root.join(user_id);
        IMAGE_EXTENSIONS
            .iter()
            .map(|ext| user_dir.join(format!("{}.{}", size.as_str(), ext)))
            .collect()
    }

    async fn read_first(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<Bytes>, LookupError> {
        for path in self.candidates(user_id, size) {
            match tokio::fs::read(&path).await {
                Ok(data) if data.is_empty() => {
                    tracing::debug!(path = %path.display(), "Skipping empty profile image");
                    continue;
                }
                Ok(data) => {
                    tracing::debug!(
                        path = %path.display(),
                        bytes = data.len(),
                        "Loaded profile image from disk"
                    );
                    return Ok(Some(Bytes::from(data)));
                }
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(LookupError::Io(e)),
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ProfileImageStore for FsImageStore {
    async fn current_image(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<Bytes>, LookupError> {
        validate_user_id(user_id)?;

        let found = self.read_first(user_id, size).await?;
        if matches!(&found, Some(b) if !b.is_empty()) || size == ImageSize::Main {
            return Ok(found);
        }

        // No thumbnail uploaded, serve the main image instead
        self.read_first(user_id, ImageSize::Main).await
    }
}
