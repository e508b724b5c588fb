//! In-memory profile image store

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{LookupError, ProfileImageStore};
use crate::profile::ImageSize;

/// Image store keeping uploaded images in a map
///
/// A thumbnail request falls back to the main image when no thumbnail was stored.
#[derive(Debug, Default)]
pub struct InMemoryImageStore {
    images: RwLock<HashMap<(String, ImageSize), Bytes>>,
}

impl InMemoryImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or replace) an image
    pub fn insert(&self, user_id: impl Into<String>, size: ImageSize, data: impl Into<Bytes>) {
        self.images
            .write()
            .insert((user_id.into(), size), data.into());
    }

    /// Remove an image, returning whether one was stored
    pub fn remove(&self, user_id: &str, size: ImageSize) -> bool {
        self.images
            .write()
            .remove(&(user_id.to_string(), size))
            .is_some()
    }

    pub fn len(&self) -> usize {
        self.images.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.read().is_empty()
    }

    /// Stored image, with an empty one treated as absent
    fn get(&self, user_id: &str, size: ImageSize) -> Option<Bytes> {
        self.images
            .read()
            .get(&(user_id.to_string(), size))
            .filter(|b| !b.is_empty())
            .cloned()
    }
}

#[async_trait]
impl ProfileImageStore for InMemoryImageStore {
    async fn current_image(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<Bytes>, LookupError> {
        let found = match size {
            ImageSize::Main => self.get(user_id, ImageSize::Main),
            ImageSize::Thumbnail => self
                .get(user_id, ImageSize::Thumbnail)
                .or_else(|| self.get(user_id, ImageSize::Main)),
        };
        Ok(found)
    }
}
