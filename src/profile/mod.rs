//! Profile image model and selection.
//!
//! A render pass builds an [`ImageRequest`], reads the installation's
//! [`PictureType`], and hands both to the resolver, which produces exactly one
//! [`ResolvedImage`]. The renderer turns that into an HTTP response.

pub mod resolver;

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ProfileImageError;

pub use resolver::{resolve, ImageResolver};

/// Requested image size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSize {
    #[default]
    Main,
    Thumbnail,
}

impl ImageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Main => "main",
            ImageSize::Thumbnail => "thumbnail",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = ProfileImageError;

    /// Accepts `main`/`thumbnail` in any case, and the legacy codes `1`/`2`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "main" | "1" => Ok(ImageSize::Main),
            "thumbnail" | "thumb" | "2" => Ok(ImageSize::Thumbnail),
            other => Err(ProfileImageError::Request(format!(
                "unknown image size '{}', expected 'main' or 'thumbnail'",
                other
            ))),
        }
    }
}

/// Installation-wide picture setting: where profile images come from.
///
/// Unknown setting values become `Invalid` instead of failing to parse, so a
/// mistyped setting degrades to the placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PictureType {
    Upload,
    ExternalUrl,
    Invalid,
}

impl PictureType {
    pub fn from_setting(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "upload" | "1" => PictureType::Upload,
            "url" | "external" | "2" => PictureType::ExternalUrl,
            _ => PictureType::Invalid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PictureType::Upload => "upload",
            PictureType::ExternalUrl => "url",
            PictureType::Invalid => "invalid",
        }
    }
}

impl From<String> for PictureType {
    fn from(value: String) -> Self {
        PictureType::from_setting(&value)
    }
}

impl From<PictureType> for String {
    fn from(value: PictureType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PictureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One render call's worth of input. Built per request, dropped after use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub subject_user_id: String,
    pub is_view_allowed: bool,
    pub size: ImageSize,
    pub is_cacheable: bool,
}

impl ImageRequest {
    pub fn new(
        subject_user_id: impl Into<String>,
        is_view_allowed: bool,
        size: ImageSize,
        is_cacheable: bool,
    ) -> Self {
        Self {
            subject_user_id: subject_user_id.into(),
            is_view_allowed,
            size,
            is_cacheable,
        }
    }
}

/// The single image reference produced for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImage {
    /// Static fallback served by the host
    Placeholder,
    /// Uploaded image bytes; `cacheable` only affects HTTP caching headers
    Bytes { data: Bytes, cacheable: bool },
    /// Externally hosted image, referenced directly
    Url(String),
}

impl ResolvedImage {
    /// Short label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            ResolvedImage::Placeholder => "placeholder",
            ResolvedImage::Bytes { .. } => "upload",
            ResolvedImage::Url(_) => "url",
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ResolvedImage::Placeholder)
    }
}
