//! Rendering of resolved profile images as HTTP responses.
//!
//! - uploaded bytes are served inline; the cacheable flag only changes the
//!   caching headers
//! - external URLs become a `302` to the URL itself
//! - the placeholder becomes a `302` to the host's static placeholder path

pub mod cache_control;

use bytes::Bytes;
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, EXPIRES, LOCATION, PRAGMA};
use http::{HeaderValue, Response, StatusCode};
use http_body_util::Full;
use image::ImageFormat;
use std::time::Duration;

use crate::config::Config;
use crate::error::ProfileImageError;
use crate::profile::ResolvedImage;

pub use cache_control::CacheControl;

pub type ImageResponse = Response<Full<Bytes>>;

/// MIME type sniffed from the image's magic bytes
pub fn content_type_for(data: &[u8]) -> &'static str {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        Ok(ImageFormat::Ico) => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct ImageRenderer {
    placeholder_path: String,
    max_age: Duration,
}

impl ImageRenderer {
    pub fn new(placeholder_path: impl Into<String>, max_age: Duration) -> Self {
        Self {
            placeholder_path: placeholder_path.into(),
            max_age,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.picture.placeholder_path.clone(),
            Duration::from_secs(config.cache.max_age_seconds),
        )
    }

    pub fn placeholder_path(&self) -> &str {
        &self.placeholder_path
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn render(&self, image: &ResolvedImage) -> Result<ImageResponse, ProfileImageError> {
        match image {
            ResolvedImage::Bytes { data, cacheable } => {
                let cache_control = if *cacheable {
                    CacheControl::public_max_age(self.max_age)
                } else {
                    CacheControl::no_caching()
                };
                self.image_response(data.clone(), &cache_control)
            }
            ResolvedImage::Url(url) => match HeaderValue::from_str(url) {
                Ok(location) => redirect(location),
                Err(_) => {
                    tracing::warn!(url = %url, "External image URL is not a valid header value");
                    self.placeholder_redirect()
                }
            },
            ResolvedImage::Placeholder => self.placeholder_redirect(),
        }
    }

    /// 200 response carrying image bytes with the given caching directives
    pub fn image_response(
        &self,
        data: Bytes,
        cache_control: &CacheControl,
    ) -> Result<ImageResponse, ProfileImageError> {
        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(CONTENT_TYPE, content_type_for(&data))
            .header(CONTENT_LENGTH, data.len())
            .header(CACHE_CONTROL, cache_control.to_header_value());

        if cache_control.no_store {
            builder = builder.header(PRAGMA, "no-cache").header(EXPIRES, "0");
        }

        Ok(builder.body(Full::new(data))?)
    }

    fn placeholder_redirect(&self) -> Result<ImageResponse, ProfileImageError> {
        let location = HeaderValue::from_str(&self.placeholder_path).map_err(|e| {
            ProfileImageError::Config(format!(
                "placeholder path '{}' is not a valid header value: {}",
                self.placeholder_path, e
            ))
        })?;
        redirect(location)
    }
}

fn redirect(location: HeaderValue) -> Result<ImageResponse, ProfileImageError> {
    Ok(Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location)
        .header(CACHE_CONTROL, CacheControl::revalidate().to_header_value())
        .body(Full::new(Bytes::new()))?)
}
