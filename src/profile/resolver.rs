//! Image selection.
//!
//! Precedence, first match wins:
//! 1. viewing not allowed -> placeholder, no lookups
//! 2. `Upload` -> stored bytes, or placeholder when none/empty
//! 3. `ExternalUrl` -> external URL, or placeholder when none
//! 4. anything else -> placeholder
//!
//! Lookup failures are logged and treated like an absent result.

use std::sync::Arc;

use super::{ImageRequest, PictureType, ResolvedImage};
use crate::lookup::{ExternalImageUrls, PictureSettings, ProfileImageStore};

/// Select the image for `request` given the installation's picture type.
///
/// A blank external URL counts as absent, since redirecting to it would loop.
pub async fn resolve(
    request: &ImageRequest,
    picture_type: PictureType,
    store: &dyn ProfileImageStore,
    urls: &dyn ExternalImageUrls,
) -> ResolvedImage {
    if !request.is_view_allowed {
        return ResolvedImage::Placeholder;
    }

    let user = request.subject_user_id.as_str();
    match picture_type {
        PictureType::Upload => match store.current_image(user, request.size).await {
            Ok(Some(data)) if !data.is_empty() => ResolvedImage::Bytes {
                data,
                cacheable: request.is_cacheable,
            },
            Ok(_) => ResolvedImage::Placeholder,
            Err(e) => {
                tracing::warn!(
                    user = %user,
                    size = %request.size,
                    error = %e,
                    "Profile image lookup failed, using placeholder"
                );
                ResolvedImage::Placeholder
            }
        },
        PictureType::ExternalUrl => match urls.external_url(user, request.size).await {
            Ok(Some(url)) if !url.trim().is_empty() => ResolvedImage::Url(url),
            Ok(_) => ResolvedImage::Placeholder,
            Err(e) => {
                tracing::warn!(
                    user = %user,
                    size = %request.size,
                    error = %e,
                    "External image URL lookup failed, using placeholder"
                );
                ResolvedImage::Placeholder
            }
        },
        PictureType::Invalid => ResolvedImage::Placeholder,
    }
}

/// Resolver with its collaborators injected
#[derive(Clone)]
pub struct ImageResolver {
    settings: Arc<dyn PictureSettings>,
    store: Arc<dyn ProfileImageStore>,
    urls: Arc<dyn ExternalImageUrls>,
}

impl ImageResolver {
    pub fn new(
        settings: Arc<dyn PictureSettings>,
        store: Arc<dyn ProfileImageStore>,
        urls: Arc<dyn ExternalImageUrls>,
    ) -> Self {
        Self {
            settings,
            store,
            urls,
        }
    }

    /// Resolve `request`, reading the picture setting only when viewing is allowed.
    pub async fn resolve(&self, request: &ImageRequest) -> ResolvedImage {
        if !request.is_view_allowed {
            tracing::debug!(
                user = %request.subject_user_id,
                "Profile image not visible to viewer"
            );
            return ResolvedImage::Placeholder;
        }

        let picture_type = self.settings.picture_type();
        let resolved = resolve(
            request,
            picture_type,
            self.store.as_ref(),
            self.urls.as_ref(),
        )
        .await;

        tracing::debug!(
            user = %request.subject_user_id,
            size = %request.size,
            picture_type = %picture_type,
            resolved = resolved.kind(),
            "Resolved profile image"
        );
        resolved
    }
}

impl std::fmt::Debug for ImageResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResolver").finish_non_exhaustive()
    }
}
