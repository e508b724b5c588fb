//! Path routing for the image service.

use std::borrow::Cow;

use crate::error::ProfileImageError;

const PROFILE_PREFIX: &str = "/profile/";
const IMAGE_SUFFIX: &str = "/image";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/profile/{user}/image`, user id percent-decoded
    ProfileImage(String),
    Placeholder,
    Health,
    Metrics,
    NotFound,
}

impl Route {
    pub fn parse(path: &str, placeholder_path: &str) -> Result<Self, ProfileImageError> {
        if path == placeholder_path {
            return Ok(Route::Placeholder);
        }
        match path {
            "/health" => return Ok(Route::Health),
            "/metrics" => return Ok(Route::Metrics),
            _ => {}
        }

        let Some(user) = path
            .strip_prefix(PROFILE_PREFIX)
            .and_then(|rest| rest.strip_suffix(IMAGE_SUFFIX))
        else {
            return Ok(Route::NotFound);
        };

        // Exactly one non-empty segment between the prefix and suffix
        if user.is_empty() || user.contains('/') {
            return Ok(Route::NotFound);
        }

        let decoded: Cow<'_, str> = urlencoding::decode(user).map_err(|_| {
            ProfileImageError::Request("user id is not valid UTF-8 after decoding".to_string())
        })?;
        if decoded.trim().is_empty() {
            return Err(ProfileImageError::Request("user id is empty".to_string()));
        }

        Ok(Route::ProfileImage(decoded.into_owned()))
    }
}
