// Configuration module

mod server;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::constants::{DEFAULT_MAX_AGE_SECS, DEFAULT_PLACEHOLDER_PATH, DEFAULT_VIEWER_HEADER};
use crate::privacy::VisibilityLevel;
use crate::profile::PictureType;

pub use server::ServerConfig;

/// Paths owned by the service itself; the placeholder may not shadow them
const RESERVED_PATHS: &[&str] = &["/health", "/metrics"];
const RESERVED_PATH_PREFIX: &str = "/profile/";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub picture: PictureConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub external: ExternalConfig,
    #[serde(default)]
    pub privacy: PrivacyConfig,
    #[serde(default)]
    pub cache: CacheHeaderConfig,
}

fn default_placeholder_path() -> String {
    DEFAULT_PLACEHOLDER_PATH.to_string()
}

/// Installation picture setting and placeholder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PictureConfig {
    /// upload | url; any other value serves the placeholder for everyone
    #[serde(rename = "type")]
    pub picture_type: PictureType,

    /// Path the placeholder is served from (default: /images/no_image.gif)
    #[serde(default = "default_placeholder_path")]
    pub placeholder_path: String,

    /// Image file served at `placeholder_path`; a built-in 1x1 GIF when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder_file: Option<PathBuf>,
}

/// Uploaded image storage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Root of the `<user>/<size>.<ext>` tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

/// External URLs configured for one user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserImageUrls {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

/// External image URL directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub users: HashMap<String, UserImageUrls>,

    /// Fallback for users without an entry, e.g. `https://cdn.example.org/{user}/{size}.png`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_template: Option<String>,
}

fn default_viewer_header() -> String {
    DEFAULT_VIEWER_HEADER.to_string()
}

/// Who may see whose profile image
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivacyConfig {
    /// Request header carrying the viewer's user id
    #[serde(default = "default_viewer_header")]
    pub viewer_header: String,

    #[serde(default)]
    pub default: VisibilityLevel,

    /// Per-user overrides of `default`
    #[serde(default)]
    pub users: HashMap<String, VisibilityLevel>,
}

impl Default for PrivacyConfig {
    fn default() -> Self {
        Self {
            viewer_header: default_viewer_header(),
            default: VisibilityLevel::default(),
            users: HashMap::new(),
        }
    }
}

fn default_max_age_seconds() -> u64 {
    DEFAULT_MAX_AGE_SECS
}

/// Caching headers on served images
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHeaderConfig {
    /// max-age for cacheable uploaded images (default: 3600)
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,
}

impl Default for CacheHeaderConfig {
    fn default() -> Self {
        Self {
            max_age_seconds: default_max_age_seconds(),
        }
    }
}

impl Config {
    pub fn from_yaml_with_env(yaml: &str) -> Result<Self, String> {
        // Replace ${VAR_NAME} with environment variable values
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").map_err(|e| e.to_string())?;

        // First, check that all referenced environment variables exist
        for caps in re.captures_iter(yaml) {
            let var_name = &caps[1];
            std::env::var(var_name).map_err(|_| {
                format!(
                    "Environment variable '{}' is referenced but not set",
                    var_name
                )
            })?;
        }

        let substituted = re.replace_all(yaml, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_default()
        });

        serde_yaml::from_str(&substituted).map_err(|e| e.to_string())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let yaml = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;
        Self::from_yaml_with_env(&yaml)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.server.address.trim().is_empty() {
            return Err("Server address cannot be empty".to_string());
        }

        // Placeholder path
        let placeholder = &self.picture.placeholder_path;
        if !placeholder.starts_with('/') {
            return Err(format!(
                "placeholder_path '{}' must start with /",
                placeholder
            ));
        }
        if placeholder.contains('?') || placeholder.contains('#') {
            return Err(format!(
                "placeholder_path '{}' must not contain a query or fragment",
                placeholder
            ));
        }
        if RESERVED_PATHS.contains(&placeholder.as_str())
            || placeholder.starts_with(RESERVED_PATH_PREFIX)
        {
            return Err(format!(
                "placeholder_path '{}' conflicts with a built-in endpoint ({}, {}*)",
                placeholder,
                RESERVED_PATHS.join(", "),
                RESERVED_PATH_PREFIX
            ));
        }
        if let Some(file) = &self.picture.placeholder_file {
            if !file.is_file() {
                return Err(format!(
                    "placeholder_file '{}' does not exist or is not a file",
                    file.display()
                ));
            }
        }

        // Upload storage is required when images come from uploads
        if self.picture.picture_type == PictureType::Upload && self.upload.directory.is_none() {
            return Err("upload.directory is required when picture type is 'upload'".to_string());
        }

        // External URLs must be absolute http(s) URLs
        if let Some(template) = &self.external.url_template {
            if !is_http_url(template) {
                return Err(format!(
                    "external.url_template '{}' must start with http:// or https://",
                    template
                ));
            }
        }
        for (user, urls) in &self.external.users {
            for url in [&urls.main, &urls.thumbnail].into_iter().flatten() {
                if !url.trim().is_empty() && !is_http_url(url) {
                    return Err(format!(
                        "External URL '{}' for user '{}' must start with http:// or https://",
                        url, user
                    ));
                }
            }
        }

        if http::HeaderName::from_bytes(self.privacy.viewer_header.as_bytes()).is_err() {
            return Err(format!(
                "privacy.viewer_header '{}' is not a valid header name",
                self.privacy.viewer_header
            ));
        }

        Ok(())
    }
}

fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}
