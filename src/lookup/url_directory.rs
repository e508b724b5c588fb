//! Configuration-backed directory of external profile image URLs.
//!
//! Per-user entries win. Users without an entry fall back to the optional
//! URL template, where `{user}` is replaced by the percent-encoded user id and
//! `{size}` by `main` or `thumbnail`.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{validate_user_id, ExternalImageUrls, LookupError};
use crate::config::{ExternalConfig, UserImageUrls};
use crate::profile::ImageSize;

#[derive(Debug, Clone, Default)]
pub struct ConfiguredUrlDirectory {
    users: HashMap<String, UserImageUrls>,
    template: Option<String>,
}

impl ConfiguredUrlDirectory {
    pub fn new(users: HashMap<String, UserImageUrls>, template: Option<String>) -> Self {
        Self { users, template }
    }

    pub fn from_config(config: &ExternalConfig) -> Self {
        Self::new(config.users.clone(), config.url_template.clone())
    }

    fn lookup(&self, user_id: &str, size: ImageSize) -> Option<String> {
        if let Some(entry) = self.users.get(user_id) {
            let main = non_blank(entry.main.as_deref());
            return match size {
                ImageSize::Main => main,
                ImageSize::Thumbnail => non_blank(entry.thumbnail.as_deref()).or(main),
            };
        }

        let template = non_blank(self.template.as_deref())?;
        Some(
            template
                .replace("{user}", &urlencoding::encode(user_id))
                .replace("{size}", size.as_str()),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl ExternalImageUrls for ConfiguredUrlDirectory {
    async fn external_url(
        &self,
        user_id: &str,
        size: ImageSize,
    ) -> Result<Option<String>, LookupError> {
        validate_user_id(user_id)?;
        Ok(self.lookup(user_id, size))
    }
}
