//! Profile image visibility.
//!
//! Decides whether a viewer may see an owner's profile image. The answer
//! becomes `ImageRequest::is_view_allowed`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::PrivacyConfig;

/// Audience allowed to see a profile image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityLevel {
    /// Anyone, including anonymous viewers
    #[default]
    Everyone,
    /// Any identified viewer
    Authenticated,
    /// The owner only
    OnlyMe,
    /// Nobody, not even the owner
    Nobody,
}

#[derive(Debug, Clone, Default)]
pub struct VisibilityPolicy {
    default: VisibilityLevel,
    users: HashMap<String, VisibilityLevel>,
}

impl VisibilityPolicy {
    pub fn new(default: VisibilityLevel, users: HashMap<String, VisibilityLevel>) -> Self {
        Self { default, users }
    }

    pub fn from_config(config: &PrivacyConfig) -> Self {
        Self::new(config.default, config.users.clone())
    }

    /// Effective level for an owner
    pub fn level_for(&self, owner: &str) -> VisibilityLevel {
        self.users.get(owner).copied().unwrap_or(self.default)
    }

    pub fn is_view_allowed(&self, owner: &str, viewer: Option<&str>) -> bool {
        let viewer = viewer.map(str::trim).filter(|v| !v.is_empty());
        match self.level_for(owner) {
            VisibilityLevel::Nobody => false,
            VisibilityLevel::Everyone => true,
            VisibilityLevel::Authenticated => viewer.is_some(),
            VisibilityLevel::OnlyMe => viewer == Some(owner),
        }
    }
}
