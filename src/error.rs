// Error types module

use std::fmt;

use crate::lookup::LookupError;

/// Centralized error type for the profile image service
///
/// Categorizes errors so that the HTTP layer can map them to a status code
/// and the logs carry a stable category.
#[derive(Debug, Clone)]
pub enum ProfileImageError {
    /// Configuration errors (invalid YAML, missing env vars, etc.)
    Config(String),

    /// Malformed client request (unknown size, undecodable user id, etc.)
    Request(String),

    /// A collaborator lookup failed (image store, URL directory)
    Lookup(String),

    /// Internal errors (bind failures, unexpected I/O)
    Internal(String),
}

impl ProfileImageError {
    /// HTTP status code for this error category
    pub fn to_http_status(&self) -> u16 {
        match self {
            ProfileImageError::Request(_) => 400,
            ProfileImageError::Lookup(_) => 502,
            ProfileImageError::Config(_) | ProfileImageError::Internal(_) => 500,
        }
    }

    /// Message that is safe to return to a client
    ///
    /// Only request errors echo their detail; everything else is generic.
    pub fn client_message(&self) -> String {
        match self {
            ProfileImageError::Request(msg) => msg.clone(),
            ProfileImageError::Lookup(_) => "Upstream lookup failed".to_string(),
            ProfileImageError::Config(_) | ProfileImageError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }
}

impl fmt::Display for ProfileImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileImageError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ProfileImageError::Request(msg) => write!(f, "Invalid request: {}", msg),
            ProfileImageError::Lookup(msg) => write!(f, "Lookup error: {}", msg),
            ProfileImageError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ProfileImageError {}

impl From<LookupError> for ProfileImageError {
    fn from(err: LookupError) -> Self {
        ProfileImageError::Lookup(err.to_string())
    }
}

impl From<http::Error> for ProfileImageError {
    fn from(err: http::Error) -> Self {
        ProfileImageError::Internal(format!("failed to build response: {}", err))
    }
}
