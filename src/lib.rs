// Profile image service library
//
// Resolves which image to show for a user's profile (uploaded bytes, an
// external URL, or the placeholder) and serves it over HTTP.

pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod metrics;
pub mod privacy;
pub mod profile;
pub mod render;
pub mod server;
