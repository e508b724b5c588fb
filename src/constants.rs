// Constants module - centralized default values for configuration
//
// Defaults used by the config layer, the renderer and the HTTP service.

// =============================================================================
// Server defaults
// =============================================================================

/// Default bind address
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1";

/// Default listen port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// Picture defaults
// =============================================================================

/// Path the placeholder image is served from
pub const DEFAULT_PLACEHOLDER_PATH: &str = "/images/no_image.gif";

/// Built-in placeholder: a 1x1 transparent GIF, used when no placeholder file is configured
pub const BUILTIN_PLACEHOLDER_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xff, 0xff, 0xff, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2c, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3b,
];

/// File extensions probed by the filesystem image store, in order
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

// =============================================================================
// Cache header defaults
// =============================================================================

/// Default max-age for cacheable profile images (1 hour)
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

// =============================================================================
// Privacy defaults
// =============================================================================

/// Request header carrying the id of the user viewing the image
pub const DEFAULT_VIEWER_HEADER: &str = "x-viewer-id";
