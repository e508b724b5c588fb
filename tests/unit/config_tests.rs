// Configuration module unit tests

use std::path::PathBuf;

use profile_image::config::*;
use profile_image::constants::{DEFAULT_SERVER_ADDRESS, DEFAULT_SERVER_PORT};
use profile_image::privacy::{VisibilityLevel, VisibilityPolicy};
use profile_image::profile::PictureType;

const FULL_CONFIG: &str = r#"
server:
  address: "0.0.0.0"
  port: 9090
picture:
  type: upload
  placeholder_path: /static/no_image.gif
upload:
  directory: /var/lib/profile-images
external:
  url_template: "https://avatars.example.org/{user}/{size}.png"
  users:
    alice:
      main: "https://img.example.org/alice.png"
      thumbnail: "https://img.example.org/alice_t.png"
privacy:
  viewer_header: X-Remote-User
  default: authenticated
  users:
    bob: only_me
cache:
  max_age_seconds: 120
"#;

#[test]
fn test_can_deserialize_full_config() {
    let config = Config::from_yaml_with_env(FULL_CONFIG).expect("Failed to parse config");

    assert_eq!(config.server.address, "0.0.0.0");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.picture.picture_type, PictureType::Upload);
    assert_eq!(config.picture.placeholder_path, "/static/no_image.gif");
    assert_eq!(
        config.upload.directory,
        Some(PathBuf::from("/var/lib/profile-images"))
    );
    assert_eq!(
        config.external.users["alice"],
        UserImageUrls {
            main: Some("https://img.example.org/alice.png".to_string()),
            thumbnail: Some("https://img.example.org/alice_t.png".to_string()),
        }
    );
    assert_eq!(config.privacy.default, VisibilityLevel::Authenticated);
    assert_eq!(config.privacy.users["bob"], VisibilityLevel::OnlyMe);
    assert_eq!(config.cache.max_age_seconds, 120);
    assert!(config.validate().is_ok());
}

#[test]
fn test_server_section_is_optional() {
    let config = Config::from_yaml_with_env("picture:\n  type: url\n").unwrap();
    assert_eq!(config.server.address, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.server.port, DEFAULT_SERVER_PORT);
}

#[test]
fn test_picture_section_is_required() {
    assert!(Config::from_yaml_with_env("server:\n  port: 8080\n").is_err());
}

#[test]
fn test_env_substitution() {
    std::env::set_var("PROFILE_IMAGE_TEST_UPLOAD_DIR", "/srv/avatars");
    let yaml = r#"
picture:
  type: upload
upload:
  directory: ${PROFILE_IMAGE_TEST_UPLOAD_DIR}
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert_eq!(config.upload.directory, Some(PathBuf::from("/srv/avatars")));
}

#[test]
fn test_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, FULL_CONFIG).unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.server.port, 9090);

    let err = Config::from_file(dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.contains("Failed to read config file"));
}

#[test]
fn test_rejects_relative_placeholder_path() {
    let yaml = "picture:\n  type: url\n  placeholder_path: images/no_image.gif\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("must start with /"));
}

#[test]
fn test_rejects_missing_placeholder_file() {
    let yaml = "picture:\n  type: url\n  placeholder_file: /definitely/not/here.gif\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("placeholder_file"));
}

#[test]
fn test_rejects_non_http_external_urls() {
    let yaml = r#"
picture:
  type: url
external:
  users:
    alice:
      main: "ftp://files.example.org/alice.png"
"#;
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("alice"));

    let yaml = "picture:\n  type: url\nexternal:\n  url_template: \"//cdn/{user}\"\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("url_template"));
}

#[test]
fn test_rejects_invalid_viewer_header() {
    let yaml = "picture:\n  type: url\nprivacy:\n  viewer_header: \"bad header\"\n";
    let config = Config::from_yaml_with_env(yaml).unwrap();
    assert!(config.validate().unwrap_err().contains("viewer_header"));
}

#[test]
fn test_visibility_policy_from_config() {
    let config = Config::from_yaml_with_env(FULL_CONFIG).unwrap();
    let policy = VisibilityPolicy::from_config(&config.privacy);

    assert!(!policy.is_view_allowed("alice", None));
    assert!(policy.is_view_allowed("alice", Some("carol")));
    assert!(!policy.is_view_allowed("bob", Some("carol")));
    assert!(policy.is_view_allowed("bob", Some("bob")));
}
