// Renderer tests: status codes and caching headers per resolved image

use bytes::Bytes;
use http::header::{CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, EXPIRES, LOCATION, PRAGMA};
use http::StatusCode;
use http_body_util::BodyExt;
use std::time::Duration;

use profile_image::constants::BUILTIN_PLACEHOLDER_GIF;
use profile_image::profile::ResolvedImage;
use profile_image::render::{CacheControl, ImageRenderer};

const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

fn renderer() -> ImageRenderer {
    ImageRenderer::new("/images/no_image.gif", Duration::from_secs(3600))
}

#[tokio::test]
async fn test_cacheable_bytes_served_with_max_age() {
    let image = ResolvedImage::Bytes {
        data: Bytes::from_static(PNG_HEADER),
        cacheable: true,
    };
    let response = renderer().render(&image).unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "image/png");
    assert_eq!(
        response.headers()[CONTENT_LENGTH],
        PNG_HEADER.len().to_string().as_str()
    );
    assert!(response.headers().get(PRAGMA).is_none());

    let cc = CacheControl::parse(response.headers()[CACHE_CONTROL].to_str().unwrap());
    assert!(cc.public);
    assert_eq!(cc.max_age, Some(Duration::from_secs(3600)));
    assert!(cc.allows_reuse());

    let body = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(body.as_ref(), PNG_HEADER);
}

#[tokio::test]
async fn test_non_cacheable_bytes_have_same_content() {
    let cacheable = renderer()
        .render(&ResolvedImage::Bytes {
            data: Bytes::from_static(BUILTIN_PLACEHOLDER_GIF),
            cacheable: true,
        })
        .unwrap();
    let non_cacheable = renderer()
        .render(&ResolvedImage::Bytes {
            data: Bytes::from_static(BUILTIN_PLACEHOLDER_GIF),
            cacheable: false,
        })
        .unwrap();

    assert_eq!(non_cacheable.status(), StatusCode::OK);
    assert_eq!(non_cacheable.headers()[CONTENT_TYPE], "image/gif");
    assert_eq!(
        non_cacheable.headers()[CACHE_CONTROL],
        "no-cache, no-store, must-revalidate"
    );
    assert_eq!(non_cacheable.headers()[PRAGMA], "no-cache");
    assert_eq!(non_cacheable.headers()[EXPIRES], "0");

    let a = cacheable.into_body().collect().await.unwrap().to_bytes();
    let b = non_cacheable.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(a, b);
}

#[test]
fn test_url_is_redirect_to_exact_url() {
    let url = "https://cdn.example.org/u/alice.png?v=3";
    let response = renderer()
        .render(&ResolvedImage::Url(url.to_string()))
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], url);
    assert_eq!(response.headers()[CACHE_CONTROL], "no-cache");
}

#[test]
fn test_placeholder_redirects_to_configured_path() {
    let renderer = ImageRenderer::new("/static/avatar.png", Duration::from_secs(60));
    let response = renderer.render(&ResolvedImage::Placeholder).unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[LOCATION], "/static/avatar.png");
}

#[test]
fn test_unknown_bytes_are_octet_stream() {
    let response = renderer()
        .render(&ResolvedImage::Bytes {
            data: Bytes::from_static(b"plain text, not an image"),
            cacheable: true,
        })
        .unwrap();
    assert_eq!(response.headers()[CONTENT_TYPE], "application/octet-stream");
}
