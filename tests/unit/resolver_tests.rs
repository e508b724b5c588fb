// Image selection tests: precedence of visibility, picture type and lookups

use async_trait::async_trait;
use bytes::Bytes;
use mockall::mock;
use rstest::rstest;
use std::sync::Arc;

use profile_image::lookup::{
    ExternalImageUrls, LookupError, PictureSettings, ProfileImageStore,
};
use profile_image::profile::{
    resolve, ImageRequest, ImageResolver, ImageSize, PictureType, ResolvedImage,
};

mock! {
    pub Store {}

    #[async_trait]
    impl ProfileImageStore for Store {
        async fn current_image(
            &self,
            user_id: &str,
            size: ImageSize,
        ) -> Result<Option<Bytes>, LookupError>;
    }
}

mock! {
    pub Urls {}

    #[async_trait]
    impl ExternalImageUrls for Urls {
        async fn external_url(
            &self,
            user_id: &str,
            size: ImageSize,
        ) -> Result<Option<String>, LookupError>;
    }
}

mock! {
    pub Settings {}

    impl PictureSettings for Settings {
        fn picture_type(&self) -> PictureType;
    }
}

fn untouched_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_current_image().never();
    store
}

fn untouched_urls() -> MockUrls {
    let mut urls = MockUrls::new();
    urls.expect_external_url().never();
    urls
}

#[rstest]
#[tokio::test]
async fn test_not_allowed_is_always_placeholder_without_lookups(
    #[values(PictureType::Upload, PictureType::ExternalUrl, PictureType::Invalid)]
    picture_type: PictureType,
    #[values(ImageSize::Main, ImageSize::Thumbnail)] size: ImageSize,
    #[values(true, false)] cacheable: bool,
) {
    let request = ImageRequest::new("alice", false, size, cacheable);
    let resolved = resolve(&request, picture_type, &untouched_store(), &untouched_urls()).await;
    assert_eq!(resolved, ResolvedImage::Placeholder);
}

#[rstest]
#[tokio::test]
async fn test_upload_returns_exact_bytes_and_cacheable_flag(
    #[values(ImageSize::Main, ImageSize::Thumbnail)] size: ImageSize,
    #[values(true, false)] cacheable: bool,
) {
    let mut store = MockStore::new();
    store
        .expect_current_image()
        .withf(move |user, requested| user == "alice" && *requested == size)
        .times(1)
        .returning(|_, _| Ok(Some(Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"))));

    let request = ImageRequest::new("alice", true, size, cacheable);
    let resolved = resolve(&request, PictureType::Upload, &store, &untouched_urls()).await;

    assert_eq!(
        resolved,
        ResolvedImage::Bytes {
            data: Bytes::from_static(b"\xff\xd8\xff\xe0jpeg"),
            cacheable,
        }
    );
}

#[rstest]
#[case::absent(None)]
#[case::empty(Some(Bytes::new()))]
#[tokio::test]
async fn test_upload_without_bytes_is_placeholder(#[case] stored: Option<Bytes>) {
    let mut store = MockStore::new();
    store
        .expect_current_image()
        .times(1)
        .returning(move |_, _| Ok(stored.clone()));

    let request = ImageRequest::new("alice", true, ImageSize::Main, true);
    let resolved = resolve(&request, PictureType::Upload, &store, &untouched_urls()).await;
    assert_eq!(resolved, ResolvedImage::Placeholder);
}

#[tokio::test]
async fn test_upload_lookup_failure_is_placeholder() {
    let mut store = MockStore::new();
    store
        .expect_current_image()
        .times(1)
        .returning(|_, _| Err(LookupError::Backend("store offline".to_string())));

    let request = ImageRequest::new("alice", true, ImageSize::Main, true);
    let resolved = resolve(&request, PictureType::Upload, &store, &untouched_urls()).await;
    assert_eq!(resolved, ResolvedImage::Placeholder);
}

#[rstest]
#[tokio::test]
async fn test_external_url_is_referenced_regardless_of_cacheable(
    #[values(true, false)] cacheable: bool,
) {
    let mut urls = MockUrls::new();
    urls.expect_external_url()
        .withf(|user, size| user == "bob" && *size == ImageSize::Thumbnail)
        .times(1)
        .returning(|_, _| Ok(Some("https://cdn.example.org/bob_t.png".to_string())));

    let request = ImageRequest::new("bob", true, ImageSize::Thumbnail, cacheable);
    let resolved = resolve(&request, PictureType::ExternalUrl, &untouched_store(), &urls).await;
    assert_eq!(
        resolved,
        ResolvedImage::Url("https://cdn.example.org/bob_t.png".to_string())
    );
}

#[rstest]
#[case::absent(None)]
#[case::blank(Some("  ".to_string()))]
#[tokio::test]
async fn test_external_without_url_is_placeholder(#[case] url: Option<String>) {
    let mut urls = MockUrls::new();
    urls.expect_external_url()
        .times(1)
        .returning(move |_, _| Ok(url.clone()));

    let request = ImageRequest::new("bob", true, ImageSize::Main, true);
    let resolved = resolve(&request, PictureType::ExternalUrl, &untouched_store(), &urls).await;
    assert_eq!(resolved, ResolvedImage::Placeholder);
}

#[tokio::test]
async fn test_invalid_type_is_placeholder_without_lookups() {
    let request = ImageRequest::new("carol", true, ImageSize::Main, true);
    let resolved = resolve(
        &request,
        PictureType::from_setting("official"),
        &untouched_store(),
        &untouched_urls(),
    )
    .await;
    assert_eq!(resolved, ResolvedImage::Placeholder);
}

#[tokio::test]
async fn test_resolver_skips_picture_setting_when_not_allowed() {
    let mut settings = MockSettings::new();
    settings.expect_picture_type().never();

    let resolver = ImageResolver::new(
        Arc::new(settings),
        Arc::new(untouched_store()),
        Arc::new(untouched_urls()),
    );

    let request = ImageRequest::new("alice", false, ImageSize::Main, true);
    assert_eq!(resolver.resolve(&request).await, ResolvedImage::Placeholder);
}

#[tokio::test]
async fn test_resolver_reads_picture_setting_per_request() {
    let mut settings = MockSettings::new();
    settings
        .expect_picture_type()
        .times(2)
        .return_const(PictureType::ExternalUrl);

    let mut urls = MockUrls::new();
    urls.expect_external_url()
        .times(2)
        .returning(|user, _| Ok(Some(format!("https://cdn.example.org/{}.png", user))));

    let resolver = ImageResolver::new(
        Arc::new(settings),
        Arc::new(untouched_store()),
        Arc::new(urls),
    );

    for user in ["dave", "erin"] {
        let request = ImageRequest::new(user, true, ImageSize::Main, true);
        assert_eq!(
            resolver.resolve(&request).await,
            ResolvedImage::Url(format!("https://cdn.example.org/{}.png", user))
        );
    }
}
