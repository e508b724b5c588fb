// Server module - hyper HTTP service hosting the profile image resolver

pub mod endpoints;
pub mod helpers;
pub mod routes;

use bytes::Bytes;
use http::header::ALLOW;
use http::request::Parts;
use http::{HeaderName, HeaderValue, Method, Request};
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;

use crate::config::Config;
use crate::constants::BUILTIN_PLACEHOLDER_GIF;
use crate::error::ProfileImageError;
use crate::lookup::{
    ConfiguredPictureSettings, ConfiguredUrlDirectory, FsImageStore, InMemoryImageStore,
    ProfileImageStore,
};
use crate::metrics::Metrics;
use crate::privacy::VisibilityPolicy;
use crate::profile::{ImageRequest, ImageResolver, ImageSize};
use crate::render::{CacheControl, ImageRenderer, ImageResponse};

use endpoints::{handle_health, handle_metrics, EndpointResponse};
use helpers::{extract_query_params, extract_viewer, parse_flag};
use routes::Route;

/// Request handler: routing, visibility, resolution and rendering
pub struct ProfileImageService {
    resolver: ImageResolver,
    renderer: ImageRenderer,
    policy: VisibilityPolicy,
    viewer_header: HeaderName,
    placeholder: Bytes,
    metrics: Arc<Metrics>,
    start_time: Instant,
}

impl ProfileImageService {
    pub fn new(
        resolver: ImageResolver,
        renderer: ImageRenderer,
        policy: VisibilityPolicy,
        viewer_header: HeaderName,
        placeholder: Bytes,
    ) -> Self {
        Self {
            resolver,
            renderer,
            policy,
            viewer_header,
            placeholder,
            metrics: Arc::new(Metrics::new()),
            start_time: Instant::now(),
        }
    }

    /// Wire collaborators from configuration
    ///
    /// Without an upload directory the image store is empty, so uploads
    /// always resolve to the placeholder.
    pub fn from_config(config: &Config) -> Result<Self, ProfileImageError> {
        let store: Arc<dyn ProfileImageStore> = match &config.upload.directory {
            Some(dir) => Arc::new(FsImageStore::new(dir)),
            None => Arc::new(InMemoryImageStore::new()),
        };
        let resolver = ImageResolver::new(
            Arc::new(ConfiguredPictureSettings::new(config.picture.picture_type)),
            store,
            Arc::new(ConfiguredUrlDirectory::from_config(&config.external)),
        );

        let placeholder = match &config.picture.placeholder_file {
            Some(path) => Bytes::from(std::fs::read(path).map_err(|e| {
                ProfileImageError::Config(format!(
                    "Failed to read placeholder_file '{}': {}",
                    path.display(),
                    e
                ))
            })?),
            None => Bytes::from_static(BUILTIN_PLACEHOLDER_GIF),
        };

        let viewer_header = HeaderName::from_bytes(config.privacy.viewer_header.as_bytes())
            .map_err(|e| {
                ProfileImageError::Config(format!(
                    "Invalid viewer header '{}': {}",
                    config.privacy.viewer_header, e
                ))
            })?;

        Ok(Self::new(
            resolver,
            ImageRenderer::from_config(config),
            VisibilityPolicy::from_config(&config.privacy),
            viewer_header,
            placeholder,
        ))
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Handle one request. Never fails: errors become JSON error responses.
    pub async fn handle<B>(&self, req: Request<B>) -> ImageResponse {
        let started = Instant::now();
        let (parts, _) = req.into_parts();
        self.metrics.increment_request_count();

        let mut response = match self.dispatch(&parts).await {
            Ok(response) => response,
            Err(e) => {
                if e.to_http_status() >= 500 {
                    tracing::error!(path = %parts.uri.path(), error = %e, "Request failed");
                } else {
                    tracing::warn!(path = %parts.uri.path(), error = %e, "Rejected request");
                }
                EndpointResponse::from(&e).into_response()
            }
        };

        if parts.method == Method::HEAD {
            *response.body_mut() = Full::new(Bytes::new());
        }

        let status = response.status().as_u16();
        self.metrics.increment_status_count(status);
        tracing::info!(
            method = %parts.method,
            path = %parts.uri.path(),
            status = status,
            duration_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        response
    }

    async fn dispatch(&self, parts: &Parts) -> Result<ImageResponse, ProfileImageError> {
        if parts.method != Method::GET && parts.method != Method::HEAD {
            let mut response = EndpointResponse::error(405, "Method not allowed").into_response();
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static("GET, HEAD"));
            return Ok(response);
        }

        match Route::parse(parts.uri.path(), self.renderer.placeholder_path())? {
            Route::ProfileImage(user) => self.profile_image(&user, parts).await,
            Route::Placeholder => self.renderer.image_response(
                self.placeholder.clone(),
                &CacheControl::public_max_age(self.renderer.max_age()),
            ),
            Route::Health => Ok(handle_health(self.start_time).into_response()),
            Route::Metrics => Ok(handle_metrics(&self.metrics).into_response()),
            Route::NotFound => Ok(EndpointResponse::error(404, "Not found").into_response()),
        }
    }

    async fn profile_image(
        &self,
        user: &str,
        parts: &Parts,
    ) -> Result<ImageResponse, ProfileImageError> {
        let params = extract_query_params(&parts.uri);

        let size = match params.get("size") {
            Some(value) => value.parse::<ImageSize>()?,
            None => ImageSize::Main,
        };
        let cacheable = match params.get("cacheable") {
            Some(value) => parse_flag(value).ok_or_else(|| {
                ProfileImageError::Request(format!("invalid cacheable flag '{}'", value))
            })?,
            None => true,
        };

        let viewer = extract_viewer(&parts.headers, &self.viewer_header);
        let allowed = self.policy.is_view_allowed(user, viewer.as_deref());
        if !allowed {
            self.metrics.increment_view_denied();
        }

        let request = ImageRequest::new(user, allowed, size, cacheable);
        let resolved = self.resolver.resolve(&request).await;
        self.metrics.record_resolution(&resolved);

        tracing::debug!(
            user = %user,
            viewer = viewer.as_deref().unwrap_or("anonymous"),
            size = %size,
            cacheable = cacheable,
            resolved = resolved.kind(),
            "Serving profile image"
        );

        self.renderer.render(&resolved)
    }
}

/// Accept connections until `shutdown` completes
pub async fn serve<F>(
    listener: TcpListener,
    service: Arc<ProfileImageService>,
    shutdown: F,
) -> Result<(), ProfileImageError>
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping listener");
                return Ok(());
            }
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                };

                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    let handler = service_fn(move |req| {
                        let service = Arc::clone(&service);
                        async move { Ok::<_, Infallible>(service.handle(req).await) }
                    });

                    if let Err(e) = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), handler)
                        .await
                    {
                        tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                    }
                });
            }
        }
    }
}
