// Metrics module - Prometheus-compatible counters for the image service

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::profile::ResolvedImage;

/// Metrics struct tracks counters for Prometheus export
/// Thread-safe via atomic operations and mutexes
#[derive(Debug, Default)]
pub struct Metrics {
    // Request counters
    request_count: AtomicU64,

    // Status code counters (e.g., 200, 302, 404)
    status_counts: Mutex<HashMap<u16, u64>>,

    // Resolution outcomes
    resolved_placeholder: AtomicU64,
    resolved_upload: AtomicU64,
    resolved_url: AtomicU64,

    // Requests denied by the visibility policy
    view_denied: AtomicU64,

    // Bytes of uploaded images served
    bytes_sent: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_status_count(&self, status_code: u16) {
        if let Ok(mut counts) = self.status_counts.lock() {
            *counts.entry(status_code).or_insert(0) += 1;
        }
    }

    pub fn increment_view_denied(&self) {
        self.view_denied.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a resolution outcome, and the bytes served for uploads
    pub fn record_resolution(&self, image: &ResolvedImage) {
        match image {
            ResolvedImage::Placeholder => {
                self.resolved_placeholder.fetch_add(1, Ordering::Relaxed);
            }
            ResolvedImage::Bytes { data, .. } => {
                self.resolved_upload.fetch_add(1, Ordering::Relaxed);
                self.bytes_sent
                    .fetch_add(data.len() as u64, Ordering::Relaxed);
            }
            ResolvedImage::Url(_) => {
                self.resolved_url.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }

    pub fn status_count(&self, status_code: u16) -> u64 {
        self.status_counts
            .lock()
            .ok()
            .and_then(|counts| counts.get(&status_code).copied())
            .unwrap_or(0)
    }

    /// Resolution count for `kind` (`placeholder`, `upload` or `url`)
    pub fn resolution_count(&self, kind: &str) -> u64 {
        match kind {
            "placeholder" => self.resolved_placeholder.load(Ordering::Relaxed),
            "upload" => self.resolved_upload.load(Ordering::Relaxed),
            "url" => self.resolved_url.load(Ordering::Relaxed),
            _ => 0,
        }
    }

    pub fn view_denied_count(&self) -> u64 {
        self.view_denied.load(Ordering::Relaxed)
    }

    /// Export all metrics in Prometheus text format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP http_requests_total Total number of HTTP requests received\n");
        output.push_str("# TYPE http_requests_total counter\n");
        output.push_str(&format!(
            "http_requests_total {}\n",
            self.request_count.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP http_requests_by_status_total HTTP requests by status code\n");
        output.push_str("# TYPE http_requests_by_status_total counter\n");
        if let Ok(counts) = self.status_counts.lock() {
            let mut statuses: Vec<_> = counts.iter().collect();
            statuses.sort();
            for (status, count) in statuses {
                output.push_str(&format!(
                    "http_requests_by_status_total{{status=\"{}\"}} {}\n",
                    status, count
                ));
            }
        }

        output.push_str(
            "\n# HELP profile_image_resolutions_total Profile image resolutions by outcome\n",
        );
        output.push_str("# TYPE profile_image_resolutions_total counter\n");
        for kind in ["placeholder", "upload", "url"] {
            output.push_str(&format!(
                "profile_image_resolutions_total{{outcome=\"{}\"}} {}\n",
                kind,
                self.resolution_count(kind)
            ));
        }

        output.push_str(
            "\n# HELP profile_image_view_denied_total Requests denied by the visibility policy\n",
        );
        output.push_str("# TYPE profile_image_view_denied_total counter\n");
        output.push_str(&format!(
            "profile_image_view_denied_total {}\n",
            self.view_denied.load(Ordering::Relaxed)
        ));

        output.push_str("\n# HELP profile_image_bytes_sent_total Bytes of uploaded images served\n");
        output.push_str("# TYPE profile_image_bytes_sent_total counter\n");
        output.push_str(&format!(
            "profile_image_bytes_sent_total {}\n",
            self.bytes_sent.load(Ordering::Relaxed)
        ));

        output
    }
}
