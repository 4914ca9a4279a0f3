//! Progress-callback trait for per-page extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to
//! receive real-time events as the pipeline scans and renders pages.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a WebSocket, or a terminal progress
//! bar without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` because the whole
//! pipeline runs on a blocking worker thread, not the caller's thread.

use std::sync::Arc;

/// Called by the pipeline as it scans and renders each page.
///
/// All methods have default no-op implementations so callers only
/// override what they care about. Events arrive strictly in page order —
/// pages are processed sequentially, never in parallel.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once after the document is loaded, before any page is scanned.
    fn on_extraction_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page's operator list has been scanned.
    ///
    /// `hits_on_page` is the number of image-paint operators found on
    /// this page (0 for pages without embedded images).
    fn on_page_scanned(&self, page_number: usize, total_pages: usize, hits_on_page: usize) {
        let _ = (page_number, total_pages, hits_on_page);
    }

    /// Called when a result image has been rendered and encoded.
    fn on_image_rendered(&self, sequence_id: usize, page_number: usize) {
        let _ = (sequence_id, page_number);
    }

    /// Called when a page's scan or render fails and the page is skipped.
    fn on_page_error(&self, page_number: usize, error: String) {
        let _ = (page_number, error);
    }

    /// Called once after both pipeline paths have finished.
    fn on_extraction_complete(&self, images_emitted: usize, failed_pages: usize) {
        let _ = (images_emitted, failed_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        scanned: AtomicUsize,
        rendered: AtomicUsize,
        errors: AtomicUsize,
        completed_with: AtomicUsize,
    }

    impl ExtractionProgressCallback for TrackingCallback {
        fn on_page_scanned(&self, _page: usize, _total: usize, _hits: usize) {
            self.scanned.fetch_add(1, Ordering::SeqCst);
        }

        fn on_image_rendered(&self, _seq: usize, _page: usize) {
            self.rendered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_page_error(&self, _page: usize, _error: String) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_extraction_complete(&self, images_emitted: usize, _failed: usize) {
            self.completed_with.store(images_emitted, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_extraction_start(5);
        cb.on_page_scanned(1, 5, 2);
        cb.on_image_rendered(1, 1);
        cb.on_page_error(2, "scan failed".to_string());
        cb.on_extraction_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            scanned: AtomicUsize::new(0),
            rendered: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            completed_with: AtomicUsize::new(0),
        };

        tracker.on_extraction_start(2);
        tracker.on_page_scanned(1, 2, 1);
        tracker.on_image_rendered(1, 1);
        tracker.on_page_scanned(2, 2, 0);
        tracker.on_page_error(2, "render failed".to_string());
        tracker.on_extraction_complete(1, 1);

        assert_eq!(tracker.scanned.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.rendered.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completed_with.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_is_send() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn ExtractionProgressCallback>();

        let cb: Arc<dyn ExtractionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_extraction_start(10);
    }
}
