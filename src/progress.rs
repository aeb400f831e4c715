//! Progress-callback trait for per-item pipeline events.
//!
//! Inject an [`Arc<dyn PipelineProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to hear about
//! each page extracted, each section file written and each section composed.
//! The CLI drives an `indicatif` progress bar from these events.
//!
//! # Example
//!
//! ```rust
//! use docsplit::{PipelineConfig, PipelineProgressCallback, Stage};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     written: AtomicUsize,
//! }
//!
//! impl PipelineProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, stage: Stage, index: usize, total: usize, label: &str) {
//!         self.written.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("[{stage}] {index}/{total} {label}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { written: AtomicUsize::new(0) });
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(counter as Arc<dyn PipelineProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// The pipeline stage an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Items are PDF pages.
    Extract,
    /// Items are section files written.
    Segment,
    /// Items are section files read into the document.
    Compose,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Extract => "extract",
            Stage::Segment => "segment",
            Stage::Compose => "compose",
        })
    }
}

/// Called by the stages as they process each item.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Stages run sequentially, but the trait is
/// `Send + Sync` so one callback can be shared across tasks.
pub trait PipelineProgressCallback: Send + Sync {
    /// Called once before the first item of `stage`.
    ///
    /// # Arguments
    /// * `total`: number of items that will be processed
    fn on_stage_start(&self, stage: Stage, total: usize) {
        let _ = (stage, total);
    }

    /// Called after an item is processed.
    ///
    /// # Arguments
    /// * `index`: 1-indexed position of the item
    /// * `total`: total items in the stage
    /// * `label`: page number, file name or section title
    fn on_item_complete(&self, stage: Stage, index: usize, total: usize, label: &str) {
        let _ = (stage, index, total, label);
    }

    /// Called when an item is skipped rather than processed.
    fn on_item_skipped(&self, stage: Stage, index: usize, total: usize, label: &str, reason: &str) {
        let _ = (stage, index, total, label, reason);
    }

    /// Called once after every item has been attempted.
    ///
    /// # Arguments
    /// * `processed`: items that were not skipped
    fn on_stage_complete(&self, stage: Stage, processed: usize) {
        let _ = (stage, processed);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl PipelineProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn PipelineProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCallback {
        events: Mutex<Vec<String>>,
    }

    impl PipelineProgressCallback for RecordingCallback {
        fn on_stage_start(&self, stage: Stage, total: usize) {
            self.events.lock().unwrap().push(format!("start {stage} {total}"));
        }

        fn on_item_skipped(&self, stage: Stage, index: usize, _total: usize, label: &str, reason: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("skip {stage} {index} {label}: {reason}"));
        }

        fn on_stage_complete(&self, stage: Stage, processed: usize) {
            self.events.lock().unwrap().push(format!("done {stage} {processed}"));
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_stage_start(Stage::Extract, 5);
        cb.on_item_complete(Stage::Extract, 1, 5, "page 1");
        cb.on_item_skipped(Stage::Compose, 2, 5, "02_x.md", "no heading");
        cb.on_stage_complete(Stage::Extract, 5);
    }

    #[test]
    fn recording_callback_receives_events() {
        let cb = RecordingCallback::default();
        cb.on_stage_start(Stage::Compose, 2);
        cb.on_item_complete(Stage::Compose, 1, 2, "01_Abstract.md");
        cb.on_item_skipped(Stage::Compose, 2, 2, "02_Empty.md", "empty content");
        cb.on_stage_complete(Stage::Compose, 1);

        assert_eq!(
            *cb.events.lock().unwrap(),
            vec![
                "start compose 2",
                "skip compose 2 02_Empty.md: empty content",
                "done compose 1",
            ]
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_stage_start(Stage::Segment, 10);
        cb.on_item_complete(Stage::Segment, 1, 10, "01_Abstract.md");
    }
}
