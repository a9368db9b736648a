use std::fmt::Debug;
use std::sync::Arc;

/// Type of log event, used for styling or filtering messages in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogType {
    /// General informational message.
    Info,
    /// File was skipped (already on disk, delegated video, remote error).
    Skip,
    /// A leftover partial file was removed before downloading again.
    Remove,
    /// Operation was successful.
    Success,
    /// A non-critical issue or warning.
    Warning,
    /// An error occurred for a specific item or post.
    Error,
}

/// Reports overall progress over every file of a run. All methods should be thread-safe.
pub trait ProgressListener: Send + Sync + Debug {
    /// Grows the total while the extractors are still discovering posts.
    fn inc_main_total(&self, delta: u64);
    /// One file was processed (downloaded or skipped).
    fn main_tick(&self);
    /// Every file was processed.
    fn main_done(&self);

    /// Adds a new task for individual download progress tracking.
    ///
    /// `total_size` is the body size in bytes, when the server announced it.
    fn add_download_task(
        &self,
        name: String,
        total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater>;

    /// Logs a categorized event message to be displayed in the progress UI.
    ///
    /// `target` identifies the subject of the message (file name, post).
    fn log_event(&self, log_type: LogType, target: &str, message: &str);

    fn log_skip_message(&self, target: &str, message: &str) {
        self.log_event(LogType::Skip, target, message);
    }
}

/// Updates the progress of a single download.
pub trait DownloadProgressUpdater: Send + Sync + Debug {
    fn set_progress(&self, bytes_downloaded: u64);
    /// Signals that this download task is finished (successfully or not).
    fn finish(&self);
}

/// A no-operation implementation of `ProgressListener`.
/// Used as a default when no actual progress reporting is needed by the library consumer.
#[derive(Debug, Clone)]
pub struct NoOpProgressListener;

impl ProgressListener for NoOpProgressListener {
    fn inc_main_total(&self, _delta: u64) {}
    fn main_tick(&self) {}
    fn main_done(&self) {}
    fn add_download_task(
        &self,
        _name: String,
        _total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater> {
        Box::new(NoOpDownloadProgressUpdater)
    }
    fn log_event(&self, _log_type: LogType, _target: &str, _message: &str) {}
}

#[derive(Debug, Clone)]
pub struct NoOpDownloadProgressUpdater;

impl DownloadProgressUpdater for NoOpDownloadProgressUpdater {
    fn set_progress(&self, _bytes_downloaded: u64) {}
    fn finish(&self) {}
}

/// Convenience type alias for a shared, thread-safe progress listener.
pub type SharedProgressListener = Arc<dyn ProgressListener>;

pub fn no_op_progress_listener() -> SharedProgressListener {
    Arc::new(NoOpProgressListener)
}
