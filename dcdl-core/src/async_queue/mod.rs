//! Provides the asynchronous download queue.
//!
//! The [`Queue`] receives [`Message`]s from the dispatcher, downloads every media item
//! concurrently and reports progress via a [`ProgressListener`](crate::progress::ProgressListener).
//!
//! Only [`Message::Url`] carries work. Delegated (`ytdl:`) items are reported and skipped, since
//! they need a format-aware downloader.

// Contains the logic for downloading and saving files to a directory.
mod folder;

use crate::error::DownloaderError;
use crate::progress::{no_op_progress_listener, SharedProgressListener};
use dcdl_common::message::Message;
use dcdl_common::post::MediaItem;
use log::debug;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tokio::fs::create_dir_all;
use tokio::spawn;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::UnboundedReceiverStream;

/// One file to write: the media item and where it goes.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub item: MediaItem,
    /// Directory of the post.
    pub directory: PathBuf,
    pub file_name: String,
}

/// Totals of a finished download run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct QueueSummary {
    pub downloaded: u64,
    /// Files that were already on disk.
    pub skipped: u64,
    /// `ytdl:` items that were not downloaded.
    pub delegated: u64,
    pub failed: u64,
}

/// Manages the asynchronous download of media items.
pub struct Queue {
    /// The number of concurrent downloads allowed.
    sim_downloads: u8,
    /// The `reqwest::Client` used for making HTTP requests.
    client: Client,
    progress_listener: SharedProgressListener,
}

impl Queue {
    /// Set up the queue for download.
    ///
    /// The client should carry the same referer as the extractors' one, the image hosts refuse
    /// requests without it.
    pub fn new(
        sim_downloads: u8,
        client: Client,
        progress_listener: Option<SharedProgressListener>,
    ) -> Self {
        Self {
            sim_downloads: sim_downloads.max(1),
            client,
            progress_listener: progress_listener.unwrap_or_else(no_op_progress_listener),
        }
    }

    /// Maps a message into a download job. Only [`Message::Url`] produces one.
    fn map_message(output_dir: &Path, msg: Message) -> Option<DownloadJob> {
        match msg {
            Message::Url {
                num,
                item,
                metadata,
            } => Some(DownloadJob {
                directory: crate::generate_output_path(output_dir, &metadata),
                file_name: item.file_name(num),
                item,
            }),
            Message::Directory(metadata) => {
                debug!(
                    "Post {} of {}: {}",
                    metadata.post.num, metadata.board.id, metadata.post.title
                );
                None
            }
            Message::Queue { url, .. } => {
                debug!("Queued {url}");
                None
            }
        }
    }

    /// Spawns the main asynchronous download task.
    ///
    /// The task listens on `channel_rx` until every sender is dropped, and returns the totals of
    /// the run.
    pub fn setup_async_downloader(
        self,
        output_dir: PathBuf,
        channel_rx: UnboundedReceiver<Message>,
    ) -> JoinHandle<Result<QueueSummary, DownloaderError>> {
        spawn(async move {
            debug!("Async Downloader thread initialized");

            if let Err(error) = create_dir_all(&output_dir).await {
                return Err(DownloaderError::DirCreationError {
                    message: error.to_string(),
                });
            }

            let message_stream = UnboundedReceiverStream::new(channel_rx);
            let summary = self.download_channel(message_stream, output_dir).await;

            self.progress_listener.main_done();
            Ok(summary)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcdl_common::post::{extension::Extension, PostMetadata, PostReference};
    use dcdl_common::{GallerySection, ROOT_URL};
    use std::sync::Arc;
    use tempdir::TempDir;
    use tokio::sync::mpsc::unbounded_channel;

    #[tokio::test]
    async fn nothing_is_fetched_for_delegated_or_existing_files() {
        let tmp = TempDir::new("dcdl-queue").unwrap();
        let metadata = Arc::new(PostMetadata::default());

        // Pre-create the file the first item maps to.
        let post_dir = crate::generate_output_path(tmp.path(), &metadata);
        std::fs::create_dir_all(&post_dir).unwrap();
        std::fs::write(post_dir.join("001.jpg"), b"data").unwrap();

        let (tx, rx) = unbounded_channel();
        let post = PostReference::new(ROOT_URL, GallerySection::Standard, "b", 1);
        tx.send(Message::Queue {
            url: post.url.clone(),
            post,
        })
        .unwrap();
        tx.send(Message::Directory(metadata.clone())).unwrap();
        tx.send(Message::Url {
            num: 1,
            // Unroutable address, must never be requested.
            item: MediaItem::new("http://127.0.0.1:9/001.jpg", Some(Extension::JPG)),
            metadata: metadata.clone(),
        })
        .unwrap();
        tx.send(Message::Url {
            num: 2,
            item: MediaItem::delegated("https://www.youtube.com/watch?v=ABC123"),
            metadata,
        })
        .unwrap();
        drop(tx);

        let queue = Queue::new(2, Client::new(), None);
        let summary = queue
            .setup_async_downloader(tmp.path().to_path_buf(), rx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(
            summary,
            QueueSummary {
                downloaded: 0,
                skipped: 1,
                delegated: 1,
                failed: 0,
            }
        );
        assert_eq!(std::fs::read(post_dir.join("001.jpg")).unwrap(), b"data");
    }
}
