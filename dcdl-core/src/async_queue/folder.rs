use std::{
    fmt::Display,
    path::{Path, PathBuf},
    pin::pin,
};

use dcdl_common::message::Message;
use dcdl_common::post::error::PostError;
use futures::{future::ready, Stream, StreamExt};
use log::debug;
use reqwest::Client;
use tokio::{
    fs::{create_dir_all, metadata, remove_file, rename, OpenOptions},
    io::{AsyncWriteExt, BufWriter},
    task,
};
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::progress::{DownloadProgressUpdater, LogType, SharedProgressListener};

use super::{DownloadJob, Queue, QueueSummary};

/// Represents the outcome of a download attempt for a single media item.
#[derive(Debug)]
enum FolderDownloadTaskStatus {
    Downloaded,
    /// Already on disk.
    Skipped,
    Delegated,
}

/// Suffix of the file a body is streamed into until it is complete.
const PARTIAL_SUFFIX: &str = "part";

impl Queue {
    pub(crate) async fn download_channel(
        &self,
        channel: UnboundedReceiverStream<Message>,
        output_dir: PathBuf,
    ) -> QueueSummary {
        let progress_listener = self.progress_listener.clone();

        channel
            .filter_map(|msg| ready(Self::map_message(&output_dir, msg)))
            .map(|job| {
                let client = self.client.clone();
                let progress_listener = progress_listener.clone();

                task::spawn(async move { Self::process(client, job, progress_listener).await })
            })
            .buffer_unordered(self.sim_downloads as usize)
            .fold(QueueSummary::default(), |mut summary, task_join_result| {
                let progress_listener = progress_listener.clone();

                async move {
                    progress_listener.main_tick();

                    match task_join_result {
                        Ok(Ok(FolderDownloadTaskStatus::Downloaded)) => summary.downloaded += 1,
                        Ok(Ok(FolderDownloadTaskStatus::Skipped)) => summary.skipped += 1,
                        Ok(Ok(FolderDownloadTaskStatus::Delegated)) => summary.delegated += 1,
                        Ok(Err(post_error)) => {
                            debug!("Failed to download media item: {}", post_error);
                            summary.failed += 1;
                        }
                        Err(join_error) => {
                            debug!("Download task failed to execute: {}", join_error);
                            summary.failed += 1;
                        }
                    }
                    summary
                }
            })
            .await
    }

    async fn process(
        client: Client,
        job: DownloadJob,
        progress_listener: SharedProgressListener,
    ) -> Result<FolderDownloadTaskStatus, PostError> {
        if job.item.is_delegated() {
            progress_listener.log_skip_message(&job.item.url, "needs an external video downloader");
            return Ok(FolderDownloadTaskStatus::Delegated);
        }

        let target = job.directory.join(&job.file_name);
        if Self::check_file_exists(&target, &job.file_name, &progress_listener).await? {
            return Ok(FolderDownloadTaskStatus::Skipped);
        }

        Self::fetch(client, &job, &progress_listener).await?;
        Ok(FolderDownloadTaskStatus::Downloaded)
    }

    /// Checks whether the file was already downloaded.
    ///
    /// # Returns
    /// * `Ok(true)`: a non-empty file exists. Download should be **skipped**.
    /// * `Ok(false)`: nothing usable on disk (an empty leftover gets removed). Download should
    ///   **proceed**.
    async fn check_file_exists(
        target: &Path,
        file_name: &str,
        progress_listener: &SharedProgressListener,
    ) -> Result<bool, PostError> {
        let Ok(meta) = metadata(target).await else {
            return Ok(false);
        };

        if meta.len() > 0 {
            progress_listener.log_skip_message(&target.display().to_string(), "already exists");
            return Ok(true);
        }

        remove_file(target).await?;
        progress_listener.log_event(
            LogType::Remove,
            file_name,
            "removed empty file, will redownload",
        );
        Ok(false)
    }

    async fn fetch(
        client: Client,
        job: &DownloadJob,
        progress_listener: &SharedProgressListener,
    ) -> Result<(), PostError> {
        debug!("Fetching {} into {:?}", &job.item.url, &job.directory);

        let res = client.get(&job.item.url).send().await?;

        if res.status().is_client_error() {
            debug!(
                "Image source {} returned status {}. Skipping download.",
                job.item.url,
                res.status().as_str()
            );
            progress_listener.log_skip_message(
                &job.file_name,
                &format!("skipped, server returned: {}", res.status()),
            );
            return Err(PostError::RemoteFileNotFound);
        }
        let res = res.error_for_status()?;

        create_dir_all(&job.directory).await?;

        let dl_updater = progress_listener.add_download_task(
            format!("{}/{}", dir_label(&job.directory), job.file_name),
            res.content_length(),
        );

        let out_path = job.directory.join(&job.file_name);
        let part_path = job
            .directory
            .join(format!("{}.{PARTIAL_SUFFIX}", job.file_name));

        if let Err(err) = write_part(res.bytes_stream(), &part_path, dl_updater.as_ref()).await {
            dl_updater.finish();
            return Err(err);
        }

        rename(&part_path, &out_path).await?;

        dl_updater.finish();
        debug!("Finished downloading {:?} successfully.", out_path);
        Ok(())
    }
}

/// Streams `body` into `part_path`. The partial file is removed when a chunk or a write fails.
async fn write_part<S, B, E>(
    body: S,
    part_path: &Path,
    dl_updater: &dyn DownloadProgressUpdater,
) -> Result<(), PostError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let result = stream_to_file(body, part_path, dl_updater).await;

    if result.is_err() {
        if let Err(err) = remove_file(part_path).await {
            debug!("Could not remove partial file {:?}: {}", part_path, err);
        }
    }

    result
}

async fn stream_to_file<S, B, E>(
    body: S,
    part_path: &Path,
    dl_updater: &dyn DownloadProgressUpdater,
) -> Result<(), PostError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    debug!("Creating/writing to file {:?}", part_path);
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(part_path)
        .await?;

    let mut bw = BufWriter::new(file);
    let mut body = pin!(body);
    let mut downloaded_bytes = 0;

    while let Some(item) = body.next().await {
        let chunk = item.map_err(|e| PostError::ChunkDownloadFail {
            message: e.to_string(),
        })?;
        let chunk = chunk.as_ref();

        downloaded_bytes += chunk.len() as u64;
        dl_updater.set_progress(downloaded_bytes);

        bw.write_all(chunk).await?;
    }

    bw.flush().await?;
    Ok(())
}

/// Last component of the post directory, for progress labels.
fn dir_label(directory: &Path) -> String {
    directory
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
