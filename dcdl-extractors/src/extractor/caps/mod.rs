use crate::error::ExtractorError;
use dcdl_common::message::Message;
use dcdl_common::tokio::sync::mpsc::{Sender, UnboundedSender};
use dcdl_common::tokio::task::JoinHandle;
use std::future::Future;

pub type ExtractorThreadHandle = JoinHandle<Result<u64, ExtractorError>>;

/// Capability for the extractor to asynchronously send messages through an
/// [`unbounded_channel`](dcdl_common::tokio::sync::mpsc::unbounded_channel) to another task.
pub trait AsyncFetch {
    /// Runs the extractor to completion, sending every message through `sender_channel`.
    ///
    /// `counter` receives the number of messages each step produced, so a progress bar can grow
    /// its total while the extractor is still running.
    ///
    /// Returns how many messages were sent.
    fn async_fetch(
        &mut self,
        sender_channel: UnboundedSender<Message>,
        counter: Option<Sender<u64>>,
    ) -> impl Future<Output = Result<u64, ExtractorError>> + Send;

    /// High-level convenience thread builder for [`async_fetch`](AsyncFetch::async_fetch)
    fn setup_fetch_thread(
        self,
        sender_channel: UnboundedSender<Message>,
        counter: Option<Sender<u64>>,
    ) -> ExtractorThreadHandle;
}
