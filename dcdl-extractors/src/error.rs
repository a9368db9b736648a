use dcdl_common::message::Message;
use std::io;
use thiserror::Error;
use tokio::sync::mpsc::error::SendError;

/// Enumerates the possible errors that can arise during extractor operations.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Failed to send a [`Message`] through an asynchronous (`tokio::sync::mpsc`) channel.
    /// Usually means the receiving side was dropped.
    #[error("Failed to send message through channel")]
    ChannelSendFail(#[from] SendError<Message>),

    /// Failed to send length data (e.g., number of queued posts) to a progress counter.
    #[error("Error sending length data to progress counter: {source}")]
    SendLengthFail {
        #[from]
        source: SendError<u64>,
    },

    /// Board listings are 1-based.
    #[error("Page number cannot be zero.")]
    ZeroPage,

    /// An error occurred during a network request (e.g., connection timeout, DNS resolution failure).
    #[error("Connection Error: {0}")]
    ConnectionError(#[from] reqwest::Error),

    /// The server answered with an error status after all retries were spent.
    #[error("Server returned status {status} for {url}")]
    ServerStatus { url: String, status: u16 },

    /// No extractor pattern matches the given URL.
    #[error("Unsupported URL: {url}")]
    UnsupportedUrl { url: String },

    #[error("Failed to read config file. error: {source}")]
    ConfigIOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to parse config file. error: {source}")]
    ConfigParseFail {
        #[from]
        source: toml::de::Error,
    },
}
