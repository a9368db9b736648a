use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Failed to access file: {source}")]
    FileIOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to connect to download URL: {source}")]
    ConnectionFail {
        #[from]
        source: reqwest::Error,
    },

    #[error("Media URL is valid but the remote file doesn't exist")]
    RemoteFileNotFound,

    #[error("Error while fetching chunk: {message}")]
    ChunkDownloadFail { message: String },

    #[error("Unknown file extension: {message}")]
    UnknownExtension { message: String },
}
