use std::io;

use dcdl_extractors::error::ExtractorError;
use thiserror::Error;
use tokio::task::JoinError;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum DownloaderError {
    #[error("Failed to access file: {source}")]
    IOError {
        #[from]
        source: io::Error,
    },

    #[error("Failed to create destination directory. error: {message}")]
    DirCreationError { message: String },

    #[error("Extraction failed: {source}")]
    ExtractorError {
        #[from]
        source: ExtractorError,
    },

    #[error("Extractor task stopped unexpectedly: {source}")]
    ThreadJoinError {
        #[from]
        source: JoinError,
    },
}
