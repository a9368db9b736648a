//! All internal logic for reading boards and posts from `gall.dcinside.com`.
//!
//! The crate exposes two extractors:
//!
//! * [`BoardExtractor`](gallery::board::BoardExtractor) walks the listing pages of a board and
//!   queues every post it finds.
//! * [`PostExtractor`](gallery::post::PostExtractor) reads a single post and resolves every media
//!   item inside it.
//!
//! Input URLs are matched against both with [`router::route`].

extern crate dcdl_common;

pub mod error;
pub mod extractor;
pub mod extractor_config;
pub mod gallery;
pub mod prelude;
pub mod router;


pub use crate::extractor::caps::AsyncFetch;
pub use crate::extractor::caps::ExtractorThreadHandle;
pub use crate::extractor::ExtractorInfo;
pub use crate::extractor::HttpFetcher;
pub use crate::extractor::PageFetcher;
