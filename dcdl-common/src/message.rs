//! Messages emitted by the extractors.
//!
//! A post extractor emits one [`Message::Directory`] followed by one [`Message::Url`] per media
//! item. A board extractor only emits [`Message::Queue`], which asks the dispatcher to run a post
//! extractor for the referenced post.
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::post::{MediaItem, PostMetadata, PostReference};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Following `Url` messages belong to this post.
    Directory(Arc<PostMetadata>),
    /// Download `item` as the `num`-th file (1-based) of its post.
    Url {
        num: u32,
        item: MediaItem,
        metadata: Arc<PostMetadata>,
    },
    /// Hand `url` to the post extractor.
    Queue { url: String, post: PostReference },
}

impl Message {
    pub const fn is_queue(&self) -> bool {
        matches!(self, Self::Queue { .. })
    }

    /// The URL this message points at, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Directory(_) => None,
            Self::Url { item, .. } => Some(&item.url),
            Self::Queue { url, .. } => Some(url),
        }
    }
}
