//! Main representation of a gallery post and the media found inside it.
//!
//! # Post
//! A post page yields one [`PostMetadata`] and an ordered list of [`MediaItem`]s. The metadata is
//! attached to every media item of the post when it's sent to the downloader.
//!
//! Boards and posts are addressed through [`BoardReference`] and [`PostReference`], which are
//! built by the URL router or by the board walker for every link it finds.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use std::fmt::{Debug, Display};

use crate::GallerySection;

use self::extension::Extension;

pub mod error;
pub mod extension;

/// Scheme marking an URL that must be handed to a format-aware downloader (yt-dlp and friends)
/// instead of being fetched as a raw file.
pub const DELEGATED_PREFIX: &str = "ytdl:";

/// Datetime format used by the gallery for post dates.
pub const POST_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Points to a board listing, optionally starting at a specific page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardReference {
    pub board_id: String,
    pub section: GallerySection,
    /// 1-based listing page to start from.
    pub start_page: u64,
}

/// Points to a single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostReference {
    pub board_id: String,
    pub section: GallerySection,
    pub num: u64,
    /// Absolute URL of the post page.
    pub url: String,
}

impl PostReference {
    /// Builds the canonical post URL for `num` inside `board_id`.
    pub fn new(root: &str, section: GallerySection, board_id: &str, num: u64) -> Self {
        Self {
            url: format!(
                "{}board/view/?id={}&no={}",
                section.base_url(root),
                board_id,
                num
            ),
            board_id: board_id.to_string(),
            section,
            num,
        }
    }
}

impl Display for PostReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.board_id, self.num)
    }
}

/// Descriptive fields read from the post page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInfo {
    pub title: String,
    pub description: String,
    pub num: u64,
    /// `None` when the page carries no parseable date.
    #[serde(with = "post_date", default)]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardInfo {
    pub id: String,
}

/// Metadata shared by every media item of a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    pub post: PostInfo,
    pub board: BoardInfo,
}

impl PostMetadata {
    /// Name of the directory holding the post's files: `YYYY-MM-DD title`, or only the title when
    /// the date is unknown.
    pub fn directory_name(&self) -> String {
        match self.post.date {
            Some(date) => format!("{} {}", date.format("%Y-%m-%d"), self.post.title),
            None => self.post.title.clone(),
        }
    }
}

/// A single downloadable file (or delegated video) found inside a post.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Direct URL of the file, or a `ytdl:` URL for delegated videos.
    pub url: String,
    /// Declared extension. `None` lets the downloader figure it out.
    pub extension: Option<Extension>,
}

impl Debug for MediaItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaItem")
            .field("Download URL", &self.url)
            .field("File Extension", &self.extension)
            .finish()
    }
}

impl MediaItem {
    pub fn new(url: impl Into<String>, extension: Option<Extension>) -> Self {
        Self {
            url: url.into(),
            extension,
        }
    }

    /// Wraps a video page URL so it gets handed to a format-aware downloader.
    pub fn delegated(url: &str) -> Self {
        Self::new(format!("{DELEGATED_PREFIX}{url}"), None)
    }

    #[inline]
    pub fn is_delegated(&self) -> bool {
        self.url.starts_with(DELEGATED_PREFIX)
    }

    /// Get the final file name of the media item for saving, numbered inside its post.
    ///
    /// Without a declared extension, the one at the end of the URL path is used.
    #[inline]
    pub fn file_name(&self, num: u32) -> String {
        let extension = self
            .extension
            .unwrap_or_else(|| Extension::from_url(&self.url));
        format!("{num:03}.{extension}")
    }
}

mod post_date {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::POST_DATE_FORMAT;

    pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_str(&date.format(POST_DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| NaiveDateTime::parse_from_str(&s, POST_DATE_FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ROOT_URL;

    #[test]
    fn post_reference_urls() {
        let std = PostReference::new(ROOT_URL, GallerySection::Standard, "BOARDID", 12345);
        assert_eq!(
            std.url,
            "https://gall.dcinside.com/board/view/?id=BOARDID&no=12345"
        );

        let mini = PostReference::new(ROOT_URL, GallerySection::MiniGallery, "tiny", 7);
        assert_eq!(mini.url, "https://gall.dcinside.com/mini/board/view/?id=tiny&no=7");
    }

    #[test]
    fn file_names_are_zero_padded() {
        let img = MediaItem::new("https://dcimg8.dcinside.co.kr/viewimage.php?id=1", Some(Extension::JPG));
        assert_eq!(img.file_name(1), "001.jpg");
        assert_eq!(img.file_name(1234), "1234.jpg");

        let guessed = MediaItem::new("https://example.org/clip.webm", None);
        assert_eq!(guessed.file_name(12), "012.webm");
    }

    #[test]
    fn delegated_items() {
        let yt = MediaItem::delegated("https://www.youtube.com/watch?v=ABC123");
        assert!(yt.is_delegated());
        assert_eq!(yt.url, "ytdl:https://www.youtube.com/watch?v=ABC123");
        assert_eq!(yt.extension, None);
    }

    #[test]
    fn metadata_json_shape() {
        let meta = PostMetadata {
            post: PostInfo {
                title: String::from("title"),
                description: String::new(),
                num: 5,
                date: NaiveDateTime::parse_from_str("2023-01-02 03:04:05", POST_DATE_FORMAT).ok(),
            },
            board: BoardInfo {
                id: String::from("board"),
            },
        };

        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["post"]["date"], "2023-01-02 03:04:05");
        assert_eq!(json["post"]["num"], 5);
        assert_eq!(json["board"]["id"], "board");
        assert_eq!(meta.directory_name(), "2023-01-02 title");

        let back: PostMetadata = serde_json::from_value(json).unwrap();
        assert_eq!(back, meta);

        let undated = PostMetadata::default();
        assert!(serde_json::to_value(&undated).unwrap()["post"]["date"].is_null());
    }
}
