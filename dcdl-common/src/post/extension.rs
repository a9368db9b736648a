//! # Media Extension Module
//!
//! This module defines the [`Extension`] enum, which represents the file extension
//! of a media file found inside a gallery post.
//!
//! The gallery serves images through a PHP endpoint, so the extension can't be read from the URL
//! for most items. The extractor declares it instead, and [`Extension::from_url`] is only a
//! fallback for URLs that end with a real file name.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::PostError;

/// Represents the file extension of a downloaded media file.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    /// The `JPG` variant also encompasses the other extensions a jpeg might have, including `.jpg`, `.jpeg` and `.jfif`
    JPG,
    PNG,
    WEBP,
    GIF,
    WEBM,
    MP4,
    /// Used for any file whose extension is unknown or not currently supported by this library.
    Unknown,
}

impl Extension {
    /// Attempts to determine the `Extension` from a string slice.
    ///
    /// Case-insensitive. Never panics, unknown input maps to [`Extension::Unknown`].
    ///
    /// # Examples
    /// ```
    /// # use dcdl_common::post::extension::Extension;
    /// assert_eq!(Extension::guess_format("jpg"), Extension::JPG);
    /// assert_eq!(Extension::guess_format("MP4"), Extension::MP4);
    /// assert_eq!(Extension::guess_format("php"), Extension::Unknown);
    /// ```
    pub fn guess_format(s: &str) -> Self {
        Self::from_str(s).unwrap_or(Self::Unknown)
    }

    /// Guesses the extension from the last path segment of an URL, ignoring query and fragment.
    pub fn from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or_default();
        let file = path.rsplit('/').next().unwrap_or_default();
        match file.rsplit_once('.') {
            Some((_, ext)) => Self::guess_format(ext),
            None => Self::Unknown,
        }
    }
}

impl FromStr for Extension {
    type Err = PostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jpg" | "jpeg" | "jfif" => Ok(Self::JPG),
            "png" => Ok(Self::PNG),
            "webp" => Ok(Self::WEBP),
            "gif" => Ok(Self::GIF),
            "webm" => Ok(Self::WEBM),
            "mp4" => Ok(Self::MP4),
            _ => Err(PostError::UnknownExtension {
                message: s.to_string(),
            }),
        }
    }
}

impl Display for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::JPG => write!(f, "jpg"),
            Self::PNG => write!(f, "png"),
            Self::WEBP => write!(f, "webp"),
            Self::GIF => write!(f, "gif"),
            Self::WEBM => write!(f, "webm"),
            Self::MP4 => write!(f, "mp4"),
            Self::Unknown => write!(f, "bin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Extension;

    #[test]
    fn extension_from_url() {
        assert_eq!(Extension::from_url("https://a.b/c/d.PNG?x=1"), Extension::PNG);
        assert_eq!(Extension::from_url("https://a.b/viewimage.php?id=3.jpg"), Extension::Unknown);
        assert_eq!(Extension::from_url("https://a.b/noext"), Extension::Unknown);
    }

    #[test]
    fn extension_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Extension::MP4).unwrap(), "\"mp4\"");
        assert_eq!(Extension::Unknown.to_string(), "bin");
    }
}
