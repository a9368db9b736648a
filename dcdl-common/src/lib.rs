use std::{
    env,
    fmt::Display,
    fs::create_dir_all,
    io,
    path::{Path, PathBuf},
};

// Public Exports
pub use chrono;
pub use directories;
pub use log;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;

use directories::ProjectDirs;

use log::debug;

use serde::{Deserialize, Serialize};

pub mod macros;
pub mod message;
pub mod post;
pub mod text;

/// Host every extractor talks to.
pub const ROOT_URL: &str = "https://gall.dcinside.com";

/// Category name used in output paths and logs.
pub const CATEGORY: &str = "dcinside";

/// The sections of `gall.dcinside.com` a board or post can live in.
///
/// Each section only changes the path prefix placed between the host and `board/`.
#[derive(Debug, Copy, Clone, Default, Ord, PartialOrd, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GallerySection {
    /// Main galleries, ```https://gall.dcinside.com/board/...```
    #[default]
    Standard,
    /// ```https://gall.dcinside.com/mgallery/board/...```
    MobileGallery,
    /// ```https://gall.dcinside.com/mini/board/...```
    MiniGallery,
}

impl Display for GallerySection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::MobileGallery => write!(f, "mgallery"),
            Self::MiniGallery => write!(f, "mini"),
        }
    }
}

impl GallerySection {
    /// Resolves the section from the two optional path segments a URL may carry.
    ///
    /// `mgallery/` takes precedence when both are present.
    #[inline]
    pub const fn from_segments(mgallery: bool, mini: bool) -> Self {
        if mgallery {
            Self::MobileGallery
        } else if mini {
            Self::MiniGallery
        } else {
            Self::Standard
        }
    }

    /// Path segment inserted after the host, with its trailing slash.
    #[inline]
    pub const fn path_prefix(self) -> &'static str {
        match self {
            Self::Standard => "",
            Self::MobileGallery => "mgallery/",
            Self::MiniGallery => "mini/",
        }
    }

    /// Absolute base for every URL of this section, e.g. `https://gall.dcinside.com/mgallery/`
    #[inline]
    pub fn base_url(self, root: &str) -> String {
        format!("{}/{}", root.trim_end_matches('/'), self.path_prefix())
    }
}

/// Returns a `PathBuf` pointing to the directory that holds `config.toml`.
///
/// This is XDG-compliant and resolves to
/// `$XDG_CONFIG_HOME/dcinside-downloader` on Linux or
/// `%APPDATA%/dcinside-downloader` on Windows
///
/// Or you can set the env var `DCDL_CONFIG_DIR` to point it to a custom location.
pub fn config_dir() -> Result<PathBuf, io::Error> {
    let cfg_path = match env::var("DCDL_CONFIG_DIR") {
        Ok(path) => path,
        Err(_) => {
            let cdir = ProjectDirs::from("com", "dcdl", "dcinside-downloader").ok_or_else(
                || io::Error::new(io::ErrorKind::NotFound, "no home directory available"),
            )?;
            cdir.config_dir().to_string_lossy().to_string()
        }
    };

    let cfold = Path::new(&cfg_path);

    if !cfold.exists() {
        create_dir_all(cfold)?;
    }

    debug!("Using config dir: {}", cfold.display());
    Ok(cfold.to_path_buf())
}
