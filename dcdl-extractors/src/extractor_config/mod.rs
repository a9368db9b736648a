use dcdl_common::{
    serde::{self, Deserialize, Serialize},
    CATEGORY, ROOT_URL,
};
use once_cell::sync::Lazy;
use std::{fmt::Display, time::Duration};

pub(crate) const DEFAULT_UA: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:128.0) Gecko/20100101 Firefox/128.0";

pub(crate) const DEFAULT_RETRIES: u32 = 4;

pub mod serialize;

pub static DEFAULT_CONFIG: Lazy<SiteConfig> = Lazy::new(SiteConfig::default);

/// Values shared by the board and post extractors.
///
/// Every field can be overridden from `config.toml`, missing keys keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(crate = "self::serde", default)]
pub struct SiteConfig {
    pub category: String,
    /// Scheme and host, without trailing slash.
    pub root: String,
    pub user_agent: String,
    /// How many times a failed page fetch is retried before giving up.
    pub retries: u32,
    /// Fixed pause before every page request, in milliseconds.
    pub request_delay_ms: Option<u64>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            category: String::from(CATEGORY),
            root: String::from(ROOT_URL),
            user_agent: String::from(DEFAULT_UA),
            retries: DEFAULT_RETRIES,
            request_delay_ms: None,
        }
    }
}

impl SiteConfig {
    /// Root with a trailing slash, used as `Referer` for every request.
    pub fn referer(&self) -> String {
        format!("{}/", self.root.trim_end_matches('/'))
    }

    pub fn request_delay(&self) -> Option<Duration> {
        self.request_delay_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }
}

impl Display for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.category, self.root)
    }
}
