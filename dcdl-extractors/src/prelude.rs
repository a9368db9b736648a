pub use crate::error::ExtractorError;
pub use crate::extractor::caps::{AsyncFetch, ExtractorThreadHandle};
pub use crate::extractor::{ExtractorInfo, HttpFetcher, PageFetcher};
pub use crate::extractor_config::SiteConfig;
pub use crate::gallery::board::BoardExtractor;
pub use crate::gallery::post::PostExtractor;
pub use crate::router::{route, ExtractorMatch};
