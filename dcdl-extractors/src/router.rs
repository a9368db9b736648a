//! Matches input URLs against the extractor patterns.
use dcdl_common::{
    post::{BoardReference, PostReference},
    text::parse_int,
    GallerySection, ROOT_URL,
};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    extractor::{ExtractorInfo, HttpFetcher},
    gallery::{board::BoardExtractor, post::PostExtractor},
};

static POST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}", PostExtractor::<HttpFetcher>::PATTERN)).unwrap());

static BOARD_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}", BoardExtractor::<HttpFetcher>::PATTERN)).unwrap());

/// Which extractor an URL belongs to, with everything captured from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractorMatch {
    Post(PostReference),
    Board(BoardReference),
}

impl ExtractorMatch {
    pub const fn subcategory(&self) -> &'static str {
        match self {
            Self::Post(_) => PostExtractor::<HttpFetcher>::SUBCATEGORY,
            Self::Board(_) => BoardExtractor::<HttpFetcher>::SUBCATEGORY,
        }
    }
}

#[inline]
fn section(caps: &Captures) -> GallerySection {
    GallerySection::from_segments(caps.get(1).is_some(), caps.get(2).is_some())
}

/// Matches `url` against the post pattern only.
///
/// The returned reference carries the canonical `https://` URL of the post on the default host,
/// even when the input had no scheme. A configured root is applied by the dispatcher.
pub fn match_post(url: &str) -> Option<PostReference> {
    let caps = POST_REGEX.captures(url)?;
    let num = caps[4].parse().ok()?;
    Some(PostReference::new(ROOT_URL, section(&caps), &caps[3], num))
}

/// Matches `url` against the board pattern only. Without `&page=`, the walk starts at page 1.
pub fn match_board(url: &str) -> Option<BoardReference> {
    let caps = BOARD_REGEX.captures(url)?;
    Some(BoardReference {
        board_id: caps[3].to_string(),
        section: section(&caps),
        start_page: caps.get(5).map_or(1, |page| parse_int(page.as_str(), 1)),
    })
}

/// Finds the extractor for `url`. Posts are tried first.
pub fn route(url: &str) -> Option<ExtractorMatch> {
    let url = url.trim();
    match_post(url)
        .map(ExtractorMatch::Post)
        .or_else(|| match_board(url).map(ExtractorMatch::Board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn examples_route_to_their_extractor() {
        assert!(matches!(
            route(PostExtractor::<HttpFetcher>::EXAMPLE),
            Some(ExtractorMatch::Post(_))
        ));
        assert!(matches!(
            route(BoardExtractor::<HttpFetcher>::EXAMPLE),
            Some(ExtractorMatch::Board(_))
        ));
    }

    #[test]
    fn post_url() {
        let Some(ExtractorMatch::Post(post)) =
            route("https://gall.dcinside.com/board/view/?id=BOARDID&no=12345")
        else {
            panic!("post URL was not routed to the post extractor");
        };

        assert_eq!(post.board_id, "BOARDID");
        assert_eq!(post.num, 12345);
        assert_eq!(post.section, GallerySection::Standard);
        assert_eq!(
            post.url,
            "https://gall.dcinside.com/board/view/?id=BOARDID&no=12345"
        );
    }

    #[test]
    fn board_url_with_page() {
        let Some(ExtractorMatch::Board(board)) =
            route("https://gall.dcinside.com/board/lists/?id=BOARDID&page=3")
        else {
            panic!("board URL was not routed to the board extractor");
        };

        assert_eq!(board.board_id, "BOARDID");
        assert_eq!(board.start_page, 3);
        assert_eq!(board.section, GallerySection::Standard);
    }

    #[test]
    fn sections_and_optional_scheme() {
        let board = match_board("gall.dcinside.com/mgallery/board/lists/?id=abc").unwrap();
        assert_eq!(board.section, GallerySection::MobileGallery);
        assert_eq!(board.start_page, 1);

        let post = match_post("http://gall.dcinside.com/mini/board/view/?id=abc&no=9&page=2").unwrap();
        assert_eq!(post.section, GallerySection::MiniGallery);
        assert_eq!(post.url, "https://gall.dcinside.com/mini/board/view/?id=abc&no=9");

        let both = match_board("https://gall.dcinside.com/mgallery/mini/board/lists/?id=abc").unwrap();
        assert_eq!(both.section, GallerySection::MobileGallery);
    }

    #[test]
    fn foreign_urls_are_rejected() {
        assert_eq!(route("https://example.org/board/view/?id=a&no=1"), None);
        assert_eq!(route("https://gall.dcinside.com/board/view/?id=a"), None);
        assert_eq!(route("https://gall.dcinside.com/board/movie/movie_view?no=1"), None);
    }
}
