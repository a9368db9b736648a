//! Board walker: listing page, post links, next page.
use dcdl_common::{
    log::{debug, warn},
    message::Message,
    post::{BoardReference, PostReference},
    text::{extract, extract_iter, parse_int},
    tokio::{
        spawn,
        sync::mpsc::{Sender, UnboundedSender},
    },
};

use crate::{
    error::ExtractorError,
    extractor::{caps::ExtractorThreadHandle, AsyncFetch, ExtractorInfo, PageFetcher},
    extractor_config::SiteConfig,
};

/// Walks every listing page of a board, from the start page up to the total page count the first
/// fetched page declares.
///
/// The walker is a one-shot sequence: once [`next_page`](Self::next_page) returned `None` it stays
/// exhausted.
#[derive(Debug)]
pub struct BoardExtractor<F> {
    fetcher: F,
    config: SiteConfig,
    board: BoardReference,
    page_index: u64,
    total_pages: Option<u64>,
    exhausted: bool,
}

impl<F> ExtractorInfo for BoardExtractor<F> {
    const SUBCATEGORY: &'static str = "board";
    const PATTERN: &'static str =
        r"(?:https?://)?gall\.dcinside\.com/(mgallery/)?(mini/)?board/lists/\?id=(\w+)(&page=(\d+))?";
    const EXAMPLE: &'static str = "https://gall.dcinside.com/board/lists/?id=BOARDID";
}

/// Splits a listing link (`BOARDID&no=123&page=1`) into its board id and post number.
fn parse_post_link(link: &str) -> Option<(&str, u64)> {
    let (board_id, rest) = link.split_once("&no=")?;
    let num = rest.split('&').next()?.parse().ok()?;
    Some((board_id, num))
}

/// Reads the `total_page` counter of a listing page. Missing or malformed counters mean a single
/// page.
pub fn parse_total_pages(page: &str) -> u64 {
    extract(page, "total_page\">", "<").map_or(1, |total| parse_int(total, 1))
}

impl<F> BoardExtractor<F>
where
    F: PageFetcher + Send + Sync,
{
    pub fn new(fetcher: F, config: SiteConfig, board: BoardReference) -> Self {
        Self {
            page_index: board.start_page,
            fetcher,
            config,
            board,
            total_pages: None,
            exhausted: false,
        }
    }

    pub const fn board(&self) -> &BoardReference {
        &self.board
    }

    /// Index of the page the next call to [`next_page`](Self::next_page) will fetch.
    pub const fn page_index(&self) -> u64 {
        self.page_index
    }

    /// Page count declared by the board, known after the first fetch.
    pub const fn total_pages(&self) -> Option<u64> {
        self.total_pages
    }

    pub const fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// URL of listing page `page`.
    pub fn list_url(&self, page: u64) -> String {
        format!(
            "{}board/lists/?id={}&page={}",
            self.board.section.base_url(&self.config.root),
            self.board.board_id,
            page
        )
    }

    /// Maps every post link of a listing page into a [`Message::Queue`].
    ///
    /// Only links under the board's own section are picked up.
    pub fn map_posts(&self, page: &str) -> Vec<Message> {
        let prefix = self.board.section.path_prefix();
        let marker = format!("href=\"/{prefix}board/view/?id=");
        let base = format!("{}board/view/?id=", self.board.section.base_url(&self.config.root));

        extract_iter(page, &marker, "\"")
            .filter_map(|link| {
                let url = format!("{base}{link}");
                let Some((board_id, num)) = parse_post_link(link) else {
                    warn!("Skipping post link without a post number: {url}");
                    return None;
                };

                let post = PostReference {
                    board_id: board_id.to_string(),
                    section: self.board.section,
                    num,
                    url: url.clone(),
                };
                Some(Message::Queue { url, post })
            })
            .collect()
    }

    /// Fetches the next listing page and returns its queued posts.
    ///
    /// `Ok(None)` once the last page was processed.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Message>>, ExtractorError> {
        if self.exhausted {
            return Ok(None);
        }

        if self.page_index == 0 {
            self.exhausted = true;
            return Err(ExtractorError::ZeroPage);
        }

        let url = self.list_url(self.page_index);
        let page = self.fetcher.fetch_text(&url).await?;

        let total = *self
            .total_pages
            .get_or_insert_with(|| parse_total_pages(&page));

        let posts = self.map_posts(&page);
        debug!(
            "Board {} page {}/{}: {} posts",
            self.board.board_id,
            self.page_index,
            total,
            posts.len()
        );

        if self.page_index >= total {
            self.exhausted = true;
        } else {
            self.page_index += 1;
        }

        Ok(Some(posts))
    }
}

impl<F> AsyncFetch for BoardExtractor<F>
where
    F: PageFetcher + Send + Sync + 'static,
{
    #[inline]
    fn setup_fetch_thread(
        self,
        sender_channel: UnboundedSender<Message>,
        counter: Option<Sender<u64>>,
    ) -> ExtractorThreadHandle {
        spawn(async move {
            let mut ext = self;
            ext.async_fetch(sender_channel, counter).await
        })
    }

    async fn async_fetch(
        &mut self,
        sender_channel: UnboundedSender<Message>,
        counter: Option<Sender<u64>>,
    ) -> Result<u64, ExtractorError> {
        let mut total_sent: u64 = 0;

        debug!("Board walker initialized for {}", self.board.board_id);

        while let Some(posts) = self.next_page().await? {
            let size = posts.len() as u64;

            for msg in posts {
                sender_channel.send(msg)?;
            }

            total_sent += size;
            if let Some(counter) = &counter {
                counter.send(size).await?;
            }
        }

        debug!("Board walker finished, {total_sent} posts queued.");
        Ok(total_sent)
    }
}
