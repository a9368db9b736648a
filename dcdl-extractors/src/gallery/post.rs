//! Post resolver: metadata and media of a single post page.
use ahash::AHashSet;
use dcdl_common::{
    log::{debug, warn},
    message::Message,
    post::{
        extension::Extension, BoardInfo, MediaItem, PostInfo, PostMetadata, PostReference,
        POST_DATE_FORMAT,
    },
    text::{extract, extract_iter, parse_datetime, TextCursor},
    tokio::{
        spawn,
        sync::mpsc::{Sender, UnboundedSender},
    },
};
use std::sync::Arc;

use crate::{
    error::ExtractorError,
    extractor::{caps::ExtractorThreadHandle, AsyncFetch, ExtractorInfo, PageFetcher},
    extractor_config::SiteConfig,
};

const IMAGE_HOST: &str = "https://dcimg";

const MOVIE_VIEW_URL: &str = "https://gall.dcinside.com/board/movie/movie_view?no=";

const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed/";

const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Reads one post: its metadata and every media item embedded in it.
#[derive(Debug)]
pub struct PostExtractor<F> {
    fetcher: F,
    config: SiteConfig,
    post: PostReference,
}

impl<F> ExtractorInfo for PostExtractor<F> {
    const SUBCATEGORY: &'static str = "post";
    const PATTERN: &'static str =
        r"(?:https?://)?gall\.dcinside\.com/(mgallery/)?(mini/)?board/view/\?id=(\w+)&no=(\d+)";
    const EXAMPLE: &'static str = "https://gall.dcinside.com/board/view/?id=BOARDID&no=12345";
}

/// Images hosted on the gallery's image servers plus every lazy-loaded `data-src`, without
/// duplicates, in order of first appearance. All of them are declared as `jpg`.
pub fn images(page: &str) -> Vec<MediaItem> {
    let hosted = extract_iter(page, "img src=\"https://dcimg", "\"")
        .map(|rest| format!("{IMAGE_HOST}{rest}"));
    let lazy = extract_iter(page, "data-src=\"", "\"").map(str::to_string);

    let mut seen = AHashSet::new();
    hosted
        .chain(lazy)
        .filter(|url| seen.insert(url.clone()))
        .map(|url| MediaItem::new(url, Some(Extension::JPG)))
        .collect()
}

/// Player pages of videos uploaded to the gallery itself.
pub fn movie_pages(page: &str) -> Vec<String> {
    let marker = format!("src=\"{MOVIE_VIEW_URL}");
    extract_iter(page, &marker, "\"")
        .map(|no| format!("{MOVIE_VIEW_URL}{no}"))
        .collect()
}

/// Reads the real video URL out of a movie player page.
pub fn movie_source(player_page: &str) -> Option<&str> {
    extract(player_page, "input type = 'hidden' value ='", "'").filter(|url| !url.is_empty())
}

/// YouTube embeds, rewritten as delegated watch URLs.
pub fn embedded_videos(page: &str) -> Vec<MediaItem> {
    let marker = format!("embed src=\"{YOUTUBE_EMBED_URL}");
    extract_iter(page, &marker, "?")
        .map(|id| MediaItem::delegated(&format!("{YOUTUBE_WATCH_URL}{id}")))
        .collect()
}

impl<F> PostExtractor<F>
where
    F: PageFetcher + Send + Sync,
{
    pub fn new(fetcher: F, config: SiteConfig, post: PostReference) -> Self {
        Self {
            fetcher,
            config,
            post,
        }
    }

    pub const fn post(&self) -> &PostReference {
        &self.post
    }

    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Reads the post's descriptive fields.
    ///
    /// Fields whose markers are missing come out empty. The post number and board id come from
    /// the post reference, not from the page.
    pub fn metadata(&self, page: &str) -> PostMetadata {
        let mut cursor = TextCursor::new(page);
        let title = cursor.extract("\"og:title\" content=\"", "\"").to_string();
        let description = cursor
            .extract("\"og:description\" content=\"", "\"")
            .to_string();
        let date = parse_datetime(cursor.extract("\"gall_date\" title=\"", "\""), POST_DATE_FORMAT);

        PostMetadata {
            post: PostInfo {
                title,
                description,
                num: self.post.num,
                date,
            },
            board: BoardInfo {
                id: self.post.board_id.clone(),
            },
        }
    }

    /// Fetches one movie player page and returns its video as an `mp4` item.
    async fn resolve_movie(&self, player_url: &str) -> Result<Option<MediaItem>, ExtractorError> {
        let player_page = self.fetcher.fetch_text(player_url).await?;

        match movie_source(&player_page) {
            Some(url) => Ok(Some(MediaItem::new(url, Some(Extension::MP4)))),
            None => {
                warn!("No video source found in {player_url}");
                Ok(None)
            }
        }
    }

    /// Every media item of the post, in download order: images, gallery videos, YouTube embeds.
    ///
    /// Gallery videos cost one extra fetch each, done one after the other in page order.
    /// A video without a source is left out, so the items after it move up one number.
    pub async fn media(&self, page: &str) -> Result<Vec<MediaItem>, ExtractorError> {
        let mut items = images(page);

        for player_url in movie_pages(page) {
            if let Some(video) = self.resolve_movie(&player_url).await? {
                items.push(video);
            }
        }

        items.extend(embedded_videos(page));
        Ok(items)
    }

    /// Fetches the post page and returns a [`Message::Directory`] followed by one
    /// [`Message::Url`] per media item, numbered from 1.
    pub async fn items(&self) -> Result<Vec<Message>, ExtractorError> {
        let page = self.fetcher.fetch_text(&self.post.url).await?;

        let metadata = Arc::new(self.metadata(&page));
        let media = self.media(&page).await?;
        debug!("Post {}: {} media items", self.post, media.len());

        let mut messages = Vec::with_capacity(media.len() + 1);
        messages.push(Message::Directory(metadata.clone()));
        messages.extend((1..).zip(media).map(|(num, item)| Message::Url {
            num,
            item,
            metadata: metadata.clone(),
        }));

        Ok(messages)
    }
}

impl<F> AsyncFetch for PostExtractor<F>
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
        let messages = self.items().await?;
        let files = messages
            .iter()
            .filter(|msg| matches!(msg, Message::Url { .. }))
            .count() as u64;

        if let Some(counter) = &counter {
            counter.send(files).await?;
        }

        let total = messages.len() as u64;
        for msg in messages {
            sender_channel.send(msg)?;
        }

        Ok(total)
    }
}
