//! Routes input URLs to their extractor and resolves every post a board walk queues.
use dcdl_common::{
    message::Message,
    post::PostReference,
    tokio::sync::mpsc::{Sender, UnboundedSender},
};
use dcdl_extractors::{
    error::ExtractorError,
    extractor::{AsyncFetch, PageFetcher},
    extractor_config::SiteConfig,
    gallery::{board::BoardExtractor, post::PostExtractor},
    router::{route, ExtractorMatch},
};
use log::{debug, warn};

use crate::error::DownloaderError;

/// Totals of one dispatched URL.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Posts resolved successfully.
    pub posts: u64,
    pub failed_posts: u64,
    /// Media items sent to the download side.
    pub files: u64,
}

/// Drives the extractors for input URLs and forwards their messages to the download side.
#[derive(Debug, Clone)]
pub struct Dispatcher<F> {
    fetcher: F,
    config: SiteConfig,
}

impl<F> Dispatcher<F>
where
    F: PageFetcher + Clone + Send + Sync + 'static,
{
    pub fn new(fetcher: F, config: SiteConfig) -> Self {
        Self { fetcher, config }
    }

    /// Routes `url` and runs its extractor.
    ///
    /// `length` receives the number of media items of every resolved post.
    pub async fn run(
        &self,
        url: &str,
        output: &UnboundedSender<Message>,
        length: Option<&Sender<u64>>,
    ) -> Result<DispatchSummary, DownloaderError> {
        let Some(extractor) = route(url) else {
            return Err(ExtractorError::UnsupportedUrl {
                url: url.to_string(),
            }
            .into());
        };

        self.run_match(extractor, output, length).await
    }

    /// Runs an already routed URL.
    ///
    /// A single post fails as a whole. In a board walk, posts that fail are logged and counted,
    /// the walk goes on. Closed channels and listing failures stop the walk.
    pub async fn run_match(
        &self,
        extractor: ExtractorMatch,
        output: &UnboundedSender<Message>,
        length: Option<&Sender<u64>>,
    ) -> Result<DispatchSummary, DownloaderError> {
        let mut summary = DispatchSummary::default();

        match extractor {
            ExtractorMatch::Post(post) => {
                // Routed URLs carry the default host.
                let post =
                    PostReference::new(&self.config.root, post.section, &post.board_id, post.num);
                summary.files = self.resolve_post(post, output, length).await?;
                summary.posts = 1;
            }
            ExtractorMatch::Board(board) => {
                debug!("Walking board {} from page {}", board.board_id, board.start_page);

                let mut walker =
                    BoardExtractor::new(self.fetcher.clone(), self.config.clone(), board);
                let mut queued: u64 = 0;

                // Every post of a listing page is resolved before the next page is fetched.
                while let Some(messages) = walker.next_page().await? {
                    for msg in messages {
                        let Message::Queue { url, post } = msg else {
                            output.send(msg).map_err(ExtractorError::from)?;
                            continue;
                        };
                        queued += 1;

                        output
                            .send(Message::Queue {
                                url: url.clone(),
                                post: post.clone(),
                            })
                            .map_err(ExtractorError::from)?;

                        match self.resolve_post(post, output, length).await {
                            Ok(files) => {
                                summary.posts += 1;
                                summary.files += files;
                            }
                            Err(
                                err @ (ExtractorError::ChannelSendFail(_)
                                | ExtractorError::SendLengthFail { .. }),
                            ) => return Err(err.into()),
                            Err(err) => {
                                warn!("Skipping post {url}: {err}");
                                summary.failed_posts += 1;
                            }
                        }
                    }
                }

                debug!(
                    "Board walk done: {queued} queued, {} resolved, {} failed",
                    summary.posts, summary.failed_posts
                );
            }
        }

        Ok(summary)
    }

    /// Resolves one post and sends its messages. Returns the number of media items.
    pub async fn resolve_post(
        &self,
        post: PostReference,
        output: &UnboundedSender<Message>,
        length: Option<&Sender<u64>>,
    ) -> Result<u64, ExtractorError> {
        let mut extractor = PostExtractor::new(self.fetcher.clone(), self.config.clone(), post);
        let sent = extractor
            .async_fetch(output.clone(), length.cloned())
            .await?;

        // Everything after the directory message is a file.
        Ok(sent.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcdl_common::tokio::{
        sync::mpsc::{channel, unbounded_channel},
        task::yield_now,
    };
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
    };

    #[derive(Debug, Clone, Default)]
    struct StaticPages {
        pages: Arc<HashMap<String, String>>,
        requests: Arc<Mutex<Vec<String>>>,
    }

    impl StaticPages {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: Arc::new(
                    pages
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
                requests: Arc::default(),
            }
        }
    }

    impl PageFetcher for StaticPages {
        async fn fetch_text(&self, url: &str) -> Result<String, ExtractorError> {
            self.requests.lock().unwrap().push(url.to_string());
            yield_now().await;
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| ExtractorError::ServerStatus {
                    url: url.to_string(),
                    status: 404,
                })
        }
    }

    const LISTING: &str = r#"<a href="/board/view/?id=test&no=1&page=1">one</a>
<a href="/board/view/?id=test&no=2&page=1">two</a>
<span class="total_page">1</span>"#;

    const POST_ONE: &str = r#"<meta property="og:title" content="first">
<img src="https://dcimg1.dcinside.com/1.jpg">
<img src="https://dcimg1.dcinside.com/2.jpg">"#;

    fn drain(rx: &mut dcdl_common::tokio::sync::mpsc::UnboundedReceiver<Message>) -> Vec<Message> {
        let mut messages = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    #[tokio::test]
    async fn failed_posts_do_not_stop_the_board() {
        // Post 2 is not served.
        let fetcher = StaticPages::new(&[
            ("https://gall.dcinside.com/board/lists/?id=test&page=1", LISTING),
            (
                "https://gall.dcinside.com/board/view/?id=test&no=1&page=1",
                POST_ONE,
            ),
        ]);
        let dispatcher = Dispatcher::new(fetcher.clone(), SiteConfig::default());

        let (tx, mut rx) = unbounded_channel();
        let (len_tx, mut len_rx) = channel(8);
        let summary = dispatcher
            .run(
                "https://gall.dcinside.com/board/lists/?id=test",
                &tx,
                Some(&len_tx),
            )
            .await
            .unwrap();

        assert_eq!(
            summary,
            DispatchSummary {
                posts: 1,
                failed_posts: 1,
                files: 2,
            }
        );
        assert_eq!(len_rx.try_recv().unwrap(), 2);

        let messages = drain(&mut rx);
        // queue(1), directory, 2 files, queue(2)
        assert_eq!(messages.len(), 5);
        assert!(messages[0].is_queue());
        assert!(matches!(messages[1], Message::Directory(_)));
        assert!(messages[4].is_queue());
        assert_eq!(fetcher.requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn listing_pages_wait_for_their_posts() {
        let lists: Vec<String> = (1..=3)
            .map(|page| format!("https://gall.dcinside.com/board/lists/?id=test&page={page}"))
            .collect();
        let views: Vec<String> = (1..=3)
            .map(|no| format!("https://gall.dcinside.com/board/view/?id=test&no={no}&page={no}"))
            .collect();
        let listings: Vec<String> = (1..=3)
            .map(|no| {
                format!(
                    r#"<a href="/board/view/?id=test&no={no}&page={no}">p</a><span class="total_page">3</span>"#
                )
            })
            .collect();

        let mut pages: Vec<(&str, &str)> = Vec::new();
        for i in 0..3 {
            pages.push((&lists[i], &listings[i]));
            pages.push((&views[i], POST_ONE));
        }
        let fetcher = StaticPages::new(&pages);
        let dispatcher = Dispatcher::new(fetcher.clone(), SiteConfig::default());

        let (tx, _rx) = unbounded_channel();
        let summary = dispatcher
            .run("https://gall.dcinside.com/board/lists/?id=test", &tx, None)
            .await
            .unwrap();
        assert_eq!(summary.posts, 3);

        let requests = fetcher.requests.lock().unwrap().clone();
        assert_eq!(
            requests,
            [
                lists[0].as_str(),
                views[0].as_str(),
                lists[1].as_str(),
                views[1].as_str(),
                lists[2].as_str(),
                views[2].as_str(),
            ]
        );
    }

    #[tokio::test]
    async fn single_post_failure_is_an_error() {
        let dispatcher = Dispatcher::new(StaticPages::default(), SiteConfig::default());
        let (tx, _rx) = unbounded_channel();

        let result = dispatcher
            .run(
                "https://gall.dcinside.com/board/view/?id=test&no=9",
                &tx,
                None,
            )
            .await;
        assert!(matches!(
            result,
            Err(DownloaderError::ExtractorError {
                source: ExtractorError::ServerStatus { status: 404, .. }
            })
        ));
    }

    #[tokio::test]
    async fn single_posts_use_the_configured_root() {
        let fetcher = StaticPages::new(&[("http://mirror.test/board/view/?id=test&no=9", POST_ONE)]);
        let config = SiteConfig {
            root: "http://mirror.test".into(),
            ..Default::default()
        };
        let dispatcher = Dispatcher::new(fetcher.clone(), config);
        let (tx, _rx) = unbounded_channel();

        let summary = dispatcher
            .run(
                "https://gall.dcinside.com/board/view/?id=test&no=9",
                &tx,
                None,
            )
            .await
            .unwrap();

        assert_eq!(summary.files, 2);
        assert_eq!(
            *fetcher.requests.lock().unwrap(),
            ["http://mirror.test/board/view/?id=test&no=9"]
        );
    }

    #[tokio::test]
    async fn unknown_urls_are_rejected() {
        let dispatcher = Dispatcher::new(StaticPages::default(), SiteConfig::default());
        let (tx, _rx) = unbounded_channel();

        let result = dispatcher.run("https://example.com/", &tx, None).await;
        assert!(matches!(
            result,
            Err(DownloaderError::ExtractorError {
                source: ExtractorError::UnsupportedUrl { .. }
            })
        ));
    }
}
