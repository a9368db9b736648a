#![deny(clippy::all)]
use color_eyre::eyre::{bail, Result};
use color_eyre::owo_colors::OwoColorize;
use dcdl_cli::cli::{extra::confirm_output_dir, Cli};
use dcdl_cli::printer::{setup_printer, PrintMode};
use dcdl_cli::progress_bars::IndicatifProgressHandler;
use dcdl_common::message::Message;
use dcdl_core::async_queue::{Queue, QueueSummary};
use dcdl_core::dispatch::{DispatchSummary, Dispatcher};
use dcdl_core::progress::ProgressListener;
use dcdl_extractors::extractor_config::serialize::load_config;
use dcdl_extractors::prelude::*;
use clap::Parser;
use log::{debug, error};
use std::process::exit;
use std::sync::Arc;
use tokio::sync::mpsc::{channel, unbounded_channel, Sender, UnboundedSender};
use tokio::{self, join};

/// Totals over every input URL.
#[derive(Debug, Default)]
struct RunTotals {
    dispatch: DispatchSummary,
    failed_urls: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    env_logger::builder().format_timestamp(None).init();
    color_eyre::install()?;

    let config = load_config(args.config.as_deref()).await?;
    debug!("Using site config {config}");

    let fetcher = HttpFetcher::new(&config)?;
    let dispatcher = Dispatcher::new(fetcher.clone(), config);

    // Channel for messages from the extractors to the downloader (or printer)
    let (message_sender, message_receiver) = unbounded_channel();

    if args.is_dry_run() {
        let mode = if args.dump_json {
            PrintMode::Json
        } else {
            PrintMode::Urls
        };

        let printer = setup_printer(message_receiver, mode);
        let totals = run_all(&dispatcher, &args, message_sender, None).await;
        let printed = printer.await??;

        debug!("{printed} files printed");
        print_failures(&totals);
        return Ok(());
    }

    let dirname = args.generate_save_path()?;

    if !confirm_output_dir(&dirname, args.overwrite)? {
        println!("{}", "Download cancelled".bold().blue());
        exit(0);
    }

    // Channel for the file count of every resolved post
    let (length_sender, mut length_receiver) = channel::<u64>(16);

    let progress_handler = Arc::new(IndicatifProgressHandler::new(0));

    let progress_total_updater_task = tokio::spawn({
        let progress_handler = progress_handler.clone();
        async move {
            while let Some(files) = length_receiver.recv().await {
                progress_handler.inc_main_total(files);
            }
        }
    });

    let queue = Queue::new(
        args.simultaneous_downloads,
        fetcher.client(),
        Some(progress_handler.clone()),
    );

    let downloader_task = queue.setup_async_downloader(dirname, message_receiver);

    // Senders are dropped once every URL is done, which ends both tasks.
    let totals = run_all(&dispatcher, &args, message_sender, Some(length_sender)).await;

    let (Ok(results), Ok(_)) = join!(downloader_task, progress_total_updater_task) else {
        bail!("Failed starting threads!")
    };

    print_results(&results?, &totals);

    Ok(())
}

/// Dispatches every input URL in order. A failing URL is reported and the next one still runs.
async fn run_all<F>(
    dispatcher: &Dispatcher<F>,
    args: &Cli,
    output: UnboundedSender<Message>,
    length: Option<Sender<u64>>,
) -> RunTotals
where
    F: PageFetcher + Clone + Send + Sync + 'static,
{
    let mut totals = RunTotals::default();

    for extractor in &args.urls {
        let label = describe(extractor);

        match dispatcher
            .run_match(extractor.clone(), &output, length.as_ref())
            .await
        {
            Ok(summary) => {
                debug!("{label}: {summary:?}");
                totals.dispatch.posts += summary.posts;
                totals.dispatch.failed_posts += summary.failed_posts;
                totals.dispatch.files += summary.files;
            }
            Err(err) => {
                error!("{label}: {err}");
                totals.failed_urls += 1;
            }
        }
    }

    totals
}

fn describe(extractor: &ExtractorMatch) -> String {
    match extractor {
        ExtractorMatch::Post(post) => post.url.clone(),
        ExtractorMatch::Board(board) => format!(
            "{} {}{} from page {}",
            extractor.subcategory(),
            board.section.path_prefix(),
            board.board_id,
            board.start_page
        ),
    }
}

fn print_results(summary: &QueueSummary, totals: &RunTotals) {
    println!(
        "{} {} {}",
        summary.downloaded.to_string().bold().blue(),
        "files".bold().blue(),
        "downloaded".bold()
    );

    if summary.skipped > 0 {
        println!(
            "{} {}",
            summary.skipped.to_string().bold().green(),
            "files were already on disk.".bold().green()
        );
    }

    if summary.delegated > 0 {
        println!(
            "{} {}",
            summary.delegated.to_string().bold().yellow(),
            "embedded videos need an external downloader (see --simulate)."
                .bold()
                .yellow()
        );
    }

    if summary.failed > 0 {
        println!(
            "{} {}",
            summary.failed.to_string().bold().red(),
            "files failed to download.".bold().red()
        );
    }

    print_failures(totals);
}

fn print_failures(totals: &RunTotals) {
    if totals.dispatch.failed_posts > 0 {
        println!(
            "{} {}",
            totals.dispatch.failed_posts.to_string().bold().red(),
            "posts could not be read.".bold().red()
        );
    }

    if totals.failed_urls > 0 {
        println!(
            "{} {}",
            totals.failed_urls.to_string().bold().red(),
            "input URLs failed.".bold().red()
        );
    }
}
