use dcdl_core::progress::{DownloadProgressUpdater, LogType, ProgressListener};
use indicatif::{
    HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressState, ProgressStyle,
};
use owo_colors::OwoColorize;
use std::{fmt::Write, time::Duration};

const PROGRESS_CHARS: &str = "━━";

const MAIN_TEMPLATE: &str = "{spinner:.blue.bold} {elapsed_precise:.bold} {wide_bar:.blue/white.dim} {percent:.bold}  {pos:.blue} ({files_sec:.dim}, eta. {eta:.blue})";

const DOWNLOAD_TEMPLATE: &str = "{spinner:.blue.bold} {bar:40.blue/white.dim} {percent:.bold} | {byte_progress:21.blue} @ {bytes_per_sec:>13.yellow} {msg:.dim}";

/// Handles CLI progress display using `indicatif`.
///
/// The main bar counts files. Its length grows while board walks discover new posts.
#[derive(Debug)]
pub struct IndicatifProgressHandler {
    main_bar: ProgressBar,
    multi_pb: MultiProgress,
}

impl IndicatifProgressHandler {
    pub fn new(initial_len: u64) -> Self {
        let bar = ProgressBar::new(initial_len).with_style(master_progress_style());
        bar.set_draw_target(ProgressDrawTarget::stderr());
        bar.enable_steady_tick(Duration::from_millis(100));

        let multi = MultiProgress::new();
        let main = multi.add(bar);

        Self {
            main_bar: main,
            multi_pb: multi,
        }
    }
}

#[derive(Debug)]
struct IndicatifDownloadProgressUpdater {
    bar: ProgressBar,
}

impl DownloadProgressUpdater for IndicatifDownloadProgressUpdater {
    fn set_progress(&self, bytes_downloaded: u64) {
        self.bar.set_position(bytes_downloaded);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressListener for IndicatifProgressHandler {
    fn inc_main_total(&self, delta: u64) {
        self.main_bar.inc_length(delta);
    }

    fn main_tick(&self) {
        self.main_bar.inc(1);
    }

    fn main_done(&self) {
        self.main_bar.finish_with_message("All files processed.");
    }

    fn add_download_task(
        &self,
        name: String,
        total_size: Option<u64>,
    ) -> Box<dyn DownloadProgressUpdater> {
        // Without Content-Length the bar starts empty and the byte counter keeps going.
        let pb = ProgressBar::new(total_size.unwrap_or(0))
            .with_style(download_progress_style())
            .with_message(name);
        pb.set_draw_target(ProgressDrawTarget::stderr());

        let managed_pb = self.multi_pb.add(pb);

        Box::new(IndicatifDownloadProgressUpdater { bar: managed_pb })
    }

    fn log_event(&self, log_type: LogType, target: &str, message: &str) {
        let formatted_message = match log_type {
            LogType::Info => format!("{} {}", target.bold(), message),
            LogType::Skip => {
                format!(
                    "{} {} {}",
                    target.blue().italic(),
                    message.green().bold(),
                    "Skipping...".green().bold()
                )
            }
            LogType::Remove => {
                format!(
                    "{} {} {}",
                    target.blue().italic(),
                    message.red().bold(),
                    "Removed.".red().bold()
                )
            }
            LogType::Success => {
                format!("{} {}", target.blue().italic(), message.green().bold())
            }
            LogType::Warning => format!(
                "{} {} {}",
                target.blue().italic(),
                message.yellow().bold(),
                "Warning.".yellow().bold()
            ),
            LogType::Error => format!(
                "{} {} {}",
                target.blue().italic(),
                message.red().bold(),
                "Error.".red().bold()
            ),
        };

        self.main_bar.println(formatted_message);
    }
}

fn master_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(MAIN_TEMPLATE)
        .unwrap()
        .with_key("pos", |state: &ProgressState, w: &mut dyn Write| {
            write!(w, "{}/{}", state.pos(), state.len().unwrap_or_default()).unwrap();
        })
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            write!(w, "{:>3.0}%", state.fraction() * 100_f32).unwrap();
        })
        .with_key(
            "files_sec",
            |state: &ProgressState, w: &mut dyn Write| match state.per_sec() {
                files_sec if files_sec.abs() < f64::EPSILON => write!(w, "0 files/s").unwrap(),
                files_sec if files_sec < 1.0 => write!(w, "{:.2} s/file", 1.0 / files_sec).unwrap(),
                files_sec => write!(w, "{:.2} files/s", files_sec).unwrap(),
            },
        )
        .progress_chars(PROGRESS_CHARS)
}

fn download_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(DOWNLOAD_TEMPLATE)
        .unwrap()
        .with_key("percent", |state: &ProgressState, w: &mut dyn Write| {
            write!(w, "{:>3.0}%", state.fraction() * 100_f32).unwrap();
        })
        .with_key(
            "byte_progress",
            |state: &ProgressState, w: &mut dyn Write| match state.len() {
                Some(len) if len > 0 => {
                    write!(w, "{}/{}", HumanBytes(state.pos()), HumanBytes(len)).unwrap()
                }
                _ => write!(w, "{}", HumanBytes(state.pos())).unwrap(),
            },
        )
        .progress_chars(PROGRESS_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_total_grows() {
        let handler = IndicatifProgressHandler::new(0);
        handler.main_bar.set_draw_target(ProgressDrawTarget::hidden());

        handler.inc_main_total(3);
        handler.inc_main_total(2);
        handler.main_tick();

        assert_eq!(handler.main_bar.length(), Some(5));
        assert_eq!(handler.main_bar.position(), 1);
    }
}
