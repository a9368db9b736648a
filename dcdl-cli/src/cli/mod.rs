use std::path::PathBuf;

use clap::Parser;
use dcdl_extractors::router::ExtractorMatch;

use self::extra::validate_url;

pub mod extra;

#[derive(Parser, Debug)]
#[clap(name = "dcinside downloader", author, version, about, long_about = None)]
pub struct Cli {
    /// Board or post URLs from gall.dcinside.com
    ///
    /// Boards: https://gall.dcinside.com/[mgallery/|mini/]board/lists/?id=BOARD[&page=N]
    ///
    /// Posts: https://gall.dcinside.com/[mgallery/|mini/]board/view/?id=BOARD&no=N
    #[clap(value_name = "URLS", required = true, value_parser = validate_url)]
    pub urls: Vec<ExtractorMatch>,

    /// Where to save files (If the path doesn't exist, it will be created.)
    #[clap(short = 'o', value_name = "PATH", help_heading = "SAVE")]
    pub output: Option<PathBuf>,

    /// Number of simultaneous downloads
    ///
    /// [max: 20]
    #[clap(
        short = 'd',
        value_name = "NUMBER",
        value_parser(clap::value_parser!(u8).range(1..=20)),
        default_value_t = 5,
        help_heading = "DOWNLOAD"
    )]
    pub simultaneous_downloads: u8,

    /// Print the URL of every file instead of downloading it
    #[clap(
        short = 's',
        long,
        value_parser,
        default_value_t = false,
        help_heading = "DOWNLOAD"
    )]
    pub simulate: bool,

    /// Print every extractor message as a JSON line instead of downloading
    #[clap(
        short = 'j',
        long,
        value_parser,
        default_value_t = false,
        conflicts_with = "simulate",
        help_heading = "DOWNLOAD"
    )]
    pub dump_json: bool,

    /// Always overwrite output
    #[clap(
        short = 'y',
        value_parser,
        default_value_t = false,
        help_heading = "SAVE"
    )]
    pub overwrite: bool,

    /// Read the site config from this file instead of the default location
    #[clap(long = "config", value_name = "FILE", help_heading = "GENERAL")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Nothing is written to disk in simulation modes.
    pub const fn is_dry_run(&self) -> bool {
        self.simulate || self.dump_json
    }

    pub fn generate_save_path(&self) -> Result<PathBuf, std::io::Error> {
        if let Some(output_path) = &self.output {
            Ok(output_path.clone())
        } else {
            std::env::current_dir()
        }
    }
}
