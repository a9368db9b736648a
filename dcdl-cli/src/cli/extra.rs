use std::path::Path;

use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::error::CliError;
use dcdl_extractors::{
    extractor::{ExtractorInfo, HttpFetcher},
    gallery::{board::BoardExtractor, post::PostExtractor},
    router::{route, ExtractorMatch},
};

/// Value parser for input URLs: anything the router doesn't know is rejected before the run
/// starts.
pub fn validate_url(input: &str) -> Result<ExtractorMatch, String> {
    route(input).ok_or_else(|| {
        format!(
            "Unsupported URL: {input}. Expected a board ({}) or a post ({})",
            BoardExtractor::<HttpFetcher>::EXAMPLE,
            PostExtractor::<HttpFetcher>::EXAMPLE
        )
    })
}

/// Asks before writing into an existing file or a non-empty directory.
///
/// Returns `true` when the download may go on.
pub fn confirm_output_dir(dirname: &Path, overwrite: bool) -> Result<bool, CliError> {
    let occupied = dirname.exists() && (dirname.is_file() || dirname.read_dir()?.next().is_some());
    if !occupied || overwrite {
        return Ok(true);
    }

    let confirmed = Confirm::new()
        .with_prompt(format!(
            "The path {} is not empty or already exists. Do you want to continue?",
            dirname.display().bold().blue().italic()
        ))
        .wait_for_newline(true)
        .interact()?;

    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_and_post_urls() {
        assert!(matches!(
            validate_url("gall.dcinside.com/mgallery/board/lists/?id=test&page=3"),
            Ok(ExtractorMatch::Board(board)) if board.start_page == 3
        ));
        assert!(matches!(
            validate_url("https://gall.dcinside.com/board/view/?id=test&no=5"),
            Ok(ExtractorMatch::Post(post)) if post.num == 5
        ));

        let err = validate_url("https://example.com/").unwrap_err();
        assert!(err.contains("board/lists/?id=BOARDID"));
    }

    #[test]
    fn missing_output_needs_no_prompt() {
        let dir = std::env::temp_dir().join("dcdl-confirm-missing-dir");
        assert!(confirm_output_dir(&dir, false).unwrap());
    }
}
