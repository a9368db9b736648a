//! Turns extractor messages into files on disk.
//!
//! [`dispatch::Dispatcher`] routes an input URL, runs the extractors and resolves every post a
//! board walk queues. Its messages feed [`async_queue::Queue`], which downloads the media items
//! into `<output>/dcinside/<board>/<date> <title>/<num>.<ext>`.
use dcdl_common::{post::PostMetadata, CATEGORY};
use std::path::{Path, PathBuf};

pub mod async_queue;
pub mod dispatch;
pub mod error;
pub mod progress;

/// Replaces characters that can't appear in a single path component.
pub fn sanitize_path_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            ':' | '*' | '?' | '"' | '<' | '>' | '|' if cfg!(windows) => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let trimmed = cleaned.trim().trim_end_matches('.');
    match trimmed {
        "" | "." | ".." => String::from("_"),
        name => name.to_string(),
    }
}

/// Directory holding every file of a post.
///
/// Posts without title and date are stored under their post number.
#[inline]
pub fn generate_output_path(main_path: &Path, metadata: &PostMetadata) -> PathBuf {
    let dir_name = metadata.directory_name();
    let post_dir = if dir_name.trim().is_empty() {
        metadata.post.num.to_string()
    } else {
        sanitize_path_component(&dir_name)
    };

    main_path
        .join(CATEGORY)
        .join(sanitize_path_component(&metadata.board.id))
        .join(post_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcdl_common::{
        chrono::NaiveDateTime,
        post::{BoardInfo, PostInfo, POST_DATE_FORMAT},
    };

    fn metadata(title: &str, date: Option<&str>) -> PostMetadata {
        PostMetadata {
            post: PostInfo {
                title: title.to_string(),
                description: String::new(),
                num: 42,
                date: date.and_then(|d| NaiveDateTime::parse_from_str(d, POST_DATE_FORMAT).ok()),
            },
            board: BoardInfo {
                id: String::from("BOARDID"),
            },
        }
    }

    #[test]
    fn output_path_layout() {
        let path = generate_output_path(
            Path::new("/out"),
            &metadata("A/B test", Some("2023-04-05 06:07:08")),
        );
        assert_eq!(
            path,
            Path::new("/out/dcinside/BOARDID/2023-04-05 A_B test")
        );
    }

    #[test]
    fn untitled_posts_use_their_number() {
        let path = generate_output_path(Path::new("out"), &metadata("", None));
        assert_eq!(path, Path::new("out/dcinside/BOARDID/42"));

        let titled = generate_output_path(Path::new("out"), &metadata("only title", None));
        assert_eq!(titled, Path::new("out/dcinside/BOARDID/only title"));
    }

    #[test]
    fn hostile_components() {
        assert_eq!(sanitize_path_component(".."), "_");
        assert_eq!(sanitize_path_component("  spaced.  "), "spaced");
        assert_eq!(sanitize_path_component("tab\there"), "tab_here");
    }
}
