//! Delimiter-based text extraction.
//!
//! The gallery pages are scraped by cutting substrings between two literal markers instead of
//! building a DOM. Everything here works on `&str` slices and never allocates unless the caller
//! asks for owned values.

use chrono::NaiveDateTime;

/// Returns the text between the first `begin` and the next `end` that follows it.
///
/// `None` when either marker is missing.
pub fn extract<'a>(text: &'a str, begin: &str, end: &str) -> Option<&'a str> {
    extract_at(text, begin, end, 0).map(|(value, _)| value)
}

/// Same as [`extract`], but starts searching at byte offset `pos` and also returns the offset
/// right after the closing marker.
pub fn extract_at<'a>(text: &'a str, begin: &str, end: &str, pos: usize) -> Option<(&'a str, usize)> {
    let haystack = text.get(pos..)?;
    let start = pos + haystack.find(begin)? + begin.len();
    let len = text[start..].find(end)?;
    Some((&text[start..start + len], start + len + end.len()))
}

/// Lazy iterator over every substring enclosed by `begin` and `end`, in document order.
pub fn extract_iter<'a, 'b>(text: &'a str, begin: &'b str, end: &'b str) -> ExtractIter<'a, 'b> {
    ExtractIter {
        text,
        begin,
        end,
        pos: 0,
    }
}

/// See [`extract_iter`].
#[derive(Debug, Clone)]
pub struct ExtractIter<'a, 'b> {
    text: &'a str,
    begin: &'b str,
    end: &'b str,
    pos: usize,
}

impl<'a> Iterator for ExtractIter<'a, '_> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let (value, next) = extract_at(self.text, self.begin, self.end, self.pos)?;
        self.pos = next;
        Some(value)
    }
}

/// Sequential extractor over one document.
///
/// Each call continues after the previous successful match. A miss returns an empty string and
/// leaves the position untouched, so later fields can still be found.
#[derive(Debug, Clone)]
pub struct TextCursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextCursor<'a> {
    pub const fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    pub fn extract(&mut self, begin: &str, end: &str) -> &'a str {
        match extract_at(self.text, begin, end, self.pos) {
            Some((value, next)) => {
                self.pos = next;
                value
            }
            None => "",
        }
    }

    pub const fn position(&self) -> usize {
        self.pos
    }
}

/// Parses a decimal integer, falling back to `default` on empty or malformed input.
pub fn parse_int(value: &str, default: u64) -> u64 {
    value.trim().parse().unwrap_or(default)
}

/// Parses `value` with a `strftime`-style format. `None` when it doesn't match.
pub fn parse_datetime(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<a href="/a">one</a><a href="/b">two</a><a href="/c">"#;

    #[test]
    fn extract_first() {
        assert_eq!(extract(PAGE, "href=\"", "\""), Some("/a"));
        assert_eq!(extract(PAGE, "nope", "\""), None);
        // unterminated
        assert_eq!(extract("x=\"abc", "x=\"", "\""), None);
    }

    #[test]
    fn iter_all_in_order() {
        let links: Vec<&str> = extract_iter(PAGE, "href=\"", "\"").collect();
        assert_eq!(links, ["/a", "/b", "/c"]);

        let names: Vec<&str> = extract_iter(PAGE, "\">", "</a>").collect();
        assert_eq!(names, ["one", "two"]);
    }

    #[test]
    fn cursor_skips_misses() {
        let mut cur = TextCursor::new(r#"title="A" desc="B" date="C""#);
        assert_eq!(cur.extract("title=\"", "\""), "A");
        assert_eq!(cur.extract("missing=\"", "\""), "");
        assert_eq!(cur.extract("date=\"", "\""), "C");
        // already consumed
        assert_eq!(cur.extract("desc=\"", "\""), "");
    }

    #[test]
    fn cursor_handles_multibyte_text() {
        let mut cur = TextCursor::new("<b>갤러리</b><i>글</i>");
        assert_eq!(cur.extract("<b>", "</b>"), "갤러리");
        assert_eq!(cur.extract("<i>", "</i>"), "글");
    }

    #[test]
    fn int_and_date_parsing() {
        assert_eq!(parse_int(" 42 ", 1), 42);
        assert_eq!(parse_int("", 1), 1);
        assert_eq!(parse_int("4,2", 1), 1);

        let date = parse_datetime("2023-04-05 06:07:08", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(date.to_string(), "2023-04-05 06:07:08");
        assert!(parse_datetime("", "%Y-%m-%d %H:%M:%S").is_none());
    }
}
