//! Extractors for `https://gall.dcinside.com/`
//!
//! The gallery has no API, so both extractors cut what they need out of the HTML with literal
//! delimiters (see [`dcdl_common::text`]).

pub mod board;
pub mod post;
