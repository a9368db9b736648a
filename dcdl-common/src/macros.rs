/// Builds a `reqwest::Client` with the given user agent and a `Referer` default header.
///
/// The image and video hosts answer 403 to requests that don't come from the gallery itself,
/// so every client, extractor or downloader, carries the referer.
///
/// Evaluates to `Result<Client, reqwest::Error>`.
#[macro_export]
macro_rules! client {
    ($ua:expr, $referer:expr) => {{
        let mut headers = $crate::reqwest::header::HeaderMap::new();
        if let Ok(referer) = $crate::reqwest::header::HeaderValue::from_str($referer) {
            headers.insert($crate::reqwest::header::REFERER, referer);
        }
        $crate::reqwest::Client::builder()
            .user_agent($ua)
            .default_headers(headers)
            .build()
    }};
}
