//! Argument normalization and documentation URL helpers shared by the tools

use crate::{docs::search::DEFAULT_SEARCH_LIMIT, errors::AppError};

pub const MAX_SEARCH_LIMIT: usize = 50;
pub const DEFAULT_MAX_CHARS: usize = 40_000;
pub const MIN_MAX_CHARS: usize = 1_000;
pub const MAX_MAX_CHARS: usize = 120_000;
pub const INDEX_PATH: &str = "/llms.txt";
pub const DEFAULT_DOC_PATH: &str = "/docs/index";

/// Where the docs index and the raw markdown pages live.
#[derive(Debug, Clone)]
pub struct DocsSite {
    pub base_url: String,
    pub content_base_url: String,
}

impl DocsSite {
    pub fn new(base_url: impl Into<String>, content_base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            content_base_url: content_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn index_url(&self) -> String {
        format!("{}{INDEX_PATH}", self.base_url)
    }

    /// `path` must already be normalized with [`normalize_doc_path`].
    pub fn page_url(&self, path: &str) -> String {
        format!("{}{path}.md", self.content_base_url)
    }
}

pub fn normalize_search_limit(limit: Option<u32>) -> Result<usize, AppError> {
    let limit = limit.map_or(DEFAULT_SEARCH_LIMIT, |value| value as usize);
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
        return Err(AppError::bad_request(
            "invalid_limit",
            "limit must be between 1 and 50",
        ));
    }

    Ok(limit)
}

pub fn normalize_max_chars(max_chars: Option<u32>) -> Result<usize, AppError> {
    let max_chars = max_chars.map_or(DEFAULT_MAX_CHARS, |value| value as usize);
    if !(MIN_MAX_CHARS..=MAX_MAX_CHARS).contains(&max_chars) {
        return Err(AppError::bad_request(
            "invalid_max_chars",
            "maxChars must be between 1000 and 120000",
        ));
    }

    Ok(max_chars)
}

/// Leading `/` is added when missing; fragments, query strings, trailing
/// slashes and a `.md` suffix are dropped.
pub fn normalize_doc_path(path: &str) -> Result<String, AppError> {
    let trimmed = path.trim();
    let without_fragment = trimmed
        .split(['#', '?'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');

    if without_fragment.contains("://")
        || without_fragment.chars().any(char::is_whitespace)
        || without_fragment.split('/').any(|segment| segment == "..")
    {
        return Err(AppError::bad_request(
            "invalid_path",
            "path must be a documentation path such as /docs/api/routing",
        ));
    }

    let without_extension = without_fragment
        .strip_suffix(".md")
        .unwrap_or(without_fragment);
    if without_extension.is_empty() {
        return Ok(DEFAULT_DOC_PATH.to_string());
    }

    if without_extension.starts_with('/') {
        Ok(without_extension.to_string())
    } else {
        Ok(format!("/{without_extension}"))
    }
}

/// Integral values print without a fractional part, everything else in
/// shortest round-trip form.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_path_gets_leading_slash() {
        assert_eq!(
            normalize_doc_path("docs/api/routing").expect("valid path"),
            "/docs/api/routing"
        );
    }

    #[test]
    fn doc_path_drops_fragment_suffix_and_trailing_slash() {
        assert_eq!(
            normalize_doc_path(" /docs/api/routing.md#routing-priority ").expect("valid path"),
            "/docs/api/routing"
        );
        assert_eq!(
            normalize_doc_path("/docs/guides/").expect("valid path"),
            "/docs/guides"
        );
        assert_eq!(normalize_doc_path("").expect("valid path"), DEFAULT_DOC_PATH);
    }

    #[test]
    fn doc_path_rejects_urls_and_traversal() {
        for path in ["https://evil.example/x", "/docs/../../secrets", "/docs/a b"] {
            let error = normalize_doc_path(path).expect_err("expected invalid path");
            assert!(error.to_string().contains("bad request"));
        }
    }

    #[test]
    fn max_chars_bounds() {
        assert_eq!(normalize_max_chars(None).expect("default"), DEFAULT_MAX_CHARS);
        assert_eq!(normalize_max_chars(Some(1_000)).expect("min"), 1_000);
        assert_eq!(normalize_max_chars(Some(120_000)).expect("max"), 120_000);
        assert!(normalize_max_chars(Some(999)).is_err());
        assert!(normalize_max_chars(Some(120_001)).is_err());
    }

    #[test]
    fn search_limit_bounds() {
        assert_eq!(normalize_search_limit(None).expect("default"), 5);
        assert!(normalize_search_limit(Some(0)).is_err());
        assert!(normalize_search_limit(Some(51)).is_err());
    }

    #[test]
    fn site_urls() {
        let site = DocsSite::new("https://hono.dev/", "https://raw.example.com/site/main");
        assert_eq!(site.index_url(), "https://hono.dev/llms.txt");
        assert_eq!(
            site.page_url("/docs/api/routing"),
            "https://raw.example.com/site/main/docs/api/routing.md"
        );
    }

    #[test]
    fn formats_numbers_like_json() {
        assert_eq!(format_number(8.0), "8");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
    }
}
