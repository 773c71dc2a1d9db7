//! Line-oriented substring search over the docs index (`llms.txt`).

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

pub const DEFAULT_SEARCH_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub path: String,
    pub url: String,
}

fn path_token_regex() -> &'static Regex {
    static PATH_TOKEN: OnceLock<Regex> = OnceLock::new();
    PATH_TOKEN.get_or_init(|| Regex::new(r"\((/docs[^)\s]*)\)").expect("valid path token regex"))
}

fn link_label_regex() -> &'static Regex {
    static LINK_LABEL: OnceLock<Regex> = OnceLock::new();
    LINK_LABEL.get_or_init(|| Regex::new(r"\[([^\]]+)\]").expect("valid link label regex"))
}

/// Scan `index_text` line by line and collect up to `limit` hits.
///
/// Matching is a case-insensitive substring test. Matching lines without a
/// `(/docs...)` path token are skipped and do not count toward `limit`.
pub fn search(index_text: &str, query: &str, limit: usize, base_url: &str) -> Vec<SearchResult> {
    let needle = query.to_lowercase();
    if limit == 0 {
        return Vec::new();
    }

    let mut results = Vec::new();
    for line in index_text.lines() {
        if !line.to_lowercase().contains(&needle) {
            continue;
        }

        let Some(token) = path_token_regex().captures(line).and_then(|caps| caps.get(1)) else {
            continue;
        };

        let path = token.as_str().to_string();
        results.push(SearchResult {
            title: line_title(line, token.start().saturating_sub(1), &path),
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            path,
        });

        if results.len() >= limit {
            break;
        }
    }

    results
}

fn line_title(line: &str, token_start: usize, path: &str) -> String {
    if let Some(label) = link_label_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|label| label.as_str().trim())
        .filter(|label| !label.is_empty())
    {
        return label.to_string();
    }

    let prefix = line[..token_start]
        .trim()
        .trim_start_matches(['-', '*', '+'])
        .trim()
        .trim_end_matches(':')
        .trim();
    if prefix.is_empty() {
        path.to_string()
    } else {
        prefix.to_string()
    }
}

pub fn render_results(query: &str, results: &[SearchResult]) -> String {
    if results.is_empty() {
        return format!("No results found for \"{query}\".");
    }

    let blocks = results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. {}\n   Path: {}\n   URL: {}",
                index + 1,
                result.title,
                result.path,
                result.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Found {} result(s) for \"{query}\":\n{blocks}",
        results.len()
    )
}
