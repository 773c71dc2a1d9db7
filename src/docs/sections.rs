//! Markdown heading outline.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

fn heading_regex() -> &'static Regex {
    static HEADING: OnceLock<Regex> = OnceLock::new();
    HEADING.get_or_init(|| Regex::new(r"^(#{2,6})\s+(.+)$").expect("valid heading regex"))
}

fn slug_strip_regex() -> &'static Regex {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    STRIP.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").expect("valid slug strip regex"))
}

fn whitespace_run_regex() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

/// Lower-case, drop everything outside `[a-z0-9\s-]`, trim, then join
/// whitespace runs with a single hyphen.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = slug_strip_regex().replace_all(&lowered, "");
    whitespace_run_regex()
        .replace_all(stripped.trim(), "-")
        .into_owned()
}

/// Headings of level 2 through 6 in document order. Duplicate titles keep
/// duplicate anchors.
pub fn extract_sections(markdown: &str) -> Vec<Heading> {
    markdown
        .lines()
        .filter_map(|line| {
            let caps = heading_regex().captures(line)?;
            let level = caps.get(1)?.as_str().len() as u8;
            let title = caps.get(2)?.as_str().trim();
            if title.is_empty() {
                return None;
            }

            Some(Heading {
                level,
                title: title.to_string(),
                anchor: format!("#{}", slugify(title)),
            })
        })
        .collect()
}

pub fn render_outline(path: &str, headings: &[Heading]) -> String {
    if headings.is_empty() {
        return format!("No sections found in {path}.");
    }

    let lines = headings
        .iter()
        .map(|heading| {
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(2)));
            format!("{indent}- {} ({})", heading.title, heading.anchor)
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("Sections in {path}:\n{lines}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_anchor_from_title() {
        let headings = extract_sections("## Getting Started!");
        assert_eq!(
            headings,
            vec![Heading {
                level: 2,
                title: "Getting Started!".to_string(),
                anchor: "#getting-started".to_string(),
            }]
        );
    }

    #[test]
    fn only_levels_two_through_six_are_headings() {
        let markdown = "\
# Title
## Two
###### Six
####### Seven
##NoSpace
###   Padded title
";
        let headings = extract_sections(markdown);
        let summary: Vec<(u8, &str)> = headings
            .iter()
            .map(|h| (h.level, h.title.as_str()))
            .collect();
        assert_eq!(summary, vec![(2, "Two"), (6, "Six"), (3, "Padded title")]);
    }

    #[test]
    fn slug_collapses_whitespace_and_keeps_hyphens() {
        assert_eq!(slugify("  app.get()   and   app.post() "), "appget-and-apppost");
        assert_eq!(slugify("Built-in Middleware"), "built-in-middleware");
        assert_eq!(slugify("Café Ünïcode"), "caf-ncode");
    }

    #[test]
    fn duplicate_headings_keep_duplicate_anchors() {
        let headings = extract_sections("## Usage\n### Options\n## Usage");
        assert_eq!(headings[0].anchor, headings[2].anchor);
    }

    #[test]
    fn renders_nested_outline() {
        let headings = extract_sections("## Routing\n### Path Parameter\n#### Optional\n## Grouping");
        assert_eq!(
            render_outline("/docs/api/routing", &headings),
            "Sections in /docs/api/routing:\n\
             - Routing (#routing)\n  \
             - Path Parameter (#path-parameter)\n    \
             - Optional (#optional)\n\
             - Grouping (#grouping)"
        );
    }

    #[test]
    fn no_headings_reports_no_sections() {
        let headings = extract_sections("Just a paragraph.\n# Only a title");
        assert!(headings.is_empty());
        assert_eq!(
            render_outline("/docs/index", &headings),
            "No sections found in /docs/index."
        );
    }
}
