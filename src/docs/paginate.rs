//! Character-indexed paging of fetched documents.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub slice: String,
    pub offset: usize,
    pub next_offset: Option<usize>,
    pub total_chars: usize,
}

/// Characters `[offset, offset + max_chars)` of `full_text`.
pub fn paginate(full_text: &str, offset: usize, max_chars: usize) -> Page {
    let total_chars = full_text.chars().count();
    let slice: String = full_text.chars().skip(offset).take(max_chars).collect();
    let end = offset.saturating_add(max_chars);

    Page {
        slice,
        offset,
        next_offset: (end < total_chars).then_some(end),
        total_chars,
    }
}

impl Page {
    pub fn continuation_notice(&self) -> Option<String> {
        self.next_offset.map(|next| {
            format!(
                "\n\n[Truncated: nextOffset={next} totalLength={}. Call get-hono-page with offset={next} to continue.]",
                self.total_chars
            )
        })
    }

    pub fn render(&self) -> String {
        match self.continuation_notice() {
            Some(notice) => format!("{}{notice}", self.slice),
            None => self.slice.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_reassemble_multibyte_text() {
        let text = "Hono 炎 🔥 · ultrafast web framework. ".repeat(7);
        let total = text.chars().count();
        let max_chars = 9;

        let mut rebuilt = String::new();
        let mut offset = 0;
        loop {
            let page = paginate(&text, offset, max_chars);
            rebuilt.push_str(&page.slice);
            match page.next_offset {
                Some(next) => {
                    assert!(next < total);
                    offset = next;
                }
                None => {
                    assert!(offset + max_chars >= total);
                    break;
                }
            }
        }

        assert_eq!(rebuilt, text);
    }

    #[test]
    fn render_appends_notice_only_when_more_remains() {
        let page = paginate("abcdefghij", 0, 4);
        assert_eq!(page.next_offset, Some(4));
        assert_eq!(
            page.render(),
            "abcd\n\n[Truncated: nextOffset=4 totalLength=10. Call get-hono-page with offset=4 to continue.]"
        );

        let last = paginate("abcdefghij", 8, 4);
        assert_eq!(last.slice, "ij");
        assert_eq!(last.next_offset, None);
        assert_eq!(last.render(), "ij");
    }

    #[test]
    fn exact_fit_is_terminal() {
        let page = paginate("abcd", 0, 4);
        assert_eq!(page.next_offset, None);
    }

    #[test]
    fn offset_past_end_is_empty() {
        let page = paginate("abc", 10, 4);
        assert!(page.slice.is_empty());
        assert_eq!(page.next_offset, None);
        assert_eq!(page.total_chars, 3);
    }
}
