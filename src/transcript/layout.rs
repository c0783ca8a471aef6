//! Line layout of a transcript
//!
//! Every message occupies a header line, its wrapped text, and one blank
//! separator. Scroll geometry of the transcript is measured in these lines.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Lines a message occupies besides its text
pub const CHROME_LINES: usize = 2;

/// Vertical placement of one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSpan {
    /// First line (the header)
    pub top: usize,
    /// Header + text + separator
    pub height: usize,
}

impl MessageSpan {
    pub fn bottom(&self) -> usize {
        self.top + self.height
    }

    /// Line at the vertical middle of the message
    pub fn center(&self) -> f64 {
        self.top as f64 + self.height as f64 / 2.0
    }
}

/// Wrap text to fit within a given display width
///
/// Breaks on whitespace; words wider than the line are split by character.
/// Explicit newlines are kept. Always returns at least one line.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    if max_width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_width = 0;

        for word in paragraph.split_inclusive(|c: char| c.is_whitespace()) {
            let word_width = UnicodeWidthStr::width(word.trim_end());

            if current_width + word_width > max_width && !current_line.is_empty() {
                lines.push(current_line.trim_end().to_string());
                current_line.clear();
                current_width = 0;
            }

            if word_width > max_width {
                for ch in word.trim_end().chars() {
                    let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
                    if current_width + ch_width > max_width && !current_line.is_empty() {
                        lines.push(std::mem::take(&mut current_line));
                        current_width = 0;
                    }
                    current_line.push(ch);
                    current_width += ch_width;
                }
                current_line.push(' ');
                current_width += 1;
                continue;
            }

            let piece = if current_line.is_empty() {
                word.trim_start()
            } else {
                word
            };
            current_line.push_str(piece);
            current_width += UnicodeWidthStr::width(piece);
        }

        lines.push(current_line.trim_end().to_string());
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Spans for messages with the given wrapped line counts
pub fn stack(text_line_counts: impl IntoIterator<Item = usize>) -> Vec<MessageSpan> {
    let mut top = 0;
    text_line_counts
        .into_iter()
        .map(|count| {
            let span = MessageSpan {
                top,
                height: count.max(1) + CHROME_LINES,
            };
            top = span.bottom();
            span
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_on_word_boundary() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let lines = wrap_text("abcdefghijkl", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("one\ntwo", 20), vec!["one", "two"]);
        assert_eq!(wrap_text("", 20), vec![""]);
    }

    #[test]
    fn test_wrap_wide_characters() {
        let lines = wrap_text("日本語日本語", 6);
        assert_eq!(lines, vec!["日本語", "日本語"]);
        for line in lines {
            assert!(UnicodeWidthStr::width(line.as_str()) <= 6);
        }
    }

    #[test]
    fn test_stack_accumulates() {
        let spans = stack([1, 3, 0]);
        assert_eq!(spans[0], MessageSpan { top: 0, height: 3 });
        assert_eq!(spans[1], MessageSpan { top: 3, height: 5 });
        assert_eq!(spans[2], MessageSpan { top: 8, height: 3 });
        assert_eq!(spans[1].center(), 5.5);
    }
}
