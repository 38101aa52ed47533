//! Text helpers shared by the state machine and abbreviation derivation.
//!
//! All positions are byte offsets that sit on `char` boundaries.

pub fn is_sentence_end_punctuation(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Drop a single trailing `.`, `!` or `?` from `word`.
pub fn strip_terminal_punctuation(word: &str) -> &str {
    match word.chars().next_back() {
        Some(c) if is_sentence_end_punctuation(c) => &word[..word.len() - c.len_utf8()],
        _ => word,
    }
}

/// Remove every `.`, `!` and `?`.
pub fn remove_punctuation(text: &str) -> String {
    text.chars()
        .filter(|&c| !is_sentence_end_punctuation(c))
        .collect()
}

pub fn ends_with_sentence_end_punctuation(text: &str) -> bool {
    text.trim_end()
        .chars()
        .next_back()
        .is_some_and(is_sentence_end_punctuation)
}

/// Whether `text` has anything besides whitespace and punctuation.
pub fn has_content(text: &str) -> bool {
    text.chars()
        .any(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
}

pub fn prev_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

pub fn next_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(pos, |c| pos + c.len_utf8())
}

/// Start of the line containing `pos`.
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |i| i + 1)
}

/// End of the line containing `pos` (the offset of its `\n`, or the end).
pub fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |i| pos + i)
}

/// Where a word-delete from `pos` stops: skip the whitespace run directly
/// left of `pos`, then the word before it.
pub fn word_start_before(text: &str, pos: usize) -> usize {
    let head = &text[..pos];
    let trimmed = head.trim_end_matches(char::is_whitespace);
    trimmed
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map_or(0, |(i, c)| i + c.len_utf8())
}

/// Drop trailing newlines, then surrounding whitespace.
pub fn finalize_text(text: &str) -> String {
    text.trim_end_matches(['\n', '\r']).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_punctuation() {
        assert_eq!(strip_terminal_punctuation("hi."), "hi");
        assert_eq!(strip_terminal_punctuation("hi?!"), "hi?");
        assert_eq!(strip_terminal_punctuation("hi,"), "hi,");
        assert_eq!(strip_terminal_punctuation(""), "");
        assert_eq!(remove_punctuation("a.b!c?"), "abc");
        assert!(ends_with_sentence_end_punctuation("done. "));
        assert!(!ends_with_sentence_end_punctuation("done"));
    }

    #[test]
    fn content_detection() {
        assert!(has_content("hi, w1."));
        assert!(!has_content(" .,!? \n"));
        assert!(!has_content(""));
    }

    #[test]
    fn line_bounds() {
        let text = "hi,\nwa";
        assert_eq!(line_start(text, 6), 4);
        assert_eq!(line_end(text, 4), 6);
        assert_eq!(line_start(text, 2), 0);
        assert_eq!(line_end(text, 1), 3);
    }

    #[test]
    fn word_delete_bounds() {
        assert_eq!(word_start_before("hello world", 11), 6);
        assert_eq!(word_start_before("hello world  ", 13), 6);
        assert_eq!(word_start_before("hello", 5), 0);
        assert_eq!(word_start_before("", 0), 0);
        assert_eq!(word_start_before("a b", 1), 0);
    }

    #[test]
    fn boundaries_respect_multibyte() {
        let text = "aé";
        assert_eq!(prev_boundary(text, text.len()), 1);
        assert_eq!(next_boundary(text, 1), 3);
        assert_eq!(next_boundary(text, 3), 3);
        assert_eq!(prev_boundary(text, 0), 0);
    }

    #[test]
    fn finalize_strips_trailing_newlines() {
        assert_eq!(finalize_text("hi,\nw\n\n"), "hi,\nw");
        assert_eq!(finalize_text("  hi  "), "hi");
    }
}
