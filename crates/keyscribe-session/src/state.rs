use keyscribe_core::keymap::VirtualKey;
use keyscribe_core::text::{
    line_end, line_start, next_boundary, prev_boundary, word_start_before,
};

/// Reconstructed text for one key source.
///
/// `cursor` is a byte offset on a char boundary with
/// `0 <= cursor <= text.len()` after every operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconState {
    pub(crate) text: String,
    pub(crate) cursor: usize,
    pub(crate) shift_active: bool,
    pub(crate) key_history: Vec<VirtualKey>,
    pub(crate) last_key_time: Option<u64>,
    pub(crate) human_keypress_count: u32,
    /// Keys typed by `append_string` rather than the user.
    pub(crate) injected_keys: Vec<VirtualKey>,
}

impl ReconState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn shift_active(&self) -> bool {
        self.shift_active
    }

    pub fn key_history(&self) -> &[VirtualKey] {
        &self.key_history
    }

    pub fn last_key_time(&self) -> Option<u64> {
        self.last_key_time
    }

    pub fn human_keypress_count(&self) -> u32 {
        self.human_keypress_count
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    pub(crate) fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Backspace: remove the char left of the cursor.
    pub(crate) fn delete_before(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = prev_boundary(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Forward delete: remove the char right of the cursor.
    pub(crate) fn delete_after(&mut self) {
        let end = next_boundary(&self.text, self.cursor);
        self.text.replace_range(self.cursor..end, "");
    }

    /// Remove the whitespace run left of the cursor and the word before it.
    pub(crate) fn delete_word_before(&mut self) {
        let start = word_start_before(&self.text, self.cursor);
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Remove up to `count` chars left of the cursor; returns how many
    /// were actually removed.
    pub(crate) fn delete_chars_before(&mut self, count: usize) -> usize {
        let mut removed = 0;
        while removed < count && self.cursor > 0 {
            self.delete_before();
            removed += 1;
        }
        removed
    }

    pub(crate) fn move_left(&mut self) {
        self.cursor = prev_boundary(&self.text, self.cursor);
    }

    pub(crate) fn move_right(&mut self) {
        self.cursor = next_boundary(&self.text, self.cursor);
    }

    pub(crate) fn move_home(&mut self) {
        self.cursor = line_start(&self.text, self.cursor);
    }

    pub(crate) fn move_end(&mut self) {
        self.cursor = line_end(&self.text, self.cursor);
    }
}
