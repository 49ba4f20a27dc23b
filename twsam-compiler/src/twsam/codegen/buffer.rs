//! Print buffer accounting.
//!
//! The SAM runtime prints through a fixed-size buffer. Text pushed since the last flush
//! counts against it; a flush (`!`) or a menu read empties it.

/// Translate characters the SAM string syntax cannot carry.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '"' => '\'',
            '[' => '{',
            ']' => '}',
            other => other,
        })
        .collect()
}

/// Result of fitting text into the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted<'s> {
    pub text: &'s str,
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    cap: usize,
    used: usize,
    pending: bool,
}

impl TextBuffer {
    pub fn new(cap: usize) -> Self {
        TextBuffer {
            cap,
            used: 0,
            pending: false,
        }
    }

    /// Bytes still available before the buffer is full
    pub fn remaining(&self) -> usize {
        self.cap.saturating_sub(self.used)
    }

    pub fn used(&self) -> usize {
        self.used
    }

    /// Account for `text`, cutting it to the remaining capacity when it does not fit.
    /// The cut never splits a character.
    pub fn fit<'s>(&mut self, text: &'s str) -> Fitted<'s> {
        let remaining = self.remaining();
        if text.len() <= remaining {
            self.used += text.len();
            return Fitted {
                text,
                truncated: false,
            };
        }

        let mut end = remaining;
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        self.used += end;
        Fitted {
            text: &text[..end],
            truncated: true,
        }
    }

    /// Account for `width` bytes that cannot be cut. Nothing is counted, and `false` is
    /// returned, when they do not fit.
    pub fn reserve(&mut self, width: usize) -> bool {
        if width > self.remaining() {
            return false;
        }
        self.used += width;
        true
    }

    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear pending text. Returns whether a flush has to be emitted.
    pub fn flush(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;
        self.used = 0;
        true
    }

    /// Empty the counter without touching the pending flag (the menu read does this).
    pub fn reset(&mut self) {
        self.used = 0;
    }
}
