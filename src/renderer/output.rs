//! Output buffering and HTML escaping.
//!
//! Markup is accumulated in an [`OutputBuffer`] and only handed to the caller
//! once serialization has finished, so a failing render never leaks partial
//! output.

use std::fmt;
use std::io::{self, Write};

// =============================================================================
// OutputBuffer
// =============================================================================

/// A buffer that accumulates markup for one serialization.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: String,
}

impl OutputBuffer {
    /// Create a new output buffer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    /// Create a buffer with specific capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: String::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Clear the buffer without deallocating.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Write a string verbatim.
    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.push_str(s);
    }

    /// Write a single character verbatim.
    #[inline]
    pub fn write_char(&mut self, c: char) {
        self.data.push(c);
    }

    /// Write text with HTML special characters replaced by entities.
    pub fn write_escaped(&mut self, s: &str) {
        let mut start = 0;
        for (i, c) in s.char_indices() {
            let Some(entity) = entity_for(c) else {
                continue;
            };
            self.data.push_str(&s[start..i]);
            self.data.push_str(entity);
            start = i + c.len_utf8();
        }
        self.data.push_str(&s[start..]);
    }

    /// Write the accumulated markup to `writer` and clear the buffer.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(self.data.as_bytes())?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }

    /// The accumulated markup.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Take the accumulated markup.
    pub fn into_string(self) -> String {
        self.data
    }
}

impl fmt::Write for OutputBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.data.push_str(s);
        Ok(())
    }
}

// =============================================================================
// Escaping
// =============================================================================

#[inline]
fn entity_for(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    }
}

/// Escape `s` for use as HTML text or a quoted attribute value.
///
/// Existing entities are escaped again: `&gt;` becomes `&amp;gt;`.
pub fn escape(s: &str) -> String {
    let mut out = OutputBuffer::with_capacity(s.len());
    out.write_escaped(s);
    out.into_string()
}
