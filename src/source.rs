//! Source buffer handed over by the host editor for one completion request.

use crate::error::{AssistError, AssistResult};
use crate::parsing::normalize::normalize;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static CLASS_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:class|struct|interface|record)\s+[A-Za-z_]\w*")
        .expect("valid class declaration regex")
});

static PAGE_DIRECTIVE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<%@\s*(?:Page|Control|Master)\b").expect("valid page directive regex")
});

/// What kind of file the buffer holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Plain C# code file
    Code,
    /// Markup page (`.aspx`, `.ascx`, `.master`) with an `Inherits=` directive
    Markup,
}

impl SourceKind {
    /// Guess the kind from a file extension, falling back to content sniffing.
    pub fn detect(path: Option<&Path>, text: &str) -> Self {
        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match by_extension.as_deref() {
            Some("aspx" | "ascx" | "master") => SourceKind::Markup,
            Some("cs") => SourceKind::Code,
            _ if PAGE_DIRECTIVE.is_match(text) => SourceKind::Markup,
            _ => SourceKind::Code,
        }
    }
}

/// Immutable text plus a cursor offset.
///
/// Offsets are byte offsets into `text`. The cursor is always clamped to a
/// char boundary so the derived views never split a character.
#[derive(Debug, Clone)]
pub struct SourceBuffer {
    text: String,
    cursor: usize,
    kind: SourceKind,
}

impl SourceBuffer {
    /// Create a buffer for a code file. Out-of-range cursors are clamped.
    pub fn new(text: impl Into<String>, cursor: usize) -> Self {
        let text = text.into();
        let cursor = clamp_to_boundary(&text, cursor);
        Self {
            text,
            cursor,
            kind: SourceKind::Code,
        }
    }

    /// Create a buffer, rejecting cursors past the end of the text.
    pub fn checked(text: impl Into<String>, cursor: usize) -> AssistResult<Self> {
        let text = text.into();
        if cursor > text.len() {
            return Err(AssistError::CursorOutOfRange {
                offset: cursor,
                len: text.len(),
            });
        }
        Ok(Self::new(text, cursor))
    }

    /// Read a buffer from disk, detecting its kind from the extension.
    pub fn from_file(path: &Path, cursor: usize) -> AssistResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| AssistError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        let kind = SourceKind::detect(Some(path), &text);
        Ok(Self::checked(text, cursor)?.with_kind(kind))
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Everything before the cursor
    pub fn text_before_cursor(&self) -> &str {
        &self.text[..self.cursor]
    }

    /// Offset of the first character of the cursor's line
    pub fn line_start(&self) -> usize {
        self.text[..self.cursor]
            .rfind('\n')
            .map(|i| i + 1)
            .unwrap_or(0)
    }

    /// The full line containing the cursor, without its line terminator
    pub fn line(&self) -> &str {
        let start = self.line_start();
        let end = self.text[self.cursor..]
            .find('\n')
            .map(|i| self.cursor + i)
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches('\r')
    }

    /// The cursor's line up to the cursor
    pub fn line_before_cursor(&self) -> &str {
        &self.text[self.line_start()..self.cursor]
    }

    /// True when no type declaration appears before the cursor. Comments
    /// and string contents do not count.
    pub fn is_before_class_declaration(&self) -> bool {
        !CLASS_DECLARATION.is_match(&normalize(self.text_before_cursor()))
    }
}

fn clamp_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
