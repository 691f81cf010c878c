//! Offset-preserving text normalization.
//!
//! The declaration scanners work on regexes over raw editor text. Comments,
//! string contents and nested bracket contents would confuse them, so they are
//! blanked out first. Blanking replaces every removed byte with a space (line
//! breaks are kept), which means the normalized text has exactly the same
//! length as the input and every surviving character sits at its original
//! offset. Declaration offsets and member zones computed on the normalized
//! text can therefore be compared directly against the editor cursor.

/// Bracket pairs that [`blank_enclosed`] understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enclosure {
    Paren,
    Brace,
    Angle,
    Square,
}

impl Enclosure {
    fn delimiters(self) -> (u8, u8) {
        match self {
            Enclosure::Paren => (b'(', b')'),
            Enclosure::Brace => (b'{', b'}'),
            Enclosure::Angle => (b'<', b'>'),
            Enclosure::Square => (b'[', b']'),
        }
    }
}

/// Blank comments and the contents of string and char literals.
///
/// Literal delimiters survive so `var s = "..."` still reads as a string
/// literal after normalization.
pub fn normalize(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let len = bytes.len();
    let mut i = 0;

    while i < len {
        match bytes[i] {
            b'/' if i + 1 < len && bytes[i + 1] == b'/' => {
                let end = bytes[i..]
                    .iter()
                    .position(|&b| b == b'\n')
                    .map(|p| i + p)
                    .unwrap_or(len);
                blank(&mut out, i, end);
                i = end;
            }
            b'/' if i + 1 < len && bytes[i + 1] == b'*' => {
                let end = find_subslice(bytes, i + 2, b"*/")
                    .map(|p| p + 2)
                    .unwrap_or(len);
                blank(&mut out, i, end);
                i = end;
            }
            b'"' => {
                let end = if is_verbatim_prefix(bytes, i) {
                    verbatim_string_end(bytes, i + 1)
                } else {
                    quoted_end(bytes, i + 1, b'"')
                };
                // keep both quotes, blank the body
                blank(&mut out, i + 1, end);
                i = if end < len && bytes[end] == b'"' { end + 1 } else { end };
            }
            b'\'' => {
                let end = quoted_end(bytes, i + 1, b'\'');
                blank(&mut out, i + 1, end);
                i = if end < len && bytes[end] == b'\'' { end + 1 } else { end };
            }
            _ => i += 1,
        }
    }

    into_string(out)
}

/// Blank everything inside matched `open`/`close` pairs.
///
/// The outermost delimiters are kept. Openers that are never closed, such as
/// a call the user is still typing, leave the text after them untouched.
pub fn blank_enclosed(text: &str, enclosure: Enclosure) -> String {
    let (open, close) = enclosure.delimiters();
    let bytes = text.as_bytes();
    let mut out = bytes.to_vec();
    let mut openers = Vec::new();

    for (i, &b) in bytes.iter().enumerate() {
        if b == open {
            openers.push(i);
        } else if b == close {
            if let Some(start) = openers.pop() {
                blank(&mut out, start + 1, i);
            }
        }
    }

    into_string(out)
}

/// Offset of the delimiter closing the one at `open_at`, if balanced.
pub fn matching_close(text: &str, open_at: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let open = *bytes.get(open_at)?;
    let close = match open {
        b'(' => b')',
        b'{' => b'}',
        b'[' => b']',
        b'<' => b'>',
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_at) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

fn blank(out: &mut [u8], start: usize, end: usize) {
    for i in start..end.min(out.len()) {
        blank_byte(out, i);
    }
}

fn blank_byte(out: &mut [u8], i: usize) {
    if out[i] != b'\n' && out[i] != b'\r' {
        out[i] = b' ';
    }
}

fn into_string(out: Vec<u8>) -> String {
    // Only whole characters are ever blanked, so this is valid UTF-8.
    String::from_utf8(out).unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

fn find_subslice(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from >= bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| from + p)
}

/// `@"..."`, `$@"..."` and `@$"..."` are verbatim strings.
fn is_verbatim_prefix(bytes: &[u8], quote: usize) -> bool {
    let before = &bytes[..quote];
    before.ends_with(b"@") || before.ends_with(b"@$")
}

/// Offset of the closing quote of a regular literal, or of the line end when
/// the literal is unterminated.
fn quoted_end(bytes: &[u8], from: usize, quote: u8) -> usize {
    let mut i = from;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn verbatim_string_end(bytes: &[u8], from: usize) -> usize {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            if bytes.get(i + 1) == Some(&b'"') {
                i += 2;
                continue;
            }
            return i;
        }
        i += 1;
    }
    bytes.len()
}
