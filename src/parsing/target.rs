//! The token in front of the cursor, split into the qualifier being
//! accessed and the identifier being typed.

use crate::workspace::assembly::ResolvedType;
use serde::Serialize;

/// Stand-in for an indexer access (`[]`, `[i]`) so it survives splitting
pub const INDEX_SENTINEL: char = '\u{1}';

const DELIMITERS: &[char] = &[
    ' ', ';', '(', ')', '[', ']', '{', '}', '|', '&', '=', '<', '!', '\t', '\n', '\r', ',', '+',
    '-', '*', '/', '%', '?', ':', '>', '^', '~',
];

/// One dotted segment of an entity such as `items[0].Name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub name: String,
    /// Followed by an indexer access
    pub indexed: bool,
}

impl Segment {
    fn parse(raw: &str) -> Self {
        Self {
            indexed: raw.contains(INDEX_SENTINEL),
            name: raw.replace(INDEX_SENTINEL, ""),
        }
    }
}

/// What the user is completing at the cursor.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LookupTarget {
    /// Qualifier chain before the last `.`, indexers removed
    pub entity: String,
    /// Partial identifier after the last `.`
    pub look_ahead: String,
    /// The entity ends in an indexer access
    pub is_indexed: bool,
    /// The token contained a `.`
    pub is_member_access: bool,
    pub segments: Vec<Segment>,
    /// Filled in once a prefix of the entity resolves to a type
    #[serde(skip)]
    pub resolved: Option<ResolvedType>,
    /// Fully qualified name of the resolved prefix
    pub full_entity: Option<String>,
    /// Segments left over after the resolved type prefix
    pub member_path: Vec<Segment>,
}

impl LookupTarget {
    /// Split the text before the cursor on the current line into a target.
    ///
    /// ```
    /// use sharp_assist::parsing::target::LookupTarget;
    ///
    /// let target = LookupTarget::tokenize("var n = foo.Bar.Ba");
    /// assert_eq!(target.entity, "foo.Bar");
    /// assert_eq!(target.look_ahead, "Ba");
    /// ```
    pub fn tokenize(line_before_cursor: &str) -> Self {
        let collapsed = collapse_indexers(line_before_cursor);
        let token = collapsed
            .rsplit(DELIMITERS)
            .next()
            .unwrap_or_default()
            .to_string();

        let (entity_raw, look_ahead, is_member_access) = match token.rfind('.') {
            Some(dot) => (&token[..dot], &token[dot + 1..], true),
            // `foo[` names an indexed entity with nothing typed yet
            None if token.ends_with(INDEX_SENTINEL) => (token.as_str(), "", false),
            None => ("", token.as_str(), false),
        };

        let segments: Vec<Segment> = if entity_raw.is_empty() {
            Vec::new()
        } else {
            entity_raw.split('.').map(Segment::parse).collect()
        };

        Self {
            entity: entity_raw.replace(INDEX_SENTINEL, ""),
            look_ahead: look_ahead.to_string(),
            is_indexed: entity_raw.ends_with(INDEX_SENTINEL),
            is_member_access,
            segments,
            ..Self::default()
        }
    }

    /// Nothing qualifies the identifier being typed. An open indexer such as
    /// `arr[` still counts: the index expression is a fresh identifier.
    pub fn is_bare(&self) -> bool {
        !self.is_member_access
    }

    /// Leftmost segment of the entity, e.g. `this` in `this.foo.Ba`
    pub fn head(&self) -> Option<&Segment> {
        self.segments.first()
    }

    /// Record the resolved type prefix and the segments that follow it.
    pub fn resolve(&mut self, resolved: ResolvedType, full_entity: String, consumed: usize) {
        self.member_path = self.segments.iter().skip(consumed).cloned().collect();
        self.full_entity = Some(full_entity);
        self.resolved = Some(resolved);
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Replace balanced `[...]` with the sentinel. An unclosed `[` at the end of
/// the text counts as an indexer; elsewhere it stays a delimiter so the
/// index expression being typed becomes the token.
fn collapse_indexers(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '[' {
            out.push(c);
            continue;
        }

        let mut depth = 1usize;
        let mut close = None;
        for (j, d) in text[i + 1..].char_indices() {
            match d {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(i + 1 + j);
                        break;
                    }
                }
                _ => {}
            }
        }

        match close {
            Some(close) => {
                out.push(INDEX_SENTINEL);
                while chars.peek().is_some_and(|&(k, _)| k <= close) {
                    chars.next();
                }
            }
            None if text[i + 1..].trim().is_empty() => {
                out.push(INDEX_SENTINEL);
                break;
            }
            None => out.push(c),
        }
    }

    out
}
