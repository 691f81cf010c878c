use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Byte range in the source buffer spanned by a member or block body.
///
/// `end` is the offset of the closing brace (inclusive), so a zone always
/// satisfies `end >= start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Zone {
    pub start: usize,
    pub end: usize,
}

/// Whether the cursor sits in a static or an instance member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DeclarationContext {
    #[default]
    Instance,
    Static,
}

impl Zone {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// True when `other` lies entirely inside this zone
    pub fn encloses(&self, other: &Zone) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl DeclarationContext {
    pub fn is_static(&self) -> bool {
        matches!(self, DeclarationContext::Static)
    }

    /// Whether a variable with the given flags is reachable from this context.
    ///
    /// Locals are always reachable; module-level fields need to be static when
    /// the cursor is inside a static member.
    pub fn admits(&self, is_local: bool, is_static: bool) -> bool {
        is_local || is_static || !self.is_static()
    }
}

impl FromStr for DeclarationContext {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Instance" | "instance" => Ok(DeclarationContext::Instance),
            "Static" | "static" => Ok(DeclarationContext::Static),
            _ => Err("Unknown declaration context"),
        }
    }
}
