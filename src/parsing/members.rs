//! Method, constructor and property declarations of the current source.
//!
//! Each declaration carries a brace-matched zone: from the declaration start,
//! scan to the first `{` and follow nesting until depth returns to zero. The
//! zones tell callers which member the cursor sits in.

use super::heritage::type_declarations;
use super::normalize::{Enclosure, blank_enclosed, matching_close, normalize};
use crate::symbol::{MethodSignature, PropertySignature, Visibility};
use crate::types::{DeclarationContext, Zone};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// A written type: dotted name, optional generic arguments (one nesting
/// level), optional array ranks and nullable marker.
const TYPE_PATTERN: &str =
    r"[A-Za-z_][\w.]*(?:\s*<[^<>;{}()=]*(?:<[^<>;{}()=]*>[^<>;{}()=]*)*>)?(?:\s*\[\s*\])*\??";

/// Parameter list, matched after its contents are blanked
const PARAMS_PATTERN: &str = r"[^()]*";

const ATTRIBUTES_PATTERN: &str = r"(?:\[[^\]\n]*\]\s*)*";

static METHOD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*{ATTRIBUTES_PATTERN}(?P<mods>(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|async|extern|unsafe|new|partial|readonly)\s+)*)(?P<ret>{TYPE_PATTERN})\s+(?P<name>[A-Za-z_0-9]\w*)\s*(?:<[^<>(){{}};]*>)?\s*\((?P<params>{PARAMS_PATTERN})\)\s*(?:where\b[^{{;]*?)?(?P<open>\{{|=>)"
    ))
    .expect("valid method regex")
});

static CONSTRUCTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*{ATTRIBUTES_PATTERN}(?P<mods>(?:(?:public|private|protected|internal|static|extern|unsafe)\s+)*)(?P<name>[A-Za-z_]\w*)\s*\((?P<params>{PARAMS_PATTERN})\)\s*(?P<open>\{{|:)"
    ))
    .expect("valid constructor regex")
});

static PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"(?m)^[ \t]*{ATTRIBUTES_PATTERN}(?P<mods>(?:(?:public|private|protected|internal|static|virtual|override|abstract|sealed|new|readonly|required|unsafe|extern)\s+)*)(?P<type>{TYPE_PATTERN})\s+(?P<name>[A-Za-z_]\w*)\s*(?P<open>\{{|=>)"
    ))
    .expect("valid property regex")
});

/// Words that the loose patterns above capture in type or name position
/// without denoting a declaration.
const NOT_A_TYPE: &[&str] = &[
    "abstract", "as", "await", "base", "case", "class", "const", "delegate", "do", "else",
    "enum", "event", "extern", "goto", "in", "interface", "internal", "is", "namespace", "new",
    "out", "override", "partial", "private", "protected", "public", "readonly", "record", "ref",
    "return", "sealed", "static", "struct", "this", "throw", "using", "var", "virtual", "yield",
];

const NOT_A_MEMBER_NAME: &[&str] = &[
    "catch", "checked", "default", "fixed", "for", "foreach", "if", "lock", "nameof", "new",
    "return", "sizeof", "switch", "typeof", "unchecked", "using", "when", "while",
];

/// Offset of the brace closing the first `{` at or after `from`.
///
/// Unterminated bodies (the user is still typing) extend to the end of the
/// text.
pub fn zone_end(text: &str, from: usize) -> usize {
    let Some(open) = text[from.min(text.len())..].find('{').map(|i| from + i) else {
        return text.len();
    };
    matching_close(text, open).unwrap_or(text.len())
}

/// End of an expression-bodied member: the terminating `;`.
fn arrow_end(text: &str, from: usize) -> usize {
    text[from.min(text.len())..]
        .find(';')
        .map(|i| from + i)
        .unwrap_or(text.len())
}

fn body_end(text: &str, start: usize, open: &regex::Match<'_>) -> usize {
    if open.as_str() == "=>" {
        arrow_end(text, open.end())
    } else {
        zone_end(text, start)
    }
}

fn has_modifier(mods: &str, modifier: &str) -> bool {
    mods.split_whitespace().any(|m| m == modifier)
}

/// Scan methods and constructors. Hidden marker methods (names starting
/// with a digit) are dropped. Results are ordered by position.
pub fn scan_methods(source: &str) -> Vec<MethodSignature> {
    let text = normalize(source);
    // Headers are matched with parenthesized text blanked; parameter lists
    // are read back from `text` at the same offsets.
    let headers = blank_enclosed(&text, Enclosure::Paren);
    let mut methods = Vec::new();

    for caps in METHOD.captures_iter(&headers) {
        let (Some(mods), Some(ret), Some(name), Some(params), Some(open)) = (
            caps.name("mods"),
            caps.name("ret"),
            caps.name("name"),
            caps.name("params"),
            caps.name("open"),
        ) else {
            continue;
        };

        let ret_word = ret.as_str().trim();
        if NOT_A_TYPE.contains(&ret_word) || NOT_A_MEMBER_NAME.contains(&name.as_str()) {
            continue;
        }

        let start = mods.start();
        let method = MethodSignature {
            name: name.as_str().to_string(),
            return_type: Some(ret_word.to_string()),
            parameter_list_raw: text[params.range()].trim().to_string(),
            visibility: Visibility::from_modifiers(mods.as_str()),
            is_static: has_modifier(mods.as_str(), "static"),
            declaration_start_offset: start,
            declaration_end_offset: body_end(&text, start, &open),
        };
        if method.is_hidden() {
            continue;
        }
        methods.push(method);
    }

    let type_names: HashSet<String> = type_declarations(&text)
        .into_iter()
        .map(|decl| decl.name)
        .collect();

    for caps in CONSTRUCTOR.captures_iter(&headers) {
        let (Some(mods), Some(name), Some(params)) =
            (caps.name("mods"), caps.name("name"), caps.name("params"))
        else {
            continue;
        };
        if !type_names.contains(name.as_str()) || NOT_A_MEMBER_NAME.contains(&name.as_str()) {
            continue;
        }

        let start = mods.start();
        methods.push(MethodSignature {
            name: name.as_str().to_string(),
            return_type: None,
            parameter_list_raw: text[params.range()].trim().to_string(),
            visibility: Visibility::from_modifiers(mods.as_str()),
            is_static: has_modifier(mods.as_str(), "static"),
            declaration_start_offset: start,
            declaration_end_offset: zone_end(&text, start),
        });
    }

    methods.sort_by_key(|m| m.declaration_start_offset);
    methods
}

/// Scan property declarations (accessor blocks and expression bodies).
pub fn scan_properties(source: &str) -> Vec<PropertySignature> {
    let text = normalize(source);

    PROPERTY
        .captures_iter(&text)
        .filter_map(|caps| {
            let mods = caps.name("mods")?;
            let ty = caps.name("type")?;
            let name = caps.name("name")?;
            let open = caps.name("open")?;

            let ty_word = ty.as_str().trim();
            if NOT_A_TYPE.contains(&ty_word) || NOT_A_MEMBER_NAME.contains(&name.as_str()) {
                return None;
            }

            let start = mods.start();
            Some(PropertySignature {
                name: name.as_str().to_string(),
                return_type: Some(ty_word.to_string()),
                parameter_list_raw: String::new(),
                visibility: Visibility::from_modifiers(mods.as_str()),
                is_static: has_modifier(mods.as_str(), "static"),
                declaration_start_offset: start,
                declaration_end_offset: body_end(&text, start, &open),
            })
        })
        .collect()
}

/// Methods and properties of one source, with zone queries.
#[derive(Debug, Clone, Default)]
pub struct MemberScan {
    pub methods: Vec<MethodSignature>,
    pub properties: Vec<PropertySignature>,
}

impl MemberScan {
    pub fn scan(source: &str) -> Self {
        Self {
            methods: scan_methods(source),
            properties: scan_properties(source),
        }
    }

    /// All member zones, methods first
    pub fn zones(&self) -> impl Iterator<Item = Zone> + '_ {
        self.methods
            .iter()
            .map(MethodSignature::zone)
            .chain(self.properties.iter().map(PropertySignature::zone))
    }

    /// Innermost method or constructor whose zone contains `offset`
    pub fn enclosing_method(&self, offset: usize) -> Option<&MethodSignature> {
        self.methods
            .iter()
            .filter(|m| m.zone().contains(offset))
            .min_by_key(|m| m.zone().len())
    }

    /// Innermost property whose zone contains `offset`
    pub fn enclosing_property(&self, offset: usize) -> Option<&PropertySignature> {
        self.properties
            .iter()
            .filter(|p| p.zone().contains(offset))
            .min_by_key(|p| p.zone().len())
    }

    /// True when `offset` lies inside any member body
    pub fn is_inside_member(&self, offset: usize) -> bool {
        self.zones().any(|z| z.contains(offset))
    }

    /// Static when the innermost enclosing member is static.
    pub fn declaration_context(&self, offset: usize) -> DeclarationContext {
        let method = self.enclosing_method(offset).map(|m| (m.zone(), m.is_static));
        let property = self.enclosing_property(offset).map(|p| (p.zone(), p.is_static));

        let innermost = match (method, property) {
            (Some(m), Some(p)) => Some(if m.0.len() <= p.0.len() { m } else { p }),
            (m, p) => m.or(p),
        };

        match innermost {
            Some((_, true)) => DeclarationContext::Static,
            _ => DeclarationContext::Instance,
        }
    }
}
