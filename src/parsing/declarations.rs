//! Local variable and field declarations found by an ordered regex battery.
//!
//! Every pattern runs over the normalized text and contributes candidates
//! regardless of duplicates. The combined list is sorted by descending
//! declaration offset: when a name is declared twice, the declaration
//! closest before the lookup point comes first, which is how inner scopes
//! shadow outer ones without a real scope tree.
//!
//! Only the first variable of a multi-variable declaration (`int a, b;`) is
//! recognised.

use super::members::MemberScan;
use super::normalize::{matching_close, normalize};
use crate::source::SourceBuffer;
use crate::symbol::{TypeShape, Variable};
use crate::types::{DeclarationContext, Zone};
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::trace;

const MODS: &str = r"(?:(?:public|private|protected|internal|static|readonly|const|volatile|new|required|unsafe)\s+)*";
const IDENT: &str = r"[A-Za-z_]\w*";
const QTYPE: &str = r"[A-Za-z_][\w.]*";
const TERMINATOR: &str = r"\s*[,;=)]";

fn compile(pattern: String) -> Regex {
    Regex::new(&pattern).expect("valid declaration regex")
}

static SIMPLE: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\b(?P<mods>{MODS})(?P<type>{QTYPE})\??\s+(?P<name>{IDENT}){TERMINATOR}"
    ))
});

static VAR_NEW: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\bvar\s+(?P<name>{IDENT})\s*=\s*new\s+(?P<type>{QTYPE})\s*[({{]"
    ))
});

static VAR_NEW_ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\bvar\s+(?P<name>{IDENT})\s*=\s*new\s+(?P<type>{QTYPE})\s*\["
    ))
});

/// `var x = <literal>` shapes and the built-in type each one infers
static VAR_LITERALS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let head = format!(r"\bvar\s+(?P<name>{IDENT})\s*=\s*");
    let digits = r"-?\d[\d_]*";
    vec![
        (compile(format!(r#"{head}[@$]*""#)), "System.String"),
        (compile(format!(r"{head}'")), "System.Char"),
        (compile(format!(r"{head}(?:true|false)\s*;")), "System.Boolean"),
        (compile(format!(r"{head}{digits}(?:\.\d+)?[mM]\s*;")), "System.Decimal"),
        (compile(format!(r"{head}{digits}(?:\.\d+)?[fF]\s*;")), "System.Single"),
        (compile(format!(r"{head}{digits}(?:\.\d+[dD]?|[dD])\s*;")), "System.Double"),
        (compile(format!(r"{head}{digits}(?:[uU][lL]|[lL][uU])\s*;")), "System.UInt64"),
        (compile(format!(r"{head}{digits}[lL]\s*;")), "System.Int64"),
        (compile(format!(r"{head}{digits}[uU]\s*;")), "System.UInt32"),
        (
            compile(format!(r"{head}(?:-?0[xX][\da-fA-F_]+|{digits})\s*;")),
            "System.Int32",
        ),
    ]
});

static VAR_NEW_GENERIC1: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\bvar\s+(?P<name>{IDENT})\s*=\s*new\s+(?P<type>{QTYPE})\s*<\s*(?P<t1>[\w.]+(?:\[\])?)\s*>\s*[({{]"
    ))
});

static VAR_NEW_GENERIC2: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\bvar\s+(?P<name>{IDENT})\s*=\s*new\s+(?P<type>{QTYPE})\s*<\s*(?P<t1>[\w.]+)\s*,\s*(?P<t2>[\w.]+(?:\[\])?)\s*>\s*[({{]"
    ))
});

static FOREACH: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\bforeach\s*\(\s*(?P<type>{QTYPE})\s+(?P<name>{IDENT})\s+in\b"
    ))
});

static ARRAY: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\b(?P<mods>{MODS})(?P<type>{QTYPE})\s*\[\s*\]\s+(?P<name>{IDENT}){TERMINATOR}"
    ))
});

static GENERIC1: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\b(?P<mods>{MODS})(?P<type>{QTYPE})\s*<\s*(?P<t1>[\w.]+(?:\[\])?)\s*>\s+(?P<name>{IDENT}){TERMINATOR}"
    ))
});

static GENERIC2: LazyLock<Regex> = LazyLock::new(|| {
    compile(format!(
        r"\b(?P<mods>{MODS})(?P<type>{QTYPE})\s*<\s*(?P<t1>[\w.]+)\s*,\s*(?P<t2>[\w.]+(?:\[\])?)\s*>\s+(?P<name>{IDENT}){TERMINATOR}"
    ))
});

static STATEMENT_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:for|foreach|using|catch|fixed|lock)\s*\(").expect("valid statement regex")
});

/// Words the loose patterns capture in type position by mistake
const FALSE_TYPES: &[&str] = &[
    "var", "as", "in", "try", "return", "select", "ref", "out", "new", "using", "namespace",
    "class", "struct", "interface", "enum", "record", "throw", "else", "case", "goto", "is",
    "await", "yield", "typeof", "default", "break", "continue", "params", "this", "base",
    "where", "from", "let", "orderby", "group", "into", "join", "on", "equals", "by",
    "ascending", "descending", "delegate", "event", "operator", "implicit", "explicit", "lock",
    "if", "while", "for", "foreach", "switch", "do", "catch", "finally", "get", "set", "add",
    "remove", "when", "not", "and", "or", "with",
];

/// Words that can never be a variable name
const FALSE_NAMES: &[&str] = &[
    "as", "in", "is", "new", "out", "ref", "this", "base", "when", "and", "or", "not", "with",
    "where", "select", "get", "set",
];

/// One pattern match before locality is decided
struct Candidate {
    name: String,
    offset: usize,
    type_name: String,
    shape: TypeShape,
    is_static: bool,
    always_local: bool,
}

impl Candidate {
    fn from_caps(caps: &Captures<'_>, type_name: &str, shape: TypeShape) -> Option<Self> {
        let name = caps.name("name")?;
        let is_static = caps
            .name("mods")
            .map(|m| {
                m.as_str()
                    .split_whitespace()
                    .any(|w| w == "static" || w == "const")
            })
            .unwrap_or(false);
        Some(Self {
            name: name.as_str().to_string(),
            offset: name.start(),
            type_name: type_name.to_string(),
            shape,
            is_static,
            always_local: false,
        })
    }
}

fn plausible(type_name: &str, name: &str, namespaces: &[String]) -> bool {
    !FALSE_TYPES.contains(&type_name)
        && !FALSE_NAMES.contains(&name)
        && !namespaces.iter().any(|ns| ns == type_name)
}

fn push(
    found: &mut Vec<Candidate>,
    namespaces: &[String],
    caps: &Captures<'_>,
    type_name: &str,
    shape: TypeShape,
) {
    let name = caps.name("name").map(|m| m.as_str()).unwrap_or_default();
    if !plausible(type_name, name, namespaces) {
        return;
    }
    if let Some(candidate) = Candidate::from_caps(caps, type_name, shape) {
        found.push(candidate);
    }
}

fn collect_candidates(text: &str, namespaces: &[String]) -> Vec<Candidate> {
    let mut found = Vec::new();

    // 1. Type name
    for caps in SIMPLE.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Simple);
    }

    // 2. var name = new Type(...)
    for caps in VAR_NEW.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Simple);
    }
    for caps in VAR_NEW_ARRAY.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Array { element: ty.to_string() });
    }

    // 3. var name = <literal>
    for (regex, builtin) in VAR_LITERALS.iter() {
        for caps in regex.captures_iter(text) {
            push(&mut found, namespaces, &caps, builtin, TypeShape::Simple);
        }
    }

    // 4. var name = new Type<T>() / new Type<T1, T2>()
    for caps in VAR_NEW_GENERIC1.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        let t1 = caps.name("t1").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Generic1 { t1: t1.to_string() });
    }
    for caps in VAR_NEW_GENERIC2.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        let t1 = caps.name("t1").map(|m| m.as_str()).unwrap_or_default();
        let t2 = caps.name("t2").map(|m| m.as_str()).unwrap_or_default();
        push(
            &mut found,
            namespaces,
            &caps,
            ty,
            TypeShape::Generic2 {
                t1: t1.to_string(),
                t2: t2.to_string(),
            },
        );
    }

    // 5. foreach (Type name in ...)
    let before_foreach = found.len();
    for caps in FOREACH.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Simple);
    }
    for candidate in &mut found[before_foreach..] {
        candidate.always_local = true;
    }

    // 6. Type[] name
    for caps in ARRAY.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Array { element: ty.to_string() });
    }

    // 7. Type<T> name / Type<T1, T2> name
    for caps in GENERIC1.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        let t1 = caps.name("t1").map(|m| m.as_str()).unwrap_or_default();
        push(&mut found, namespaces, &caps, ty, TypeShape::Generic1 { t1: t1.to_string() });
    }
    for caps in GENERIC2.captures_iter(text) {
        let ty = caps.name("type").map(|m| m.as_str()).unwrap_or_default();
        let t1 = caps.name("t1").map(|m| m.as_str()).unwrap_or_default();
        let t2 = caps.name("t2").map(|m| m.as_str()).unwrap_or_default();
        push(
            &mut found,
            namespaces,
            &caps,
            ty,
            TypeShape::Generic2 {
                t1: t1.to_string(),
                t2: t2.to_string(),
            },
        );
    }

    found
}

/// Brace blocks, member bodies and `for`/`foreach`/`using`/`catch` statements.
pub fn scope_zones(text: &str, members: &MemberScan) -> Vec<Zone> {
    let mut zones: Vec<Zone> = members.zones().collect();

    let mut open = Vec::new();
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'{' => open.push(i),
            b'}' => {
                if let Some(start) = open.pop() {
                    zones.push(Zone::new(start, i));
                }
            }
            _ => {}
        }
    }
    // Blocks still open at the cursor run to the end of the buffer
    zones.extend(open.into_iter().map(|start| Zone::new(start, text.len())));

    for header in STATEMENT_HEADER.find_iter(text) {
        let paren = header.end() - 1;
        let Some(close) = matching_close(text, paren) else {
            zones.push(Zone::new(header.start(), text.len()));
            continue;
        };
        let rest = &text[close + 1..];
        let skipped = rest.len() - rest.trim_start().len();
        let body = close + 1 + skipped;
        let end = if text.as_bytes().get(body) == Some(&b'{') {
            matching_close(text, body).unwrap_or(text.len())
        } else {
            text[body..].find(';').map(|i| body + i).unwrap_or(text.len())
        };
        zones.push(Zone::new(header.start(), end));
    }

    zones
}

fn innermost(zones: &[Zone], offset: usize) -> Option<Zone> {
    zones
        .iter()
        .filter(|z| z.contains(offset))
        .min_by_key(|z| z.len())
        .copied()
}

/// Discover declared variables, ordered by descending declaration offset.
///
/// `namespaces` rejects captures whose "type" is really a namespace name.
/// With `visible_scopes_only`, a declaration is kept only when the innermost
/// scope around it also contains the cursor, and locals must additionally be
/// declared before the cursor. Under a static `context`, fields that are not
/// static are dropped; locals are always kept.
pub fn scan(
    source: &SourceBuffer,
    namespaces: &[String],
    visible_scopes_only: bool,
    context: DeclarationContext,
) -> Vec<Variable> {
    let text = normalize(source.text());
    let members = MemberScan::scan(&text);
    let cursor = source.cursor();
    let zones = if visible_scopes_only {
        scope_zones(&text, &members)
    } else {
        Vec::new()
    };

    let mut variables: Vec<Variable> = collect_candidates(&text, namespaces)
        .into_iter()
        .filter_map(|c| {
            let is_local = c.always_local || members.is_inside_member(c.offset);

            if visible_scopes_only {
                if is_local && c.offset > cursor {
                    return None;
                }
                if let Some(scope) = innermost(&zones, c.offset) {
                    if !scope.contains(cursor) {
                        return None;
                    }
                }
            }

            if !context.admits(is_local, c.is_static) {
                return None;
            }

            Some(
                Variable::new(c.name, c.offset, c.type_name, c.shape)
                    .local(is_local)
                    .with_static(c.is_static),
            )
        })
        .collect();

    variables.sort_by(|a, b| b.declaration_offset.cmp(&a.declaration_offset));
    trace!(count = variables.len(), "declared variables scanned");
    variables
}

/// First declaration of `name` at or before `offset` in shadowing order.
pub fn lookup<'a>(variables: &'a [Variable], name: &str, offset: usize) -> Option<&'a Variable> {
    variables
        .iter()
        .find(|v| v.name == name && v.declaration_offset <= offset)
}
