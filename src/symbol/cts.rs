//! Common type system names for C# keyword aliases.

/// Keyword alias -> CTS name
const ALIASES: &[(&str, &str)] = &[
    ("bool", "System.Boolean"),
    ("byte", "System.Byte"),
    ("sbyte", "System.SByte"),
    ("char", "System.Char"),
    ("decimal", "System.Decimal"),
    ("double", "System.Double"),
    ("float", "System.Single"),
    ("int", "System.Int32"),
    ("uint", "System.UInt32"),
    ("nint", "System.IntPtr"),
    ("nuint", "System.UIntPtr"),
    ("long", "System.Int64"),
    ("ulong", "System.UInt64"),
    ("short", "System.Int16"),
    ("ushort", "System.UInt16"),
    ("object", "System.Object"),
    ("dynamic", "System.Object"),
    ("string", "System.String"),
    ("void", "System.Void"),
];

/// Canonical CTS name for a keyword alias; other names are returned as written.
///
/// ```
/// use sharp_assist::symbol::cts;
///
/// assert_eq!(cts::canonical("int"), "System.Int32");
/// assert_eq!(cts::canonical("StringBuilder"), "StringBuilder");
/// ```
pub fn canonical(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, cts)| *cts)
        .unwrap_or(name)
}

/// The C# keyword for a CTS name, used when rendering tooltips.
pub fn keyword_alias(cts_name: &str) -> Option<&'static str> {
    // `dynamic` maps onto Object too; prefer `object`
    ALIASES
        .iter()
        .find(|(alias, cts)| *cts == cts_name && *alias != "dynamic")
        .map(|(alias, _)| *alias)
}

/// Metadata name of a generic template: `List` with arity 1 -> ``List`1``.
pub fn generic_metadata_name(template: &str, arity: usize) -> String {
    if arity == 0 {
        canonical(template).to_string()
    } else {
        format!("{template}`{arity}")
    }
}

/// Short display form of a type name: aliases for primitives, otherwise the
/// last dotted segment.
pub fn short_display(type_name: &str) -> String {
    if let Some(alias) = keyword_alias(type_name) {
        return alias.to_string();
    }
    match type_name.find('<') {
        Some(open) => {
            let (head, tail) = type_name.split_at(open);
            format!("{}{}", last_segment(head), tail)
        }
        None => last_segment(type_name).to_string(),
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit(['.', '+']).next().unwrap_or(name)
}
