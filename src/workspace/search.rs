//! Finding public types by name across the workspace assemblies.

use super::WorkspaceContext;
use super::assembly::{ResolvedType, TypeLookup};
use crate::parsing::target::LookupTarget;
use crate::symbol::{TypeShape, cts};
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Namespace part of a full type name, ignoring nesting:
/// `System.Environment+SpecialFolder` -> `System`
pub fn namespace_of(full_name: &str) -> &str {
    let outer = full_name.split('+').next().unwrap_or(full_name);
    outer.rfind('.').map(|i| &outer[..i]).unwrap_or("")
}

/// Assemblies to probe for `full_name`: those registered for its namespace,
/// then every workspace assembly. No name appears twice.
pub fn candidate_assemblies(ctx: &WorkspaceContext, full_name: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    ctx.assemblies_for_namespace(namespace_of(full_name))
        .iter()
        .chain(ctx.assemblies().iter())
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn probe(lookup: &dyn TypeLookup, assembly: &str, full_name: &str) -> Option<ResolvedType> {
    let loaded = match lookup.load_assembly(assembly) {
        Ok(loaded) => loaded,
        Err(e) => {
            debug!("skipping assembly {assembly}: {e}");
            return None;
        }
    };
    let ty = loaded.get_type(full_name)?;
    if !ty.is_public {
        trace!("{full_name} in {assembly} is not public");
        return None;
    }
    Some(ResolvedType {
        assembly: loaded.name.clone(),
        ty,
    })
}

/// Find the public type named exactly `full_name`.
///
/// Candidates are probed in priority order and the first success wins. With
/// parallel probing enabled the probes run concurrently but the winner is
/// still the earliest candidate, not the first to finish.
pub fn search_assembly(ctx: &WorkspaceContext, full_name: &str) -> Option<ResolvedType> {
    if full_name.is_empty() {
        return None;
    }
    let candidates = candidate_assemblies(ctx, full_name);
    let lookup = ctx.lookup();

    let found = if ctx.options().parallel_probe {
        candidates
            .par_iter()
            .find_map_first(|assembly| probe(lookup, assembly, full_name))
    } else {
        candidates
            .iter()
            .find_map(|assembly| probe(lookup, assembly, full_name))
    };

    if let Some(resolved) = &found {
        trace!("{full_name} resolved in {}", resolved.assembly);
    }
    found
}

/// `name` followed by nested-type spellings that turn the last `depth` dots
/// into `+`, shallowest first: `A.B.C` -> `A.B.C`, `A.B+C`, `A+B+C`.
pub fn nested_variants(name: &str, depth: usize) -> Vec<String> {
    let dots: Vec<usize> = name.match_indices('.').map(|(i, _)| i).collect();
    let mut variants = vec![name.to_string()];
    for n in 1..=depth.min(dots.len()) {
        let mut bytes = name.as_bytes().to_vec();
        for &dot in &dots[dots.len() - n..] {
            bytes[dot] = b'+';
        }
        // Only ASCII bytes were replaced
        variants.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    variants
}

fn search_with_nesting(ctx: &WorkspaceContext, name: &str) -> Option<(ResolvedType, String)> {
    nested_variants(name, ctx.options().nested_type_depth)
        .into_iter()
        .find_map(|variant| search_assembly(ctx, &variant).map(|r| (r, variant)))
}

fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// Resolve the leftmost type prefix of the target's entity.
///
/// For each namespace in priority order the entity's segments are joined
/// left to right, each prefix tried as written and as a nested type. On the
/// first hit the target records the type, its full name and the segments
/// that remain to be walked as members.
pub fn qualify_and_resolve(
    ctx: &WorkspaceContext,
    target: &mut LookupTarget,
    namespaces: &[String],
) -> bool {
    // An indexer cannot follow a type name, so prefixes stop there
    let limit = target
        .segments
        .iter()
        .position(|s| s.indexed)
        .unwrap_or(target.segments.len());
    if limit == 0 {
        return false;
    }

    let mut names: Vec<&str> = target.segments[..limit]
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    names[0] = cts::canonical(names[0]);

    for namespace in namespaces {
        for consumed in 1..=names.len() {
            let candidate = qualify(namespace, &names[..consumed].join("."));
            if let Some((resolved, full_name)) = search_with_nesting(ctx, &candidate) {
                debug!(
                    entity = %target.entity,
                    "resolved {full_name} in {}",
                    resolved.assembly
                );
                target.resolve(resolved, full_name, consumed);
                return true;
            }
        }
    }

    trace!(entity = %target.entity, "no type prefix resolved");
    false
}

/// Resolve a type name as written in source or metadata (`int`,
/// `StringBuilder`, `List<String>`, `System.String[]`) against the visible
/// namespaces. Returns the type together with its parsed shape.
pub fn resolve_type_name(
    ctx: &WorkspaceContext,
    type_text: &str,
    namespaces: &[String],
) -> Option<(ResolvedType, TypeShape)> {
    let (template, shape) = TypeShape::parse(type_text);
    let lookup_name = match &shape {
        TypeShape::Array { .. } => "System.Array".to_string(),
        shape => cts::generic_metadata_name(&template, shape.generic_arity()),
    };
    resolve_lookup_name(ctx, &lookup_name, namespaces).map(|r| (r, shape))
}

/// Resolve an already-normalized metadata name against the visible namespaces.
pub fn resolve_lookup_name(
    ctx: &WorkspaceContext,
    lookup_name: &str,
    namespaces: &[String],
) -> Option<ResolvedType> {
    let global = [String::new()];
    let order = if namespaces.is_empty() {
        &global[..]
    } else {
        namespaces
    };
    order
        .iter()
        .find_map(|ns| search_with_nesting(ctx, &qualify(ns, lookup_name)))
        .map(|(resolved, _)| resolved)
}

/// Public type nested directly in `outer` with simple name `name`
pub fn nested_type(ctx: &WorkspaceContext, outer: &ResolvedType, name: &str) -> Option<ResolvedType> {
    search_assembly(ctx, &format!("{}+{name}", outer.full_name()))
}
