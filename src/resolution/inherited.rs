//! Fields and properties inherited from the enclosing type's base types.

use crate::parsing::heritage::base_type_names;
use crate::source::SourceBuffer;
use crate::symbol::{TypeShape, Variable, Visibility, cts};
use crate::types::DeclarationContext;
use crate::workspace::WorkspaceContext;
use crate::workspace::assembly::{MemberKind, ResolvedType};
use crate::workspace::search::resolve_lookup_name;
use std::collections::HashSet;
use tracing::{debug, trace};

#[derive(Debug, Clone)]
pub struct InheritanceOptions {
    /// Base of markup pages that declare no `Inherits=`
    pub default_page_base: String,
    pub max_inheritance_depth: usize,
}

impl Default for InheritanceOptions {
    fn default() -> Self {
        Self {
            default_page_base: "System.Web.UI.Page".to_string(),
            max_inheritance_depth: 16,
        }
    }
}

/// `start` followed by its base types, closest first.
pub fn inheritance_chain(
    ctx: &WorkspaceContext,
    start: ResolvedType,
    max_depth: usize,
) -> Vec<ResolvedType> {
    let mut seen = HashSet::new();
    let mut chain = Vec::new();
    let mut current = Some(start);

    while let Some(ty) = current.take() {
        if chain.len() >= max_depth.max(1) || !seen.insert(ty.full_name().to_string()) {
            break;
        }
        current = ty.ty.base_type.as_deref().and_then(|base| {
            let (template, shape) = TypeShape::parse(base);
            let name = cts::generic_metadata_name(&template, shape.generic_arity());
            resolve_lookup_name(ctx, &name, &[])
        });
        chain.push(ty);
    }
    chain
}

/// Resolve each base type name of the enclosing declaration.
///
/// Every visible namespace is tried in order; the first namespace that
/// resolves a name ends the search for that name. The result holds each
/// resolved base followed by its own ancestors.
pub fn base_types(
    source: &SourceBuffer,
    ctx: &WorkspaceContext,
    namespaces: &[String],
    options: &InheritanceOptions,
) -> Vec<ResolvedType> {
    let mut types = Vec::new();
    for base in base_type_names(source, &options.default_page_base) {
        let name = cts::canonical(&base);
        match resolve_lookup_name(ctx, name, namespaces) {
            Some(resolved) => {
                debug!("base type {base} resolved to {}", resolved.full_name());
                types.extend(inheritance_chain(ctx, resolved, options.max_inheritance_depth));
            }
            None => trace!("base type {base} not found"),
        }
    }
    types
}

/// Fields and properties of the base types as synthetic variables.
///
/// Private fields are skipped. Under a static context only static members
/// are kept. A member redeclared closer to the source hides the ones above
/// it.
pub fn resolve(
    source: &SourceBuffer,
    context: DeclarationContext,
    ctx: &WorkspaceContext,
    namespaces: &[String],
    options: &InheritanceOptions,
) -> Vec<Variable> {
    let mut seen = HashSet::new();
    let mut variables = Vec::new();

    for ty in base_types(source, ctx, namespaces, options) {
        for member in &ty.ty.members {
            let keep = match member.kind {
                MemberKind::Field => member.access != Visibility::Private,
                MemberKind::Property => true,
                _ => false,
            };
            if !keep {
                continue;
            }

            let is_static = member.effective_static();
            if !context.admits(false, is_static) || !seen.insert(member.name.clone()) {
                continue;
            }
            variables.push(
                Variable::from_type_text(member.name.clone(), 0, &member.type_name)
                    .local(false)
                    .with_static(is_static),
            );
        }
    }

    trace!(count = variables.len(), "inherited variables resolved");
    variables
}
