//! Completion dispatcher.
//!
//! A request moves through a small state machine. The cursor line decides
//! between a `using` directive, a bare identifier and a qualified member
//! access. A qualified access then resolves its entity as a local variable,
//! an inherited member, a type or a namespace, and follows any remaining
//! segments through member types before candidates are produced.

use super::items::{CompletionCategory, CompletionItem, collapse_overloads, rank};
use crate::config::Settings;
use crate::parsing::declarations::{self, lookup};
use crate::parsing::heritage::{enclosing_type, type_declarations};
use crate::parsing::members::MemberScan;
use crate::parsing::target::{LookupTarget, Segment};
use crate::resolution::inherited::{self, InheritanceOptions, inheritance_chain};
use crate::source::SourceBuffer;
use crate::symbol::{Variable, Visibility};
use crate::types::DeclarationContext;
use crate::workspace::assembly::{MemberInfo, MemberKind, ResolvedType, TypeInfo};
use crate::workspace::namespaces::{NamespaceVisibilitySet, using_in_progress};
use crate::workspace::search::{self, nested_type, resolve_lookup_name, resolve_type_name};
use crate::workspace::WorkspaceContext;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// C# keywords offered for bare identifiers
pub const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "static", "string", "struct", "switch", "this", "throw", "true", "try", "typeof",
    "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "var", "virtual", "void",
    "volatile", "while",
];

/// Engine options, usually taken from [`Settings`]
#[derive(Debug, Clone)]
pub struct AssistOptions {
    pub visible_scopes_only: bool,
    pub include_keywords: bool,
    pub default_namespaces: Vec<String>,
    pub inheritance: InheritanceOptions,
}

impl Default for AssistOptions {
    fn default() -> Self {
        Self {
            visible_scopes_only: true,
            include_keywords: true,
            default_namespaces: Vec::new(),
            inheritance: InheritanceOptions::default(),
        }
    }
}

impl AssistOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            visible_scopes_only: settings.assist.visible_scopes_only,
            include_keywords: settings.assist.include_keywords,
            default_namespaces: settings.workspace.default_namespaces.clone(),
            inheritance: InheritanceOptions {
                default_page_base: settings.assist.default_page_base.clone(),
                max_inheritance_depth: settings.assist.max_inheritance_depth,
            },
        }
    }
}

/// Which producer handled the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssistState {
    /// Inside an incomplete `using` directive
    UsingDirective,
    /// Nothing qualifies the identifier being typed
    BareIdentifier,
    /// `entity.lookAhead`
    QualifiedAccess,
}

/// What a qualified entity turned out to be
#[derive(Debug, Clone)]
enum Entity {
    /// A value of this type: instance members apply
    Instance(ResolvedType),
    /// The type itself: static members and nested types apply
    Static(ResolvedType),
    Namespace(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct Completion {
    #[serde(flatten)]
    pub state: AssistState,
    pub target: LookupTarget,
    pub items: Vec<CompletionItem>,
}

/// Facts about the source shared by every producer of one request
struct RequestScope<'s> {
    source: &'s SourceBuffer,
    namespaces: Vec<String>,
    visibility: NamespaceVisibilitySet,
    members: MemberScan,
    context: DeclarationContext,
    locals: Vec<Variable>,
}

pub struct CompletionEngine {
    ctx: WorkspaceContext,
    options: AssistOptions,
}

impl CompletionEngine {
    pub fn new(ctx: WorkspaceContext, options: AssistOptions) -> Self {
        Self { ctx, options }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            WorkspaceContext::from_settings(settings),
            AssistOptions::from_settings(settings),
        )
    }

    pub fn workspace(&self) -> &WorkspaceContext {
        &self.ctx
    }

    pub fn options(&self) -> &AssistOptions {
        &self.options
    }

    /// Produce ranked completion items for the cursor position.
    pub fn complete(&self, source: &SourceBuffer) -> Completion {
        if let Some(partial) = using_in_progress(source) {
            let target = LookupTarget::tokenize(&partial);
            let items = self
                .ctx
                .namespaces()
                .immediate_child_namespaces(&target.entity)
                .iter()
                .map(|ns| CompletionItem::namespace(ns))
                .collect();
            debug!(partial = %partial, "completing using directive");
            return Completion {
                state: AssistState::UsingDirective,
                items: rank(items, &target.look_ahead),
                target,
            };
        }

        let mut target = LookupTarget::tokenize(source.line_before_cursor());
        let scope = self.scope(source);

        let (state, items) = if target.is_bare() {
            debug!(look_ahead = %target.look_ahead, "completing bare identifier");
            (AssistState::BareIdentifier, self.bare_identifier(&scope))
        } else {
            debug!(entity = %target.entity, look_ahead = %target.look_ahead, "completing member access");
            (
                AssistState::QualifiedAccess,
                self.qualified_access(&scope, &mut target),
            )
        };

        let items = rank(collapse_overloads(items), &target.look_ahead);
        trace!(count = items.len(), "completion produced");
        Completion {
            state,
            target,
            items,
        }
    }

    fn scope<'s>(&self, source: &'s SourceBuffer) -> RequestScope<'s> {
        let visibility = NamespaceVisibilitySet::for_source(source, &self.options.default_namespaces);
        let namespaces = visibility.search_order();
        let members = MemberScan::scan(source.text());
        let context = members.declaration_context(source.cursor());

        let known_namespaces: Vec<String> = self
            .ctx
            .namespaces()
            .full()
            .chain(self.ctx.namespaces().roots())
            .map(str::to_string)
            .collect();
        let locals = declarations::scan(
            source,
            &known_namespaces,
            self.options.visible_scopes_only,
            context,
        );

        RequestScope {
            source,
            namespaces,
            visibility,
            members,
            context,
            locals,
        }
    }

    /// Locals and fields visible at the cursor, one per name. Declarations
    /// before the cursor come first, closest first; fields declared later in
    /// the type follow.
    fn visible_variables<'v>(&self, scope: &'v RequestScope<'_>) -> Vec<&'v Variable> {
        let cursor = scope.source.cursor();
        let (before, after): (Vec<&Variable>, Vec<&Variable>) = scope
            .locals
            .iter()
            .partition(|v| v.declaration_offset <= cursor);
        let mut seen = HashSet::new();
        before
            .into_iter()
            .chain(after.into_iter().filter(|v| !v.is_local))
            .filter(|v| seen.insert(v.name.as_str()))
            .collect()
    }

    /// The declaration `name` refers to at the cursor
    fn declared_variable<'v>(&self, scope: &'v RequestScope<'_>, name: &str) -> Option<&'v Variable> {
        lookup(&scope.locals, name, scope.source.cursor())
            .or_else(|| scope.locals.iter().find(|v| !v.is_local && v.name == name))
    }

    fn bare_identifier(&self, scope: &RequestScope<'_>) -> Vec<CompletionItem> {
        let mut items: Vec<CompletionItem> = self
            .visible_variables(scope)
            .into_iter()
            .map(CompletionItem::variable)
            .collect();

        let static_only = scope.context.is_static();
        items.extend(self.local_member_items(scope, static_only));

        let inherited = inherited::resolve(
            scope.source,
            scope.context,
            &self.ctx,
            &scope.namespaces,
            &self.options.inheritance,
        );
        items.extend(inherited.iter().map(CompletionItem::variable));
        items.extend(self.inherited_method_items(scope, static_only));

        for decl in type_declarations(scope.source.text()) {
            items.push(CompletionItem::new(
                &decl.name,
                format!("{} {}", decl.kind.keyword(), decl.name),
                CompletionCategory::Type,
            ));
        }
        items.extend(self.visible_types(&scope.namespaces).iter().map(|t| CompletionItem::type_item(t)));
        items.extend(self.ctx.namespaces().roots().map(CompletionItem::namespace));

        if self.options.include_keywords {
            items.extend(KEYWORDS.iter().map(|k| CompletionItem::keyword(k)));
        }
        items
    }

    /// Methods and properties declared in the type around the cursor
    fn local_member_items(&self, scope: &RequestScope<'_>, static_only: bool) -> Vec<CompletionItem> {
        let declarations = type_declarations(scope.source.text());
        let zone = enclosing_type(&declarations, scope.source.cursor()).map(|d| d.zone);
        let in_type = |start: usize| zone.is_none_or(|z| z.contains(start));

        let methods = scope
            .members
            .methods
            .iter()
            .filter(|m| !m.is_constructor())
            .filter(|m| in_type(m.declaration_start_offset))
            .filter(|m| !static_only || m.is_static)
            .map(CompletionItem::local_method);
        let properties = scope
            .members
            .properties
            .iter()
            .filter(|p| in_type(p.declaration_start_offset))
            .filter(|p| !static_only || p.is_static)
            .map(CompletionItem::local_property);
        methods.chain(properties).collect()
    }

    fn inherited_method_items(&self, scope: &RequestScope<'_>, static_only: bool) -> Vec<CompletionItem> {
        inherited::base_types(scope.source, &self.ctx, &scope.namespaces, &self.options.inheritance)
            .iter()
            .flat_map(|ty| ty.ty.members.iter())
            .filter(|m| m.kind == MemberKind::Method && m.access != Visibility::Private)
            .filter(|m| !static_only || m.effective_static())
            .filter_map(CompletionItem::member)
            .collect()
    }

    /// Public top-level types of the visible namespaces
    fn visible_types(&self, namespaces: &[String]) -> Vec<Arc<TypeInfo>> {
        let wanted: HashSet<&str> = namespaces.iter().map(String::as_str).collect();
        self.public_types()
            .into_iter()
            .filter(|t| !t.is_nested() && wanted.contains(t.namespace()))
            .collect()
    }

    fn public_types(&self) -> Vec<Arc<TypeInfo>> {
        let lookup = self.ctx.lookup();
        self.ctx
            .assemblies()
            .iter()
            .filter_map(|name| match lookup.load_assembly(name) {
                Ok(assembly) => Some(assembly),
                Err(e) => {
                    debug!("skipping assembly {name}: {e}");
                    None
                }
            })
            .flat_map(|assembly| assembly.public_types().cloned().collect::<Vec<_>>())
            .collect()
    }

    fn qualified_access(&self, scope: &RequestScope<'_>, target: &mut LookupTarget) -> Vec<CompletionItem> {
        let Some(head) = target.head().cloned() else {
            return Vec::new();
        };

        match head.name.as_str() {
            "this" | "base" if target.segments.len() == 1 => {
                return self.this_or_base_items(scope, head.name == "this");
            }
            "this" | "base" => {
                let rest = target.segments[1..].to_vec();
                let Some(start) = self.field_entity(scope, &rest[0], head.name == "this") else {
                    return Vec::new();
                };
                return self.entity_items(self.walk(start, &rest[1..], &scope.namespaces));
            }
            _ => {}
        }

        if let Some(var) = self.declared_variable(scope, &head.name) {
            trace!("entity head {} is a declared variable", head.name);
            let start = self.variable_entity(var, head.indexed, &scope.namespaces);
            let rest = target.segments[1..].to_vec();
            return self.entity_items(start.and_then(|e| self.walk(e, &rest, &scope.namespaces)));
        }

        if let Some(start) = self.field_entity(scope, &head, false) {
            trace!("entity head {} is an inherited member", head.name);
            let rest = target.segments[1..].to_vec();
            return self.entity_items(self.walk(start, &rest, &scope.namespaces));
        }

        if let Some(alias) = scope.visibility.resolve_alias(&head.name) {
            let mut segments: Vec<Segment> = alias
                .split('.')
                .map(|name| Segment {
                    name: name.to_string(),
                    indexed: false,
                })
                .collect();
            if let Some(last) = segments.last_mut() {
                last.indexed = head.indexed;
            }
            segments.extend(target.segments[1..].iter().cloned());
            target.segments = segments;
        }

        if search::qualify_and_resolve(&self.ctx, target, &scope.namespaces) {
            if let Some(resolved) = target.resolved.clone() {
                let rest = target.member_path.clone();
                return self.entity_items(self.walk(Entity::Static(resolved), &rest, &scope.namespaces));
            }
        }

        let written: Vec<&str> = target.segments.iter().map(|s| s.name.as_str()).collect();
        let namespace = written.join(".");
        if self.ctx.namespaces().is_namespace(&namespace) {
            return self.entity_items(Some(Entity::Namespace(namespace)));
        }

        debug!(entity = %target.entity, "entity did not resolve");
        Vec::new()
    }

    /// Members reachable through `this.` or `base.`
    fn this_or_base_items(&self, scope: &RequestScope<'_>, include_own: bool) -> Vec<CompletionItem> {
        let mut items = Vec::new();
        if include_own {
            items.extend(
                self.visible_variables(scope)
                    .into_iter()
                    .filter(|v| !v.is_local)
                    .map(CompletionItem::variable),
            );
            items.extend(self.local_member_items(scope, false));
        }
        let inherited = inherited::resolve(
            scope.source,
            DeclarationContext::Instance,
            &self.ctx,
            &scope.namespaces,
            &self.options.inheritance,
        );
        items.extend(inherited.iter().map(CompletionItem::variable));
        items.extend(self.inherited_method_items(scope, false));
        items
    }

    /// A field of the current type (with `this`) or an inherited member
    fn field_entity(&self, scope: &RequestScope<'_>, segment: &Segment, own_fields: bool) -> Option<Entity> {
        if own_fields {
            if let Some(var) = scope
                .locals
                .iter()
                .find(|v| !v.is_local && v.name == segment.name)
            {
                return self.variable_entity(var, segment.indexed, &scope.namespaces);
            }
        }
        let inherited = inherited::resolve(
            scope.source,
            scope.context,
            &self.ctx,
            &scope.namespaces,
            &self.options.inheritance,
        );
        let var = inherited.iter().find(|v| v.name == segment.name)?;
        self.variable_entity(var, segment.indexed, &scope.namespaces)
    }

    fn variable_entity(&self, var: &Variable, indexed: bool, namespaces: &[String]) -> Option<Entity> {
        let resolved = if indexed {
            let element = var.indexed_type_name()?;
            resolve_type_name(&self.ctx, element, namespaces).map(|(r, _)| r)
        } else {
            resolve_lookup_name(&self.ctx, &var.lookup_type_name(), namespaces)
        };
        resolved.map(Entity::Instance)
    }

    /// Follow `path` from `start` through member types and nested types.
    fn walk(&self, start: Entity, path: &[Segment], namespaces: &[String]) -> Option<Entity> {
        path.iter().try_fold(start, |entity, segment| {
            let next = self.step(&entity, segment, namespaces);
            if next.is_none() {
                trace!("member chain stops at {}", segment.name);
            }
            next
        })
    }

    fn step(&self, entity: &Entity, segment: &Segment, namespaces: &[String]) -> Option<Entity> {
        match entity {
            Entity::Instance(ty) | Entity::Static(ty) => {
                if let Some(member) = self.find_member(ty, &segment.name) {
                    return self.member_entity(member, segment.indexed, namespaces);
                }
                match entity {
                    Entity::Static(ty) if !segment.indexed => {
                        nested_type(&self.ctx, ty, &segment.name).map(Entity::Static)
                    }
                    _ => None,
                }
            }
            Entity::Namespace(ns) => {
                let full = format!("{ns}.{}", segment.name);
                if let Some(resolved) = resolve_lookup_name(&self.ctx, &full, &[]) {
                    return Some(Entity::Static(resolved));
                }
                self.ctx
                    .namespaces()
                    .is_namespace(&full)
                    .then_some(Entity::Namespace(full))
            }
        }
    }

    fn find_member(&self, ty: &ResolvedType, name: &str) -> Option<MemberInfo> {
        inheritance_chain(
            &self.ctx,
            ty.clone(),
            self.options.inheritance.max_inheritance_depth,
        )
        .iter()
        .find_map(|t| {
            t.ty.members_named(name)
                .find(|m| m.kind != MemberKind::Constructor)
                .cloned()
        })
    }

    fn member_entity(&self, member: MemberInfo, indexed: bool, namespaces: &[String]) -> Option<Entity> {
        let (resolved, shape) = if indexed {
            let var = Variable::from_type_text(member.name, 0, &member.type_name);
            let element = var.indexed_type_name()?;
            resolve_type_name(&self.ctx, element, namespaces)?
        } else {
            resolve_type_name(&self.ctx, &member.type_name, namespaces)?
        };
        trace!(shape = ?shape, "member type {}", resolved.full_name());
        Some(Entity::Instance(resolved))
    }

    fn entity_items(&self, entity: Option<Entity>) -> Vec<CompletionItem> {
        match entity {
            Some(Entity::Instance(ty)) => self.type_member_items(&ty, false),
            Some(Entity::Static(ty)) => {
                let mut items = self.type_member_items(&ty, true);
                let prefix = format!("{}+", ty.full_name());
                items.extend(
                    self.public_types()
                        .iter()
                        .filter(|t| {
                            t.full_name
                                .strip_prefix(&prefix)
                                .is_some_and(|rest| !rest.contains('+'))
                        })
                        .map(|t| CompletionItem::type_item(t)),
                );
                items
            }
            Some(Entity::Namespace(ns)) => {
                let mut items: Vec<CompletionItem> = self
                    .ctx
                    .namespaces()
                    .immediate_child_namespaces(&ns)
                    .iter()
                    .map(|child| CompletionItem::namespace(child))
                    .collect();
                items.extend(
                    self.visible_types(std::slice::from_ref(&ns))
                        .iter()
                        .map(|t| CompletionItem::type_item(t)),
                );
                items
            }
            None => Vec::new(),
        }
    }

    /// Public members of `ty` and its ancestors, static or instance
    fn type_member_items(&self, ty: &ResolvedType, statics: bool) -> Vec<CompletionItem> {
        let mut seen = HashSet::new();
        let mut items = Vec::new();
        for t in inheritance_chain(&self.ctx, ty.clone(), self.options.inheritance.max_inheritance_depth) {
            for member in &t.ty.members {
                if member.access != Visibility::Public || member.effective_static() != statics {
                    continue;
                }
                // Methods keep every overload; fields and properties hide ancestors
                if member.kind != MemberKind::Method
                    && !seen.insert(member.name.clone())
                {
                    continue;
                }
                items.extend(CompletionItem::member(member));
            }
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::assembly::{Assembly, MetadataKind, ParameterInfo};
    use crate::workspace::index::SymbolIndex;

    fn member(name: &str, kind: MemberKind, type_name: &str, is_static: bool) -> MemberInfo {
        MemberInfo {
            name: name.to_string(),
            kind,
            type_name: type_name.to_string(),
            access: Visibility::Public,
            is_static,
            getter: None,
            setter: None,
            parameters: Vec::new(),
        }
    }

    fn ty(full_name: &str, members: Vec<MemberInfo>) -> TypeInfo {
        TypeInfo {
            full_name: full_name.to_string(),
            is_public: true,
            kind: MetadataKind::Class,
            base_type: None,
            members,
        }
    }

    fn engine() -> CompletionEngine {
        let mut append = member("Append", MemberKind::Method, "System.Text.StringBuilder", false);
        append.parameters.push(ParameterInfo {
            name: "value".to_string(),
            type_name: "System.String".to_string(),
        });
        let index = SymbolIndex::new().with_assembly(
            Assembly::new("mscorlib")
                .with_type(ty(
                    "System.String",
                    vec![
                        member("Length", MemberKind::Property, "System.Int32", false),
                        member("Empty", MemberKind::Field, "System.String", true),
                    ],
                ))
                .with_type(ty(
                    "System.Int32",
                    vec![
                        member("MaxValue", MemberKind::Field, "System.Int32", true),
                        member("ToString", MemberKind::Method, "System.String", false),
                    ],
                ))
                .with_type(ty(
                    "System.Text.StringBuilder",
                    vec![
                        append,
                        member("Length", MemberKind::Property, "System.Int32", false),
                    ],
                )),
        );
        CompletionEngine::new(
            WorkspaceContext::new(Arc::new(index)),
            AssistOptions::default(),
        )
    }

    fn complete(src: &str) -> Completion {
        engine().complete(&SourceBuffer::new(src, src.len()))
    }

    fn texts(completion: &Completion) -> Vec<&str> {
        completion.items.iter().map(|i| i.display_text.as_str()).collect()
    }

    #[test]
    fn test_using_directive_lists_namespaces() {
        let completion = complete("using System.T");
        assert_eq!(completion.state, AssistState::UsingDirective);
        assert_eq!(texts(&completion), vec!["Text"]);
    }

    #[test]
    fn test_local_variable_members() {
        let completion = complete(
            "using System.Text;\nclass A {\n  void F() {\n    var sb = new StringBuilder();\n    sb.App",
        );
        assert_eq!(completion.state, AssistState::QualifiedAccess);
        assert_eq!(texts(&completion), vec!["Append"]);
    }

    #[test]
    fn test_static_type_members() {
        let completion = complete("class A {\n  void F() {\n    int n = int.");
        assert_eq!(texts(&completion), vec!["MaxValue"]);
        assert!(matches!(
            completion.items[0].category,
            CompletionCategory::Field(_)
        ));
    }

    #[test]
    fn test_member_chain() {
        let completion = complete(
            "using System.Text;\nclass A {\n  StringBuilder sb;\n  void F() {\n    sb.Length.",
        );
        assert_eq!(texts(&completion), vec!["ToString"]);

        let completion = complete("class A {\n  string name;\n  void F() {\n    this.name.Le");
        assert_eq!(texts(&completion), vec!["Length"]);
    }

    #[test]
    fn test_namespace_access() {
        let completion = complete("class A {\n  void F() {\n    System.");
        let names = texts(&completion);
        assert!(names.contains(&"Text"));
        assert!(names.contains(&"String"));
        assert!(names.contains(&"Int32"));
    }

    #[test]
    fn test_bare_identifier_mixes_sources() {
        let completion = complete("using System;\nclass A {\n  void Run() {\n    int count = 0;\n    co");
        assert_eq!(completion.state, AssistState::BareIdentifier);
        let names = texts(&completion);
        assert_eq!(names.first(), Some(&"count"));
        assert!(names.contains(&"const"));
        assert!(names.contains(&"continue"));
    }

    #[test]
    fn test_unknown_entity_yields_nothing() {
        let completion = complete("class A {\n  void F() {\n    nothing.Here");
        assert!(completion.items.is_empty());
    }
}
