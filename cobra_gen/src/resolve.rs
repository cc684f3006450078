//! Message type lookup within one file's declaration tree.
//!
//! Field and method type references name messages by path (`Outer.Inner`) or
//! by bare name (`Inner`). Qualified references from protoc (`.pkg.Outer.Inner`)
//! are matched by exact path only. A [`TypeCache`] memoises every lookup made
//! during one generation pass, so repeated references to the same type are
//! answered without walking the tree again.

use cobra_types::{Field, MessageType, relative_type_path};
use indexmap::IndexMap;
use tracing::debug;

/// Outcome of looking up a message type.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<'a> {
    /// The matching declaration, if any.
    pub descriptor: Option<&'a MessageType>,
    /// True when the match is declared inside another message.
    pub nested: bool,
    /// Names of the enclosing messages, outermost first.
    pub scope: Vec<String>,
}

impl<'a> Resolution<'a> {
    pub fn not_found() -> Self {
        Self {
            descriptor: None,
            nested: false,
            scope: Vec::new(),
        }
    }

    fn at(descriptor: &'a MessageType, scope: Vec<String>) -> Self {
        Self {
            descriptor: Some(descriptor),
            nested: !scope.is_empty(),
            scope,
        }
    }

    pub fn found(&self) -> bool {
        self.descriptor.is_some()
    }

    /// Prefix Go uses for types nested in the enclosing messages, e.g. `Outer_`.
    pub fn type_prefix(&self) -> String {
        self.scope.iter().map(|name| format!("{name}_")).collect()
    }
}

/// Memoised lookups keyed by the requested name.
///
/// The cache borrows the declaration tree it searches, so it lives no longer
/// than one pass over one file.
#[derive(Debug, Default)]
pub struct TypeCache<'a> {
    entries: IndexMap<String, Resolution<'a>>,
    searches: usize,
}

impl<'a> TypeCache<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `name` up among `roots` and their nested types.
    ///
    /// A dotted name, or any name with a leading dot, is walked segment by
    /// segment from the top level and nothing else. A bare name matches the
    /// first message with that name in a depth-first, declaration-order
    /// search. Misses are cached too.
    pub fn resolve(&mut self, roots: &'a [MessageType], name: &str) -> Resolution<'a> {
        if let Some(hit) = self.entries.get(name) {
            debug!(name, found = hit.found(), "type cache hit");
            return hit.clone();
        }

        self.searches += 1;
        let exact = name.starts_with('.');
        let segments: Vec<&str> = name.split('.').filter(|s| !s.is_empty()).collect();
        let resolution = match segments.as_slice() {
            [] => None,
            [bare] if !exact => search_by_name(roots, bare, &mut Vec::new()),
            _ => walk_path(roots, &segments),
        }
        .unwrap_or_else(Resolution::not_found);

        debug!(
            name,
            found = resolution.found(),
            nested = resolution.nested,
            "resolved message type"
        );
        self.entries.insert(name.to_string(), resolution.clone());
        resolution
    }

    pub fn get(&self, name: &str) -> Option<&Resolution<'a>> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of lookups that had to walk the declaration tree.
    pub fn searches(&self) -> usize {
        self.searches
    }
}

/* Exact walk: every segment but the last names an enclosing message */
fn walk_path<'a>(roots: &'a [MessageType], segments: &[&str]) -> Option<Resolution<'a>> {
    let (last, parents) = segments.split_last()?;
    let mut level = roots;
    let mut scope = Vec::with_capacity(parents.len());
    for segment in parents {
        let parent = level.iter().find(|m| m.name == *segment)?;
        scope.push(parent.name.clone());
        level = &parent.nested_types;
    }
    let descriptor = level.iter().find(|m| m.name == *last)?;
    Some(Resolution::at(descriptor, scope))
}

/* Preorder search: a message is checked before its nested types, and its
 * nested types before its later siblings */
fn search_by_name<'a>(
    types: &'a [MessageType],
    name: &str,
    scope: &mut Vec<String>,
) -> Option<Resolution<'a>> {
    for descriptor in types {
        if descriptor.name == name {
            return Some(Resolution::at(descriptor, scope.clone()));
        }
        scope.push(descriptor.name.clone());
        let found = search_by_name(&descriptor.nested_types, name, scope);
        scope.pop();
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Lookup state for one generation pass over one file.
///
/// Bundles the file's top-level messages and package with a fresh
/// [`TypeCache`]; the flag translator and request initializer share it.
pub struct PassContext<'a> {
    roots: &'a [MessageType],
    package: &'a str,
    pub cache: TypeCache<'a>,
}

impl<'a> PassContext<'a> {
    pub fn new(roots: &'a [MessageType], package: &'a str) -> Self {
        Self {
            roots,
            package,
            cache: TypeCache::new(),
        }
    }

    pub fn resolve(&mut self, name: &str) -> Resolution<'a> {
        self.cache.resolve(self.roots, name)
    }

    /// Resolves a type reference as written in a descriptor.
    ///
    /// `.pkg.Outer.Inner` is looked up as the exact path `Outer.Inner`; a
    /// reference without the leading dot keeps the bare-name search. References
    /// into another package are never found here.
    pub fn resolve_reference(&mut self, type_name: &str) -> Resolution<'a> {
        match relative_type_path(type_name, self.package) {
            Some(path) if type_name.starts_with('.') => self.resolve(&format!(".{}", path.join("."))),
            Some(path) => self.resolve(&path.join(".")),
            None => {
                debug!(type_name, "type is outside this package");
                Resolution::not_found()
            }
        }
    }

    /// Resolves the message type a field refers to.
    pub fn resolve_field(&mut self, field: &Field) -> Resolution<'a> {
        match field.type_name.as_deref() {
            Some(type_name) => self.resolve_reference(type_name),
            None => Resolution::not_found(),
        }
    }
}

#[cfg(test)]
#[path = "resolve_tests.rs"]
mod resolve_tests;
