//! Scopes for name resolution.
//!
//! Scoping is flat: a function scope lays its local bindings over the
//! top-level table of the module, and nested blocks do not introduce further
//! scopes.

use std::collections::HashMap;

use crate::basic::com::{Position, Span};
use crate::basic::sea::TableIndex;
use crate::model::diag::{Diagnostic, Report};
use crate::model::sem::*;

/// A Scope.
///
/// Lookups check the local bindings first, then the top-level table.
///
/// Local definitions (variables declared in a function body, and stand-ins
/// for names which failed to resolve) are owned by the scope, and are handed
/// IDs following those of the module. Their type is always known on creation.
#[derive(Clone, Debug)]
pub struct Scope<'a> {
    module: &'a Module,
    names: HashMap<String, DefinitionId>,
    locals: Vec<(Definition, Type)>,
}

impl<'a> Scope<'a> {
    /// Creates a scope, with no local binding.
    pub fn new(module: &'a Module) -> Self {
        Scope { module, names: HashMap::new(), locals: Vec::new() }
    }

    /// Returns the definition.
    ///
    /// Panics: if the ID belongs neither to the module nor to the scope.
    pub fn get(&self, id: DefinitionId) -> &Definition {
        match self.local(id) {
            Some((definition, _)) => definition,
            None => self.module.get(id),
        }
    }

    /// Returns the type of a local definition, or None if `id` belongs to the
    /// module.
    pub fn local_type(&self, id: DefinitionId) -> Option<&Type> {
        self.local(id).map(|(_, type_)| type_)
    }

    /// Returns the definition bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<DefinitionId> {
        self.names.get(name).cloned().or_else(|| self.module.lookup(name))
    }

    /// Pushes a local definition, of known type, without binding any name.
    pub fn push_local(&mut self, definition: Definition, type_: Type)
        -> DefinitionId
    {
        let id = DefinitionId::from_index(self.module.len() + self.locals.len());
        self.locals.push((definition, type_));
        id
    }

    /// Binds `name` to the definition.
    ///
    /// If the name is already bound, locally or at the top-level, a
    /// redefinition is reported and the original binding is kept.
    pub fn declare_name(&mut self, name: &str, id: DefinitionId, report: &mut Report) {
        if let Some(original) = self.lookup(name) {
            report.push(Diagnostic::member_redefinition(
                name,
                self.get(id).span(),
                self.get(original).span(),
            ));
            return;
        }

        self.names.insert(name.to_string(), id);
    }

    /// Resolves `name` to its definition.
    ///
    /// If the name is not bound, an undefined member is reported and a
    /// `Poisoned` stand-in is returned.
    pub fn resolve_name(&mut self, name: &str, position: Position, report: &mut Report)
        -> DefinitionId
    {
        if let Some(id) = self.lookup(name) {
            return id;
        }

        report.push(Diagnostic::undefined_member(name, position));

        let poisoned = Poisoned { name: name.to_string(), position };
        self.push_local(Definition::Poisoned(poisoned), Type::Poisoned)
    }
}

//
//  Implementation Details
//
impl<'a> Scope<'a> {
    fn local(&self, id: DefinitionId) -> Option<&(Definition, Type)> {
        id.index().checked_sub(self.module.len()).and_then(|i| self.locals.get(i))
    }
}
