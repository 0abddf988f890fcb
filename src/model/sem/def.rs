//! Definitions

use crate::basic::com::{Id, Position, Span};
use crate::model::ir::Chunk;

use super::{StaticValue, Type};

/// The ID of a Definition.
pub type DefinitionId = Id<Definition>;

/// A Definition.
///
/// The type of `Var` and `Fn` definitions is computed lazily, from their type
/// expressions, and memoized by the resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum Definition {
    /// A variable or parameter.
    Var(Var),
    /// A function.
    Fn(Function),
    /// A built-in, or synthesized, definition.
    Static(Static),
    /// A stand-in for a name which failed to resolve.
    Poisoned(Poisoned),
}

/// A variable, or function parameter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Var {
    /// The name.
    pub name: String,
    /// The type expression, empty if the type is inferred.
    pub type_: Chunk,
    /// Whether the variable may be re-assigned.
    pub mutable: bool,
    /// The position.
    pub position: Position,
}

/// A function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Function {
    /// The name.
    pub name: String,
    /// The parameters, each a `Var`, in order.
    pub parameters: Vec<DefinitionId>,
    /// The return type expression.
    pub result: Chunk,
    /// The body.
    pub body: Chunk,
    /// The position.
    pub position: Position,
}

/// A built-in definition, with a known type and value.
#[derive(Clone, Debug, PartialEq)]
pub struct Static {
    /// The name.
    pub name: String,
    /// The type.
    pub type_: Type,
    /// The value.
    pub value: StaticValue,
    /// The position.
    pub position: Position,
}

/// A stand-in for an unresolved name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Poisoned {
    /// The name.
    pub name: String,
    /// The position.
    pub position: Position,
}

//
//  Public interface
//

impl Definition {
    /// Returns the name.
    pub fn name(&self) -> &str {
        match self {
            Definition::Var(v) => &v.name,
            Definition::Fn(f) => &f.name,
            Definition::Static(s) => &s.name,
            Definition::Poisoned(p) => &p.name,
        }
    }

    /// Returns whether the definition carries a compile-time value.
    pub fn has_static_value(&self) -> bool {
        match self {
            Definition::Fn(..) | Definition::Static(..) => true,
            Definition::Var(..) | Definition::Poisoned(..) => false,
        }
    }

    /// Returns the compile-time value of the definition, if any.
    ///
    /// The `id` is the ID of this very definition, functions being their own
    /// values.
    pub fn static_value(&self, id: DefinitionId) -> Option<StaticValue> {
        match self {
            Definition::Fn(..) => Some(StaticValue::Function(id)),
            Definition::Static(s) => Some(s.value.clone()),
            Definition::Var(..) | Definition::Poisoned(..) => None,
        }
    }

    /// Returns the type of the definition, if known without resolution.
    pub fn intrinsic_type(&self) -> Option<Type> {
        match self {
            Definition::Static(s) => Some(s.type_.clone()),
            Definition::Poisoned(..) => Some(Type::Poisoned),
            Definition::Var(..) | Definition::Fn(..) => None,
        }
    }

    /// Returns the function, if a `Fn`.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Definition::Fn(f) => Some(f),
            _ => None,
        }
    }
}

impl Static {
    /// Creates a built-in type, such as `int`.
    pub fn type_(name: &str, type_: Type, position: Position) -> Static {
        Static {
            name: name.to_string(),
            type_: Type::Type,
            value: StaticValue::Type(type_),
            position,
        }
    }
}

//
//  Span Implementations
//

impl Span for Definition {
    /// Returns the position of the definition.
    fn span(&self) -> Position {
        match self {
            Definition::Var(v) => v.position,
            Definition::Fn(f) => f.position,
            Definition::Static(s) => s.position,
            Definition::Poisoned(p) => p.position,
        }
    }
}
