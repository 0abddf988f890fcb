//! Values
//!
//! Values live on the virtual evaluation stack of the generator, both while
//! evaluating type expressions at compile time and while translating function
//! bodies.

use std::fmt;

use crate::basic::com::{Position, Span};

use super::{DefinitionId, Type};

/// A compile-time known value.
#[derive(Clone, Debug, PartialEq)]
pub enum StaticValue {
    /// A boolean.
    Bool(bool),
    /// An integral.
    Int(i64),
    /// A type, such as `int`.
    Type(Type),
    /// A function, referred to by its definition.
    Function(DefinitionId),
}

/// A Value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A value known at compile time.
    Static(StaticValue, Type, Position),
    /// A value only known at run time, represented by the target code
    /// computing it.
    Runtime(String, Type, Position),
    /// The value of an erroneous expression, already reported.
    Poisoned(Type, Position),
}

//
//  Public interface
//

impl Value {
    /// Returns a poisoned value, typed `Poisoned`.
    pub fn poisoned(position: Position) -> Self {
        Value::Poisoned(Type::Poisoned, position)
    }

    /// Returns the type of the value.
    pub fn type_(&self) -> &Type {
        match self {
            Value::Static(_, t, _) | Value::Runtime(_, t, _) | Value::Poisoned(t, _) => t,
        }
    }

    /// Returns whether the value, or its type, is poisoned.
    pub fn is_poisoned(&self) -> bool {
        match self {
            Value::Poisoned(..) => true,
            _ => self.type_().is_poisoned(),
        }
    }
}

//
//  Span Implementations
//

impl Span for Value {
    /// Returns the position of the expression which produced the value.
    fn span(&self) -> Position {
        match *self {
            Value::Static(_, _, p) | Value::Runtime(_, _, p) | Value::Poisoned(_, p) => p,
        }
    }
}

//
//  Trait Implementations
//

impl fmt::Display for StaticValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            StaticValue::Bool(b) => write!(f, "{}", b),
            StaticValue::Int(i) => write!(f, "{}", i),
            StaticValue::Type(t) => write!(f, "{}", t),
            StaticValue::Function(id) => write!(f, "{:?}", id),
        }
    }
}
