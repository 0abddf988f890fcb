//! Types

use std::fmt;

/// A Type.
///
/// Equality is structural, except for `Poisoned` which compares equal to any
/// type, on either side. As a result, equality is not transitive and `Type`
/// does not implement `Eq` nor `Hash`.
#[derive(Clone, Debug)]
pub enum Type {
    /// The unit type.
    Void,
    /// A pointer-width signed integer.
    Int,
    /// A boolean.
    Bool,
    /// A function.
    Fn(FunctionType),
    /// The type of types.
    Type,
    /// The type of an erroneous expression, already reported.
    Poisoned,
}

/// A function type.
#[derive(Clone, Debug)]
pub struct FunctionType {
    /// The types of the parameters, in order.
    pub parameters: Vec<Type>,
    /// The return type.
    pub result: Box<Type>,
}

//
//  Public interface
//

impl Type {
    /// Returns a function type.
    pub fn function(parameters: Vec<Type>, result: Type) -> Self {
        Type::Fn(FunctionType::new(parameters, result))
    }

    /// Returns whether the type is `Poisoned`.
    pub fn is_poisoned(&self) -> bool {
        match self {
            Type::Poisoned => true,
            _ => false,
        }
    }
}

impl FunctionType {
    /// Creates a function type.
    pub fn new(parameters: Vec<Type>, result: Type) -> Self {
        FunctionType { parameters, result: Box::new(result) }
    }
}

//
//  Trait Implementations
//

impl PartialEq for Type {
    fn eq(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Poisoned, _) | (_, Type::Poisoned) => true,
            (Type::Void, Type::Void) | (Type::Int, Type::Int) => true,
            (Type::Bool, Type::Bool) | (Type::Type, Type::Type) => true,
            (Type::Fn(left), Type::Fn(right)) => left == right,
            _ => false,
        }
    }
}

impl PartialEq for FunctionType {
    fn eq(&self, other: &FunctionType) -> bool {
        self.parameters.len() == other.parameters.len()
            && self.parameters.iter().zip(&other.parameters).all(|(l, r)| l == r)
            && self.result == other.result
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            Type::Void => write!(f, "void"),
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Fn(fun) => write!(f, "{}", fun),
            Type::Type => write!(f, "type"),
            Type::Poisoned => write!(f, "?"),
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "fn(")?;
        for (i, p) in self.parameters.iter().enumerate() {
            if i != 0 { write!(f, ", ")? }
            write!(f, "{}", p)?;
        }
        write!(f, ") -> {}", self.result)
    }
}

//
//  Tests
//
#[cfg(test)]
mod tests {
    use super::Type;

    fn all() -> Vec<Type> {
        vec!(
            Type::Void,
            Type::Int,
            Type::Bool,
            Type::Type,
            Type::Poisoned,
            Type::function(vec!(), Type::Void),
            Type::function(vec!(Type::Int, Type::Bool), Type::Int),
        )
    }

    #[test]
    fn poisoned_absorbs_everything() {
        for t in all() {
            assert!(Type::Poisoned == t, "Poisoned != {}", t);
            assert!(t == Type::Poisoned, "{} != Poisoned", t);
        }
    }

    #[test]
    fn poisoned_function_matches_same_arity() {
        let poisoned = Type::function(vec!(Type::Poisoned, Type::Poisoned), Type::Poisoned);

        assert!(poisoned == Type::function(vec!(Type::Int, Type::Bool), Type::Void));
        assert!(Type::function(vec!(Type::Void, Type::Int), Type::Int) == poisoned);
        assert!(poisoned != Type::function(vec!(Type::Int), Type::Void));
    }

    #[test]
    fn structural_equality() {
        assert!(Type::Int == Type::Int);
        assert!(Type::Int != Type::Void);
        assert!(Type::Type != Type::Int);
        assert!(Type::function(vec!(), Type::Void) == Type::function(vec!(), Type::Void));
        assert!(Type::function(vec!(), Type::Void) != Type::function(vec!(), Type::Int));
        assert!(Type::function(vec!(Type::Int), Type::Void) != Type::function(vec!(Type::Bool), Type::Void));
        assert!(Type::function(vec!(), Type::Void) != Type::function(vec!(Type::Int), Type::Void));
    }

    #[test]
    fn display() {
        let t = Type::function(vec!(Type::Int, Type::function(vec!(), Type::Bool)), Type::Void);

        assert_eq!(t.to_string(), "fn(int, fn() -> bool) -> void");
        assert_eq!(Type::Poisoned.to_string(), "?");
    }
}
