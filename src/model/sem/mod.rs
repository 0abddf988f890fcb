//! Semantic model.
//!
//! This is the model describing what the IR means: the types, the values
//! manipulated on the evaluation stack, and the definitions names resolve to.
//!
//! The model is shared by compile-time evaluation of type expressions and by
//! the translation of function bodies; a `Poisoned` variant in each of `Type`,
//! `Value` and `Definition` stands in for an erroneous entity which has
//! already been reported, and is the sole mechanism preventing cascades of
//! diagnostics.

mod def;
mod module;
mod typ;
mod value;

pub use self::def::*;
pub use self::module::*;
pub use self::typ::*;
pub use self::value::*;
