//! Emission of the target language.
//!
//! The generator drives an `Emitter` statement by statement, handing it
//! resolved types and already rendered expressions; the emitter accumulates
//! the text of the artifact.

mod c;

pub use self::c::CEmitter;

use crate::model::ir::BinaryOperator;
use crate::model::sem::{FunctionType, Type};

/// An Emitter.
///
/// Expressions are rendered eagerly, as strings, by the renderer methods and
/// are then embedded in statements. Names are handed raw to the statement
/// methods, and sanitized by the emitter.
pub trait Emitter {
    /// Declares a global variable.
    fn global(&mut self, name: &str, type_: &Type);

    /// Opens a function definition, with the names of its parameters, in
    /// order.
    fn begin_function(&mut self, name: &str, type_: &FunctionType, parameters: &[&str]);

    /// Closes the current function definition.
    fn end_function(&mut self);

    /// Returns the value.
    fn ret(&mut self, value: &str);

    /// Returns nothing.
    fn ret_void(&mut self);

    /// Declares a local variable.
    ///
    /// The variable is visible until the end of the function, whichever
    /// block it is declared in.
    fn declare(&mut self, mutable: bool, name: &str, type_: &Type, value: &str);

    /// Evaluates the expression, discarding its value.
    fn expression(&mut self, value: &str);

    /// Opens a conditional, and its then branch.
    fn begin_selection(&mut self, condition: &str);

    /// Closes the then branch, and opens the otherwise branch.
    fn begin_otherwise(&mut self);

    /// Closes the conditional.
    fn end_selection(&mut self);

    /// Opens an unconditional loop.
    fn begin_loop(&mut self);

    /// Closes the loop.
    fn end_loop(&mut self);

    /// Exits the innermost loop.
    fn break_loop(&mut self);

    /// Renders a reference to a named entity.
    fn name(&self, name: &str) -> String;

    /// Renders an integral literal.
    fn int(&self, value: i64) -> String;

    /// Renders a boolean literal.
    fn bool_(&self, value: bool) -> String;

    /// Renders a value which cannot be represented in the target language.
    fn unrepresentable(&self) -> String;

    /// Renders a binary operation.
    fn binary(&self, op: BinaryOperator, left: &str, right: &str) -> String;

    /// Renders a call.
    fn call(&self, callee: &str, arguments: &[String]) -> String;

    /// Completes the artifact.
    ///
    /// The entry thunk, invoking `entry_point`, is only emitted if an entry
    /// point is given.
    fn finish(self, entry_point: Option<&str>) -> String where Self: Sized;
}
