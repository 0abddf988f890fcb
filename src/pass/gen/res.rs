//! Type resolution, and compile-time evaluation of type expressions.
//!
//! The type of a `Var` or `Fn` definition is computed from its type
//! expressions on first request, then memoized for the whole compilation.
//!
//! Type expressions are evaluated by a restricted interpreter, which only
//! understands `LoadName` and `RetVoid`.

use crate::basic::com::{Position, Span};
use crate::basic::sea::Table;
use crate::model::diag::{Diagnostic, Report};
use crate::model::ir::{Chunk, Instruction};
use crate::model::sem::*;

use super::scp::Scope;

/// The Resolver.
///
/// Owns the memoized types of the definitions of a module.
#[derive(Clone, Debug)]
pub struct Resolver<'a> {
    module: &'a Module,
    memo: Table<DefinitionId, Memo>,
}

impl<'a> Resolver<'a> {
    /// Creates a resolver for the module, with nothing resolved yet.
    pub fn new(module: &'a Module) -> Self {
        Resolver { module, memo: Table::new() }
    }

    /// Returns the type of the definition, computing it if necessary.
    ///
    /// The types of local definitions are read from the scope, those of
    /// top-level definitions and parameters are computed once, evaluating
    /// their type expressions in the global scope.
    ///
    /// A definition whose type expressions depend on its own type is reported
    /// as recursive, and typed `Poisoned`.
    pub fn type_of(&mut self, id: DefinitionId, scope: &Scope, report: &mut Report)
        -> Type
    {
        if let Some(type_) = scope.local_type(id) {
            return type_.clone();
        }

        let module = self.module;
        let definition = module.get(id);

        if let Some(type_) = definition.intrinsic_type() {
            return type_;
        }

        let memo = self.memo.entry(&id);

        match *memo {
            Memo::Resolved(ref type_) => return type_.clone(),
            Memo::InProgress => {
                report.push(Diagnostic::recursive_type(definition.name(), definition.span()));
                return Type::Poisoned;
            },
            Memo::Unresolved => *memo = Memo::InProgress,
        }

        let type_ = match definition {
            Definition::Var(var) => self.evaluate_global_type(&var.type_, report),
            Definition::Fn(function) => self.resolve_function(function, scope, report),
            Definition::Static(..) | Definition::Poisoned(..) =>
                unreachable!("{:?} has an intrinsic type", id),
        };

        log::debug!("Resolved {:?} ({}) to {}", id, definition.name(), type_);

        *self.memo.entry(&id) = Memo::Resolved(type_.clone());
        type_
    }

    /// Evaluates a type expression, in the given scope.
    ///
    /// Panics: if the chunk leaves nothing on the stack.
    pub fn evaluate_type(&mut self, chunk: &Chunk, scope: &mut Scope, report: &mut Report)
        -> Type
    {
        match self.evaluate(chunk, scope, report) {
            Value::Static(StaticValue::Type(type_), Type::Type, _) => type_,
            Value::Poisoned(..) => Type::Poisoned,
            value if value.is_poisoned() => Type::Poisoned,
            value => {
                report.push(Diagnostic::not_a_type(value.type_(), value.span()));
                Type::Poisoned
            },
        }
    }

    /// Evaluates a chunk at compile time, returning the top of the stack.
    ///
    /// Evaluation stops at the first `RetVoid`; any instruction other than
    /// `LoadName` is reported as not evaluable, stopping evaluation with a
    /// `Poisoned` result.
    ///
    /// Panics: if the chunk leaves nothing on the stack.
    pub fn evaluate(&mut self, chunk: &Chunk, scope: &mut Scope, report: &mut Report)
        -> Value
    {
        let mut stack = Vec::new();

        for instruction in chunk {
            log::trace!("Evaluating {:?}", instruction);

            match instruction {
                Instruction::LoadName(name, position) => {
                    let value = self.evaluate_name(name, *position, scope, report);
                    stack.push(value);
                },
                Instruction::RetVoid(..) => break,
                _ => {
                    let position = instruction.span();
                    report.push(Diagnostic::not_evaluable(position));
                    return Value::poisoned(position);
                },
            }
        }

        match stack.pop() {
            Some(value) => value,
            None => panic!("Type expression leaves no value on the stack: {:?}", chunk),
        }
    }
}

//
//  Implementation Details
//

#[derive(Clone, Debug)]
enum Memo {
    Unresolved,
    InProgress,
    Resolved(Type),
}

impl<'a> Resolver<'a> {
    fn resolve_function(&mut self, function: &Function, scope: &Scope, report: &mut Report)
        -> Type
    {
        let parameters = function.parameters.iter()
            .map(|&p| self.type_of(p, scope, report))
            .collect();

        let result = self.evaluate_global_type(&function.result, report);

        Type::function(parameters, result)
    }

    fn evaluate_global_type(&mut self, chunk: &Chunk, report: &mut Report) -> Type {
        let mut scope = Scope::new(self.module);
        self.evaluate_type(chunk, &mut scope, report)
    }

    fn evaluate_name(
        &mut self,
        name: &str,
        position: Position,
        scope: &mut Scope,
        report: &mut Report,
    )
        -> Value
    {
        let id = scope.resolve_name(name, position, report);
        let type_ = self.type_of(id, scope, report);

        if type_.is_poisoned() {
            return Value::Poisoned(type_, position);
        }

        match scope.get(id).static_value(id) {
            Some(value) => Value::Static(value, type_, position),
            None => {
                report.push(Diagnostic::not_a_static_value(position));
                Value::poisoned(position)
            },
        }
    }
}

impl Default for Memo {
    fn default() -> Self { Memo::Unresolved }
}
