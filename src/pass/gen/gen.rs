//! Generator
//!
//! Walks the body of every top-level function, type-checking each
//! instruction against a virtual evaluation stack, and drives the emitter.

use std::convert::TryFrom;

use crate::basic::com::{Position, Span};
use crate::model::diag::{Diagnostic, Report};
use crate::model::ir::{BinaryOperator, Chunk, Immediate, Instruction};
use crate::model::sem::*;
use crate::pass::emit::Emitter;

use super::res::Resolver;
use super::scp::Scope;

/// The Generator.
#[derive(Clone, Debug)]
pub struct Generator<'a> {
    module: &'a Module,
    entry_point: String,
}

impl<'a> Generator<'a> {
    /// Creates a generator for the module, whose entry point is `main`.
    pub fn new(module: &'a Module) -> Self {
        Generator { module, entry_point: "main".to_string() }
    }

    /// Sets the name of the entry point.
    pub fn with_entry_point(mut self, name: &str) -> Self {
        self.entry_point = name.to_string();
        self
    }

    /// Generates the artifact.
    ///
    /// Every error is reported, and generation carries on regardless; the
    /// artifact should not be trusted if any error was reported.
    pub fn generate<E: Emitter>(&self, mut emitter: E, report: &mut Report) -> String {
        let module = self.module;
        let mut resolver = Resolver::new(module);

        let entry_point = self.check_entry_point(&mut resolver, report);

        self.declare_globals(&mut resolver, &mut emitter, report);

        for &id in module.top_levels() {
            if let Definition::Fn(function) = module.get(id) {
                let generator = FunctionGenerator::new(
                    module,
                    function,
                    &mut resolver,
                    &mut emitter,
                    report,
                );
                generator.generate(id);
            }
        }

        emitter.finish(entry_point)
    }
}

//
//  Implementation Details
//

impl<'a> Generator<'a> {
    //  Returns the entry point, if it is defined as a function.
    fn check_entry_point(&self, resolver: &mut Resolver<'a>, report: &mut Report)
        -> Option<&str>
    {
        let id = match self.module.lookup(&self.entry_point) {
            Some(id) => id,
            None => {
                report.push(Diagnostic::undefined_entry_point(&self.entry_point));
                return None;
            },
        };

        let scope = Scope::new(self.module);
        let expected = Type::function(vec!(), Type::Void);
        let actual = resolver.type_of(id, &scope, report);

        log::debug!("Entry point {} : {}", self.entry_point, actual);

        let definition = self.module.get(id);

        if actual != expected {
            report.push(Diagnostic::bad_entry_point_type(&expected, &actual, definition.span()));
        }

        definition.as_function().map(|_| &*self.entry_point)
    }

    //  Declares the top-level variables, unless their type failed to resolve or
    //  cannot be stored.
    fn declare_globals<E: Emitter>(
        &self,
        resolver: &mut Resolver<'a>,
        emitter: &mut E,
        report: &mut Report,
    )
    {
        let scope = Scope::new(self.module);

        for &id in self.module.top_levels() {
            if let Definition::Var(var) = self.module.get(id) {
                let type_ = resolver.type_of(id, &scope, report);

                if type_.is_poisoned() {
                    continue;
                }

                if !is_storable(&type_) {
                    let position = chunk_position(&var.type_).unwrap_or(var.position);
                    report.push(Diagnostic::not_a_runtime_value(&type_, position));
                    continue;
                }

                emitter.global(&var.name, &type_);
            }
        }
    }
}

struct FunctionGenerator<'g, 'a, E> {
    module: &'a Module,
    function: &'a Function,
    resolver: &'g mut Resolver<'a>,
    emitter: &'g mut E,
    report: &'g mut Report,
    scope: Scope<'a>,
    result: Type,
    stack: Vec<Value>,
    loops: usize,
}

impl<'g, 'a, E: Emitter> FunctionGenerator<'g, 'a, E> {
    fn new(
        module: &'a Module,
        function: &'a Function,
        resolver: &'g mut Resolver<'a>,
        emitter: &'g mut E,
        report: &'g mut Report,
    )
        -> Self
    {
        FunctionGenerator {
            module,
            function,
            resolver,
            emitter,
            report,
            scope: Scope::new(module),
            result: Type::Void,
            stack: Vec::new(),
            loops: 0,
        }
    }

    fn generate(mut self, id: DefinitionId) {
        let type_ = match self.resolver.type_of(id, &self.scope, self.report) {
            Type::Fn(type_) => type_,
            other => unreachable!("Function {} typed {}", self.function.name, other),
        };

        log::debug!("Generating {} : {}", self.function.name, type_);

        self.result = (*type_.result).clone();

        let (module, function) = (self.module, self.function);
        let mut names = Vec::with_capacity(function.parameters.len());

        for (&p, t) in function.parameters.iter().zip(&type_.parameters) {
            let parameter = module.get(p);
            self.scope.declare_name(parameter.name(), p, self.report);
            names.push(parameter.name());

            if !t.is_poisoned() && !is_storable(t) {
                let position = match parameter {
                    Definition::Var(var) => chunk_position(&var.type_).unwrap_or(var.position),
                    _ => parameter.span(),
                };
                self.report.push(Diagnostic::not_a_runtime_value(t, position));
            }
        }

        self.emitter.begin_function(&function.name, &type_, &names);

        self.process(&function.body);

        assert!(
            self.stack.is_empty(),
            "Unbalanced stack at the end of {}: {:?}", self.function.name, self.stack
        );

        self.emitter.end_function();
    }

    fn process(&mut self, chunk: &Chunk) {
        for instruction in chunk {
            log::trace!("Processing {:?} with {} on stack", instruction, self.stack.len());

            match instruction {
                Instruction::LoadImmediate(immediate, position) =>
                    self.load_immediate(*immediate, *position),
                Instruction::LoadName(name, position) =>
                    self.load_name(name, *position),
                Instruction::LoadAttribute(name, position) =>
                    self.load_attribute(name, *position),
                Instruction::Nop(..) => (),
                Instruction::Binary(op, position) =>
                    self.binary(*op, *position),
                Instruction::Call(arguments, position) =>
                    self.call(*arguments, *position),
                Instruction::Ret(..) => self.ret(),
                Instruction::RetVoid(position) => self.ret_void(*position),
                Instruction::Pop(..) => self.pop_statement(),
                Instruction::Selection { then, otherwise, position } =>
                    self.selection(then, otherwise, *position),
                Instruction::Loop(body, ..) => self.loop_(body),
                Instruction::Break(position) => self.break_(*position),
                Instruction::Declare { mutable, name, type_, position } =>
                    self.declare(*mutable, name, type_.as_ref(), *position),
            }
        }
    }

    fn process_nested(&mut self, chunk: &Chunk) {
        let depth = self.stack.len();

        self.process(chunk);

        assert_eq!(
            depth, self.stack.len(),
            "Unbalanced nested chunk in {}", self.function.name
        );
    }

    fn load_immediate(&mut self, immediate: Immediate, position: Position) {
        let value = match immediate {
            Immediate::Bool(b) => Value::Static(StaticValue::Bool(b), Type::Bool, position),
            Immediate::Int(i) => match i64::try_from(i) {
                Ok(i) => Value::Static(StaticValue::Int(i), Type::Int, position),
                Err(_) => {
                    self.report.push(Diagnostic::integer_out_of_range(i, position));
                    Value::poisoned(position)
                },
            },
        };

        self.stack.push(value);
    }

    fn load_name(&mut self, name: &str, position: Position) {
        let id = self.scope.resolve_name(name, position, self.report);
        let type_ = self.resolver.type_of(id, &self.scope, self.report);

        let value = if type_.is_poisoned() {
            Value::Poisoned(type_, position)
        } else if let Some(value) = self.scope.get(id).static_value(id) {
            Value::Static(value, type_, position)
        } else {
            Value::Runtime(self.emitter.name(name), type_, position)
        };

        self.stack.push(value);
    }

    fn load_attribute(&mut self, name: &str, position: Position) {
        let receiver = self.pop();

        if !receiver.is_poisoned() {
            self.report.push(Diagnostic::undefined_attribute(name, receiver.type_(), position));
        }

        self.stack.push(Value::poisoned(receiver.span().extend(position)));
    }

    fn binary(&mut self, op: BinaryOperator, position: Position) {
        let right = self.pop();
        let left = self.pop();
        let span = left.span().extend(right.span());

        if left.is_poisoned() || right.is_poisoned() {
            self.stack.push(Value::poisoned(span));
            return;
        }

        let left_ok = self.check(&Type::Int, position, &left);
        let right_ok = self.check(&Type::Int, position, &right);

        if !left_ok || !right_ok {
            self.stack.push(Value::poisoned(span));
            return;
        }

        let folded = match (&left, &right) {
            (Value::Static(StaticValue::Int(l), ..), Value::Static(StaticValue::Int(r), ..)) =>
                fold(op, *l, *r),
            _ => None,
        };

        let value = match folded {
            Some(v) => Value::Static(StaticValue::Int(v), Type::Int, span),
            None => {
                let code = self.emitter.binary(op, &self.render(&left), &self.render(&right));
                Value::Runtime(code, Type::Int, span)
            },
        };

        self.stack.push(value);
    }

    fn call(&mut self, count: usize, position: Position) {
        assert!(
            self.stack.len() > count,
            "Stack underflow in call with {} arguments in {}", count, self.function.name
        );

        let arguments = self.stack.split_off(self.stack.len() - count);
        let callee = self.pop();
        let span = callee.span().extend(position);

        if callee.is_poisoned() {
            self.stack.push(Value::poisoned(span));
            return;
        }

        let type_ = match callee.type_() {
            Type::Fn(type_) => type_.clone(),
            other => {
                self.report.push(Diagnostic::not_callable(other, callee.span()));
                self.stack.push(Value::poisoned(span));
                return;
            },
        };

        if type_.parameters.len() != count {
            self.report.push(
                Diagnostic::arguments_count_mismatch(type_.parameters.len(), count, position)
            );
            self.stack.push(Value::poisoned(span));
            return;
        }

        for (expected, argument) in type_.parameters.iter().zip(&arguments) {
            self.check(expected, callee.span(), argument);
        }

        let arguments: Vec<_> = arguments.iter().map(|a| self.render(a)).collect();
        let code = self.emitter.call(&self.render(&callee), &arguments);

        self.stack.push(Value::Runtime(code, *type_.result, span));
    }

    fn ret(&mut self) {
        let value = self.pop();
        let result = self.result.clone();

        self.check(&result, self.result_position(), &value);

        let rendered = self.render(&value);
        self.emitter.ret(&rendered);
    }

    fn ret_void(&mut self, position: Position) {
        if self.result != Type::Void {
            self.report.push(Diagnostic::types_mismatch(
                &self.result,
                &Type::Void,
                self.result_position(),
                position,
            ));
        }

        self.emitter.ret_void();
    }

    fn pop_statement(&mut self) {
        if let Value::Runtime(code, ..) = self.pop() {
            self.emitter.expression(&code);
        }
    }

    fn selection(&mut self, then: &Chunk, otherwise: &Chunk, position: Position) {
        let condition = self.pop();

        self.check(&Type::Bool, position, &condition);

        let rendered = self.render(&condition);
        self.emitter.begin_selection(&rendered);
        self.process_nested(then);
        self.emitter.begin_otherwise();
        self.process_nested(otherwise);
        self.emitter.end_selection();
    }

    fn loop_(&mut self, body: &Chunk) {
        self.emitter.begin_loop();
        self.loops += 1;
        self.process_nested(body);
        self.loops -= 1;
        self.emitter.end_loop();
    }

    fn break_(&mut self, position: Position) {
        assert!(self.loops > 0, "Break outside of loop at {} in {}", position, self.function.name);

        self.emitter.break_loop();
    }

    fn declare(&mut self, mutable: bool, name: &str, type_: Option<&Chunk>, position: Position) {
        let value = self.pop();

        let (declared, expected_position) = match type_ {
            Some(chunk) => {
                let declared = self.resolver.evaluate_type(chunk, &mut self.scope, self.report);
                (declared, chunk_position(chunk).unwrap_or(position))
            },
            None => (value.type_().clone(), position),
        };

        self.check(&declared, expected_position, &value);

        let declared = if is_storable(&declared) {
            declared
        } else {
            self.report.push(Diagnostic::not_a_runtime_value(&declared, expected_position));
            Type::Poisoned
        };

        let var = Var {
            name: name.to_string(),
            type_: type_.cloned().unwrap_or_default(),
            mutable,
            position,
        };

        let id = self.scope.push_local(Definition::Var(var), declared.clone());
        self.scope.declare_name(name, id, self.report);

        let rendered = self.render(&value);
        self.emitter.declare(mutable, name, &declared, &rendered);
    }

    //  Reports a mismatch, and returns false, if the type of the value differs
    //  from the expected one.
    fn check(&mut self, expected: &Type, expected_position: Position, value: &Value) -> bool {
        if value.type_() == expected {
            return true;
        }

        self.report.push(Diagnostic::types_mismatch(
            expected,
            value.type_(),
            expected_position,
            value.span(),
        ));

        false
    }

    fn render(&self, value: &Value) -> String {
        match value {
            Value::Static(StaticValue::Int(i), ..) => self.emitter.int(*i),
            Value::Static(StaticValue::Bool(b), ..) => self.emitter.bool_(*b),
            Value::Static(StaticValue::Function(id), ..) =>
                self.emitter.name(self.scope.get(*id).name()),
            Value::Static(StaticValue::Type(..), ..) => self.emitter.unrepresentable(),
            Value::Runtime(code, ..) => code.clone(),
            Value::Poisoned(..) => self.emitter.unrepresentable(),
        }
    }

    fn pop(&mut self) -> Value {
        match self.stack.pop() {
            Some(value) => value,
            None => panic!("Stack underflow in {}", self.function.name),
        }
    }

    fn result_position(&self) -> Position {
        chunk_position(&self.function.result).unwrap_or(self.function.position)
    }
}

//  Types only exist at compile time, and `void` has no value.
fn is_storable(type_: &Type) -> bool {
    match type_ {
        Type::Type | Type::Void => false,
        _ => true,
    }
}

fn chunk_position(chunk: &Chunk) -> Option<Position> {
    let mut instructions = chunk.iter().map(|i| i.span());
    let first = instructions.next()?;
    Some(instructions.fold(first, |acc, p| acc.extend(p)))
}

fn fold(op: BinaryOperator, left: i64, right: i64) -> Option<i64> {
    use self::BinaryOperator::*;

    match op {
        Sum => Some(left.wrapping_add(right)),
        Sub => Some(left.wrapping_sub(right)),
        Mul => Some(left.wrapping_mul(right)),
        Div => left.checked_div(right),
        Rem => left.checked_rem(right),
    }
}

//
//  Tests
//
#[cfg(test)]
mod tests {
    use crate::basic::com::{FileId, Position, Range};
    use crate::model::diag::{Code, Report};
    use crate::model::ir::{BinaryOperator, Chunk};
    use crate::model::sem::*;
    use crate::pass::emit::CEmitter;

    use super::{fold, Generator};

    #[test]
    fn fold_arithmetic() {
        assert_eq!(fold(BinaryOperator::Sum, 1, 2), Some(3));
        assert_eq!(fold(BinaryOperator::Sub, 1, 2), Some(-1));
        assert_eq!(fold(BinaryOperator::Mul, i64::MAX, 2), Some(-2));
        assert_eq!(fold(BinaryOperator::Div, 7, 2), Some(3));
        assert_eq!(fold(BinaryOperator::Rem, 7, 2), Some(1));
        assert_eq!(fold(BinaryOperator::Div, 7, 0), None);
        assert_eq!(fold(BinaryOperator::Rem, i64::MIN, -1), None);
    }

    #[test]
    fn runtime_operand_is_not_folded() {
        let mut body = Chunk::new();
        body.load_name("x", pos(10))
            .load_int(1, pos(14))
            .binary(BinaryOperator::Sum, pos(12))
            .ret(pos(8));

        let (result, report) = generate_with_parameter(body);

        assert!(!report.has_errors(), "{}", report);
        assert!(result.contains("  return (spp_x + 1);\n"), "{}", result);
    }

    #[test]
    fn division_by_zero_is_not_folded() {
        let mut body = Chunk::new();
        body.load_int(1, pos(10))
            .load_int(0, pos(14))
            .binary(BinaryOperator::Div, pos(12))
            .ret(pos(8));

        let (result, report) = generate_with_parameter(body);

        assert!(!report.has_errors(), "{}", report);
        assert!(result.contains("  return (1 / 0);\n"), "{}", result);
    }

    #[test]
    fn bool_operand_mismatches() {
        let mut body = Chunk::new();
        body.load_bool(true, pos(10))
            .load_int(1, pos(14))
            .binary(BinaryOperator::Sum, pos(12))
            .ret(pos(8));

        let (_, report) = generate_with_parameter(body);

        assert_eq!(report.codes(), vec!(Code::TypesMismatch));
        assert_eq!(report.diagnostics()[0].position(), Some(pos(10)));
    }

    #[test]
    fn break_at_loop_level() {
        let mut body = Chunk::new();
        body.loop_(break_chunk(), pos(10)).load_int(0, pos(20)).ret(pos(18));

        let (result, report) = generate_with_parameter(body);

        assert!(!report.has_errors(), "{}", report);
        assert!(result.contains("  for (;;) {\n    break;\n  }\n  return 0;\n"), "{}", result);
    }

    #[test]
    #[should_panic]
    fn break_outside_loop() {
        let mut body = Chunk::new();
        body.break_(pos(10));

        generate_with_parameter(body);
    }

    #[test]
    #[should_panic]
    fn unbalanced_stack() {
        let mut body = Chunk::new();
        body.load_int(1, pos(10));

        generate_with_parameter(body);
    }

    #[test]
    #[should_panic]
    fn stack_underflow() {
        let mut body = Chunk::new();
        body.pop(pos(10));

        generate_with_parameter(body);
    }

    #[test]
    fn custom_entry_point() {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let mut body = Chunk::new();
        body.ret_void(pos(5));
        module.define_function("start", vec!(), name("void", pos(2)), body, pos(1), &mut report);

        let result = Generator::new(&module)
            .with_entry_point("start")
            .generate(CEmitter::new(), &mut report);

        assert!(!report.has_errors(), "{}", report);
        assert!(result.ends_with("{\n  spp_start();\n  return 0;\n}\n"), "{}", result);
    }

    //  Generates `f(x: int) -> int` with the given body, alongside `main`.
    fn generate_with_parameter(body: Chunk) -> (String, Report) {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let mut main = Chunk::new();
        main.ret_void(pos(1));
        module.define_function("main", vec!(), name("void", pos(0)), main, pos(0), &mut report);

        module.define_function(
            "f",
            vec!(("x".to_string(), name("int", pos(4)), pos(2))),
            name("int", pos(6)),
            body,
            pos(1),
            &mut report,
        );

        let result = Generator::new(&module).generate(CEmitter::new(), &mut report);
        (result, report)
    }

    fn break_chunk() -> Chunk {
        let mut chunk = Chunk::new();
        chunk.break_(pos(11));
        chunk
    }

    fn name(name: &str, position: Position) -> Chunk {
        let mut chunk = Chunk::new();
        chunk.load_name(name, position);
        chunk
    }

    fn pos(offset: usize) -> Position {
        Position::new(FileId::new(0), Range::new(offset, 1))
    }
}
