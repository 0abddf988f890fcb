//! C backend.

use crate::model::ir::BinaryOperator;
use crate::model::sem::{FunctionType, Type};

use super::Emitter;

/// A C Emitter.
///
/// Produces a single C99 translation unit: includes, prototypes of every
/// function, global variables, function definitions, and finally the `main`
/// thunk invoking the entry point.
///
/// C scopes variables by block, whereas a local variable is visible in the
/// whole function it is declared in; variables declared in a nested block are
/// thus declared at the top of the function, and assigned in place.
///
/// Identifiers are prefixed to avoid clashing with C keywords, and with the
/// thunk itself; the prefix should therefore not be empty.
#[derive(Clone, Debug)]
pub struct CEmitter {
    prefix: String,
    indentation: usize,
    depth: usize,
    prototypes: String,
    globals: String,
    definitions: String,
    locals: String,
    body: String,
}

impl CEmitter {
    /// Creates an instance, indenting by 2 and prefixing with `spp_`.
    pub fn new() -> Self {
        CEmitter {
            prefix: "spp_".to_string(),
            indentation: 2,
            depth: 0,
            prototypes: String::new(),
            globals: String::new(),
            definitions: String::new(),
            locals: String::new(),
            body: String::new(),
        }
    }

    /// Sets the number of spaces per level of indentation.
    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    /// Sets the prefix of identifiers.
    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = prefix.to_string();
        self
    }
}

impl Default for CEmitter {
    fn default() -> Self { CEmitter::new() }
}

impl Emitter for CEmitter {
    fn global(&mut self, name: &str, type_: &Type) {
        let declaration = self.declarator(type_, &self.name(name));
        self.globals.push_str(&declaration);
        self.globals.push_str(";\n");
    }

    fn begin_function(&mut self, name: &str, type_: &FunctionType, parameters: &[&str]) {
        debug_assert_eq!(type_.parameters.len(), parameters.len());

        let parameters: Vec<_> = type_.parameters.iter()
            .zip(parameters)
            .map(|(t, n)| self.declarator(t, &self.name(n)))
            .collect();

        let parameters =
            if parameters.is_empty() { "void".to_string() } else { parameters.join(", ") };

        let header = self.declarator(
            &type_.result,
            &format!("{}({})", self.name(name), parameters),
        );

        self.prototypes.push_str(&header);
        self.prototypes.push_str(";\n");

        self.definitions.push_str(&header);
        self.definitions.push_str("\n{\n");
        self.depth = 1;
    }

    fn end_function(&mut self) {
        debug_assert_eq!(self.depth, 1, "Unbalanced blocks");

        self.depth = 0;
        self.definitions.push_str(&self.locals);
        self.definitions.push_str(&self.body);
        self.definitions.push_str("}\n\n");

        self.locals.clear();
        self.body.clear();
    }

    fn ret(&mut self, value: &str) { self.line(&format!("return {};", value)); }

    fn ret_void(&mut self) { self.line("return;"); }

    fn declare(&mut self, mutable: bool, name: &str, type_: &Type, value: &str) {
        let name = self.name(name);

        if self.depth > 1 {
            let indent = " ".repeat(self.indentation);
            let declaration = self.declarator(type_, &name);
            self.locals.push_str(&format!("{}{};\n", indent, declaration));

            self.line(&format!("{} = {};", name, value));
            return;
        }

        let declarator = if mutable {
            self.declarator(type_, &name)
        } else {
            self.declarator(type_, &format!("const {}", name))
        };

        self.line(&format!("{} = {};", declarator, value));
    }

    fn expression(&mut self, value: &str) { self.line(&format!("{};", value)); }

    fn begin_selection(&mut self, condition: &str) {
        self.line(&format!("if ({}) {{", condition));
        self.depth += 1;
    }

    fn begin_otherwise(&mut self) {
        self.depth -= 1;
        self.line("} else {");
        self.depth += 1;
    }

    fn end_selection(&mut self) { self.close(); }

    fn begin_loop(&mut self) {
        self.line("for (;;) {");
        self.depth += 1;
    }

    fn end_loop(&mut self) { self.close(); }

    fn break_loop(&mut self) { self.line("break;"); }

    fn name(&self, name: &str) -> String { format!("{}{}", self.prefix, name) }

    fn int(&self, value: i64) -> String {
        if value < 0 { format!("({})", value) } else { value.to_string() }
    }

    fn bool_(&self, value: bool) -> String { value.to_string() }

    fn unrepresentable(&self) -> String { UNREPRESENTABLE.to_string() }

    fn binary(&self, op: BinaryOperator, left: &str, right: &str) -> String {
        use self::BinaryOperator::*;

        let symbol = match op {
            Sum => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
        };

        format!("({} {} {})", left, symbol, right)
    }

    fn call(&self, callee: &str, arguments: &[String]) -> String {
        format!("{}({})", callee, arguments.join(", "))
    }

    fn finish(self, entry_point: Option<&str>) -> String {
        let mut result = String::from("#include <stdbool.h>\n#include <stdint.h>\n\n");

        for section in &[&self.prototypes, &self.globals] {
            if !section.is_empty() {
                result.push_str(section);
                result.push('\n');
            }
        }

        result.push_str(&self.definitions);

        if let Some(entry_point) = entry_point {
            let indent = " ".repeat(self.indentation);

            result.push_str("int main(void)\n{\n");
            result.push_str(&format!("{}{}();\n", indent, self.name(entry_point)));
            result.push_str(&format!("{}return 0;\n", indent));
            result.push_str("}\n");
        }

        result
    }
}

//
//  Implementation Details
//

const UNREPRESENTABLE: &str = "__spp_unrepresentable";

impl CEmitter {
    //  Returns the declaration of `name` with type `type_`, or the abstract
    //  declarator of the type if `name` is empty.
    fn declarator(&self, type_: &Type, name: &str) -> String {
        let base = match type_ {
            Type::Fn(f) => {
                let parameters: Vec<_> = f.parameters.iter()
                    .map(|p| self.declarator(p, ""))
                    .collect();

                let parameters =
                    if parameters.is_empty() { "void".to_string() } else { parameters.join(", ") };

                return self.declarator(&f.result, &format!("(*{})({})", name, parameters));
            },
            Type::Void => "void",
            Type::Int => "intptr_t",
            Type::Bool => "bool",
            Type::Type | Type::Poisoned => UNREPRESENTABLE,
        };

        if name.is_empty() { base.to_string() } else { format!("{} {}", base, name) }
    }

    fn line(&mut self, text: &str) {
        for _ in 0..(self.depth * self.indentation) {
            self.body.push(' ');
        }
        self.body.push_str(text);
        self.body.push('\n');
    }

    fn close(&mut self) {
        self.depth -= 1;
        self.line("}");
    }
}
