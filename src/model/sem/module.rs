//! Module, aka the top-level table.

use std::collections::HashMap;
use std::fmt;

use crate::basic::com::{Position, Span};
use crate::basic::sea::Table;
use crate::model::diag::{Diagnostic, Report};
use crate::model::ir::{Chunk, ChunkPrinter};

use super::*;

/// A Module.
///
/// The arena of all definitions of a translation unit, and the table of
/// top-level names, in declaration order.
///
/// A new module is seeded with the built-ins: `void`, `int` and `bool`.
#[derive(Clone, Debug)]
pub struct Module {
    definitions: Table<DefinitionId, Definition>,
    names: HashMap<String, DefinitionId>,
    top_levels: Vec<DefinitionId>,
}

//
//  Public interface
//

impl Module {
    /// Creates a module, seeded with the built-ins, located at `position`.
    pub fn new(position: Position) -> Self {
        let mut module = Module {
            definitions: Table::new(),
            names: HashMap::new(),
            top_levels: Vec::new(),
        };

        let builtins = [("void", Type::Void), ("int", Type::Int), ("bool", Type::Bool)];

        for (name, type_) in builtins.iter().cloned() {
            let id = module.push(Definition::Static(Static::type_(name, type_, position)));
            module.names.insert(name.to_string(), id);
            module.top_levels.push(id);
        }

        module
    }

    /// Returns the number of definitions.
    pub fn len(&self) -> usize { self.definitions.len() }

    /// Returns the definition.
    ///
    /// Panics: if the ID does not belong to the module.
    pub fn get(&self, id: DefinitionId) -> &Definition { self.definitions.at(&id) }

    /// Returns the top-level definition bound to `name`, if any.
    pub fn lookup(&self, name: &str) -> Option<DefinitionId> {
        self.names.get(name).cloned()
    }

    /// Returns the top-level definitions, in declaration order.
    pub fn top_levels(&self) -> &[DefinitionId] { &self.top_levels }

    /// Pushes a definition in the arena, without binding any name to it.
    ///
    /// This is used for function parameters.
    pub fn push(&mut self, definition: Definition) -> DefinitionId {
        self.definitions.extend(definition)
    }

    /// Pushes a definition in the arena and binds it at the top-level.
    ///
    /// If the name is already bound, a redefinition is reported and the
    /// original binding is kept.
    pub fn define(&mut self, definition: Definition, report: &mut Report) -> DefinitionId {
        let name = definition.name().to_string();
        let position = definition.span();
        let id = self.push(definition);

        if let Some(original) = self.lookup(&name) {
            report.push(Diagnostic::member_redefinition(
                &name,
                position,
                self.get(original).span(),
            ));
            return id;
        }

        self.names.insert(name, id);
        self.top_levels.push(id);
        id
    }

    /// Pushes a function, and its parameters, and binds it at the top-level.
    ///
    /// The parameters are given as name, type expression, and position.
    pub fn define_function<I>(
        &mut self,
        name: &str,
        parameters: I,
        result: Chunk,
        body: Chunk,
        position: Position,
        report: &mut Report,
    )
        -> DefinitionId
        where
            I: IntoIterator<Item = (String, Chunk, Position)>
    {
        let parameters = parameters.into_iter()
            .map(|(name, type_, position)| {
                self.push(Definition::Var(Var { name, type_, mutable: false, position }))
            })
            .collect();

        let function = Function { name: name.to_string(), parameters, result, body, position };

        self.define(Definition::Fn(function), report)
    }
}

//
//  Trait Implementations
//

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        writeln!(f, "TopLevels {{")?;

        for &id in &self.top_levels {
            match self.get(id) {
                Definition::Static(s) => {
                    writeln!(f, "  {:?} -> Static({} {})", s.name, s.type_, s.value)?;
                },
                Definition::Var(v) => {
                    writeln!(f, "  {:?} -> Var", v.name)?;
                    write_chunk(f, "type", &v.type_)?;
                },
                Definition::Fn(fun) => {
                    writeln!(f, "  {:?} -> Fn", fun.name)?;
                    for &p in &fun.parameters {
                        if let Definition::Var(v) = self.get(p) {
                            writeln!(f, "    parameter {:?}", v.name)?;
                            write_chunk(f, "type", &v.type_)?;
                        }
                    }
                    write_chunk(f, "result", &fun.result)?;
                    write_chunk(f, "body", &fun.body)?;
                },
                Definition::Poisoned(p) => {
                    writeln!(f, "  {:?} -> Poisoned", p.name)?;
                },
            }
        }

        writeln!(f, "}}")
    }
}

fn write_chunk(f: &mut fmt::Formatter, label: &str, chunk: &Chunk)
    -> Result<(), fmt::Error>
{
    writeln!(f, "    {}:", label)?;
    ChunkPrinter::new(chunk).set_indentation(6).write(f)
}

//
//  Tests
//
#[cfg(test)]
mod tests {
    use crate::basic::com::{FileId, Position, Range, Span};
    use crate::model::diag::{Code, Report};
    use crate::model::ir::Chunk;

    use super::*;

    #[test]
    fn builtins_are_seeded() {
        let module = Module::new(pos(0));

        for name in &["void", "int", "bool"] {
            let id = module.lookup(name).expect("Builtin");
            assert!(matches!(module.get(id).intrinsic_type(), Some(Type::Type)));
        }

        assert_eq!(module.top_levels().len(), 3);
    }

    #[test]
    fn redefinition_keeps_first_binding() {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let first = module.define_function("f", vec!(), void(), Chunk::new(), pos(10), &mut report);
        let second = module.define_function("f", vec!(), void(), Chunk::new(), pos(30), &mut report);

        assert_ne!(first, second);
        assert_eq!(module.lookup("f"), Some(first));
        assert_eq!(report.codes(), vec!(Code::MemberRedefinition));

        let positions: Vec<_> = report.diagnostics()[0].labels.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec!(pos(30), pos(10)));
        assert_eq!(module.get(second).span(), pos(30));
    }

    #[test]
    fn redefinition_of_builtin() {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let var = Var { name: "int".to_string(), position: pos(5), ..Default::default() };
        module.define(Definition::Var(var), &mut report);

        assert_eq!(report.codes(), vec!(Code::MemberRedefinition));
        assert!(matches!(module.get(module.lookup("int").unwrap()), Definition::Static(..)));
    }

    #[test]
    fn parameters_are_not_top_levels() {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let mut int = Chunk::new();
        int.load_name("int", pos(9));

        let f = module.define_function(
            "f",
            vec!(("x".to_string(), int, pos(7))),
            void(),
            Chunk::new(),
            pos(0),
            &mut report,
        );

        let parameters = &module.get(f).as_function().unwrap().parameters;
        assert_eq!(parameters.len(), 1);
        assert_eq!(module.get(parameters[0]).name(), "x");
        assert_eq!(module.lookup("x"), None);
        assert!(!report.has_errors());
    }

    #[test]
    fn display() {
        let mut report = Report::new();
        let mut module = Module::new(pos(0));

        let mut body = Chunk::new();
        body.ret_void(pos(1));

        module.define_function("main", vec!(), void(), body, pos(0), &mut report);

        assert_eq!(
            module.to_string(),
            concat!(
                "TopLevels {\n",
                "  \"void\" -> Static(type void)\n",
                "  \"int\" -> Static(type int)\n",
                "  \"bool\" -> Static(type bool)\n",
                "  \"main\" -> Fn\n",
                "    result:\n",
                "      LoadName \"void\"\n",
                "    body:\n",
                "      RetVoid\n",
                "}\n",
            )
        );
    }

    fn void() -> Chunk {
        let mut chunk = Chunk::new();
        chunk.load_name("void", pos(0));
        chunk
    }

    fn pos(offset: usize) -> Position {
        Position::new(FileId::new(0), Range::new(offset, 1))
    }
}
