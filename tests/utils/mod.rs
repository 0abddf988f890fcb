/// Utilities for the integration tests

use spp_compile::basic::com::{FileId, Position, Range};
use spp_compile::model::diag::{Code, Report};
use spp_compile::model::ir::Chunk;
use spp_compile::model::sem::{Definition, DefinitionId, Module, Var};
use spp_compile::pass::emit::CEmitter;
use spp_compile::pass::gen::Generator;

/// A module under construction, alongside the report of its construction.
pub struct Fixture {
    pub module: Module,
    pub report: Report,
}

impl Fixture {
    pub fn new() -> Self {
        Fixture { module: Module::new(pos(0)), report: Report::new() }
    }

    /// Defines a function, whose parameters are given as name and type name.
    pub fn function(
        &mut self,
        name: &str,
        parameters: &[(&str, &str)],
        result: &str,
        body: Chunk,
        offset: usize,
    )
        -> DefinitionId
    {
        let parameters: Vec<_> = parameters.iter()
            .enumerate()
            .map(|(i, (n, t))| {
                let at = offset + 2 * i + 1;
                (n.to_string(), type_(t, at), pos(at))
            })
            .collect();

        self.module.define_function(
            name,
            parameters,
            type_(result, offset),
            body,
            pos(offset),
            &mut self.report,
        )
    }

    /// Defines a top-level variable, whose type is given by name.
    pub fn global(&mut self, name: &str, type_name: &str, offset: usize) -> DefinitionId {
        let var = Var {
            name: name.to_string(),
            type_: type_(type_name, offset + 1),
            mutable: true,
            position: pos(offset),
        };

        self.module.define(Definition::Var(var), &mut self.report)
    }

    /// Defines `main`, taking no parameter and returning nothing.
    pub fn main(&mut self, body: Chunk) -> DefinitionId {
        self.function("main", &[], "void", body, 0)
    }

    /// Generates the module, returning the artifact and the codes of all
    /// diagnostics reported.
    pub fn generate(&mut self) -> (String, Vec<Code>) {
        let artifact = Generator::new(&self.module).generate(CEmitter::new(), &mut self.report);
        (artifact, self.report.codes())
    }
}

/// A type expression consisting of a single name.
pub fn type_(name: &str, offset: usize) -> Chunk {
    let mut chunk = Chunk::new();
    chunk.load_name(name, pos(offset));
    chunk
}

/// A chunk consisting of a single `RetVoid`.
pub fn ret_void() -> Chunk {
    let mut chunk = Chunk::new();
    chunk.ret_void(pos(99));
    chunk
}

pub fn pos(offset: usize) -> Position {
    Position::new(FileId::new(0), Range::new(offset, 1))
}
