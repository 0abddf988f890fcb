//! Intermediate Representation, aka IR.
//!
//! The IR is the output of the parser: an ordered, nestable sequence of
//! instructions for a block-structured stack machine.
//!
//! A `Chunk` describes one expression, statement list, or nested block. Each
//! instruction either pushes values onto, or pops values from, a virtual
//! evaluation stack; control flow is expressed by nesting chunks within the
//! `Selection`, `Loop` and `Declare` instructions.
//!
//! Surface control flow is desugared by the parser:
//! -   `if c: a elif d: b else: e` becomes nested `Selection`s,
//! -   `while c: body` becomes `Loop(c; Selection(body, Break))`,
//! -   `let [mut] name [: type] = expr` becomes `expr; Declare`.

mod display;

pub use self::display::ChunkPrinter;

use std::fmt;

use crate::basic::com::{Position, Span};

/// An immediate value, embedded in the instruction stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Immediate {
    /// A boolean literal.
    Bool(bool),
    /// An unsigned integral literal.
    Int(u64),
}

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    /// Addition.
    Sum,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder.
    Rem,
}

/// An instruction.
///
/// Every instruction carries the position of the source it was produced from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    /// Pushes an immediate.
    LoadImmediate(Immediate, Position),
    /// Pushes the value bound to a name.
    LoadName(String, Position),
    /// Pops a receiver, pushes its named attribute.
    LoadAttribute(String, Position),
    /// An intentionally empty statement.
    Nop(Position),
    /// Pops two operands, pushes the result of the operator.
    Binary(BinaryOperator, Position),
    /// Pops the arguments then the callee, pushes the result of the call.
    Call(usize, Position),
    /// Pops a value, returns it.
    Ret(Position),
    /// Returns nothing.
    RetVoid(Position),
    /// Pops a value, discards it.
    Pop(Position),
    /// Pops a condition, executes one of two chunks.
    Selection {
        /// Chunk executed when the condition holds.
        then: Chunk,
        /// Chunk executed when the condition does not hold.
        otherwise: Chunk,
        /// Position.
        position: Position,
    },
    /// Executes the chunk, forever.
    Loop(Chunk, Position),
    /// Exits the innermost loop.
    Break(Position),
    /// Pops an initializer, binds it to a new variable.
    Declare {
        /// Whether the variable may be re-assigned.
        mutable: bool,
        /// Name of the variable.
        name: String,
        /// Type expression of the variable, if annotated.
        type_: Option<Chunk>,
        /// Position.
        position: Position,
    },
}

/// A Chunk.
///
/// An append-only sequence of instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Chunk {
    instructions: Vec<Instruction>,
}

//
//  Public interface
//

impl Chunk {
    /// Creates an empty chunk.
    pub fn new() -> Self { Default::default() }

    /// Returns whether the chunk contains no instruction.
    pub fn is_empty(&self) -> bool { self.instructions.is_empty() }

    /// Returns the number of instructions, nested chunks excluded.
    pub fn len(&self) -> usize { self.instructions.len() }

    /// Returns the instructions.
    pub fn instructions(&self) -> &[Instruction] { &self.instructions }

    /// Returns an iterator over the instructions.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Appends an instruction.
    pub fn push(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    /// Appends a `LoadImmediate` of a boolean.
    pub fn load_bool(&mut self, value: bool, position: Position) -> &mut Self {
        self.push(Instruction::LoadImmediate(Immediate::Bool(value), position))
    }

    /// Appends a `LoadImmediate` of an integral.
    pub fn load_int(&mut self, value: u64, position: Position) -> &mut Self {
        self.push(Instruction::LoadImmediate(Immediate::Int(value), position))
    }

    /// Appends a `LoadName`.
    pub fn load_name(&mut self, name: &str, position: Position) -> &mut Self {
        self.push(Instruction::LoadName(name.to_string(), position))
    }

    /// Appends a `LoadAttribute`.
    pub fn load_attribute(&mut self, name: &str, position: Position)
        -> &mut Self
    {
        self.push(Instruction::LoadAttribute(name.to_string(), position))
    }

    /// Appends a `Nop`.
    pub fn nop(&mut self, position: Position) -> &mut Self {
        self.push(Instruction::Nop(position))
    }

    /// Appends a binary operator.
    pub fn binary(&mut self, op: BinaryOperator, position: Position)
        -> &mut Self
    {
        self.push(Instruction::Binary(op, position))
    }

    /// Appends a `Call`.
    pub fn call(&mut self, arguments: usize, position: Position) -> &mut Self {
        self.push(Instruction::Call(arguments, position))
    }

    /// Appends a `Ret`.
    pub fn ret(&mut self, position: Position) -> &mut Self {
        self.push(Instruction::Ret(position))
    }

    /// Appends a `RetVoid`.
    pub fn ret_void(&mut self, position: Position) -> &mut Self {
        self.push(Instruction::RetVoid(position))
    }

    /// Appends a `Pop`.
    pub fn pop(&mut self, position: Position) -> &mut Self {
        self.push(Instruction::Pop(position))
    }

    /// Appends a `Selection`.
    pub fn selection(&mut self, then: Chunk, otherwise: Chunk, position: Position)
        -> &mut Self
    {
        self.push(Instruction::Selection { then, otherwise, position })
    }

    /// Appends a `Loop`.
    pub fn loop_(&mut self, body: Chunk, position: Position) -> &mut Self {
        self.push(Instruction::Loop(body, position))
    }

    /// Appends a `Break`.
    pub fn break_(&mut self, position: Position) -> &mut Self {
        self.push(Instruction::Break(position))
    }

    /// Appends a `Declare`.
    pub fn declare(
        &mut self,
        mutable: bool,
        name: &str,
        type_: Option<Chunk>,
        position: Position,
    )
        -> &mut Self
    {
        let name = name.to_string();
        self.push(Instruction::Declare { mutable, name, type_, position })
    }

    /// Appends a `while condition: body` loop.
    ///
    /// The condition is evaluated by `condition`, at the start of each
    /// iteration, and the loop exits when it does not hold.
    pub fn while_(&mut self, condition: Chunk, body: Chunk, position: Position)
        -> &mut Self
    {
        let mut exit = Chunk::new();
        exit.break_(position);

        let mut iteration = condition;
        iteration.selection(body, exit, position);

        self.loop_(iteration, position)
    }
}

impl BinaryOperator {
    /// Returns the name of the instruction.
    pub fn name(self) -> &'static str {
        use self::BinaryOperator::*;

        match self {
            Sum => "Sum",
            Sub => "Sub",
            Mul => "Mul",
            Div => "Div",
            Rem => "Rem",
        }
    }
}

//
//  Span Implementations
//

impl Span for Instruction {
    /// Returns the position of the instruction.
    fn span(&self) -> Position {
        use self::Instruction::*;

        match *self {
            LoadImmediate(_, p) | LoadName(_, p) | LoadAttribute(_, p) => p,
            Nop(p) | Binary(_, p) | Call(_, p) => p,
            Ret(p) | RetVoid(p) | Pop(p) | Loop(_, p) | Break(p) => p,
            Selection { position, .. } | Declare { position, .. } => position,
        }
    }
}

//
//  Trait Implementations
//

impl<'a> IntoIterator for &'a Chunk {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}

impl fmt::Display for Immediate {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match *self {
            Immediate::Bool(b) => write!(f, "{}", b),
            Immediate::Int(i) => write!(f, "{}", i),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.write_str(self.name())
    }
}
