//! A Debug printer for chunks.
//!
//! Represents the chunk one instruction per line, nested chunks indented
//! beneath the instruction owning them.

use std::fmt;

use super::{Chunk, Instruction};

//
//  Public Types.
//

/// ChunkPrinter.
#[derive(Clone, Debug)]
pub struct ChunkPrinter<'a> {
    chunk: &'a Chunk,
    indentation: usize,
}

//
//  Public Methods.
//

impl<'a> ChunkPrinter<'a> {
    /// Creates a new instance.
    pub fn new(chunk: &'a Chunk) -> ChunkPrinter<'a> {
        ChunkPrinter { chunk, indentation: 0 }
    }

    /// Sets the indentation of the outermost instructions.
    pub fn set_indentation(&mut self, indentation: usize) -> &mut Self {
        self.indentation = indentation;
        self
    }

    /// Outputs the chunk to a stream.
    pub fn write(&self, writer: &mut dyn fmt::Write) -> Result<(), fmt::Error> {
        let mut inner = Inner { writer, indentation: self.indentation };
        inner.write_chunk(self.chunk)
    }
}

//
//  Private Types
//

struct Inner<'a> {
    writer: &'a mut dyn fmt::Write,
    indentation: usize,
}

const INDENT_STEP: usize = 2;

//
//  Private Methods
//

impl<'a> Inner<'a> {
    fn write_chunk(&mut self, chunk: &Chunk) -> Result<(), fmt::Error> {
        for instruction in chunk {
            self.write_instruction(instruction)?;
        }
        Ok(())
    }

    fn write_instruction(&mut self, instruction: &Instruction)
        -> Result<(), fmt::Error>
    {
        use self::Instruction::*;

        match instruction {
            LoadImmediate(i, _) => self.line(format_args!("LoadImmediate {}", i)),
            LoadName(n, _) => self.line(format_args!("LoadName {:?}", n)),
            LoadAttribute(n, _) => self.line(format_args!("LoadAttribute {:?}", n)),
            Nop(_) => self.line(format_args!("Nop")),
            Binary(op, _) => self.line(format_args!("{}", op)),
            Call(n, _) => self.line(format_args!("Call {}", n)),
            Ret(_) => self.line(format_args!("Ret")),
            RetVoid(_) => self.line(format_args!("RetVoid")),
            Pop(_) => self.line(format_args!("Pop")),
            Selection { then, otherwise, .. } => {
                self.line(format_args!("Selection"))?;
                self.nested("then", then)?;
                self.nested("otherwise", otherwise)
            },
            Loop(body, _) => {
                self.line(format_args!("Loop"))?;
                self.nested("body", body)
            },
            Break(_) => self.line(format_args!("Break")),
            Declare { mutable, name, type_, .. } => {
                let mutable = if *mutable { "mut " } else { "" };
                self.line(format_args!("Declare {}{:?}", mutable, name))?;
                match type_ {
                    Some(type_) => self.nested("type", type_),
                    None => Ok(()),
                }
            },
        }
    }

    fn nested(&mut self, label: &str, chunk: &Chunk) -> Result<(), fmt::Error> {
        self.indentation += INDENT_STEP;
        self.line(format_args!("{}:", label))?;

        self.indentation += INDENT_STEP;
        let result = self.write_chunk(chunk);
        self.indentation -= 2 * INDENT_STEP;

        result
    }

    fn line(&mut self, args: fmt::Arguments) -> Result<(), fmt::Error> {
        write!(self.writer, "{:1$}", "", self.indentation)?;
        self.writer.write_fmt(args)?;
        writeln!(self.writer)
    }
}

//
//  Trait Implementations
//

impl fmt::Display for Chunk {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        ChunkPrinter::new(self).write(f)
    }
}
