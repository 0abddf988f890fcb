//! The Spp compiler
//!
//! The semantic core of the Spp compiler, exposed as a library to favor reuse.
//!
//! The parser, an external collaborator, builds a `model::sem::Module` whose
//! function bodies and type expressions are `model::ir::Chunk`s; the passes
//! then resolve and type-check it, and emit C.

#![deny(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod basic;
pub mod model;
pub mod pass;
