//! A collection of the various compiler passes.

pub mod emit;
pub mod gen;
