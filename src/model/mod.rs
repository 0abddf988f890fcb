//! The models used to represent the code in the various stages of the pipeline.

pub mod diag;
pub mod ir;
pub mod sem;
