//! Basic building blocks, independent from the language being compiled.

pub mod com;
pub mod sea;
