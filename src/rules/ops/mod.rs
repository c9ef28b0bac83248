//! Typed operator families for Generation-2 triggers.
//!
//! One module per criteria family. Every evaluator is total: an operator
//! it does not recognize evaluates to `false`, never an error, so rule
//! sets written by newer versions degrade to "no match" instead of
//! breaking the whole batch.

pub mod date;
pub mod list;
pub mod number;
pub mod text;
