//! VQL: the boolean filter language.
//!
//! Source text is lexed and parsed into a [`Node`] tree. Trees can also be
//! built directly with the constructors on [`Node`]; both paths uphold the
//! same invariants. `Display` prints a tree back to source.

mod ast;
mod canonical;
mod error;
mod lexer;
mod parser;
mod print;
mod resolve;

#[cfg(test)]
mod tests;

// re-exports
pub use ast::{CompareOp, Group, GroupOp, Node, Operand, Term, Terms, is_field_name};
pub use error::{AstError, Expected, ParseError};
pub use parser::{DEFAULT_MAX_DEPTH, parse, parse_with_limits};
