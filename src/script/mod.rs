//! The transaction scripting language.
//!
//! A script is a `;`-separated sequence of `let <identifier> = <expression>`
//! statements. Expressions are additive chains of non-negative integer
//! literals and previously bound identifiers, evaluated strictly left to
//! right. No parentheses, no precedence, no control flow.
//!
//! Parsing ([`parse`]) is side-effect-free and is used on its own by the
//! mempool to syntax-check transactions before anything touches state.
//! Execution ([`execute`]) folds statements over a *copy* of the caller's
//! state and returns the new snapshot.

pub mod errors;
pub mod interpreter;
pub mod parser;

pub use errors::ScriptError;
pub use interpreter::execute;
pub use parser::{parse, Expr, Op, Statement, Term};
