//! NX expression compilation and single-string simulation.

pub mod compiler;
pub mod matcher;
pub mod nfa;

pub use compiler::compile;
pub use matcher::is_match;
pub use nfa::{Nfa, NxFlags, MAX_FUZZ, S_MAX};

use crate::error::CompileError;

impl Nfa {
    /// Compiles an NX expression into an `Nfa`.
    pub fn compile(expr: &str, flags: NxFlags) -> Result<Nfa, CompileError> {
        compiler::compile(expr, flags)
    }

    /// Runs `text` through this `Nfa`, returning the smallest fuzz distance
    /// within budget that accepts, or `None`.
    pub fn is_match(&self, text: &str) -> Option<u8> {
        matcher::is_match(self, text)
    }
}
