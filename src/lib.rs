//! `nx-core`: the NX expression compiler, NFA simulator, and multi-word
//! combo search engine behind a word-puzzle search tool.
//!
//! Dictionary loading ([`dictionary`]) is the one place this crate touches
//! I/O; everything else (compiling an expression, matching a single
//! string, and enumerating multi-word phrases across several expressions at
//! once) is pure, single-threaded, and cooperative: long-running searches
//! are driven incrementally through a [`Cursor`] rather than blocking or
//! spawning threads.
//!
//! ```
//! use nx_core::{Cursor, Nfa, NxFlags, WordList, WordSet};
//!
//! let mut nfa = Nfa::compile("c.t", NxFlags::default()).unwrap();
//! assert_eq!(nfa.is_match("cat"), Some(0));
//! assert_eq!(nfa.is_match("dog"), None);
//!
//! let mut list = WordList::new();
//! let mut words = WordSet::new();
//! for w in ["cat", "cot", "dog"] {
//!     words.push(list.insert(w));
//! }
//! let mut cursor = Cursor::new();
//! let mut found = Vec::new();
//! nx_core::combo_multi(
//!     std::slice::from_mut(&mut nfa),
//!     &words,
//!     &list,
//!     1,
//!     &mut cursor,
//!     |tuple| found.push(tuple.joined_canonical(&list)),
//! );
//! assert_eq!(found, vec!["cat", "cot"]);
//! ```

pub mod bitset;
pub mod charclass;
pub mod combo;
pub mod cursor;
pub mod dictionary;
pub mod error;
pub mod nx;
pub mod state_id;
pub mod word;

pub use bitset::Bitset;
pub use charclass::CharClass;
pub use combo::{combo_multi, ComboCache, SearchStatus};
pub use cursor::Cursor;
pub use dictionary::load_dictionary;
pub use error::CompileError;
pub use nx::{Nfa, NxFlags};
pub use word::{Word, WordId, WordList, WordSet, WordTuple};
