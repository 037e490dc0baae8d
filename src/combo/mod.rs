//! Multi-expression, multi-word combo search: the per-dictionary transition
//! cache (`cache`) and the recursive enumeration it feeds (`search`).

pub mod cache;
pub mod search;

pub use cache::ComboCache;
pub use search::{combo_multi, SearchStatus, M_MAX};
