//! The compiled NFA: a fixed-capacity array of states, each with at most
//! two outgoing edges, plus a precomputed epsilon-closure per state.
//!
//! Epsilon edges exist only during compilation. Once
//! `compute_epsilon_closures` runs, every state's `closure` bitset is
//! authoritative and epsilon edges are cleared from the edge table; the
//! simulator (`nx::matcher`) never walks an epsilon edge directly.

use crate::bitset::Bitset;
use crate::charclass::{CharClass, ClassMask};
use crate::combo::cache::ComboCache;

/// Hard cap on live states in one compiled `Nfa`. One less than 255 so that
/// `TRANSITION_FAIL`-style sentinel values stay outside the valid range
/// even in a `u8` id space; chosen to match the scale the original engine
/// used for the same fixed-array design.
pub const S_MAX: usize = 253;

/// One outgoing edge: consumes any `CharClass` in `label`, moves to `target`.
#[derive(Debug, Clone, Copy)]
pub struct Edge {
    pub label: ClassMask,
    pub target: u8,
}

/// An outgoing edge during compilation, before epsilon edges are folded
/// into closures.
#[derive(Debug, Clone, Copy)]
pub enum RawEdge {
    Char(Edge),
    Epsilon(u8),
    /// No outgoing edge in this slot.
    None,
}

#[derive(Debug, Clone, Default)]
pub struct NfaState {
    /// At most two outgoing consuming edges, post epsilon-closure folding.
    pub edges: [Option<Edge>; 2],
    /// This state plus every state reachable from it by epsilon edges
    /// alone. Includes `self`.
    pub closure: Bitset,
}

/// Compile-time flags controlling how literal text is interpreted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NxFlags {
    /// When true, a literal `' '` in the expression must match a `Space`
    /// class exactly rather than being treated as insignificant whitespace
    /// in the grammar.
    pub explicit_space: bool,
    /// When true, punctuation in the input is matched by the implicit
    /// self-loops built for bracket-free atoms; when false, punctuation is
    /// simply skippable anywhere (the default, word-puzzle-friendly mode).
    pub explicit_punct: bool,
    /// Maximum Levenshtein-style edit budget `nx::matcher` is allowed to
    /// search with against this NFA. 0 disables fuzzy matching. Must be
    /// `<= MAX_FUZZ`.
    pub max_fuzz: u8,
}

pub const MAX_FUZZ: u8 = 8;

/// A compiled NX expression.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub(crate) states: Vec<NfaState>,
    pub(crate) start: u8,
    /// The accept state is always the last state emitted, index
    /// `states.len() - 1`, matching the original engine's
    /// `nx->n_states - 1` accept convention.
    pub(crate) accept: u8,
    pub(crate) expression: String,
    pub(crate) flags: NxFlags,
    pub(crate) cache: Option<Box<ComboCache>>,
}

impl Nfa {
    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn flags(&self) -> NxFlags {
        self.flags
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn start_state(&self) -> u8 {
        self.start
    }

    pub fn accept_state(&self) -> u8 {
        self.accept
    }

    pub fn state(&self, id: u8) -> &NfaState {
        &self.states[id as usize]
    }

    pub fn is_accept(&self, id: u8) -> bool {
        id == self.accept
    }

    /// The set of states reachable from `start` by epsilon edges alone.
    pub fn start_closure(&self) -> Bitset {
        self.states[self.start as usize].closure
    }

    /// Unions the epsilon-closures of every state set in `from` into `into`.
    pub fn close(&self, from: &Bitset, into: &mut Bitset) {
        for s in from.iter() {
            into.union_assign(&self.states[s].closure);
        }
    }

    /// Advances every state in `from` across `c`, returning the (not yet
    /// closed) set of directly reached states.
    pub fn step(&self, from: &Bitset, c: CharClass) -> Bitset {
        let mut out = Bitset::empty();
        for s in from.iter() {
            for edge in self.states[s].edges.iter().flatten() {
                if edge.label.contains(c) {
                    out.add(edge.target as usize);
                }
            }
        }
        out
    }

    /// Advances every state in `from` across *any* letter edge, regardless
    /// of which specific letter the edge is labeled with. Used by the fuzzy
    /// matcher's substitute/insert operations (`LETTER_SET`).
    pub fn step_letters(&self, from: &Bitset) -> Bitset {
        let letters = ClassMask::all_letters();
        let mut out = Bitset::empty();
        for s in from.iter() {
            for edge in self.states[s].edges.iter().flatten() {
                if edge.label.0 & letters.0 != 0 {
                    out.add(edge.target as usize);
                }
            }
        }
        out
    }

    /// Epsilon-closure of an arbitrary state set (not just a single state).
    pub fn closure_of(&self, set: &Bitset) -> Bitset {
        let mut out = Bitset::empty();
        self.close(set, &mut out);
        out
    }

    pub fn cache(&self) -> Option<&ComboCache> {
        self.cache.as_deref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut ComboCache> {
        self.cache.as_deref_mut()
    }

    pub fn set_cache(&mut self, cache: ComboCache) {
        self.cache = Some(Box::new(cache));
    }

    /// Drops any cache built against a previous word set. Called whenever
    /// the caller intends to run `combo_multi` against a different
    /// `WordSet` than the one the existing cache was built for.
    pub fn invalidate_cache(&mut self) {
        self.cache = None;
    }
}

/// Computes the epsilon-closure of every state by fixpoint, then clears
/// epsilon edges from the edge table so later code only ever sees
/// consuming `Edge`s. Called once, immediately after the compiler finishes
/// emitting raw states.
pub(crate) fn compute_epsilon_closures(raw: &[[RawEdge; 2]], n_states: usize) -> Vec<NfaState> {
    let mut closures: Vec<Bitset> = (0..n_states)
        .map(|i| {
            let mut b = Bitset::empty();
            b.add(i);
            b
        })
        .collect();

    // Fixpoint: repeatedly union in epsilon-reachable closures until no
    // closure grows. Bounded by n_states iterations at worst.
    let mut changed = true;
    while changed {
        changed = false;
        for i in 0..n_states {
            let mut additions = Vec::new();
            for edge in &raw[i] {
                if let RawEdge::Epsilon(target) = *edge {
                    additions.push(closures[target as usize]);
                }
            }
            for add in additions {
                for bit in add.iter() {
                    if closures[i].add(bit) {
                        changed = true;
                    }
                }
            }
        }
    }

    (0..n_states)
        .map(|i| {
            let mut edges: [Option<Edge>; 2] = [None, None];
            let mut slot = 0;
            for edge in &raw[i] {
                if let RawEdge::Char(e) = *edge {
                    edges[slot] = Some(e);
                    slot += 1;
                }
            }
            NfaState {
                edges,
                closure: closures[i],
            }
        })
        .collect()
}
