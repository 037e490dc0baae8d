//! Single-string simulation: exact matching generalized to approximate
//! (Levenshtein-style) matching within a per-NFA fuzz budget.
//!
//! Grounded in `original_source/src/nx.c`'s `nx_match_transition` (exact)
//! and `nx_match_fuzzy` (the three-operation forward DP). As documented
//! there, this forward DP does not find every optimal alignment (two
//! consecutive inserted letters can under-count), which is an accepted,
//! inherited limitation, not a bug to paper over here.

use crate::bitset::Bitset;
use crate::charclass::translate;
use crate::nx::nfa::Nfa;

/// Runs `text` through `nfa`, searching up to `nfa.flags().max_fuzz`
/// errors. Returns the smallest number of errors for which the accept
/// state is reached, or `None` if no budget within range accepts.
pub fn is_match(nfa: &Nfa, text: &str) -> Option<u8> {
    let fuzz = nfa.flags().max_fuzz as usize;
    let classes = translate(text.as_bytes());

    let mut cur: Vec<Bitset> = vec![Bitset::empty(); fuzz + 1];
    cur[0] = nfa.start_closure();

    for &c in &classes {
        cur = advance(nfa, &cur, c);
    }

    (0..=fuzz)
        .find(|&e| cur[e].test(nfa.accept_state() as usize))
        .map(|e| e as u8)
}

/// Exposed crate-internally so `combo::cache` can reuse the identical
/// per-character forward-DP step when building per-word transition tables.
pub(crate) fn advance(nfa: &Nfa, cur: &[Bitset], c: crate::charclass::CharClass) -> Vec<Bitset> {
    let fuzz = cur.len() - 1;
    let mut new = vec![Bitset::empty(); fuzz + 1];
    new[0] = nfa.closure_of(&nfa.step(&cur[0], c));

    for e in 1..=fuzz {
        let mut acc = nfa.closure_of(&nfa.step(&cur[e], c));
        acc.union_assign(&cur[e - 1]); // delete: skip this input class
        let substituted = nfa.closure_of(&nfa.step_letters(&cur[e - 1]));
        acc.union_assign(&substituted); // substitute: any letter in place of c
        let inserted = nfa.closure_of(&nfa.step(&substituted, c));
        acc.union_assign(&inserted); // insert: an extra pattern letter, then c
        new[e] = acc;
    }
    new
}
