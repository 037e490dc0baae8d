//! `combo_multi`: multi-expression, multi-word phrase enumeration.
//!
//! Grounded in `original_source/src/nx_combo.c`'s `nx_combo_match_iter2`
//! (recursive per-slot descent, cursor-held index vector, deadline checks),
//! generalized from that file's single-NFA cache to the K-NFA intersection
//! this crate needs; the multi-NFA generalization is this crate's own
//! addition, not present in that file.

use crate::charclass::CharClass;
use crate::combo::cache::{ComboCacheBuilder, FuzzStateSet};
use crate::cursor::{Cursor, CursorStage};
use crate::nx::nfa::Nfa;
use crate::word::{WordList, WordSet, WordTuple};

/// Hard cap on phrase length, mirroring `original_source`'s small fixed
/// bound on cursor index-vector length.
pub const M_MAX: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// The deadline or output cap was hit; resume later with the same
    /// `Cursor`.
    Suspended,
    /// Enumeration is exhausted for every phrase length up to
    /// `max_phrase_words`.
    Done,
}

/// Runs (or resumes) a multi-word, multi-expression search.
///
/// `nfas` must each have `max_fuzz` and state counts already fixed by
/// compilation; this call builds (or resumes building) each NFA's
/// `ComboCache` against the dictionary as needed.
pub fn combo_multi(
    nfas: &mut [Nfa],
    words: &WordSet,
    list: &WordList,
    max_phrase_words: usize,
    cursor: &mut Cursor,
    mut on_match: impl FnMut(&WordTuple),
) -> SearchStatus {
    assert!(max_phrase_words >= 1 && max_phrase_words <= M_MAX, "phrase-word cap out of range");
    assert!(!nfas.is_empty(), "combo_multi requires at least one NFA");

    if !cursor.setup_done() {
        match run_setup(nfas, words, list, cursor) {
            SearchStatus::Suspended => return SearchStatus::Suspended,
            SearchStatus::Done => {}
        }
    }

    let effective = nfas[nfas.len() - 1]
        .cache()
        .expect("setup builds every cache before completing")
        .nonnull_wordset()
        .clone();

    loop {
        let m = cursor.phrase_len();
        cursor.set_stage(CursorStage::Searching);
        let seed: Vec<FuzzStateSet> = nfas.iter().map(seed_state).collect();
        let mut stack = Vec::with_capacity(m);
        let outcome = search(0, m, nfas, &effective, &seed, cursor, &mut stack, &mut on_match);
        match outcome {
            StepOutcome::Suspended => return SearchStatus::Suspended,
            StepOutcome::Done => {
                if cursor.has_partial_match() && m < max_phrase_words {
                    cursor.advance_phrase_len();
                    cursor.reset_indices();
                    cursor.clear_partial_match();
                    continue;
                }
                cursor.set_stage(CursorStage::Done);
                return SearchStatus::Done;
            }
        }
    }
}

fn run_setup(nfas: &mut [Nfa], words: &WordSet, list: &WordList, cursor: &mut Cursor) -> SearchStatus {
    cursor.set_stage(CursorStage::CacheSetup);
    let mut effective = words.clone();
    for nfa in nfas.iter_mut() {
        if nfa.cache().is_none() {
            let builder = cursor
                .take_cache_builder()
                .unwrap_or_else(|| ComboCacheBuilder::new(nfa));
            match builder.advance(nfa, &effective, list, cursor) {
                crate::combo::cache::BuildOutcome::Suspended(b) => {
                    cursor.store_cache_builder(b);
                    return SearchStatus::Suspended;
                }
                crate::combo::cache::BuildOutcome::Done(cache) => {
                    effective = cache.nonnull_wordset().clone();
                    nfa.set_cache(cache);
                }
            }
        } else {
            effective = nfa.cache().unwrap().nonnull_wordset().clone();
        }
    }
    for nfa in nfas.iter_mut() {
        if let Some(cache) = nfa.cache_mut() {
            cache.compress(&effective);
        }
    }
    cursor.mark_setup_done();
    SearchStatus::Done
}

/// The FuzzStateSet an NFA is in before consuming any word of the phrase:
/// just its start closure, no errors spent yet.
fn seed_state(nfa: &Nfa) -> FuzzStateSet {
    let fuzz = nfa.flags().max_fuzz as usize;
    let mut levels = vec![crate::bitset::Bitset::empty(); fuzz + 1];
    levels[0] = nfa.start_closure();
    levels
}

/// Applies the final END transition (and its implicit trailing SPACE
/// self-loop) to determine whether accept is reachable once a phrase is
/// complete. Only used at the last word slot; intermediate words must
/// not terminate early.
fn finish_at_end(nfa: &Nfa, states: &FuzzStateSet) -> FuzzStateSet {
    states
        .iter()
        .map(|set| nfa.closure_of(&nfa.step(set, CharClass::End)))
        .collect()
}

fn accepts(nfa: &Nfa, states: &FuzzStateSet) -> bool {
    let finished = finish_at_end(nfa, states);
    finished.iter().any(|set| set.test(nfa.accept_state() as usize))
}

fn is_all_empty(states: &FuzzStateSet) -> bool {
    states.iter().all(|b| b.is_empty())
}

fn flatten(states: &FuzzStateSet) -> crate::bitset::Bitset {
    let mut out = crate::bitset::Bitset::empty();
    for b in states {
        out.union_assign(b);
    }
    out
}

fn union_transitions(
    table: &crate::combo::cache::TransitionTable,
    stem: &FuzzStateSet,
    fuzz: usize,
) -> FuzzStateSet {
    let mut result = vec![crate::bitset::Bitset::empty(); fuzz + 1];
    for t in 0..=fuzz {
        let mut acc = crate::bitset::Bitset::empty();
        for e in 0..=t {
            for s in stem[e].iter() {
                acc.union_assign(&table.row(s as u8)[t]);
            }
        }
        result[t] = acc;
    }
    result
}

enum StepOutcome {
    Suspended,
    Done,
}

#[allow(clippy::too_many_arguments)]
fn search(
    depth: usize,
    m: usize,
    nfas: &[Nfa],
    input: &WordSet,
    stem_states: &[FuzzStateSet],
    cursor: &mut Cursor,
    stack: &mut Vec<crate::word::WordId>,
    on_match: &mut dyn FnMut(&WordTuple),
) -> StepOutcome {
    let start_i = cursor.index(depth);
    for i in start_i..input.len() {
        cursor.set_index(depth, i);
        if !cursor.update_input(i) {
            return StepOutcome::Suspended;
        }

        let word_id = input.get(i);
        let mut no_match = false;
        let mut new_states: Vec<FuzzStateSet> = Vec::with_capacity(nfas.len());

        for (k, nfa) in nfas.iter().enumerate() {
            let cache = nfa.cache().expect("cache built during setup");
            let class = cache.class_of(word_id);
            let nonnull = cache.nonnull_transitions(class);
            if !nonnull.intersects(&flatten(&stem_states[k])) {
                no_match = true;
                break;
            }
            let fuzz = cache.fuzz() as usize;
            let computed = union_transitions(cache.table(class), &stem_states[k], fuzz);
            if is_all_empty(&computed) {
                no_match = true;
                break;
            }
            new_states.push(computed);
        }

        if no_match {
            continue;
        }
        if new_states == stem_states {
            continue; // no-progress pruning: skip words that advance no NFA's state
        }

        stack.push(word_id);
        if depth + 1 < m {
            let outcome = search(depth + 1, m, nfas, input, &new_states, cursor, stack, on_match);
            if let StepOutcome::Suspended = outcome {
                stack.pop();
                return StepOutcome::Suspended;
            }
            cursor.set_index(depth + 1, 0);
        } else if nfas.iter().zip(new_states.iter()).all(|(nfa, s)| accepts(nfa, s)) {
            let tuple = WordTuple::new(stack);
            on_match(&tuple);
            stack.pop();
            // Advance past `i` before the cap check: if this delivery trips
            // the output cap and we suspend, resuming must not redeliver it.
            cursor.set_index(depth, i + 1);
            if !cursor.update_output(1) {
                return StepOutcome::Suspended;
            }
            continue;
        } else {
            cursor.mark_partial_match();
        }
        stack.pop();
    }
    if depth == 0 {
        cursor.set_index(0, input.len());
    }
    StepOutcome::Done
}
