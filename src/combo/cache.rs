//! Per-(NFA, dictionary) transition-class cache.
//!
//! Grounded in `original_source/src/nx_combo.c`'s `nx_combo_cache_create`/
//! `nx_combo_cache_get` (the `CACHE_BY_WORD` branch, the only branch that
//! snapshot keeps live). Two refinements over a literal reading of the
//! governing design, both recorded in `DESIGN.md`: class interning uses a
//! `HashMap` lookup instead of a linear scan against every existing class,
//! and the word-to-class mapping is a `HashMap<WordId, usize>` rather than
//! a position-parallel array, which makes `compress` a filter instead of a
//! merge-walk.

use std::collections::HashMap;

use crate::bitset::Bitset;
use crate::charclass::translate;
use crate::cursor::Cursor;
use crate::nx::matcher::advance;
use crate::nx::nfa::Nfa;
use crate::word::{WordId, WordList, WordSet};

/// `FuzzStateSet`: one `Bitset` per error level, `0..=fuzz`.
pub type FuzzStateSet = Vec<Bitset>;

/// The full `S x (fuzz+1)` transition table for one equivalence class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TransitionTable(pub Vec<FuzzStateSet>);

impl TransitionTable {
    fn all_empty(state_count: usize, fuzz: usize) -> TransitionTable {
        TransitionTable(vec![vec![Bitset::empty(); fuzz + 1]; state_count])
    }

    fn is_all_empty(&self) -> bool {
        self.0.iter().all(|fss| fss.iter().all(Bitset::is_empty))
    }

    fn nonnull_states(&self) -> Bitset {
        let mut out = Bitset::empty();
        for (s, fss) in self.0.iter().enumerate() {
            if fss.iter().any(|b| !b.is_empty()) {
                out.add(s);
            }
        }
        out
    }

    pub fn row(&self, state: u8) -> &FuzzStateSet {
        &self.0[state as usize]
    }
}

/// Built transition-class cache for one `(Nfa, WordSet)` pair.
#[derive(Debug, Clone)]
pub struct ComboCache {
    classes: Vec<TransitionTable>,
    class_nonnull_states: Vec<Bitset>,
    word_class: HashMap<WordId, usize>,
    nonnull_wordset: WordSet,
    fuzz: u8,
}

/// Partial state for an interruptible cache build. Held by the caller
/// (typically inside `combo::search`'s setup phase) across suspended
/// `combo_multi` calls.
pub struct ComboCacheBuilder {
    next_index: usize,
    classes: Vec<TransitionTable>,
    class_nonnull_states: Vec<Bitset>,
    word_class: HashMap<WordId, usize>,
    fuzz: u8,
}

pub enum BuildOutcome {
    Suspended(ComboCacheBuilder),
    Done(ComboCache),
}

impl ComboCacheBuilder {
    pub fn new(nfa: &Nfa) -> ComboCacheBuilder {
        let fuzz = nfa.flags().max_fuzz;
        ComboCacheBuilder {
            next_index: 0,
            classes: vec![TransitionTable::all_empty(nfa.state_count(), fuzz as usize)],
            class_nonnull_states: vec![Bitset::empty()],
            word_class: HashMap::new(),
            fuzz,
        }
    }

    /// Advances the build, processing words `input[next_index..]`, yielding
    /// whenever `cursor.update_input` signals a deadline/cap hit.
    pub fn advance(
        mut self,
        nfa: &Nfa,
        input: &WordSet,
        list: &WordList,
        cursor: &mut Cursor,
    ) -> BuildOutcome {
        let n = input.len();
        while self.next_index < n {
            if !cursor.update_input(self.next_index) {
                return BuildOutcome::Suspended(self);
            }
            let id = input.get(self.next_index);
            let word = list.get(id);
            let table = build_table(nfa, word.canonical().as_bytes(), self.fuzz as usize);
            let class = self.intern(table);
            self.word_class.insert(id, class);
            self.next_index += 1;
        }
        BuildOutcome::Done(self.finish(input))
    }

    fn intern(&mut self, table: TransitionTable) -> usize {
        if table.is_all_empty() {
            return 0;
        }
        if let Some(pos) = self.classes.iter().position(|t| *t == table) {
            return pos;
        }
        self.class_nonnull_states.push(table.nonnull_states());
        self.classes.push(table);
        self.classes.len() - 1
    }

    fn finish(self, input: &WordSet) -> ComboCache {
        let nonnull_wordset = input.filter(|id| {
            self.word_class.get(&id).copied().unwrap_or(0) != 0
        });
        ComboCache {
            classes: self.classes,
            class_nonnull_states: self.class_nonnull_states,
            word_class: self.word_class,
            nonnull_wordset,
            fuzz: self.fuzz,
        }
    }
}

fn build_table(nfa: &Nfa, canonical: &[u8], fuzz: usize) -> TransitionTable {
    let classes = translate(canonical);
    // `translate` appends a trailing `End`; the combo cache must not
    // consume `End` here (that only happens once, at the very end of an
    // entire phrase), see `combo::search::finish_at_end`.
    let classes = &classes[..classes.len() - 1];
    if classes.is_empty() {
        // A blank/letterless word has nothing to contribute to a phrase;
        // keep it in the all-empty class so it is pruned from the
        // nonnull wordset, matching the original's `wbuf[0] == NX_CHAR_END`
        // guard in `nx_combo_cache_create`.
        return TransitionTable::all_empty(nfa.state_count(), fuzz);
    }
    let mut rows = Vec::with_capacity(nfa.state_count());
    for s in 0..nfa.state_count() {
        let mut cur = vec![Bitset::empty(); fuzz + 1];
        cur[0].add(s);
        cur[0] = nfa.closure_of(&cur[0]);
        for &c in classes {
            cur = advance(nfa, &cur, c);
        }
        rows.push(cur);
    }
    TransitionTable(rows)
}

impl ComboCache {
    pub fn fuzz(&self) -> u8 {
        self.fuzz
    }

    pub fn class_of(&self, id: WordId) -> usize {
        self.word_class.get(&id).copied().unwrap_or(0)
    }

    pub fn table(&self, class: usize) -> &TransitionTable {
        &self.classes[class]
    }

    pub fn nonnull_transitions(&self, class: usize) -> &Bitset {
        &self.class_nonnull_states[class]
    }

    pub fn nonnull_wordset(&self) -> &WordSet {
        &self.nonnull_wordset
    }

    /// Re-indexes the word→class mapping to only the ids present in
    /// `new_input`, which must be a subsequence of the `WordSet` this
    /// cache was built from (invariant iii in the data model).
    pub fn compress(&mut self, new_input: &WordSet) {
        let keep: std::collections::HashSet<WordId> = new_input.iter().collect();
        self.word_class.retain(|id, _| keep.contains(id));
        self.nonnull_wordset = new_input.filter(|id| self.class_of(id) != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::Cursor;
    use crate::nx::compiler::compile;
    use crate::nx::nfa::NxFlags;

    fn flags(fuzz: u8) -> NxFlags {
        NxFlags {
            explicit_space: false,
            explicit_punct: false,
            max_fuzz: fuzz,
        }
    }

    #[test]
    fn empty_word_lands_in_class_zero() {
        let nfa = compile("cat", flags(0)).unwrap();
        let mut list = WordList::new();
        let cat = list.insert("cat");
        let dog = list.insert("dog");
        let mut words = WordSet::new();
        words.push(cat);
        words.push(dog);

        let builder = ComboCacheBuilder::new(&nfa);
        let mut cursor = Cursor::new();
        let cache = match builder.advance(&nfa, &words, &list, &mut cursor) {
            BuildOutcome::Done(c) => c,
            BuildOutcome::Suspended(_) => panic!("should not suspend with no deadline"),
        };
        assert_ne!(cache.class_of(cat), 0);
        assert_eq!(cache.class_of(dog), 0);
        assert_eq!(cache.nonnull_wordset().len(), 1);
    }

    #[test]
    fn blank_word_lands_in_class_zero() {
        // A word that canonicalizes to the empty string (e.g. a blank
        // dictionary line) must intern to the all-empty class even against
        // an NFA that accepts the empty string, not pick up the
        // single-state closure's non-emptiness as a spurious class.
        let nfa = compile("a*", flags(0)).unwrap();
        let mut list = WordList::new();
        let blank = list.insert("");
        let a = list.insert("a");
        let mut words = WordSet::new();
        words.push(blank);
        words.push(a);

        let builder = ComboCacheBuilder::new(&nfa);
        let mut cursor = Cursor::new();
        let cache = match builder.advance(&nfa, &words, &list, &mut cursor) {
            BuildOutcome::Done(c) => c,
            BuildOutcome::Suspended(_) => panic!("should not suspend with no deadline"),
        };
        assert_eq!(cache.class_of(blank), 0);
        assert_eq!(cache.nonnull_wordset().len(), 1);
        assert_eq!(cache.nonnull_wordset().get(0), a);
    }

    #[test]
    fn identical_words_share_a_class() {
        let nfa = compile("[ab]+", flags(0)).unwrap();
        let mut list = WordList::new();
        let a = list.insert("aab");
        let b = list.insert("aab");
        let c = list.insert("bba");
        let mut words = WordSet::new();
        words.push(a);
        words.push(b);
        words.push(c);

        let builder = ComboCacheBuilder::new(&nfa);
        let mut cursor = Cursor::new();
        let cache = match builder.advance(&nfa, &words, &list, &mut cursor) {
            BuildOutcome::Done(c) => c,
            BuildOutcome::Suspended(_) => panic!("should not suspend"),
        };
        assert_eq!(cache.class_of(a), cache.class_of(b));
    }

    #[test]
    fn compress_preserves_order_and_is_subset() {
        let nfa = compile("cat", flags(0)).unwrap();
        let mut list = WordList::new();
        let cat = list.insert("cat");
        let dog = list.insert("dog");
        let mut words = WordSet::new();
        words.push(cat);
        words.push(dog);

        let builder = ComboCacheBuilder::new(&nfa);
        let mut cursor = Cursor::new();
        let mut cache = match builder.advance(&nfa, &words, &list, &mut cursor) {
            BuildOutcome::Done(c) => c,
            BuildOutcome::Suspended(_) => panic!("should not suspend"),
        };
        let shrunk = words.filter(|id| id == cat);
        cache.compress(&shrunk);
        assert_eq!(cache.nonnull_wordset().len(), 1);
        assert_eq!(cache.nonnull_wordset().get(0), cat);
    }
}
