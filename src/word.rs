//! `Word`, `WordSet`, and the `WordList` arena.
//!
//! Words are canonicalized (lowercased, non-letters stripped) on insertion
//! so downstream `CharClass` translation and combo search never re-derive
//! canonical form. A `Word` also carries its original spelling for display,
//! since match output should echo what the dictionary actually contained.

use arrayvec::ArrayString;
use smallvec::SmallVec;

use crate::state_id::{usize_to_state_id, StateID};

/// Inline capacity for the small-string optimization; longer words spill to
/// the heap. Chosen to cover the overwhelming majority of dictionary words
/// (mirrors `original_source/src/word.h`'s `small[15]` vs `large` union,
/// sized up slightly since `ArrayString` needs no separate length byte).
const INLINE_CAP: usize = 23;

/// Maximum number of dictionary words a single emitted phrase tuple may
/// join together. Mirrors `original_source`'s `WORDTUPLE_N`.
pub const WORD_TUPLE_N: usize = 8;

#[derive(Debug, Clone)]
enum Storage {
    Inline(ArrayString<INLINE_CAP>),
    Owned(Box<str>),
}

/// A single dictionary entry: canonical (lowercase, letters-only) text plus
/// the original spelling it was loaded with.
#[derive(Debug, Clone)]
pub struct Word {
    canonical: Storage,
    original: Box<str>,
}

impl Word {
    /// Builds a `Word` from raw input text, canonicalizing it (lowercase,
    /// strip anything that is not `A..Z`). Grounded on
    /// `original_source/src/word.c`'s `word_init` canonicalization loop.
    pub fn new(raw: &str) -> Word {
        let mut canon = String::with_capacity(raw.len());
        for b in raw.bytes() {
            if b.is_ascii_alphabetic() {
                canon.push((b | 0x20) as char);
            }
        }
        let canonical = match ArrayString::<INLINE_CAP>::from(&canon) {
            Ok(s) => Storage::Inline(s),
            Err(_) => Storage::Owned(canon.into_boxed_str()),
        };
        Word {
            canonical,
            original: raw.into(),
        }
    }

    pub fn canonical(&self) -> &str {
        match &self.canonical {
            Storage::Inline(s) => s.as_str(),
            Storage::Owned(s) => s,
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn len(&self) -> usize {
        self.canonical().len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical().is_empty()
    }
}

/// A stable handle into a `WordList`. Never a raw pointer or reference;
/// the arena may reallocate its chunk index, but a `WordId` stays valid for
/// the arena's whole lifetime, same handle-not-pointer idiom as the NFA's
/// `StateID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WordId(u32);

impl WordId {
    fn from_index(i: usize) -> WordId {
        WordId(usize_to_state_id::<u32>(i).expect("word arena overflow"))
    }

    fn index(self) -> usize {
        StateID::to_usize(self.0)
    }
}

const CHUNK_CAPACITY: usize = 256;

/// Chunked arena of `Word`s. Chunks are allocated in fixed-size blocks (as
/// in `original_source/src/wordlist.h`'s `WORDLIST_CHUNK_SIZE = 256`) so
/// that `WordId`s handed out earlier remain valid even as later chunks are
/// appended; no existing `Word` ever moves.
#[derive(Debug, Default)]
pub struct WordList {
    chunks: Vec<Vec<Word>>,
}

impl WordList {
    pub fn new() -> WordList {
        WordList { chunks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.chunks.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a word, canonicalizing `raw`, and returns its stable id.
    pub fn insert(&mut self, raw: &str) -> WordId {
        self.insert_word(Word::new(raw))
    }

    pub fn insert_word(&mut self, word: Word) -> WordId {
        let total = self.len();
        if self.chunks.last().map_or(true, |c| c.len() == CHUNK_CAPACITY) {
            self.chunks.push(Vec::with_capacity(CHUNK_CAPACITY));
        }
        self.chunks.last_mut().unwrap().push(word);
        WordId::from_index(total)
    }

    pub fn get(&self, id: WordId) -> &Word {
        let mut idx = id.index();
        for chunk in &self.chunks {
            if idx < chunk.len() {
                return &chunk[idx];
            }
            idx -= chunk.len();
        }
        panic!("WordId out of range for this WordList");
    }

    pub fn iter(&self) -> impl Iterator<Item = (WordId, &Word)> {
        self.chunks
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, w)| (WordId::from_index(i), w))
    }
}

/// An insertion-ordered, duplicate-permitting collection of `WordId`s drawn
/// from one `WordList`. This is the unit `ComboCache`/`combo_multi` operate
/// over, a search "vocabulary" rather than the full dictionary.
#[derive(Debug, Clone, Default)]
pub struct WordSet {
    ids: Vec<WordId>,
}

impl WordSet {
    pub fn new() -> WordSet {
        WordSet { ids: Vec::new() }
    }

    pub fn from_all(list: &WordList) -> WordSet {
        WordSet {
            ids: list.iter().map(|(id, _)| id).collect(),
        }
    }

    pub fn push(&mut self, id: WordId) {
        self.ids.push(id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = WordId> + '_ {
        self.ids.iter().copied()
    }

    pub fn get(&self, i: usize) -> WordId {
        self.ids[i]
    }

    /// Builds a new `WordSet` containing only the ids for which `keep`
    /// returns true, preserving relative order. Used by `ComboCache` to
    /// derive its `nonnull_wordset`.
    pub fn filter(&self, mut keep: impl FnMut(WordId) -> bool) -> WordSet {
        WordSet {
            ids: self.ids.iter().copied().filter(|&id| keep(id)).collect(),
        }
    }
}

/// A transient, ordered group of up to `WORD_TUPLE_N` words, produced only
/// for match-callback delivery (never stored in a `WordList`).
#[derive(Debug, Clone)]
pub struct WordTuple {
    members: SmallVec<[WordId; WORD_TUPLE_N]>,
}

impl WordTuple {
    pub fn new(members: &[WordId]) -> WordTuple {
        debug_assert!(members.len() <= WORD_TUPLE_N);
        WordTuple {
            members: members.iter().copied().collect(),
        }
    }

    pub fn members(&self) -> &[WordId] {
        &self.members
    }

    /// Joins the canonical form of each member word with single spaces,
    /// mirroring `original_source/src/word.c`'s `wordtuple_original`.
    pub fn joined_canonical(&self, list: &WordList) -> String {
        let mut out = String::new();
        for (i, &id) in self.members.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(list.get(id).canonical());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalization_strips_and_lowercases() {
        let w = Word::new("Can't-Stop!");
        assert_eq!(w.canonical(), "cantstop");
        assert_eq!(w.original(), "Can't-Stop!");
    }

    #[test]
    fn inline_vs_owned_storage_is_transparent() {
        let short = Word::new("cat");
        let long = Word::new("supercalifragilisticexpialidocious");
        assert_eq!(short.canonical(), "cat");
        assert_eq!(long.canonical(), "supercalifragilisticexpialidocious");
    }

    #[test]
    fn wordlist_ids_stable_across_chunk_boundary() {
        let mut list = WordList::new();
        let mut ids = Vec::new();
        for i in 0..600 {
            ids.push(list.insert(&format!("word{i}")));
        }
        for (i, id) in ids.into_iter().enumerate() {
            assert_eq!(list.get(id).canonical(), format!("word{i}"));
        }
    }

    #[test]
    fn wordset_filter_preserves_order() {
        let mut list = WordList::new();
        let a = list.insert("a");
        let bb = list.insert("bb");
        let ccc = list.insert("ccc");
        let mut set = WordSet::new();
        set.push(a);
        set.push(bb);
        set.push(ccc);
        let long_only = set.filter(|id| list.get(id).len() > 1);
        let vals: Vec<_> = long_only.iter().map(|id| list.get(id).canonical().to_string()).collect();
        assert_eq!(vals, vec!["bb", "ccc"]);
    }

    #[test]
    fn tuple_joins_canonical_forms() {
        let mut list = WordList::new();
        let a = list.insert("Hello");
        let b = list.insert("World!");
        let tuple = WordTuple::new(&[a, b]);
        assert_eq!(tuple.joined_canonical(&list), "hello world");
    }
}
