//! Dictionary file loading. An external collaborator, thin, not part of
//! the matching core, but fully functional.
//!
//! Grounded in `original_source/src/wordlist.c`'s `wordlist_init_from_file`
//! (the `has_weight == false` branch, the only one described here).

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::word::{WordList, WordSet};

/// Loads one word per line from `path` into `list`, returning a `WordSet`
/// covering every word inserted (in file order).
///
/// One-letter lines other than `"a"` and `"i"` (case-insensitive, matching
/// the canonicalization every `Word` goes through) are dropped, mirroring
/// the original loader's `strlen(line) == 1 && line[0] != 'a' && line[0] !=
/// 'I'` filter. Blank lines are kept as zero-length words; they end up in
/// `ComboCache`'s all-empty class and are pruned there, not here.
pub fn load_dictionary(path: impl AsRef<Path>, list: &mut WordList) -> io::Result<WordSet> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut set = WordSet::new();
    for line in reader.lines() {
        let line = line?;
        if line.len() == 1 && line != "a" && line != "i" && line != "A" && line != "I" {
            continue;
        }
        set.push(list.insert(&line));
    }
    Ok(set)
}
