//! Integration tests transcribing the concrete scenarios from the
//! governing specification's testable-properties section.
//!
//! A couple of the original scenarios' literal expected outputs are
//! internally inconsistent with standard POSIX-ERE semantics for the given
//! pattern (e.g. `he?l+o` cannot match `heo`, which has no `l` at all, under
//! any reading of `l+` as "one or more"). Rather than encode an assertion
//! that would only pass by accident, those specific sub-cases are omitted
//! here with a comment; everything else from each scenario is checked.

use nx_core::{combo_multi, Cursor, Nfa, NxFlags, SearchStatus, WordList, WordSet};

fn flags(fuzz: u8) -> NxFlags {
    NxFlags {
        explicit_space: false,
        explicit_punct: false,
        max_fuzz: fuzz,
    }
}

/// Scenario 1: a plain literal, implicit SPACE matching word boundaries.
#[test]
fn scenario_1_literal_implicit_space() {
    let nfa = Nfa::compile("helloworld", flags(0)).unwrap();
    assert_eq!(nfa.is_match("helloworld"), Some(0));
    assert_eq!(nfa.is_match("hello world"), Some(0));
    assert_eq!(nfa.is_match("helloworldx"), None);
}

/// Scenario 2: alternation inside a `+`, under a fuzz budget. Only the
/// first two (unambiguous) assertions are checked; the spec's third case
/// is explicitly noted there as "-1 or >= 2" (i.e. it does not pin down a
/// single expected value), so nothing is asserted about it here.
#[test]
fn scenario_2_alternation_with_fuzz() {
    let nfa = Nfa::compile("(thing|hello|asdf|world|a?b?c?d?e?)+", flags(3)).unwrap();
    assert_eq!(nfa.is_match("helloworld"), Some(0));
    assert_eq!(nfa.is_match("helloworl"), Some(1));
}

/// Scenario 3: optional + one-or-more repetition. The `"heo"` sub-case from
/// the original scenario is omitted (see module doc comment).
#[test]
fn scenario_3_optional_and_plus() {
    let nfa = Nfa::compile("he?l+o", flags(0)).unwrap();
    assert_eq!(nfa.is_match("hello"), Some(0));
    assert_eq!(nfa.is_match("hllllo"), Some(0));
    assert_eq!(nfa.is_match("help"), None);
}

/// Scenario 4: a five-way intersecting "bank" search. The original dictionary
/// listing omits the one-letter word `"a"` even though its own expected
/// output names a tuple (`"nag","a","ram"`) that requires it; this test
/// includes `"a"` explicitly so that tuple is reachable, and otherwise
/// reproduces the scenario exactly. Each positive assertion below was
/// verified by hand against all five NFAs' exact letter-count requirements
/// (three `a`s, one `g`, one `r`, one `m`) before being written down.
#[test]
fn scenario_4_combo_multi_bank_intersection() {
    let mut list = WordList::new();
    let mut words = WordSet::new();
    for w in ["ana", "gram", "anagram", "nag", "ram", "a"] {
        words.push(list.insert(w));
    }

    let mut nfas = vec![
        Nfa::compile("[angrm]+", flags(0)).unwrap(),
        Nfa::compile("[ngrm]*a[ngrm]*a[ngrm]*a[ngrm]*", flags(0)).unwrap(),
        Nfa::compile("[anrm]*g[anrm]*", flags(0)).unwrap(),
        Nfa::compile("[angm]*r[angm]*", flags(0)).unwrap(),
        Nfa::compile("[angr]*m[angr]*", flags(0)).unwrap(),
    ];

    let mut cursor = Cursor::new();
    let mut found = Vec::new();
    let status = combo_multi(&mut nfas, &words, &list, 3, &mut cursor, |tuple| {
        found.push(tuple.joined_canonical(&list))
    });
    assert_eq!(status, SearchStatus::Done);

    assert!(found.contains(&"anagram".to_string()), "found: {found:?}");
    assert!(found.contains(&"ana gram".to_string()), "found: {found:?}");
    assert!(found.contains(&"nag a ram".to_string()), "found: {found:?}");
    assert!(
        !found.contains(&"ram ram ram".to_string()),
        "ram ram ram has no 'g' so NFA #3 can never accept it; found: {found:?}"
    );
}

/// Scenario 5: exactly-two-of-a-letter via negated classes. `"spears"` is
/// checked since it is unambiguous (exactly two `s`, non-`s` between). The
/// scenario's `"spars"` sub-case is omitted: `"spars"` also has exactly two
/// `s` with only non-`s` letters between them, so it satisfies the same
/// regex — the scenario's claimed `-1` for it does not follow from the
/// stated pattern.
#[test]
fn scenario_5_two_esses_with_negated_class() {
    let nfa = Nfa::compile("[^s]*s[^s]*s[^s]*", flags(0)).unwrap();
    assert_eq!(nfa.is_match("spears"), Some(0));
}

/// Scenario 6: a deadline/cap mid-search, then resumption. Delivered
/// results across the two calls must be the exact same set, same order, no
/// duplicates, as an uninterrupted single run.
#[test]
fn scenario_6_cursor_resumption_has_no_duplicates() {
    let nfa = Nfa::compile("[ab]+", flags(0)).unwrap();

    let mut list = WordList::new();
    let mut words = WordSet::new();
    for w in ["a", "b", "ab", "ba", "aabb"] {
        words.push(list.insert(w));
    }

    // Uninterrupted baseline.
    let mut nfas_full = vec![nfa.clone()];
    let mut cursor_full = Cursor::new();
    let mut full_results = Vec::new();
    let status_full = combo_multi(&mut nfas_full, &words, &list, 1, &mut cursor_full, |tuple| {
        full_results.push(tuple.joined_canonical(&list))
    });
    assert_eq!(status_full, SearchStatus::Done);
    assert_eq!(full_results.len(), 5);

    // Same search, split across a capped first call and a resumed second.
    let mut nfas_inc = vec![nfa];
    let mut cursor_inc = Cursor::new();
    cursor_inc.set_deadline(0, 2);
    let mut inc_results = Vec::new();
    let status1 = combo_multi(&mut nfas_inc, &words, &list, 1, &mut cursor_inc, |tuple| {
        inc_results.push(tuple.joined_canonical(&list))
    });
    assert_eq!(status1, SearchStatus::Suspended);
    assert_eq!(inc_results.len(), 2);

    cursor_inc.set_deadline(0, 1000);
    let status2 = combo_multi(&mut nfas_inc, &words, &list, 1, &mut cursor_inc, |tuple| {
        inc_results.push(tuple.joined_canonical(&list))
    });
    assert_eq!(status2, SearchStatus::Done);

    assert_eq!(inc_results, full_results);
}
