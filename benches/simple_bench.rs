use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nx_core::{combo_multi, Cursor, Nfa, NxFlags, WordList, WordSet};

/// A few hundred short words, synthesized rather than read from a system
/// dictionary file (the teacher's bench read `/usr/share/dict/cracklib-small`,
/// which isn't guaranteed to exist on every machine this crate builds on).
fn sample_words() -> Vec<String> {
    const CONSONANTS: &[u8] = b"bcdfgklmnprst";
    const VOWELS: &[u8] = b"aeiou";
    let mut words = Vec::new();
    for &c1 in CONSONANTS {
        for &v1 in VOWELS {
            for &c2 in CONSONANTS {
                words.push(format!("{}{}{}", c1 as char, v1 as char, c2 as char));
            }
        }
    }
    words
}

fn bench_combo_single_word(c: &mut Criterion) {
    let words = sample_words();
    let mut list = WordList::new();
    let mut set = WordSet::new();
    for w in &words {
        set.push(list.insert(w));
    }

    c.bench_function("combo_multi_single_word_bank", |b| {
        b.iter(|| {
            let mut nfa = Nfa::compile("[angrtbcdefklmos]+", NxFlags::default()).unwrap();
            let mut cursor = Cursor::new();
            let mut count = 0usize;
            combo_multi(
                std::slice::from_mut(&mut nfa),
                &set,
                &list,
                1,
                &mut cursor,
                |_tuple| count += 1,
            );
            black_box(count)
        })
    });
}

fn bench_combo_two_word_phrase(c: &mut Criterion) {
    let words = sample_words();
    let mut list = WordList::new();
    let mut set = WordSet::new();
    for w in &words {
        set.push(list.insert(w));
    }

    c.bench_function("combo_multi_two_word_phrase", |b| {
        b.iter(|| {
            // Six letters: no single 3-letter sample word satisfies this on
            // its own, forcing the search into real two-word phrases.
            let mut nfa = Nfa::compile("......", NxFlags::default()).unwrap();
            let mut cursor = Cursor::new();
            cursor.set_deadline(0, 5_000); // bound the combinatorial blow-up of a dense 2-word search
            let mut count = 0usize;
            let status = combo_multi(
                std::slice::from_mut(&mut nfa),
                &set,
                &list,
                2,
                &mut cursor,
                |_tuple| count += 1,
            );
            black_box((status, count))
        })
    });
}

criterion_group!(benches, bench_combo_single_word, bench_combo_two_word_phrase);
criterion_main!(benches);
