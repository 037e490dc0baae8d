//! Demo command-line front end over `nx_core`: compiles one or more NX
//! expressions, loads a dictionary file, and prints every word or ordered
//! phrase that satisfies all of them at once.
//!
//! Thin by design (see `nx_core`'s own doc comment on scope): this binary
//! owns no matching logic of its own, only argument parsing, dictionary
//! loading, and result formatting.

use std::process::ExitCode;

use clap::Parser;

use nx_core::{combo_multi, Cursor, Nfa, NxFlags, SearchStatus, WordSet};

/// Search a dictionary file for words or phrases matching one or more NX
/// expressions simultaneously.
#[derive(Debug, Parser)]
#[command(max_term_width = 80)]
struct Options {
    /// Path to a newline-delimited dictionary file.
    #[arg(short = 'd', long = "dict")]
    dict_file_path: String,

    /// One or more NX expressions; a result must satisfy every one of them.
    #[arg(name = "EXPRESSION", required = true)]
    expressions: Vec<String>,

    /// Maximum number of dictionary words a single result phrase may join.
    #[arg(short = 'm', long = "max-phrase-words", default_value_t = 1)]
    max_phrase_words: usize,

    /// Levenshtein-style edit budget each expression is compiled with.
    #[arg(short = 'f', long = "fuzz", default_value_t = 0)]
    fuzz: u8,

    /// Print cursor/cache progress to stderr as the search runs.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let opts = Options::parse();

    let flags = NxFlags {
        explicit_space: false,
        explicit_punct: false,
        max_fuzz: opts.fuzz,
    };

    let mut nfas = Vec::with_capacity(opts.expressions.len());
    for expr in &opts.expressions {
        match Nfa::compile(expr, flags) {
            Ok(nfa) => nfas.push(nfa),
            Err(err) => {
                eprintln!("error compiling `{expr}`: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let mut list = nx_core::WordList::new();
    let words = match nx_core::load_dictionary(&opts.dict_file_path, &mut list) {
        Ok(words) => words,
        Err(err) => {
            eprintln!("error reading {}: {err}", opts.dict_file_path);
            return ExitCode::FAILURE;
        }
    };

    run_search(&mut nfas, &words, &list, opts.max_phrase_words, opts.verbose)
}

fn run_search(
    nfas: &mut [Nfa],
    words: &WordSet,
    list: &nx_core::WordList,
    max_phrase_words: usize,
    verbose: bool,
) -> ExitCode {
    let mut cursor = Cursor::new();
    let mut found = 0usize;
    loop {
        let status = combo_multi(nfas, words, list, max_phrase_words, &mut cursor, |tuple| {
            found += 1;
            println!("{}", tuple.joined_canonical(list));
        });
        if verbose {
            eprintln!("{}", cursor.debug());
        }
        match status {
            SearchStatus::Done => break,
            SearchStatus::Suspended => continue,
        }
    }
    if found == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
