//! NX expression parser and Thompson-style compiler.
//!
//! Builds a fixed-capacity, <=2-edge-per-state NFA via the classic
//! fragment/patch-list technique (compile a sub-expression into a
//! `Frag { start, outs }`, then patch its dangling `outs` to whatever
//! comes next), the same shape as
//! `BurntSushi-rsc-regexp/idiomatic-translation/nfa.rs`'s `Frag`/`ToPatch`,
//! adapted from byte literals to `CharClass` masks and from a growable
//! state vector to one bounded by `S_MAX`.
//!
//! Self-loop edges for implicit SPACE/PUNCT have a known target (the
//! state itself) the moment the state is created, so they never go
//! through the patch list, only the "what comes after this atom" edge is
//! ever dangling.

use crate::charclass::{CharClass, ClassMask};
use crate::error::CompileError;
use crate::nx::nfa::{compute_epsilon_closures, Edge, Nfa, NxFlags, RawEdge, S_MAX};

#[derive(Debug, Clone, Copy)]
enum Slot {
    Unused,
    PendingChar(ClassMask),
    PendingEpsilon,
    Char(Edge),
    Epsilon(u8),
}

/// A partially built sub-automaton: `start` is its entry state; `outs` are
/// edge slots still dangling, to be pointed at whatever follows.
#[derive(Debug, Clone)]
struct Frag {
    start: u8,
    outs: Vec<(u8, u8)>,
}

pub fn compile(expr: &str, flags: NxFlags) -> Result<Nfa, CompileError> {
    if flags.max_fuzz > crate::nx::nfa::MAX_FUZZ {
        return Err(CompileError::FuzzBudgetExceeded {
            requested: flags.max_fuzz,
            max: crate::nx::nfa::MAX_FUZZ,
        });
    }
    if expr.trim().is_empty() {
        return Err(CompileError::EmptyExpression);
    }

    let mut c = Compiler::new(expr);
    let body = c.parse_alt()?;
    if c.pos != c.chars.len() {
        // Only reachable if a ')' remains with no matching '(' to consume it.
        return Err(CompileError::UnbalancedGroup);
    }

    let end_idx = c.new_state()?;
    c.patch(&body.outs, end_idx);

    let accept_idx = c.new_state()?;
    c.states[end_idx as usize][0] = Slot::Char(Edge {
        label: ClassMask::single(CharClass::End),
        target: accept_idx,
    });
    c.states[end_idx as usize][1] = if c.implicit_mask.contains(CharClass::Space) {
        Slot::Char(Edge {
            label: ClassMask::single(CharClass::Space),
            target: end_idx,
        })
    } else {
        Slot::Unused
    };

    if c.states.len() > S_MAX {
        return Err(CompileError::StateOverflow { max: S_MAX });
    }

    let raw = c.into_raw_edges();
    let states = compute_epsilon_closures(&raw, raw.len());

    Ok(Nfa {
        states,
        start: body.start,
        accept: accept_idx,
        expression: expr.to_string(),
        flags,
        cache: None,
    })
}

struct Compiler {
    chars: Vec<char>,
    pos: usize,
    states: Vec<[Slot; 2]>,
    /// SPACE and/or PUNCT bits to self-loop onto every consuming state,
    /// unless the expression used the corresponding literal (`_`/`-`)
    /// explicitly.
    implicit_mask: ClassMask,
}

impl Compiler {
    fn new(expr: &str) -> Compiler {
        let chars: Vec<char> = expr.chars().collect();
        let explicit_space = chars.contains(&'_');
        let explicit_punct = chars.contains(&'-');
        let mut implicit_mask = ClassMask::EMPTY;
        if !explicit_space {
            implicit_mask = implicit_mask.with(CharClass::Space);
        }
        if !explicit_punct {
            implicit_mask = implicit_mask.with(CharClass::Punct);
        }
        Compiler {
            chars,
            pos: 0,
            states: Vec::new(),
            implicit_mask,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_insignificant_space(&mut self) {
        while self.peek() == Some(' ') {
            self.pos += 1;
        }
    }

    fn new_state(&mut self) -> Result<u8, CompileError> {
        if self.states.len() >= S_MAX {
            return Err(CompileError::StateOverflow { max: S_MAX });
        }
        self.states.push([Slot::Unused, Slot::Unused]);
        Ok((self.states.len() - 1) as u8)
    }

    fn patch(&mut self, outs: &[(u8, u8)], target: u8) {
        for &(s, slot) in outs {
            let cell = &mut self.states[s as usize][slot as usize];
            *cell = match *cell {
                Slot::PendingChar(mask) => Slot::Char(Edge { label: mask, target }),
                Slot::PendingEpsilon => Slot::Epsilon(target),
                other => other, // already patched; defensive no-op
            };
        }
    }

    fn into_raw_edges(self) -> Vec<[RawEdge; 2]> {
        self.states
            .into_iter()
            .map(|slots| {
                [
                    slot_to_raw(slots[0]),
                    slot_to_raw(slots[1]),
                ]
            })
            .collect()
    }

    // ---- grammar ----

    fn parse_alt(&mut self) -> Result<Frag, CompileError> {
        let mut branches = vec![self.parse_seq()?];
        while self.peek() == Some('|') {
            self.bump();
            branches.push(self.parse_seq()?);
        }
        self.make_alt(branches)
    }

    fn parse_seq(&mut self) -> Result<Frag, CompileError> {
        let mut acc: Option<Frag> = None;
        loop {
            self.skip_insignificant_space();
            match self.peek() {
                None | Some('|') | Some(')') => break,
                _ => {}
            }
            let atom_start = self.pos;
            let atom = self.parse_one_atom()?;
            let atom_end = self.pos;
            let span: Vec<char> = self.chars[atom_start..atom_end].to_vec();
            let frag = self.parse_postfix(&span, atom)?;
            acc = Some(match acc {
                None => frag,
                Some(prev) => self.concat(prev, frag),
            });
        }
        acc.ok_or(CompileError::EmptyExpression)
    }

    fn parse_postfix(&mut self, span: &[char], frag: Frag) -> Result<Frag, CompileError> {
        match self.peek() {
            Some('*') => {
                self.bump();
                self.make_star(frag)
            }
            Some('+') => {
                self.bump();
                self.make_plus(frag)
            }
            Some('?') => {
                self.bump();
                self.make_opt(frag)
            }
            Some('{') => {
                self.bump();
                let (m, n) = self.parse_count()?;
                match self.bump() {
                    Some('}') => {}
                    _ => return Err(CompileError::DanglingRepetition('{')),
                }
                self.make_repeat(span, frag, m, n)
            }
            _ => Ok(frag),
        }
    }

    fn parse_one_atom(&mut self) -> Result<Frag, CompileError> {
        match self.peek() {
            None => Err(CompileError::EmptyExpression),
            Some('*') | Some('+') | Some('?') => {
                Err(CompileError::DanglingRepetition(self.peek().unwrap()))
            }
            Some('(') => {
                self.bump();
                let inner = self.parse_alt()?;
                match self.bump() {
                    Some(')') => Ok(inner),
                    _ => Err(CompileError::UnterminatedGroup),
                }
            }
            Some(')') => Err(CompileError::UnbalancedGroup),
            Some('[') => self.parse_class(),
            Some('.') => {
                self.bump();
                self.new_literal(ClassMask::all_letters())
            }
            Some('_') => {
                self.bump();
                self.new_literal(ClassMask::single(CharClass::Space))
            }
            Some('-') => {
                self.bump();
                self.new_literal(ClassMask::single(CharClass::Punct))
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.bump();
                self.new_literal(ClassMask::single(CharClass::from_byte(c as u8)))
            }
            Some(c) => Err(CompileError::IllegalClassChar(c)),
        }
    }

    fn parse_class(&mut self) -> Result<Frag, CompileError> {
        self.bump(); // '['
        let inverted = if self.peek() == Some('^') {
            self.bump();
            true
        } else {
            false
        };
        let mut mask = ClassMask::EMPTY;
        let mut saw_any = false;
        loop {
            match self.bump() {
                None => return Err(CompileError::UnterminatedBracket),
                Some(']') => break,
                Some(c) if c.is_ascii_alphabetic() => {
                    mask = mask.with(CharClass::from_byte(c as u8));
                    saw_any = true;
                }
                Some(c) => return Err(CompileError::IllegalClassChar(c)),
            }
        }
        if !saw_any {
            return Err(CompileError::EmptyClass);
        }
        let final_mask = if inverted {
            ClassMask(ClassMask::all_letters().0 & !mask.0)
        } else {
            mask
        };
        self.new_literal(final_mask)
    }

    fn parse_count(&mut self) -> Result<(u32, Option<u32>), CompileError> {
        let m_str = self.read_digits();
        let has_comma = self.peek() == Some(',');
        if has_comma {
            self.bump();
        }
        let n_str = if has_comma { self.read_digits() } else { None };

        match (m_str, has_comma, n_str) {
            (None, false, _) => Err(CompileError::InvalidRepetitionBound(0, 0)),
            (Some(n), false, _) => {
                let n = parse_bound(&n)?;
                Ok((n, Some(n)))
            }
            (None, true, None) => Err(CompileError::InvalidRepetitionBound(0, 0)),
            (Some(m), true, None) => Ok((parse_bound(&m)?, None)),
            (None, true, Some(n)) => Ok((0, Some(parse_bound(&n)?))),
            (Some(m), true, Some(n)) => {
                let m = parse_bound(&m)?;
                let n = parse_bound(&n)?;
                if m > n {
                    return Err(CompileError::InvalidRepetitionBound(m, n));
                }
                Ok((m, Some(n)))
            }
        }
    }

    fn read_digits(&mut self) -> Option<String> {
        let start = self.pos;
        while self.peek().map_or(false, |c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.pos == start {
            None
        } else {
            Some(self.chars[start..self.pos].iter().collect())
        }
    }

    // ---- fragment builders ----

    fn new_literal(&mut self, mask: ClassMask) -> Result<Frag, CompileError> {
        let idx = self.new_state()?;
        self.states[idx as usize][0] = Slot::PendingChar(mask);
        self.states[idx as usize][1] = if self.implicit_mask.is_empty() {
            Slot::Unused
        } else {
            Slot::Char(Edge {
                label: self.implicit_mask,
                target: idx,
            })
        };
        Ok(Frag {
            start: idx,
            outs: vec![(idx, 0)],
        })
    }

    fn new_eps_passthrough(&mut self) -> Result<Frag, CompileError> {
        let idx = self.new_state()?;
        self.states[idx as usize][0] = Slot::PendingEpsilon;
        Ok(Frag {
            start: idx,
            outs: vec![(idx, 0)],
        })
    }

    fn concat(&mut self, a: Frag, b: Frag) -> Frag {
        self.patch(&a.outs, b.start);
        Frag {
            start: a.start,
            outs: b.outs,
        }
    }

    fn concat_all(&mut self, frags: Vec<Frag>) -> Result<Frag, CompileError> {
        let mut iter = frags.into_iter();
        let mut acc = iter.next().ok_or(CompileError::EmptyExpression)?;
        for f in iter {
            acc = self.concat(acc, f);
        }
        Ok(acc)
    }

    fn make_alt(&mut self, branches: Vec<Frag>) -> Result<Frag, CompileError> {
        let mut iter = branches.into_iter().rev();
        let mut acc = iter.next().ok_or(CompileError::EmptyExpression)?;
        for branch in iter {
            let fork = self.new_state()?;
            self.states[fork as usize][0] = Slot::Epsilon(branch.start);
            self.states[fork as usize][1] = Slot::Epsilon(acc.start);
            let mut outs = branch.outs;
            outs.extend(acc.outs);
            acc = Frag { start: fork, outs };
        }
        Ok(acc)
    }

    fn make_opt(&mut self, frag: Frag) -> Result<Frag, CompileError> {
        let fork = self.new_state()?;
        self.states[fork as usize][0] = Slot::Epsilon(frag.start);
        self.states[fork as usize][1] = Slot::PendingEpsilon;
        let mut outs = frag.outs;
        outs.push((fork, 1));
        Ok(Frag { start: fork, outs })
    }

    fn make_star(&mut self, frag: Frag) -> Result<Frag, CompileError> {
        let fork = self.new_state()?;
        self.states[fork as usize][0] = Slot::Epsilon(frag.start);
        self.states[fork as usize][1] = Slot::PendingEpsilon;
        self.patch(&frag.outs, fork);
        Ok(Frag {
            start: fork,
            outs: vec![(fork, 1)],
        })
    }

    fn make_plus(&mut self, frag: Frag) -> Result<Frag, CompileError> {
        let fork = self.new_state()?;
        self.states[fork as usize][0] = Slot::Epsilon(frag.start);
        self.states[fork as usize][1] = Slot::PendingEpsilon;
        self.patch(&frag.outs, fork);
        Ok(Frag {
            start: frag.start,
            outs: vec![(fork, 1)],
        })
    }

    fn compile_subexpr(&mut self, span: &[char]) -> Result<Frag, CompileError> {
        let saved_chars = std::mem::replace(&mut self.chars, span.to_vec());
        let saved_pos = std::mem::replace(&mut self.pos, 0);
        let result = self.parse_alt();
        self.chars = saved_chars;
        self.pos = saved_pos;
        result
    }

    fn make_repeat(
        &mut self,
        span: &[char],
        first_copy: Frag,
        m: u32,
        n: Option<u32>,
    ) -> Result<Frag, CompileError> {
        match n {
            None => self.make_repeat_unbounded(span, first_copy, m),
            Some(0) => self.new_eps_passthrough(),
            Some(n) => {
                let mut copies = Vec::with_capacity(n as usize);
                copies.push(first_copy);
                for _ in 1..n {
                    copies.push(self.compile_subexpr(span)?);
                }
                let mut wired = Vec::with_capacity(copies.len());
                for (idx, copy) in copies.into_iter().enumerate() {
                    if (idx as u32) < m {
                        wired.push(copy);
                    } else {
                        wired.push(self.make_opt(copy)?);
                    }
                }
                self.concat_all(wired)
            }
        }
    }

    fn make_repeat_unbounded(
        &mut self,
        span: &[char],
        first_copy: Frag,
        m: u32,
    ) -> Result<Frag, CompileError> {
        if m == 0 {
            return self.make_star(first_copy);
        }
        let mut copies = Vec::with_capacity(m as usize);
        copies.push(first_copy);
        for _ in 1..m {
            copies.push(self.compile_subexpr(span)?);
        }
        let last = copies.pop().expect("m >= 1");
        let looped = self.make_plus(last)?;
        copies.push(looped);
        self.concat_all(copies)
    }
}

fn parse_bound(s: &str) -> Result<u32, CompileError> {
    let v: u32 = s.parse().map_err(|_| CompileError::InvalidRepetitionBound(0, 0))?;
    if v > 255 {
        return Err(CompileError::InvalidRepetitionBound(v, v));
    }
    Ok(v)
}

fn slot_to_raw(slot: Slot) -> RawEdge {
    match slot {
        Slot::Unused => RawEdge::None,
        Slot::Char(e) => RawEdge::Char(e),
        Slot::Epsilon(t) => RawEdge::Epsilon(t),
        Slot::PendingChar(_) | Slot::PendingEpsilon => {
            unreachable!("dangling output left unpatched at end of compilation")
        }
    }
}
