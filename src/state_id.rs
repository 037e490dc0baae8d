use std::hash::Hash;

// pretty much copied from
// https://github.com/BurntSushi/aho-corasick/blob/f166d2e63d0d7a41339b5e7f8c939dd4196f92f0/src/state_id.rs

/// Convert the given `usize` to the chosen state identifier
/// representation. If the given value cannot fit in the chosen
/// representation, then an error is returned.
pub(crate) fn usize_to_state_id<S: StateID>(value: usize) -> Option<S> {
    if value > S::max_id() {
        None
    } else {
        Some(S::from_usize(value))
    }
}

mod private {
    pub(crate) trait Sealed {}
    impl Sealed for u32 {}
}

// for explanation of invariants, check:
// https://github.com/BurntSushi/aho-corasick/blob/f166d2e63d0d7a41339b5e7f8c939dd4196f92f0/src/state_id.rs#L60
pub(crate) unsafe trait StateID:
    private::Sealed + Clone + Copy + Eq + Hash + PartialEq + PartialOrd + Ord
{
    fn from_usize(n: usize) -> Self;

    fn to_usize(self) -> usize;

    fn max_id() -> usize;
}

unsafe impl StateID for u32 {
    #[inline]
    fn from_usize(n: usize) -> u32 {
        n as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }

    #[inline]
    fn max_id() -> usize {
        ::std::u32::MAX as usize
    }
}
