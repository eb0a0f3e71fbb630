//! Symbols and input cursors.

use std::fmt;

/// A symbol type the automaton can match over.
///
/// `TERMINAL` is what a cursor reads past the end of its haystack. End of
/// input is positional, so the same symbol inside the haystack is ordinary.
pub trait Alphabet: Copy + Ord + fmt::Debug {
    /// End-of-input sentinel.
    const TERMINAL: Self;
}

impl Alphabet for u8 {
    const TERMINAL: u8 = 0;
}

impl Alphabet for char {
    const TERMINAL: char = '\0';
}

/// A position inside a haystack.
///
/// Advancing never moves past the end of the haystack.
#[derive(Clone, Copy)]
pub struct Input<'h, A> {
    haystack: &'h [A],
    at: usize,
}

impl<'h, A: Alphabet> Input<'h, A> {
    pub fn new(haystack: &'h [A]) -> Self {
        Input { haystack, at: 0 }
    }

    /// Next symbol, or `TERMINAL` at the end.
    pub fn peek(&self) -> A {
        self.haystack.get(self.at).copied().unwrap_or(A::TERMINAL)
    }

    /// Symbol right before the cursor, if any.
    pub fn previous(&self) -> Option<A> {
        self.at.checked_sub(1).map(|i| self.haystack[i])
    }

    /// Unread part of the haystack.
    pub fn remaining(&self) -> &'h [A] {
        &self.haystack[self.at..]
    }

    /// Absolute offset from the start of the haystack.
    pub fn position(&self) -> usize {
        self.at
    }

    pub fn is_eof(&self) -> bool {
        self.at >= self.haystack.len()
    }

    /// Returns a cursor moved forward by `n` symbols.
    pub fn advance(self, n: usize) -> Self {
        Input {
            haystack: self.haystack,
            at: (self.at + n).min(self.haystack.len()),
        }
    }
}

impl<A: fmt::Debug> fmt::Debug for Input<'_, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input")
            .field("at", &self.at)
            .field("remaining", &&self.haystack[self.at..])
            .finish()
    }
}
