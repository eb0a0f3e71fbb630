//! Resumable, single-step matcher.
//!
//! An [`Executor`] walks an automaton one node visit at a time. The same
//! machinery drives top-level matches and the nested sub-automata of
//! lookahead nodes.

use log::trace;

use crate::alphabet::{Alphabet, Input};
use crate::automaton::Automaton;
use crate::node::NodeId;

/// When reaching the accept node counts as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acceptance {
    /// The accept node must be reached with the whole input consumed.
    WholeInput,
    /// Reaching the accept node is enough; used by lookahead.
    Prefix,
}

/// A pending node visit.
#[derive(Debug, Clone, Copy)]
struct Visit<'h, A> {
    node: NodeId,
    input: Input<'h, A>,
    consumed: usize,
}

/// Step-wise matcher bound to an automaton and an input.
///
/// ```
/// use nfa_regex::{Automaton, Behavior, Executor};
///
/// let mut automaton = Automaton::new();
/// let mut builder = automaton.builder();
/// builder.push_atom(Behavior::Symbol(b'a'));
/// builder.finish().unwrap();
///
/// let mut executor = Executor::new(&automaton, b"a");
/// let accepted = loop {
///     if let Some(accepted) = executor.step() {
///         break accepted;
///     }
/// };
/// assert!(accepted);
/// ```
pub struct Executor<'a, 'h, A> {
    automaton: &'a Automaton<A>,
    start: NodeId,
    accept: NodeId,
    input: Input<'h, A>,
    seed: usize,
    acceptance: Acceptance,
    pending: Vec<Visit<'h, A>>,
    current: Visit<'h, A>,
    steps: usize,
}

impl<'a, 'h, A: Alphabet> Executor<'a, 'h, A> {
    /// Creates a whole-input matcher over `haystack`.
    pub fn new(automaton: &'a Automaton<A>, haystack: &'h [A]) -> Self {
        Self::with_acceptance(automaton, Input::new(haystack), 0, Acceptance::WholeInput)
    }

    /// Creates a prefix matcher seeded at `input`, as run by lookahead nodes.
    pub fn lookahead(automaton: &'a Automaton<A>, input: Input<'h, A>, consumed: usize) -> Self {
        Self::with_acceptance(automaton, input, consumed, Acceptance::Prefix)
    }

    pub fn with_acceptance(
        automaton: &'a Automaton<A>,
        input: Input<'h, A>,
        consumed: usize,
        acceptance: Acceptance,
    ) -> Self {
        let start = automaton.start_node();
        Executor {
            automaton,
            start,
            accept: automaton.accept_node(),
            input,
            seed: consumed,
            acceptance,
            pending: Vec::new(),
            current: Visit {
                node: start,
                input,
                consumed,
            },
            steps: 0,
        }
    }

    /// Visits the current node and moves on to the next pending one.
    ///
    /// Returns `None` while undecided, `Some(true)` once the input is
    /// accepted and `Some(false)` when no candidate is left.
    pub fn step(&mut self) -> Option<bool> {
        let Visit {
            node,
            input,
            consumed,
        } = self.current;
        self.steps += 1;

        if let Some(node) = self.automaton.node(node) {
            if let Some(read) = node.behavior().enter(input, consumed) {
                trace!("entered {node} at {}", input.position());
                let input = input.advance(read);
                self.pending.extend(node.next().iter().map(|&next| Visit {
                    node: next,
                    input,
                    consumed: consumed + read,
                }));
            }
        }

        let Some(next) = self.pending.pop() else {
            return Some(false);
        };
        self.current = next;

        let at_end = match self.acceptance {
            Acceptance::WholeInput => next.input.is_eof(),
            Acceptance::Prefix => true,
        };
        if at_end && next.node == self.accept {
            return Some(true);
        }
        None
    }

    /// Steps until the match is decided.
    pub fn run(&mut self) -> bool {
        loop {
            if let Some(accepted) = self.step() {
                return accepted;
            }
        }
    }

    /// Steps at most `max_steps` times; `None` if still undecided.
    pub fn run_for(&mut self, max_steps: usize) -> Option<bool> {
        (0..max_steps).find_map(|_| self.step())
    }

    /// Number of steps taken since the last reset.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Restarts the match on the bound input.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.steps = 0;
        self.current = Visit {
            node: self.start,
            input: self.input,
            consumed: self.seed,
        };
    }

    /// Restarts the match on a new input.
    pub fn reset_with(&mut self, input: Input<'h, A>) {
        self.input = input;
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Behavior, Macro};

    fn word(text: &[u8]) -> Automaton<u8> {
        let mut automaton = Automaton::new();
        let mut builder = automaton.builder();
        for &c in text {
            builder.push_atom(Behavior::Symbol(c));
        }
        builder.finish().unwrap();
        automaton
    }

    #[test]
    fn agrees_with_reference_matcher() {
        let automaton = word(b"abc");
        for input in [&b"abc"[..], b"ab", b"abcd", b"", b"xbc"] {
            assert_eq!(
                Executor::new(&automaton, input).run(),
                automaton.accept(input),
                "{input:?}"
            );
        }
    }

    #[test]
    fn prefix_acceptance() {
        let automaton = word(b"ab");
        let text = b"abc";
        assert!(!Executor::new(&automaton, text).run());
        assert!(Executor::lookahead(&automaton, Input::new(text), 0).run());
        assert!(!Executor::lookahead(&automaton, Input::new(text).advance(1), 1).run());
    }

    #[test]
    fn reset_reuses_executor() {
        let automaton = word(b"ab");
        let good = b"ab";
        let bad = b"ba";

        let mut executor = Executor::new(&automaton, good);
        assert!(executor.run());
        let taken = executor.steps();
        assert!(taken > 0);

        executor.reset();
        assert_eq!(executor.steps(), 0);
        assert!(executor.run());
        assert_eq!(executor.steps(), taken);

        executor.reset_with(Input::new(bad));
        assert!(!executor.run());
    }

    #[test]
    fn step_budget() {
        // a+ against a long run of 'a' cannot finish in a handful of steps.
        let mut automaton = Automaton::new();
        let mut builder = automaton.builder();
        builder.push_atom(Behavior::Symbol(b'a')).jump().unwrap();
        builder.finish().unwrap();
        let text = [b'a'; 64];

        let mut executor = Executor::new(&automaton, &text);
        assert_eq!(executor.run_for(4), None);
        assert_eq!(executor.steps(), 4);
        assert_eq!(executor.run_for(10_000), Some(true));
    }

    #[test]
    fn lookahead_does_not_consume() {
        // (?=a)a
        let mut automaton = Automaton::new();
        let mut builder = automaton.builder();
        builder.push_atom(Behavior::Macro(Macro::positive(word(b"a"))));
        builder.push_atom(Behavior::Symbol(b'a'));
        builder.finish().unwrap();

        assert!(Executor::new(&automaton, b"a").run());
        assert!(!Executor::new(&automaton, b"b").run());
        assert!(!Executor::new(&automaton, b"aa").run());
    }
}
