//! Automaton nodes and their matching behaviors.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::alphabet::{Alphabet, Input};
use crate::automaton::Automaton;
use crate::executor::Executor;

/// Handle of a node inside its automaton's arena.
///
/// Handles are handed out in increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Predicate run by a [`Behavior::Lambda`] node.
///
/// Receives the current input and the number of symbols consumed so far in
/// this match attempt. Returns the number of symbols it consumes (0 or 1),
/// or `None` when the node does not match.
pub type Predicate<A> = dyn for<'h> Fn(Input<'h, A>, usize) -> Option<usize> + Send + Sync;

/// A named caller-supplied matching condition.
#[derive(Clone)]
pub struct Lambda<A> {
    name: String,
    predicate: Arc<Predicate<A>>,
}

impl<A> Lambda<A> {
    pub fn new<F>(name: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(Input<'_, A>, usize) -> Option<usize> + Send + Sync + 'static,
    {
        Lambda {
            name: name.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<A> fmt::Debug for Lambda<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Lambda").field(&self.name).finish()
    }
}

/// Whether a lookahead succeeds when its sub-automaton matches or when it doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadKind {
    Positive,
    Negative,
}

/// A zero-width assertion backed by a separately built automaton.
///
/// The macro owns its sub-automaton; the sub-automaton's start and accept
/// nodes are pinned there, so optimizing it never invalidates them.
#[derive(Debug)]
pub struct Macro<A> {
    automaton: Box<Automaton<A>>,
    kind: LookaheadKind,
}

impl<A: Alphabet> Macro<A> {
    pub fn new(automaton: Automaton<A>, kind: LookaheadKind) -> Self {
        Macro {
            automaton: Box::new(automaton),
            kind,
        }
    }

    pub fn positive(automaton: Automaton<A>) -> Self {
        Macro::new(automaton, LookaheadKind::Positive)
    }

    pub fn negative(automaton: Automaton<A>) -> Self {
        Macro::new(automaton, LookaheadKind::Negative)
    }

    pub fn kind(&self) -> LookaheadKind {
        self.kind
    }

    pub fn sub_start(&self) -> NodeId {
        self.automaton.start_node()
    }

    pub fn sub_accept(&self) -> NodeId {
        self.automaton.accept_node()
    }

    pub fn automaton(&self) -> &Automaton<A> {
        &self.automaton
    }

    pub(crate) fn automaton_mut(&mut self) -> &mut Automaton<A> {
        &mut self.automaton
    }

    /// Runs the sub-automaton against the current input without consuming it.
    fn evaluate(&self, input: Input<'_, A>, consumed: usize) -> bool {
        let reached = Executor::lookahead(&self.automaton, input, consumed).run();
        match self.kind {
            LookaheadKind::Positive => reached,
            LookaheadKind::Negative => !reached,
        }
    }
}

/// What a node matches.
#[derive(Debug)]
pub enum Behavior<A> {
    /// Matches without consuming anything.
    Epsilon,
    /// Matches one specific symbol.
    Symbol(A),
    /// Matches one symbol in an inclusive range.
    Range(A, A),
    /// Matches any one symbol.
    Any,
    Lambda(Lambda<A>),
    Macro(Macro<A>),
}

impl<A: Alphabet> Behavior<A> {
    /// Tries to enter a node with this behavior.
    ///
    /// Returns the number of symbols consumed on success.
    pub fn enter(&self, input: Input<'_, A>, consumed: usize) -> Option<usize> {
        match self {
            Behavior::Epsilon => Some(0),
            Behavior::Symbol(symbol) => {
                (!input.is_eof() && input.peek() == *symbol).then_some(1)
            }
            Behavior::Range(lo, hi) => {
                let next = input.peek();
                (!input.is_eof() && *lo <= next && next <= *hi).then_some(1)
            }
            Behavior::Any => (!input.is_eof()).then_some(1),
            Behavior::Lambda(lambda) => {
                // A lambda consumes at most one symbol.
                (lambda.predicate)(input, consumed).filter(|&read| read <= 1)
            }
            Behavior::Macro(m) => m.evaluate(input, consumed).then_some(0),
        }
    }

    pub fn is_epsilon(&self) -> bool {
        matches!(self, Behavior::Epsilon)
    }
}

/// A vertex of the automaton graph.
#[derive(Debug)]
pub struct Node<A> {
    pub(crate) id: NodeId,
    pub(crate) next: BTreeSet<NodeId>,
    pub(crate) prev: BTreeSet<NodeId>,
    pub(crate) behavior: Behavior<A>,
    pub(crate) pinned: bool,
}

impl<A> Node<A> {
    pub(crate) fn new(id: NodeId, behavior: Behavior<A>) -> Self {
        Node {
            id,
            next: BTreeSet::new(),
            prev: BTreeSet::new(),
            behavior,
            pinned: false,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Nodes this node may transition into.
    pub fn next(&self) -> &BTreeSet<NodeId> {
        &self.next
    }

    /// Nodes that may transition into this node.
    pub fn prev(&self) -> &BTreeSet<NodeId> {
        &self.prev
    }

    pub fn behavior(&self) -> &Behavior<A> {
        &self.behavior
    }

    /// Pinned nodes are referenced from outside the edge sets and are never
    /// merged away.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}

impl<A> PartialEq for Node<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A> Eq for Node<A> {}

impl<A: fmt::Debug> fmt::Display for Node<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.behavior {
            Behavior::Epsilon => write!(f, "Epsilon{}", self.id),
            Behavior::Symbol(symbol) => write!(f, "Symbol<{symbol:?}>{}", self.id),
            Behavior::Range(lo, hi) => write!(f, "Range<{lo:?}-{hi:?}>{}", self.id),
            Behavior::Any => write!(f, "Any{}", self.id),
            Behavior::Lambda(lambda) => write!(f, "Lambda<{}>{}", lambda.name, self.id),
            Behavior::Macro(m) => match m.kind {
                LookaheadKind::Positive => write!(f, "PositiveLookahead{}", self.id),
                LookaheadKind::Negative => write!(f, "NegativeLookahead{}", self.id),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(text: &[u8], pos: usize) -> Input<'_, u8> {
        Input::new(text).advance(pos)
    }

    #[test]
    fn atomic_behaviors() {
        let text = b"b";
        assert_eq!(Behavior::<u8>::Epsilon.enter(at(text, 0), 0), Some(0));
        assert_eq!(Behavior::<u8>::Epsilon.enter(at(text, 1), 0), Some(0));
        assert_eq!(Behavior::Symbol(b'b').enter(at(text, 0), 0), Some(1));
        assert_eq!(Behavior::Symbol(b'a').enter(at(text, 0), 0), None);
        assert_eq!(Behavior::Range(b'a', b'c').enter(at(text, 0), 0), Some(1));
        assert_eq!(Behavior::Range(b'c', b'z').enter(at(text, 0), 0), None);
        assert_eq!(Behavior::<u8>::Any.enter(at(text, 0), 0), Some(1));
        assert_eq!(Behavior::<u8>::Any.enter(at(text, 1), 0), None);
    }

    #[test]
    fn nul_is_an_ordinary_symbol() {
        let text = [0u8];
        assert_eq!(Behavior::Symbol(0u8).enter(at(&text, 0), 0), Some(1));
        assert_eq!(Behavior::Range(0u8, 255).enter(at(&text, 0), 0), Some(1));
        assert_eq!(Behavior::Any.enter(at(&text, 0), 0), Some(1));
        assert_eq!(Behavior::Any.enter(at(&text, 1), 1), None);
    }

    #[test]
    fn lambda_sees_consumed_count() {
        let start = Lambda::new("Start", |_: Input<'_, u8>, consumed| (consumed == 0).then_some(0));
        let behavior = Behavior::Lambda(start);
        assert_eq!(behavior.enter(at(b"a", 0), 0), Some(0));
        assert_eq!(behavior.enter(at(b"a", 0), 3), None);
    }

    #[test]
    fn lambda_consuming_more_than_one_symbol_never_matches() {
        let greedy = Behavior::Lambda(Lambda::new("Greedy", |_: Input<'_, u8>, _| Some(5)));
        assert_eq!(greedy.enter(at(b"abcdef", 0), 0), None);

        let one = Behavior::Lambda(Lambda::new("One", |_: Input<'_, u8>, _| Some(1)));
        assert_eq!(one.enter(at(b"abcdef", 0), 0), Some(1));
    }

    fn symbol_a() -> Automaton<u8> {
        let mut sub = Automaton::new();
        let mut builder = sub.builder();
        builder.push_atom(Behavior::Symbol(b'a'));
        builder.finish().unwrap();
        sub
    }

    #[test]
    fn macro_never_consumes() {
        let positive = Behavior::Macro(Macro::positive(symbol_a()));
        assert_eq!(positive.enter(at(b"abc", 0), 0), Some(0));
        assert_eq!(positive.enter(at(b"bc", 0), 0), None);

        let negative = Behavior::Macro(Macro::negative(symbol_a()));
        assert_eq!(negative.enter(at(b"abc", 0), 0), None);
        assert_eq!(negative.enter(at(b"bc", 0), 0), Some(0));
    }

    #[test]
    fn display_names() {
        let node = Node::new(NodeId(4), Behavior::Symbol('a'));
        assert_eq!(node.to_string(), "Symbol<'a'>#4");
        let node = Node::new(NodeId(7), Behavior::Range('a', 'z'));
        assert_eq!(node.to_string(), "Range<'a'-'z'>#7");
        let node = Node::<char>::new(NodeId(1), Behavior::Epsilon);
        assert_eq!(node.to_string(), "Epsilon#1");
    }
}
