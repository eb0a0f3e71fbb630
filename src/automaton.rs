//! The automaton graph: node arena, graph editing and the reference matcher.

use std::collections::BTreeSet;
use std::fmt;

use crate::alphabet::{Alphabet, Input};
use crate::builder::Builder;
use crate::error::GraphError;
use crate::node::{Behavior, Node, NodeId};
use crate::optimizer::Optimizer;

/// A non-deterministic finite automaton.
///
/// The automaton owns every node it allocates. Nodes refer to each other by
/// [`NodeId`]; removing a node leaves a hole in the arena so handles stay
/// stable. The start and accept nodes are created with the automaton, are
/// pinned, and never change.
///
/// ```
/// use nfa_regex::{Automaton, Behavior};
///
/// // (a|b)+
/// let mut automaton = Automaton::new();
/// let mut builder = automaton.builder();
/// builder.begin_group().unwrap();
/// builder.push_atom(Behavior::Symbol(b'a'));
/// builder.branch();
/// builder.push_atom(Behavior::Symbol(b'b'));
/// builder.end_group().unwrap();
/// builder.jump().unwrap();
/// builder.finish().unwrap();
///
/// assert!(automaton.accept(b"abbabba"));
/// assert!(!automaton.accept(b"abbacba"));
/// ```
#[derive(Debug)]
pub struct Automaton<A> {
    nodes: Vec<Option<Node<A>>>,
    start: NodeId,
    accept: NodeId,
}

impl<A: Alphabet> Default for Automaton<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Alphabet> Automaton<A> {
    /// Creates an automaton with an unconnected start and accept node.
    pub fn new() -> Self {
        let mut automaton = Automaton {
            nodes: Vec::new(),
            start: NodeId(0),
            accept: NodeId(0),
        };
        automaton.start = automaton.push(Behavior::Epsilon);
        automaton.accept = automaton.push(Behavior::Epsilon);
        automaton.pin(automaton.start);
        automaton.pin(automaton.accept);
        automaton
    }

    /// Returns a builder whose cursor sits on the start node.
    pub fn builder(&mut self) -> Builder<'_, A> {
        Builder::new(self)
    }

    pub fn start_node(&self) -> NodeId {
        self.start
    }

    pub fn accept_node(&self) -> NodeId {
        self.accept
    }

    pub fn is_start(&self, id: NodeId) -> bool {
        id == self.start
    }

    pub fn is_accept(&self, id: NodeId) -> bool {
        id == self.accept
    }

    /// Allocates a new, unconnected node.
    pub fn push(&mut self, behavior: Behavior<A>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node::new(id, behavior)));
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<A>> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<A>> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    fn get(&self, id: NodeId) -> Result<&Node<A>, GraphError> {
        self.node(id).ok_or(GraphError::UnknownNode(id))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node<A>, GraphError> {
        self.node_mut(id).ok_or(GraphError::UnknownNode(id))
    }

    /// Live nodes in allocation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<A>> {
        self.nodes.iter().flatten()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edge_count(&self) -> usize {
        self.nodes().map(|node| node.next.len()).sum()
    }

    /// Marks a node as referenced from outside the graph so it is never
    /// merged or removed.
    pub fn pin(&mut self, id: NodeId) {
        if let Some(node) = self.node_mut(id) {
            node.pinned = true;
        }
    }

    /// Adds the edge `from -> to`. Linking twice has no further effect.
    pub fn link(&mut self, from: NodeId, to: NodeId) -> Result<(), GraphError> {
        self.get(to)?;
        self.get_mut(from)?.next.insert(to);
        self.get_mut(to)?.prev.insert(from);
        Ok(())
    }

    fn unlink(&mut self, from: NodeId, to: NodeId) {
        if let Some(node) = self.node_mut(from) {
            node.next.remove(&to);
        }
        if let Some(node) = self.node_mut(to) {
            node.prev.remove(&from);
        }
    }

    fn unpinned(&self, id: NodeId) -> Result<&Node<A>, GraphError> {
        let node = self.get(id)?;
        if node.pinned {
            return Err(GraphError::Pinned(id));
        }
        Ok(node)
    }

    /// Bypasses a node with exactly one successor: every predecessor is
    /// rerouted to that successor and the node is left disconnected.
    ///
    /// Returns the successor.
    pub fn merge_into_next(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let node = self.unpinned(id)?;
        let next = match node.next.iter().next() {
            Some(&next) if node.next.len() == 1 => next,
            _ => {
                return Err(GraphError::NotSingleSuccessor {
                    node: id,
                    count: node.next.len(),
                });
            }
        };
        let prev: Vec<NodeId> = node.prev.iter().copied().collect();

        self.unlink(id, next);
        for p in prev {
            self.unlink(p, id);
            if p != id {
                self.link(p, next)?;
            }
        }
        Ok(next)
    }

    /// Bypasses a node with exactly one predecessor: that predecessor gains
    /// every successor and the node is left disconnected.
    ///
    /// Returns the predecessor.
    pub fn merge_into_prev(&mut self, id: NodeId) -> Result<NodeId, GraphError> {
        let node = self.unpinned(id)?;
        let prev = match node.prev.iter().next() {
            Some(&prev) if node.prev.len() == 1 => prev,
            _ => {
                return Err(GraphError::NotSinglePredecessor {
                    node: id,
                    count: node.prev.len(),
                });
            }
        };
        let next: Vec<NodeId> = node.next.iter().copied().collect();

        self.unlink(prev, id);
        for n in next {
            self.unlink(id, n);
            if n != id {
                self.link(prev, n)?;
            }
        }
        Ok(prev)
    }

    /// Detaches a node from the graph and drops it.
    pub fn remove(&mut self, id: NodeId) -> Result<Node<A>, GraphError> {
        let node = self.unpinned(id)?;
        let next: Vec<NodeId> = node.next.iter().copied().collect();
        let prev: Vec<NodeId> = node.prev.iter().copied().collect();
        for n in next {
            self.unlink(id, n);
        }
        for p in prev {
            self.unlink(p, id);
        }
        self.nodes[id.index()].take().ok_or(GraphError::UnknownNode(id))
    }

    /// Runs epsilon elision once, returning the number of removed nodes.
    pub fn optimize(&mut self) -> usize {
        Optimizer::new(self).remove_epsilons()
    }

    /// Returns true if the automaton can consume the whole input and end on
    /// the accept node.
    ///
    /// ```text
    /// (ab)+ accept "abc" = false
    /// (abc)+ accept "abc" = true
    /// ```
    pub fn accept(&self, input: &[A]) -> bool {
        let mut pending: Vec<(NodeId, Input<'_, A>)> = vec![(self.start, Input::new(input))];

        while let Some((id, input)) = pending.pop() {
            if input.is_eof() && self.is_accept(id) {
                return true;
            }

            let Some(node) = self.node(id) else {
                continue;
            };
            // Consumed count is relative to the whole input here.
            if let Some(read) = node.behavior.enter(input, input.position()) {
                let advanced = input.advance(read);
                pending.extend(node.next.iter().map(|&next| (next, advanced)));
            }
        }
        false
    }

    fn label(&self, node: &Node<A>) -> String {
        if self.is_start(node.id) {
            "[Start]".to_string()
        } else if self.is_accept(node.id) {
            "[Accept]".to_string()
        } else {
            node.to_string()
        }
    }
}

/// Depth-first dump of the graph reachable from the start node.
///
/// Nodes already printed are marked `(repeated)` and not expanded again.
/// A lookahead's sub-automaton is dumped right below it, each line marked
/// with `: `.
impl<A: Alphabet> fmt::Display for Automaton<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.dump(f, "")
    }
}

impl<A: Alphabet> Automaton<A> {
    fn dump(&self, f: &mut fmt::Formatter<'_>, prefix: &str) -> fmt::Result {
        let mut visited = BTreeSet::new();
        let mut pending = vec![(self.start, 0usize)];

        while let Some((id, depth)) = pending.pop() {
            let Some(node) = self.node(id) else {
                continue;
            };
            let indent = "| ".repeat(depth);
            if !visited.insert(id) {
                writeln!(f, "{prefix}{indent}{} (repeated)", self.label(node))?;
                continue;
            }
            writeln!(f, "{prefix}{indent}{}", self.label(node))?;
            if let Behavior::Macro(m) = &node.behavior {
                m.automaton().dump(f, &format!("{prefix}{indent}: "))?;
            }
            pending.extend(node.next.iter().rev().map(|&next| (next, depth + 1)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Macro;

    fn assert_inverse_edges<A: Alphabet>(automaton: &Automaton<A>) {
        for node in automaton.nodes() {
            for next in node.next() {
                let other = automaton.node(*next).expect("dangling successor");
                assert!(
                    other.prev().contains(&node.id()),
                    "{} -> {} missing back edge",
                    node.id(),
                    next
                );
            }
            for prev in node.prev() {
                let other = automaton.node(*prev).expect("dangling predecessor");
                assert!(
                    other.next().contains(&node.id()),
                    "{} <- {} missing forward edge",
                    node.id(),
                    prev
                );
            }
        }
    }

    #[test]
    fn new_automaton_has_pinned_start_and_accept() {
        let automaton = Automaton::<u8>::new();
        assert_eq!(automaton.len(), 2);
        assert_eq!(automaton.edge_count(), 0);
        assert_ne!(automaton.start_node(), automaton.accept_node());
        assert!(automaton.node(automaton.start_node()).unwrap().is_pinned());
        assert!(automaton.node(automaton.accept_node()).unwrap().is_pinned());
        assert!(!automaton.accept(b""));
    }

    #[test]
    fn link_is_idempotent() {
        let mut automaton = Automaton::<u8>::new();
        let a = automaton.push(Behavior::Symbol(b'a'));
        automaton.link(automaton.start_node(), a).unwrap();
        automaton.link(automaton.start_node(), a).unwrap();
        assert_eq!(automaton.edge_count(), 1);
        assert_inverse_edges(&automaton);
    }

    #[test]
    fn link_rejects_unknown_nodes() {
        let mut automaton = Automaton::<u8>::new();
        let ghost = NodeId(42);
        assert_eq!(
            automaton.link(automaton.start_node(), ghost),
            Err(GraphError::UnknownNode(ghost))
        );
        assert_eq!(automaton.edge_count(), 0);
    }

    #[test]
    fn merge_into_next_reroutes_predecessors() {
        let mut automaton = Automaton::<u8>::new();
        let (start, accept) = (automaton.start_node(), automaton.accept_node());
        let a = automaton.push(Behavior::Symbol(b'a'));
        let b = automaton.push(Behavior::Symbol(b'b'));
        let e = automaton.push(Behavior::Epsilon);
        let c = automaton.push(Behavior::Symbol(b'c'));
        automaton.link(start, a).unwrap();
        automaton.link(start, b).unwrap();
        automaton.link(a, e).unwrap();
        automaton.link(b, e).unwrap();
        automaton.link(e, c).unwrap();
        automaton.link(c, accept).unwrap();

        assert_eq!(automaton.merge_into_next(e), Ok(c));
        automaton.remove(e).unwrap();

        assert!(automaton.node(a).unwrap().next().contains(&c));
        assert!(automaton.node(b).unwrap().next().contains(&c));
        assert_eq!(automaton.node(c).unwrap().prev().len(), 2);
        assert_inverse_edges(&automaton);
        assert!(automaton.accept(b"ac"));
        assert!(automaton.accept(b"bc"));
    }

    #[test]
    fn merge_into_prev_moves_successors() {
        let mut automaton = Automaton::<u8>::new();
        let (start, accept) = (automaton.start_node(), automaton.accept_node());
        let e = automaton.push(Behavior::Epsilon);
        let a = automaton.push(Behavior::Symbol(b'a'));
        let b = automaton.push(Behavior::Symbol(b'b'));
        automaton.link(start, e).unwrap();
        automaton.link(e, a).unwrap();
        automaton.link(e, b).unwrap();
        automaton.link(a, accept).unwrap();
        automaton.link(b, accept).unwrap();

        assert_eq!(automaton.merge_into_prev(e), Ok(start));
        automaton.remove(e).unwrap();

        assert_eq!(automaton.node(start).unwrap().next().len(), 2);
        assert_inverse_edges(&automaton);
        assert!(automaton.accept(b"a"));
        assert!(automaton.accept(b"b"));
    }

    #[test]
    fn merge_preconditions() {
        let mut automaton = Automaton::<u8>::new();
        let start = automaton.start_node();
        let e = automaton.push(Behavior::Epsilon);
        assert_eq!(automaton.merge_into_next(start), Err(GraphError::Pinned(start)));
        assert_eq!(
            automaton.merge_into_next(e),
            Err(GraphError::NotSingleSuccessor { node: e, count: 0 })
        );
        assert_eq!(
            automaton.merge_into_prev(e),
            Err(GraphError::NotSinglePredecessor { node: e, count: 0 })
        );
        assert!(automaton.remove(automaton.accept_node()).is_err());
    }

    #[test]
    fn removed_handles_stay_dead() {
        let mut automaton = Automaton::<u8>::new();
        let e = automaton.push(Behavior::Epsilon);
        automaton.remove(e).unwrap();
        assert!(automaton.node(e).is_none());
        let f = automaton.push(Behavior::Epsilon);
        assert_ne!(e, f);
        assert_eq!(automaton.remove(e).err(), Some(GraphError::UnknownNode(e)));
    }

    #[test]
    fn graph_dump_marks_repeats() {
        let mut automaton = Automaton::new();
        let mut builder = automaton.builder();
        builder.push_atom(Behavior::Symbol('a'));
        builder.jump().unwrap();
        builder.finish().unwrap();
        automaton.optimize();

        let dump = automaton.to_string();
        assert!(dump.starts_with("[Start]\n"));
        assert!(dump.contains("Symbol<'a'>"));
        assert!(dump.contains("(repeated)"));
        assert!(dump.contains("[Accept]"));
    }

    #[test]
    fn graph_dump_nests_lookahead() {
        let mut sub = Automaton::new();
        let mut builder = sub.builder();
        builder.push_atom(Behavior::Symbol('b'));
        builder.finish().unwrap();

        let mut automaton = Automaton::new();
        let mut builder = automaton.builder();
        builder.push_atom(Behavior::Macro(Macro::negative(sub)));
        builder.push_atom(Behavior::Any);
        builder.finish().unwrap();
        automaton.optimize();

        let dump = automaton.to_string();
        let lines: Vec<&str> = dump.lines().collect();
        let at = lines
            .iter()
            .position(|line| line.contains("NegativeLookahead"))
            .unwrap();
        let indent = lines[at].len() - lines[at].trim_start_matches("| ").len();
        let nested = format!("{}: ", &lines[at][..indent]);
        assert_eq!(lines[at + 1], format!("{nested}[Start]"));
        assert!(lines[at + 2].starts_with(&format!("{nested}| Symbol<'b'>")), "{dump}");
        assert!(lines.iter().filter(|line| line.ends_with("[Accept]")).count() == 2, "{dump}");
        assert!(dump.contains("Any#"), "{dump}");
    }
}
