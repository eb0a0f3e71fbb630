//! Incremental construction of an automaton, one regex construct at a time.

use crate::alphabet::Alphabet;
use crate::automaton::Automaton;
use crate::error::BuilderError;
use crate::node::{Behavior, NodeId};

/// Maximum number of simultaneously open groups, the implicit outer group
/// included.
pub const MAX_GROUP_DEPTH: usize = 127;

/// Entry and exit node of a group or of a single atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Unit {
    start: NodeId,
    end: NodeId,
}

/// Wires nodes into an [`Automaton`].
///
/// The builder keeps a cursor on the end of the graph built so far and a
/// stack of open groups. The outer group spans the automaton's start and
/// accept nodes and is closed by [`Builder::finish`].
///
/// ```text
/// push_atom(a)   B -> e -> (a)
/// branch()      (B) -> e -> a -> E
/// jump()         B -> e -> a -> (E)
///                     ^\________|
/// ```
pub struct Builder<'a, A> {
    automaton: &'a mut Automaton<A>,
    cursor: NodeId,
    open: Vec<Unit>,
    /// Most recent atom or closed group at the current depth; the target of
    /// `jump` and `skip`.
    last: Option<Unit>,
}

impl<'a, A: Alphabet> Builder<'a, A> {
    pub fn new(automaton: &'a mut Automaton<A>) -> Self {
        let outer = Unit {
            start: automaton.start_node(),
            end: automaton.accept_node(),
        };
        Builder {
            cursor: outer.start,
            automaton,
            open: vec![outer],
            last: None,
        }
    }

    pub fn cursor(&self) -> NodeId {
        self.cursor
    }

    /// Number of open groups, the outer group included.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    fn link(&mut self, from: NodeId, to: NodeId) {
        // Every handle here was allocated by this builder or belongs to the
        // automaton, so linking cannot fail.
        let linked = self.automaton.link(from, to);
        debug_assert!(linked.is_ok(), "{linked:?}");
    }

    fn innermost(&self) -> Result<Unit, BuilderError> {
        self.open.last().copied().ok_or(BuilderError::UnmatchedEndGroup)
    }

    /// Appends a node after the cursor, preceded by an epsilon node so the
    /// pair forms a one-atom group for a following `jump` or `skip`.
    pub fn push_atom(&mut self, behavior: Behavior<A>) -> &mut Self {
        let epsilon = self.automaton.push(Behavior::Epsilon);
        let node = self.automaton.push(behavior);

        self.link(self.cursor, epsilon);
        self.link(epsilon, node);
        self.cursor = node;
        self.last = Some(Unit {
            start: epsilon,
            end: node,
        });
        self
    }

    /// Opens a group (`(` in regex syntax).
    pub fn begin_group(&mut self) -> Result<&mut Self, BuilderError> {
        if self.open.len() >= MAX_GROUP_DEPTH {
            return Err(BuilderError::GroupOverflow {
                max: MAX_GROUP_DEPTH,
            });
        }
        let group = Unit {
            start: self.automaton.push(Behavior::Epsilon),
            end: self.automaton.push(Behavior::Epsilon),
        };

        self.link(self.cursor, group.start);
        self.cursor = group.start;
        self.open.push(group);
        self.last = None;
        Ok(self)
    }

    /// Closes the innermost group (`)` in regex syntax).
    pub fn end_group(&mut self) -> Result<&mut Self, BuilderError> {
        if self.open.len() <= 1 {
            return Err(BuilderError::UnmatchedEndGroup);
        }
        let group = self.innermost()?;

        self.link(self.cursor, group.end);
        self.cursor = group.end;
        self.open.pop();
        self.last = Some(group);
        Ok(self)
    }

    /// Seals the current alternative of the innermost group and moves the
    /// cursor back to its start (`|` in regex syntax).
    pub fn branch(&mut self) -> &mut Self {
        if let Ok(group) = self.innermost() {
            self.link(self.cursor, group.end);
            self.cursor = group.start;
        }
        self.last = None;
        self
    }

    /// Adds a back edge from the end of the last atom or group to its
    /// start (`+` in regex syntax). The cursor does not move.
    pub fn jump(&mut self) -> Result<&mut Self, BuilderError> {
        let unit = self.last.ok_or(BuilderError::NothingToRepeat)?;
        self.link(unit.end, unit.start);
        Ok(self)
    }

    /// Makes the last atom or group optional (`?` in regex syntax).
    pub fn skip(&mut self) -> Result<&mut Self, BuilderError> {
        let unit = self.last.ok_or(BuilderError::NothingToRepeat)?;
        let epsilon = self.automaton.push(Behavior::Epsilon);

        self.link(unit.start, epsilon);
        self.link(self.cursor, epsilon);
        self.cursor = epsilon;
        Ok(self)
    }

    /// Closes the outer group, connecting the cursor to the accept node.
    ///
    /// Consumes the builder, so the finished graph cannot be extended:
    ///
    /// ```compile_fail
    /// use nfa_regex::{Automaton, Behavior};
    ///
    /// let mut automaton = Automaton::<u8>::new();
    /// let mut builder = automaton.builder();
    /// builder.push_atom(Behavior::Symbol(b'a'));
    /// builder.finish().unwrap();
    /// builder.push_atom(Behavior::Symbol(b'b'));
    /// ```
    pub fn finish(mut self) -> Result<(), BuilderError> {
        if self.open.len() > 1 {
            return Err(BuilderError::UnclosedGroups {
                open: self.open.len() - 1,
            });
        }
        let outer = self.innermost()?;
        self.link(self.cursor, outer.end);
        Ok(())
    }
}
