//! Error types for graph editing, construction and pattern compilation.

use thiserror::Error;

use crate::node::NodeId;

/// Violated precondition of a graph-editing primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("node {0} is pinned and cannot be merged or removed")]
    Pinned(NodeId),

    #[error("node {node} has {count} successors, expected exactly one")]
    NotSingleSuccessor { node: NodeId, count: usize },

    #[error("node {node} has {count} predecessors, expected exactly one")]
    NotSinglePredecessor { node: NodeId, count: usize },
}

/// Malformed construction sequence.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error("group nesting deeper than {max} levels")]
    GroupOverflow { max: usize },

    #[error("end of group without a matching begin")]
    UnmatchedEndGroup,

    #[error("{open} group(s) left open")]
    UnclosedGroups { open: usize },

    #[error("nothing to repeat")]
    NothingToRepeat,
}

/// Failure to turn a pattern string into an automaton.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    #[error("unexpected end of pattern")]
    UnexpectedEnd,

    #[error("expected '{expected}' at position {pos}")]
    Expected { expected: char, pos: usize },

    #[error("character range '{lo}-{hi}' out of order")]
    InvalidRange { lo: char, hi: char },

    #[error("invalid repetition {{{min},{max}}}")]
    InvalidRepetition { min: usize, max: usize },

    #[error("repeated expression can match the empty string")]
    EmptyRepetition,

    #[error("invalid group syntax at position {pos}")]
    InvalidGroup { pos: usize },

    #[error("{0} is not supported")]
    Unsupported(&'static str),

    #[error(transparent)]
    Builder(#[from] BuilderError),
}
