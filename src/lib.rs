//! A non-deterministic finite automaton pattern matcher.
//!
//! Patterns compile into an [`Automaton`]: an arena of nodes, each with a
//! [`Behavior`] deciding how many input symbols it consumes. The
//! [`Builder`] wires nodes together one regex construct at a time, the
//! [`Optimizer`] removes redundant epsilon nodes and an [`Executor`] walks
//! the graph one step at a time.
//!
//! ```
//! assert!(nfa_regex::accept("(ab)+|c?", "abab").unwrap());
//! assert!(!nfa_regex::accept("(ab)+|c?", "aba").unwrap());
//! ```

mod alphabet;
mod ast;
mod automaton;
mod builder;
mod classes;
mod compiler;
mod config;
mod error;
mod executor;
mod node;
mod optimizer;
mod parser;
mod regex;

pub use alphabet::{Alphabet, Input};
pub use automaton::Automaton;
pub use builder::{Builder, MAX_GROUP_DEPTH};
pub use config::Config;
pub use error::{BuilderError, GraphError, PatternError};
pub use executor::{Acceptance, Executor};
pub use node::{Behavior, Lambda, LookaheadKind, Macro, Node, NodeId, Predicate};
pub use optimizer::Optimizer;
pub use regex::{accept, Regex};
