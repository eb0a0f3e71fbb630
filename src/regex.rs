//! Compiled patterns over `char`.

use std::fmt;

use log::{debug, warn};

use crate::automaton::Automaton;
use crate::compiler;
use crate::config::Config;
use crate::error::PatternError;
use crate::executor::Executor;
use crate::parser::Parser;

/// A compiled pattern, matched against whole strings.
///
/// ```
/// use nfa_regex::Regex;
///
/// let re = Regex::new(r"\d{3}-\d{4}").unwrap();
/// assert!(re.accept("555-1234"));
/// assert!(!re.accept("555-12345"));
/// ```
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    automaton: Automaton<char>,
    config: Config,
}

impl Regex {
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        Self::with_config(pattern, Config::default())
    }

    pub fn with_config(pattern: &str, config: Config) -> Result<Self, PatternError> {
        let ast = Parser::new(pattern).parse()?;
        let mut automaton = compiler::compile(&ast)?;
        if config.optimize {
            automaton.optimize();
        }
        debug!("compiled {pattern:?} into {} nodes", automaton.len());
        Ok(Regex {
            pattern: pattern.to_owned(),
            automaton,
            config,
        })
    }

    /// Whether the pattern matches the whole of `input`.
    ///
    /// A match that runs out of its step limit counts as a mismatch.
    pub fn accept(&self, input: &str) -> bool {
        self.try_accept(input).unwrap_or_else(|| {
            warn!("step limit exhausted matching {:?} against {input:?}", self.pattern);
            false
        })
    }

    /// Like [`Regex::accept`], but `None` when the step limit runs out
    /// before the match is decided.
    pub fn try_accept(&self, input: &str) -> Option<bool> {
        let chars: Vec<char> = input.chars().collect();
        let mut executor = Executor::new(&self.automaton, &chars);
        match self.config.step_limit {
            Some(limit) => executor.run_for(limit),
            None => Some(executor.run()),
        }
    }

    pub fn automaton(&self) -> &Automaton<char> {
        &self.automaton
    }

    pub fn into_automaton(self) -> Automaton<char> {
        self.automaton
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn config(&self) -> Config {
        self.config
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.automaton)
    }
}

/// Compiles `pattern` and matches it against the whole of `input`.
pub fn accept(pattern: &str, input: &str) -> Result<bool, PatternError> {
    Ok(Regex::new(pattern)?.accept(input))
}
