//! Compilation and matching options.

/// Options for [`Regex::with_config`](crate::Regex::with_config).
///
/// ```
/// use nfa_regex::{Config, Regex};
///
/// let config = Config::default().with_optimize(false).with_step_limit(1_000);
/// let re = Regex::with_config("a+", config).unwrap();
/// assert_eq!(re.try_accept("aaa"), Some(true));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Run epsilon elision after compiling. Defaults to `true`.
    pub optimize: bool,
    /// Maximum number of executor steps per match. `None`, the default,
    /// means unbounded.
    pub step_limit: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            optimize: true,
            step_limit: None,
        }
    }
}

impl Config {
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }

    /// Bound every match to `step_limit` executor steps.
    #[must_use]
    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = Some(step_limit);
        self
    }

    #[must_use]
    pub fn without_step_limit(mut self) -> Self {
        self.step_limit = None;
        self
    }
}
