//! Environment variable expansion.
//!
//! Raw configuration strings may reference build or environment variables as
//! `${NAME}` or `$NAME`. Expansion happens before placeholder substitution and
//! is kept behind the [`Expander`] trait so that the resolution core never
//! touches the process environment itself.

use indexmap::IndexMap;
use tracing::trace;

/// Expands variable references inside a string.
pub trait Expander: Send + Sync {
    /// Returns `input` with every known variable reference replaced.
    fn expand(&self, input: &str) -> String;
}

/// Expander that returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopExpander;

impl Expander for NoopExpander {
    fn expand(&self, input: &str) -> String {
        input.to_string()
    }
}

/// Expander backed by a variable table.
///
/// Unknown variables are left verbatim, so `${MISSING}` survives expansion
/// unchanged rather than collapsing to an empty string.
#[derive(Debug, Clone, Default)]
pub struct EnvExpander {
    vars: IndexMap<String, String>,
}

impl EnvExpander {
    /// Creates an expander with no variables.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an expander seeded with the current process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Adds or replaces a variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Adds or replaces several variables; later entries win.
    pub fn extend<I, K, V>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.vars
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
    }

    /// Looks up a variable.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Returns true when the variable is defined.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }
}

impl Expander for EnvExpander {
    fn expand(&self, input: &str) -> String {
        let expanded =
            shellexpand::env_with_context_no_errors(input, |name: &str| self.vars.get(name))
                .into_owned();
        if expanded != input {
            trace!(input = %input, expanded = %expanded, "Expanded variables");
        }
        expanded
    }
}
