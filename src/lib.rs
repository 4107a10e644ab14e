//! # ansible-launch - Playbook command resolution
//!
//! ansible-launch reads a declarative configuration describing named
//! playbooks and turns one of them into a concrete `ansible-playbook`
//! invocation: verbosity flag, inventory, playbook file and a single
//! `--extra-vars` blob whose values have caller parameters substituted in.
//!
//! ## Core Concepts
//!
//! - **Configuration**: global defaults plus an ordered list of playbooks
//! - **Playbook**: a name, a playbook file, variables, properties and optional
//!   overrides of the global inventory and verbosity
//! - **Caller parameters**: `key=value,...` pairs substituted into
//!   `{{ key }}` placeholders; `host=N` picks the N-th entry of the
//!   playbook's `hosts` property
//!
//! ## Architecture Overview
//!
//! ```text
//!  caller (name, "k=v,...")
//!            │
//!            ▼
//! ┌─────────────────────┐     ┌─────────────────────┐
//! │   ArgumentBuilder   │────▶│  Playbook resolver  │
//! │     (command)       │     │     (resolver)      │
//! └─────────────────────┘     └─────────────────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    Substitutor      │
//! │     (params)        │
//! └─────────────────────┘
//!            │
//!            ▼
//!  ["ansible-playbook", "-vv", "-i", "inv.ini", "site.yml", "--extra-vars", "k=v"]
//! ```
//!
//! Loading the document ([`playbook`]), expanding `${VAR}` references
//! ([`expand`]) and running the process ([`launcher`]) sit around that core;
//! the core itself is pure and performs no I/O.
//!
//! ## Quick Example
//!
//! ```rust
//! use ansible_launch::prelude::*;
//!
//! let config = GlobalConfig::default()
//!     .with_inventory("inv.ini")
//!     .with_playbook(
//!         Playbook::new("deploy", "site.yml")
//!             .with_var("target", "{{ host }}")
//!             .with_property("hosts", "h1,h2"),
//!     );
//!
//! let command = build(&config, "deploy", "host=2")?;
//! assert_eq!(
//!     command.tokens(),
//!     ["ansible-playbook", "-i", "inv.ini", "site.yml", "--extra-vars", "target=h2"]
//! );
//! # Ok::<(), ansible_launch::error::Error>(())
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// Re-export commonly used items in prelude
pub mod prelude {
    //! Convenient re-exports of commonly used types and traits.

    pub use crate::command::{build, ArgumentBuilder, CommandLine};
    pub use crate::error::{Error, Result};
    pub use crate::expand::{EnvExpander, Expander, NoopExpander};
    pub use crate::launcher::{Invocation, LaunchOptions, Launcher, ProcessLauncher};
    pub use crate::params::{substitute, CallerParameters, Substitutor};
    pub use crate::playbook::{GlobalConfig, Playbook};
    pub use crate::resolver::resolve;
}

// ============================================================================
// Core
// ============================================================================

/// Error types and result aliases.
///
/// Resolution failures are either [`Error::Configuration`](error::Error::Configuration)
/// or [`Error::NotFound`](error::Error::NotFound); no partial command line is
/// ever returned alongside an error.
pub mod error;

/// Configuration document model and YAML loading.
pub mod playbook;

/// Playbook lookup by name.
pub mod resolver;

/// Caller parameter parsing and `{{ placeholder }}` substitution.
pub mod params;

/// Override resolution and command line assembly.
pub mod command;

// ============================================================================
// Collaborators
// ============================================================================

/// `${VAR}` / `$VAR` expansion behind the [`Expander`](expand::Expander) trait.
pub mod expand;

/// Exporting configuration properties and parsing `KEY=VALUE` definitions.
pub mod extend;

/// Process launching and end-to-end invocations.
pub mod launcher;

// ============================================================================
// Configuration
// ============================================================================

/// Settings of the launcher itself.
///
/// Handles loading and merging settings from files and environment
/// variables.
pub mod config;

/// Returns the current version of ansible-launch.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
