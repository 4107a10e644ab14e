//! Playbook selection.

use crate::error::{Error, Result};
use crate::playbook::{GlobalConfig, Playbook};

/// Finds the playbook named `name`.
///
/// Playbooks are scanned in document order and validated as the scan goes:
/// the first unnamed playbook aborts the lookup, even when the requested one
/// appears later. The match is an exact string comparison.
///
/// # Errors
///
/// - [`Error::Configuration`] when the configuration has no playbooks or a
///   playbook without a name is reached before a match.
/// - [`Error::NotFound`] when no playbook carries `name`.
pub fn resolve<'a>(config: &'a GlobalConfig, name: &str) -> Result<&'a Playbook> {
    if config.playbooks.is_empty() {
        return Err(Error::configuration("no playbooks defined"));
    }

    for playbook in &config.playbooks {
        let candidate = playbook
            .name()
            .ok_or_else(|| Error::configuration("playbook missing name"))?;

        if candidate == name {
            return Ok(playbook);
        }
    }

    Err(Error::playbook_not_found(name))
}
