//! Extra build variables.
//!
//! Two ways of feeding additional variables into expansion before a run:
//! exporting selected global properties of the configuration document, and
//! reading newline-separated `KEY=VALUE` definitions.

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::playbook::GlobalConfig;

/// Global properties listed in `names` that are not yet defined.
///
/// `names` is comma-separated; blank names are ignored. A name for which
/// `is_defined` returns true keeps its existing value and is skipped, as is
/// a name the configuration has no property for.
pub fn properties_for<F>(
    config: &GlobalConfig,
    names: &str,
    is_defined: F,
) -> IndexMap<String, String>
where
    F: Fn(&str) -> bool,
{
    let mut exported = IndexMap::new();

    for name in names.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if is_defined(name) {
            debug!(property = %name, "Property already defined, keeping existing value");
            continue;
        }

        match config.properties.get(name) {
            Some(value) => {
                debug!(property = %name, value = %value, "Exporting property");
                exported.insert(name.to_string(), value.clone());
            }
            None => warn!(property = %name, "No such property in configuration"),
        }
    }

    exported
}

/// Parses newline-separated `KEY=VALUE` definitions.
///
/// Lines are split on their first `=`; lines without one, and lines with a
/// blank key, are ignored. Later definitions of a key replace earlier ones.
pub fn parse_variable_lines(text: &str) -> IndexMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim_end_matches('\r')))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
