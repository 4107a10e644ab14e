//! Playbook configuration model and loading.
//!
//! A configuration document declares global defaults (inventory, verbosity,
//! free-form properties) and a list of named playbooks. Each playbook points
//! at one playbook file and carries its own variables, properties and
//! optional overrides of the global defaults.
//!
//! The model is inert: it is loaded once per invocation and only read
//! afterwards. Required fields (`name`, `file`) are checked when a command
//! line is built, not when the document is parsed.
//!
//! ```yaml
//! inventory: inventories/staging.ini
//! verbose: v
//! properties:
//!   region: eu-west-1
//! playbooks:
//!   - name: deploy
//!     file: site.yml
//!     verbose: vvv
//!     vars:
//!       target: "{{ host }}"
//!       release: "{{ version }}"
//!     properties:
//!       hosts: web1.example.com,web2.example.com
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::error::{Error, Result};
use crate::expand::Expander;

/// Property holding the comma-separated host list used by the `host` parameter.
pub const HOSTS_PROPERTY: &str = "hosts";

/// Top-level configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Free-form properties shared by every playbook
    #[serde(deserialize_with = "scalar::string_map")]
    pub properties: IndexMap<String, String>,

    /// Default inventory file
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub inventory: Option<String>,

    /// Default verbosity token (`v`, `vv`, ...)
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub verbose: Option<String>,

    /// Playbooks in document order
    #[serde(deserialize_with = "scalar::nullable_seq")]
    pub playbooks: Vec<Playbook>,
}

impl GlobalConfig {
    /// Loads a configuration document from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading playbook configuration");

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config_load(path, format!("Failed to read file: {}", e)))?;

        Self::from_yaml(&content).map_err(|e| match e {
            Error::YamlParse(inner) => Error::config_load(path, inner.to_string()),
            other => other,
        })
    }

    /// Parses a configuration document from a YAML string.
    ///
    /// Unknown fields are ignored. An empty document yields an empty
    /// configuration, which parses fine but cannot be used to build a
    /// command line.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        if value.is_null() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_value(value)?)
    }

    /// Adds a playbook.
    pub fn with_playbook(mut self, playbook: Playbook) -> Self {
        self.playbooks.push(playbook);
        self
    }

    /// Sets the default inventory.
    pub fn with_inventory(mut self, inventory: impl Into<String>) -> Self {
        self.inventory = Some(inventory.into());
        self
    }

    /// Sets the default verbosity token.
    pub fn with_verbose(mut self, verbose: impl Into<String>) -> Self {
        self.verbose = Some(verbose.into());
        self
    }

    /// Adds a global property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Names of all playbooks that have one, in document order.
    pub fn playbook_names(&self) -> Vec<&str> {
        self.playbooks.iter().filter_map(Playbook::name).collect()
    }

    /// Returns a copy with every playbook variable value run through `expander`.
    ///
    /// Only variable values are expanded; names, files and inventories are
    /// passed through untouched.
    pub fn expand_vars(&self, expander: &dyn Expander) -> GlobalConfig {
        let mut expanded = self.clone();
        for playbook in &mut expanded.playbooks {
            for value in playbook.vars.values_mut().flatten() {
                *value = expander.expand(value);
            }
        }
        expanded
    }
}

/// One named automation unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playbook {
    /// Name used to select the playbook
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Playbook file passed to the tool
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub file: Option<String>,

    /// Inventory override
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub inventory: Option<String>,

    /// Verbosity override
    #[serde(
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub verbose: Option<String>,

    /// Extra variables; values may contain `{{ placeholder }}` tokens.
    /// A `None` value was declared as null and is skipped.
    #[serde(deserialize_with = "scalar::nullable_map")]
    pub vars: IndexMap<String, Option<String>>,

    /// Lookup table used during substitution (notably `hosts`)
    #[serde(deserialize_with = "scalar::string_map")]
    pub properties: IndexMap<String, String>,
}

impl Playbook {
    /// Creates a playbook with a name and a file.
    pub fn new(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            file: Some(file.into()),
            ..Self::default()
        }
    }

    /// Sets the inventory override.
    pub fn with_inventory(mut self, inventory: impl Into<String>) -> Self {
        self.inventory = Some(inventory.into());
        self
    }

    /// Sets the verbosity override.
    pub fn with_verbose(mut self, verbose: impl Into<String>) -> Self {
        self.verbose = Some(verbose.into());
        self
    }

    /// Adds a variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), Some(value.into()));
        self
    }

    /// Adds a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        non_empty(&self.name)
    }

    /// The playbook file, if present and non-empty.
    pub fn file(&self) -> Option<&str> {
        non_empty(&self.file)
    }

    /// The host list from the `hosts` property, if present and non-empty.
    ///
    /// Trailing empty entries (`"h1,h2,"`) are dropped.
    pub fn hosts(&self) -> Option<Vec<&str>> {
        let hosts = self
            .properties
            .get(HOSTS_PROPERTY)
            .filter(|hosts| !hosts.is_empty())?;

        let mut hosts: Vec<&str> = hosts.split(',').collect();
        while hosts.last() == Some(&"") {
            hosts.pop();
        }
        Some(hosts)
    }
}

/// Treats an empty string the same as an absent one.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Lenient deserializers for scalar-valued fields and maps.
///
/// YAML documents routinely write numbers or booleans where a string is
/// meant (`port: 8080`), and nulls where a value is left blank. These
/// helpers read such scalars as strings and fold nulls into absence.
mod scalar {
    use indexmap::IndexMap;
    use serde::de::{Deserialize, Deserializer, Error as _};
    use serde_yaml::Value;

    fn to_string(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Tagged(tagged) => to_string(&tagged.value),
            Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
        }
    }

    pub(super) fn optional<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            other => to_string(&other)
                .map(Some)
                .ok_or_else(|| D::Error::custom("expected a scalar value")),
        }
    }

    pub(super) fn nullable_map<'de, D>(
        deserializer: D,
    ) -> Result<IndexMap<String, Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mapping = match Value::deserialize(deserializer)? {
            Value::Null => return Ok(IndexMap::new()),
            Value::Mapping(mapping) => mapping,
            _ => return Err(D::Error::custom("expected a mapping")),
        };

        let mut map = IndexMap::with_capacity(mapping.len());
        for (key, value) in mapping {
            let Some(key) = to_string(&key) else {
                continue;
            };
            let value = match value {
                Value::Null => None,
                other => Some(to_string(&other).ok_or_else(|| {
                    D::Error::custom(format!("expected a scalar value for '{}'", key))
                })?),
            };
            map.insert(key, value);
        }
        Ok(map)
    }

    pub(super) fn string_map<'de, D>(deserializer: D) -> Result<IndexMap<String, String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(nullable_map(deserializer)?
            .into_iter()
            .filter_map(|(key, value)| value.map(|v| (key, v)))
            .collect())
    }

    pub(super) fn nullable_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expand::EnvExpander;
    use pretty_assertions::assert_eq;

    const DOCUMENT: &str = r#"
properties:
  region: eu-west-1
inventory: inventories/staging.ini
verbose: v
unknown_top_level: ignored
playbooks:
  - name: deploy
    file: site.yml
    verbose: vvv
    port: 22
    vars:
      target: "{{ host }}"
      retries: 3
      debug: true
      unset: ~
    properties:
      hosts: h1,h2
  - name: cleanup
    file: cleanup.yml
"#;

    #[test]
    fn test_parse_document() {
        let config = GlobalConfig::from_yaml(DOCUMENT).unwrap();

        assert_eq!(config.inventory.as_deref(), Some("inventories/staging.ini"));
        assert_eq!(config.verbose.as_deref(), Some("v"));
        assert_eq!(config.properties.get("region").unwrap(), "eu-west-1");
        assert_eq!(config.playbook_names(), vec!["deploy", "cleanup"]);

        let deploy = &config.playbooks[0];
        assert_eq!(deploy.file(), Some("site.yml"));
        assert_eq!(deploy.verbose.as_deref(), Some("vvv"));
        assert_eq!(deploy.inventory, None);
        assert_eq!(
            deploy.vars.keys().collect::<Vec<_>>(),
            vec!["target", "retries", "debug", "unset"]
        );
        assert_eq!(deploy.vars["retries"].as_deref(), Some("3"));
        assert_eq!(deploy.vars["debug"].as_deref(), Some("true"));
        assert_eq!(deploy.vars["unset"], None);
        assert_eq!(deploy.hosts(), Some(vec!["h1", "h2"]));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(GlobalConfig::from_yaml("").unwrap(), GlobalConfig::default());
        assert_eq!(GlobalConfig::from_yaml("~").unwrap(), GlobalConfig::default());
        assert!(GlobalConfig::from_yaml("playbooks:").unwrap().playbooks.is_empty());
    }

    #[test]
    fn test_invalid_document() {
        let err = GlobalConfig::from_yaml("playbooks: [").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));

        let err = GlobalConfig::from_yaml("playbooks:\n  - name: [a, b]\n").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_null_property_dropped() {
        let config =
            GlobalConfig::from_yaml("playbooks:\n  - name: a\n    properties:\n      hosts: ~\n")
                .unwrap();
        assert!(config.playbooks[0].properties.is_empty());
        assert_eq!(config.playbooks[0].hosts(), None);
    }

    #[test]
    fn test_empty_fields_treated_as_absent() {
        let playbook = Playbook {
            name: Some(String::new()),
            file: Some(String::new()),
            ..Playbook::default()
        }
        .with_property("hosts", "");

        assert_eq!(playbook.name(), None);
        assert_eq!(playbook.file(), None);
        assert_eq!(playbook.hosts(), None);
    }

    #[test]
    fn test_hosts_trailing_separator() {
        let playbook = Playbook::new("a", "a.yml").with_property("hosts", "h1,,h2,");
        assert_eq!(playbook.hosts(), Some(vec!["h1", "", "h2"]));
    }

    #[test]
    fn test_expand_vars_only_touches_values() {
        let config = GlobalConfig::default().with_playbook(
            Playbook::new("deploy", "${FILE}.yml")
                .with_inventory("${INV}")
                .with_var("branch", "${BRANCH}")
                .with_var("target", "{{ host }}"),
        );
        let expander = EnvExpander::empty()
            .with_var("BRANCH", "main")
            .with_var("FILE", "site")
            .with_var("INV", "hosts.ini");

        let expanded = config.expand_vars(&expander);
        let playbook = &expanded.playbooks[0];
        assert_eq!(playbook.vars["branch"].as_deref(), Some("main"));
        assert_eq!(playbook.vars["target"].as_deref(), Some("{{ host }}"));
        assert_eq!(playbook.file(), Some("${FILE}.yml"));
        assert_eq!(playbook.inventory.as_deref(), Some("${INV}"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = GlobalConfig::from_file("/nonexistent/ansible.yml").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad { .. }));
    }
}
