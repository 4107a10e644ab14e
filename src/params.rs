//! Caller parameters and placeholder substitution.
//!
//! Callers pass parameters as one string of comma-separated `key=value`
//! pairs (`"env=prod,host=2"`). Variable values reference them through
//! `{{ key }}` placeholders, with any number of spaces allowed just inside
//! the braces (`{{key}}`, `{{ key}}` and `{{  key  }}` all match).
//!
//! The `host` parameter is special: its value is a 1-based index into the
//! playbook's comma-separated `hosts` property, and `{{ host }}` is replaced
//! by the selected host rather than by the index itself.
//!
//! Substitution is a single pass over the raw value. Text inserted for one
//! placeholder is never scanned again, and placeholders without a matching
//! parameter are left as they are.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use crate::error::{Error, Result};
use crate::playbook::Playbook;

/// Parameter whose value selects an entry of the `hosts` property.
pub const HOST_PARAMETER: &str = "host";

/// Parsed caller parameters, in the order they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerParameters {
    pairs: Vec<(String, String)>,
}

impl CallerParameters {
    /// Parses a comma-separated list of `key=value` pairs.
    ///
    /// Each pair is split on its first `=`, so `key=a=b` yields the value
    /// `a=b`. Segments without any `=` are ignored.
    pub fn parse(raw: &str) -> Self {
        let pairs = raw
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self { pairs }
    }

    /// Returns true when no pair was given.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of pairs, duplicates included.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Iterates over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Value of the first pair with this key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
}

impl From<&str> for CallerParameters {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for CallerParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

/// Any `{{ name }}` token; the name excludes braces and surrounding spaces.
static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{ *([^{}]*?) *\}\}").expect("Invalid placeholder regex")
});

/// Placeholder replacements resolved for one playbook and parameter set.
///
/// Building a `Substitutor` validates every `host` pair up front, so an
/// invalid host index is reported even if no value mentions `{{ host }}`.
#[derive(Debug, Clone, Default)]
pub struct Substitutor {
    replacements: IndexMap<String, String>,
}

impl Substitutor {
    /// Resolves the replacements for `params` against `playbook`.
    ///
    /// When a key is given more than once, the first pair wins.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`] when a `host` value is not an integer or is
    /// outside `1..=hosts.len()`. A `host` pair is only treated as an index
    /// when the playbook defines a non-empty `hosts` property; otherwise it
    /// is substituted like any other parameter.
    pub fn new(params: &CallerParameters, playbook: &Playbook) -> Result<Self> {
        let hosts = playbook.hosts();
        let mut replacements = IndexMap::with_capacity(params.len());

        for (key, value) in params.iter() {
            let replacement = match &hosts {
                Some(hosts) if key == HOST_PARAMETER => select_host(value, hosts)?,
                _ => value,
            };
            replacements
                .entry(key.to_string())
                .or_insert_with(|| replacement.to_string());
        }

        Ok(Self { replacements })
    }

    /// Replaces every placeholder whose name has a replacement in `raw`.
    pub fn apply(&self, raw: &str) -> String {
        if self.replacements.is_empty() {
            return raw.to_string();
        }

        PLACEHOLDER_REGEX
            .replace_all(raw, |caps: &Captures<'_>| {
                self.replacements
                    .get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }
}

/// Resolves every placeholder in `raw` from `params`.
///
/// Convenience wrapper around [`Substitutor`] for a single value.
pub fn substitute(raw: &str, params: &CallerParameters, playbook: &Playbook) -> Result<String> {
    Ok(Substitutor::new(params, playbook)?.apply(raw))
}

/// Picks the host for a 1-based `ordinal` string.
fn select_host<'h>(ordinal: &str, hosts: &[&'h str]) -> Result<&'h str> {
    let ordinal: i64 = ordinal
        .parse()
        .map_err(|_| Error::configuration("invalid host index"))?;

    ordinal
        .checked_sub(1)
        .and_then(|index| usize::try_from(index).ok())
        .and_then(|index| hosts.get(index).copied())
        .ok_or_else(|| Error::configuration("host index out of range"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn playbook() -> Playbook {
        Playbook::new("deploy", "site.yml").with_property("hosts", "a,b,c")
    }

    fn run(raw: &str, params: &str) -> Result<String> {
        substitute(raw, &CallerParameters::parse(params), &playbook())
    }

    #[test]
    fn test_parse_pairs() {
        let params = CallerParameters::parse("env=prod,host=2,flag,key=a=b,empty=");
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("env", "prod"), ("host", "2"), ("key", "a=b"), ("empty", "")]
        );
        assert_eq!(params.get("key"), Some("a=b"));
        assert_eq!(params.to_string(), "env=prod,host=2,key=a=b,empty=");
    }

    #[test]
    fn test_parse_empty() {
        assert!(CallerParameters::parse("").is_empty());
        assert!(CallerParameters::parse(",,novalue").is_empty());
    }

    #[test]
    fn test_no_parameters_returns_raw() {
        assert_eq!(run("{{ env }}", "").unwrap(), "{{ env }}");
    }

    #[test]
    fn test_standard_substitution_spacing() {
        assert_eq!(run("{{ env }}", "env=prod").unwrap(), "prod");
        assert_eq!(run("{{env}}", "env=prod").unwrap(), "prod");
        assert_eq!(run("{{ env}}-{{env  }}", "env=prod").unwrap(), "prod-prod");
        assert_eq!(run("{{\tenv }}", "env=prod").unwrap(), "{{\tenv }}");
    }

    #[test]
    fn test_multiple_placeholders() {
        assert_eq!(
            run("{{ app }}-{{ env }}-{{ app }}", "env=prod,app=web").unwrap(),
            "web-prod-web"
        );
    }

    #[test]
    fn test_unmatched_placeholder_left_untouched() {
        assert_eq!(run("{{ env }}/{{ region }}", "env=prod").unwrap(), "prod/{{ region }}");
    }

    #[test]
    fn test_substituted_value_not_rescanned() {
        assert_eq!(run("{{ a }}", "a={{ b }},b=nested").unwrap(), "{{ b }}");
    }

    #[test]
    fn test_first_duplicate_wins() {
        assert_eq!(run("{{ env }}", "env=one,env=two").unwrap(), "one");
    }

    #[test]
    fn test_key_is_literal() {
        assert_eq!(run("{{ a.b }}|{{ axb }}", "a.b=dot").unwrap(), "dot|{{ axb }}");
    }

    #[test]
    fn test_replacement_is_literal() {
        assert_eq!(run("{{ env }}", "env=$1${0}").unwrap(), "$1${0}");
    }

    #[test]
    fn test_host_index_boundaries() {
        assert_eq!(run("{{ host }}", "host=1").unwrap(), "a");
        assert_eq!(run("{{host}}", "host=3").unwrap(), "c");

        for bad in ["host=0", "host=4", "host=-1"] {
            let err = run("{{ host }}", bad).unwrap_err();
            assert_eq!(err.to_string(), "Configuration error: host index out of range");
        }

        let err = run("{{ host }}", "host=x").unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: invalid host index");
    }

    #[test]
    fn test_invalid_host_reported_without_placeholder() {
        assert!(run("static", "host=9").unwrap_err().is_configuration());
    }

    #[test]
    fn test_host_without_hosts_property_is_standard() {
        let playbook = Playbook::new("deploy", "site.yml");
        let params = CallerParameters::parse("host=x");
        assert_eq!(substitute("{{ host }}", &params, &playbook).unwrap(), "x");
    }

    #[test]
    fn test_host_and_standard_together() {
        assert_eq!(run("{{ host }}:{{ port }}", "port=22,host=2").unwrap(), "b:22");
    }

    #[test]
    fn test_many_parameters() {
        let raw: Vec<String> = (0..5000)
            .map(|i| format!("key_number_{:06}_with_padding_text={}", i, i))
            .collect();
        let params = CallerParameters::parse(&raw.join(","));
        assert_eq!(params.len(), 5000);

        let substituted = substitute(
            "x={{ key_number_000001_with_padding_text }} y={{key_number_004999_with_padding_text}}",
            &params,
            &playbook(),
        )
        .unwrap();
        assert_eq!(substituted, "x=1 y=4999");
    }

    #[test]
    fn test_placeholder_name_cannot_span_braces() {
        assert_eq!(run("{{ a {{ env }}", "env=prod").unwrap(), "{{ a prod");
    }

    #[test]
    fn test_substitutor_reused() {
        let playbook = playbook();
        let params = CallerParameters::parse("host=2,env=qa");
        let substitutor = Substitutor::new(&params, &playbook).unwrap();
        assert_eq!(substitutor.apply("{{ host }}"), "b");
        assert_eq!(substitutor.apply("{{ env }}"), "qa");
        assert_eq!(substitutor.apply("plain"), "plain");
    }
}
