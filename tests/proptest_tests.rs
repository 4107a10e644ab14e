//! Property-based tests for placeholder substitution and host selection.

use ansible_launch::command::build;
use ansible_launch::params::{substitute, CallerParameters};
use ansible_launch::playbook::{GlobalConfig, Playbook};
use proptest::collection::vec;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Parameter names, excluding the special `host` key
fn param_key() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,11}".prop_filter("not the host key", |k| k.as_str() != "host")
}

/// Parameter values that survive `key=value,...` parsing
fn param_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._/=-]{0,16}"
}

/// Text that cannot contain a placeholder
fn plain_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ._:/=-]{0,40}"
}

fn hostname() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}"
}

fn playbook() -> Playbook {
    Playbook::new("deploy", "site.yml")
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_text_without_placeholders_is_unchanged(
        raw in plain_text(),
        key in param_key(),
        value in param_value(),
    ) {
        let params = CallerParameters::parse(&format!("{}={}", key, value));
        prop_assert_eq!(substitute(&raw, &params, &playbook()).unwrap(), raw);
    }

    #[test]
    fn prop_placeholder_is_replaced(
        key in param_key(),
        value in param_value(),
        left in 0usize..4,
        right in 0usize..4,
        prefix in plain_text(),
    ) {
        let raw = format!("{}{{{{{}{}{}}}}}", prefix, " ".repeat(left), key, " ".repeat(right));
        let params = CallerParameters::parse(&format!("{}={}", key, value));
        prop_assert_eq!(
            substitute(&raw, &params, &playbook()).unwrap(),
            format!("{}{}", prefix, value)
        );
    }

    #[test]
    fn prop_substitution_does_not_rescan(key in param_key(), other in param_key()) {
        prop_assume!(key != other);
        // The inserted text is itself a placeholder for `other`.
        let inserted = format!("{{{{{}}}}}", other);
        let params = CallerParameters::parse(&format!("{}={},{}=x", key, inserted, other));
        let raw = format!("{{{{ {} }}}}", key);
        prop_assert_eq!(substitute(&raw, &params, &playbook()).unwrap(), inserted);
    }

    #[test]
    fn prop_host_index_selects_host(
        hosts in vec(hostname(), 1..8),
        pick in any::<prop::sample::Index>(),
    ) {
        let index = pick.index(hosts.len());
        let config = GlobalConfig::default().with_playbook(
            playbook()
                .with_var("target", "{{ host }}")
                .with_property("hosts", hosts.join(",")),
        );

        let command = build(&config, "deploy", &format!("host={}", index + 1)).unwrap();
        let expected = format!("target={}", hosts[index]);
        prop_assert_eq!(command.tokens().last(), Some(&expected));

        let beyond = build(&config, "deploy", &format!("host={}", hosts.len() + 1));
        prop_assert!(beyond.unwrap_err().is_configuration());
    }

    #[test]
    fn prop_build_is_repeatable(
        hosts in vec(hostname(), 1..4),
        value in param_value(),
    ) {
        let config = GlobalConfig::default().with_playbook(
            playbook()
                .with_var("target", "{{ host }}")
                .with_var("value", "{{ value }}")
                .with_property("hosts", hosts.join(",")),
        );
        let parameters = format!("host=1,value={}", value);

        prop_assert_eq!(
            build(&config, "deploy", &parameters).unwrap(),
            build(&config, "deploy", &parameters).unwrap()
        );
    }
}
