use sdr_config::{
    consumed_pointers_for_mode, load_layered_yaml_from_strings, report_unused_keys, ConfigMode,
    UnusedKeyPolicy,
};

const WATCH_YAML: &str = r#"
service_discovery:
  application: "ORDERS"
  registry:
    source: "registry.json"
  refresh:
    interval_secs: 10
"#;

#[test]
fn watch_config_is_clean_in_watch_mode() {
    let loaded = load_layered_yaml_from_strings(&[WATCH_YAML]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Watch, &loaded.config_json, UnusedKeyPolicy::Fail).unwrap();
    assert!(report.is_clean());
    assert_eq!(report.mode, "WATCH");
}

#[test]
fn refresh_interval_is_unused_in_resolve_mode() {
    let loaded = load_layered_yaml_from_strings(&[WATCH_YAML]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Resolve, &loaded.config_json, UnusedKeyPolicy::Warn)
            .unwrap();
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/service_discovery/refresh/interval_secs".to_string()]
    );
}

#[test]
fn fail_policy_errors_on_unused_keys() {
    let yaml = r#"
service_discovery:
  application: "ORDERS"
  registry:
    source: "registry.json"
  retries: 3
"#;
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let err = report_unused_keys(ConfigMode::Watch, &loaded.config_json, UnusedKeyPolicy::Fail)
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("CONFIG_UNUSED_KEYS (mode=WATCH)"), "{msg}");
    assert!(msg.contains("/service_discovery/retries"), "{msg}");
}

#[test]
fn unused_pointers_are_sorted() {
    let yaml = r#"
unused:
  b: 2
  a: 1
"#;
    let loaded = load_layered_yaml_from_strings(&[yaml]).unwrap();
    let report =
        report_unused_keys(ConfigMode::Resolve, &loaded.config_json, UnusedKeyPolicy::Warn)
            .unwrap();
    assert_eq!(
        report.unused_leaf_pointers,
        vec!["/unused/a".to_string(), "/unused/b".to_string()]
    );
}

#[test]
fn watch_consumes_everything_resolve_does() {
    let resolve = consumed_pointers_for_mode(ConfigMode::Resolve);
    let watch = consumed_pointers_for_mode(ConfigMode::Watch);
    assert!(resolve.iter().all(|p| watch.contains(p)));
}
