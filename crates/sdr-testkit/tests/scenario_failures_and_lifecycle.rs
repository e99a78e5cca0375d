//! Scenario: failure paths and the listener lifecycle.
//!
//! # Invariants under test
//!
//! 1. A registry failure emits nothing and leaves the view unchanged.
//! 2. The next successful refresh reconciles normally.
//! 3. A handler failure stops the pass; earlier mutations stand.
//! 4. Only cache-refresh notifications trigger a refresh.
//! 5. `stop` delegates to the registry client's shutdown.

use sdr_discovery::{
    DiscoveryError, InstanceStatus, RegistryError, RegistryEvent, ServiceDiscovery,
};
use sdr_testkit::{application, up_instance, FailingHandler, RecordingHandler, ScriptedRegistry};

fn two_up() -> ScriptedRegistry {
    ScriptedRegistry::with_applications(vec![application(
        "ORDERS",
        vec![up_instance("1", "h1", 80), up_instance("2", "h2", 80)],
    )])
}

#[test]
fn registry_failure_leaves_view_and_recovers() {
    let registry = two_up();
    let handler = RecordingHandler::new();
    let mut sd = ServiceDiscovery::new("ORDERS", registry.clone());
    sd.listen(handler.clone()).unwrap();
    handler.take();

    registry.set_application(application("ORDERS", vec![up_instance("3", "h3", 80)]));
    registry.fail_next(RegistryError::Unavailable("503".to_string()));

    let err = sd.refresh().unwrap_err();
    assert!(matches!(err, DiscoveryError::ResolutionFailure { .. }));
    assert!(handler.is_empty());
    assert_eq!(sd.view().ids(), vec!["1", "2"]);

    sd.refresh().unwrap();
    assert_eq!(
        handler.take(),
        vec![
            "REGISTER(id=3, h3:80)",
            "UNREGISTER(id=1, h1:80)",
            "UNREGISTER(id=2, h2:80)",
        ]
    );
}

#[test]
fn listen_with_failing_registry_installs_handler_anyway() {
    let registry = two_up();
    registry.fail_next(RegistryError::Malformed("truncated".to_string()));

    let handler = RecordingHandler::new();
    let mut sd = ServiceDiscovery::new("ORDERS", registry.clone());
    assert!(sd.listen(handler.clone()).is_err());
    assert!(sd.is_listening());
    assert!(sd.view().is_empty());

    assert_eq!(sd.refresh().unwrap().len(), 2);
    assert_eq!(handler.len(), 2);
}

#[test]
fn handler_failure_stops_pass_and_keeps_prior_mutations() {
    let registry = ScriptedRegistry::with_applications(vec![application(
        "ORDERS",
        vec![
            up_instance("1", "h1", 80),
            up_instance("2", "h2", 80),
            up_instance("3", "h3", 80),
        ],
    )]);
    let handler = FailingHandler::after(1);
    let mut sd = ServiceDiscovery::new("ORDERS", registry);

    let err = sd.listen(handler.clone()).unwrap_err();
    match err {
        DiscoveryError::Listener { event, reason } => {
            assert_eq!(event, "REGISTER(id=2, h2:80)");
            assert!(reason.contains("handler rejected"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(handler.recorded().summary(), vec!["REGISTER(id=1, h1:80)"]);
    assert_eq!(sd.view().ids(), vec!["1", "2"]);
}

#[test]
fn only_cache_refresh_triggers_a_lookup() {
    let registry = two_up();
    let mut sd = ServiceDiscovery::new("ORDERS", registry.clone());
    sd.listen(RecordingHandler::new()).unwrap();
    assert_eq!(registry.lookups(), 1);

    let ignored = [
        RegistryEvent::StatusChanged {
            previous: InstanceStatus::Up,
            current: InstanceStatus::Down,
        },
        RegistryEvent::Other("heartbeat".to_string()),
    ];
    for n in &ignored {
        assert!(sd.on_registry_event(n).unwrap().is_empty());
    }
    assert_eq!(registry.lookups(), 1);

    sd.on_registry_event(&RegistryEvent::CacheRefreshed).unwrap();
    assert_eq!(registry.lookups(), 2);
}

#[test]
fn stop_delegates_to_client_shutdown() {
    let registry = two_up();
    let mut sd = ServiceDiscovery::new("ORDERS", registry.clone());
    sd.listen(RecordingHandler::new()).unwrap();

    sd.stop().unwrap();
    assert_eq!(registry.shutdown_calls(), 1);
    assert_eq!(sd.view().len(), 2);
    assert!(matches!(
        sd.refresh(),
        Err(DiscoveryError::ResolutionFailure { .. })
    ));
}

#[test]
fn independent_instances_keep_independent_views() {
    let registry = ScriptedRegistry::with_applications(vec![
        application("ORDERS", vec![up_instance("o1", "h1", 80)]),
        application("BILLING", vec![up_instance("b1", "h2", 80)]),
    ]);
    let mut orders = ServiceDiscovery::new("ORDERS", registry.clone());
    let mut billing = ServiceDiscovery::new("BILLING", registry.clone());
    orders.listen(RecordingHandler::new()).unwrap();
    billing.listen(RecordingHandler::new()).unwrap();

    registry.remove_application("ORDERS");
    assert_eq!(orders.refresh().unwrap().len(), 1);
    assert!(billing.refresh().unwrap().is_empty());

    assert!(orders.view().is_empty());
    assert_eq!(billing.view().ids(), vec!["b1"]);
}
