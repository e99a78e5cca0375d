use sdr_discovery::{FileRegistry, ServiceDiscovery};
use sdr_testkit::{
    application, fixture_dir, secure_instance, up_instance, write_registry_file, RecordingHandler,
};

#[test]
fn secure_instance_is_announced_on_secure_port() {
    let dir = fixture_dir().unwrap();
    let path = write_registry_file(
        dir.path(),
        "registry.json",
        &[application(
            "ORDERS",
            vec![
                secure_instance("s", "secure.local", 8080, 8443),
                up_instance("p", "plain.local", 8080),
            ],
        )],
    )
    .unwrap();

    let handler = RecordingHandler::new();
    let mut sd = ServiceDiscovery::new("ORDERS", FileRegistry::new(&path));
    sd.listen(handler.clone()).unwrap();

    assert_eq!(
        handler.summary(),
        vec!["REGISTER(id=s, secure.local:8443)", "REGISTER(id=p, plain.local:8080)"]
    );
    let s = sd.view().get("s").unwrap();
    assert!(s.is_secure());
    assert_eq!(s.port(), 8443);
    assert_eq!(s.plain_port(), 8080);
}

#[test]
fn enabling_secure_port_moves_the_target() {
    let dir = fixture_dir().unwrap();
    let apps_before = [application("ORDERS", vec![up_instance("1", "h1", 8080)])];
    let path = write_registry_file(dir.path(), "registry.json", &apps_before).unwrap();

    let handler = RecordingHandler::new();
    let mut sd = ServiceDiscovery::new("ORDERS", FileRegistry::new(&path));
    sd.listen(handler.clone()).unwrap();
    handler.take();

    let apps_after = [application(
        "ORDERS",
        vec![secure_instance("1", "h1", 8080, 8443)],
    )];
    write_registry_file(dir.path(), "registry.json", &apps_after).unwrap();
    sd.refresh().unwrap();

    assert_eq!(
        handler.take(),
        vec!["UNREGISTER(id=1, h1:8080)", "REGISTER(id=1, h1:8443)"]
    );
}

#[test]
fn secure_toggle_with_same_port_number_is_not_a_change() {
    let dir = fixture_dir().unwrap();
    let path = write_registry_file(
        dir.path(),
        "registry.json",
        &[application("ORDERS", vec![up_instance("1", "h1", 8443)])],
    )
    .unwrap();

    let handler = RecordingHandler::new();
    let mut sd = ServiceDiscovery::new("ORDERS", FileRegistry::new(&path));
    sd.listen(handler.clone()).unwrap();
    handler.take();

    write_registry_file(
        dir.path(),
        "registry.json",
        &[application("ORDERS", vec![secure_instance("1", "h1", 80, 8443)])],
    )
    .unwrap();
    assert!(sd.refresh().unwrap().is_empty());
    assert!(handler.is_empty());
    // The stored endpoint is the original plain one.
    assert!(!sd.view().get("1").unwrap().is_secure());
}
