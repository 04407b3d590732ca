#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use aclgate_gateway::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
gateway:
  listen: "127.0.0.1:8082"
  subscriber_queu: 8 # typo should fail
acl:
  rules: { c1: ["/Biz/*"] }
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
acl:
  rules:
    c1: ["/Biz/*"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.gateway.listen, "127.0.0.1:8082");
    assert_eq!(cfg.gateway.subscriber_queue, 256);

    let acl = config::load_acl(&cfg).expect("acl must compile");
    assert!(acl.is_allowed("c1", "/Biz/Add"));
}

#[test]
fn unsupported_version() {
    let bad = r#"
version: 2
acl:
  rules: {}
"#;
    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "UNSUPPORTED_VERSION");
}

#[test]
fn acl_source_must_be_exactly_one() {
    let both = r#"
version: 1
acl:
  path: "acl.json"
  rules: { c1: ["/Biz/*"] }
"#;
    assert!(config::load_from_str(both).is_err());

    let neither = r#"
version: 1
acl: {}
"#;
    assert!(config::load_from_str(neither).is_err());
}

#[test]
fn gateway_section_ranges() {
    let bad_listen = r#"
version: 1
gateway:
  listen: "not-an-addr"
acl:
  rules: {}
"#;
    assert!(config::load_from_str(bad_listen).is_err());

    let zero_queue = r#"
version: 1
gateway:
  subscriber_queue: 0
acl:
  rules: {}
"#;
    assert!(config::load_from_str(zero_queue).is_err());
}

#[test]
fn malformed_acl_pattern_is_fatal() {
    let cfg = config::load_from_str(
        r#"
version: 1
acl:
  rules:
    c1: ["/Biz/*/Add"]
"#,
    )
    .expect("yaml itself is fine");

    let err = config::load_acl(&cfg).expect_err("wildcard in the middle must fail");
    assert!(err.to_string().contains("c1"), "{err}");
}

#[test]
fn acl_file_is_read_as_json() {
    let dir = std::env::temp_dir().join(format!("aclgate-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let acl_path = dir.join("acl.json");
    std::fs::write(&acl_path, r#"{"c2": ["/Biz/Check"], "admin": ["*"]}"#).unwrap();

    let yaml = format!("version: 1\nacl:\n  path: {:?}\n", acl_path.display().to_string());
    let cfg = config::load_from_str(&yaml).unwrap();
    let acl = config::load_acl(&cfg).unwrap();
    assert!(acl.is_allowed("c2", "/Biz/Check"));
    assert!(acl.is_allowed("admin", "/Admin/Logging"));

    std::fs::write(&acl_path, r#"{"c2": "/Biz/Check"}"#).unwrap();
    let err = config::load_acl(&cfg).expect_err("pattern list must be an array");
    assert_eq!(err.client_code().as_str(), "BAD_REQUEST");

    let _ = std::fs::remove_dir_all(&dir);
}
