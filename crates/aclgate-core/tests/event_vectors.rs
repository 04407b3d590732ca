//! Admin stream payload vector tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use aclgate_core::protocol::{AccessEvent, StatSnapshot};


#[test]
fn parse_access_event() {
    let ev: AccessEvent = serde_json::from_str(&vector_loader::read("access_event.json")).unwrap();
    assert_eq!(ev.consumer, "c1");
    assert_eq!(ev.method, "/Biz/Add");
    assert_eq!(ev.host_address, "127.0.0.1:50211");
}

#[test]
fn access_event_rejects_unknown_fields() {
    let bad = r#"{"consumer":"c1","method":"/Biz/Add","host_address":"x","hots":"y"}"#;
    assert!(serde_json::from_str::<AccessEvent>(bad).is_err());
}

#[test]
fn parse_stat_snapshot() {
    let s: StatSnapshot = serde_json::from_str(&vector_loader::read("stat_snapshot.json")).unwrap();
    assert_eq!(s.by_method["/Biz/Add"], 3);
    assert_eq!(s.by_consumer["c2"], 1);
    assert_eq!(s.total_calls(), 4);
    assert!(!s.is_empty());
}

#[test]
fn empty_snapshot_encodes_both_maps() {
    let s = StatSnapshot::default();
    assert!(s.is_empty());
    assert_eq!(serde_json::to_string(&s).unwrap(), r#"{"by_method":{},"by_consumer":{}}"#);
}
