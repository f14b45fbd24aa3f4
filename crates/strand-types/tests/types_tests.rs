//! Integration tests for strand-types.

use strand_types::{CableId, StrandError, SubscriberId, VirtualPointId};

// ─── ID Tests ──────────────────────────────────────────────────

#[test]
fn virtual_point_ids_order_by_value() {
    let mut ids = vec![VirtualPointId(7), VirtualPointId(2), VirtualPointId::from(5)];
    ids.sort();
    assert_eq!(ids, vec![VirtualPointId(2), VirtualPointId(5), VirtualPointId(7)]);
}

#[test]
fn cable_and_subscriber_ids_compare_by_value() {
    assert_eq!(CableId::from(3), CableId(3));
    assert_ne!(SubscriberId(1), SubscriberId(2));
}

#[test]
fn ids_are_serializable() {
    let id = VirtualPointId(100);
    let json = serde_json::to_string(&id).unwrap();
    let deserialized: VirtualPointId = serde_json::from_str(&json).unwrap();
    assert_eq!(id, deserialized);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = StrandError::InvalidConfig("node_count must be > 1".into());
    assert!(err.to_string().contains("node_count"));
}

#[test]
fn node_out_of_range_display() {
    let err = StrandError::NodeOutOfRange { index: 12, count: 10 };
    let msg = err.to_string();
    assert!(msg.contains("12"));
    assert!(msg.contains("10"));
}

#[test]
fn io_error_converts() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "scene.toml");
    let err: StrandError = io.into();
    assert!(matches!(err, StrandError::Io(_)));
}
