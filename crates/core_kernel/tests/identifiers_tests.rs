//! Comprehensive unit tests for the Identifiers module
//!
//! Tests cover all identifier types, their creation, parsing,
//! conversion, and display formatting.

use chrono::TimeZone;
use core_kernel::{ApplicationId, EventId, WorkflowId};
use uuid::Uuid;

mod workflow_id_tests {
    use super::*;

    #[test]
    fn test_new_generates_unique_ids() {
        let id1 = WorkflowId::new();
        let id2 = WorkflowId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_new_v7_generates_time_ordered_ids() {
        let id1 = WorkflowId::new_v7();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = WorkflowId::new_v7();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }

    #[test]
    fn test_from_uuid() {
        let uuid = Uuid::new_v4();
        let id = WorkflowId::from_uuid(uuid);
        assert_eq!(*id.as_uuid(), uuid);
    }

    #[test]
    fn test_prefix() {
        assert_eq!(WorkflowId::prefix(), "WFL");
    }

    #[test]
    fn test_display_format() {
        let id = WorkflowId::new();
        let display = id.to_string();
        assert!(display.starts_with("WFL-"));
    }

    #[test]
    fn test_from_str_with_prefix() {
        let original = WorkflowId::new();
        let string = original.to_string();
        let parsed: WorkflowId = string.parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_uuid_conversion() {
        let uuid = Uuid::new_v4();
        let id: WorkflowId = uuid.into();
        let back: Uuid = id.into();
        assert_eq!(uuid, back);
    }

    #[test]
    fn test_json_serialization() {
        let id = WorkflowId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: WorkflowId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn test_default_is_time_ordered() {
        let id1 = WorkflowId::default();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let id2 = WorkflowId::default();
        let uuid1: Uuid = id1.into();
        let uuid2: Uuid = id2.into();
        assert!(uuid1 < uuid2);
    }
}

mod application_id_tests {
    use super::*;

    #[test]
    fn test_round_trips_as_opaque_string() {
        let id = ApplicationId::new("APP001");
        assert_eq!(id.as_str(), "APP001");
        assert_eq!(id.to_string(), "APP001");
    }

    #[test]
    fn test_from_string() {
        let id: ApplicationId = "APP042".to_string().into();
        assert_eq!(id.as_str(), "APP042");
    }

    #[test]
    fn test_from_str_ref() {
        let id: ApplicationId = "APP042".into();
        assert_eq!(id.as_str(), "APP042");
    }

    #[test]
    fn test_equality_is_by_value() {
        assert_eq!(ApplicationId::new("APP001"), ApplicationId::new("APP001"));
        assert_ne!(ApplicationId::new("APP001"), ApplicationId::new("APP002"));
    }

    #[test]
    fn test_json_round_trip() {
        let id = ApplicationId::new("APP777");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"APP777\"");
        let back: ApplicationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod event_id_tests {
    use super::*;

    #[test]
    fn test_format_matches_evt_timestamp_counter() {
        let started = utc_ymd_hms(2026, 3, 14, 8, 9, 1);
        let id = EventId::new(started, 3);
        assert_eq!(id.as_str(), "evt_20260314080901_0003");
    }

    #[test]
    fn test_counter_is_zero_padded_to_four_digits() {
        let started = utc_ymd_hms(2026, 3, 14, 8, 9, 1);
        assert_eq!(EventId::new(started, 1).as_str(), "evt_20260314080901_0001");
        assert_eq!(EventId::new(started, 42).as_str(), "evt_20260314080901_0042");
        assert_eq!(EventId::new(started, 9999).as_str(), "evt_20260314080901_9999");
    }

    #[test]
    fn test_same_workflow_timestamp_differs_only_by_counter() {
        let started = utc_ymd_hms(2026, 1, 1, 0, 0, 0);
        let a = EventId::new(started, 1);
        let b = EventId::new(started, 2);
        assert_ne!(a, b);
        assert!(a.as_str() < b.as_str());
    }

    fn utc_ymd_hms(
        y: i32,
        m: u32,
        d: u32,
        h: u32,
        mi: u32,
        s: u32,
    ) -> chrono::DateTime<chrono::Utc> {
        chrono::Utc.with_ymd_and_hms(y, m, d, h, mi, s).unwrap()
    }
}

mod edge_cases {
    use super::*;

    #[test]
    fn test_nil_uuid() {
        let nil_uuid = Uuid::nil();
        let id = WorkflowId::from_uuid(nil_uuid);
        assert!(id.as_uuid().is_nil());
    }

    #[test]
    fn test_max_uuid() {
        let max_uuid = Uuid::max();
        let id = WorkflowId::from_uuid(max_uuid);
        assert_eq!(*id.as_uuid(), max_uuid);
    }

    #[test]
    fn test_empty_application_id_is_allowed_at_the_type_level() {
        // Validation that applicationNumber is non-empty belongs to the
        // HTTP request DTO, not this newtype.
        let id = ApplicationId::new("");
        assert_eq!(id.as_str(), "");
    }
}
