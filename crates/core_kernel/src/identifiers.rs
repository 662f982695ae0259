//! Strongly-typed identifiers for workflow entities
//!
//! Using newtype wrappers prevents accidental mixing of different
//! identifier types across the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! define_uuid_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates a new time-ordered identifier (v7)
            pub fn new_v7() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates from an existing UUID
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new_v7()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let uuid_str = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(Uuid::parse_str(uuid_str)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

// One workflow run of the orchestrator (§4.G). Time-ordered by construction.
define_uuid_id!(WorkflowId, "WFL");

/// The caller-supplied application number (e.g. `"APP001"`).
///
/// Unlike the other identifiers in this module this is not a UUID — the
/// source system and `spec.md` both treat it as an opaque token supplied in
/// the request body (`applicationDetails.applicationNumber`) and used
/// verbatim as the document store's partition key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(String);

impl ApplicationId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ApplicationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ApplicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A per-workflow monotonic event identifier: `evt_<YYYYMMDDHHMMSS>_<counter>`.
///
/// The timestamp component is fixed to the workflow's start time (not
/// re-stamped per event) so that ordering within a workflow is carried
/// entirely by the zero-padded counter, matching
/// `streaming_orchestrator.py::_generate_event_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    pub fn new(workflow_started_at: DateTime<Utc>, counter: u32) -> Self {
        Self(format!(
            "evt_{}_{:04}",
            workflow_started_at.format("%Y%m%d%H%M%S"),
            counter
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_workflow_id_display() {
        let id = WorkflowId::new();
        assert!(id.to_string().starts_with("WFL-"));
    }

    #[test]
    fn test_workflow_id_parsing() {
        let original = WorkflowId::new_v7();
        let parsed: WorkflowId = original.to_string().parse().unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_application_id_round_trips_as_opaque_string() {
        let id = ApplicationId::new("APP001");
        assert_eq!(id.as_str(), "APP001");
        assert_eq!(id.to_string(), "APP001");
    }

    #[test]
    fn test_event_id_format_and_counter_padding() {
        let started = Utc.with_ymd_and_hms(2026, 1, 5, 9, 30, 2).unwrap();
        let first = EventId::new(started, 1);
        let tenth = EventId::new(started, 10);
        assert_eq!(first.as_str(), "evt_20260105093002_0001");
        assert_eq!(tenth.as_str(), "evt_20260105093002_0010");
    }
}
