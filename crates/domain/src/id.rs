//! Typed identifier newtypes.
//!
//! Store ids are opaque strings assigned by the upstream configuration
//! source — they are never generated locally. Event ids are random UUIDs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique identifier for a store, as supplied by the configuration source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(String);

impl StoreId {
    /// Wrap an upstream-supplied identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is empty (invalid for scheduling).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for StoreId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for StoreId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unique identifier for an [`Event`](crate::event::Event).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(uuid::Uuid);

impl Default for EventId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl EventId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Access the inner UUID.
    #[must_use]
    pub fn as_uuid(self) -> uuid::Uuid {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EventId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_store_id_through_serde_json() {
        let id = StoreId::new("store-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"store-42\"");
        let parsed: StoreId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_report_empty_store_id() {
        assert!(StoreId::new("").is_empty());
        assert!(!StoreId::new("s1").is_empty());
    }

    #[test]
    fn should_generate_unique_event_ids_when_called_twice() {
        let a = EventId::new();
        let b = EventId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn should_roundtrip_event_id_through_display_and_from_str() {
        let id = EventId::new();
        let text = id.to_string();
        let parsed: EventId = text.parse().unwrap();
        assert_eq!(id, parsed);
    }
}
