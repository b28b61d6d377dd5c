//! Schedule entry — one store's launch configuration.
//!
//! Entries are assembled when upstream configuration is loaded and are
//! immutable afterwards: a settings change produces a fresh entry list that
//! is swapped in atomically, so the monitor never observes a half-updated
//! entry mid-tick.

use serde::{Deserialize, Serialize};

use crate::error::{StorePilotError, ValidationError};
use crate::id::StoreId;
use crate::time::Timestamp;

/// Launch configuration for a single store.
///
/// `target_instant` is the canonical start instant; `None` means the store
/// has no automatic trigger and only manual dispatch applies. The remaining
/// fields are opaque pass-through parameters forwarded verbatim to the
/// automation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub store_id: StoreId,
    pub display_name: String,
    pub target_instant: Option<Timestamp>,
    pub visit_date: String,
    pub visit_time: String,
    pub carrier: String,
    pub contact_message: String,
    pub identity_email: String,
}

impl ScheduleEntry {
    /// Create a builder for constructing a [`ScheduleEntry`].
    #[must_use]
    pub fn builder() -> ScheduleEntryBuilder {
        ScheduleEntryBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StorePilotError::Validation`] when:
    /// - `store_id` is empty ([`ValidationError::EmptyStoreId`])
    /// - `display_name` is empty ([`ValidationError::EmptyDisplayName`])
    pub fn validate(&self) -> Result<(), StorePilotError> {
        if self.store_id.is_empty() {
            return Err(ValidationError::EmptyStoreId.into());
        }
        if self.display_name.is_empty() {
            return Err(ValidationError::EmptyDisplayName.into());
        }
        Ok(())
    }

    /// Whether this entry can ever fire automatically.
    #[must_use]
    pub fn has_target(&self) -> bool {
        self.target_instant.is_some()
    }

    /// Whether the target instant has been reached at `now`.
    ///
    /// Entries without a target are never due.
    #[must_use]
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.target_instant.is_some_and(|target| now >= target)
    }
}

/// Step-by-step builder for [`ScheduleEntry`].
#[derive(Debug, Default)]
pub struct ScheduleEntryBuilder {
    store_id: Option<StoreId>,
    display_name: Option<String>,
    target_instant: Option<Timestamp>,
    visit_date: Option<String>,
    visit_time: Option<String>,
    carrier: Option<String>,
    contact_message: Option<String>,
    identity_email: Option<String>,
}

impl ScheduleEntryBuilder {
    #[must_use]
    pub fn store_id(mut self, id: impl Into<StoreId>) -> Self {
        self.store_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn target_instant(mut self, ts: Timestamp) -> Self {
        self.target_instant = Some(ts);
        self
    }

    #[must_use]
    pub fn maybe_target_instant(mut self, ts: Option<Timestamp>) -> Self {
        self.target_instant = ts;
        self
    }

    #[must_use]
    pub fn visit_date(mut self, value: impl Into<String>) -> Self {
        self.visit_date = Some(value.into());
        self
    }

    #[must_use]
    pub fn visit_time(mut self, value: impl Into<String>) -> Self {
        self.visit_time = Some(value.into());
        self
    }

    #[must_use]
    pub fn carrier(mut self, value: impl Into<String>) -> Self {
        self.carrier = Some(value.into());
        self
    }

    #[must_use]
    pub fn contact_message(mut self, value: impl Into<String>) -> Self {
        self.contact_message = Some(value.into());
        self
    }

    #[must_use]
    pub fn identity_email(mut self, value: impl Into<String>) -> Self {
        self.identity_email = Some(value.into());
        self
    }

    /// Consume the builder, validate, and return a [`ScheduleEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`StorePilotError::Validation`] if required fields are
    /// missing or empty.
    pub fn build(self) -> Result<ScheduleEntry, StorePilotError> {
        let entry = ScheduleEntry {
            store_id: self.store_id.unwrap_or_else(|| StoreId::new("")),
            display_name: self.display_name.unwrap_or_default(),
            target_instant: self.target_instant,
            visit_date: self.visit_date.unwrap_or_default(),
            visit_time: self.visit_time.unwrap_or_default(),
            carrier: self.carrier.unwrap_or_default(),
            contact_message: self.contact_message.unwrap_or_default(),
            identity_email: self.identity_email.unwrap_or_default(),
        };
        entry.validate()?;
        Ok(entry)
    }
}
