//! # storepilot-adapter-rest
//!
//! [`ConfigurationSource`] implementation over the upstream HTTP API.
//!
//! The upstream exposes two endpoints: `/stores` (the store list) and
//! `/user-store-settings?email=` (one user's per-store settings plus their
//! carrier). This adapter fetches both, merges them by store id, and hands
//! back fully normalized [`ScheduleEntry`] values. The settings rows are
//! heterogeneous: the store id arrives as `storeId` or nested `store.id`,
//! and the start time in any of the shapes `normalize` understands. A row
//! the adapter cannot make sense of costs that store its automatic trigger,
//! never the whole fetch.
//!
//! ## Dependency rule
//! Depends on `storepilot-app` (port traits) and `storepilot-domain` only.

pub mod error;

use std::collections::HashMap;
use std::future::Future;

use serde::Deserialize;
use tracing::{debug, warn};

use storepilot_app::ports::ConfigurationSource;
use storepilot_domain::datetime::normalize;
use storepilot_domain::error::StorePilotError;
use storepilot_domain::schedule::ScheduleEntry;
use storepilot_domain::time::Timestamp;

use crate::error::RestError;

/// Defaults applied when a settings row leaves a field blank, matching what
/// the upstream service assumes.
const DEFAULT_VISIT_DATE: &str = "2025-05-29";
const DEFAULT_VISIT_TIME: &str = "14:00";
const DEFAULT_CARRIER: &str = "SKT";

/// Fetches schedules from the upstream REST API.
pub struct RestConfigSource {
    client: reqwest::Client,
    base_url: String,
    email: String,
}

impl RestConfigSource {
    #[must_use]
    pub fn new(base_url: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            email: email.into(),
        }
    }

    async fn fetch_stores(&self) -> Result<Vec<StoreDto>, RestError> {
        let endpoint = "/stores";
        let url = format!("{}{endpoint}", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| RestError::Request { endpoint, source })?;
        if !response.status().is_success() {
            return Err(RestError::Status {
                endpoint,
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| RestError::Decode { endpoint, source })
    }

    async fn fetch_settings(&self) -> Result<SettingsResponse, RestError> {
        let endpoint = "/user-store-settings";
        let url = format!("{}{endpoint}?email={}", self.base_url, self.email);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| RestError::Request { endpoint, source })?;
        if !response.status().is_success() {
            return Err(RestError::Status {
                endpoint,
                status: response.status().as_u16(),
            });
        }
        response
            .json()
            .await
            .map_err(|source| RestError::Decode { endpoint, source })
    }
}

impl ConfigurationSource for RestConfigSource {
    fn fetch_schedule(
        &self,
    ) -> impl Future<Output = Result<Vec<ScheduleEntry>, StorePilotError>> + Send {
        async {
            let stores = self.fetch_stores().await?;
            let settings = self.fetch_settings().await?;
            debug!(
                stores = stores.len(),
                settings = settings.settings.len(),
                "upstream configuration fetched"
            );
            Ok(merge(stores, settings, &self.email))
        }
    }
}

/// One row of the `/stores` response.
#[derive(Debug, Deserialize)]
struct StoreDto {
    id: String,
    name: String,
}

/// The `/user-store-settings` response: the user's carrier plus one row per
/// configured store.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsResponse {
    carrier: Option<String>,
    settings: Vec<SettingDto>,
}

/// One per-store settings row. Every field is optional; the upstream has
/// written these rows with several client generations.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingDto {
    #[serde(rename = "storeId")]
    store_id: Option<String>,
    store: Option<StoreRef>,
    #[serde(rename = "startTime")]
    start_time: Option<serde_json::Value>,
    /// Legacy alternative to `startTime`, sometimes a serialized date
    /// object (`{"_d": "..."}`).
    #[serde(rename = "startDateTime")]
    start_date_time: Option<serde_json::Value>,
    #[serde(rename = "visitDate")]
    visit_date: Option<String>,
    #[serde(rename = "visitTime")]
    visit_time: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoreRef {
    id: String,
}

impl SettingDto {
    /// The store this row belongs to: `storeId` first, nested `store.id`
    /// as fallback.
    fn store_key(&self) -> Option<&str> {
        self.store_id
            .as_deref()
            .or_else(|| self.store.as_ref().map(|s| s.id.as_str()))
    }

    /// Resolve the row's start time, preferring `startTime` over the
    /// legacy `startDateTime`.
    fn target_instant(&self) -> Option<Timestamp> {
        self.start_time
            .as_ref()
            .and_then(normalize)
            .or_else(|| self.start_date_time.as_ref().and_then(normalize))
    }
}

/// Merge the store list with the user's settings rows into schedule entries.
///
/// Every store yields an entry; stores without a settings row (or with an
/// unparseable start time) simply carry no automatic trigger. Stores that
/// fail domain validation are dropped with a warning.
fn merge(stores: Vec<StoreDto>, response: SettingsResponse, email: &str) -> Vec<ScheduleEntry> {
    let carrier = response
        .carrier
        .unwrap_or_else(|| DEFAULT_CARRIER.to_owned());
    let mut by_store: HashMap<String, SettingDto> = HashMap::new();
    for setting in response.settings {
        match setting.store_key() {
            Some(key) => {
                by_store.insert(key.to_owned(), setting);
            }
            None => warn!("settings row without a store id dropped"),
        }
    }

    let mut entries = Vec::with_capacity(stores.len());
    for store in stores {
        let setting = by_store.remove(&store.id);
        let target = setting.as_ref().and_then(SettingDto::target_instant);
        let result = ScheduleEntry::builder()
            .store_id(store.id)
            .display_name(store.name)
            .maybe_target_instant(target)
            .visit_date(
                setting
                    .as_ref()
                    .and_then(|s| s.visit_date.clone())
                    .unwrap_or_else(|| DEFAULT_VISIT_DATE.to_owned()),
            )
            .visit_time(
                setting
                    .as_ref()
                    .and_then(|s| s.visit_time.clone())
                    .unwrap_or_else(|| DEFAULT_VISIT_TIME.to_owned()),
            )
            .carrier(carrier.clone())
            .contact_message(
                setting
                    .and_then(|s| s.message)
                    .unwrap_or_default(),
            )
            .identity_email(email)
            .build();
        match result {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(error = %err, "store dropped from schedule"),
        }
    }
    entries
}
