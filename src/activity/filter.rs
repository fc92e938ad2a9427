//! Conjunctive filtering over unified items.
//!
//! Every populated field of `Filters` must pass; an absent or empty field
//! imposes nothing. Output preserves input order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{ItemType, Priority, UrgencyTier};

use super::item::UnifiedItem;

/// Key under which the view persists its last filter selection.
pub const FILTER_STORAGE_KEY: &str = "activity-filters";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityScope {
    #[default]
    All,
    Client,
    Prospect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Read,
}

/// Filter selection as the activity view builds it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Filters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Vec<UrgencyTier>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub types: Option<Vec<ItemType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Vec<Priority>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_scope: Option<EntityScope>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prospect_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl Filters {
    /// True when no field constrains anything.
    pub fn is_empty(&self) -> bool {
        set_is_open(&self.urgency)
            && set_is_open(&self.types)
            && set_is_open(&self.priority)
            && self.entity_scope.unwrap_or_default() == EntityScope::All
            && self.client_id.is_none()
            && self.prospect_id.is_none()
            && self.status.unwrap_or_default() == StatusFilter::All
            && self.normalized_query().is_none()
    }

    fn normalized_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    /// Check one item against every populated criterion.
    pub fn matches(&self, item: &UnifiedItem) -> bool {
        self.matches_with_query(item, self.normalized_query().as_deref())
    }

    fn matches_with_query(&self, item: &UnifiedItem, query: Option<&str>) -> bool {
        if !in_set(&self.urgency, &item.urgency()) {
            return false;
        }
        if !in_set(&self.types, &item.item_type()) {
            return false;
        }
        if !in_set(&self.priority, &item.priority()) {
            return false;
        }

        match self.entity_scope.unwrap_or_default() {
            EntityScope::All => {}
            EntityScope::Client => {
                if item.client_id.is_none() {
                    return false;
                }
            }
            EntityScope::Prospect => {
                if item.prospect_id.is_none() {
                    return false;
                }
            }
        }

        if let Some(ref client_id) = self.client_id {
            if item.client_id.as_ref() != Some(client_id) {
                return false;
            }
        }
        if let Some(ref prospect_id) = self.prospect_id {
            if item.prospect_id.as_ref() != Some(prospect_id) {
                return false;
            }
        }

        let status_ok = match self.status.unwrap_or_default() {
            StatusFilter::All => true,
            StatusFilter::Pending => !item.is_completed() && !item.is_read(),
            StatusFilter::Completed => item.is_completed(),
            StatusFilter::Read => item.is_read(),
        };
        if !status_ok {
            return false;
        }

        match query {
            Some(q) => text_matches(item, q),
            None => true,
        }
    }
}

fn set_is_open<T>(set: &Option<Vec<T>>) -> bool {
    set.as_ref().map_or(true, Vec::is_empty)
}

fn in_set<T: PartialEq>(set: &Option<Vec<T>>, value: &T) -> bool {
    match set {
        Some(values) if !values.is_empty() => values.contains(value),
        _ => true,
    }
}

/// Case-insensitive substring match on title, description and entity names.
/// `query` must already be lowercased.
fn text_matches(item: &UnifiedItem, query: &str) -> bool {
    [
        Some(item.title.as_str()),
        item.description.as_deref(),
        item.client_name.as_deref(),
        item.prospect_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(query))
}

/// Apply `filters` and return the surviving items in input order.
pub fn filter_items(items: &[UnifiedItem], filters: &Filters) -> Vec<UnifiedItem> {
    let query = filters.normalized_query();
    items
        .iter()
        .filter(|item| filters.matches_with_query(item, query.as_deref()))
        .cloned()
        .collect()
}

// =============================================================================
// Persisted filter store
// =============================================================================

/// Persistence seam for the view's filter selection. The real store lives
/// in the client (local storage mirrored into the URL query string).
pub trait FilterStore {
    fn load(&self) -> Option<Filters>;
    fn save(&mut self, filters: &Filters) -> Result<(), EngineError>;
}

/// In-process store holding serialized filters under `FILTER_STORAGE_KEY`.
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    entries: HashMap<String, String>,
}

impl MemoryFilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw stored value, as a client would find it on load.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        let mut store = Self::new();
        store
            .entries
            .insert(FILTER_STORAGE_KEY.to_string(), raw.into());
        store
    }
}

impl FilterStore for MemoryFilterStore {
    fn load(&self) -> Option<Filters> {
        let raw = self.entries.get(FILTER_STORAGE_KEY)?;
        match serde_json::from_str(raw) {
            Ok(filters) => Some(filters),
            Err(e) => {
                log::warn!("Ignoring unreadable stored filters: {}", e);
                None
            }
        }
    }

    fn save(&mut self, filters: &Filters) -> Result<(), EngineError> {
        let raw = serde_json::to_string(filters)
            .map_err(|e| EngineError::Parse(format!("Failed to serialize filters: {}", e)))?;
        self.entries.insert(FILTER_STORAGE_KEY.to_string(), raw);
        Ok(())
    }
}

/// Filter with whatever the store reconstructs. Nothing stored means no
/// constraint.
pub fn apply_persisted(store: &dyn FilterStore, items: &[UnifiedItem]) -> Vec<UnifiedItem> {
    let filters = store.load().unwrap_or_default();
    filter_items(items, &filters)
}
