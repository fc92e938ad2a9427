//! Unified activity stream: normalization, urgency, filtering and ordering
//! of tasks, follow-ups, alerts and appointments.

pub mod filter;
pub mod item;
pub mod normalize;
pub mod sort;
pub mod urgency;

pub use filter::{
    apply_persisted, filter_items, EntityScope, FilterStore, Filters, MemoryFilterStore,
    StatusFilter, FILTER_STORAGE_KEY,
};
pub use item::{ItemKind, ItemParts, UnifiedItem};
pub use normalize::{normalize_batch, to_unified_item, NormalizedBatch, RejectedRecord};
pub use sort::{compare_items, group_items, sort_items, GroupedItems, TierCounts};
pub use urgency::{classify, classify_now, UrgencySignals};
