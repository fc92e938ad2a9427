//! Ordering and tier grouping for the activity stream.
//!
//! Order: urgency tier, then priority, then effective timestamp (due date,
//! start time, creation time). Ties keep input order.

use std::cmp::Ordering;

use serde::Serialize;

use crate::types::UrgencyTier;

use super::item::UnifiedItem;

pub fn compare_items(a: &UnifiedItem, b: &UnifiedItem) -> Ordering {
    a.urgency()
        .rank()
        .cmp(&b.urgency().rank())
        .then_with(|| a.priority().rank().cmp(&b.priority().rank()))
        .then_with(|| a.effective_timestamp().cmp(&b.effective_timestamp()))
}

/// Stable sort into display order.
pub fn sort_items(items: &[UnifiedItem]) -> Vec<UnifiedItem> {
    let mut sorted = items.to_vec();
    // `sort_by` is stable; equal keys keep their input order.
    sorted.sort_by(compare_items);
    sorted
}

/// Items partitioned by urgency tier, each partition sorted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupedItems {
    pub now: Vec<UnifiedItem>,
    pub next: Vec<UnifiedItem>,
    pub scheduled: Vec<UnifiedItem>,
}

/// Per-tier totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TierCounts {
    pub now: usize,
    pub next: usize,
    pub scheduled: usize,
}

impl GroupedItems {
    pub fn tier(&self, tier: UrgencyTier) -> &[UnifiedItem] {
        match tier {
            UrgencyTier::Now => &self.now,
            UrgencyTier::Next => &self.next,
            UrgencyTier::Scheduled => &self.scheduled,
        }
    }

    pub fn len(&self) -> usize {
        self.now.len() + self.next.len() + self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn counts(&self) -> TierCounts {
        TierCounts {
            now: self.now.len(),
            next: self.next.len(),
            scheduled: self.scheduled.len(),
        }
    }
}

/// Partition by tier. Every item lands in exactly one group.
pub fn group_items(items: &[UnifiedItem]) -> GroupedItems {
    let mut groups = GroupedItems::default();
    for item in items {
        let bucket = match item.urgency() {
            UrgencyTier::Now => &mut groups.now,
            UrgencyTier::Next => &mut groups.next,
            UrgencyTier::Scheduled => &mut groups.scheduled,
        };
        bucket.push(item.clone());
    }
    groups.now.sort_by(compare_items);
    groups.next.sort_by(compare_items);
    groups.scheduled.sort_by(compare_items);
    groups
}
