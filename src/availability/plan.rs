//! Bulk-operation planning
//!
//! Pure set arithmetic deciding which rows a bulk operation inserts or
//! deletes, given what already exists. Keeping this apart from the store
//! calls makes the idempotence rules testable without a database.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{AvailabilityDay, AvailabilityStatus, Blockout, SlotKey};

/// Dates a bulk date operation will touch and the ones it leaves alone
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DatePlan {
    pub to_apply: Vec<NaiveDate>,
    pub skipped: Vec<NaiveDate>,
}

impl DatePlan {
    pub fn requested(&self) -> usize {
        self.to_apply.len() + self.skipped.len()
    }
}

/// Hour slots a bulk slot operation will touch and the ones it leaves alone
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlotPlan {
    pub to_apply: Vec<SlotKey>,
    pub skipped: Vec<SlotKey>,
}

impl SlotPlan {
    pub fn requested(&self) -> usize {
        self.to_apply.len() + self.skipped.len()
    }
}

/// Toggle classification: blocked dates flip to unblock, everything else to block
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TogglePlan {
    pub to_block: Vec<NaiveDate>,
    pub to_unblock: Vec<NaiveDate>,
}

/// Dates to insert as new full-day blockouts.
///
/// Requested dates are deduplicated; a date already covered by any full-day
/// blockout is skipped. Output order is ascending.
pub fn plan_block_dates(requested: &[NaiveDate], existing: &[Blockout]) -> DatePlan {
    let wanted: BTreeSet<NaiveDate> = requested.iter().copied().collect();
    let mut plan = DatePlan::default();
    for date in wanted {
        if covered_full_day(existing, date) {
            plan.skipped.push(date);
        } else {
            plan.to_apply.push(date);
        }
    }
    plan
}

/// Dates whose full-day blockouts will be deleted; unblocked dates are skipped.
pub fn plan_unblock_dates(requested: &[NaiveDate], existing: &[Blockout]) -> DatePlan {
    let wanted: BTreeSet<NaiveDate> = requested.iter().copied().collect();
    let mut plan = DatePlan::default();
    for date in wanted {
        if covered_full_day(existing, date) {
            plan.to_apply.push(date);
        } else {
            plan.skipped.push(date);
        }
    }
    plan
}

/// Classify requested dates by their current availability status.
///
/// A date absent from the loaded grid counts as not blocked.
pub fn partition_toggle(requested: &[NaiveDate], days: &[AvailabilityDay]) -> TogglePlan {
    let blocked: BTreeSet<NaiveDate> = days
        .iter()
        .filter(|d| d.status == AvailabilityStatus::Blocked)
        .map(|d| d.date)
        .collect();
    let wanted: BTreeSet<NaiveDate> = requested.iter().copied().collect();
    let mut plan = TogglePlan::default();
    for date in wanted {
        if blocked.contains(&date) {
            plan.to_unblock.push(date);
        } else {
            plan.to_block.push(date);
        }
    }
    plan
}

/// Hour slots to insert; slots whose hour is already blocked are skipped.
///
/// Dedup is at hour granularity only: a covering full-day record does not
/// stop an hour insert.
pub fn plan_block_slots(requested: &[SlotKey], existing: &[Blockout]) -> SlotPlan {
    let wanted: BTreeSet<SlotKey> = requested.iter().copied().collect();
    let mut plan = SlotPlan::default();
    for slot in wanted {
        if covered_hour(existing, slot) {
            plan.skipped.push(slot);
        } else {
            plan.to_apply.push(slot);
        }
    }
    plan
}

/// Hour slots whose blockouts will be deleted, scoped to a single date.
///
/// Slots on another date, and slots whose hour is not blocked, are skipped.
pub fn plan_unblock_slots(
    date: NaiveDate,
    requested: &[SlotKey],
    existing: &[Blockout],
) -> SlotPlan {
    let wanted: BTreeSet<SlotKey> = requested.iter().copied().collect();
    let mut plan = SlotPlan::default();
    for slot in wanted {
        if slot.date == date && covered_hour(existing, slot) {
            plan.to_apply.push(slot);
        } else {
            plan.skipped.push(slot);
        }
    }
    plan
}

fn covered_full_day(existing: &[Blockout], date: NaiveDate) -> bool {
    existing.iter().any(|b| b.is_full_day() && b.contains(date))
}

fn covered_hour(existing: &[Blockout], slot: SlotKey) -> bool {
    existing
        .iter()
        .any(|b| !b.is_full_day() && b.contains(slot.date) && b.blocked_hour() == Some(slot.hour))
}
