//! Availability engine
//!
//! This module holds the pure core: grid computation from schedule and
//! blockout data, bulk-operation planning, and the calendar selection state
//! machine. Nothing here performs I/O.

pub mod calculator;
pub mod plan;
pub mod selection;

pub use calculator::{compute_day, compute_range, generate_hour_slots};
pub use plan::{
    plan_block_dates, plan_block_slots, plan_unblock_dates, plan_unblock_slots, partition_toggle,
    DatePlan, SlotPlan, TogglePlan,
};
pub use selection::{Gesture, GestureContext, SelectionEffect, SelectionKind, SelectionState};
