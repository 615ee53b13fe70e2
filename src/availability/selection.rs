//! Calendar selection state machine
//!
//! Owns which dates and hour slots are selected and how the selection was
//! made. Gestures are applied through a single transition function so the
//! whole table is unit-testable without a UI harness. Pure, no I/O.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{BookingMode, SlotKey};

/// How the current selection was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Single,
    Range,
    Multi,
    Drag,
}

/// A UI gesture routed into the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Flip multi-selection mode
    ToggleSelectionMode,
    /// Click on a calendar cell, with modifier keys
    Click {
        date: NaiveDate,
        ctrl: bool,
        shift: bool,
    },
    /// Left-button drag over calendar cells
    DragStart { date: NaiveDate },
    DragMove { date: NaiveDate },
    DragEnd,
    /// Expand or collapse a date's hour panel
    ExpandDate { date: NaiveDate },
    /// Toggle one hour slot of the expanded date
    ToggleSlot { slot: SlotKey },
    /// Empty the selection
    Clear,
}

/// Context a gesture is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    pub today: NaiveDate,
    /// First date of the rendered window
    pub view_start: NaiveDate,
    /// Last date of the rendered window (inclusive)
    pub view_end: NaiveDate,
    pub booking_mode: BookingMode,
}

impl GestureContext {
    /// Past dates and dates outside the rendered window are not targets
    fn clickable(&self, date: NaiveDate) -> bool {
        date >= self.today && date >= self.view_start && date <= self.view_end
    }
}

/// What a gesture did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    /// Precondition failed, state untouched
    Ignored,
    /// Selection state changed
    Updated,
    /// Plain click with selection mode off: the embedding UI navigates
    DateActivated(NaiveDate),
}

/// Selection state. Sets only ever grow under range and drag gestures; only
/// `Clear` (or the embedding code after a successful bulk action) empties
/// them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionState {
    pub selected_dates: BTreeSet<NaiveDate>,
    pub selected_slots: BTreeSet<SlotKey>,
    /// Whether multi-selection gestures are live
    pub selection_mode: bool,
    /// Anchor for shift-click ranges
    pub last_selected: Option<NaiveDate>,
    pub kind: SelectionKind,
    /// The date whose hour panel is open, at most one at a time
    pub expanded: Option<NaiveDate>,
    drag_anchor: Option<NaiveDate>,
    drag_hover: Option<NaiveDate>,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            selected_dates: BTreeSet::new(),
            selected_slots: BTreeSet::new(),
            selection_mode: false,
            last_selected: None,
            kind: SelectionKind::Single,
            expanded: None,
            drag_anchor: None,
            drag_hover: None,
        }
    }
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected_dates.is_empty() && self.selected_slots.is_empty()
    }

    /// The range a drag in progress would add, for UI preview
    pub fn drag_preview(&self) -> Option<(NaiveDate, NaiveDate)> {
        let anchor = self.drag_anchor?;
        let hover = self.drag_hover?;
        Some(if anchor <= hover {
            (anchor, hover)
        } else {
            (hover, anchor)
        })
    }

    /// Empty both sets and forget anchors. Selection mode and the expanded
    /// panel survive.
    pub fn clear(&mut self) {
        self.selected_dates.clear();
        self.selected_slots.clear();
        self.last_selected = None;
        self.drag_anchor = None;
        self.drag_hover = None;
        self.kind = if self.selection_mode {
            SelectionKind::Multi
        } else {
            SelectionKind::Single
        };
    }

    /// Apply one gesture, returning what it did
    pub fn apply(&mut self, gesture: Gesture, ctx: &GestureContext) -> SelectionEffect {
        match gesture {
            Gesture::ToggleSelectionMode => {
                self.selection_mode = !self.selection_mode;
                self.kind = if self.selection_mode {
                    SelectionKind::Multi
                } else {
                    SelectionKind::Single
                };
                SelectionEffect::Updated
            }

            Gesture::Click { date, ctrl, shift } => {
                if !ctx.clickable(date) {
                    return SelectionEffect::Ignored;
                }
                if !self.selection_mode {
                    return SelectionEffect::DateActivated(date);
                }
                if shift {
                    if let Some(anchor) = self.last_selected {
                        add_range(&mut self.selected_dates, anchor, date);
                        self.kind = SelectionKind::Range;
                        self.last_selected = Some(date);
                        return SelectionEffect::Updated;
                    }
                    // no anchor yet: fall through to a plain toggle
                }
                if ctrl {
                    self.toggle_date(date);
                    self.kind = SelectionKind::Multi;
                    self.last_selected = Some(date);
                    return SelectionEffect::Updated;
                }
                // plain click in selection mode: toggle, and open the hour
                // panel on hourly venues when the date becomes selected
                let now_selected = self.toggle_date(date);
                self.kind = SelectionKind::Multi;
                self.last_selected = Some(date);
                if ctx.booking_mode.has_hour_slots() {
                    if now_selected {
                        self.expanded = Some(date);
                    } else if self.expanded == Some(date) {
                        self.expanded = None;
                    }
                }
                SelectionEffect::Updated
            }

            Gesture::DragStart { date } => {
                if !self.selection_mode || !ctx.clickable(date) {
                    return SelectionEffect::Ignored;
                }
                self.drag_anchor = Some(date);
                self.drag_hover = Some(date);
                self.kind = SelectionKind::Drag;
                SelectionEffect::Updated
            }

            Gesture::DragMove { date } => {
                if self.drag_anchor.is_none() || !ctx.clickable(date) {
                    return SelectionEffect::Ignored;
                }
                self.drag_hover = Some(date);
                SelectionEffect::Updated
            }

            Gesture::DragEnd => {
                let (anchor, hover) = match (self.drag_anchor, self.drag_hover) {
                    (Some(a), Some(h)) => (a, h),
                    _ => return SelectionEffect::Ignored,
                };
                add_range(&mut self.selected_dates, anchor, hover);
                self.kind = SelectionKind::Drag;
                self.last_selected = Some(hover);
                self.drag_anchor = None;
                self.drag_hover = None;
                SelectionEffect::Updated
            }

            Gesture::ExpandDate { date } => {
                if !ctx.booking_mode.has_hour_slots() {
                    return SelectionEffect::Ignored;
                }
                // accumulated hour slots survive expansion changes
                self.expanded = if self.expanded == Some(date) {
                    None
                } else {
                    Some(date)
                };
                SelectionEffect::Updated
            }

            Gesture::ToggleSlot { slot } => {
                if self.expanded.is_none() {
                    return SelectionEffect::Ignored;
                }
                if !self.selected_slots.remove(&slot) {
                    self.selected_slots.insert(slot);
                }
                SelectionEffect::Updated
            }

            Gesture::Clear => {
                self.clear();
                SelectionEffect::Updated
            }
        }
    }

    /// Toggle a date's membership, returning whether it is now selected
    fn toggle_date(&mut self, date: NaiveDate) -> bool {
        if self.selected_dates.remove(&date) {
            false
        } else {
            self.selected_dates.insert(date);
            true
        }
    }
}

/// Insert every date of the inclusive range between the two endpoints,
/// whichever order they come in
fn add_range(set: &mut BTreeSet<NaiveDate>, a: NaiveDate, b: NaiveDate) {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut date = lo;
    while date <= hi {
        set.insert(date);
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
}
