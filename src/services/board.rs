//! Availability board view-model
//!
//! Orchestrates the grid, the selection state machine, and the bulk
//! operations for an embedding calendar UI. Loads are tagged with a
//! generation so a response that was overtaken by a newer load is discarded
//! instead of applied, and a busy flag rejects re-submission of bulk actions
//! while one is still running.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    availability::{Gesture, GestureContext, SelectionEffect, SelectionState},
    error::{AppError, AppResult},
    models::{AvailabilityDay, BlockType, BookingMode, BulkOutcome},
    services::{availability::AvailabilityService, blockouts::BlockoutsService},
};

/// View state behind the board's lock
#[derive(Debug, Default)]
struct BoardView {
    venue_id: Option<Uuid>,
    booking_mode: BookingMode,
    window: Option<(NaiveDate, NaiveDate)>,
    days: Vec<AvailabilityDay>,
    selection: SelectionState,
}

pub struct AvailabilityBoard {
    availability: AvailabilityService,
    blockouts: BlockoutsService,
    actor: Option<Uuid>,
    generation: AtomicU64,
    busy: AtomicBool,
    view: RwLock<BoardView>,
}

/// Resets the busy flag when the running bulk action settles
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AvailabilityBoard {
    pub fn new(
        availability: AvailabilityService,
        blockouts: BlockoutsService,
        actor: Option<Uuid>,
    ) -> Self {
        Self {
            availability,
            blockouts,
            actor,
            generation: AtomicU64::new(0),
            busy: AtomicBool::new(false),
            view: RwLock::new(BoardView::default()),
        }
    }

    /// Load a venue's grid over the default window.
    ///
    /// Returns whether the response was applied; `false` means a newer load
    /// superseded this one while it was in flight.
    pub async fn load(&self, venue_id: Uuid) -> AppResult<bool> {
        self.load_window(venue_id, None, None).await
    }

    /// Load a venue's grid over an explicit window
    pub async fn load_window(
        &self,
        venue_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<bool> {
        let generation = self.next_generation();
        self.write_view().venue_id = Some(venue_id);

        let (from, to) = self.availability.window(from, to);
        let (venue, days) = self
            .availability
            .grid_with_venue(venue_id, Some(from), Some(to))
            .await?;
        Ok(self.apply_load(generation, venue_id, venue.booking_mode, (from, to), days))
    }

    /// Re-run the whole pipeline for the current venue and window.
    /// The single recovery path after any mutation.
    pub async fn refresh(&self) -> AppResult<bool> {
        let (venue_id, window) = {
            let view = self.read_view();
            (view.venue_id, view.window)
        };
        let venue_id = venue_id
            .ok_or_else(|| AppError::Validation("No venue loaded".to_string()))?;
        let (from, to) = window.map_or((None, None), |(f, t)| (Some(f), Some(t)));
        self.load_window(venue_id, from, to).await
    }

    /// Route a gesture into the selection machine with the current window as
    /// context
    pub fn handle_gesture(&self, gesture: Gesture) -> SelectionEffect {
        let ctx = {
            let view = self.read_view();
            let (view_start, view_end) = view
                .window
                .unwrap_or_else(|| self.availability.window(None, None));
            GestureContext {
                today: Utc::now().date_naive(),
                view_start,
                view_end,
                booking_mode: view.booking_mode,
            }
        };
        self.write_view().selection.apply(gesture, &ctx)
    }

    /// Block every selected date
    pub async fn block_selected(
        &self,
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;
        let dates = self.selected_dates();
        if dates.is_empty() {
            return Ok(BulkOutcome::new(0, 0, 0, "No dates selected"));
        }

        let _busy = self.acquire_busy()?;
        let outcome = self
            .blockouts
            .block_dates(venue_id, self.actor, &dates, reason, block_type)
            .await?;
        self.settle().await?;
        Ok(outcome)
    }

    /// Unblock every selected date
    pub async fn unblock_selected(&self) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;
        let dates = self.selected_dates();
        if dates.is_empty() {
            return Ok(BulkOutcome::new(0, 0, 0, "No dates selected"));
        }

        let _busy = self.acquire_busy()?;
        let outcome = self
            .blockouts
            .unblock_dates(venue_id, self.actor, &dates)
            .await?;
        self.settle().await?;
        Ok(outcome)
    }

    /// Toggle every selected date between blocked and free
    pub async fn toggle_selected(
        &self,
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;
        let dates = self.selected_dates();
        if dates.is_empty() {
            return Ok(BulkOutcome::new(0, 0, 0, "No dates selected"));
        }

        let _busy = self.acquire_busy()?;
        let outcome = self
            .blockouts
            .toggle_dates(venue_id, self.actor, &dates, reason, block_type)
            .await?;
        self.settle().await?;
        Ok(outcome)
    }

    /// Block every selected hour slot
    pub async fn block_selected_hours(
        &self,
        reason: Option<String>,
        block_type: BlockType,
    ) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;
        let slots = self.selected_slots();
        if slots.is_empty() {
            return Ok(BulkOutcome::new(0, 0, 0, "No hour slots selected"));
        }

        let _busy = self.acquire_busy()?;
        let outcome = self
            .blockouts
            .block_hour_slots(venue_id, self.actor, &slots, reason, block_type)
            .await?;
        self.settle().await?;
        Ok(outcome)
    }

    /// Unblock the selected hour slots of the expanded date.
    ///
    /// Slots accumulated on other dates are passed through and reported as
    /// skipped by the operation.
    pub async fn unblock_selected_hours(&self) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;
        let (expanded, slots) = {
            let view = self.read_view();
            (
                view.selection.expanded,
                view.selection.selected_slots.iter().copied().collect::<Vec<_>>(),
            )
        };
        let date = expanded
            .ok_or_else(|| AppError::Validation("No date expanded".to_string()))?;
        if slots.is_empty() {
            return Ok(BulkOutcome::new(0, 0, 0, "No hour slots selected"));
        }

        let _busy = self.acquire_busy()?;
        let outcome = self
            .blockouts
            .unblock_hour_slots(venue_id, self.actor, date, &slots)
            .await?;
        self.settle().await?;
        Ok(outcome)
    }

    /// Remove every blockout for one date, the explicitly destructive action
    pub async fn clear_date(&self, date: NaiveDate) -> AppResult<BulkOutcome> {
        let venue_id = self.loaded_venue()?;

        let _busy = self.acquire_busy()?;
        let outcome = self.blockouts.clear_date(venue_id, self.actor, date).await?;
        self.settle().await?;
        Ok(outcome)
    }

    pub fn venue_id(&self) -> Option<Uuid> {
        self.read_view().venue_id
    }

    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.read_view().window
    }

    /// Snapshot of the loaded grid
    pub fn days(&self) -> Vec<AvailabilityDay> {
        self.read_view().days.clone()
    }

    /// Snapshot of the selection state
    pub fn selection(&self) -> SelectionState {
        self.read_view().selection.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Apply a load response unless a newer load has started since
    fn apply_load(
        &self,
        generation: u64,
        venue_id: Uuid,
        booking_mode: BookingMode,
        window: (NaiveDate, NaiveDate),
        days: Vec<AvailabilityDay>,
    ) -> bool {
        if generation != self.generation.load(Ordering::SeqCst) {
            tracing::debug!(
                "Discarding stale availability load {} for venue {}",
                generation,
                venue_id
            );
            return false;
        }
        let mut view = self.write_view();
        view.venue_id = Some(venue_id);
        view.booking_mode = booking_mode;
        view.window = Some(window);
        view.days = days;
        true
    }

    /// Refresh the grid and empty the selection after a successful bulk action
    async fn settle(&self) -> AppResult<()> {
        self.refresh().await?;
        self.write_view().selection.clear();
        Ok(())
    }

    fn loaded_venue(&self) -> AppResult<Uuid> {
        self.read_view()
            .venue_id
            .ok_or_else(|| AppError::Validation("No venue loaded".to_string()))
    }

    fn selected_dates(&self) -> Vec<NaiveDate> {
        self.read_view()
            .selection
            .selected_dates
            .iter()
            .copied()
            .collect()
    }

    fn selected_slots(&self) -> Vec<crate::models::SlotKey> {
        self.read_view()
            .selection
            .selected_slots
            .iter()
            .copied()
            .collect()
    }

    fn acquire_busy(&self) -> AppResult<BusyGuard<'_>> {
        if self.busy.swap(true, Ordering::SeqCst) {
            return Err(AppError::Busy(
                "A bulk operation is already running".to_string(),
            ));
        }
        Ok(BusyGuard(&self.busy))
    }

    // Writes replace whole fields, a poisoned lock never holds a torn view.
    fn read_view(&self) -> RwLockReadGuard<'_, BoardView> {
        self.view.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, BoardView> {
        self.view.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AvailabilityConfig;
    use crate::models::{OutcomeSeverity, Venue};
    use crate::repository::{
        BlockoutStore, BookingStore, MockBlockoutStore, MockBookingStore, MockVenueStore,
        VenueStore,
    };
    use chrono::Days;
    use serde_json::json;
    use std::sync::Arc;

    const OWNER: &str = "2c9f9db0-5b0e-4cf5-8a38-31a2ad03a5d9";

    fn owner() -> Uuid {
        OWNER.parse().unwrap()
    }

    fn tomorrow() -> NaiveDate {
        Utc::now().date_naive() + Days::new(1)
    }

    fn venue(venue_id: Uuid) -> Venue {
        // open every day so the test does not depend on the weekday it runs
        let hours = json!({"available": true, "start": "09:00", "end": "18:00"});
        Venue {
            id: venue_id,
            owner_id: owner(),
            name: "Court A".to_string(),
            booking_mode: BookingMode::Hourly,
            weekly_schedule: Some(json!({
                "monday": hours, "tuesday": hours, "wednesday": hours,
                "thursday": hours, "friday": hours, "saturday": hours,
                "sunday": hours,
            })),
            available_days: None,
            created_at: None,
        }
    }

    fn board(venues: MockVenueStore, blockouts: MockBlockoutStore) -> AvailabilityBoard {
        let venues: Arc<dyn VenueStore> = Arc::new(venues);
        let blockouts: Arc<dyn BlockoutStore> = Arc::new(blockouts);
        let mut bookings = MockBookingStore::new();
        bookings
            .expect_confirmed_in_range()
            .returning(|_, _, _| Ok(Vec::new()));
        let bookings: Arc<dyn BookingStore> = Arc::new(bookings);

        let availability = AvailabilityService::new(
            venues.clone(),
            blockouts.clone(),
            bookings,
            AvailabilityConfig {
                window_days: 30,
                default_open: "09:00".to_string(),
                default_close: "18:00".to_string(),
            },
        );
        let blockouts_service =
            BlockoutsService::new(venues, blockouts, availability.clone());
        AvailabilityBoard::new(availability, blockouts_service, Some(owner()))
    }

    fn board_with_empty_store() -> AvailabilityBoard {
        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));
        let mut blockouts = MockBlockoutStore::new();
        blockouts.expect_list().returning(|_, _, _| Ok(Vec::new()));
        blockouts
            .expect_full_day_for_dates()
            .returning(|_, _| Ok(Vec::new()));
        blockouts
            .expect_insert_many()
            .returning(|rows: &[crate::models::NewBlockout]| Ok(rows.len() as u64));
        board(venues, blockouts)
    }

    fn select(board: &AvailabilityBoard, date: NaiveDate) {
        board.handle_gesture(Gesture::ToggleSelectionMode);
        let effect = board.handle_gesture(Gesture::Click {
            date,
            ctrl: false,
            shift: false,
        });
        assert_eq!(effect, SelectionEffect::Updated);
    }

    #[tokio::test]
    async fn test_load_populates_view() {
        let board = board_with_empty_store();
        let venue_id = Uuid::new_v4();

        assert!(board.load(venue_id).await.unwrap());
        assert_eq!(board.venue_id(), Some(venue_id));
        assert_eq!(board.days().len(), 31);
        assert!(board.selection().is_empty());
        assert!(!board.is_busy());
    }

    #[tokio::test]
    async fn test_stale_load_is_discarded() {
        let board = board_with_empty_store();
        let venue_id = Uuid::new_v4();
        assert!(board.load(venue_id).await.unwrap());
        let days = board.days();

        let stale = board.next_generation();
        let newer = board.next_generation();

        // the overtaken response must not replace the view
        let window = board.window().unwrap();
        assert!(!board.apply_load(stale, venue_id, BookingMode::Daily, window, Vec::new()));
        assert_eq!(board.days().len(), days.len());

        // the latest one applies
        assert!(board.apply_load(newer, venue_id, BookingMode::Hourly, window, Vec::new()));
        assert!(board.days().is_empty());
    }

    #[tokio::test]
    async fn test_busy_flag_rejects_resubmission() {
        let board = board_with_empty_store();
        let venue_id = Uuid::new_v4();
        assert!(board.load(venue_id).await.unwrap());
        select(&board, tomorrow());

        let guard = board.acquire_busy().unwrap();
        let err = board
            .block_selected(None, BlockType::Personal)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Busy(_)));
        // the rejected call must not have cleared the selection
        assert!(!board.selection().is_empty());

        drop(guard);
        let outcome = board
            .block_selected(None, BlockType::Personal)
            .await
            .unwrap();
        assert_eq!(outcome.applied, 1);
    }

    #[tokio::test]
    async fn test_successful_bulk_clears_selection_and_refreshes() {
        let board = board_with_empty_store();
        let venue_id = Uuid::new_v4();
        assert!(board.load(venue_id).await.unwrap());
        select(&board, tomorrow());
        assert!(!board.selection().is_empty());

        let outcome = board
            .block_selected(Some("maintenance".to_string()), BlockType::Maintenance)
            .await
            .unwrap();
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.severity, OutcomeSeverity::Success);
        assert!(board.selection().is_empty());
        assert!(!board.is_busy());
    }

    #[tokio::test]
    async fn test_failed_bulk_keeps_selection() {
        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));
        let mut blockouts = MockBlockoutStore::new();
        blockouts.expect_list().returning(|_, _, _| Ok(Vec::new()));
        blockouts
            .expect_full_day_for_dates()
            .returning(|_, _| Ok(Vec::new()));
        blockouts
            .expect_insert_many()
            .returning(|_: &[crate::models::NewBlockout]| {
                Err(AppError::Database(sqlx::Error::PoolTimedOut))
            });
        let board = board(venues, blockouts);

        let venue_id = Uuid::new_v4();
        assert!(board.load(venue_id).await.unwrap());
        select(&board, tomorrow());

        let err = board
            .block_selected(None, BlockType::Personal)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(!board.selection().is_empty());
        assert!(!board.is_busy());
    }

    #[tokio::test]
    async fn test_empty_selection_is_informational_without_store_access() {
        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));
        let mut blockouts = MockBlockoutStore::new();
        blockouts.expect_list().returning(|_, _, _| Ok(Vec::new()));
        blockouts.expect_full_day_for_dates().times(0);
        blockouts.expect_insert_many().times(0);
        let board = board(venues, blockouts);

        assert!(board.load(Uuid::new_v4()).await.unwrap());
        let outcome = board.block_selected(None, BlockType::Personal).await.unwrap();
        assert_eq!(outcome.severity, OutcomeSeverity::Info);
        assert_eq!(outcome.message, "No dates selected");
    }

    #[tokio::test]
    async fn test_gestures_outside_window_are_ignored() {
        let board = board_with_empty_store();
        assert!(board.load(Uuid::new_v4()).await.unwrap());

        let yesterday = Utc::now().date_naive().pred_opt().unwrap();
        board.handle_gesture(Gesture::ToggleSelectionMode);
        let effect = board.handle_gesture(Gesture::Click {
            date: yesterday,
            ctrl: false,
            shift: false,
        });
        assert_eq!(effect, SelectionEffect::Ignored);
        assert!(board.selection().is_empty());
    }

    #[tokio::test]
    async fn test_clear_date_runs_without_selection() {
        let mut venues = MockVenueStore::new();
        venues.expect_get().returning(move |id| Ok(venue(id)));
        let mut blockouts = MockBlockoutStore::new();
        blockouts.expect_list().returning(|_, _, _| Ok(Vec::new()));
        blockouts
            .expect_delete_all_for_date()
            .returning(|_, _| Ok(2));
        let board = board(venues, blockouts);

        assert!(board.load(Uuid::new_v4()).await.unwrap());
        let outcome = board.clear_date(tomorrow()).await.unwrap();
        assert_eq!(outcome.applied, 2);
        assert!(!board.is_busy());
    }
}
