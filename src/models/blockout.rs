//! Blockout model and bulk-operation request types

use chrono::{DateTime, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::availability::SlotKey;
use super::enums::BlockType;

// ---------------------------------------------------------------------------
// Blockout
// ---------------------------------------------------------------------------

/// Blockout record.
///
/// Covers the inclusive date range `[start_date, end_date]`. When
/// `start_time` is absent the record blocks the entire day for every date in
/// range; when present it blocks the single hour beginning at `start_time`
/// (`end_time` is one hour later by convention).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Blockout {
    pub id: Uuid,
    pub venue_id: Uuid,
    /// First blocked date
    pub start_date: NaiveDate,
    /// Last blocked date (inclusive)
    pub end_date: NaiveDate,
    /// Absent for full-day blockouts
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    /// Blockout type (0=maintenance, 1=personal, 2=event, 3=other)
    pub block_type: BlockType,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Blockout {
    /// Whether this record blocks whole days rather than a single hour
    pub fn is_full_day(&self) -> bool {
        self.start_time.is_none()
    }

    /// Whether the date falls inside `[start_date, end_date]`.
    ///
    /// `NaiveDate` ordering matches ISO `YYYY-MM-DD` string ordering, so this
    /// containment check cannot drift with the host timezone.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Blocked hour for hour-level records, `None` for full-day ones
    pub fn blocked_hour(&self) -> Option<u32> {
        self.start_time.map(|t| t.hour())
    }
}

/// Row to insert, built by the bulk operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlockout {
    pub venue_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub reason: Option<String>,
    pub block_type: BlockType,
    pub created_by: Uuid,
}

impl NewBlockout {
    /// Full-day blockout for a single date
    pub fn full_day(
        venue_id: Uuid,
        date: NaiveDate,
        reason: Option<String>,
        block_type: BlockType,
        created_by: Uuid,
    ) -> Self {
        Self {
            venue_id,
            start_date: date,
            end_date: date,
            start_time: None,
            end_time: None,
            reason,
            block_type,
            created_by,
        }
    }

    /// Single-hour blockout for one slot
    pub fn hour_slot(
        venue_id: Uuid,
        slot: SlotKey,
        reason: Option<String>,
        block_type: BlockType,
        created_by: Uuid,
    ) -> Self {
        let (start_time, end_time) = slot.times();
        Self {
            venue_id,
            start_date: slot.date,
            end_date: slot.date,
            start_time: Some(start_time),
            end_time: Some(end_time),
            reason,
            block_type,
            created_by,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Bulk block request (also used by toggle)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BlockDatesRequest {
    /// Dates to block (YYYY-MM-DD)
    #[validate(length(min = 1, message = "dates must not be empty"))]
    pub dates: Vec<String>,
    #[validate(length(max = 500, message = "reason too long"))]
    pub reason: Option<String>,
    pub block_type: Option<BlockType>,
}

/// Bulk unblock request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnblockDatesRequest {
    /// Dates to unblock (YYYY-MM-DD)
    #[validate(length(min = 1, message = "dates must not be empty"))]
    pub dates: Vec<String>,
}

/// Bulk hour-slot block request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BlockSlotsRequest {
    /// Hour slots to block (YYYY-MM-DDTHH:00)
    #[validate(length(min = 1, message = "slots must not be empty"))]
    pub slots: Vec<String>,
    #[validate(length(max = 500, message = "reason too long"))]
    pub reason: Option<String>,
    pub block_type: Option<BlockType>,
}

/// Hour-slot unblock request, scoped to one date.
///
/// An empty slot list is rejected; removing every blockout for a date is the
/// separate clear-day action.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UnblockSlotsRequest {
    /// Date the slots belong to (YYYY-MM-DD)
    pub date: String,
    /// Hour slots to unblock (YYYY-MM-DDTHH:00)
    #[validate(length(min = 1, message = "slots must not be empty"))]
    pub slots: Vec<String>,
}

/// Clear-day request: removes every blockout, day- and hour-level, for the date
#[derive(Debug, Deserialize, ToSchema)]
pub struct ClearDayRequest {
    /// Date to clear (YYYY-MM-DD)
    pub date: String,
}

/// Query parameters for listing blockouts
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BlockoutQuery {
    /// Filter blockouts overlapping from this date (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Filter blockouts overlapping until this date (YYYY-MM-DD)
    pub end_date: Option<String>,
}
