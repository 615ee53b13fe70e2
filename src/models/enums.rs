//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// AvailabilityStatus
// ---------------------------------------------------------------------------

/// Derived per-date availability status, never stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    /// Venue open, no blockouts
    Available,
    /// Venue open, some but not all hours blocked
    Partial,
    /// Full-day blockout, or every operating hour blocked
    Blocked,
    /// Venue not open that weekday
    Closed,
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Partial => "partial",
            AvailabilityStatus::Blocked => "blocked",
            AvailabilityStatus::Closed => "closed",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BlockType
// ---------------------------------------------------------------------------

/// Blockout type codes (stored in blockouts.block_type)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BlockType {
    Maintenance = 0,
    Personal = 1,
    Event = 2,
    Other = 3,
}

impl From<i16> for BlockType {
    fn from(v: i16) -> Self {
        match v {
            0 => BlockType::Maintenance,
            1 => BlockType::Personal,
            2 => BlockType::Event,
            _ => BlockType::Other,
        }
    }
}

impl From<BlockType> for i16 {
    fn from(b: BlockType) -> Self {
        b as i16
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BlockType::Maintenance => "Maintenance",
            BlockType::Personal => "Personal",
            BlockType::Event => "Event",
            BlockType::Other => "Other",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingMode
// ---------------------------------------------------------------------------

/// Venue booking mode codes (stored in venues.booking_mode)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BookingMode {
    /// Whole-day bookings only, one slot per day
    #[default]
    Daily = 0,
    /// Hour-slot bookings
    Hourly = 1,
    /// Both whole-day and hour-slot bookings
    Both = 2,
}

impl BookingMode {
    /// Whether the venue exposes hour-level slots at all
    pub fn has_hour_slots(&self) -> bool {
        matches!(self, BookingMode::Hourly | BookingMode::Both)
    }
}

impl From<i16> for BookingMode {
    fn from(v: i16) -> Self {
        match v {
            1 => BookingMode::Hourly,
            2 => BookingMode::Both,
            _ => BookingMode::Daily,
        }
    }
}

impl From<BookingMode> for i16 {
    fn from(m: BookingMode) -> Self {
        m as i16
    }
}

impl std::fmt::Display for BookingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookingMode::Daily => "Daily",
            BookingMode::Hourly => "Hourly",
            BookingMode::Both => "Both",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// BookingStatus
// ---------------------------------------------------------------------------

/// Booking status codes (stored in bookings.status)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum BookingStatus {
    Pending = 0,
    Confirmed = 1,
    Cancelled = 2,
    Completed = 3,
}

impl From<i16> for BookingStatus {
    fn from(v: i16) -> Self {
        match v {
            1 => BookingStatus::Confirmed,
            2 => BookingStatus::Cancelled,
            3 => BookingStatus::Completed,
            _ => BookingStatus::Pending,
        }
    }
}

impl From<BookingStatus> for i16 {
    fn from(s: BookingStatus) -> Self {
        s as i16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_roundtrip() {
        for v in [0i16, 1, 2, 3] {
            let t = BlockType::from(v);
            assert_eq!(i16::from(t), v);
        }
        assert_eq!(BlockType::from(99), BlockType::Other);
    }

    #[test]
    fn test_booking_mode_hour_slots() {
        assert!(!BookingMode::Daily.has_hour_slots());
        assert!(BookingMode::Hourly.has_hour_slots());
        assert!(BookingMode::Both.has_hour_slots());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AvailabilityStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }
}
