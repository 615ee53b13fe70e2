//! Data models for Arvenna

pub mod availability;
pub mod blockout;
pub mod booking;
pub mod enums;
pub mod owner;
pub mod schedule;
pub mod venue;

// Re-export commonly used types
pub use availability::{AvailabilityDay, BulkOutcome, HourSlot, OutcomeSeverity, SlotKey};
pub use blockout::{Blockout, NewBlockout};
pub use booking::Booking;
pub use enums::{AvailabilityStatus, BlockType, BookingMode, BookingStatus};
pub use owner::OwnerClaims;
pub use schedule::{DayHours, Weekday, WeeklySchedule};
pub use venue::Venue;
