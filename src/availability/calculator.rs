//! Availability grid computation
//!
//! Pure functions turning {weekly schedule, blockouts, bookings} into
//! per-date availability and per-hour slot expansions. No I/O; malformed
//! schedule input degrades to closed instead of failing.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::{
    AvailabilityDay, AvailabilityStatus, Blockout, Booking, BookingMode, BookingStatus, HourSlot,
    SlotKey, Weekday, WeeklySchedule,
};

/// Compute the availability grid for every date in `[from, to]`, inclusive,
/// ascending.
pub fn compute_range(
    schedule: &WeeklySchedule,
    blockouts: &[Blockout],
    bookings: &[Booking],
    from: NaiveDate,
    to: NaiveDate,
    mode: BookingMode,
) -> Vec<AvailabilityDay> {
    let mut days = Vec::new();
    let mut date = from;
    while date <= to {
        days.push(compute_day(schedule, blockouts, bookings, date, mode));
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    days
}

/// Compute the availability of a single date.
pub fn compute_day(
    schedule: &WeeklySchedule,
    blockouts: &[Blockout],
    bookings: &[Booking],
    date: NaiveDate,
    mode: BookingMode,
) -> AvailabilityDay {
    // Closed days short-circuit everything, including blockout selection
    let weekday = Weekday::from_date(date);
    let bounds = match schedule.hour_bounds(weekday) {
        Some(bounds) => bounds,
        None => {
            return AvailabilityDay {
                date,
                status: AvailabilityStatus::Closed,
                slots_available: 0,
                total_slots: 0,
                blockouts: Vec::new(),
                bookings_count: 0,
            }
        }
    };
    let (start_hour, end_hour) = bounds;
    let total_hours = end_hour - start_hour;

    let covering: Vec<Blockout> = blockouts
        .iter()
        .filter(|b| b.contains(date))
        .cloned()
        .collect();
    let has_full_day = covering.iter().any(Blockout::is_full_day);
    let blocked_hours = distinct_blocked_hours(&covering);

    let status = if has_full_day {
        AvailabilityStatus::Blocked
    } else if covering.is_empty() {
        AvailabilityStatus::Available
    } else if blocked_hours.len() as u32 >= total_hours {
        AvailabilityStatus::Blocked
    } else {
        AvailabilityStatus::Partial
    };

    let (slots_available, total_slots) = match mode {
        BookingMode::Daily => {
            let available = if status == AvailabilityStatus::Blocked { 0 } else { 1 };
            (available, 1)
        }
        BookingMode::Hourly | BookingMode::Both => {
            let available = match status {
                AvailabilityStatus::Available => total_hours,
                AvailabilityStatus::Blocked => 0,
                AvailabilityStatus::Partial => {
                    total_hours.saturating_sub(blocked_hours.len() as u32)
                }
                AvailabilityStatus::Closed => 0,
            };
            (available, total_hours)
        }
    };

    let bookings_count = bookings
        .iter()
        .filter(|b| b.booking_date == date && b.status == BookingStatus::Confirmed)
        .count() as u32;

    AvailabilityDay {
        date,
        status,
        slots_available,
        total_slots,
        blockouts: covering,
        bookings_count,
    }
}

/// Expand one date into its hour slots.
///
/// A full-day blockout marks every slot blocked with `full_day_blocked` set,
/// which tells the caller that unblocking means deleting the whole-day record
/// rather than one hour. Closed days yield no slots.
pub fn generate_hour_slots(
    schedule: &WeeklySchedule,
    blockouts: &[Blockout],
    date: NaiveDate,
) -> Vec<HourSlot> {
    let weekday = Weekday::from_date(date);
    let (start_hour, end_hour) = match schedule.hour_bounds(weekday) {
        Some(bounds) => bounds,
        None => return Vec::new(),
    };

    let covering: Vec<&Blockout> = blockouts.iter().filter(|b| b.contains(date)).collect();
    let full_day = covering.iter().any(|b| b.is_full_day());
    let blocked_hours: BTreeSet<u32> =
        covering.iter().filter_map(|b| b.blocked_hour()).collect();

    (start_hour..end_hour)
        .map(|hour| {
            let slot = SlotKey::new(date, hour);
            let (start_time, end_time) = slot.times();
            HourSlot {
                slot,
                start_time,
                end_time,
                is_blocked: full_day || blocked_hours.contains(&hour),
                full_day_blocked: full_day,
            }
        })
        .collect()
}

/// Distinct integer hours blocked by hour-level records
fn distinct_blocked_hours(blockouts: &[Blockout]) -> BTreeSet<u32> {
    blockouts.iter().filter_map(|b| b.blocked_hour()).collect()
}
