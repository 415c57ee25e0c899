//! Time-of-day parsing and interval overlap.
//!
//! The overlap rule is half-open: a slot ending at 11:00 does not conflict
//! with a slot starting at 11:00. The same helper backs exam-conflict
//! detection, which compares absolute timestamps instead of minutes.

use crate::error::AppError;
use crate::models::TimeSlot;

/// Parse "HH:MM" (24-hour) into minutes since midnight.
///
/// Schedule data comes out of the registry, so a malformed time is corrupt
/// stored data, not a business-rule failure.
pub fn time_to_minutes(time: &str) -> Result<u32, AppError> {
    let (h, m) = time.split_once(':').ok_or_else(|| malformed(time))?;
    let hours: u32 = h.parse().map_err(|_| malformed(time))?;
    let minutes: u32 = m.parse().map_err(|_| malformed(time))?;
    if hours > 23 || minutes > 59 {
        return Err(malformed(time));
    }
    Ok(hours * 60 + minutes)
}

fn malformed(time: &str) -> AppError {
    AppError::InvalidData(format!("Malformed time of day: {time:?}"))
}

/// Half-open overlap test. Touching endpoints do not overlap.
pub fn ranges_overlap<T: PartialOrd>(a_start: T, a_end: T, b_start: T, b_end: T) -> bool {
    a_start < b_end && b_start < a_end
}

/// Two slots conflict when they fall on the same weekday and their minute
/// ranges overlap.
pub fn slots_conflict(a: &TimeSlot, b: &TimeSlot) -> Result<bool, AppError> {
    if a.day != b.day {
        return Ok(false);
    }
    Ok(ranges_overlap(
        time_to_minutes(&a.start_time)?,
        time_to_minutes(&a.end_time)?,
        time_to_minutes(&b.start_time)?,
        time_to_minutes(&b.end_time)?,
    ))
}
