//! Daily time grid generation.
//!
//! # Responsibility
//! - Expand the configured day shape into the ordered slot sequence.
//! - Recover from a malformed day-start instead of failing, so the grid is
//!   always renderable.
//!
//! # Invariants
//! - `generate_slots` returns exactly `units_per_day` slots spaced
//!   `unit_minutes` apart.
//! - Slot arithmetic never wraps: the raw minute offset keeps growing past
//!   24:00 and only the `HH:MM` rendering folds back into a day.

use chrono::{NaiveTime, Timelike};
use log::warn;
use std::fmt::{Display, Formatter};

/// Fallback used when the configured day start cannot be parsed.
pub const DEFAULT_DAY_START: &str = "09:00";

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One slot start, as a raw minute offset from midnight of the grid's day.
///
/// The offset is deliberately not wrapped at 24 hours; callers that care
/// about calendar-day placement read [`SlotTime::minute_of_day`] and decide.
/// `Display` renders the folded `HH:MM` wall-clock form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SlotTime(u32);

impl SlotTime {
    /// Builds a slot time from an in-day hour and minute.
    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self(hour * 60 + minute)
    }

    /// Raw minute offset from midnight; may exceed one day.
    pub fn minute_of_day(self) -> u32 {
        self.0
    }

    /// This slot shifted later by `minutes`.
    pub fn plus_minutes(self, minutes: u32) -> Self {
        Self(self.0 + minutes)
    }

    /// Whether the raw offset has run past the end of the calendar day.
    pub fn overflows_day(self) -> bool {
        self.0 >= MINUTES_PER_DAY
    }

    /// Wall-clock label, folded into 24 hours.
    pub fn label(self) -> String {
        self.to_string()
    }
}

impl Display for SlotTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let folded = self.0 % MINUTES_PER_DAY;
        write!(f, "{:02}:{:02}", folded / 60, folded % 60)
    }
}

/// Parses a `HH:MM` day start into its minute offset, recovering with the
/// 09:00 default on malformed input.
///
/// The recovery is a deliberate availability-over-correctness choice: a
/// corrupted stored value must still yield a renderable grid. The fallback is
/// logged so the corruption stays visible.
fn day_start_minutes(day_start: &str) -> u32 {
    match NaiveTime::parse_from_str(day_start.trim(), "%H:%M") {
        Ok(time) => time.hour() * 60 + time.minute(),
        Err(_) => {
            warn!(
                "event=grid_day_start_fallback module=schedule status=recovered value={} fallback={}",
                day_start, DEFAULT_DAY_START
            );
            9 * 60
        }
    }
}

/// Generates the ordered slot starts for one day.
///
/// Slot `i` (0-indexed) starts at `day_start + i * unit_minutes` minutes.
pub fn generate_slots(day_start: &str, unit_minutes: u32, units_per_day: u32) -> Vec<SlotTime> {
    let start = day_start_minutes(day_start);
    (0..units_per_day)
        .map(|index| SlotTime(start + index * unit_minutes))
        .collect()
}

/// Computes the end of the scheduled day: one unit past the last slot start.
pub fn day_end_time(day_start: &str, unit_minutes: u32, units_per_day: u32) -> SlotTime {
    SlotTime(day_start_minutes(day_start) + unit_minutes * units_per_day)
}

/// Renders the slot sequence as `HH:MM` labels.
pub fn slot_labels(day_start: &str, unit_minutes: u32, units_per_day: u32) -> Vec<String> {
    generate_slots(day_start, unit_minutes, units_per_day)
        .into_iter()
        .map(|slot| slot.to_string())
        .collect()
}
