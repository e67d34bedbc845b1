//! Bookable slot computation.
//!
//! Given a calendar date, an inspection category and the current local time,
//! derives the ordered start times a customer may book. Everything here is a
//! pure function of its inputs: no clock is read and no state is kept, so the
//! same inputs always give the same slots.
//!
//! A slot is offered when it fits the day's opening window with the last half
//! hour before closing left free, i.e. `start + granularity + 30 min <= close`.
//! On the current day only starts strictly after `now` (to the minute) remain.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::category::{InspectionCategory, SlotGranularity};
use crate::error::BookingError;
use crate::hours::business_day;

/// The stretch before closing time that no slot may run into.
const CLOSING_BUFFER_MINUTES: i64 = 30;

/// How far ahead a booking can be made, counted in calendar months from today.
pub const BOOKING_HORIZON_MONTHS: u32 = 3;

/// A bookable start time on some day, at minute precision.
///
/// Displays and serializes as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    /// `None` when `hour`/`minute` are out of range.
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(TimeSlot)
    }

    pub fn start(&self) -> NaiveTime {
        self.0
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// When a slot starting here ends.
    pub fn end(&self, granularity: SlotGranularity) -> NaiveTime {
        self.0 + granularity.duration()
    }

    /// The slot's start as a timestamp on `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.0)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (h, m) = trimmed
            .split_once(':')
            .ok_or_else(|| BookingError::InvalidTime(s.to_string()))?;
        let digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if !(1..=2).contains(&h.len()) || m.len() != 2 || !digits(h) || !digits(m) {
            return Err(BookingError::InvalidTime(s.to_string()));
        }
        let hour: u32 = h.parse().map_err(|_| BookingError::InvalidTime(s.to_string()))?;
        let minute: u32 = m.parse().map_err(|_| BookingError::InvalidTime(s.to_string()))?;
        TimeSlot::new(hour, minute).ok_or_else(|| BookingError::InvalidTime(s.to_string()))
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.to_string()
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The slots still open on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaySlots {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

/// Whether the centre is open at all on `date` (Monday to Friday).
///
/// This says nothing about the booking window; see [`is_date_selectable`].
pub fn is_day_eligible(date: NaiveDate) -> bool {
    business_day(date.weekday()).is_some()
}

/// The inclusive range of dates a customer may pick: today through the same
/// day [`BOOKING_HORIZON_MONTHS`] months later.
///
/// When the target month is shorter the end is clamped to its last day
/// (30 November gives 28 or 29 February).
pub fn booking_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let last = today
        .checked_add_months(Months::new(BOOKING_HORIZON_MONTHS))
        .unwrap_or(NaiveDate::MAX);
    (today, last)
}

/// Whether `date` can be chosen in the date picker on `today`: a business day
/// that is neither in the past nor beyond the booking horizon.
pub fn is_date_selectable(date: NaiveDate, today: NaiveDate) -> bool {
    let (first, last) = booking_window(today);
    is_day_eligible(date) && date >= first && date <= last
}

/// List the bookable slot starts on `date` for `category`, in ascending order.
///
/// `now` is the local wall-clock time of the centre. It only matters when
/// `date` is `now`'s date, where starts at or before `now`'s hour and minute
/// are dropped. Closed days, and days whose slots have all elapsed, give an
/// empty list.
pub fn list_slots(
    date: NaiveDate,
    category: InspectionCategory,
    now: NaiveDateTime,
) -> Vec<TimeSlot> {
    let Some(day) = business_day(date.weekday()) else {
        return Vec::new();
    };

    let step = category.granularity().duration();
    let latest_end = day.close - Duration::minutes(CLOSING_BUFFER_MINUTES);
    let elapsed_until = (now.date() == date).then(|| (now.hour(), now.minute()));

    let mut slots = Vec::new();
    let mut start = day.open;
    while start + step <= latest_end {
        let in_future = elapsed_until.is_none_or(|cutoff| (start.hour(), start.minute()) > cutoff);
        if in_future {
            slots.push(TimeSlot(start));
        }
        start += step;
    }

    slots
}

/// Every selectable date from `now`'s date through the end of the booking
/// window that still has at least one slot for `category`.
pub fn available_days(category: InspectionCategory, now: NaiveDateTime) -> Vec<DaySlots> {
    let today = now.date();
    let (_, last) = booking_window(today);

    today
        .iter_days()
        .take_while(|date| *date <= last)
        .filter(|date| is_day_eligible(*date))
        .filter_map(|date| {
            let slots = list_slots(date, category, now);
            (!slots.is_empty()).then_some(DaySlots { date, slots })
        })
        .collect()
}

/// The earliest bookable slot for `category` from `now` onwards, if any falls
/// inside the booking window.
pub fn next_available_slot(
    category: InspectionCategory,
    now: NaiveDateTime,
) -> Option<(NaiveDate, TimeSlot)> {
    let today = now.date();
    let (_, last) = booking_window(today);

    today
        .iter_days()
        .take_while(|date| *date <= last)
        .find_map(|date| {
            list_slots(date, category, now)
                .first()
                .map(|slot| (date, *slot))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn time_slot_formats_zero_padded() {
        assert_eq!(TimeSlot::new(8, 0).unwrap().to_string(), "08:00");
        assert_eq!(TimeSlot::new(13, 30).unwrap().to_string(), "13:30");
    }

    #[test]
    fn time_slot_parses() {
        assert_eq!("08:30".parse::<TimeSlot>().unwrap(), TimeSlot::new(8, 30).unwrap());
        assert_eq!("9:00".parse::<TimeSlot>().unwrap(), TimeSlot::new(9, 0).unwrap());
        for bad in ["", "0830", "24:00", "08:60", "08:5", "ab:cd", "+8:00", "008:00", "08:+5"] {
            assert!(
                matches!(bad.parse::<TimeSlot>(), Err(BookingError::InvalidTime(_))),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn time_slot_serializes_as_string() {
        let json = serde_json::to_string(&TimeSlot::new(9, 30).unwrap()).unwrap();
        assert_eq!(json, "\"09:30\"");
    }

    #[test]
    fn slot_end_follows_granularity() {
        let slot = TimeSlot::new(14, 0).unwrap();
        assert_eq!(slot.end(SlotGranularity::Hour), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
        assert_eq!(
            slot.end(SlotGranularity::HalfHour),
            NaiveTime::from_hms_opt(14, 30, 0).unwrap()
        );
    }

    #[test]
    fn seconds_of_now_are_ignored() {
        // 2026-10-19 is a Monday.
        let now = at(2026, 10, 19, 10, 30).with_second(59).unwrap();
        let slots = list_slots(now.date(), InspectionCategory::Periodic, now);
        assert_eq!(slots.first().map(ToString::to_string).as_deref(), Some("11:00"));
    }

    #[test]
    fn window_clamps_to_month_end() {
        let today = NaiveDate::from_ymd_opt(2026, 11, 30).unwrap();
        let (_, last) = booking_window(today);
        assert_eq!(last, NaiveDate::from_ymd_opt(2027, 2, 28).unwrap());
    }
}
