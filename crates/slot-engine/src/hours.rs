//! Weekly opening hours of the inspection centre.

use chrono::{NaiveTime, Weekday};
use serde::Serialize;

/// The open window for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BusinessDay {
    pub weekday: Weekday,
    pub open: NaiveTime,
    pub close: NaiveTime,
}

const fn hm(hour: u32, min: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, min, 0) {
        Some(t) => t,
        None => panic!("invalid opening-hours constant"),
    }
}

const OPEN: NaiveTime = hm(8, 0);
const CLOSE_MON_THU: NaiveTime = hm(16, 0);
const CLOSE_FRI: NaiveTime = hm(14, 0);

/// Opening hours indexed by `Weekday::num_days_from_monday()`.
const WEEK: [Option<(NaiveTime, NaiveTime)>; 7] = [
    Some((OPEN, CLOSE_MON_THU)),
    Some((OPEN, CLOSE_MON_THU)),
    Some((OPEN, CLOSE_MON_THU)),
    Some((OPEN, CLOSE_MON_THU)),
    Some((OPEN, CLOSE_FRI)),
    None,
    None,
];

/// The opening window for `weekday`, or `None` when closed all day.
pub fn business_day(weekday: Weekday) -> Option<BusinessDay> {
    WEEK[weekday.num_days_from_monday() as usize].map(|(open, close)| BusinessDay {
        weekday,
        open,
        close,
    })
}

impl BusinessDay {
    /// The caption shown beneath the slot list, e.g. `"Fredag: 08:00 - 14:00"`.
    pub fn label(&self) -> String {
        let days = if self.weekday == Weekday::Fri {
            "Fredag"
        } else {
            "Mandag - Torsdag"
        };
        format!(
            "{}: {} - {}",
            days,
            self.open.format("%H:%M"),
            self.close.format("%H:%M")
        )
    }
}
