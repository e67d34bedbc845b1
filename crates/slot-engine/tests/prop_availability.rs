//! Property-based tests for slot listing using proptest.
//!
//! These verify invariants that must hold for *any* date, category and current
//! time, not just the specific examples in `availability_tests.rs`.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use proptest::prelude::*;
use slot_engine::{
    business_day, is_date_selectable, is_day_eligible, list_slots, next_available_slot,
    InspectionCategory,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_category() -> impl Strategy<Value = InspectionCategory> {
    prop::sample::select(InspectionCategory::ALL.to_vec())
}

/// A date in 2025-2027. Day capped at 28 to avoid invalid month/day combos.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_now_on(date: NaiveDate) -> impl Strategy<Value = NaiveDateTime> {
    (0u32..=23, 0u32..=59, 0u32..=59)
        .prop_map(move |(h, m, s)| date.and_hms_opt(h, m, s).unwrap())
}

/// A date together with a `now` on that same date.
fn arb_today() -> impl Strategy<Value = NaiveDateTime> {
    arb_date().prop_flat_map(arb_now_on)
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn slots_are_strictly_increasing(date in arb_date(), category in arb_category()) {
        let slots = list_slots(date, category, date.and_hms_opt(0, 0, 0).unwrap());
        for pair in slots.windows(2) {
            prop_assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn slots_fit_business_hours(date in arb_date(), category in arb_category()) {
        let slots = list_slots(date, category, date.and_hms_opt(0, 0, 0).unwrap());
        if let Some(day) = business_day(date.weekday()) {
            for slot in &slots {
                prop_assert!(slot.start() >= day.open);
                prop_assert!(slot.end(category.granularity()) <= day.close);
                prop_assert!(slot.end(category.granularity()) + Duration::minutes(30) <= day.close);
            }
        } else {
            prop_assert!(slots.is_empty());
        }
    }

    #[test]
    fn weekend_is_never_eligible_and_never_has_slots(
        date in arb_date(),
        category in arb_category(),
    ) {
        let weekend = matches!(date.weekday(), Weekday::Sat | Weekday::Sun);
        prop_assert_eq!(is_day_eligible(date), !weekend);
        if weekend {
            prop_assert!(list_slots(date, category, date.and_hms_opt(0, 0, 0).unwrap()).is_empty());
        }
    }

    #[test]
    fn today_only_offers_future_starts(now in arb_today(), category in arb_category()) {
        for slot in list_slots(now.date(), category, now) {
            prop_assert!(
                (slot.hour(), slot.minute()) > (now.hour(), now.minute()),
                "{} offered at {}", slot, now
            );
        }
    }

    #[test]
    fn today_is_a_suffix_of_the_full_day(now in arb_today(), category in arb_category()) {
        let full = list_slots(now.date(), category, now.date().and_hms_opt(0, 0, 0).unwrap());
        let today = list_slots(now.date(), category, now);
        prop_assert!(full.ends_with(&today));
    }

    #[test]
    fn listing_is_idempotent(now in arb_today(), category in arb_category()) {
        prop_assert_eq!(
            list_slots(now.date(), category, now),
            list_slots(now.date(), category, now)
        );
    }

    #[test]
    fn next_slot_is_selectable_and_offered(now in arb_today(), category in arb_category()) {
        let (date, slot) = next_available_slot(category, now)
            .expect("a three-month window always has a weekday slot");
        prop_assert!(is_date_selectable(date, now.date()));
        prop_assert!(list_slots(date, category, now).contains(&slot));
        prop_assert!(date - now.date() <= Duration::days(3));
    }
}
