//! # slot-engine
//!
//! Bookable time-slot computation for a vehicle-inspection centre.
//!
//! Given a calendar date, an inspection category and the centre's current local
//! time, the engine derives the start times a customer may book. The rules are
//! fixed: Monday to Thursday 08:00–16:00, Friday 08:00–14:00, weekends closed;
//! customs inspections take an hour, everything else half an hour; the last
//! half hour of each day is kept free; elapsed times today are never offered.
//!
//! ## Modules
//!
//! - [`availability`] — date eligibility, booking window, slot listing, next free slot
//! - [`hours`] — weekday opening hours
//! - [`category`] — inspection categories, slot granularity, vehicle classification
//! - [`selection`] — booking-flow state machine with downstream reset
//! - [`vehicle`] — vehicle records, registration normalization, registry seam
//! - [`locale`] — Danish date and placeholder wording
//! - [`error`] — Error types

pub mod availability;
pub mod category;
pub mod error;
pub mod hours;
pub mod locale;
pub mod selection;
pub mod vehicle;

pub use availability::{
    available_days, booking_window, is_date_selectable, is_day_eligible, list_slots,
    next_available_slot, DaySlots, TimeSlot,
};
pub use category::{classify, InspectionCategory, SlotGranularity};
pub use error::BookingError;
pub use hours::{business_day, BusinessDay};
pub use selection::{BookingEvent, Confirmation, SelectionState, Stage};
pub use vehicle::{
    lookup_vehicle, parse_registry_response, FixtureRegistry, Registration, VehicleRecord,
    VehicleRegistry,
};
