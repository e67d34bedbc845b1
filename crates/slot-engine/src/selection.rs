//! Booking-flow selection state.
//!
//! The flow moves through
//! `AwaitingVehicle → CategorySelected → DateSelected → TimeSelected → Confirmed`.
//! [`SelectionState`] is an immutable value and [`SelectionState::apply`] is the
//! only way to move it: each event produces a whole new state in which every
//! selection downstream of the changed one is already cleared. A renderer can
//! therefore never observe a stale time under a new date, or a stale date under
//! a new vehicle.
//!
//! Confirmation is presentation only. Nothing is reserved, so two customers can
//! be offered and confirm the same slot.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::debug;

use crate::availability::{is_date_selectable, list_slots, TimeSlot};
use crate::category::{classify, InspectionCategory};
use crate::error::{BookingError, Result};
use crate::locale::{format_date, weekday_name};
use crate::vehicle::VehicleRecord;

/// Where in the booking flow a [`SelectionState`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Stage {
    AwaitingVehicle,
    CategorySelected,
    DateSelected,
    TimeSelected,
    Confirmed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::AwaitingVehicle => "awaiting a vehicle",
            Stage::CategorySelected => "no date is chosen",
            Stage::DateSelected => "no time is chosen",
            Stage::TimeSelected => "a time is chosen",
            Stage::Confirmed => "the booking is confirmed",
        };
        f.write_str(text)
    }
}

/// Something the customer (or the registry) did.
#[derive(Debug, Clone, PartialEq)]
pub enum BookingEvent {
    /// A registration lookup succeeded. Starts a fresh selection with the
    /// category derived from the vehicle.
    VehicleFound(VehicleRecord),
    /// A registration lookup failed; back to the start.
    LookupFailed,
    CategoryChosen(InspectionCategory),
    DateChosen(NaiveDate),
    TimeChosen(TimeSlot),
    Confirm,
    Restart,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SelectionState {
    vehicle: Option<VehicleRecord>,
    category: Option<InspectionCategory>,
    date: Option<NaiveDate>,
    time: Option<TimeSlot>,
    confirmed: bool,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle(&self) -> Option<&VehicleRecord> {
        self.vehicle.as_ref()
    }

    pub fn category(&self) -> Option<InspectionCategory> {
        self.category
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn time(&self) -> Option<TimeSlot> {
        self.time
    }

    pub fn stage(&self) -> Stage {
        if self.confirmed {
            Stage::Confirmed
        } else if self.time.is_some() {
            Stage::TimeSelected
        } else if self.date.is_some() {
            Stage::DateSelected
        } else if self.category.is_some() {
            Stage::CategorySelected
        } else {
            Stage::AwaitingVehicle
        }
    }

    /// The slots to render for the chosen date and category; empty until both
    /// are chosen.
    pub fn available_slots(&self, now: NaiveDateTime) -> Vec<TimeSlot> {
        match (self.date, self.category) {
            (Some(date), Some(category)) => list_slots(date, category, now),
            _ => Vec::new(),
        }
    }

    /// Apply `event` at local time `now`, returning the next state.
    ///
    /// # Errors
    /// `InvalidTransition` when the event is out of order for the current stage,
    /// `DateNotSelectable` for a weekend, past or too-distant date, and
    /// `SlotUnavailable` for a time not offered on the chosen date (including
    /// one that elapsed before confirmation). `self` is left untouched.
    pub fn apply(&self, event: BookingEvent, now: NaiveDateTime) -> Result<SelectionState> {
        let from = self.stage();
        let next = match event {
            BookingEvent::VehicleFound(record) => {
                let category = classify(&record);
                SelectionState {
                    vehicle: Some(record),
                    category: Some(category),
                    ..SelectionState::default()
                }
            }
            BookingEvent::LookupFailed | BookingEvent::Restart => SelectionState::default(),
            BookingEvent::CategoryChosen(category) => {
                self.require(self.vehicle.is_some(), "choose a category")?;
                SelectionState {
                    vehicle: self.vehicle.clone(),
                    category: Some(category),
                    ..SelectionState::default()
                }
            }
            BookingEvent::DateChosen(date) => {
                let category = self.require_some(self.category, "choose a date")?;
                if !is_date_selectable(date, now.date()) {
                    return Err(BookingError::DateNotSelectable(date));
                }
                SelectionState {
                    vehicle: self.vehicle.clone(),
                    category: Some(category),
                    date: Some(date),
                    ..SelectionState::default()
                }
            }
            BookingEvent::TimeChosen(time) => {
                let date = self.require_some(self.date, "choose a time")?;
                self.ensure_offered(date, time, now)?;
                SelectionState {
                    time: Some(time),
                    confirmed: false,
                    ..self.clone()
                }
            }
            BookingEvent::Confirm => {
                let time = self.require_some(self.time, "confirm")?;
                let date = self.require_some(self.date, "confirm")?;
                self.ensure_offered(date, time, now)?;
                SelectionState {
                    confirmed: true,
                    ..self.clone()
                }
            }
        };

        debug!(from = ?from, to = ?next.stage(), "booking selection changed");
        Ok(next)
    }

    /// The confirmation summary, once the booking is confirmed.
    pub fn confirmation(&self) -> Option<Confirmation> {
        if !self.confirmed {
            return None;
        }
        let category = self.category?;
        Some(Confirmation {
            registration: self.vehicle.as_ref()?.registration.clone(),
            category,
            date: self.date?,
            time: self.time?,
            price_dkk: category.price_dkk(),
        })
    }

    fn require(&self, ok: bool, action: &'static str) -> Result<()> {
        if ok && !self.confirmed {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                stage: self.stage(),
                action,
            })
        }
    }

    fn require_some<T>(&self, value: Option<T>, action: &'static str) -> Result<T> {
        self.require(value.is_some(), action)?;
        value.ok_or(BookingError::InvalidTransition {
            stage: self.stage(),
            action,
        })
    }

    /// The chosen date must still be selectable at `now`, and `time` still offered on it.
    fn ensure_offered(&self, date: NaiveDate, time: TimeSlot, now: NaiveDateTime) -> Result<()> {
        if !is_date_selectable(date, now.date()) {
            return Err(BookingError::DateNotSelectable(date));
        }
        if self.available_slots_on(date, now).contains(&time) {
            Ok(())
        } else {
            Err(BookingError::SlotUnavailable { date, time })
        }
    }

    fn available_slots_on(&self, date: NaiveDate, now: NaiveDateTime) -> Vec<TimeSlot> {
        self.category
            .map(|category| list_slots(date, category, now))
            .unwrap_or_default()
    }
}

/// What the customer sees after confirming.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub registration: String,
    pub category: InspectionCategory,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub price_dkk: Option<u32>,
}

impl Confirmation {
    /// e.g. `"Toldsyn for AB12345, fredag 16. oktober 2026 kl. 10:00 (1299 kr)"`.
    pub fn summary(&self) -> String {
        let mut text = format!(
            "{} for {}, {} {} kl. {}",
            self.category.label(),
            self.registration,
            weekday_name(self.date.weekday()),
            format_date(self.date),
            self.time
        );
        if let Some(price) = self.price_dkk {
            text.push_str(&format!(" ({} kr)", price));
        }
        text
    }
}
