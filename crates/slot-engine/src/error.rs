//! Error types for booking-flow operations.
//!
//! The slot computation itself is total and never fails; these errors come from
//! the seams around it (registry lookups, parsing user input, flow transitions).

use chrono::NaiveDate;
use thiserror::Error;

use crate::availability::TimeSlot;
use crate::selection::Stage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BookingError {
    #[error("Registration number must not be empty")]
    EmptyRegistration,

    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Vehicle lookup failed: {0}")]
    Lookup(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Unknown inspection category: {0}")]
    UnknownCategory(String),

    #[error("Cannot {action} while {stage}")]
    InvalidTransition { stage: Stage, action: &'static str },

    #[error("Date {0} cannot be booked")]
    DateNotSelectable(NaiveDate),

    #[error("No bookable slot at {time} on {date}")]
    SlotUnavailable { date: NaiveDate, time: TimeSlot },
}

impl BookingError {
    /// True for failures of the vehicle-lookup collaborator, which abort the
    /// flow back to [`Stage::AwaitingVehicle`].
    pub fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            BookingError::EmptyRegistration
                | BookingError::VehicleNotFound(_)
                | BookingError::Lookup(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, BookingError>;
