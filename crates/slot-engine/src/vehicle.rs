//! Vehicle records and the registry lookup seam.
//!
//! The booking flow starts from a registration number. The registry that
//! resolves it is an external collaborator behind [`VehicleRegistry`]; this
//! module only defines the record shape, normalizes registration input, and
//! decodes the registry's `{"data": ...}` response envelope.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{BookingError, Result};

/// One past inspection of a vehicle.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionRecord {
    pub id: Option<u64>,
    pub vehicle_id: Option<u64>,
    pub registration: Option<String>,
    pub vin: Option<String>,
    pub date: Option<String>,
    pub result: Option<String>,
    pub mileage: Option<u64>,
    /// Link to the inspection report.
    pub pdf: Option<String>,
}

/// A vehicle as returned by the registry.
///
/// Every field but the registration may be absent; unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleRecord {
    pub id: Option<u64>,
    pub registration: String,
    pub vin: Option<String>,
    pub first_registration_date: Option<String>,
    pub status: Option<String>,
    pub kind: Option<String>,
    pub usage: Option<String>,
    pub model_year: Option<i32>,
    pub fuel_type: Option<String>,
    pub mileage: Option<u64>,
    pub mileage_annual_average: Option<u64>,
    pub brand_and_model: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub variant: Option<String>,
    pub body_type: Option<String>,
    pub last_inspection_date: Option<String>,
    pub last_inspection_result: Option<String>,
    pub next_inspection_date_estimate: Option<String>,
    pub ncap_five: Option<bool>,
    pub extra_equipment: Option<String>,
    pub inspections: Vec<InspectionRecord>,
}

impl VehicleRecord {
    pub fn last_inspection_date(&self) -> Option<NaiveDate> {
        self.last_inspection_date.as_deref().and_then(parse_registry_date)
    }

    pub fn next_inspection_date(&self) -> Option<NaiveDate> {
        self.next_inspection_date_estimate
            .as_deref()
            .and_then(parse_registry_date)
    }

    pub fn first_registration_date(&self) -> Option<NaiveDate> {
        self.first_registration_date
            .as_deref()
            .and_then(parse_registry_date)
    }
}

/// Parse the date part of a registry timestamp (`2019-04-01` or
/// `2019-04-01T00:00:00.000+02:00`).
pub fn parse_registry_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// A normalized registration number: no whitespace, upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Registration(String);

impl Registration {
    /// Normalize user input such as `"ab 12 345"` into `AB12345`.
    ///
    /// # Errors
    /// Returns `BookingError::EmptyRegistration` when nothing but whitespace
    /// was entered.
    pub fn parse(input: &str) -> Result<Self> {
        let normalized: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        if normalized.is_empty() {
            return Err(BookingError::EmptyRegistration);
        }
        Ok(Registration(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves registration numbers to vehicle records.
pub trait VehicleRegistry {
    /// # Errors
    /// `VehicleNotFound` when the registry has no such vehicle, `Lookup` when
    /// the registry could not be reached or answered garbage.
    fn lookup(&self, registration: &Registration) -> Result<VehicleRecord>;
}

/// Normalize `input` and look it up in `registry`.
pub fn lookup_vehicle<R: VehicleRegistry + ?Sized>(
    registry: &R,
    input: &str,
) -> Result<VehicleRecord> {
    let registration = Registration::parse(input)?;
    match registry.lookup(&registration) {
        Ok(record) => {
            debug!(registration = %registration, kind = ?record.kind, "vehicle found");
            Ok(record)
        }
        Err(err) => {
            warn!(registration = %registration, error = %err, "vehicle lookup failed");
            Err(err)
        }
    }
}

#[derive(Deserialize)]
struct RegistryEnvelope {
    #[serde(default)]
    data: Option<VehicleRecord>,
}

/// Decode a registry response body of the form `{"data": {...}}`.
///
/// # Errors
/// `VehicleNotFound` when `data` is missing or null; `Lookup` when the body is
/// not valid JSON of that shape.
pub fn parse_registry_response(body: &str) -> Result<VehicleRecord> {
    let envelope: RegistryEnvelope = serde_json::from_str(body)
        .map_err(|e| BookingError::Lookup(format!("invalid registry response: {}", e)))?;
    envelope
        .data
        .ok_or_else(|| BookingError::VehicleNotFound("no data in registry response".to_string()))
}

/// An in-memory registry, typically loaded from a JSON fixture file holding an
/// array of vehicle records.
#[derive(Debug, Clone, Default)]
pub struct FixtureRegistry {
    vehicles: HashMap<Registration, VehicleRecord>,
}

impl FixtureRegistry {
    pub fn new(records: impl IntoIterator<Item = VehicleRecord>) -> Result<Self> {
        let mut vehicles = HashMap::new();
        for record in records {
            let key = Registration::parse(&record.registration)?;
            vehicles.insert(key, record);
        }
        Ok(Self { vehicles })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<VehicleRecord> = serde_json::from_str(json)
            .map_err(|e| BookingError::Lookup(format!("invalid vehicle fixture: {}", e)))?;
        Self::new(records)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BookingError::Lookup(format!("cannot read registry {}: {}", path.display(), e))
        })?;
        let registry = Self::from_json(&json)?;
        debug!(path = %path.display(), vehicles = registry.len(), "loaded fixture registry");
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }
}

impl VehicleRegistry for FixtureRegistry {
    fn lookup(&self, registration: &Registration) -> Result<VehicleRecord> {
        self.vehicles
            .get(registration)
            .cloned()
            .ok_or_else(|| BookingError::VehicleNotFound(registration.to_string()))
    }
}
