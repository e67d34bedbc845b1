//! Inspection categories and the slot granularity each one books.
//!
//! A category is derived from the looked-up vehicle (see [`classify`]) and may
//! be overridden by the customer. The category alone decides how long a slot
//! occupies, through the [`CATEGORY_TABLE`] lookup.

use std::fmt;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::BookingError;
use crate::vehicle::VehicleRecord;

/// How long one booked slot occupies the inspection lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotGranularity {
    HalfHour,
    Hour,
}

impl SlotGranularity {
    pub fn minutes(self) -> u32 {
        match self {
            SlotGranularity::HalfHour => 30,
            SlotGranularity::Hour => 60,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::minutes(i64::from(self.minutes()))
    }
}

/// The kind of inspection a booking is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum InspectionCategory {
    /// Regular periodic inspection ("periodesyn").
    #[default]
    Periodic,
    /// Re-inspection after a failed or conditional result ("omsyn").
    Reinspection,
    /// Customs inspection of an imported or unregistered vehicle ("toldsyn").
    Customs,
    Trailer,
    Motorcycle,
    /// Traction-battery test for electric vehicles.
    BatteryTest,
}

/// Static facts about one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryInfo {
    pub category: InspectionCategory,
    pub slug: &'static str,
    pub label: &'static str,
    pub granularity: SlotGranularity,
    /// List price in DKK, where one is published.
    pub price_dkk: Option<u32>,
}

/// Variant → business facts. The single place slot length is decided.
pub static CATEGORY_TABLE: [CategoryInfo; 6] = [
    CategoryInfo {
        category: InspectionCategory::Periodic,
        slug: "periodesyn",
        label: "Periodesyn",
        granularity: SlotGranularity::HalfHour,
        price_dkk: Some(499),
    },
    CategoryInfo {
        category: InspectionCategory::Reinspection,
        slug: "omsyn",
        label: "Omsyn",
        granularity: SlotGranularity::HalfHour,
        price_dkk: Some(250),
    },
    CategoryInfo {
        category: InspectionCategory::Customs,
        slug: "toldsyn",
        label: "Toldsyn",
        granularity: SlotGranularity::Hour,
        price_dkk: Some(1299),
    },
    CategoryInfo {
        category: InspectionCategory::Trailer,
        slug: "trailersyn",
        label: "Trailersyn",
        granularity: SlotGranularity::HalfHour,
        price_dkk: None,
    },
    CategoryInfo {
        category: InspectionCategory::Motorcycle,
        slug: "motorcykelsyn",
        label: "Motorcykelsyn",
        granularity: SlotGranularity::HalfHour,
        price_dkk: None,
    },
    CategoryInfo {
        category: InspectionCategory::BatteryTest,
        slug: "batteritest",
        label: "Batteritest",
        granularity: SlotGranularity::HalfHour,
        price_dkk: None,
    },
];

impl InspectionCategory {
    pub const ALL: [InspectionCategory; 6] = [
        InspectionCategory::Periodic,
        InspectionCategory::Reinspection,
        InspectionCategory::Customs,
        InspectionCategory::Trailer,
        InspectionCategory::Motorcycle,
        InspectionCategory::BatteryTest,
    ];

    pub fn info(self) -> &'static CategoryInfo {
        // The table is ordered like `ALL`, so the discriminant indexes it.
        &CATEGORY_TABLE[self as usize]
    }

    pub fn granularity(self) -> SlotGranularity {
        self.info().granularity
    }

    pub fn slug(self) -> &'static str {
        self.info().slug
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    pub fn price_dkk(self) -> Option<u32> {
        self.info().price_dkk
    }
}

impl fmt::Display for InspectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for InspectionCategory {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        if let Some(info) = CATEGORY_TABLE.iter().find(|info| info.slug == key) {
            return Ok(info.category);
        }
        match key.as_str() {
            "standard" | "periodic" => Ok(InspectionCategory::Periodic),
            "reinspection" => Ok(InspectionCategory::Reinspection),
            "customs" => Ok(InspectionCategory::Customs),
            "trailer" => Ok(InspectionCategory::Trailer),
            "motorcycle" => Ok(InspectionCategory::Motorcycle),
            "battery-test" | "battery" => Ok(InspectionCategory::BatteryTest),
            _ => Err(BookingError::UnknownCategory(s.to_string())),
        }
    }
}

impl From<InspectionCategory> for String {
    fn from(category: InspectionCategory) -> Self {
        category.slug().to_string()
    }
}

impl TryFrom<String> for InspectionCategory {
    type Error = BookingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Registry statuses for a vehicle currently on Danish plates.
const REGISTERED_STATUSES: [&str; 2] = ["registreret", "registered"];

/// Inspection results that do not require a re-inspection.
const APPROVED_RESULTS: [&str; 2] = ["godkendt", "approved"];

const MOTORCYCLE_KINDS: [&str; 3] = ["motorcykel", "motorcycle", "knallert"];
const TRAILER_KINDS: [&str; 4] = ["påhængsvogn", "trailer", "campingvogn", "sættevogn"];
const ELECTRIC_FUELS: [&str; 3] = ["el", "elektricitet", "electric"];

/// Derive the inspection category for a vehicle record.
///
/// Rules are checked in order, first match wins:
/// 1. a status other than registered (imports, deregistered) needs customs;
/// 2. a last inspection that was not approved needs a re-inspection;
/// 3. motorcycles, then trailers, by vehicle kind;
/// 4. electric fuel gets the battery test;
/// 5. everything else is a periodic inspection.
pub fn classify(vehicle: &VehicleRecord) -> InspectionCategory {
    let status = normalized(&vehicle.status);
    if !status.is_empty() && !REGISTERED_STATUSES.contains(&status.as_str()) {
        return InspectionCategory::Customs;
    }

    let last_result = normalized(&vehicle.last_inspection_result);
    if !last_result.is_empty() && !APPROVED_RESULTS.contains(&last_result.as_str()) {
        return InspectionCategory::Reinspection;
    }

    let kind = normalized(&vehicle.kind);
    if MOTORCYCLE_KINDS.iter().any(|k| kind.contains(k)) {
        return InspectionCategory::Motorcycle;
    }
    if TRAILER_KINDS.iter().any(|k| kind.contains(k)) {
        return InspectionCategory::Trailer;
    }

    if ELECTRIC_FUELS.contains(&normalized(&vehicle.fuel_type).as_str()) {
        return InspectionCategory::BatteryTest;
    }

    InspectionCategory::Periodic
}

fn normalized(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|s| s.trim().to_lowercase())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(kind: &str, fuel: &str) -> VehicleRecord {
        VehicleRecord {
            registration: "AB12345".to_string(),
            kind: Some(kind.to_string()),
            fuel_type: Some(fuel.to_string()),
            status: Some("Registreret".to_string()),
            last_inspection_result: Some("Godkendt".to_string()),
            ..VehicleRecord::default()
        }
    }

    #[test]
    fn table_is_indexed_by_discriminant() {
        for category in InspectionCategory::ALL {
            assert_eq!(category.info().category, category);
        }
    }

    #[test]
    fn only_customs_books_a_full_hour() {
        for category in InspectionCategory::ALL {
            let expected = if category == InspectionCategory::Customs { 60 } else { 30 };
            assert_eq!(category.granularity().minutes(), expected, "{category}");
        }
    }

    #[test]
    fn parses_slugs_and_aliases() {
        assert_eq!("toldsyn".parse::<InspectionCategory>().unwrap(), InspectionCategory::Customs);
        assert_eq!(" Customs ".parse::<InspectionCategory>().unwrap(), InspectionCategory::Customs);
        assert_eq!("standard".parse::<InspectionCategory>().unwrap(), InspectionCategory::Periodic);
        assert_eq!(
            "battery-test".parse::<InspectionCategory>().unwrap(),
            InspectionCategory::BatteryTest
        );
        assert!(matches!(
            "toldsy".parse::<InspectionCategory>(),
            Err(BookingError::UnknownCategory(_))
        ));
    }

    #[test]
    fn serializes_as_slug() {
        let json = serde_json::to_string(&InspectionCategory::Motorcycle).unwrap();
        assert_eq!(json, "\"motorcykelsyn\"");
        let back: InspectionCategory = serde_json::from_str("\"omsyn\"").unwrap();
        assert_eq!(back, InspectionCategory::Reinspection);
    }

    #[test]
    fn classify_passenger_car() {
        assert_eq!(classify(&vehicle("Personbil", "Benzin")), InspectionCategory::Periodic);
    }

    #[test]
    fn classify_by_kind_and_fuel() {
        assert_eq!(classify(&vehicle("Motorcykel", "Benzin")), InspectionCategory::Motorcycle);
        assert_eq!(classify(&vehicle("Påhængsvogn", "")), InspectionCategory::Trailer);
        assert_eq!(classify(&vehicle("Personbil", "El")), InspectionCategory::BatteryTest);
    }

    #[test]
    fn unregistered_vehicle_needs_customs_before_anything_else() {
        let mut v = vehicle("Motorcykel", "El");
        v.status = Some("Afmeldt".to_string());
        v.last_inspection_result = Some("Ikke godkendt".to_string());
        assert_eq!(classify(&v), InspectionCategory::Customs);
    }

    #[test]
    fn failed_last_inspection_needs_reinspection() {
        let mut v = vehicle("Personbil", "Diesel");
        v.last_inspection_result = Some("Betinget godkendt".to_string());
        assert_eq!(classify(&v), InspectionCategory::Reinspection);
    }

    #[test]
    fn missing_fields_fall_back_to_periodic() {
        assert_eq!(classify(&VehicleRecord::default()), InspectionCategory::Periodic);
    }
}
