//! Tests for registration handling and the vehicle registry seam.

use chrono::NaiveDate;
use slot_engine::vehicle::parse_registry_date;
use slot_engine::{
    classify, lookup_vehicle, parse_registry_response, BookingError, FixtureRegistry,
    InspectionCategory, Registration,
};

const REGISTRY_BODY: &str = r#"{
  "data": {
    "id": 881,
    "registration": "AB12345",
    "vin": "WVWZZZ1KZAW000001",
    "first_registration_date": "2015-03-01T00:00:00.000+01:00",
    "status": "Registreret",
    "kind": "Personbil",
    "usage": "Privat personkørsel",
    "model_year": 2015,
    "fuel_type": "Diesel",
    "mileage": 182000,
    "mileage_annual_average": 17500,
    "brand_and_model": "Volkswagen Golf",
    "last_inspection_date": "2024-05-02",
    "last_inspection_result": "Godkendt",
    "next_inspection_date_estimate": "2026-05-02",
    "ncap_five": true,
    "some_future_field": [1, 2, 3],
    "inspections": [
      { "id": 1, "date": "2024-05-02", "result": "Godkendt", "mileage": 150000 }
    ]
  }
}"#;

#[test]
fn registration_is_normalized() {
    let reg = Registration::parse(" ab 12\t345 ").unwrap();
    assert_eq!(reg.as_str(), "AB12345");
    assert_eq!(reg.to_string(), "AB12345");
}

#[test]
fn blank_registration_is_rejected() {
    assert_eq!(Registration::parse("   "), Err(BookingError::EmptyRegistration));
    assert!(BookingError::EmptyRegistration.is_lookup_failure());
}

#[test]
fn registry_envelope_is_decoded() {
    let record = parse_registry_response(REGISTRY_BODY).unwrap();
    assert_eq!(record.registration, "AB12345");
    assert_eq!(record.model_year, Some(2015));
    assert_eq!(record.inspections.len(), 1);
    assert_eq!(
        record.first_registration_date(),
        NaiveDate::from_ymd_opt(2015, 3, 1)
    );
    assert_eq!(
        record.next_inspection_date(),
        NaiveDate::from_ymd_opt(2026, 5, 2)
    );
    assert_eq!(classify(&record), InspectionCategory::Periodic);
}

#[test]
fn null_or_missing_data_is_not_found() {
    for body in [r#"{"data": null}"#, r#"{}"#] {
        let err = parse_registry_response(body).unwrap_err();
        assert!(matches!(err, BookingError::VehicleNotFound(_)), "{body}");
        assert!(err.is_lookup_failure());
    }
}

#[test]
fn garbage_body_is_a_lookup_error() {
    assert!(matches!(
        parse_registry_response("<html>502</html>"),
        Err(BookingError::Lookup(_))
    ));
}

#[test]
fn registry_dates_tolerate_garbage() {
    assert_eq!(parse_registry_date("2024"), None);
    assert_eq!(parse_registry_date("not a date at all"), None);
}

#[test]
fn fixture_registry_looks_up_by_normalized_registration() {
    let json = r#"[
        {"registration": "AB 12 345", "kind": "Personbil"},
        {"registration": "cd99887", "kind": "Motorcykel"}
    ]"#;
    let registry = FixtureRegistry::from_json(json).unwrap();
    assert_eq!(registry.len(), 2);

    let record = lookup_vehicle(&registry, "cd 99 887").unwrap();
    assert_eq!(classify(&record), InspectionCategory::Motorcycle);

    let record = lookup_vehicle(&registry, "ab12345").unwrap();
    assert_eq!(record.kind.as_deref(), Some("Personbil"));
}

#[test]
fn fixture_registry_reports_unknown_vehicle() {
    let registry = FixtureRegistry::from_json("[]").unwrap();
    assert!(registry.is_empty());
    assert_eq!(
        lookup_vehicle(&registry, "ZZ 00 000"),
        Err(BookingError::VehicleNotFound("ZZ00000".to_string()))
    );
    assert_eq!(
        lookup_vehicle(&registry, ""),
        Err(BookingError::EmptyRegistration)
    );
}

#[test]
fn fixture_registry_missing_file_is_a_lookup_error() {
    assert!(matches!(
        FixtureRegistry::from_path("/nonexistent/vehicles.json"),
        Err(BookingError::Lookup(_))
    ));
}
