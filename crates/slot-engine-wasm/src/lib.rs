//! WASM bindings for slot-engine.
//!
//! Exposes date eligibility, slot listing and vehicle classification to the
//! booking page via `wasm-bindgen`. Dates travel as `YYYY-MM-DD` strings, the
//! current time as a local `YYYY-MM-DDTHH:MM[:SS]` string, and complex results
//! as JSON strings.
//!
//! Each export is a thin wrapper over a plain function returning
//! `Result<_, String>`, so the conversions are testable off-wasm.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p slot-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir web/pkg/ \
//!   target/wasm32-unknown-unknown/release/slot_engine_wasm.wasm
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use slot_engine::{InspectionCategory, VehicleRecord};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct NextSlotDto {
    date: String,
    time: String,
}

#[derive(Serialize)]
struct CategoryDto {
    slug: &'static str,
    label: &'static str,
    minutes: u32,
    price_dkk: Option<u32>,
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("Invalid date '{}': {}", s, e))
}

/// Parse the browser's local wall-clock time, with or without seconds.
fn parse_now(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("Invalid datetime '{}': {}", s, e))
}

fn parse_category(s: &str) -> Result<InspectionCategory, String> {
    s.parse().map_err(|e: slot_engine::BookingError| e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

// ---------------------------------------------------------------------------
// Plain implementations
// ---------------------------------------------------------------------------

fn day_eligible(date: &str) -> Result<bool, String> {
    Ok(slot_engine::is_day_eligible(parse_date(date)?))
}

fn date_selectable(date: &str, today: &str) -> Result<bool, String> {
    Ok(slot_engine::is_date_selectable(
        parse_date(date)?,
        parse_date(today)?,
    ))
}

fn slots_json(date: &str, category: &str, now: &str) -> Result<String, String> {
    let slots = slot_engine::list_slots(
        parse_date(date)?,
        parse_category(category)?,
        parse_now(now)?,
    );
    to_json(&slots)
}

fn next_slot_json(category: &str, now: &str) -> Result<String, String> {
    let next = slot_engine::next_available_slot(parse_category(category)?, parse_now(now)?).map(
        |(date, slot)| NextSlotDto {
            date: date.format("%Y-%m-%d").to_string(),
            time: slot.to_string(),
        },
    );
    to_json(&next)
}

fn hours_label(date: &str) -> Result<Option<String>, String> {
    let date = parse_date(date)?;
    Ok(slot_engine::business_day(chrono::Datelike::weekday(&date)).map(|day| day.label()))
}

fn classify_json(vehicle_json: &str) -> Result<String, String> {
    let record: VehicleRecord = serde_json::from_str(vehicle_json)
        .map_err(|e| format!("Invalid vehicle JSON: {}", e))?;
    Ok(slot_engine::classify(&record).slug().to_string())
}

fn categories_json() -> Result<String, String> {
    let dtos: Vec<CategoryDto> = InspectionCategory::ALL
        .iter()
        .map(|c| CategoryDto {
            slug: c.slug(),
            label: c.label(),
            minutes: c.granularity().minutes(),
            price_dkk: c.price_dkk(),
        })
        .collect();
    to_json(&dtos)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

fn js_err(e: String) -> JsValue {
    JsValue::from_str(&e)
}

/// Whether the centre is open on `date` (`YYYY-MM-DD`). Used to gray out
/// calendar days.
#[wasm_bindgen(js_name = "isDayEligible")]
pub fn is_day_eligible(date: &str) -> Result<bool, JsValue> {
    day_eligible(date).map_err(js_err)
}

/// Whether `date` is eligible and inside the booking window starting `today`.
#[wasm_bindgen(js_name = "isDateSelectable")]
pub fn is_date_selectable(date: &str, today: &str) -> Result<bool, JsValue> {
    date_selectable(date, today).map_err(js_err)
}

/// Bookable slots on `date` for `category`, as a JSON array of `"HH:MM"`.
///
/// # Arguments
/// - `date` -- `YYYY-MM-DD`
/// - `category` -- category slug (e.g. `"toldsyn"`) or English alias
/// - `now` -- the centre's local time, `YYYY-MM-DDTHH:MM[:SS]`
#[wasm_bindgen(js_name = "listSlots")]
pub fn list_slots(date: &str, category: &str, now: &str) -> Result<String, JsValue> {
    slots_json(date, category, now).map_err(js_err)
}

/// The earliest bookable slot as JSON `{"date", "time"}`, or `null`.
#[wasm_bindgen(js_name = "nextAvailableSlot")]
pub fn next_available_slot(category: &str, now: &str) -> Result<String, JsValue> {
    next_slot_json(category, now).map_err(js_err)
}

/// The opening-hours caption for `date`, or `undefined` on closed days.
#[wasm_bindgen(js_name = "openingHours")]
pub fn opening_hours(date: &str) -> Result<Option<String>, JsValue> {
    hours_label(date).map_err(js_err)
}

/// Derive the inspection category slug from a vehicle record JSON object.
#[wasm_bindgen(js_name = "classifyVehicle")]
pub fn classify_vehicle(vehicle_json: &str) -> Result<String, JsValue> {
    classify_json(vehicle_json).map_err(js_err)
}

/// All categories as a JSON array of `{slug, label, minutes, price_dkk}`.
#[wasm_bindgen(js_name = "categories")]
pub fn categories() -> Result<String, JsValue> {
    categories_json().map_err(js_err)
}
