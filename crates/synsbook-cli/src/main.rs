//! `synsbook` CLI — list bookable inspection slots and run a booking from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Slots on a date for a category (now = current time in Europe/Copenhagen)
//! synsbook slots --date 2026-10-23 --category toldsyn
//!
//! # Same, pretending it is Friday 10:15
//! synsbook slots --date 2026-10-23 --category periodesyn --now 2026-10-23T10:15
//!
//! # Is a date bookable?
//! synsbook eligible --date 2026-10-24
//!
//! # Earliest free slot
//! synsbook next --category omsyn
//!
//! # Look up a vehicle in a registry fixture and book it
//! synsbook --registry vehicles.json lookup --registration "AB 12 345"
//! synsbook --registry vehicles.json book -r "AB 12 345" --date 2026-10-21 --time 10:30
//! ```

mod config;
mod telemetry;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use slot_engine::locale::{format_date, or_not_available, weekday_name};
use slot_engine::{
    booking_window, business_day, classify, is_date_selectable, is_day_eligible, list_slots,
    lookup_vehicle, next_available_slot, BookingEvent, InspectionCategory, SelectionState,
    TimeSlot, VehicleRecord,
};
use tracing::info;

use crate::config::{AppConfig, DEFAULT_LOG_LEVEL, DEFAULT_TIMEZONE};

#[derive(Parser)]
#[command(
    name = "synsbook",
    version,
    about = "Vehicle-inspection slot lookup and booking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// IANA timezone the centre's opening hours are kept in
    #[arg(long, global = true, env = "SYNSBOOK_TIMEZONE", default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// JSON file holding an array of vehicle records
    #[arg(long, global = true, env = "SYNSBOOK_REGISTRY")]
    registry: Option<PathBuf>,

    /// Log level or filter directive (overridden by RUST_LOG)
    #[arg(long, global = true, env = "SYNSBOOK_LOG_LEVEL", default_value = DEFAULT_LOG_LEVEL)]
    log_level: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bookable slots on a date
    Slots {
        #[arg(short, long)]
        date: NaiveDate,
        /// Inspection category slug (e.g. periodesyn, toldsyn) or English alias
        #[arg(short, long, default_value = "periodesyn")]
        category: InspectionCategory,
        /// Local time to treat as now (YYYY-MM-DDTHH:MM[:SS])
        #[arg(long, value_parser = parse_local_datetime)]
        now: Option<NaiveDateTime>,
    },
    /// Check whether a date can be booked
    Eligible {
        #[arg(short, long)]
        date: NaiveDate,
        /// First selectable day (defaults to today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Show the earliest bookable slot
    Next {
        #[arg(short, long, default_value = "periodesyn")]
        category: InspectionCategory,
        #[arg(long, value_parser = parse_local_datetime)]
        now: Option<NaiveDateTime>,
    },
    /// List inspection categories with slot length and price
    Categories,
    /// Derive the inspection category from vehicle attributes
    Classify {
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        fuel_type: Option<String>,
        #[arg(long)]
        status: Option<String>,
        /// Result of the last inspection (e.g. "Godkendt")
        #[arg(long)]
        last_result: Option<String>,
    },
    /// Look up a vehicle by registration number
    Lookup {
        #[arg(short, long)]
        registration: String,
    },
    /// Book an inspection: look up the vehicle, pick date and time, confirm
    Book {
        #[arg(short, long)]
        registration: String,
        #[arg(short, long)]
        date: NaiveDate,
        #[arg(short, long)]
        time: TimeSlot,
        /// Override the category derived from the vehicle
        #[arg(short, long)]
        category: Option<InspectionCategory>,
        #[arg(long, value_parser = parse_local_datetime)]
        now: Option<NaiveDateTime>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = AppConfig::new(&cli.timezone, cli.registry.clone(), cli.log_level.clone())?;
    telemetry::init(&config.log_level)?;

    match cli.command {
        Commands::Slots {
            date,
            category,
            now,
        } => {
            let now = now.unwrap_or_else(|| config.local_now());
            let slots = list_slots(date, category, now);
            info!(%date, %category, count = slots.len(), "listed slots");
            print_slots(date, category, &slots, cli.json)?;
        }
        Commands::Eligible { date, today } => {
            let today = today.unwrap_or_else(|| config.local_now().date());
            let (_, window_end) = booking_window(today);
            let eligible = is_day_eligible(date);
            let selectable = is_date_selectable(date, today);
            if cli.json {
                print_json(&json!({
                    "date": date,
                    "eligible": eligible,
                    "selectable": selectable,
                    "window_start": today,
                    "window_end": window_end,
                }))?;
            } else {
                let verdict = if selectable {
                    "bookable"
                } else if !eligible {
                    "closed"
                } else {
                    "outside the booking window"
                };
                println!("{} ({}): {}", date, weekday_name(date.weekday()), verdict);
                println!("Booking window: {} to {}", today, window_end);
            }
        }
        Commands::Next { category, now } => {
            let now = now.unwrap_or_else(|| config.local_now());
            let next = next_available_slot(category, now);
            if cli.json {
                print_json(&next.map(|(date, time)| json!({ "date": date, "time": time })))?;
            } else {
                match next {
                    Some((date, time)) => println!(
                        "Next available {}: {} {} kl. {}",
                        category.label(),
                        weekday_name(date.weekday()),
                        format_date(date),
                        time
                    ),
                    None => println!("No available times for {}", category.label()),
                }
            }
        }
        Commands::Categories => {
            if cli.json {
                let rows: Vec<_> = InspectionCategory::ALL
                    .iter()
                    .map(|c| {
                        json!({
                            "slug": c.slug(),
                            "label": c.label(),
                            "minutes": c.granularity().minutes(),
                            "price_dkk": c.price_dkk(),
                        })
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                for c in InspectionCategory::ALL {
                    let price = c
                        .price_dkk()
                        .map(|p| format!("{} kr", p))
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<14} {:<14} {:>3} min  {}",
                        c.slug(),
                        c.label(),
                        c.granularity().minutes(),
                        price
                    );
                }
            }
        }
        Commands::Classify {
            kind,
            fuel_type,
            status,
            last_result,
        } => {
            let record = VehicleRecord {
                kind,
                fuel_type,
                status,
                last_inspection_result: last_result,
                ..VehicleRecord::default()
            };
            let category = classify(&record);
            if cli.json {
                print_json(&category)?;
            } else {
                println!("{} ({})", category, category.label());
            }
        }
        Commands::Lookup { registration } => {
            let registry = config.registry()?;
            let record = lookup_vehicle(&registry, &registration)
                .with_context(|| format!("Vehicle lookup failed for '{}'", registration))?;
            print_vehicle(&record, cli.json)?;
        }
        Commands::Book {
            registration,
            date,
            time,
            category,
            now,
        } => {
            let now = now.unwrap_or_else(|| config.local_now());
            let registry = config.registry()?;
            let record = lookup_vehicle(&registry, &registration)
                .with_context(|| format!("Vehicle lookup failed for '{}'", registration))?;

            let mut state = SelectionState::new().apply(BookingEvent::VehicleFound(record), now)?;
            if let Some(category) = category {
                state = state.apply(BookingEvent::CategoryChosen(category), now)?;
            }
            state = state
                .apply(BookingEvent::DateChosen(date), now)
                .context("Date cannot be booked")?;
            state = state
                .apply(BookingEvent::TimeChosen(time), now)
                .context("Time cannot be booked")?;
            state = state.apply(BookingEvent::Confirm, now)?;

            let confirmation = state
                .confirmation()
                .context("Booking was not confirmed")?;
            info!(registration = %confirmation.registration, %date, %time, "booking confirmed");

            if cli.json {
                print_json(&json!({
                    "confirmation": confirmation,
                    "summary": confirmation.summary(),
                }))?;
            } else {
                println!("Booking confirmed: {}", confirmation.summary());
            }
        }
    }

    Ok(())
}

/// Parse a local wall-clock time given as `YYYY-MM-DDTHH:MM` or with seconds.
fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM[:SS]: {}", e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", pretty);
    Ok(())
}

fn print_slots(
    date: NaiveDate,
    category: InspectionCategory,
    slots: &[TimeSlot],
    as_json: bool,
) -> Result<()> {
    if as_json {
        return print_json(&json!({
            "date": date,
            "category": category,
            "minutes": category.granularity().minutes(),
            "slots": slots,
        }));
    }

    println!(
        "{} {} ({}, {} min)",
        weekday_name(date.weekday()),
        format_date(date),
        category.label(),
        category.granularity().minutes()
    );
    if slots.is_empty() {
        println!("No available times");
    } else {
        let times: Vec<String> = slots.iter().map(ToString::to_string).collect();
        println!("{}", times.join(" "));
    }
    if let Some(day) = business_day(date.weekday()) {
        println!("{}", day.label());
    }
    Ok(())
}

fn print_vehicle(record: &VehicleRecord, as_json: bool) -> Result<()> {
    let category = classify(record);
    if as_json {
        return print_json(&json!({
            "vehicle": record,
            "category": category,
        }));
    }

    let date_or_na = |d: Option<NaiveDate>| {
        d.map(format_date)
            .unwrap_or_else(|| or_not_available(None).to_string())
    };
    let model_year = record.model_year.map(|y| y.to_string());
    let mileage = record.mileage.map(|m| format!("{} km", m));

    println!("Registration:     {}", record.registration);
    println!("Brand and model:  {}", or_not_available(record.brand_and_model.as_deref()));
    println!("Variant:          {}", or_not_available(record.variant.as_deref()));
    println!("Kind:             {}", or_not_available(record.kind.as_deref()));
    println!("Fuel:             {}", or_not_available(record.fuel_type.as_deref()));
    println!("Model year:       {}", or_not_available(model_year.as_deref()));
    println!("Mileage:          {}", or_not_available(mileage.as_deref()));
    println!("First registered: {}", date_or_na(record.first_registration_date()));
    println!(
        "Last inspection:  {} ({})",
        date_or_na(record.last_inspection_date()),
        or_not_available(record.last_inspection_result.as_deref())
    );
    println!("Next inspection:  {}", date_or_na(record.next_inspection_date()));
    println!(
        "Category:         {} ({}, {} min)",
        category,
        category.label(),
        category.granularity().minutes()
    );
    Ok(())
}
