//! Writes a small sample dataset for local runs:
//! `cargo run --bin generate_sample` then `cargo run -- --dataset sample_places.csv`.
//!
//! The file carries the same column layout as the full "Top Indian Places to
//! Visit" dataset, including the columns the loader drops.

use anyhow::{Context, Result};

#[rustfmt::skip]
const PLACES: &[[&str; 16]] = &[
    // idx, zone, state, city, name, type, est. year, hrs, rating, fee, airport, weekly off, significance, dslr, reviews (lakhs), best time
    ["0", "Northern", "Delhi", "Delhi", "Red Fort", "Historical", "1639", "2.0", "4.5", "35", "Yes", "No", "Historical", "Yes", "2.9", "Evening"],
    ["1", "Northern", "Delhi", "Delhi", "India Gate", "War Memorial", "1921", "1.0", "4.6", "0", "Yes", "No", "Historical", "Yes", "2.6", "Evening"],
    ["2", "Northern", "Delhi", "Delhi", "Lotus Temple", "Temple", "1986", "1.5", "4.5", "0", "Yes", "Monday", "Religious", "Yes", "1.1", "Afternoon"],
    ["3", "Northern", "Uttar Pradesh", "Agra", "Taj Mahal", "Historical", "1653", "3.0", "4.6", "50", "Yes", "Friday", "Historical", "Yes", "8.4", "Morning"],
    ["4", "Northern", "Uttar Pradesh", "Agra", "Agra Fort", "Historical", "1573", "2.5", "4.5", "650", "Yes", "No", "Historical", "Yes", "2.2", "Morning"],
    ["5", "Northern", "Rajasthan", "Jaipur", "Hawa Mahal", "Historical", "1799", "1.0", "4.3", "200", "Yes", "No", "Historical", "Yes", "1.2", "Morning"],
    ["6", "Northern", "Rajasthan", "Jaipur", "Amber Fort", "Fort", "1592", "2.5", "4.6", "500", "Yes", "No", "Historical", "Yes", "1.6", "Morning"],
    ["7", "Southern", "Tamil Nadu", "Chennai", "Marina Beach", "Beach", "", "2.0", "4.3", "0", "Yes", "No", "Nature", "Yes", "1.8", "Evening"],
    ["8", "Southern", "Tamil Nadu", "Madurai", "Meenakshi Temple", "Temple", "1623", "2.0", "4.7", "0", "Yes", "No", "Religious", "No", "1.0", "Morning"],
    ["9", "Southern", "Kerala", "Alappuzha", "Alleppey Backwaters", "Lake", "", "5.0", "4.5", "0", "No", "No", "Nature", "Yes", "0.6", "Morning"],
    ["10", "Southern", "Karnataka", "Hampi", "Virupaksha Temple", "Temple", "700", "2.0", "4.6", "0", "No", "No", "Religious", "Yes", "0.4", "Morning"],
    ["11", "Western", "Maharashtra", "Mumbai", "Gateway of India", "Historical", "1924", "1.0", "4.6", "0", "Yes", "No", "Historical", "Yes", "3.1", "Evening"],
    ["12", "Western", "Goa", "Calangute", "Calangute Beach", "Beach", "", "3.0", "4.3", "0", "Yes", "No", "Nature", "Yes", "0.9", "Evening"],
    ["13", "Eastern", "West Bengal", "Kolkata", "Victoria Memorial", "Historical", "1921", "2.0", "4.6", "30", "Yes", "Monday", "Historical", "Yes", "1.9", "Morning"],
    ["14", "Eastern", "Odisha", "Puri", "Jagannath Temple", "Temple", "1161", "2.0", "4.7", "0", "No", "No", "Religious", "No", "0.8", "Morning"],
    ["15", "North Eastern", "Assam", "Guwahati", "Kamakhya Temple", "Temple", "1565", "2.0", "4.6", "0", "Yes", "No", "Religious", "No", "0.5", "Morning"],
    ["16", "Central", "Madhya Pradesh", "Khajuraho", "Khajuraho Temples", "Temple", "950", "3.0", "4.6", "40", "Yes", "No", "Historical", "Yes", "0.5", "Morning"],
];

const HEADER: [&str; 16] = [
    "Unnamed: 0",
    "Zone",
    "State",
    "City",
    "Name",
    "Type",
    "Establishment Year",
    "time needed to visit in hrs",
    "Google review rating",
    "Entrance Fee in INR",
    "Airport with 50km Radius",
    "Weekly Off",
    "Significance",
    "DSLR Allowed",
    "Number of google review in lakhs",
    "Best Time to visit",
];

fn main() -> Result<()> {
    let out = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_places.csv".to_string());

    let mut writer = csv::Writer::from_path(&out).with_context(|| format!("creating {out}"))?;
    writer.write_record(HEADER).context("writing header")?;
    for row in PLACES {
        writer.write_record(row).context("writing row")?;
    }
    writer.flush().context("flushing")?;

    println!("Wrote {} places to {out}", PLACES.len());
    Ok(())
}
