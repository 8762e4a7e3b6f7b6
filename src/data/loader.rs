use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::encoder::{EncoderError, EncoderRegistry};
use super::model::{
    FieldValue, PlaceDataset, PlaceRecord, COL_BEST_TIME, COL_CITY, COL_ENTRANCE_FEE, COL_NAME,
    COL_RATING, COL_SIGNIFICANCE, COL_STATE, COL_TYPE, COL_VISIT_HOURS, COL_ZONE, DROPPED_COLUMNS,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    /// The dataset file is absent. Fatal: startup must not proceed.
    #[error("dataset file not found: {}", .0.display())]
    DatasetNotFound(PathBuf),

    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    /// A previously persisted encoder does not cover a value present in the
    /// current dataset.
    #[error(transparent)]
    Encoder(#[from] EncoderError),

    #[error(transparent)]
    Parse(#[from] anyhow::Error),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the destination dataset from a file, dispatching by extension.
///
/// Drops the fixed list of irrelevant columns, fits (or reuses) one label
/// encoder per categorical column, and encodes every row. Row order in the
/// returned dataset matches the source file.
///
/// Supported formats:
/// * `.csv`  – header row with column names (the original dataset format)
/// * `.json` – records-oriented array, `df.to_json(orient='records')` style
pub fn load_file(path: &Path, registry: &mut EncoderRegistry) -> Result<PlaceDataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::DatasetNotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(path)?,
        "json" => read_json(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    encode_rows(rows, registry)
}

// ---------------------------------------------------------------------------
// Raw rows – parsed but not yet encoded
// ---------------------------------------------------------------------------

struct RawRow {
    zone: String,
    state: String,
    city: String,
    name: String,
    place_type: String,
    significance: String,
    best_time: String,
    visit_hours: FieldValue,
    rating: FieldValue,
    entrance_fee: FieldValue,
}

/// Fit or reuse encoders over the raw values, then encode every row.
fn encode_rows(
    rows: Vec<RawRow>,
    registry: &mut EncoderRegistry,
) -> Result<PlaceDataset, LoadError> {
    registry.fit_or_load(COL_ZONE, rows.iter().map(|r| r.zone.as_str()));
    registry.fit_or_load(COL_STATE, rows.iter().map(|r| r.state.as_str()));
    registry.fit_or_load(COL_CITY, rows.iter().map(|r| r.city.as_str()));
    registry.fit_or_load(COL_NAME, rows.iter().map(|r| r.name.as_str()));
    registry.fit_or_load(COL_TYPE, rows.iter().map(|r| r.place_type.as_str()));
    registry.fit_or_load(COL_SIGNIFICANCE, rows.iter().map(|r| r.significance.as_str()));
    registry.fit_or_load(COL_BEST_TIME, rows.iter().map(|r| r.best_time.as_str()));

    let mut records = Vec::with_capacity(rows.len());
    for row in rows {
        records.push(PlaceRecord {
            zone: registry.encode(COL_ZONE, &row.zone)?,
            state: registry.encode(COL_STATE, &row.state)?,
            city: registry.encode(COL_CITY, &row.city)?,
            name: registry.encode(COL_NAME, &row.name)?,
            place_type: registry.encode(COL_TYPE, &row.place_type)?,
            significance: registry.encode(COL_SIGNIFICANCE, &row.significance)?,
            best_time: registry.encode(COL_BEST_TIME, &row.best_time)?,
            visit_hours: row.visit_hours,
            rating: row.rating,
            entrance_fee: row.entrance_fee,
        });
    }

    Ok(PlaceDataset { records })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let dropped = headers
        .iter()
        .filter(|h| DROPPED_COLUMNS.contains(&h.as_str()))
        .count();
    log::debug!("CSV has {} columns, dropping {dropped}", headers.len());

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };

    // Categorical columns are required; extras degrade to Null when absent.
    let zone_idx = col(COL_ZONE)?;
    let state_idx = col(COL_STATE)?;
    let city_idx = col(COL_CITY)?;
    let name_idx = col(COL_NAME)?;
    let type_idx = col(COL_TYPE)?;
    let significance_idx = col(COL_SIGNIFICANCE)?;
    let best_time_idx = col(COL_BEST_TIME)?;
    let visit_hours_idx = headers.iter().position(|h| h == COL_VISIT_HOURS);
    let rating_idx = headers.iter().position(|h| h == COL_RATING);
    let fee_idx = headers.iter().position(|h| h == COL_ENTRANCE_FEE);

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let cell = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        let extra = |idx: Option<usize>| {
            idx.map(|i| FieldValue::parse(record.get(i).unwrap_or("")))
                .unwrap_or(FieldValue::Null)
        };

        rows.push(RawRow {
            zone: cell(zone_idx),
            state: cell(state_idx),
            city: cell(city_idx),
            name: cell(name_idx),
            place_type: cell(type_idx),
            significance: cell(significance_idx),
            best_time: cell(best_time_idx),
            visit_hours: extra(visit_hours_idx),
            rating: extra(rating_idx),
            entrance_fee: extra(fee_idx),
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("row {i} is not a JSON object"))?;

        let text_field = |name: &str| -> Result<String> {
            obj.get(name)
                .and_then(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .with_context(|| format!("row {i}: missing or non-string '{name}'"))
        };
        let extra_field = |name: &str| obj.get(name).map(json_to_field).unwrap_or(FieldValue::Null);

        rows.push(RawRow {
            zone: text_field(COL_ZONE)?,
            state: text_field(COL_STATE)?,
            city: text_field(COL_CITY)?,
            name: text_field(COL_NAME)?,
            place_type: text_field(COL_TYPE)?,
            significance: text_field(COL_SIGNIFICANCE)?,
            best_time: text_field(COL_BEST_TIME)?,
            visit_hours: extra_field(COL_VISIT_HOURS),
            rating: extra_field(COL_RATING),
            entrance_fee: extra_field(COL_ENTRANCE_FEE),
        });
    }

    Ok(rows)
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::parse(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
Unnamed: 0,Zone,State,City,Name,Type,Establishment Year,time needed to visit in hrs,Google review rating,Entrance Fee in INR,Airport with 50km Radius,Weekly Off,Significance,DSLR Allowed,Number of google review in lakhs,Best Time to visit
0,Northern,Delhi,Delhi,Red Fort,Historical,1639,2.0,4.5,35,Yes,No,Historical,Yes,2.9,Evening
1,Northern,Delhi,Delhi,India Gate,War Memorial,1921,1.0,4.6,0,Yes,No,Historical,Yes,2.6,Evening
2,Southern,Tamil Nadu,Chennai,Marina Beach,Beach,,2.0,4.3,0,Yes,No,Nature,Yes,1.8,Evening
";

    fn write_temp(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_is_fatal() {
        let mut registry = EncoderRegistry::default();
        let err = load_file(Path::new("does-not-exist.csv"), &mut registry).unwrap_err();
        assert!(matches!(err, LoadError::DatasetNotFound(_)));
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let (_dir, path) = write_temp("places.parquet", "not really parquet");
        let mut registry = EncoderRegistry::default();
        let err = load_file(&path, &mut registry).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "parquet"));
    }

    #[test]
    fn csv_loads_in_source_order_and_fits_encoders() {
        let (_dir, path) = write_temp("places.csv", SAMPLE_CSV);
        let mut registry = EncoderRegistry::default();
        let dataset = load_file(&path, &mut registry).unwrap();

        assert_eq!(dataset.len(), 3);
        assert!(registry.is_dirty());

        // First-seen order per column.
        assert_eq!(registry.valid_values(COL_ZONE), ["Northern", "Southern"]);
        assert_eq!(
            registry.valid_values(COL_NAME),
            ["Red Fort", "India Gate", "Marina Beach"]
        );

        // Row order matches the file; codes decode back to the raw values.
        let first = &dataset.records[0];
        assert_eq!(registry.decode(COL_NAME, first.name).unwrap(), "Red Fort");
        assert_eq!(registry.decode(COL_ZONE, first.zone).unwrap(), "Northern");
        assert_eq!(first.rating, FieldValue::Float(4.5));
        assert_eq!(first.entrance_fee, FieldValue::Integer(35));
    }

    #[test]
    fn persisted_encoder_missing_a_value_fails_the_load() {
        let (_dir, path) = write_temp("places.csv", SAMPLE_CSV);
        let mut registry = EncoderRegistry::default();
        // Simulate a registry persisted against an older dataset without
        // the Southern zone.
        registry.fit_or_load(COL_ZONE, ["Northern"]);

        let err = load_file(&path, &mut registry).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Encoder(EncoderError::UnknownCategory { ref value, .. }) if value == "Southern"
        ));
    }

    #[test]
    fn missing_categorical_column_is_an_error() {
        let (_dir, path) = write_temp("places.csv", "Zone,State\nNorthern,Delhi\n");
        let mut registry = EncoderRegistry::default();
        let err = load_file(&path, &mut registry).unwrap_err();
        assert!(err.to_string().contains("City"));
    }

    #[test]
    fn json_records_load_like_csv() {
        let json = r#"[
            {"Zone": "Northern", "State": "Delhi", "City": "Delhi",
             "Name": "Red Fort", "Type": "Historical", "Significance": "Historical",
             "Best Time to visit": "Evening", "Google review rating": 4.5,
             "Entrance Fee in INR": 35, "time needed to visit in hrs": 2.0}
        ]"#;
        let (_dir, path) = write_temp("places.json", json);
        let mut registry = EncoderRegistry::default();
        let dataset = load_file(&path, &mut registry).unwrap();

        assert_eq!(dataset.len(), 1);
        let rec = &dataset.records[0];
        assert_eq!(registry.decode(COL_NAME, rec.name).unwrap(), "Red Fort");
        assert_eq!(rec.rating, FieldValue::Float(4.5));
        assert_eq!(rec.entrance_fee, FieldValue::Integer(35));
    }
}
