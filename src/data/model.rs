use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_ZONE: &str = "Zone";
pub const COL_STATE: &str = "State";
pub const COL_CITY: &str = "City";
pub const COL_NAME: &str = "Name";
pub const COL_TYPE: &str = "Type";
pub const COL_SIGNIFICANCE: &str = "Significance";
pub const COL_BEST_TIME: &str = "Best Time to visit";

pub const COL_VISIT_HOURS: &str = "time needed to visit in hrs";
pub const COL_RATING: &str = "Google review rating";
pub const COL_ENTRANCE_FEE: &str = "Entrance Fee in INR";

/// Columns that get a label encoder, in the order the source file lists them.
pub const CATEGORICAL_COLUMNS: [&str; 7] = [
    COL_ZONE,
    COL_STATE,
    COL_CITY,
    COL_NAME,
    COL_TYPE,
    COL_SIGNIFICANCE,
    COL_BEST_TIME,
];

/// Columns removed from the source file before any processing.
pub const DROPPED_COLUMNS: [&str; 6] = [
    "Unnamed: 0",
    "Establishment Year",
    "Airport with 50km Radius",
    "Weekly Off",
    "DSLR Allowed",
    "Number of google review in lakhs",
];

// ---------------------------------------------------------------------------
// FieldValue – a single non-categorical cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value for the columns that are carried through
/// without encoding (visit time, rating, entrance fee).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl FieldValue {
    /// Sniff the type of a raw cell: integer, then float, else text.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return FieldValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return FieldValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return FieldValue::Float(f);
        }
        FieldValue::String(s.to_string())
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Null => write!(f, "-"),
        }
    }
}

// ---------------------------------------------------------------------------
// PlaceRecord – one encoded row of the dataset
// ---------------------------------------------------------------------------

/// One destination with every categorical column replaced by its code.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub zone: u32,
    pub state: u32,
    pub city: u32,
    pub name: u32,
    pub place_type: u32,
    pub significance: u32,
    pub best_time: u32,
    pub visit_hours: FieldValue,
    pub rating: FieldValue,
    pub entrance_fee: FieldValue,
}

// ---------------------------------------------------------------------------
// PlaceDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// All records in source-file order. Built once at startup, read-only after.
#[derive(Debug, Clone, Default)]
pub struct PlaceDataset {
    pub records: Vec<PlaceRecord>,
}

impl PlaceDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DecodedPlace – a row mapped back to display strings
// ---------------------------------------------------------------------------

/// The display form of a record: every categorical code decoded back to its
/// original string, extras carried through as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedPlace {
    pub zone: String,
    pub state: String,
    pub city: String,
    pub name: String,
    #[serde(rename = "type")]
    pub place_type: String,
    pub significance: String,
    pub best_time: String,
    pub visit_hours: FieldValue,
    pub rating: FieldValue,
    pub entrance_fee: FieldValue,
}
