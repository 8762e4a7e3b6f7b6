use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Internal consistency failures of the encode/decode machinery. These should
/// never surface once inputs are validated against `valid_values`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncoderError {
    #[error("unknown category {value:?} for column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("code {code} is out of range for column '{column}'")]
    InvalidCode { column: String, code: u32 },

    #[error("no encoder fitted for column '{column}'")]
    UnknownColumn { column: String },
}

// ---------------------------------------------------------------------------
// LabelEncoder – string ↔ dense integer code, per column
// ---------------------------------------------------------------------------

/// A bijection between the distinct strings observed at fit time and dense
/// `u32` codes assigned in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over raw values, keeping the first occurrence of each distinct
    /// string and assigning codes in that order.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = BTreeSet::new();
        let mut classes = Vec::new();
        for v in values {
            if seen.insert(v) {
                classes.push(v.to_string());
            }
        }
        LabelEncoder { classes }
    }

    pub fn encode(&self, value: &str) -> Option<u32> {
        // Linear scan: the dataset has a few hundred distinct values at most.
        self.classes.iter().position(|c| c == value).map(|i| i as u32)
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// All known strings, in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

// ---------------------------------------------------------------------------
// EncoderRegistry – column name → LabelEncoder, persisted as JSON
// ---------------------------------------------------------------------------

/// Owns one [`LabelEncoder`] per categorical column. Populated at startup,
/// read-only for the rest of the process lifetime.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct EncoderRegistry {
    encoders: BTreeMap<String, LabelEncoder>,
    /// Set when a fresh encoder was fitted since load; tells startup the
    /// registry needs to be written back to disk.
    #[serde(skip)]
    dirty: bool,
}

impl EncoderRegistry {
    /// Reuse the encoder already fitted for `column`, or fit a new one over
    /// `values` and mark the registry for persistence.
    pub fn fit_or_load<'a, I>(&mut self, column: &str, values: I) -> &LabelEncoder
    where
        I: IntoIterator<Item = &'a str>,
    {
        if !self.encoders.contains_key(column) {
            self.encoders
                .insert(column.to_string(), LabelEncoder::fit(values));
            self.dirty = true;
        }
        &self.encoders[column]
    }

    pub fn encode(&self, column: &str, value: &str) -> Result<u32, EncoderError> {
        let enc = self
            .encoders
            .get(column)
            .ok_or_else(|| EncoderError::UnknownColumn {
                column: column.to_string(),
            })?;
        enc.encode(value).ok_or_else(|| EncoderError::UnknownCategory {
            column: column.to_string(),
            value: value.to_string(),
        })
    }

    pub fn decode(&self, column: &str, code: u32) -> Result<&str, EncoderError> {
        let enc = self
            .encoders
            .get(column)
            .ok_or_else(|| EncoderError::UnknownColumn {
                column: column.to_string(),
            })?;
        enc.decode(code).ok_or(EncoderError::InvalidCode {
            column: column.to_string(),
            code,
        })
    }

    /// Every string the column's encoder can decode, in code order. An
    /// unknown column yields an empty slice so option lists degrade to empty.
    pub fn valid_values(&self, column: &str) -> &[String] {
        self.encoders
            .get(column)
            .map(|e| e.classes())
            .unwrap_or(&[])
    }

    /// Whether the persisted registry covers exactly the given column set.
    /// A mismatch (the source file's columns changed between runs) means the
    /// registry must be discarded and re-fitted.
    pub fn is_compatible(&self, columns: &[&str]) -> bool {
        let have: BTreeSet<&str> = self.encoders.keys().map(String::as_str).collect();
        let want: BTreeSet<&str> = columns.iter().copied().collect();
        have == want
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    // -- Persistence --

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("opening encoder registry {}", path.display()))?;
        let registry = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing encoder registry {}", path.display()))?;
        Ok(registry)
    }

    /// Serialize the registry as JSON, writing through a temp file in the
    /// target directory so a crashed writer never leaves a torn file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("creating temp file in {}", parent.display()))?;
        let mut writer = BufWriter::new(&temp);
        serde_json::to_writer_pretty(&mut writer, self)
            .context("serializing encoder registry")?;
        writer.flush().context("flushing encoder registry")?;
        drop(writer);
        temp.persist(path)
            .with_context(|| format!("persisting encoder registry to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_assigns_codes_in_first_seen_order() {
        let enc = LabelEncoder::fit(["Northern", "Southern", "Northern", "Eastern"]);
        assert_eq!(enc.classes(), ["Northern", "Southern", "Eastern"]);
        assert_eq!(enc.encode("Northern"), Some(0));
        assert_eq!(enc.encode("Southern"), Some(1));
        assert_eq!(enc.encode("Eastern"), Some(2));
    }

    #[test]
    fn encode_decode_round_trips_both_ways() {
        let enc = LabelEncoder::fit(["Historical", "Temple", "Beach"]);
        for value in ["Historical", "Temple", "Beach"] {
            let code = enc.encode(value).unwrap();
            assert_eq!(enc.decode(code), Some(value));
        }
        for code in 0..3 {
            let value = enc.decode(code).unwrap();
            assert_eq!(enc.encode(value), Some(code));
        }
    }

    #[test]
    fn unknown_value_and_code_are_errors() {
        let mut registry = EncoderRegistry::default();
        registry.fit_or_load("Zone", ["Northern"]);

        assert_eq!(
            registry.encode("Zone", "Atlantis"),
            Err(EncoderError::UnknownCategory {
                column: "Zone".to_string(),
                value: "Atlantis".to_string(),
            })
        );
        assert_eq!(
            registry.decode("Zone", 7),
            Err(EncoderError::InvalidCode {
                column: "Zone".to_string(),
                code: 7,
            })
        );
        assert_eq!(
            registry.encode("Planet", "Mars"),
            Err(EncoderError::UnknownColumn {
                column: "Planet".to_string(),
            })
        );
    }

    #[test]
    fn fit_or_load_reuses_existing_encoder() {
        let mut registry = EncoderRegistry::default();
        registry.fit_or_load("Zone", ["Northern", "Southern"]);
        assert!(registry.is_dirty());

        // Second fit with different values must not refit.
        let enc = registry.fit_or_load("Zone", ["Western"]);
        assert_eq!(enc.classes(), ["Northern", "Southern"]);
    }

    #[test]
    fn valid_values_for_unknown_column_is_empty() {
        let registry = EncoderRegistry::default();
        assert!(registry.valid_values("Zone").is_empty());
    }

    #[test]
    fn save_then_load_reproduces_option_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("encoders.json");

        let mut registry = EncoderRegistry::default();
        registry.fit_or_load("Zone", ["Southern", "Northern", "Eastern"]);
        registry.fit_or_load("Type", ["Temple", "Beach"]);
        registry.save(&path).unwrap();

        let reloaded = EncoderRegistry::load(&path).unwrap();
        assert!(!reloaded.is_dirty());
        assert_eq!(
            reloaded.valid_values("Zone"),
            ["Southern", "Northern", "Eastern"]
        );
        assert_eq!(reloaded.valid_values("Type"), ["Temple", "Beach"]);
    }

    #[test]
    fn compatibility_requires_exact_column_set() {
        let mut registry = EncoderRegistry::default();
        registry.fit_or_load("Zone", ["Northern"]);
        registry.fit_or_load("Type", ["Temple"]);

        assert!(registry.is_compatible(&["Type", "Zone"]));
        assert!(!registry.is_compatible(&["Zone"]));
        assert!(!registry.is_compatible(&["Zone", "Type", "City"]));
    }
}
