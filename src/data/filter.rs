use thiserror::Error;

use super::encoder::{EncoderError, EncoderRegistry};
use super::model::{
    DecodedPlace, PlaceDataset, PlaceRecord, COL_BEST_TIME, COL_CITY, COL_NAME,
    COL_SIGNIFICANCE, COL_STATE, COL_TYPE, COL_ZONE,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RecommendError {
    /// The submitted zone is not one of the known zones. Recoverable: the
    /// caller re-prompts with the valid option list.
    #[error("invalid zone input: {value}. Valid options are: {options:?}")]
    InvalidZone { value: String, options: Vec<String> },

    /// The submitted type is not one of the known place types.
    #[error("invalid type input: {value}. Valid options are: {options:?}")]
    InvalidType { value: String, options: Vec<String> },

    /// Decode failed for a stored code. Cannot happen for a dataset encoded
    /// by the same registry; treated as an internal fault if it does.
    #[error(transparent)]
    Encoder(#[from] EncoderError),
}

// ---------------------------------------------------------------------------
// RecommendEngine – validate, filter, decode
// ---------------------------------------------------------------------------

/// Owns the encoded dataset and the registry that encoded it. Read-only after
/// construction, so request handlers can share it behind an `Arc` without
/// locking.
#[derive(Debug)]
pub struct RecommendEngine {
    dataset: PlaceDataset,
    registry: EncoderRegistry,
}

impl RecommendEngine {
    pub fn new(dataset: PlaceDataset, registry: EncoderRegistry) -> Self {
        RecommendEngine { dataset, registry }
    }

    /// All selectable values for a column, in code order.
    pub fn options(&self, column: &str) -> &[String] {
        self.registry.valid_values(column)
    }

    pub fn zone_options(&self) -> &[String] {
        self.options(COL_ZONE)
    }

    pub fn type_options(&self) -> &[String] {
        self.options(COL_TYPE)
    }

    /// Return every destination whose zone AND type match the given values,
    /// decoded for display, in source-file order.
    ///
    /// Validation happens before any row is touched: an unknown zone or type
    /// short-circuits to an error carrying the valid option list. An empty
    /// result is a normal outcome, not an error.
    pub fn recommend(&self, zone: &str, place_type: &str) -> Result<Vec<DecodedPlace>, RecommendError> {
        let zone_code = match self.registry.encode(COL_ZONE, zone) {
            Ok(code) => code,
            Err(_) => {
                return Err(RecommendError::InvalidZone {
                    value: zone.to_string(),
                    options: self.zone_options().to_vec(),
                })
            }
        };
        let type_code = match self.registry.encode(COL_TYPE, place_type) {
            Ok(code) => code,
            Err(_) => {
                return Err(RecommendError::InvalidType {
                    value: place_type.to_string(),
                    options: self.type_options().to_vec(),
                })
            }
        };

        self.dataset
            .records
            .iter()
            .filter(|rec| rec.zone == zone_code && rec.place_type == type_code)
            .map(|rec| self.decode_record(rec))
            .collect()
    }

    fn decode_record(&self, rec: &PlaceRecord) -> Result<DecodedPlace, RecommendError> {
        let decode = |column: &str, code: u32| -> Result<String, RecommendError> {
            Ok(self.registry.decode(column, code)?.to_string())
        };
        Ok(DecodedPlace {
            zone: decode(COL_ZONE, rec.zone)?,
            state: decode(COL_STATE, rec.state)?,
            city: decode(COL_CITY, rec.city)?,
            name: decode(COL_NAME, rec.name)?,
            place_type: decode(COL_TYPE, rec.place_type)?,
            significance: decode(COL_SIGNIFICANCE, rec.significance)?,
            best_time: decode(COL_BEST_TIME, rec.best_time)?,
            visit_hours: rec.visit_hours.clone(),
            rating: rec.rating.clone(),
            entrance_fee: rec.entrance_fee.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_file;
    use std::io::Write;

    const SAMPLE_CSV: &str = "\
Zone,State,City,Name,Type,time needed to visit in hrs,Google review rating,Entrance Fee in INR,Significance,Best Time to visit
Northern,Delhi,Delhi,Red Fort,Historical,2.0,4.5,35,Historical,Evening
Northern,Delhi,Delhi,India Gate,War Memorial,1.0,4.6,0,Historical,Evening
Southern,Tamil Nadu,Chennai,Marina Beach,Beach,2.0,4.3,0,Nature,Evening
Northern,Uttar Pradesh,Agra,Agra Fort,Historical,2.5,4.5,650,Historical,Morning
";

    fn engine() -> RecommendEngine {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("places.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(SAMPLE_CSV.as_bytes()).unwrap();

        let mut registry = crate::data::encoder::EncoderRegistry::default();
        let dataset = load_file(&path, &mut registry).unwrap();
        RecommendEngine::new(dataset, registry)
    }

    #[test]
    fn matching_rows_come_back_decoded_in_source_order() {
        let engine = engine();
        let results = engine.recommend("Northern", "Historical").unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "Red Fort");
        assert_eq!(results[1].name, "Agra Fort");
        assert_eq!(results[0].zone, "Northern");
        assert_eq!(results[0].city, "Delhi");
        assert_eq!(results[0].best_time, "Evening");
    }

    #[test]
    fn filtering_is_conjunctive() {
        let engine = engine();
        // "Beach" exists, "Northern" exists, but no northern beach.
        let results = engine.recommend("Northern", "Beach").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn unknown_zone_short_circuits_with_options() {
        let engine = engine();
        let err = engine.recommend("Atlantis", "Historical").unwrap_err();
        match err {
            RecommendError::InvalidZone { value, options } => {
                assert_eq!(value, "Atlantis");
                assert_eq!(options, ["Northern", "Southern"]);
            }
            other => panic!("expected InvalidZone, got {other:?}"),
        }
    }

    #[test]
    fn unknown_type_short_circuits_with_options() {
        let engine = engine();
        let err = engine.recommend("Northern", "Waterpark").unwrap_err();
        match err {
            RecommendError::InvalidType { value, options } => {
                assert_eq!(value, "Waterpark");
                assert_eq!(options, ["Historical", "War Memorial", "Beach"]);
            }
            other => panic!("expected InvalidType, got {other:?}"),
        }
    }

    #[test]
    fn zone_is_validated_before_type() {
        let engine = engine();
        let err = engine.recommend("Atlantis", "Waterpark").unwrap_err();
        assert!(matches!(err, RecommendError::InvalidZone { .. }));
    }

    #[test]
    fn recommend_is_deterministic() {
        let engine = engine();
        let a = engine.recommend("Northern", "Historical").unwrap();
        let b = engine.recommend("Northern", "Historical").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn options_are_in_code_order() {
        let engine = engine();
        assert_eq!(engine.zone_options(), ["Northern", "Southern"]);
        assert_eq!(
            engine.type_options(),
            ["Historical", "War Memorial", "Beach"]
        );
    }
}
