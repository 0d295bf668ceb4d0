use crate::api::error::FetchError;
use crate::storage::error::CacheError;
use std::num::ParseFloatError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Raw station dump is not a JSON array of station records")]
    MalformedDump(#[source] serde_json::Error),

    // Per-record failures: the builder logs and skips these
    #[error("Station record #{index} has an unexpected shape")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Station {station_id} is missing field '{field}'")]
    MissingField {
        station_id: i64,
        field: &'static str,
    },

    #[error("Station {station_id} has an invalid {field} value '{value}'")]
    InvalidCoordinate {
        station_id: i64,
        field: &'static str,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Station {station_id} has {field} {value} outside [-{limit}, {limit}]")]
    CoordinateOutOfRange {
        station_id: i64,
        field: &'static str,
        value: f64,
        limit: f64,
    },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Debug, Error)]
pub enum LocateStationError {
    #[error("The station catalog is empty")]
    EmptyCatalog,

    #[error("No station in the catalog has a comparable distance")]
    NoComparableStation,
}
