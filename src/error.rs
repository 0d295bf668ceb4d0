use crate::analysis::error::AnalysisError;
use crate::api::error::FetchError;
use crate::sensors::error::SensorStoreError;
use crate::stations::error::{CatalogError, LocateStationError};
use crate::storage::error::CacheError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AirMonitorError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    LocateStation(#[from] LocateStationError),

    #[error(transparent)]
    SensorStore(#[from] SensorStoreError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Station {0} is not in the catalog")]
    UnknownStation(i64),
}
