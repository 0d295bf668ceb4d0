use crate::api::error::FetchError;
use crate::storage::error::CacheError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorStoreError {
    #[error("Failed to fetch the sensor list of station {station_id}")]
    DescriptorFetch {
        station_id: i64,
        #[source]
        source: FetchError,
    },

    #[error("Failed to fetch values of sensor {sensor_id} (station {station_id})")]
    ValueFetch {
        station_id: i64,
        sensor_id: i64,
        #[source]
        source: FetchError,
    },

    #[error("Sensor {sensor_id} is not stored for station {station_id}")]
    SensorNotFound { station_id: i64, sensor_id: i64 },

    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl SensorStoreError {
    /// True when the station has no cache file yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SensorStoreError::Cache(e) if e.is_not_found())
    }
}
