mod air_monitor;
mod analysis;
mod api;
mod config;
mod error;
mod sensors;
mod stations;
mod storage;
mod types;
mod utils;

pub use air_monitor::*;
pub use config::{AirMonitorConfig, DEFAULT_REQUEST_TIMEOUT};
pub use error::AirMonitorError;

pub use analysis::filtering::SensorSeriesFilterExt;
pub use analysis::time_series::{
    classify_slope, classify_trend, linear_slope, TimeSeriesAnalyzer, TREND_THRESHOLD,
};

pub use api::endpoints::{Endpoints, DEFAULT_BASE_URL};
pub use api::fetcher::{fetch_json, Fetch, HttpFetcher};

pub use sensors::sensor_store::SensorStore;
pub use stations::catalog::{CatalogBuilder, CatalogStore, StationCatalog};
pub use stations::locate_station::{DistanceMetric, StationLocator};
pub use storage::json_file::{read_json, to_pretty_json, write_json};

pub use types::sensor::*;
pub use types::station::*;
pub use types::stats::*;

pub use analysis::error::AnalysisError;
pub use api::error::FetchError;
pub use sensors::error::SensorStoreError;
pub use stations::error::{CatalogError, LocateStationError};
pub use storage::error::CacheError;
