//! This module provides the main entry point of the crate. [`AirMonitor`] owns the
//! fetch collaborator, the station catalog and the per-station sensor files, and
//! wires fetching, caching and analysis together for callers such as a GUI.

use crate::analysis::filtering::SensorSeriesFilterExt;
use crate::analysis::time_series::TimeSeriesAnalyzer;
use crate::api::endpoints::Endpoints;
use crate::api::fetcher::{fetch_json, Fetch, HttpFetcher};
use crate::config::AirMonitorConfig;
use crate::error::AirMonitorError;
use crate::sensors::error::SensorStoreError;
use crate::sensors::sensor_store::SensorStore;
use crate::stations::catalog::{CatalogBuilder, CatalogStore, StationCatalog};
use crate::stations::locate_station::StationLocator;
use crate::storage::error::CacheError;
use crate::types::sensor::{SensorDescriptor, SensorReadings};
use crate::types::station::{LatLon, Station};
use crate::types::stats::SeriesStats;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use bon::bon;
use chrono::NaiveDate;
use log::{info, warn};
use std::path::{Path, PathBuf};

const DEFAULT_MAX_DISTANCE_KM: f64 = 50.0;
const DEFAULT_STATION_LIMIT: usize = 5;

/// The main client for the local air quality snapshot.
///
/// Creating a client loads the station catalog: from `catalog.json` if it exists,
/// otherwise built from the cached raw dump, otherwise downloaded. Station sensor
/// files are fetched lazily the first time a station is accessed.
///
/// # Examples
///
/// ```no_run
/// # use air_monitor::{AirMonitor, AirMonitorError, LatLon};
/// # fn main() -> Result<(), AirMonitorError> {
/// let monitor = AirMonitor::new()?;
/// let (station, km) = monitor.nearest_station(LatLon(50.0614, 19.9366))?;
/// println!("{} ({}) is {:.1} km away", station.city_name, station.id, km);
/// # Ok(())
/// # }
/// ```
pub struct AirMonitor<F: Fetch = HttpFetcher> {
    cache_dir: PathBuf,
    endpoints: Endpoints,
    fetcher: F,
    catalog_store: CatalogStore,
    catalog: StationCatalog,
    locator: StationLocator,
    sensor_store: SensorStore,
}

impl AirMonitor<HttpFetcher> {
    /// Creates a client with the default configuration and cache directory.
    pub fn new() -> Result<Self, AirMonitorError> {
        Self::with_config(AirMonitorConfig::default())
    }

    /// Creates a client that talks to the API over HTTP.
    pub fn with_config(config: AirMonitorConfig) -> Result<Self, AirMonitorError> {
        let fetcher = HttpFetcher::new(config.request_timeout)?;
        Self::with_fetcher(config, fetcher)
    }

    /// Creates a client using a specific cache directory.
    pub fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, AirMonitorError> {
        Self::with_config(AirMonitorConfig::builder().cache_dir(cache_folder).build())
    }
}

#[bon]
impl<F: Fetch> AirMonitor<F> {
    /// Creates a client that obtains upstream data through `fetcher`.
    ///
    /// # Errors
    ///
    /// Fails if the cache directory cannot be resolved or created, or if no catalog
    /// is cached and downloading or building one fails.
    pub fn with_fetcher(config: AirMonitorConfig, fetcher: F) -> Result<Self, AirMonitorError> {
        let cache_dir = match config.cache_dir {
            Some(dir) => dir,
            None => get_cache_dir()?,
        };
        ensure_cache_dir_exists(&cache_dir)?;

        let mut monitor = Self {
            endpoints: Endpoints::new(&config.api_base_url),
            fetcher,
            catalog_store: CatalogStore::new(&cache_dir),
            catalog: StationCatalog::default(),
            locator: StationLocator::new(config.distance_metric),
            sensor_store: SensorStore::new(&cache_dir),
            cache_dir,
        };
        monitor.catalog = monitor.load_catalog()?;
        Ok(monitor)
    }

    fn load_catalog(&self) -> Result<StationCatalog, AirMonitorError> {
        if self.catalog_store.has_catalog() {
            match self.catalog_store.load() {
                Ok(catalog) => {
                    info!(
                        "Cache hit for station catalog at {}",
                        self.catalog_store.catalog_path().display()
                    );
                    return Ok(catalog);
                }
                Err(e @ CacheError::Parse(..)) => warn!("{}; rebuilding catalog", e),
                Err(e) => return Err(e.into()),
            }
        }

        if !self.catalog_store.has_raw_dump() {
            warn!("Station dump not cached. Downloading.");
            let bytes = self.fetcher.fetch(&self.endpoints.all_stations())?;
            return Ok(self.catalog_store.save_download(&bytes)?);
        }

        info!("Building catalog from cached raw station dump");
        let records = self.catalog_store.load_raw_dump()?;
        let catalog = CatalogBuilder::build(&records);
        self.catalog_store.save(&catalog)?;
        Ok(catalog)
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn catalog(&self) -> &StationCatalog {
        &self.catalog
    }

    pub fn sensor_store(&self) -> &SensorStore {
        &self.sensor_store
    }

    /// Downloads the station dump again and replaces the raw dump and the catalog.
    ///
    /// On any failure the cached files and the in-memory catalog stay as they were.
    pub fn refresh_catalog(&mut self) -> Result<&StationCatalog, AirMonitorError> {
        let bytes = self.fetcher.fetch(&self.endpoints.all_stations())?;
        self.catalog = self.catalog_store.save_download(&bytes)?;
        Ok(&self.catalog)
    }

    /// Stations in the given city, ignoring case, in catalog order.
    pub fn search_city(&self, city: &str) -> Vec<&Station> {
        self.catalog.search_city(city)
    }

    /// The station closest to `location` and its distance.
    ///
    /// # Errors
    ///
    /// Returns [`crate::LocateStationError::EmptyCatalog`] when no stations are known.
    pub fn nearest_station(&self, location: LatLon) -> Result<(&Station, f64), AirMonitorError> {
        Ok(self.locator.nearest(location, &self.catalog)?)
    }

    /// Finds stations near a location, closest first.
    ///
    /// Optional parameters:
    /// *   `.max_distance_km(f64)`: search radius (default: 50 km).
    /// *   `.station_limit(usize)`: maximum number of stations returned (default: 5).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use air_monitor::{AirMonitor, AirMonitorError, LatLon};
    /// # fn main() -> Result<(), AirMonitorError> {
    /// let monitor = AirMonitor::new()?;
    /// let nearby = monitor
    ///     .find_stations()
    ///     .location(LatLon(52.2297, 21.0122))
    ///     .max_distance_km(20.0)
    ///     .call();
    /// for (station, km) in nearby {
    ///     println!("{} {:.1} km", station.id, km);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn find_stations(
        &self,
        location: LatLon,
        max_distance_km: Option<f64>,
        station_limit: Option<usize>,
    ) -> Vec<(Station, f64)> {
        self.locator
            .query(
                location,
                &self.catalog,
                station_limit.unwrap_or(DEFAULT_STATION_LIMIT),
                max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM),
            )
            .into_iter()
            .map(|(station, distance)| (station.clone(), distance))
            .collect()
    }

    /// The sensors of a station, fetching the sensor list first if the station has
    /// no cache file yet.
    pub fn station_sensors(
        &self,
        station_id: i64,
    ) -> Result<Vec<SensorDescriptor>, AirMonitorError> {
        match self.sensor_store.load(station_id) {
            Err(e) if e.is_not_found() => {
                info!("Cache miss for sensors of station {}", station_id);
                self.refresh_station_sensors(station_id)
            }
            other => Ok(other?),
        }
    }

    /// Fetches the station's sensor list and replaces the stored one, keeping the
    /// values already stored for sensors that are still listed.
    pub fn refresh_station_sensors(
        &self,
        station_id: i64,
    ) -> Result<Vec<SensorDescriptor>, AirMonitorError> {
        let url = self.endpoints.station_sensors(station_id);
        let descriptors: Vec<SensorDescriptor> = fetch_json(&self.fetcher, &url)
            .map_err(|source| SensorStoreError::DescriptorFetch { station_id, source })?;
        Ok(self.sensor_store.replace_descriptors(station_id, descriptors)?)
    }

    /// Fetches the latest series of one sensor and stores it in the station's file,
    /// replacing whatever series was stored before.
    pub fn update_sensor_values(
        &self,
        station_id: i64,
        sensor_id: i64,
    ) -> Result<SensorDescriptor, AirMonitorError> {
        let url = self.endpoints.sensor_data(sensor_id);
        let readings: SensorReadings = fetch_json(&self.fetcher, &url).map_err(|source| {
            SensorStoreError::ValueFetch {
                station_id,
                sensor_id,
                source,
            }
        })?;
        self.sensor_store
            .merge_sensor_values(station_id, sensor_id, readings.values)?;
        Ok(self.sensor_store.sensor(station_id, sensor_id)?)
    }

    /// Computes statistics and trend for one sensor of a station.
    ///
    /// The station's sensor list and the sensor's series are fetched if they are
    /// not cached yet. With `start` and/or `end` set, only points within that
    /// closed range are analyzed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use air_monitor::{AirMonitor, AirMonitorError};
    /// # use chrono::NaiveDate;
    /// # fn main() -> Result<(), AirMonitorError> {
    /// let monitor = AirMonitor::new()?;
    /// let stats = monitor
    ///     .sensor_stats()
    ///     .station_id(400)
    ///     .sensor_id(2750)
    ///     .start(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    ///     .call()?;
    /// println!("min {:.2} max {:.2} trend {}", stats.min.value, stats.max.value, stats.trend);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub fn sensor_stats(
        &self,
        station_id: i64,
        sensor_id: i64,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<SeriesStats, AirMonitorError> {
        let stored = self
            .station_sensors(station_id)?
            .into_iter()
            .find(|d| d.sensor_id == sensor_id);
        let descriptor = match stored {
            Some(descriptor) if !descriptor.values.is_empty() => descriptor,
            _ => self.update_sensor_values(station_id, sensor_id)?,
        };

        let series = match (start, end) {
            (None, None) => vec![descriptor],
            (start, end) => vec![descriptor].filter_by_date_range(
                start.unwrap_or(NaiveDate::MIN),
                end.unwrap_or(NaiveDate::MAX),
            ),
        };
        Ok(TimeSeriesAnalyzer::analyze(&series)?)
    }

    /// Checks that a station id is part of the catalog.
    pub fn station(&self, station_id: i64) -> Result<&Station, AirMonitorError> {
        self.catalog
            .get(station_id)
            .ok_or(AirMonitorError::UnknownStation(station_id))
    }
}
