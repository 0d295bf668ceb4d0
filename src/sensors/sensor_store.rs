//! Per-station sensor files (`sensors/<stationId>.json`).
//!
//! A file is only ever changed by [`SensorStore::replace_descriptors`] or
//! [`SensorStore::merge_sensor_values`]. Both hold the store lock across their
//! read-modify-write and replace the file atomically.

use crate::sensors::error::SensorStoreError;
use crate::storage::json_file::{read_json, write_json};
use crate::types::sensor::{MeasurementPoint, SensorDescriptor};
use log::{debug, info};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

const SENSOR_DIR_NAME: &str = "sensors";

pub struct SensorStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl SensorStore {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            dir: cache_dir.join(SENSOR_DIR_NAME),
            write_lock: Mutex::new(()),
        }
    }

    pub fn station_file_path(&self, station_id: i64) -> PathBuf {
        self.dir.join(format!("{}.json", station_id))
    }

    pub fn has_station(&self, station_id: i64) -> bool {
        self.station_file_path(station_id).is_file()
    }

    /// Loads the station's sensors. Fails with a not-found cache error if the
    /// station has never been fetched.
    pub fn load(&self, station_id: i64) -> Result<Vec<SensorDescriptor>, SensorStoreError> {
        Ok(read_json(&self.station_file_path(station_id))?)
    }

    pub fn load_or_empty(
        &self,
        station_id: i64,
    ) -> Result<Vec<SensorDescriptor>, SensorStoreError> {
        match self.load(station_id) {
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            other => other,
        }
    }

    pub fn sensor(
        &self,
        station_id: i64,
        sensor_id: i64,
    ) -> Result<SensorDescriptor, SensorStoreError> {
        self.load(station_id)?
            .into_iter()
            .find(|d| d.sensor_id == sensor_id)
            .ok_or(SensorStoreError::SensorNotFound {
                station_id,
                sensor_id,
            })
    }

    /// Replaces the station's sensor list with `descriptors`.
    ///
    /// Stored values of sensors that are still listed are kept. Sensors missing
    /// from `descriptors` are dropped, and a repeated id keeps its first entry.
    pub fn replace_descriptors(
        &self,
        station_id: i64,
        descriptors: Vec<SensorDescriptor>,
    ) -> Result<Vec<SensorDescriptor>, SensorStoreError> {
        let _guard = self.lock();

        let mut stored_values: HashMap<i64, Vec<MeasurementPoint>> = self
            .load_or_empty(station_id)?
            .into_iter()
            .map(|d| (d.sensor_id, d.values))
            .collect();

        let mut seen = HashSet::new();
        let updated: Vec<SensorDescriptor> = descriptors
            .into_iter()
            .filter(|d| seen.insert(d.sensor_id))
            .map(|mut d| {
                if let Some(values) = stored_values.remove(&d.sensor_id) {
                    d.values = values;
                }
                d
            })
            .collect();

        self.save(station_id, &updated)?;
        info!(
            "Stored {} sensor descriptors for station {} ({} no longer listed)",
            updated.len(),
            station_id,
            stored_values.len()
        );
        Ok(updated)
    }

    /// Replaces the series of one sensor with `new_values`.
    ///
    /// A sensor the station file does not know yet is appended without parameter
    /// information; the next descriptor refresh fills it in.
    pub fn merge_sensor_values(
        &self,
        station_id: i64,
        sensor_id: i64,
        new_values: Vec<MeasurementPoint>,
    ) -> Result<(), SensorStoreError> {
        let _guard = self.lock();

        let mut descriptors = self.load_or_empty(station_id)?;
        let count = new_values.len();
        match descriptors.iter_mut().find(|d| d.sensor_id == sensor_id) {
            Some(existing) => existing.values = new_values,
            None => {
                debug!(
                    "Sensor {} not yet listed for station {}, appending",
                    sensor_id, station_id
                );
                descriptors.push(SensorDescriptor::with_values(sensor_id, new_values));
            }
        }

        self.save(station_id, &descriptors)?;
        info!(
            "Stored {} values for sensor {} of station {}",
            count, sensor_id, station_id
        );
        Ok(())
    }

    fn save(
        &self,
        station_id: i64,
        descriptors: &[SensorDescriptor],
    ) -> Result<(), SensorStoreError> {
        Ok(write_json(&self.station_file_path(station_id), descriptors)?)
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
