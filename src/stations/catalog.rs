//! The simplified station catalog: how it is built from the raw upstream dump,
//! how it is searched, and where it lives on disk.

use crate::stations::error::CatalogError;
use crate::storage::error::CacheError;
use crate::storage::json_file::{read_json, write_bytes, write_json};
use crate::types::station::{RawStation, Station};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const RAW_DUMP_FILE_NAME: &str = "stations_raw.json";
const CATALOG_FILE_NAME: &str = "catalog.json";

/// All known stations, in upstream order, with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationCatalog {
    stations: Vec<Station>,
}

impl StationCatalog {
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Station> {
        self.stations.iter()
    }

    pub fn get(&self, id: i64) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    /// Stations whose city name equals `city`, ignoring case, in catalog order.
    pub fn search_city(&self, city: &str) -> Vec<&Station> {
        let needle = city.trim().to_lowercase();
        self.stations
            .iter()
            .filter(|s| s.city_name.to_lowercase() == needle)
            .collect()
    }
}

/// Collects stations in order, keeping the first of any duplicate ids.
impl FromIterator<Station> for StationCatalog {
    fn from_iter<I: IntoIterator<Item = Station>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let stations = iter.into_iter().filter(|s| seen.insert(s.id)).collect();
        StationCatalog { stations }
    }
}

impl<'a> IntoIterator for &'a StationCatalog {
    type Item = &'a Station;
    type IntoIter = std::slice::Iter<'a, Station>;

    fn into_iter(self) -> Self::IntoIter {
        self.stations.iter()
    }
}

/// Turns raw upstream station records into a [`StationCatalog`].
pub struct CatalogBuilder;

impl CatalogBuilder {
    /// Builds a catalog from the bytes of a raw dump.
    ///
    /// Fails only when the document as a whole is not a JSON array. Individual
    /// records that cannot be converted are logged and skipped.
    pub fn build_from_slice(bytes: &[u8]) -> Result<StationCatalog, CatalogError> {
        let records: Vec<Value> =
            serde_json::from_slice(bytes).map_err(CatalogError::MalformedDump)?;
        Ok(Self::build(&records))
    }

    pub fn build(records: &[Value]) -> StationCatalog {
        let mut seen = HashSet::new();
        let mut stations = Vec::with_capacity(records.len());
        let mut skipped = 0usize;

        for (index, record) in records.iter().enumerate() {
            let station = RawStation::deserialize(record)
                .map_err(|source| CatalogError::InvalidRecord { index, source })
                .and_then(|raw| Self::convert(&raw));
            match station {
                Ok(Some(station)) => {
                    if seen.insert(station.id) {
                        stations.push(station);
                    } else {
                        warn!("Skipping duplicate station id {}", station.id);
                        skipped += 1;
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping station record: {}", e);
                    skipped += 1;
                }
            }
        }

        info!(
            "Built station catalog with {} stations from {} records ({} skipped)",
            stations.len(),
            records.len(),
            skipped
        );
        StationCatalog { stations }
    }

    /// Converts one record. Records without a city are not catalog entries and yield `None`.
    fn convert(raw: &RawStation) -> Result<Option<Station>, CatalogError> {
        let Some(city) = &raw.city else {
            return Ok(None);
        };
        let province_name = city
            .commune
            .as_ref()
            .and_then(|c| c.province_name.clone())
            .ok_or(CatalogError::MissingField {
                station_id: raw.id,
                field: "city.commune.provinceName",
            })?;
        let lat = Self::parse_coordinate(raw.id, "gegrLat", raw.gegr_lat.as_deref(), 90.0)?;
        let lon = Self::parse_coordinate(raw.id, "gegrLon", raw.gegr_lon.as_deref(), 180.0)?;

        Ok(Some(Station {
            id: raw.id,
            city_name: city.name.clone(),
            province_name,
            lat,
            lon,
        }))
    }

    /// Parses a decimal degree string. `NaN`, infinities and values beyond `limit` are rejected.
    fn parse_coordinate(
        station_id: i64,
        field: &'static str,
        value: Option<&str>,
        limit: f64,
    ) -> Result<f64, CatalogError> {
        let value = value.ok_or(CatalogError::MissingField { station_id, field })?;
        let parsed = value
            .trim()
            .parse::<f64>()
            .map_err(|source| CatalogError::InvalidCoordinate {
                station_id,
                field,
                value: value.to_string(),
                source,
            })?;
        // NaN fails the range check as well
        if !(-limit..=limit).contains(&parsed) {
            return Err(CatalogError::CoordinateOutOfRange {
                station_id,
                field,
                value: parsed,
                limit,
            });
        }
        Ok(parsed)
    }
}

/// Location of the raw dump and the built catalog inside the cache directory.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    raw_dump_path: PathBuf,
    catalog_path: PathBuf,
}

impl CatalogStore {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            raw_dump_path: cache_dir.join(RAW_DUMP_FILE_NAME),
            catalog_path: cache_dir.join(CATALOG_FILE_NAME),
        }
    }

    pub fn raw_dump_path(&self) -> &Path {
        &self.raw_dump_path
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn has_raw_dump(&self) -> bool {
        self.raw_dump_path.is_file()
    }

    pub fn has_catalog(&self) -> bool {
        self.catalog_path.is_file()
    }

    /// Checks that `bytes` is a JSON array of records.
    pub fn parse_raw_dump(bytes: &[u8]) -> Result<Vec<Value>, CatalogError> {
        serde_json::from_slice(bytes).map_err(CatalogError::MalformedDump)
    }

    /// Stores a freshly downloaded dump exactly as fetched. The bytes must be a
    /// JSON array, otherwise the previous dump is kept untouched.
    pub fn save_raw_dump(&self, bytes: &[u8]) -> Result<Vec<Value>, CatalogError> {
        let records = Self::parse_raw_dump(bytes)?;
        self.write_raw_dump(bytes, records.len())?;
        Ok(records)
    }

    fn write_raw_dump(&self, bytes: &[u8], record_count: usize) -> Result<(), CacheError> {
        write_bytes(&self.raw_dump_path, bytes)?;
        info!(
            "Saved raw station dump ({} records) to {}",
            record_count,
            self.raw_dump_path.display()
        );
        Ok(())
    }

    /// Builds a catalog from a downloaded dump and persists both files.
    ///
    /// The catalog is written first and the raw dump only once that succeeded, so
    /// a failed write never leaves a raw dump newer than `catalog.json`.
    pub fn save_download(&self, bytes: &[u8]) -> Result<StationCatalog, CatalogError> {
        let records = Self::parse_raw_dump(bytes)?;
        let catalog = CatalogBuilder::build(&records);
        self.save(&catalog)?;
        self.write_raw_dump(bytes, records.len())?;
        Ok(catalog)
    }

    pub fn load_raw_dump(&self) -> Result<Vec<Value>, CacheError> {
        read_json(&self.raw_dump_path)
    }

    pub fn load(&self) -> Result<StationCatalog, CacheError> {
        read_json(&self.catalog_path)
    }

    /// Replaces the persisted catalog with `catalog`.
    pub fn save(&self, catalog: &StationCatalog) -> Result<(), CacheError> {
        write_json(&self.catalog_path, catalog)?;
        info!(
            "Saved catalog with {} stations to {}",
            catalog.len(),
            self.catalog_path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// A small dump in the shape of `station/findAll`.
    pub(crate) const RAW_DUMP: &str = r#"[
        {"id": 114, "stationName": "Wrocław - Bartnicza", "gegrLat": "51.115933", "gegrLon": "17.141125",
         "city": {"id": 1064, "name": "Wrocław",
                  "commune": {"communeName": "Wrocław", "districtName": "Wrocław", "provinceName": "DOLNOŚLĄSKIE"}},
         "addressStreet": "ul. Bartnicza"},
        {"id": 117, "stationName": "Bez miasta", "gegrLat": "50.0", "gegrLon": "20.0", "city": null},
        {"id": 400, "stationName": "Kraków - Aleja Krasińskiego", "gegrLat": "50.057678", "gegrLon": "19.926189",
         "city": {"id": 415, "name": "Kraków",
                  "commune": {"communeName": "Kraków", "districtName": "Kraków", "provinceName": "MAŁOPOLSKIE"}}},
        {"id": 401, "stationName": "Zepsuta", "gegrLat": "north", "gegrLon": "19.9",
         "city": {"id": 415, "name": "Kraków",
                  "commune": {"communeName": "Kraków", "districtName": "Kraków", "provinceName": "MAŁOPOLSKIE"}}},
        {"id": 530, "stationName": "Warszawa - Marszałkowska", "gegrLat": "52.225344", "gegrLon": "21.012529",
         "city": {"id": 1006, "name": "Warszawa",
                  "commune": {"communeName": "Warszawa", "districtName": "Warszawa", "provinceName": "MAZOWIECKIE"}}},
        {"id": 402, "stationName": "Kraków - Bujaka", "gegrLat": "50.010575", "gegrLon": "19.949189",
         "city": {"id": 415, "name": "Kraków",
                  "commune": {"communeName": "Kraków", "districtName": "Kraków", "provinceName": "MAŁOPOLSKIE"}}}
    ]"#;
}
