//! Defines the data structures representing monitoring stations: the raw records
//! delivered by the upstream `station/findAll` endpoint and the simplified
//! [`Station`] entries kept in the local catalog.

use serde::{Deserialize, Serialize};

// --- Catalog Structures ---

/// A monitoring station as stored in the local catalog.
///
/// Serialized as `id`, `cityName`, `provinceName`, `gegrLat`, `geogrLon`, the
/// field names existing `catalog.json` files were written with.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// The upstream station identifier.
    pub id: i64,
    /// Name of the city the station is located in.
    pub city_name: String,
    /// Name of the province (voivodeship) the city belongs to.
    pub province_name: String,
    /// Latitude in decimal degrees.
    #[serde(rename = "gegrLat")]
    pub lat: f64,
    /// Longitude in decimal degrees.
    #[serde(rename = "geogrLon")]
    pub lon: f64,
}

impl Station {
    pub fn location(&self) -> LatLon {
        LatLon(self.lat, self.lon)
    }
}

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use air_monitor::LatLon;
///
/// let krakow = LatLon(50.0647, 19.9450);
/// assert_eq!(krakow.0, 50.0647); // Latitude
/// assert_eq!(krakow.1, 19.9450); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

// --- Upstream Structures ---

/// One record of the upstream station dump.
///
/// Everything except `id` is optional: the dump is loosely structured and the
/// catalog builder decides which records are usable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawStation {
    pub id: i64,
    #[serde(default)]
    pub station_name: Option<String>,
    /// Latitude as delivered upstream, a decimal number encoded as a string.
    #[serde(default)]
    pub gegr_lat: Option<String>,
    /// Longitude as delivered upstream, a decimal number encoded as a string.
    #[serde(default)]
    pub gegr_lon: Option<String>,
    #[serde(default)]
    pub city: Option<RawCity>,
    #[serde(default)]
    pub address_street: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawCity {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub commune: Option<RawCommune>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RawCommune {
    #[serde(default)]
    pub commune_name: Option<String>,
    #[serde(default)]
    pub district_name: Option<String>,
    #[serde(default)]
    pub province_name: Option<String>,
}
