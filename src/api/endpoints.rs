/// Base URL of the GIOŚ air quality REST API.
pub const DEFAULT_BASE_URL: &str = "https://api.gios.gov.pl/pjp-api/rest";

/// Builds the URLs of the three upstream endpoints the crate depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn all_stations(&self) -> String {
        format!("{}/station/findAll", self.base_url)
    }

    pub fn station_sensors(&self, station_id: i64) -> String {
        format!("{}/station/sensors/{}", self.base_url, station_id)
    }

    pub fn sensor_data(&self, sensor_id: i64) -> String {
        format!("{}/data/getData/{}", self.base_url, sensor_id)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
