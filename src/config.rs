//! Runtime configuration of the [`crate::AirMonitor`] client.

use crate::api::endpoints::DEFAULT_BASE_URL;
use crate::stations::locate_station::DistanceMetric;
use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for an [`crate::AirMonitor`] instance.
///
/// # Examples
///
/// ```
/// use air_monitor::{AirMonitorConfig, DistanceMetric};
/// use std::time::Duration;
///
/// let config = AirMonitorConfig::builder()
///     .cache_dir("/tmp/air_monitor")
///     .request_timeout(Duration::from_secs(10))
///     .distance_metric(DistanceMetric::CoordinateSum)
///     .build();
/// assert_eq!(config.api_base_url, "https://api.gios.gov.pl/pjp-api/rest");
/// ```
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct AirMonitorConfig {
    /// Where the catalog and station files are kept. Defaults to
    /// `<system cache dir>/air_monitor_cache`.
    #[builder(into)]
    pub cache_dir: Option<PathBuf>,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub api_base_url: String,
    /// Applied to every HTTP request, connect through body.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
    #[builder(default)]
    pub distance_metric: DistanceMetric,
}

impl Default for AirMonitorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
