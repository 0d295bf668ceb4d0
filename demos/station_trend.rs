//! demos/station_trend.rs
//!
//! Finds the station closest to a coordinate, lists its sensors and prints the
//! statistics of each sensor's latest series.
//!
//! To run this example:
//! cargo run --example station_trend -- 50.0614 19.9366

use air_monitor::{AirMonitor, AirMonitorError, LatLon};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<f64> = env::args()
        .skip(1)
        .filter_map(|a| a.parse().ok())
        .collect();
    let location = match args.as_slice() {
        [lat, lon] => LatLon(*lat, *lon),
        _ => LatLon(50.0614, 19.9366), // Kraków main square
    };

    let monitor = AirMonitor::new()?;
    println!("Catalog holds {} stations", monitor.catalog().len());

    let (station, km) = monitor.nearest_station(location)?;
    println!(
        "Nearest station: {} ({}, {}) {:.1} km away",
        station.id, station.city_name, station.province_name, km
    );

    for sensor in monitor.station_sensors(station.id)? {
        let name = sensor
            .param_name()
            .unwrap_or("unknown parameter")
            .to_string();
        match monitor
            .sensor_stats()
            .station_id(station.id)
            .sensor_id(sensor.sensor_id)
            .call()
        {
            Ok(stats) => println!(
                "  {name}: current {:.2}, min {:.2} ({}), max {:.2} ({}), avg {:.2}, trend {}",
                stats.current.value,
                stats.min.value,
                stats.min.date,
                stats.max.value,
                stats.max.date,
                stats.average,
                stats.trend
            ),
            Err(AirMonitorError::Analysis(e)) => println!("  {name}: {e}"),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}
