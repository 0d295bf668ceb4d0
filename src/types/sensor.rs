//! Sensor descriptors and their measurement series, in the shape used both by the
//! upstream API and by the per-station cache files.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// A single sensor attached to a station, together with the latest known series.
///
/// Descriptors fetched from the `station/sensors` endpoint carry a [`SensorParam`]
/// but no values. Descriptors created by a value merge carry values but no
/// parameter until the next descriptor refresh.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorDescriptor {
    /// The upstream sensor identifier, unique within its station.
    #[serde(rename = "id")]
    pub sensor_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub station_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<SensorParam>,
    /// Measurements in upstream order (newest first).
    #[serde(default)]
    pub values: Vec<MeasurementPoint>,
}

impl SensorDescriptor {
    /// A descriptor with the given id and series but no parameter information.
    pub fn with_values(sensor_id: i64, values: Vec<MeasurementPoint>) -> Self {
        Self {
            sensor_id,
            station_id: None,
            param: None,
            values,
        }
    }

    /// The measured parameter's name, if a descriptor refresh has supplied it.
    pub fn param_name(&self) -> Option<&str> {
        self.param.as_ref().map(|p| p.param_name.as_str())
    }
}

/// The measured parameter of a sensor (e.g. "pył zawieszony PM10").
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SensorParam {
    pub param_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_formula: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_param: Option<i64>,
}

/// One dated reading. `value` is `None` when the upstream reported no measurement.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MeasurementPoint {
    /// `YYYY-MM-DD`, optionally followed by a time of day (`2024-01-05 13:00:00`).
    pub date: String,
    #[serde(default)]
    pub value: Option<f64>,
}

impl MeasurementPoint {
    pub fn new(date: impl Into<String>, value: Option<f64>) -> Self {
        Self {
            date: date.into(),
            value,
        }
    }

    /// Parses the `YYYY-MM-DD` part of `date`.
    ///
    /// A time of day may follow after a space or `T` (`HH:MM:SS` or `HH:MM`) and is
    /// ignored. Any other trailing text makes the date unusable.
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        let (date, rest) = NaiveDate::parse_and_remainder(&self.date, DATE_FORMAT).ok()?;
        if rest.is_empty() {
            return Some(date);
        }
        let time = rest.strip_prefix(' ').or_else(|| rest.strip_prefix('T'))?;
        TIME_FORMATS
            .iter()
            .any(|format| NaiveTime::parse_from_str(time, format).is_ok())
            .then_some(date)
    }
}

/// Payload of the `data/getData/{sensorId}` endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SensorReadings {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub values: Vec<MeasurementPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date_of(date: &str) -> Option<NaiveDate> {
        MeasurementPoint::new(date, Some(1.0)).calendar_date()
    }

    #[test]
    fn test_calendar_date_accepts_time_suffix() {
        let point = MeasurementPoint::new("2024-01-05 13:00:00", Some(12.5));
        assert_eq!(point.calendar_date(), NaiveDate::from_ymd_opt(2024, 1, 5));

        let point = MeasurementPoint::new("2024-01-05", None);
        assert_eq!(point.calendar_date(), NaiveDate::from_ymd_opt(2024, 1, 5));

        let point = MeasurementPoint::new("2024-01-05T07:30", None);
        assert_eq!(point.calendar_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_calendar_date_rejects_garbage() {
        assert_eq!(date_of("yesterday"), None);
        assert_eq!(date_of("2024-13-01"), None);
        assert_eq!(date_of(""), None);
        assert_eq!(date_of("2024-01-05garbage"), None);
        assert_eq!(date_of("2024-01-05 noon"), None);
        assert_eq!(date_of("2024-01-05 25:00:00"), None);
    }

    #[test]
    fn test_descriptor_from_sensors_endpoint() -> Result<(), serde_json::Error> {
        let descriptors: Vec<SensorDescriptor> = serde_json::from_str(
            r#"[{"id": 92, "stationId": 14, "param": {"paramName": "pył zawieszony PM10",
                "paramFormula": "PM10", "paramCode": "PM10", "idParam": 3}}]"#,
        )?;
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].sensor_id, 92);
        assert_eq!(descriptors[0].station_id, Some(14));
        assert_eq!(descriptors[0].param_name(), Some("pył zawieszony PM10"));
        assert!(descriptors[0].values.is_empty());
        Ok(())
    }

    #[test]
    fn test_merged_descriptor_has_no_param_block() -> Result<(), serde_json::Error> {
        let descriptor =
            SensorDescriptor::with_values(7, vec![MeasurementPoint::new("2024-01-01", None)]);
        let value = serde_json::to_value(&descriptor)?;
        assert!(value.get("param").is_none());
        assert!(value["values"][0]["value"].is_null());
        assert_eq!(descriptor.param_name(), None);
        Ok(())
    }
}
