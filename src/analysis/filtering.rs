use crate::types::sensor::SensorDescriptor;
use chrono::NaiveDate;

pub trait SensorSeriesFilterExt {
    /// Restricts every descriptor's series to a closed date range.
    ///
    /// Points without a value and points whose date does not parse are dropped.
    /// Descriptors left without points are omitted; the order of descriptors and
    /// of points within each descriptor is kept.
    ///
    /// # Arguments
    /// * `start`: The first date to keep (inclusive).
    /// * `end`: The last date to keep (inclusive).
    fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<SensorDescriptor>;

    /// Keeps the points dated within the given calendar year.
    fn filter_by_year(&self, year: i32) -> Vec<SensorDescriptor> {
        match (
            NaiveDate::from_ymd_opt(year, 1, 1),
            NaiveDate::from_ymd_opt(year, 12, 31),
        ) {
            (Some(start), Some(end)) => self.filter_by_date_range(start, end),
            _ => Vec::new(),
        }
    }
}

impl SensorSeriesFilterExt for [SensorDescriptor] {
    fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<SensorDescriptor> {
        self.iter()
            .filter_map(|descriptor| {
                let values: Vec<_> = descriptor
                    .values
                    .iter()
                    .filter(|p| p.value.is_some())
                    .filter(|p| {
                        p.calendar_date()
                            .is_some_and(|date| start <= date && date <= end)
                    })
                    .cloned()
                    .collect();
                if values.is_empty() {
                    return None;
                }
                Some(SensorDescriptor {
                    sensor_id: descriptor.sensor_id,
                    station_id: descriptor.station_id,
                    param: descriptor.param.clone(),
                    values,
                })
            })
            .collect()
    }
}

impl SensorSeriesFilterExt for Vec<SensorDescriptor> {
    fn filter_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<SensorDescriptor> {
        self.as_slice().filter_by_date_range(start, end)
    }
}
