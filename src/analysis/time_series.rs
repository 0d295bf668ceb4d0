//! Statistics and trend classification over sensor series.
//!
//! Upstream delivers measurements newest first. Everything produced here is in
//! chronological order: index 0 is the oldest usable point and the last index is
//! the current reading.

use crate::analysis::error::AnalysisError;
use crate::types::sensor::SensorDescriptor;
use crate::types::stats::{Extreme, SeriesPoint, SeriesStats, Trend};

/// Slope threshold separating a trend from noise: tan(10°) per sample.
pub const TREND_THRESHOLD: f64 = 0.1763;

pub struct TimeSeriesAnalyzer;

impl TimeSeriesAnalyzer {
    /// Flattens the values of all `descriptors` into one chronological series,
    /// skipping points without a value.
    pub fn extract_series(descriptors: &[SensorDescriptor]) -> Vec<SeriesPoint> {
        let mut points: Vec<SeriesPoint> = descriptors
            .iter()
            .flat_map(|d| d.values.iter())
            .filter_map(|p| {
                p.value.map(|value| SeriesPoint {
                    date: p.date.clone(),
                    value,
                })
            })
            .collect();
        points.reverse();
        points
    }

    /// Computes min, max, average, current value and trend of the combined series.
    pub fn analyze(descriptors: &[SensorDescriptor]) -> Result<SeriesStats, AnalysisError> {
        let points = Self::extract_series(descriptors);
        let Some(current) = points.last().cloned() else {
            return Err(AnalysisError::NoData);
        };

        let mut min_index = 0;
        let mut max_index = 0;
        for (i, point) in points.iter().enumerate() {
            // Strict comparisons keep the left-most extreme.
            if point.value < points[min_index].value {
                min_index = i;
            }
            if point.value > points[max_index].value {
                max_index = i;
            }
        }
        let extreme = |index: usize| Extreme {
            index,
            date: points[index].date.clone(),
            value: points[index].value,
        };
        let min = extreme(min_index);
        let max = extreme(max_index);

        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        let average = values.iter().sum::<f64>() / values.len() as f64;
        let slope = linear_slope(&values);

        Ok(SeriesStats {
            min,
            max,
            average,
            current,
            slope,
            trend: classify_trend(&values),
            points,
        })
    }
}

/// Least-squares slope of `values` against their indices `0..n`.
///
/// `None` for fewer than two values or a zero denominator.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }
    Some((n * sum_xy - sum_x * sum_y) / denominator)
}

pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::NotEnoughData;
    }
    match linear_slope(values) {
        None => Trend::UndefinedTrend,
        Some(slope) => classify_slope(slope),
    }
}

pub fn classify_slope(slope: f64) -> Trend {
    if slope > TREND_THRESHOLD {
        Trend::Rising
    } else if slope < -TREND_THRESHOLD {
        Trend::Falling
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::sensor::MeasurementPoint;

    /// Builds a descriptor whose values are given oldest first, stored newest first
    /// like the upstream API delivers them.
    fn sensor(chronological: &[f64]) -> SensorDescriptor {
        let values = chronological
            .iter()
            .enumerate()
            .rev()
            .map(|(i, v)| MeasurementPoint::new(format!("2024-01-{:02}", i + 1), Some(*v)))
            .collect();
        SensorDescriptor::with_values(1, values)
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(classify_trend(&[1.0, 2.0, 3.0, 4.0, 5.0]), Trend::Rising);
        assert_eq!(classify_trend(&[5.0, 4.0, 3.0, 2.0, 1.0]), Trend::Falling);
        assert_eq!(classify_trend(&[3.0, 3.0, 3.0, 3.0, 3.0]), Trend::Stable);
        assert_eq!(classify_trend(&[3.0]), Trend::NotEnoughData);
        assert_eq!(classify_trend(&[]), Trend::NotEnoughData);
    }

    #[test]
    fn test_slope_values() {
        assert_eq!(linear_slope(&[1.0, 2.0, 3.0, 4.0, 5.0]), Some(1.0));
        assert_eq!(linear_slope(&[5.0, 4.0, 3.0, 2.0, 1.0]), Some(-1.0));
        assert_eq!(linear_slope(&[3.0, 3.0, 3.0]), Some(0.0));
        assert_eq!(linear_slope(&[7.0]), None);
    }

    #[test]
    fn test_slope_threshold_is_exclusive() {
        assert_eq!(classify_slope(TREND_THRESHOLD), Trend::Stable);
        assert_eq!(classify_slope(-TREND_THRESHOLD), Trend::Stable);
        assert_eq!(classify_slope(0.1764), Trend::Rising);
        assert_eq!(classify_slope(-0.1764), Trend::Falling);
        // 0.15 per sample is a gentle rise that still counts as stable
        assert_eq!(classify_trend(&[1.0, 1.15, 1.3, 1.45]), Trend::Stable);
    }

    #[test]
    fn test_analyze_reverses_to_chronological_order() -> Result<(), AnalysisError> {
        let stats = TimeSeriesAnalyzer::analyze(&[sensor(&[1.0, 2.0, 3.0, 4.0, 5.0])])?;
        assert_eq!(stats.points.first().unwrap().date, "2024-01-01");
        assert_eq!(stats.current.date, "2024-01-05");
        assert_eq!(stats.current.value, 5.0);
        assert_eq!(stats.trend, Trend::Rising);
        assert_eq!(stats.slope, Some(1.0));
        assert_eq!(stats.average, 3.0);
        Ok(())
    }

    #[test]
    fn test_min_max_tie_break_is_left_most() -> Result<(), AnalysisError> {
        let stats = TimeSeriesAnalyzer::analyze(&[sensor(&[2.0, 5.0, 5.0, 1.0])])?;
        assert_eq!(stats.max.index, 1);
        assert_eq!(stats.max.value, 5.0);
        assert_eq!(stats.max.date, "2024-01-02");
        assert_eq!(stats.min.index, 3);
        assert_eq!(stats.min.value, 1.0);
        assert_eq!(stats.min.date, "2024-01-04");
        assert_eq!(stats.average, 3.25);
        Ok(())
    }

    #[test]
    fn test_absent_values_are_skipped() -> Result<(), AnalysisError> {
        let descriptor = SensorDescriptor::with_values(
            1,
            vec![
                MeasurementPoint::new("2024-01-03", None),
                MeasurementPoint::new("2024-01-02", Some(4.0)),
                MeasurementPoint::new("2024-01-01", None),
            ],
        );
        let stats = TimeSeriesAnalyzer::analyze(&[descriptor])?;
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.current.date, "2024-01-02");
        assert_eq!(stats.trend, Trend::NotEnoughData);
        assert_eq!(stats.slope, None);
        assert_eq!(stats.min, stats.max.clone());
        Ok(())
    }

    #[test]
    fn test_no_data() {
        let empty =
            SensorDescriptor::with_values(1, vec![MeasurementPoint::new("2024-01-01", None)]);
        assert_eq!(TimeSeriesAnalyzer::analyze(&[empty]), Err(AnalysisError::NoData));
        assert_eq!(TimeSeriesAnalyzer::analyze(&[]), Err(AnalysisError::NoData));
    }

    #[test]
    fn test_multiple_descriptors_are_flattened_then_reversed() {
        let a = SensorDescriptor::with_values(
            1,
            vec![
                MeasurementPoint::new("a2", Some(2.0)),
                MeasurementPoint::new("a1", Some(1.0)),
            ],
        );
        let b = SensorDescriptor::with_values(2, vec![MeasurementPoint::new("b1", Some(9.0))]);
        let series = TimeSeriesAnalyzer::extract_series(&[a, b]);
        let dates: Vec<&str> = series.iter().map(|p| p.date.as_str()).collect();
        assert_eq!(dates, vec!["b1", "a1", "a2"]);
    }
}
