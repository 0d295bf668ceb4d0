//! Result types of the time-series analysis: the [`Trend`] classification and the
//! [`SeriesStats`] summary handed to whatever renders a sensor's chart.

use std::fmt;

/// Coarse direction of a series, classified from its least-squares slope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trend {
    /// Slope above the threshold.
    Rising,
    /// Slope below the negated threshold.
    Falling,
    /// Slope within the threshold band (inclusive).
    Stable,
    /// Fewer than two points.
    NotEnoughData,
    /// The regression denominator was zero.
    UndefinedTrend,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Trend::Rising => "Rising",
            Trend::Falling => "Falling",
            Trend::Stable => "Stable",
            Trend::NotEnoughData => "Not enough data",
            Trend::UndefinedTrend => "Undefined trend",
        };
        f.write_str(label)
    }
}

/// A usable (date, value) pair of a series, in chronological order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub date: String,
    pub value: f64,
}

/// The point where a series reaches its minimum or maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Extreme {
    /// Position in [`SeriesStats::points`].
    pub index: usize,
    pub date: String,
    pub value: f64,
}

/// Summary statistics of a chronological series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    /// All usable points, oldest first.
    pub points: Vec<SeriesPoint>,
    pub min: Extreme,
    pub max: Extreme,
    pub average: f64,
    /// The most recent point.
    pub current: SeriesPoint,
    /// Least-squares slope per sample; `None` when it could not be computed.
    pub slope: Option<f64>,
    pub trend: Trend,
}

impl SeriesStats {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Values in chronological order, for plotting.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_labels() {
        assert_eq!(Trend::Rising.to_string(), "Rising");
        assert_eq!(Trend::NotEnoughData.to_string(), "Not enough data");
        assert_eq!(format!("Trend: {}", Trend::UndefinedTrend), "Trend: Undefined trend");
    }
}
