use crate::stations::catalog::StationCatalog;
use crate::stations::error::LocateStationError;
use crate::types::station::{LatLon, Station};
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// How the distance between a query point and a station is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Great-circle distance in kilometres.
    #[default]
    Haversine,
    /// `(query_lat - station_lat) + (query_lon - station_lon)`, a signed
    /// coordinate-difference sum. Earlier versions of the desktop client picked
    /// the "nearest" station with it; it is not a distance in any geometric sense.
    CoordinateSum,
}

impl DistanceMetric {
    pub fn distance(&self, from: LatLon, to: LatLon) -> f64 {
        match self {
            DistanceMetric::Haversine => distance(
                HaversineLocation {
                    latitude: from.0,
                    longitude: from.1,
                },
                HaversineLocation {
                    latitude: to.0,
                    longitude: to.1,
                },
                Units::Kilometers,
            ),
            DistanceMetric::CoordinateSum => (from.0 - to.0) + (from.1 - to.1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StationLocator {
    metric: DistanceMetric,
}

// Helper struct for BinaryHeap ordering
struct StationCandidate<'a> {
    distance: OrderedFloat<f64>,
    position: usize,
    station: &'a Station,
}
// Distance first, catalog position breaks ties
impl PartialEq for StationCandidate<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for StationCandidate<'_> {}
impl PartialOrd for StationCandidate<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for StationCandidate<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then(self.position.cmp(&other.position))
    }
}

impl StationLocator {
    pub fn new(metric: DistanceMetric) -> Self {
        Self { metric }
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the station closest to `query` together with its distance.
    ///
    /// Scans the catalog once. A station replaces the current best only when it is
    /// strictly closer, so among equally distant stations the first one in catalog
    /// order wins. Stations whose distance is NaN are never picked.
    pub fn nearest<'a>(
        &self,
        query: LatLon,
        catalog: &'a StationCatalog,
    ) -> Result<(&'a Station, f64), LocateStationError> {
        let mut best: Option<(&Station, f64)> = None;
        for station in catalog {
            let dist = self.metric.distance(query, station.location());
            if dist.is_nan() {
                continue;
            }
            match best {
                Some((_, best_dist)) if dist >= best_dist => {}
                _ => best = Some((station, dist)),
            }
        }
        match best {
            Some(found) => Ok(found),
            None if catalog.is_empty() => Err(LocateStationError::EmptyCatalog),
            None => Err(LocateStationError::NoComparableStation),
        }
    }

    /// Finds up to `n_results` stations within `max_distance` of `query`,
    /// closest first. Equal distances keep catalog order.
    pub fn query<'a>(
        &self,
        query: LatLon,
        catalog: &'a StationCatalog,
        n_results: usize,
        max_distance: f64,
    ) -> Vec<(&'a Station, f64)> {
        if n_results == 0 {
            return vec![];
        }

        let mut heap: BinaryHeap<StationCandidate<'a>> = BinaryHeap::with_capacity(n_results);
        for (position, station) in catalog.iter().enumerate() {
            let dist = self.metric.distance(query, station.location());
            if dist.is_nan() || dist > max_distance {
                continue;
            }
            let candidate = StationCandidate {
                distance: OrderedFloat(dist),
                position,
                station,
            };

            if heap.len() < n_results {
                heap.push(candidate);
            } else if heap.peek().is_some_and(|worst| candidate < *worst) {
                heap.pop(); // Remove element with largest distance
                heap.push(candidate);
            }
        }

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| (c.station, c.distance.into_inner()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::catalog::fixtures::RAW_DUMP;
    use crate::stations::catalog::CatalogBuilder;
    use crate::stations::error::CatalogError;
    use serde_json::json;

    fn station(id: i64, lat: f64, lon: f64) -> serde_json::Value {
        json!({"id": id, "gegrLat": lat.to_string(), "gegrLon": lon.to_string(),
               "city": {"name": format!("City {id}"), "commune": {"provinceName": "P"}}})
    }

    #[test]
    fn test_nearest_haversine() -> Result<(), Box<dyn std::error::Error>> {
        let catalog = CatalogBuilder::build_from_slice(RAW_DUMP.as_bytes())?;
        let locator = StationLocator::default();

        // Wawel castle, Kraków
        let (found, dist) = locator.nearest(LatLon(50.0540, 19.9354), &catalog)?;
        assert_eq!(found.id, 400);
        assert!(dist < 2.0, "distance was {dist} km");

        // Palace of Culture, Warsaw
        let (found, _) = locator.nearest(LatLon(52.2318, 21.0060), &catalog)?;
        assert_eq!(found.id, 530);
        Ok(())
    }

    #[test]
    fn test_haversine_distance_warsaw_krakow() {
        let dist =
            DistanceMetric::Haversine.distance(LatLon(52.2297, 21.0122), LatLon(50.0647, 19.9450));
        assert!((dist - 252.0).abs() < 5.0, "distance was {dist} km");
    }

    #[test]
    fn test_nearest_ties_keep_catalog_order() -> Result<(), LocateStationError> {
        // Both stations are exactly one degree of longitude away on the equator.
        let catalog = CatalogBuilder::build(&[station(1, 0.0, 1.0), station(2, 0.0, -1.0)]);
        let locator = StationLocator::default();
        let (found, _) = locator.nearest(LatLon(0.0, 0.0), &catalog)?;
        assert_eq!(found.id, 1);

        let reversed = CatalogBuilder::build(&[station(2, 0.0, -1.0), station(1, 0.0, 1.0)]);
        let (found, _) = locator.nearest(LatLon(0.0, 0.0), &reversed)?;
        assert_eq!(found.id, 2);
        Ok(())
    }

    #[test]
    fn test_nearest_empty_catalog() {
        let catalog = StationCatalog::default();
        let result = StationLocator::default().nearest(LatLon(50.0, 20.0), &catalog);
        assert!(matches!(result, Err(LocateStationError::EmptyCatalog)));
    }

    #[test]
    fn test_nearest_without_comparable_distance() {
        let catalog: StationCatalog = [Station {
            id: 1,
            city_name: "Nowhere".to_string(),
            province_name: "P".to_string(),
            lat: f64::NAN,
            lon: 20.0,
        }]
        .into_iter()
        .collect();
        let result = StationLocator::default().nearest(LatLon(50.0, 20.0), &catalog);
        assert!(matches!(result, Err(LocateStationError::NoComparableStation)));
    }

    #[test]
    fn test_coordinate_sum_picks_smallest_signed_sum() -> Result<(), LocateStationError> {
        let catalog = CatalogBuilder::build(&[station(1, 50.0, 20.0), station(2, 54.0, 18.0)]);
        let locator = StationLocator::new(DistanceMetric::CoordinateSum);
        // Signed sums: station 1 -> 0.0, station 2 -> -2.0; the smaller signed value wins.
        let (found, dist) = locator.nearest(LatLon(50.0, 20.0), &catalog)?;
        assert_eq!(found.id, 2);
        assert_eq!(dist, -2.0);

        let (found, _) = StationLocator::default().nearest(LatLon(50.0, 20.0), &catalog)?;
        assert_eq!(found.id, 1);
        Ok(())
    }

    #[test]
    fn test_query_sorted_limited_and_bounded() -> Result<(), CatalogError> {
        let catalog = CatalogBuilder::build_from_slice(RAW_DUMP.as_bytes())?;
        let locator = StationLocator::default();
        let wawel = LatLon(50.0540, 19.9354);

        let results = locator.query(wawel, &catalog, 5, 50.0);
        let ids: Vec<i64> = results.iter().map(|(s, _)| s.id).collect();
        assert_eq!(ids, vec![400, 402]);
        assert!(results[0].1 <= results[1].1);

        let results = locator.query(wawel, &catalog, 1, 1000.0);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0.id, 400);

        assert!(locator.query(wawel, &catalog, 0, 1000.0).is_empty());
        assert!(locator.query(LatLon(0.0, 0.0), &catalog, 5, 1.0).is_empty());
        Ok(())
    }

    #[test]
    fn test_query_ties_keep_catalog_order() {
        let catalog = CatalogBuilder::build(&[
            station(1, 0.0, 2.0),
            station(2, 0.0, 1.0),
            station(3, 0.0, -1.0),
        ]);
        let results = StationLocator::default().query(LatLon(0.0, 0.0), &catalog, 1, 500.0);
        assert_eq!(results[0].0.id, 2);

        let results = StationLocator::default().query(LatLon(0.0, 0.0), &catalog, 3, 500.0);
        let ids: Vec<i64> = results.iter().map(|(s, _)| s.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }
}
