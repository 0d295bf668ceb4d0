use air_monitor::{
    CatalogBuilder, LatLon, MeasurementPoint, SensorDescriptor, StationLocator, TimeSeriesAnalyzer,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;

fn synthetic_sensor(len: usize) -> SensorDescriptor {
    let values = (0..len)
        .rev()
        .map(|i| {
            let value = if i % 7 == 0 {
                None
            } else {
                Some((i as f64).sin() * 40.0 + 50.0)
            };
            MeasurementPoint::new(format!("2024-01-01 {:02}:00:00", i % 24), value)
        })
        .collect();
    SensorDescriptor::with_values(1, values)
}

fn bench_analysis(c: &mut Criterion) {
    let sensors = vec![synthetic_sensor(24 * 30)];
    c.bench_function("analyze_30_days_hourly", |b| {
        b.iter(|| TimeSeriesAnalyzer::analyze(black_box(&sensors)))
    });

    let records: Vec<_> = (0..300)
        .map(|i| {
            json!({"id": i, "gegrLat": format!("{}", 49.0 + (i % 50) as f64 * 0.1),
                   "gegrLon": format!("{}", 14.0 + (i / 50) as f64 * 1.5),
                   "city": {"name": format!("City {i}"), "commune": {"provinceName": "P"}}})
        })
        .collect();
    let catalog = CatalogBuilder::build(&records);
    let locator = StationLocator::default();
    c.bench_function("nearest_station_300", |b| {
        b.iter(|| locator.nearest(black_box(LatLon(52.2297, 21.0122)), &catalog))
    });
}

criterion_group!(benches, bench_analysis);
criterion_main!(benches);
