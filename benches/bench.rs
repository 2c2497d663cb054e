// Criterion benchmarks for HealNav

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use healnav::core::{
    distance::haversine_km,
    fallback::fallback_facilities,
    parser::parse_facilities,
    prompt::facility_prompt,
};
use healnav::models::{Coordinates, SearchFilters};

fn create_reply(count: usize) -> String {
    let records: Vec<String> = (0..count)
        .map(|i| {
            format!(
                r#"{{
  "name": "Facility {i}",
  "type": "Clinic",
  "address": "{i} Main St",
  "distance": "{i}.5 miles",
  "rating": 4.2,
  "phone": "(555) 000-0000",
  "hours": "9:00 AM - 5:00 PM",
  "services": ["Primary Care", "Vaccinations"],
  "coordinates": {{ "lat": 40.7, "lng": -74.0 }},
  "emergency": false,
  "reviews": 42
}}"#
            )
        })
        .collect();

    format!("```json\n[{}]\n```", records.join(",\n"))
}

fn create_filters() -> SearchFilters {
    SearchFilters {
        facility_type: Some("hospital".to_string()),
        max_distance_km: Some(10.0),
        emergency_only: true,
        insurance: ["Medicare".to_string(), "Aetna".to_string()].into_iter().collect(),
        min_rating: Some(4.0),
        ..Default::default()
    }
}

fn bench_haversine_distance(c: &mut Criterion) {
    let from = Coordinates::new(40.7128, -74.0060);
    let to = Coordinates::new(40.72, -74.01);

    c.bench_function("haversine_km", |b| {
        b.iter(|| haversine_km(black_box(from), black_box(to)));
    });
}

fn bench_prompt(c: &mut Criterion) {
    let filters = create_filters();

    c.bench_function("facility_prompt", |b| {
        b.iter(|| facility_prompt(black_box("40.7128,-74.0060"), black_box(&filters)));
    });
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_facilities");

    for count in [1, 5, 25].iter() {
        let reply = create_reply(*count);

        group.bench_with_input(BenchmarkId::from_parameter(count), &reply, |b, reply| {
            b.iter(|| parse_facilities(black_box(reply)));
        });
    }

    group.finish();
}

fn bench_fallback(c: &mut Criterion) {
    let filters = create_filters();

    c.bench_function("fallback_facilities", |b| {
        b.iter(|| fallback_facilities(black_box("40.7128,-74.0060"), black_box(&filters), 5));
    });
}

criterion_group!(
    benches,
    bench_haversine_distance,
    bench_prompt,
    bench_parsing,
    bench_fallback
);

criterion_main!(benches);
