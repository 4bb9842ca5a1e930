// Criterion benchmarks for TWIN client

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use twin_client::core::{render_item, Suggestions};
use twin_client::models::Student;

const FIRST_NAMES: [&str; 8] = ["Paul", "Bart", "Stijn", "Reinier", "Bob", "Jorrit", "Quirijn", "Mark"];
const LAST_NAMES: [&str; 6] = ["Wagener", "Gelens", "Smulders", "van der Putten", "Aärts", "Akkermans"];

fn create_roster(size: usize) -> Vec<Student> {
    (0..size)
        .map(|i| {
            let name = format!(
                "{} {}",
                FIRST_NAMES[i % FIRST_NAMES.len()],
                LAST_NAMES[i % LAST_NAMES.len()]
            );
            Student::new(2_000_000 + i as u32, name).with_reciprocal(i % 7 == 0)
        })
        .collect()
}

fn bench_projection(c: &mut Criterion) {
    let roster = create_roster(1000);

    c.bench_function("suggestions_from_roster_1000", |b| {
        b.iter(|| Suggestions::from_roster(black_box(&roster)))
    });
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("suggestions_filter");

    for size in [100, 1000, 10000].iter() {
        let suggestions = Suggestions::from_roster(&create_roster(*size));

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| suggestions.filter(black_box("van der")))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let suggestions = Suggestions::from_roster(&create_roster(1000));

    c.bench_function("render_items_1000", |b| {
        b.iter(|| {
            suggestions
                .iter()
                .map(render_item)
                .filter(|item| item.class.is_some())
                .count()
        })
    });
}

criterion_group!(benches, bench_projection, bench_filter, bench_render);
criterion_main!(benches);
