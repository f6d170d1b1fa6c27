use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use skillnet_core::{AssociationMatrix, CourseCatalog};
use skillnet_network::{MemorySink, analyze_threshold, run_thresholds};

struct Tier {
    name: &'static str,
    courses: usize,
    skills: usize,
}

const TIERS: [Tier; 3] = [
    Tier {
        name: "small",
        courses: 50,
        skills: 40,
    },
    Tier {
        name: "medium",
        courses: 300,
        skills: 200,
    },
    Tier {
        name: "large",
        courses: 1_000,
        skills: 500,
    },
];

/// Deterministic pseudo-random association scores in `[0, 1)`.
fn synthetic_matrix(tier: &Tier, seed: u64) -> AssociationMatrix {
    let mut state = seed;
    let rows: Vec<Vec<f64>> = (0..tier.courses)
        .map(|_| {
            (0..tier.skills)
                .map(|_| {
                    state = state
                        .wrapping_mul(6_364_136_223_846_793_005)
                        .wrapping_add(1_442_695_040_888_963_407);
                    (state >> 11) as f64 / (1u64 << 53) as f64
                })
                .collect()
        })
        .collect();

    let courses = (0..tier.courses).map(|i| format!("C{i:05}")).collect();
    let skills = (0..tier.skills).map(|i| format!("S{i:04}")).collect();
    AssociationMatrix::from_rows(courses, skills, &rows).expect("synthetic matrix")
}

fn bench_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("sweep.tiered");
    let catalog = CourseCatalog::new();
    let thresholds: Vec<f64> = (0..=10).map(|i| 0.5 + f64::from(i) * 0.02).collect();

    for tier in &TIERS {
        let matrix = synthetic_matrix(tier, 0x5EED_u64 + tier.courses as u64);
        group.throughput(Throughput::Elements((tier.courses * tier.skills) as u64));

        group.bench_with_input(
            BenchmarkId::new("single_threshold", tier.name),
            &matrix,
            |b, matrix| b.iter(|| black_box(analyze_threshold(matrix, &catalog, 0.6))),
        );

        group.bench_with_input(BenchmarkId::new("sequential", tier.name), &matrix, |b, matrix| {
            b.iter(|| {
                let mut sink = MemorySink::default();
                black_box(run_thresholds(matrix, &catalog, &thresholds, false, &mut sink))
            });
        });

        group.bench_with_input(BenchmarkId::new("parallel", tier.name), &matrix, |b, matrix| {
            b.iter(|| {
                let mut sink = MemorySink::default();
                black_box(run_thresholds(matrix, &catalog, &thresholds, true, &mut sink))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sweep);
criterion_main!(benches);
