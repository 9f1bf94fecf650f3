//! Performance benchmarks for logistics_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use logistics_core::generators::ArrivalGenerator;
use logistics_core::matching::{AllocationPolicy, CapacityFill, SingleMatch, TransitQueues};
use logistics_core::runner::ModelRunner;
use logistics_core::scenario::ArrivalGeneratorParams;
use logistics_core::test_helpers::{test_container, test_transport};

fn seeded_queues(containers: u32, transports: u32) -> TransitQueues {
    let mut rng = StdRng::seed_from_u64(42);
    let mut queues = TransitQueues::new();
    for id in 0..containers {
        queues.push_container(test_container(id, rng.gen_range(0.0..1_000.0)));
    }
    for id in 0..transports {
        queues.push_transport(test_transport(id, rng.gen_range(1..20), 100.0));
    }
    queues
}

fn bench_transit_allocation(c: &mut Criterion) {
    let scenarios = vec![("small", 100, 10), ("medium", 1_000, 60), ("large", 5_000, 300)];

    let mut group = c.benchmark_group("transit_allocation");
    for (name, containers, transports) in scenarios {
        let queues = seeded_queues(containers, transports);
        group.bench_with_input(
            BenchmarkId::new("capacity_fill", name),
            &queues,
            |b, queues| {
                b.iter(|| {
                    let mut queues = queues.clone();
                    black_box(CapacityFill.allocate(&mut queues, 0.0));
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("single_match", name),
            &queues,
            |b, queues| {
                b.iter(|| {
                    let mut queues = queues.clone();
                    black_box(SingleMatch.allocate(&mut queues, 0.0));
                });
            },
        );
    }
    group.finish();
}

fn bench_arrival_generator(c: &mut Criterion) {
    let params = ArrivalGeneratorParams::default()
        .with_names(["Le Havre", "Paris", "Lyon", "Marseille"])
        .with_size(5, 20)
        .with_seed(42);

    c.bench_function("arrival_generator_1000_time_units", |b| {
        b.iter(|| {
            let generator = ArrivalGenerator::new(params.clone()).expect("valid parameters");
            let mut runner = ModelRunner::new(generator);
            runner.initialize(0.0);
            black_box(runner.run_until(1_000.0, 100_000));
        });
    });
}

criterion_group!(benches, bench_transit_allocation, bench_arrival_generator);
criterion_main!(benches);
