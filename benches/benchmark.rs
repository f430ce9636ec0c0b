use std::fmt::Write;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use almanac::{default_input, Almanac, ALL_SOLUTIONS};

/// Almanac text shaped like a real puzzle input: seven stages of disjoint rules over 32-bit
/// numbers, with a pseudo-random layout so that seed ranges cross many rule boundaries.
fn generated_input(rules_per_stage: u64, seed_pairs: u64) -> String {
    let mut state: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move |bound: u64| {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state % bound
    };

    let span = u32::MAX as u64 / rules_per_stage;
    let mut input = String::from("seeds:");
    for _ in 0..seed_pairs {
        write!(input, " {} {}", next(u32::MAX as u64), next(span * 8) + 1).unwrap();
    }
    input.push('\n');

    let names = [
        "seed", "soil", "fertilizer", "water", "light", "temperature", "humidity", "location",
    ];
    for pair in names.windows(2) {
        write!(input, "\n{}-to-{} map:\n", pair[0], pair[1]).unwrap();
        for i in 0..rules_per_stage {
            let source = i * span + next(span / 4);
            let length = next(span / 2) + 1;
            let destination = next(u32::MAX as u64);
            writeln!(input, "{} {} {}", destination, source, length).unwrap();
        }
    }
    input
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for &(n, day) in ALL_SOLUTIONS {
        // puzzle inputs are not checked in
        if let Ok(input) = default_input(n) {
            c.bench_function(&format!("day{}", n), |b| b.iter(|| day(&input)));
        }
    }

    let mut group = c.benchmark_group("lowest_location");
    for rules in [8, 32, 128] {
        let input = generated_input(rules, 10);
        let almanac = Almanac::parse(&input).unwrap();

        group.bench_with_input(BenchmarkId::new("parse", rules), &input, |b, input| {
            b.iter(|| Almanac::parse(black_box(input)).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("values", rules), &almanac, |b, a| {
            b.iter(|| black_box(a).lowest_location_for_values())
        });
        group.bench_with_input(BenchmarkId::new("ranges", rules), &almanac, |b, a| {
            b.iter(|| black_box(a).lowest_location_for_ranges().unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
