use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, SamplingMode};
use prefix_scan::{reference, scan_with, HostDevice, ScanOptions};
use rand::{Rng, SeedableRng};
use rand_hc::Hc128Rng;

const SEED: &[u8; 32] = b"p4Tz8mQe1VbR6yWc0HnK3sLd9fJu2XaG";

/// Creates the specified number of random values.
fn create_random_sequence(len: usize, rng: &mut impl Rng) -> Vec<i32> {
    (0..len).map(|_| rng.gen_range(-100..100)).collect()
}

pub fn scan_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Scan comparison");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);

    let device = HostDevice::new();

    for len in [100_000usize, 1_000_000, 10_000_000] {
        let mut rng = Hc128Rng::from_seed(*SEED);
        let xs = create_random_sequence(len, &mut rng);

        group.bench_with_input(BenchmarkId::new("Sequential", len), &len, |b, _| {
            b.iter(|| reference::exclusive_scan(&xs))
        });

        for tb in [64usize, 256, 1024] {
            let options = ScanOptions::new().thread_block(tb);
            group.bench_with_input(
                BenchmarkId::new(format!("HostDevice tb={}", tb), len),
                &len,
                |b, _| b.iter(|| scan_with(&device, &xs, &options).unwrap()),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, scan_comparison);
criterion_main!(benches);
