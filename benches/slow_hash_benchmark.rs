use cnhash::slow::{HashVariant, SlowHashConfig, SlowHashContext, RANDOM_MATH_VARIANT};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::Rng;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rnd = rand::thread_rng();
    let mut blob = [0; 76];
    for i in blob.iter_mut() {
        *i = rnd.gen();
    }

    let config = SlowHashConfig {
        heavy_memory: 1 << 18,
        heavy_iterations: 1 << 14,
        cn_memory: 1 << 17,
        cn_iterations: 1 << 15,
    };
    let mut ctx = SlowHashContext::with_config(config).unwrap();

    for variant in [HashVariant::HeavyV1, HashVariant::HeavyV2, HashVariant::HeavyV3] {
        c.bench_function(&format!("{} 76 bytes", variant), |b| {
            b.iter(|| ctx.hash(black_box(&blob), variant))
        });
    }

    c.bench_function("cn_r 76 bytes", |b| {
        b.iter(|| {
            ctx.hash_with_params(black_box(&blob), HashVariant::CnR, RANDOM_MATH_VARIANT, 1_000)
        })
    });

    c.bench_function("allocate context", |b| {
        b.iter(|| SlowHashContext::with_config(config).unwrap())
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
