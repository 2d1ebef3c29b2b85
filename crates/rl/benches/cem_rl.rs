use criterion::{criterion_group, criterion_main, Criterion};
use rl::{CemRl, CemRlConfig, NoopCallback, PointMassEnv};

fn bench_cem_rl_generation(c: &mut Criterion) {
    c.bench_function("cem_rl_generation", |b| {
        b.iter(|| {
            let config = CemRlConfig {
                pop_size: 4,
                n_grad: 2,
                buffer_size: 10_000,
                learning_starts: 0,
                batch_size: 16,
                hidden: vec![8],
                seed: 0,
                ..CemRlConfig::default()
            };
            let env = PointMassEnv::with_horizon(10);
            let mut algo = CemRl::new(env, None, config).unwrap();
            algo.learn(80, &mut NoopCallback).unwrap();
            algo.num_timesteps()
        });
    });
}

criterion_group!(benches, bench_cem_rl_generation);
criterion_main!(benches);
