use criterion::{criterion_group, criterion_main, Criterion};
use seqfuse::{Fusion, Seq};

fn make_values(rows: usize) -> Vec<i64> {
    (0..rows).map(|i| ((i * 7919) % 1000) as i64).collect()
}

fn bench_group_sum(c: &mut Criterion) {
    let values = make_values(64 * 1024);

    c.bench_function("group_sum_fused", |b| {
        b.iter(|| {
            let _ = Seq::from_vec(values.clone())
                .decorate(Fusion::default())
                .group_by(|v| v % 16, |g| g.sum_by(|v| *v))
                .to_vec()
                .unwrap();
        })
    });

    c.bench_function("group_sum_materialized", |b| {
        b.iter(|| {
            let _ = Seq::from_vec(values.clone())
                .group_by(|v| v % 16, |g| g.sum_by(|v| *v))
                .to_vec()
                .unwrap();
        })
    });
}

criterion_group!(groups, bench_group_sum);
criterion_main!(groups);
