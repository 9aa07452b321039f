use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use orf_market::{VolatilityCurve, YieldCurve};
use orf_methods::pde::{Pde1DSolver, PdeParams, TridiagonalOperator};
use orf_products::{AmericanCallPut, EuropeanCallPut, OptionType, Product};
use std::hint::black_box;
use std::sync::Arc;

fn solver(product: Arc<dyn Product>) -> Pde1DSolver {
    let curve = Arc::new(YieldCurve::flat(0.05).expect("flat curve"));
    let vol = Arc::new(VolatilityCurve::flat(0.2).expect("flat vol"));
    Pde1DSolver::new(product, curve, 100.0, 0.0, vol).expect("solver")
}

fn params(n_steps: usize, n_nodes: usize) -> PdeParams {
    let mut p = PdeParams::default();
    p.n_time_steps = n_steps;
    p.n_spot_nodes = vec![n_nodes];
    p
}

fn bench_european_grid_sizes(c: &mut Criterion) {
    let product: Arc<dyn Product> =
        Arc::new(EuropeanCallPut::new(OptionType::Call, 100.0, 1.0).expect("product"));
    let mut group = c.benchmark_group("european_call_pde");
    for &n in &[50usize, 200, 800] {
        let p = params(n, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &p, |b, p| {
            let mut s = solver(Arc::clone(&product));
            b.iter(|| black_box(s.solve(black_box(p)).expect("solve").price()))
        });
    }
    group.finish();
}

fn bench_american_put(c: &mut Criterion) {
    let product: Arc<dyn Product> =
        Arc::new(AmericanCallPut::new(OptionType::Put, 100.0, 1.0).expect("product"));
    let p = params(100, 100);
    c.bench_function("american_put_pde_100", |b| {
        let mut s = solver(Arc::clone(&product));
        b.iter(|| black_box(s.solve(black_box(&p)).expect("solve").price()))
    });
}

fn bench_banded_solve(c: &mut Criterion) {
    let n = 1000;
    let mut op = TridiagonalOperator::from_constants(n, -0.25, 1.5, -0.25);
    let rhs: Vec<f64> = (0..n + 2).map(|i| (i as f64 * 0.01).sin()).collect();
    let mut x = vec![0.0; n + 2];
    c.bench_function("tridiagonal_apply_inverse_1000", |b| {
        b.iter(|| {
            op.apply_inverse(black_box(&rhs), &mut x);
            black_box(x[n / 2])
        })
    });
}

criterion_group!(benches, bench_european_grid_sizes, bench_american_put, bench_banded_solve);
criterion_main!(benches);
