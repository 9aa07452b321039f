//! End-to-end solves of the 1-D PDE engine against closed-form prices.

use approx::assert_abs_diff_eq;
use orf_core::{Real, Time};
use orf_market::{VolTermStructure, VolatilityCurve, YieldCurve};
use orf_methods::pde::{
    BoundaryCondition, EngineState, Pde1DSolver, PdeParams, PdeResults,
};
use orf_pricers::euro_bs;
use orf_products::{AmericanCallPut, EuropeanCallPut, OptionType, Product};
use std::sync::Arc;

fn params(n_steps: usize, n_nodes: usize) -> PdeParams {
    let mut p = PdeParams::default();
    p.n_time_steps = n_steps;
    p.n_spot_nodes = vec![n_nodes];
    p.n_std_devs = vec![4.0];
    p.theta = 0.5;
    p
}

fn solve(
    product: Arc<dyn Product>,
    spot: Real,
    rate: Real,
    div: Real,
    vol: Arc<dyn VolTermStructure>,
    p: &PdeParams,
) -> PdeResults {
    let curve = Arc::new(YieldCurve::flat(rate).unwrap());
    let mut solver = Pde1DSolver::new(product, curve, spot, div, vol).unwrap();
    let res = solver.solve(p).unwrap();
    assert_eq!(solver.state(), EngineState::Solved);
    res
}

fn european(kind: OptionType, strike: Real, expiry: Time) -> Arc<dyn Product> {
    Arc::new(EuropeanCallPut::new(kind, strike, expiry).unwrap())
}

fn flat_vol(v: Real) -> Arc<dyn VolTermStructure> {
    Arc::new(VolatilityCurve::flat(v).unwrap())
}

#[test]
fn atm_call_matches_black_scholes() {
    // 50 nodes, 4 std devs, θ = ½, 100 steps, r = 5%, σ = 20%
    let res = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &params(100, 50));
    let exact = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap().price;
    assert_abs_diff_eq!(exact, 10.45, epsilon = 0.01);
    assert_abs_diff_eq!(res.price().unwrap(), exact, epsilon = 0.05);
}

#[test]
fn puts_with_dividends_match_black_scholes() {
    for &(spot, strike) in &[(100.0, 110.0), (100.0, 90.0), (80.0, 100.0)] {
        let res = solve(european(OptionType::Put, strike, 0.5), spot, 0.03, 0.02, flat_vol(0.3), &params(100, 100));
        let exact = euro_bs(OptionType::Put, spot, strike, 0.5, 0.03, 0.02, 0.3).unwrap().price;
        assert_abs_diff_eq!(res.price().unwrap(), exact, epsilon = 0.05);
    }
}

#[test]
fn refinement_converges_to_black_scholes() {
    let exact = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap().price;
    let err = |steps, nodes| {
        let res = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &params(steps, nodes));
        (res.price().unwrap() - exact).abs()
    };
    let coarse = err(25, 25);
    let fine = err(200, 200);
    assert!(fine < coarse, "fine {fine} vs coarse {coarse}");
    assert!(fine < 0.01, "fine error {fine}");
}

#[test]
fn every_theta_prices_the_call() {
    let exact = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap().price;
    for &theta in &[0.0, 0.5, 1.0] {
        let mut p = params(200, 50);
        p.theta = theta;
        let res = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);
        assert_abs_diff_eq!(res.price().unwrap(), exact, epsilon = 0.1);
    }
}

#[test]
fn linear_extrapolation_boundary_prices_the_call() {
    let mut p = params(100, 80);
    p.boundary_condition = BoundaryCondition::Curvature(0.0);
    let res = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);
    let exact = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap().price;
    assert_abs_diff_eq!(res.price().unwrap(), exact, epsilon = 0.1);
}

#[test]
fn no_rates_no_vol_keeps_the_payoff() {
    let mut p = params(20, 40);
    p.store_full_grid = true;
    let res = solve(european(OptionType::Call, 90.0, 1.0), 100.0, 0.0, 0.0, flat_vol(0.0), &p);
    assert_abs_diff_eq!(res.price().unwrap(), 10.0, epsilon = 1e-10);

    let axis = res.spot_axis(0).unwrap();
    assert!(axis[0] < 90.0 && axis[axis.len() - 1] > 100.0);
    let t0 = &res.values[0];
    for j in 1..axis.len() - 1 {
        assert_abs_diff_eq!(t0[(j, 0)], (axis[j] - 90.0).max(0.0), epsilon = 1e-10);
    }
}

#[test]
fn zero_vol_with_drift_is_the_discounted_forward_payoff() {
    let res = solve(european(OptionType::Call, 80.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.0), &params(100, 100));
    let exact = 100.0 - 80.0 * (-0.05_f64).exp();
    assert_abs_diff_eq!(res.price().unwrap(), exact, epsilon = 5e-3);
}

#[test]
fn american_put_dominates_european_at_every_node() {
    let mut p = params(100, 60);
    p.store_full_grid = true;
    let amer = solve(
        Arc::new(AmericanCallPut::new(OptionType::Put, 100.0, 1.0).unwrap()),
        100.0,
        0.05,
        0.0,
        flat_vol(0.2),
        &p,
    );
    let euro = solve(european(OptionType::Put, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);

    let (a, e) = (&amer.values[0], &euro.values[0]);
    assert_eq!(a.shape(), e.shape());
    for j in 0..a.nrows() {
        assert!(a[(j, 0)] >= e[(j, 0)] - 1e-3, "node {j}: {} < {}", a[(j, 0)], e[(j, 0)]);
    }
    // early exercise premium of the ATM put, close to the textbook 6.09
    assert!(amer.price().unwrap() > euro.price().unwrap() + 0.3);
    assert_abs_diff_eq!(amer.price().unwrap(), 6.09, epsilon = 0.08);
}

#[test]
fn american_call_without_dividends_is_european() {
    let p = params(100, 60);
    let amer = solve(
        Arc::new(AmericanCallPut::new(OptionType::Call, 100.0, 1.0).unwrap()),
        100.0,
        0.05,
        0.0,
        flat_vol(0.2),
        &p,
    );
    let euro = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);
    assert_abs_diff_eq!(amer.price().unwrap(), euro.price().unwrap(), epsilon = 0.05);
}

#[test]
fn full_grid_accessors() {
    let mut p = params(10, 30);
    p.store_full_grid = true;
    let res = solve(european(OptionType::Put, 100.0, 2.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);
    let (times, axis, m) = res.layer_values(0).unwrap();
    assert_eq!(times.len(), 11);
    assert_eq!(times[0], 0.0);
    assert_abs_diff_eq!(times[10], 2.0);
    assert_eq!(axis.len(), 32);
    assert!(axis.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(m.shape(), (11, 32));
    // the spot is a node: the t = 0 row there is the price
    let k = axis.iter().position(|&s| (s - 100.0).abs() < 1e-9).unwrap();
    assert_abs_diff_eq!(m[(0, k)], res.price().unwrap(), epsilon = 1e-12);
}

#[test]
fn toml_configured_solve() {
    let p = PdeParams::from_toml_str(
        r#"
        numberOfTimeSteps = 100
        numberOfSpotNodes = [50]
        numberOfStandardDeviations = [4.0]
        theta = 0.5
        "#,
    )
    .unwrap();
    let res = solve(european(OptionType::Call, 100.0, 1.0), 100.0, 0.05, 0.0, flat_vol(0.2), &p);
    assert_abs_diff_eq!(res.price().unwrap(), 10.45, epsilon = 0.06);
}
