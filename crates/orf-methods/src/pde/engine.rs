//! Backward induction on a finite-difference grid.
//!
//! [`PdeEngine`] owns the algorithm that is the same for every
//! dimensionality: it builds the time partition and the grid axes,
//! precomputes the one-step forward factors and vols, and walks the
//! partition backwards. The pieces that depend on the number of factors
//! (value storage, the step solve, contract evaluation and result
//! extraction) are delegated to a [`PdeLayers`] implementation.

use super::coordinate_change::{CoordinateChange, NodeStep};
use super::grid::GridAxis;
use super::params::PdeParams;
use super::results::PdeResults;
use super::tridiagonal::BoundaryCondition;
use orf_core::{errors::Result, DiscountFactor, Error, Real, Time};
use orf_market::{VolTermStructure, YieldTermStructure};
use orf_products::{Product, TimePartition};
use std::sync::Arc;
use tracing::{debug, trace};

/// Smallest grid half-width around the spot, relative to `max(|x0|, 1)`.
const MIN_HALF_WIDTH: Real = 0.1;

/// Without diffusion the bounds only span spot and forward, which collapse
/// to a point when there is no drift either. Give the grid a minimum width
/// around the spot in that case.
fn widen_degenerate_bounds(x0: Real, x_min: Real, x_max: Real) -> (Real, Real) {
    let half = MIN_HALF_WIDTH * x0.abs().max(1.0);
    let width = x_max - x_min;
    if width.is_nan() || width >= half {
        return (x_min, x_max);
    }
    let widened = (x_min.min(x0 - half), x_max.max(x0 + half));
    debug!(x0, x_min, x_max, lo = widened.0, hi = widened.1, "degenerate grid bounds widened");
    widened
}

/// Where the engine is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built, not yet solved.
    Constructed,
    /// Grid axes built, value layers seeded at maturity.
    GridInitialized,
    /// Stepping backwards; the value is the time step just computed.
    Stepping(usize),
    /// Results available.
    Solved,
}

/// Market description of one diffused factor.
#[derive(Debug, Clone)]
pub struct Underlying {
    /// Current level.
    pub spot: Real,
    /// Curve whose forward rates drive the factor.
    pub accrual_curve: Arc<dyn YieldTermStructure>,
    /// Continuous dividend yield.
    pub div_yield: Real,
    /// Volatility term structure.
    pub vol: Arc<dyn VolTermStructure>,
    /// Barrier level the grid can be aligned to.
    pub barrier: Option<Real>,
    /// Transform between real and diffused coordinates.
    pub coordinate_change: Arc<dyn CoordinateChange>,
}

/// Everything a [`PdeLayers`] implementation may read during a solve.
#[derive(Debug, Clone)]
pub struct PdeState {
    /// Time partition, with the fixing index of each contract event.
    pub partition: TimePartition,
    /// One axis per factor.
    pub grid_axes: Vec<GridAxis>,
    /// Scheme weight.
    pub theta: Real,
    /// Condition folded into the edge rows of the operators.
    pub boundary_condition: BoundaryCondition,
    /// Keep every time-step snapshot.
    pub store_full_grid: bool,
}

/// Storage and per-step work of the value functions for a given number of
/// factors.
pub trait PdeLayers {
    /// Allocate the value layers for the grid in `state`.
    fn init_layers(&mut self, state: &PdeState) -> Result<()>;

    /// Advance the layers from `step + 1` back to `step` over `dt`.
    fn solve_step(&mut self, state: &PdeState, step: usize, dt: Time) -> Result<()>;

    /// Multiply every layer by the one-step discount factor.
    fn discount(&mut self, df: DiscountFactor);

    /// Apply the contract at `step` if the partition marks a fixing there,
    /// and record the step.
    fn eval_product(&mut self, state: &PdeState, product: &dyn Product, step: usize) -> Result<()>;

    /// Interpolate the t = 0 layers at `spots` and hand over the results.
    fn store_results(&mut self, state: &PdeState, spots: &[Real]) -> Result<PdeResults>;
}

/// Backward-induction driver, generic over the layer storage.
#[derive(Debug)]
pub struct PdeEngine<L: PdeLayers> {
    product: Arc<dyn Product>,
    discount_curve: Arc<dyn YieldTermStructure>,
    underlyings: Vec<Underlying>,
    layers: L,
    state: EngineState,
}

impl<L: PdeLayers> PdeEngine<L> {
    /// Create an engine for `product`, with one [`Underlying`] per factor.
    ///
    /// # Errors
    /// `InvalidArgument` if the number of underlyings differs from the
    /// product's factor count or a spot is not positive.
    pub fn new(
        product: Arc<dyn Product>,
        discount_curve: Arc<dyn YieldTermStructure>,
        underlyings: Vec<Underlying>,
        layers: L,
    ) -> Result<Self> {
        orf_core::ensure_arg!(
            underlyings.len() == product.n_factors(),
            "unequal number of underlyings ({}) and product factors ({})",
            underlyings.len(),
            product.n_factors()
        );
        for u in &underlyings {
            orf_core::ensure_arg!(u.spot > 0.0, "the spot must be positive, got {}", u.spot);
        }
        Ok(Self {
            product,
            discount_curve,
            underlyings,
            layers,
            state: EngineState::Constructed,
        })
    }

    /// Current life-cycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    pub(crate) fn underlyings_mut(&mut self) -> &mut [Underlying] {
        &mut self.underlyings
    }

    /// Price the product.
    ///
    /// # Errors
    /// Invalid parameters, a grid too small for the boundary condition,
    /// degenerate grid bounds, and any failure of the market curves or of
    /// the product are returned unchanged. Nothing is retried.
    pub fn solve(&mut self, params: &PdeParams) -> Result<PdeResults> {
        let n_factors = self.underlyings.len();
        params.validate(n_factors)?;
        self.state = EngineState::Constructed;

        let partition = self.product.time_steps(params.n_time_steps);
        let n_steps = partition.len();
        orf_core::ensure!(
            n_steps >= 2,
            "the time partition needs at least two steps, got {n_steps}"
        );
        let maturity = partition.maturity();
        debug!(n_steps, maturity, "time partition built");

        let grid_axes = self.init_grid(maturity, params)?;
        let (fwd_factors, fwd_vols) = self.forward_factors_and_vols(&partition.times)?;

        let mut state = PdeState {
            partition,
            grid_axes,
            theta: params.theta,
            boundary_condition: params.boundary_condition,
            store_full_grid: params.store_full_grid,
        };

        self.layers.init_layers(&state)?;
        self.layers.eval_product(&state, self.product.as_ref(), n_steps - 1)?;
        self.state = EngineState::GridInitialized;

        for step in (0..n_steps - 1).rev() {
            let (t1, t2) = (state.partition.times[step], state.partition.times[step + 1]);
            let dt = t2 - t1;
            self.update_grid(&mut state.grid_axes, state.theta, dt, &fwd_factors[step], &fwd_vols[step]);
            self.layers.solve_step(&state, step, dt)?;

            let df = self.discount_curve.fwd_discount(t1, t2)?;
            self.layers.discount(df);
            self.layers.eval_product(&state, self.product.as_ref(), step)?;
            trace!(step, t = t1, dt, df, "backward step");
            self.state = EngineState::Stepping(step);
        }

        let spots: Vec<Real> = self.underlyings.iter().map(|u| u.spot).collect();
        let results = self.layers.store_results(&state, &spots)?;
        debug!(prices = ?results.prices, "PDE solve finished");
        self.state = EngineState::Solved;
        Ok(results)
    }

    /// Build one aligned axis per factor, wide enough for the distribution
    /// at `maturity`.
    fn init_grid(&self, maturity: Time, params: &PdeParams) -> Result<Vec<GridAxis>> {
        let mut axes = Vec::with_capacity(self.underlyings.len());
        for (i, u) in self.underlyings.iter().enumerate() {
            let rate = u.accrual_curve.spot_rate(maturity)?;
            let forward = u.spot * ((rate - u.div_yield) * maturity).exp();
            let vol = u.vol.spot_vol(maturity)?;

            let change = &u.coordinate_change;
            let x0 = change.to_diffused(u.spot);
            let (fwd_x, vol_x) = change.forward_and_variance(forward, vol, maturity);
            let (x_min, x_max) = change.bounds(x0, fwd_x, vol_x, maturity, params.n_std_devs[i]);
            let (x_min, x_max) = widen_degenerate_bounds(x0, x_min, x_max);

            let align_to = if params.align_to_barrier {
                u.barrier.ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "grid alignment to a barrier requested but factor {i} has none"
                    ))
                })?
            } else {
                u.spot
            };
            axes.push(GridAxis::build(
                Arc::clone(change),
                params.n_spot_nodes[i],
                x_min,
                x_max,
                align_to,
            )?);
        }
        Ok(axes)
    }

    /// Per interval and factor: `exp((r(t1,t2) − q)·dt)` and the forward vol.
    #[allow(clippy::type_complexity)]
    fn forward_factors_and_vols(&self, times: &[Time]) -> Result<(Vec<Vec<Real>>, Vec<Vec<Real>>)> {
        let n_intervals = times.len() - 1;
        let mut factors = Vec::with_capacity(n_intervals);
        let mut vols = Vec::with_capacity(n_intervals);
        for w in times.windows(2) {
            let (t1, t2) = (w[0], w[1]);
            let mut f = Vec::with_capacity(self.underlyings.len());
            let mut v = Vec::with_capacity(self.underlyings.len());
            for u in &self.underlyings {
                let rate = u.accrual_curve.fwd_rate(t1, t2)?;
                f.push(((rate - u.div_yield) * (t2 - t1)).exp());
                v.push(u.vol.fwd_vol(t1, t2)?);
            }
            factors.push(f);
            vols.push(v);
        }
        Ok((factors, vols))
    }

    /// Refresh the drift, variance and vol of every interior node.
    fn update_grid(&self, axes: &mut [GridAxis], theta: Real, dt: Time, factors: &[Real], vols: &[Real]) {
        for (a, axis) in axes.iter_mut().enumerate() {
            let change = Arc::clone(axis.coordinate_change());
            let dx = axis.dx();
            for j in 1..=axis.n_nodes() {
                let real_spot = axis.real_levels()[j];
                let step = NodeStep {
                    real_spot,
                    real_forward: real_spot * factors[a],
                    theta,
                    dt,
                    ln_vol: vols[a],
                    accrual: factors[a],
                    dx,
                };
                axis.set_coefficients(j - 1, change.drift_and_variance(&step));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn collapsed_bounds_are_widened_around_the_spot() {
        let x0 = 100.0_f64.ln();
        let (lo, hi) = widen_degenerate_bounds(x0, x0, x0);
        assert_abs_diff_eq!(hi - lo, 2.0 * MIN_HALF_WIDTH * x0, epsilon = 1e-12);
        assert_abs_diff_eq!(0.5 * (lo + hi), x0, epsilon = 1e-12);

        // a forward just above the spot stays inside
        let (lo, hi) = widen_degenerate_bounds(0.0, 0.0, 0.01);
        assert_eq!((lo, hi), (-0.1, 0.1));
    }

    #[test]
    fn wide_or_invalid_bounds_are_kept() {
        assert_eq!(widen_degenerate_bounds(4.6, 3.8, 5.4), (3.8, 5.4));
        let (lo, _) = widen_degenerate_bounds(4.6, Real::NAN, 5.4);
        assert!(lo.is_nan());
    }
}
