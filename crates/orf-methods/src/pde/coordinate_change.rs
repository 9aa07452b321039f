//! Maps between the real underlying level and the diffused grid coordinate.
//!
//! The grid is uniform in the diffused coordinate.  A coordinate change
//! tells the engine how to place the grid (bounds around the terminal
//! distribution) and how to express the local drift and variance of the
//! real process in diffused terms at each node.

use super::tridiagonal::GhostWeights;
use orf_core::{Real, Time};

/// Inputs to [`CoordinateChange::drift_and_variance`] at one node for one
/// time step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeStep {
    /// Real level at the node.
    pub real_spot: Real,
    /// One-step forward of `real_spot`, i.e. `real_spot · accrual`.
    pub real_forward: Real,
    /// Scheme weight θ.
    pub theta: Real,
    /// Step length.
    pub dt: Time,
    /// Lognormal (Black) volatility of the real level over the step.
    pub ln_vol: Real,
    /// One-step compounding factor `exp((r − q)·dt)`.
    pub accrual: Real,
    /// Grid spacing in the diffused coordinate.
    pub dx: Real,
}

/// Local PDE coefficients at a node, in diffused coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocalCoefficients {
    /// Drift μ.
    pub drift: Real,
    /// Variance σ².
    pub variance: Real,
    /// Volatility σ.
    pub vol: Real,
}

/// A transform between real and diffused coordinates.
pub trait CoordinateChange: std::fmt::Debug + Send + Sync {
    /// Real → diffused.
    fn to_diffused(&self, real: Real) -> Real;

    /// Diffused → real.
    fn to_real(&self, diffused: Real) -> Real;

    /// Map a real-space forward and volatility to maturity `t` into the
    /// diffused space.
    fn forward_and_variance(&self, forward: Real, vol: Real, t: Time) -> (Real, Real);

    /// `(x_min, x_max)` wide enough to hold the distribution at `t` out to
    /// `n_std_devs` standard deviations.  `x0` and `forward` are already in
    /// diffused coordinates.
    fn bounds(&self, x0: Real, forward: Real, vol: Real, t: Time, n_std_devs: Real) -> (Real, Real);

    /// Local drift and variance at one node.
    fn drift_and_variance(&self, step: &NodeStep) -> LocalCoefficients;

    /// Low and high ghost weights that make the value linear in the real
    /// coordinate at the grid edges, for a diffused spacing `dx`.
    ///
    /// The default extrapolates linearly in the diffused coordinate.
    fn zero_curvature_weights(&self, _dx: Real) -> (GhostWeights, GhostWeights) {
        (GhostWeights::LINEAR, GhostWeights::LINEAR)
    }
}

/// θ-weighted correction applied to the one-step drift.
fn drift_correction(step: &NodeStep) -> Real {
    step.theta * step.accrual + 1.0 - step.theta
}

// ── Identity ──────────────────────────────────────────────────────────────────

/// Diffused = real.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdentityChange;

impl CoordinateChange for IdentityChange {
    fn to_diffused(&self, real: Real) -> Real {
        real
    }

    fn to_real(&self, diffused: Real) -> Real {
        diffused
    }

    fn forward_and_variance(&self, forward: Real, vol: Real, _t: Time) -> (Real, Real) {
        (forward, vol)
    }

    fn bounds(&self, s0: Real, forward: Real, vol: Real, t: Time, n_std_devs: Real) -> (Real, Real) {
        let mean = -0.5 * vol * vol * t;
        let width = n_std_devs * vol * t.sqrt();
        (
            s0.min(forward) * (mean - width).exp(),
            s0.max(forward) * (mean + width).exp(),
        )
    }

    fn drift_and_variance(&self, step: &NodeStep) -> LocalCoefficients {
        let vol = step.ln_vol * step.real_spot;
        let drift = (step.real_forward - step.real_spot) / drift_correction(step) / step.dt;
        let variance = vol * vol;
        LocalCoefficients {
            drift,
            variance,
            vol: variance.sqrt(),
        }
    }
}

// ── Logarithmic ───────────────────────────────────────────────────────────────

/// Diffused = ln(real).  The default for equity-like underlyings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogChange;

impl CoordinateChange for LogChange {
    fn to_diffused(&self, real: Real) -> Real {
        real.ln()
    }

    fn to_real(&self, diffused: Real) -> Real {
        diffused.exp()
    }

    fn forward_and_variance(&self, forward: Real, vol: Real, t: Time) -> (Real, Real) {
        (forward.ln() - 0.5 * vol * vol * t, vol)
    }

    fn bounds(&self, x0: Real, forward: Real, vol: Real, t: Time, n_std_devs: Real) -> (Real, Real) {
        let width = n_std_devs * vol * t.sqrt();
        (x0.min(forward) - width, x0.max(forward) + width)
    }

    /// The Jacobian and curvature of the inverse map are taken by symmetric
    /// differences over one grid spacing, so the discrete drift is
    /// consistent with the grid.
    fn drift_and_variance(&self, step: &NodeStep) -> LocalCoefficients {
        let x = self.to_diffused(step.real_spot);
        let (s_dn, s_mid, s_up) = (
            self.to_real(x - step.dx),
            self.to_real(x),
            self.to_real(x + step.dx),
        );
        let jacobian = (s_up - s_dn) / (2.0 * step.dx);
        let curvature = (s_up - 2.0 * s_mid + s_dn) / (step.dx * step.dx);

        let var = step.ln_vol * step.ln_vol;
        let drift = (step.real_forward - step.real_spot) / drift_correction(step) / step.dt / jacobian
            - 0.5 * var * curvature / jacobian;
        LocalCoefficients {
            drift,
            variance: var,
            vol: step.ln_vol,
        }
    }

    fn zero_curvature_weights(&self, dx: Real) -> (GhostWeights, GhostWeights) {
        (GhostWeights::log_lower(dx), GhostWeights::log_upper(dx))
    }
}
