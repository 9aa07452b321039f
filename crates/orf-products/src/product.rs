//! The contract interface seen by the numerical methods.
//!
//! A [`Product`] publishes its fixing and payment schedule and can be
//! evaluated in two ways: on a full simulated price path, or at a single
//! fixing given the spot level(s) at one grid node and the continuation
//! value carried back by a backward-induction method.

use nalgebra::DMatrix;
use orf_core::{errors::Result, Real, Time};

/// The time partition used by a numerical method.
///
/// `times` is strictly increasing. `events[i]` is `Some(k)` when
/// `times[i]` is the product's `k`-th fixing, `None` for a pure numerical
/// step.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimePartition {
    /// The step times.
    pub times: Vec<Time>,
    /// The fixing index at each step, if any.
    pub events: Vec<Option<usize>>,
}

impl TimePartition {
    /// Number of time steps (including both end points).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// `true` if there are no steps.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// The final time.
    pub fn maturity(&self) -> Time {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// A financial contract priced by the numerical methods.
pub trait Product: std::fmt::Debug + Send + Sync {
    /// The fixing (observation) times.
    fn fixing_times(&self) -> &[Time];

    /// The payment times.
    fn payment_times(&self) -> &[Time];

    /// Number of underlying assets the contract depends on.
    fn n_factors(&self) -> usize;

    /// Evaluate on a price path.
    ///
    /// `path` has one row per fixing time and one column per factor; the
    /// result holds one amount per payment time.
    fn eval_on_path(&self, path: &DMatrix<Real>) -> Result<Vec<Real>>;

    /// Value of the contract at fixing `idx`, given the spot level of each
    /// factor and the continuation value at that node.
    fn eval_at_step(&self, idx: usize, spots: &[Real], continuation: Real) -> Result<Real>;

    /// Build the time partition for a numerical method.
    ///
    /// Starts at `t = 0` (unless the first fixing is at 0), includes every
    /// fixing, and subdivides any interval longer than
    /// `maturity / max(n_steps, 1)` into equal pieces.
    fn time_steps(&self, n_steps: usize) -> TimePartition {
        let fixings = self.fixing_times();

        let mut knots = Vec::with_capacity(fixings.len() + 1);
        let mut idx = Vec::with_capacity(fixings.len() + 1);
        knots.push(0.0);
        idx.push(None);
        for (k, &t) in fixings.iter().enumerate() {
            knots.push(t);
            idx.push(Some(k));
        }
        if knots.len() > 1 && knots[0] == knots[1] {
            knots.remove(0);
            idx.remove(0);
        }

        let maturity = knots[knots.len() - 1];
        let max_dt = maturity / n_steps.max(1) as Real;

        let mut out = TimePartition::default();
        for i in 0..knots.len() - 1 {
            out.times.push(knots[i]);
            out.events.push(idx[i]);
            let dt = knots[i + 1] - knots[i];
            if dt - max_dt > 1.0e-8 {
                let n = (dt / max_dt) as usize;
                let sub_dt = dt / n as Real;
                for j in 1..n {
                    out.times.push(knots[i] + j as Real * sub_dt);
                    out.events.push(None);
                }
            }
        }
        out.times.push(knots[knots.len() - 1]);
        out.events.push(idx[idx.len() - 1]);
        out
    }
}

/// Check a fixing/payment schedule: fixings non-negative and strictly
/// increasing, and every fixing paid at or after it.
pub fn validate_schedule(fixings: &[Time], payments: &[Time]) -> Result<()> {
    orf_core::ensure_arg!(!fixings.is_empty(), "the product has no fixing times");
    orf_core::ensure_arg!(fixings[0] >= 0.0, "fixing times must be non-negative");
    orf_core::ensure_arg!(
        fixings.windows(2).all(|w| w[0] < w[1]),
        "fixing times must be strictly increasing"
    );
    let last_payment = payments.iter().copied().fold(Real::NEG_INFINITY, Real::max);
    for &t in fixings {
        orf_core::ensure_arg!(
            t <= last_payment,
            "fixing at t = {t} has no payment at or after it"
        );
    }
    Ok(())
}
