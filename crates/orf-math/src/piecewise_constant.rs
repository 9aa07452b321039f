//! Right-continuous piecewise-constant functions.
//!
//! The market curves store their forward rates and forward variances in this
//! form: value `c[i]` applies on `[x[i], x[i+1])` and the last value applies on
//! `[x[n-1], ∞)`.  Left of the first breakpoint the function is extrapolated
//! flat with `c[0]`.

use orf_core::{errors::Result, Real};

/// A right-continuous step function with exact integrals.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewiseConstant {
    breakpoints: Vec<Real>,
    values: Vec<Real>,
    /// `cumulative[i] = ∫_{x[0]}^{x[i]} f`.
    cumulative: Vec<Real>,
}

impl PiecewiseConstant {
    /// Build from strictly increasing breakpoints and one value per piece.
    pub fn new(breakpoints: Vec<Real>, values: Vec<Real>) -> Result<Self> {
        orf_core::ensure_arg!(!breakpoints.is_empty(), "need at least one breakpoint");
        orf_core::ensure_arg!(
            breakpoints.len() == values.len(),
            "different number of breakpoints ({}) and values ({})",
            breakpoints.len(),
            values.len()
        );
        orf_core::ensure_arg!(
            breakpoints.windows(2).all(|w| w[0] < w[1]),
            "breakpoints must be strictly increasing"
        );
        let mut cumulative = Vec::with_capacity(breakpoints.len());
        cumulative.push(0.0);
        for i in 1..breakpoints.len() {
            let piece = values[i - 1] * (breakpoints[i] - breakpoints[i - 1]);
            cumulative.push(cumulative[i - 1] + piece);
        }
        Ok(Self {
            breakpoints,
            values,
            cumulative,
        })
    }

    /// Number of pieces.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// The breakpoints (left edges of the pieces).
    pub fn breakpoints(&self) -> &[Real] {
        &self.breakpoints
    }

    /// The value on each piece.
    pub fn values(&self) -> &[Real] {
        &self.values
    }

    /// Index of the piece containing `x` (0 for `x` left of the first
    /// breakpoint).
    fn locate(&self, x: Real) -> usize {
        self.breakpoints
            .partition_point(|&b| b <= x)
            .saturating_sub(1)
    }

    /// Evaluate `f(x)`.
    pub fn value(&self, x: Real) -> Real {
        self.values[self.locate(x)]
    }

    /// `∫_{x[0]}^{x} f`, negative for `x < x[0]`.
    fn primitive(&self, x: Real) -> Real {
        let i = self.locate(x);
        self.cumulative[i] + self.values[i] * (x - self.breakpoints[i])
    }

    /// `∫_a^b f(x) dx`; reverses sign when `a > b`.
    pub fn integral(&self, a: Real, b: Real) -> Real {
        self.primitive(b) - self.primitive(a)
    }
}
