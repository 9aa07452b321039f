//! Tridiagonal operators on a 1-D grid with two boundary nodes.
//!
//! An operator over a grid of `N` interior nodes stores its three bands with
//! `N + 2` entries each; only rows `1..=N` take part in [`apply`] and in the
//! banded solve.  Rows `0` and `N + 1` belong to the boundary nodes, whose
//! values are set by extrapolation after every step
//! (see [`apply_boundary_conditions`]).
//!
//! The edge values `edge_low` / `edge_high` are the constant contributions of
//! the ghost terms once a boundary condition has been folded into rows `1`
//! and `N`.
//!
//! [`apply`]: TridiagonalOperator::apply

use orf_core::{errors::Result, Error, Real};
use serde::{Deserialize, Serialize};
use std::ops::{AddAssign, MulAssign, SubAssign};

// ── Boundary conditions ───────────────────────────────────────────────────────

/// Boundary condition folded into the first or last interior row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryCondition {
    /// Degree 0: the boundary value is pinned.
    Dirichlet(Real),
    /// Degree 1: first derivative across the edge.
    Neumann(Real),
    /// Degree 2: curvature condition with the given value.
    Curvature(Real),
    /// Degree 3: zero second derivative of the real-space value. The ghost
    /// weights come from the coordinate change of the axis, see
    /// [`GhostWeights`].
    #[default]
    ZeroCurvature,
    /// Degree 4: caller-supplied multiples of the edge coefficient added to
    /// the diagonal and to the inner off-diagonal.
    CustomCurvature {
        /// Multiple added to the diagonal.
        diag_adjust: Real,
        /// Multiple added to the inner off-diagonal.
        off_adjust: Real,
    },
}

impl BoundaryCondition {
    /// Build from the legacy polynomial-degree encoding.
    ///
    /// # Errors
    /// `Precondition` for a degree outside `0..=4`, or a non-zero `value`
    /// with degree 3 or 4.
    pub fn from_degree(
        degree: u32,
        value: Real,
        diag_adjust: Real,
        off_adjust: Real,
    ) -> Result<Self> {
        match degree {
            0 => Ok(Self::Dirichlet(value)),
            1 => Ok(Self::Neumann(value)),
            2 => Ok(Self::Curvature(value)),
            3 | 4 => {
                orf_core::ensure!(
                    value == 0.0,
                    "cannot do non-zero 2nd derivative boundary condition"
                );
                if degree == 3 {
                    Ok(Self::ZeroCurvature)
                } else {
                    Ok(Self::CustomCurvature {
                        diag_adjust,
                        off_adjust,
                    })
                }
            }
            _ => Err(Error::Precondition(format!(
                "invalid degree {degree} for boundary condition"
            ))),
        }
    }

    /// The legacy degree of this condition.
    pub fn degree(&self) -> u32 {
        match self {
            Self::Dirichlet(_) => 0,
            Self::Neumann(_) => 1,
            Self::Curvature(_) => 2,
            Self::ZeroCurvature => 3,
            Self::CustomCurvature { .. } => 4,
        }
    }
}

/// Ghost-node weights of a zero-curvature edge: the value one spacing
/// beyond the edge is `inner·v_edge − outer·v_next`, where `v_next` is the
/// node one spacing inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GhostWeights {
    /// Weight of the edge node.
    pub inner: Real,
    /// Weight of the next node inwards.
    pub outer: Real,
}

impl GhostWeights {
    /// Straight-line extrapolation, exact when the axis is the real
    /// coordinate itself.
    pub const LINEAR: GhostWeights = GhostWeights {
        inner: 2.0,
        outer: 1.0,
    };

    /// Low edge of a log axis: `2/(1 + Δx/2)` and `(1 − Δx/2)/(1 + Δx/2)`.
    pub fn log_lower(dx: Real) -> Self {
        let h = dx / 2.0;
        Self {
            inner: 2.0 / (1.0 + h),
            outer: (1.0 - h) / (1.0 + h),
        }
    }

    /// High edge of a log axis: `2/(1 − Δx/2)` and `(1 + Δx/2)/(1 − Δx/2)`.
    pub fn log_upper(dx: Real) -> Self {
        let h = dx / 2.0;
        Self {
            inner: 2.0 / (1.0 - h),
            outer: (1.0 + h) / (1.0 - h),
        }
    }
}

// ── Operator ──────────────────────────────────────────────────────────────────

/// A tridiagonal operator over `N` interior nodes.
#[derive(Debug, Clone)]
pub struct TridiagonalOperator {
    lower: Vec<Real>,
    diag: Vec<Real>,
    upper: Vec<Real>,
    edge_low: Real,
    edge_high: Real,
    // elimination scratch, indices 1..=N
    pivots: Vec<Real>,
    rhs: Vec<Real>,
}

impl TridiagonalOperator {
    /// The zero operator over `n` interior nodes.
    pub fn new(n: usize) -> Self {
        Self::from_constants(n, 0.0, 0.0, 0.0)
    }

    /// The identity over `n` interior nodes.
    pub fn identity(n: usize) -> Self {
        Self::from_constants(n, 0.0, 1.0, 0.0)
    }

    /// Constant bands over `n` interior nodes.
    pub fn from_constants(n: usize, lower: Real, diag: Real, upper: Real) -> Self {
        Self {
            lower: vec![lower; n + 2],
            diag: vec![diag; n + 2],
            upper: vec![upper; n + 2],
            edge_low: 0.0,
            edge_high: 0.0,
            pivots: Vec::new(),
            rhs: Vec::new(),
        }
    }

    /// Build from three bands of equal length `N + 2`.
    pub fn from_bands(lower: Vec<Real>, diag: Vec<Real>, upper: Vec<Real>) -> Result<Self> {
        orf_core::ensure_arg!(
            lower.len() == diag.len() && diag.len() == upper.len(),
            "tridiagonal bands must have equal lengths ({}, {}, {})",
            lower.len(),
            diag.len(),
            upper.len()
        );
        orf_core::ensure_arg!(diag.len() >= 3, "tridiagonal operator needs at least one interior node");
        Ok(Self {
            lower,
            diag,
            upper,
            edge_low: 0.0,
            edge_high: 0.0,
            pivots: Vec::new(),
            rhs: Vec::new(),
        })
    }

    /// Reset to constant bands over `n` interior nodes, reusing storage.
    pub fn reset(&mut self, n: usize, lower: Real, diag: Real, upper: Real) {
        self.lower.clear();
        self.lower.resize(n + 2, lower);
        self.diag.clear();
        self.diag.resize(n + 2, diag);
        self.upper.clear();
        self.upper.resize(n + 2, upper);
        self.edge_low = 0.0;
        self.edge_high = 0.0;
    }

    /// Reset to the identity over `n` interior nodes.
    pub fn set_identity(&mut self, n: usize) {
        self.reset(n, 0.0, 1.0, 0.0);
    }

    /// Number of interior nodes `N`.
    pub fn n_interior(&self) -> usize {
        self.diag.len().saturating_sub(2)
    }

    /// Length of each band, `N + 2`.
    pub fn size(&self) -> usize {
        self.diag.len()
    }

    /// Lower band.
    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    /// Main diagonal.
    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    /// Upper band.
    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    pub(crate) fn bands_mut(&mut self) -> (&mut [Real], &mut [Real], &mut [Real]) {
        (&mut self.lower, &mut self.diag, &mut self.upper)
    }

    /// Constant added to row 1 by [`apply`](Self::apply).
    pub fn edge_low(&self) -> Real {
        self.edge_low
    }

    /// Constant added to row `N` by [`apply`](Self::apply).
    pub fn edge_high(&self) -> Real {
        self.edge_high
    }

    /// `edge_low += v`.
    pub fn add_to_edge_low(&mut self, v: Real) {
        self.edge_low += v;
    }

    /// `edge_high += v`.
    pub fn add_to_edge_high(&mut self, v: Real) {
        self.edge_high += v;
    }

    /// `y = A·x` on rows `1..=N`; rows `0` and `N + 1` of `y` are left
    /// untouched.
    ///
    /// # Panics
    /// If `N < 2` or either slice is shorter than `N + 2`.
    pub fn apply(&self, x: &[Real], y: &mut [Real]) {
        let n = self.n_interior();
        assert!(n >= 2, "tridiagonal apply needs at least two interior nodes");
        assert!(x.len() >= n + 2 && y.len() >= n + 2, "vector shorter than the operator");
        let (l, d, u) = (&self.lower, &self.diag, &self.upper);

        y[1] = self.edge_low + d[1] * x[1] + u[1] * x[2];
        for i in 2..n {
            y[i] = l[i] * x[i - 1] + d[i] * x[i] + u[i] * x[i + 1];
        }
        y[n] = l[n] * x[n - 1] + d[n] * x[n] + self.edge_high;
    }

    /// Solve `A·x = y` on rows `1..=N`.
    ///
    /// Two-pass elimination: the upper band is eliminated from row `N` down
    /// to row 1, then the solution is recovered from row 1 up.  Only
    /// `x[1..=N]` is written.  The edge values are not used.
    pub fn apply_inverse(&mut self, y: &[Real], x: &mut [Real]) {
        self.eliminate(y);
        self.substitute(x);
    }

    /// [`apply_inverse`](Self::apply_inverse) with the right-hand side
    /// overwritten by the solution.
    pub fn apply_inverse_in_place(&mut self, v: &mut [Real]) {
        self.eliminate(v);
        self.substitute(v);
    }

    fn eliminate(&mut self, y: &[Real]) {
        let n = self.n_interior();
        assert!(y.len() >= n + 2, "vector shorter than the operator");
        self.pivots.resize(n + 1, 0.0);
        self.rhs.resize(n + 1, 0.0);
        let (l, d, u) = (&self.lower, &self.diag, &self.upper);
        let (p, r) = (&mut self.pivots, &mut self.rhs);

        p[n] = d[n];
        r[n] = y[n];
        for i in (1..n).rev() {
            p[i] = d[i] - u[i] * l[i + 1] / p[i + 1];
            r[i] = y[i] - u[i] * r[i + 1] / p[i + 1];
        }
    }

    fn substitute(&self, x: &mut [Real]) {
        let n = self.n_interior();
        x[1] = self.rhs[1] / self.pivots[1];
        for i in 2..=n {
            x[i] = (self.rhs[i] - self.lower[i] * x[i - 1]) / self.pivots[i];
        }
    }

    // ── Boundary rows ─────────────────────────────────────────────────────────

    /// Fold `bc` into row 1 and return its edge contribution. `ghost` is
    /// only read by [`BoundaryCondition::ZeroCurvature`].
    ///
    /// # Errors
    /// `Precondition` if the operator has fewer than 4 rows, or if the
    /// zero-curvature ghost weights are not finite.
    pub fn adjust_lower(&mut self, bc: BoundaryCondition, ghost: GhostWeights) -> Result<Real> {
        orf_core::ensure!(self.diag.len() >= 4, "tridiagonal operator: grid is too small");
        let lo = self.lower[1];
        Ok(match bc {
            BoundaryCondition::Dirichlet(v) => lo * v,
            BoundaryCondition::Neumann(v) => {
                self.upper[1] += lo;
                -lo * v
            }
            BoundaryCondition::Curvature(v) => {
                self.diag[1] += 2.0 * lo;
                self.upper[1] -= lo;
                lo * v
            }
            BoundaryCondition::ZeroCurvature => {
                check_ghost(ghost)?;
                self.diag[1] += ghost.inner * lo;
                self.upper[1] -= ghost.outer * lo;
                0.0
            }
            BoundaryCondition::CustomCurvature {
                diag_adjust,
                off_adjust,
            } => {
                self.diag[1] += diag_adjust * lo;
                self.upper[1] += off_adjust * lo;
                0.0
            }
        })
    }

    /// Fold `bc` into row `N` and return its edge contribution.
    ///
    /// # Errors
    /// As [`adjust_lower`](Self::adjust_lower).
    pub fn adjust_upper(&mut self, bc: BoundaryCondition, ghost: GhostWeights) -> Result<Real> {
        orf_core::ensure!(self.diag.len() >= 4, "tridiagonal operator: grid is too small");
        let n = self.n_interior();
        let up = self.upper[n];
        Ok(match bc {
            BoundaryCondition::Dirichlet(v) => up * v,
            BoundaryCondition::Neumann(v) => {
                self.lower[n] += up;
                -up * v
            }
            BoundaryCondition::Curvature(v) => {
                self.diag[n] += 2.0 * up;
                self.lower[n] -= up;
                up * v
            }
            BoundaryCondition::ZeroCurvature => {
                check_ghost(ghost)?;
                self.diag[n] += ghost.inner * up;
                self.lower[n] -= ghost.outer * up;
                0.0
            }
            BoundaryCondition::CustomCurvature {
                diag_adjust,
                off_adjust,
            } => {
                self.diag[n] += diag_adjust * up;
                self.lower[n] += off_adjust * up;
                0.0
            }
        })
    }
}

fn check_ghost(ghost: GhostWeights) -> Result<()> {
    orf_core::ensure!(
        ghost.inner.is_finite() && ghost.outer.is_finite(),
        "zero-curvature ghost weights are not finite ({}, {}): grid spacing too wide",
        ghost.inner,
        ghost.outer
    );
    Ok(())
}

// ── Algebra ───────────────────────────────────────────────────────────────────

impl AddAssign<&TridiagonalOperator> for TridiagonalOperator {
    fn add_assign(&mut self, rhs: &TridiagonalOperator) {
        assert_eq!(self.size(), rhs.size(), "cannot add operators of different sizes");
        for i in 0..self.size() {
            self.lower[i] += rhs.lower[i];
            self.diag[i] += rhs.diag[i];
            self.upper[i] += rhs.upper[i];
        }
        self.edge_low += rhs.edge_low;
        self.edge_high += rhs.edge_high;
    }
}

impl SubAssign<&TridiagonalOperator> for TridiagonalOperator {
    fn sub_assign(&mut self, rhs: &TridiagonalOperator) {
        assert_eq!(self.size(), rhs.size(), "cannot subtract operators of different sizes");
        for i in 0..self.size() {
            self.lower[i] -= rhs.lower[i];
            self.diag[i] -= rhs.diag[i];
            self.upper[i] -= rhs.upper[i];
        }
        self.edge_low -= rhs.edge_low;
        self.edge_high -= rhs.edge_high;
    }
}

impl MulAssign<Real> for TridiagonalOperator {
    fn mul_assign(&mut self, rhs: Real) {
        for v in self
            .lower
            .iter_mut()
            .chain(self.diag.iter_mut())
            .chain(self.upper.iter_mut())
        {
            *v *= rhs;
        }
        self.edge_low *= rhs;
        self.edge_high *= rhs;
    }
}

// ── Scheme helpers ────────────────────────────────────────────────────────────

/// Fold `bc` into both ends of the explicit and implicit operators of a
/// theta step, and move the net edge contribution onto the explicit side.
/// `ghosts` holds the low and high zero-curvature weights of the axis.
pub fn adjust_ops_for_boundary_conditions(
    explicit: &mut TridiagonalOperator,
    implicit: &mut TridiagonalOperator,
    bc: BoundaryCondition,
    ghosts: (GhostWeights, GhostWeights),
) -> Result<()> {
    let (low, high) = ghosts;
    let low_imp = implicit.adjust_lower(bc, low)?;
    let high_imp = implicit.adjust_upper(bc, high)?;
    let low_exp = explicit.adjust_lower(bc, low)?;
    let high_exp = explicit.adjust_upper(bc, high)?;

    explicit.add_to_edge_low(low_exp - low_imp);
    explicit.add_to_edge_high(high_exp - high_imp);
    Ok(())
}

/// Set the two boundary nodes by linear extrapolation from the interior:
/// `v[0] = 2v[1] − v[2]` and `v[N+1] = 2v[N] − v[N−1]`.
pub fn apply_boundary_conditions(v: &mut [Real]) {
    let m = v.len();
    assert!(m >= 4, "need at least two interior nodes to extrapolate");
    v[0] = 2.0 * v[1] - v[2];
    v[m - 1] = 2.0 * v[m - 2] - v[m - 3];
}
