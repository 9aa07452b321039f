//! First- and second-derivative operators.
//!
//! Both are built over `N` interior nodes from per-node coefficients (length
//! `N`), a time increment `dt`, a grid spacing `dx` and a scheme weight `w`
//! (θ for the implicit side, 1 − θ for the explicit side):
//!
//! * Δ: `lower = −μ·w·dt/(2dx)`, `diag = 0`, `upper = +μ·w·dt/(2dx)`
//! * Γ: `lower = upper = ½·v·w·dt/dx²`, `diag = −2·lower`

use super::tridiagonal::TridiagonalOperator;
use orf_core::{Real, Time};

impl TridiagonalOperator {
    /// Overwrite with the weighted central first-derivative operator.
    pub fn set_delta(&mut self, drifts: &[Real], dt: Time, dx: Real, weight: Real) {
        self.reset(drifts.len(), 0.0, 0.0, 0.0);
        let f1 = dt * weight / (2.0 * dx);
        let (lower, _, upper) = self.bands_mut();
        for (i, &mu) in drifts.iter().enumerate() {
            let c = mu * f1;
            lower[i + 1] = -c;
            upper[i + 1] = c;
        }
    }

    /// Overwrite with the weighted central second-derivative operator.
    pub fn set_gamma(&mut self, variances: &[Real], dt: Time, dx: Real, weight: Real) {
        self.reset(variances.len(), 0.0, 0.0, 0.0);
        let f1 = 0.5 * dt * weight / (dx * dx);
        let (lower, diag, upper) = self.bands_mut();
        for (i, &var) in variances.iter().enumerate() {
            let c = f1 * var;
            lower[i + 1] = c;
            upper[i + 1] = c;
            diag[i + 1] = -2.0 * c;
        }
    }
}

/// The Δ operator for the given drifts.
pub fn delta_operator(drifts: &[Real], dt: Time, dx: Real, weight: Real) -> TridiagonalOperator {
    let mut op = TridiagonalOperator::new(drifts.len());
    op.set_delta(drifts, dt, dx, weight);
    op
}

/// The Γ operator for the given variances.
pub fn gamma_operator(variances: &[Real], dt: Time, dx: Real, weight: Real) -> TridiagonalOperator {
    let mut op = TridiagonalOperator::new(variances.len());
    op.set_gamma(variances, dt, dx, weight);
    op
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn delta_coefficients() {
        let op = delta_operator(&[1.0, 2.0, 3.0], 0.1, 0.5, 0.5);
        // f1 = 0.1 * 0.5 / 1.0 = 0.05
        assert_eq!(op.size(), 5);
        assert_abs_diff_eq!(op.lower()[2], -0.1, epsilon = 1e-15);
        assert_abs_diff_eq!(op.upper()[3], 0.15, epsilon = 1e-15);
        assert!(op.diag().iter().all(|&d| d == 0.0));
        assert_eq!(op.lower()[0], 0.0);
        assert_eq!(op.upper()[4], 0.0);
    }

    #[test]
    fn gamma_coefficients() {
        let op = gamma_operator(&[0.04, 0.04], 0.25, 0.1, 1.0);
        // f1 = 0.5 * 0.25 / 0.01 = 12.5
        assert_abs_diff_eq!(op.lower()[1], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(op.upper()[2], 0.5, epsilon = 1e-14);
        assert_abs_diff_eq!(op.diag()[2], -1.0, epsilon = 1e-14);
    }

    #[test]
    fn derivatives_of_a_quadratic() {
        // f(x) = x² on x = 0, 0.1, ..., 0.5: Δ gives f'·dt·w, Γ gives ½σ²f''·dt·w
        let dx = 0.1;
        let f: Vec<Real> = (0..6).map(|i| (i as Real * dx).powi(2)).collect();
        let mut y = vec![0.0; 6];

        let delta = delta_operator(&[1.0; 4], 1.0, dx, 1.0);
        delta.apply(&f, &mut y);
        assert_abs_diff_eq!(y[2], 2.0 * 0.2, epsilon = 1e-12);

        let gamma = gamma_operator(&[1.0; 4], 1.0, dx, 1.0);
        gamma.apply(&f, &mut y);
        assert_abs_diff_eq!(y[3], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn set_reuses_and_resizes() {
        let mut op = TridiagonalOperator::identity(2);
        op.set_gamma(&[1.0; 6], 1.0, 1.0, 1.0);
        assert_eq!(op.n_interior(), 6);
        assert_eq!(op.edge_low(), 0.0);
    }
}
