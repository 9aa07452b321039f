//! Volatility term structures.
//!
//! [`VolatilityCurve`] stores piecewise-constant forward variances; spot and
//! forward volatilities are square roots of their time averages.

use crate::yield_curve::{check_interval, check_pillars, check_time};
use orf_core::{errors::Result, Error, Real, Time, Volatility};
use orf_math::PiecewiseConstant;

/// A term structure of (at-the-money) Black volatilities.
pub trait VolTermStructure: std::fmt::Debug + Send + Sync {
    /// `∫_{t1}^{t2} σ²(s) ds`, with `0 ≤ t1 ≤ t2` already validated.
    fn fwd_variance_integral(&self, t1: Time, t2: Time) -> Real;

    /// Instantaneous variance at `t`.
    fn instantaneous_variance(&self, t: Time) -> Real;

    /// Annualized volatility from the valuation date to `t`.
    ///
    /// At `t = 0` this is the instantaneous volatility.
    fn spot_vol(&self, t: Time) -> Result<Volatility> {
        check_time(t)?;
        if t == 0.0 {
            return Ok(self.instantaneous_variance(0.0).sqrt());
        }
        Ok((self.fwd_variance_integral(0.0, t) / t).sqrt())
    }

    /// Annualized forward volatility between `t1` and `t2`.
    fn fwd_vol(&self, t1: Time, t2: Time) -> Result<Volatility> {
        check_interval(t1, t2)?;
        if t1 == t2 {
            return Ok(self.instantaneous_variance(t1).sqrt());
        }
        Ok((self.fwd_variance_integral(t1, t2) / (t2 - t1)).sqrt())
    }
}

/// Kind of quotes a [`VolatilityCurve`] is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolCurveInput {
    /// Spot volatilities to each maturity.
    SpotVol,
    /// Forward volatilities applying up to each maturity.
    FwdVol,
}

/// A volatility term structure of piecewise-constant forward variances.
#[derive(Debug, Clone)]
pub struct VolatilityCurve {
    fwd_variances: PiecewiseConstant,
}

impl VolatilityCurve {
    /// Bootstrap from maturities and volatility quotes.
    ///
    /// # Errors
    /// `InvalidArgument` for malformed pillars or negative vol quotes;
    /// `NegativeForward` if spot vols imply a negative forward variance.
    pub fn new(maturities: &[Time], vols: &[Volatility], input: VolCurveInput) -> Result<Self> {
        check_pillars(maturities, vols, "VolatilityCurve")?;
        orf_core::ensure_arg!(
            vols.iter().all(|&v| v >= 0.0),
            "VolatilityCurve: volatilities must be non-negative"
        );
        let mut starts = Vec::with_capacity(maturities.len());
        let mut variances = Vec::with_capacity(maturities.len());

        let mut t1 = 0.0;
        let mut total1 = 0.0;
        for (&t2, &v) in maturities.iter().zip(vols) {
            let fwd_var = match input {
                VolCurveInput::SpotVol => {
                    let total2 = v * v * t2;
                    let fv = (total2 - total1) / (t2 - t1);
                    total1 = total2;
                    fv
                }
                VolCurveInput::FwdVol => v * v,
            };
            if fwd_var < 0.0 {
                return Err(Error::NegativeForward {
                    quantity: "variance",
                    t1,
                    t2,
                });
            }
            starts.push(t1);
            variances.push(fwd_var);
            t1 = t2;
        }

        Ok(Self {
            fwd_variances: PiecewiseConstant::new(starts, variances)?,
        })
    }

    /// A flat volatility term structure.
    pub fn flat(vol: Volatility) -> Result<Self> {
        Self::new(&[1.0], &[vol], VolCurveInput::FwdVol)
    }

    /// The piecewise-constant forward variances.
    pub fn fwd_variances(&self) -> &PiecewiseConstant {
        &self.fwd_variances
    }
}

impl VolTermStructure for VolatilityCurve {
    fn fwd_variance_integral(&self, t1: Time, t2: Time) -> Real {
        self.fwd_variances.integral(t1, t2)
    }

    fn instantaneous_variance(&self, t: Time) -> Real {
        self.fwd_variances.value(t)
    }
}
