//! Yield term structures.
//!
//! This module defines the `YieldTermStructure` trait together with the four
//! quantities the pricing code reads off a curve:
//!
//! * **discount factor** — `P(0,t)`
//! * **forward discount factor** — `P(t1,t2) = P(0,t2)/P(0,t1)`
//! * **spot rate** — the continuously-compounded zero rate for maturity *t*
//! * **forward rate** — the continuously-compounded rate between two times
//!
//! [`YieldCurve`] is the concrete curve: piecewise-constant instantaneous
//! forward rates bootstrapped from spot rates, forward rates, or zero-coupon
//! bond prices.

use orf_core::{errors::Result, DiscountFactor, Error, Rate, Real, Time};
use orf_math::PiecewiseConstant;

/// A yield (interest-rate) term structure.
///
/// Implementors provide [`fwd_rate_integral`](YieldTermStructure::fwd_rate_integral);
/// the public quantities are derived from it.  All times are in years from
/// the valuation date.
pub trait YieldTermStructure: std::fmt::Debug + Send + Sync {
    /// `∫_{t1}^{t2} f(s) ds`, with `0 ≤ t1 ≤ t2` already validated.
    fn fwd_rate_integral(&self, t1: Time, t2: Time) -> Real;

    /// Instantaneous forward rate at `t`.
    fn instantaneous_fwd_rate(&self, t: Time) -> Rate;

    /// Discount factor from the valuation date to `t`.
    fn discount(&self, t: Time) -> Result<DiscountFactor> {
        check_time(t)?;
        Ok((-self.fwd_rate_integral(0.0, t)).exp())
    }

    /// Forward discount factor from `t1` to `t2`.
    fn fwd_discount(&self, t1: Time, t2: Time) -> Result<DiscountFactor> {
        check_interval(t1, t2)?;
        Ok((-self.fwd_rate_integral(t1, t2)).exp())
    }

    /// Continuously-compounded spot rate to `t`.
    ///
    /// At `t = 0` this is the limit, i.e. the instantaneous forward rate.
    fn spot_rate(&self, t: Time) -> Result<Rate> {
        check_time(t)?;
        if t == 0.0 {
            return Ok(self.instantaneous_fwd_rate(0.0));
        }
        Ok(self.fwd_rate_integral(0.0, t) / t)
    }

    /// Continuously-compounded forward rate between `t1` and `t2`.
    fn fwd_rate(&self, t1: Time, t2: Time) -> Result<Rate> {
        check_interval(t1, t2)?;
        if t1 == t2 {
            return Ok(self.instantaneous_fwd_rate(t1));
        }
        Ok(self.fwd_rate_integral(t1, t2) / (t2 - t1))
    }
}

pub(crate) fn check_time(t: Time) -> Result<()> {
    orf_core::ensure_arg!(t >= 0.0, "negative times not allowed, got {t}");
    Ok(())
}

pub(crate) fn check_interval(t1: Time, t2: Time) -> Result<()> {
    check_time(t1)?;
    orf_core::ensure_arg!(t1 <= t2, "times are out of order: {t1} > {t2}");
    Ok(())
}

/// Validate pillar maturities: non-empty, same length as the quotes,
/// strictly positive and strictly increasing.
pub(crate) fn check_pillars(maturities: &[Time], quotes: &[Real], what: &str) -> Result<()> {
    orf_core::ensure_arg!(!maturities.is_empty(), "{what}: need at least one maturity");
    orf_core::ensure_arg!(
        maturities.len() == quotes.len(),
        "{what}: different number of maturities ({}) and quotes ({})",
        maturities.len(),
        quotes.len()
    );
    orf_core::ensure_arg!(
        maturities.iter().all(|&t| t > 0.0),
        "{what}: maturities must be positive"
    );
    orf_core::ensure_arg!(
        maturities.windows(2).all(|w| w[0] < w[1]),
        "{what}: maturities must be strictly increasing"
    );
    Ok(())
}

/// Kind of quotes a [`YieldCurve`] is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldCurveInput {
    /// Continuously-compounded spot (zero) rates to each maturity.
    SpotRate,
    /// Forward rates applying up to each maturity.
    FwdRate,
    /// Zero-coupon bond prices maturing at each maturity.
    ZeroBond,
}

/// A yield curve of piecewise-constant instantaneous forward rates.
///
/// The forward rate quoted for the `i`-th maturity applies on
/// `[T[i-1], T[i])` (with `T[-1] = 0`) and the last one is extended flat
/// beyond the final maturity.
#[derive(Debug, Clone)]
pub struct YieldCurve {
    fwd_rates: PiecewiseConstant,
}

impl YieldCurve {
    /// Bootstrap a curve from maturities and quotes.
    ///
    /// # Errors
    /// `InvalidArgument` for malformed pillars or bond prices outside
    /// `(0, 1]`; `NegativeForward` if a bootstrapped forward rate is negative.
    pub fn new(maturities: &[Time], quotes: &[Real], input: YieldCurveInput) -> Result<Self> {
        check_pillars(maturities, quotes, "YieldCurve")?;
        let n = maturities.len();
        let mut starts = Vec::with_capacity(n);
        let mut rates = Vec::with_capacity(n);

        let mut t1 = 0.0;
        match input {
            YieldCurveInput::SpotRate => {
                let mut r1 = 0.0;
                for (&t2, &r2) in maturities.iter().zip(quotes) {
                    let f = (r2 * t2 - r1 * t1) / (t2 - t1);
                    if f < 0.0 {
                        return Err(Error::NegativeForward { quantity: "rate", t1, t2 });
                    }
                    starts.push(t1);
                    rates.push(f);
                    t1 = t2;
                    r1 = r2;
                }
            }
            YieldCurveInput::FwdRate => {
                for (&t2, &f) in maturities.iter().zip(quotes) {
                    if f < 0.0 {
                        return Err(Error::NegativeForward { quantity: "rate", t1, t2 });
                    }
                    starts.push(t1);
                    rates.push(f);
                    t1 = t2;
                }
            }
            YieldCurveInput::ZeroBond => {
                let mut p1 = 1.0;
                for (&t2, &p2) in maturities.iter().zip(quotes) {
                    orf_core::ensure_arg!(
                        p2 > 0.0 && p2 <= 1.0,
                        "YieldCurve: zero bond prices must be in (0, 1], got {p2}"
                    );
                    let f = (p1 / p2).ln() / (t2 - t1);
                    if f < 0.0 {
                        return Err(Error::NegativeForward { quantity: "rate", t1, t2 });
                    }
                    starts.push(t1);
                    rates.push(f);
                    t1 = t2;
                    p1 = p2;
                }
            }
        }

        Ok(Self {
            fwd_rates: PiecewiseConstant::new(starts, rates)?,
        })
    }

    /// A flat curve with constant continuously-compounded rate `rate`.
    pub fn flat(rate: Rate) -> Result<Self> {
        Self::new(&[1.0], &[rate], YieldCurveInput::FwdRate)
    }

    /// The piecewise-constant forward rates.
    pub fn fwd_rates(&self) -> &PiecewiseConstant {
        &self.fwd_rates
    }
}

impl YieldTermStructure for YieldCurve {
    fn fwd_rate_integral(&self, t1: Time, t2: Time) -> Real {
        self.fwd_rates.integral(t1, t2)
    }

    fn instantaneous_fwd_rate(&self, t: Time) -> Rate {
        self.fwd_rates.value(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn flat_curve_discount() {
        let curve = YieldCurve::flat(0.05).unwrap();

        assert_abs_diff_eq!(curve.discount(0.0).unwrap(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.discount(1.0).unwrap(), (-0.05_f64).exp(), epsilon = 1e-12);
        // flat extrapolation well beyond the single pillar
        assert_abs_diff_eq!(curve.discount(10.0).unwrap(), (-0.5_f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(curve.spot_rate(0.0).unwrap(), 0.05, epsilon = 1e-15);
        assert_abs_diff_eq!(curve.fwd_rate(2.0, 3.0).unwrap(), 0.05, epsilon = 1e-12);
    }

    #[test]
    fn spot_rate_bootstrap_recovers_quotes() {
        let mats = [0.5, 1.0, 2.0, 5.0];
        let spots = [0.02, 0.025, 0.03, 0.035];
        let curve = YieldCurve::new(&mats, &spots, YieldCurveInput::SpotRate).unwrap();

        for (&t, &r) in mats.iter().zip(&spots) {
            assert_abs_diff_eq!(curve.spot_rate(t).unwrap(), r, epsilon = 1e-12);
        }
        // forward between 1y and 2y: (0.03*2 - 0.025*1) / 1
        assert_abs_diff_eq!(curve.fwd_rate(1.0, 2.0).unwrap(), 0.035, epsilon = 1e-12);
        let fd = curve.fwd_discount(1.0, 2.0).unwrap();
        let ratio = curve.discount(2.0).unwrap() / curve.discount(1.0).unwrap();
        assert_abs_diff_eq!(fd, ratio, epsilon = 1e-14);
    }

    #[test]
    fn zero_bond_bootstrap() {
        let mats = [1.0, 2.0];
        let bonds = [(-0.03_f64).exp(), (-0.07_f64).exp()];
        let curve = YieldCurve::new(&mats, &bonds, YieldCurveInput::ZeroBond).unwrap();
        assert_abs_diff_eq!(curve.fwd_rate(0.0, 1.0).unwrap(), 0.03, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.fwd_rate(1.0, 2.0).unwrap(), 0.04, epsilon = 1e-12);
        assert_abs_diff_eq!(curve.discount(2.0).unwrap(), bonds[1], epsilon = 1e-14);
    }

    #[test]
    fn negative_forward_is_reported() {
        let err = YieldCurve::new(&[1.0, 2.0], &[0.05, 0.01], YieldCurveInput::SpotRate)
            .unwrap_err();
        assert_eq!(
            err,
            Error::NegativeForward {
                quantity: "rate",
                t1: 1.0,
                t2: 2.0
            }
        );
    }

    #[test]
    fn invalid_inputs() {
        assert!(YieldCurve::new(&[1.0, 1.0], &[0.01, 0.02], YieldCurveInput::SpotRate).is_err());
        assert!(YieldCurve::new(&[0.0], &[0.01], YieldCurveInput::SpotRate).is_err());
        assert!(YieldCurve::new(&[1.0], &[1.2], YieldCurveInput::ZeroBond).is_err());
        let curve = YieldCurve::flat(0.01).unwrap();
        assert!(matches!(curve.discount(-1.0), Err(Error::InvalidArgument(_))));
        assert!(matches!(curve.fwd_rate(2.0, 1.0), Err(Error::InvalidArgument(_))));
    }
}
