//! Closed-form Black–Scholes prices, used as the reference the PDE
//! prices are checked against.

use orf_core::{errors::Result, Real, Time};
use orf_math::{normal_cdf, normal_pdf};
use orf_products::OptionType;

/// Price and sensitivities of a European option.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BsResult {
    /// Present value.
    pub price: Real,
    /// ∂V/∂S.
    pub delta: Real,
    /// ∂²V/∂S².
    pub gamma: Real,
    /// ∂V/∂t, per year.
    pub theta: Real,
    /// ∂V/∂σ, per unit of vol.
    pub vega: Real,
}

/// Black–Scholes price and Greeks of a European call or put with a
/// continuous dividend yield.
///
/// $$V = \phi\, e^{-rT} \left(F N(\phi d_1) - K N(\phi d_2)\right),
///   \quad F = S e^{(r-q)T}$$
///
/// # Errors
/// `InvalidArgument` for a non-positive spot or strike, or a negative time
/// or volatility.
pub fn euro_bs(
    option_type: OptionType,
    spot: Real,
    strike: Real,
    time_to_expiry: Time,
    rate: Real,
    div_yield: Real,
    vol: Real,
) -> Result<BsResult> {
    orf_core::ensure_arg!(spot > 0.0, "spot must be positive, got {spot}");
    orf_core::ensure_arg!(strike > 0.0, "strike must be positive, got {strike}");
    orf_core::ensure_arg!(time_to_expiry >= 0.0, "time to expiration must be non-negative");
    orf_core::ensure_arg!(vol >= 0.0, "volatility must be non-negative, got {vol}");

    let phi = option_type.sign();
    let t = time_to_expiry;
    let sqrt_t = t.sqrt();
    let std_dev = vol * sqrt_t;
    let df = (-rate * t).exp();
    let qf = (-div_yield * t).exp();
    let fwd = spot * ((rate - div_yield) * t).exp();

    if std_dev < 1e-12 {
        // deterministic forward
        let itm = phi * (fwd - strike) > 0.0;
        return Ok(BsResult {
            price: df * option_type.payoff(fwd, strike),
            delta: if itm { phi * qf } else { 0.0 },
            gamma: 0.0,
            theta: 0.0,
            vega: 0.0,
        });
    }

    let d1 = (fwd / strike).ln() / std_dev + 0.5 * std_dev;
    let d2 = d1 - std_dev;
    let nd1 = normal_cdf(phi * d1);
    let nd2 = normal_cdf(phi * d2);
    let npd1 = normal_pdf(d1);

    let theta = -qf * npd1 * spot * vol / (2.0 * sqrt_t) + phi * div_yield * qf * spot * nd1
        - phi * rate * df * strike * nd2;

    Ok(BsResult {
        price: phi * df * (fwd * nd1 - strike * nd2),
        delta: phi * qf * nd1,
        gamma: qf * npd1 / (spot * std_dev),
        theta,
        vega: qf * sqrt_t * spot * npd1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn call_price() {
        let r = euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, 0.2).unwrap();
        assert_abs_diff_eq!(r.price, 10.4506, epsilon = 1e-4);
        assert!(r.delta > 0.5 && r.delta < 0.8);
        assert!(r.gamma > 0.0 && r.vega > 0.0 && r.theta < 0.0);
    }

    #[test]
    fn put_call_parity_with_dividends() {
        let (s, k, t, r, q, v) = (105.0, 100.0, 0.75, 0.04, 0.02, 0.3);
        let c = euro_bs(OptionType::Call, s, k, t, r, q, v).unwrap();
        let p = euro_bs(OptionType::Put, s, k, t, r, q, v).unwrap();
        let parity = s * (-q * t).exp() - k * (-r * t).exp();
        assert_abs_diff_eq!(c.price - p.price, parity, epsilon = 1e-10);
        assert_abs_diff_eq!(c.delta - p.delta, (-q * t).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(c.gamma, p.gamma, epsilon = 1e-12);
    }

    #[test]
    fn delta_matches_finite_difference() {
        let f = |s: Real| euro_bs(OptionType::Put, s, 100.0, 0.5, 0.03, 0.01, 0.25).unwrap();
        let h = 1e-4;
        let fd = (f(100.0 + h).price - f(100.0 - h).price) / (2.0 * h);
        assert_abs_diff_eq!(f(100.0).delta, fd, epsilon = 1e-6);
    }

    #[test]
    fn zero_vol_and_zero_time() {
        let r = euro_bs(OptionType::Call, 100.0, 90.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        assert_abs_diff_eq!(r.price, 10.0, epsilon = 1e-12);
        assert_eq!(r.delta, 1.0);
        let r = euro_bs(OptionType::Put, 100.0, 90.0, 0.0, 0.05, 0.0, 0.2).unwrap();
        assert_eq!(r.price, 0.0);
    }

    #[test]
    fn invalid_inputs() {
        assert!(euro_bs(OptionType::Call, 100.0, 0.0, 1.0, 0.05, 0.0, 0.2).is_err());
        assert!(euro_bs(OptionType::Call, -1.0, 100.0, 1.0, 0.05, 0.0, 0.2).is_err());
        assert!(euro_bs(OptionType::Call, 100.0, 100.0, -1.0, 0.05, 0.0, 0.2).is_err());
        assert!(euro_bs(OptionType::Call, 100.0, 100.0, 1.0, 0.05, 0.0, -0.2).is_err());
    }
}
