//! European call/put.

use crate::{option_type::OptionType, product::Product};
use nalgebra::DMatrix;
use orf_core::{errors::Result, Error, Real, Time};

/// A European call or put with a single fixing and payment at expiry.
#[derive(Debug, Clone)]
pub struct EuropeanCallPut {
    option_type: OptionType,
    strike: Real,
    expiry: Time,
    times: [Time; 1],
}

impl EuropeanCallPut {
    /// Create a new European option.
    ///
    /// # Errors
    /// `InvalidArgument` if `strike` or `expiry` is not positive.
    pub fn new(option_type: OptionType, strike: Real, expiry: Time) -> Result<Self> {
        check_strike_and_expiry("EuropeanCallPut", strike, expiry)?;
        Ok(Self {
            option_type,
            strike,
            expiry,
            times: [expiry],
        })
    }

    /// Call or put.
    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    /// The strike.
    pub fn strike(&self) -> Real {
        self.strike
    }

    /// Time to expiry in years.
    pub fn expiry(&self) -> Time {
        self.expiry
    }

    /// `max(φ(S − K), 0)`.
    pub fn payoff(&self, spot: Real) -> Real {
        self.option_type.payoff(spot, self.strike)
    }
}

impl Product for EuropeanCallPut {
    fn fixing_times(&self) -> &[Time] {
        &self.times
    }

    fn payment_times(&self) -> &[Time] {
        &self.times
    }

    fn n_factors(&self) -> usize {
        1
    }

    fn eval_on_path(&self, path: &DMatrix<Real>) -> Result<Vec<Real>> {
        check_path(path, 1)?;
        Ok(vec![self.payoff(path[(0, 0)])])
    }

    fn eval_at_step(&self, idx: usize, spots: &[Real], _continuation: Real) -> Result<Real> {
        if idx != 0 {
            return Err(Error::IndexOutOfRange { index: idx, size: 1 });
        }
        Ok(self.payoff(first_spot(spots)?))
    }
}

pub(crate) fn check_strike_and_expiry(what: &str, strike: Real, expiry: Time) -> Result<()> {
    orf_core::ensure_arg!(strike > 0.0, "{what}: the strike must be positive, got {strike}");
    orf_core::ensure_arg!(
        expiry > 0.0,
        "{what}: the time to expiration must be positive, got {expiry}"
    );
    Ok(())
}

pub(crate) fn check_path(path: &DMatrix<Real>, n_fixings: usize) -> Result<()> {
    orf_core::ensure_arg!(
        path.nrows() == n_fixings && path.ncols() >= 1,
        "price path must be {n_fixings} x 1, got {} x {}",
        path.nrows(),
        path.ncols()
    );
    Ok(())
}

pub(crate) fn first_spot(spots: &[Real]) -> Result<Real> {
    spots
        .first()
        .copied()
        .ok_or_else(|| Error::InvalidArgument("no spot supplied".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_fixing_at_expiry() {
        let opt = EuropeanCallPut::new(OptionType::Call, 100.0, 0.75).unwrap();
        assert_eq!(opt.fixing_times(), &[0.75]);
        assert_eq!(opt.payment_times(), &[0.75]);
        assert_eq!(opt.n_factors(), 1);
    }

    #[test]
    fn eval_ignores_continuation() {
        let put = EuropeanCallPut::new(OptionType::Put, 100.0, 1.0).unwrap();
        assert_abs_diff_eq!(put.eval_at_step(0, &[80.0], 55.0).unwrap(), 20.0);
        assert_abs_diff_eq!(put.eval_at_step(0, &[120.0], 55.0).unwrap(), 0.0);
        assert!(matches!(
            put.eval_at_step(1, &[80.0], 0.0),
            Err(Error::IndexOutOfRange { index: 1, size: 1 })
        ));
        assert!(put.eval_at_step(0, &[], 0.0).is_err());
    }

    #[test]
    fn eval_on_path() {
        let call = EuropeanCallPut::new(OptionType::Call, 100.0, 1.0).unwrap();
        let path = DMatrix::from_element(1, 1, 130.0);
        assert_eq!(call.eval_on_path(&path).unwrap(), vec![30.0]);
        assert!(call.eval_on_path(&DMatrix::zeros(2, 1)).is_err());
    }

    #[test]
    fn rejects_bad_inputs() {
        assert!(EuropeanCallPut::new(OptionType::Call, 0.0, 1.0).is_err());
        assert!(EuropeanCallPut::new(OptionType::Call, 100.0, -1.0).is_err());
    }
}
