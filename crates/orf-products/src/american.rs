//! American call/put with daily exercise.

use crate::european::{check_path, check_strike_and_expiry, first_spot};
use crate::{option_type::OptionType, product::Product};
use nalgebra::DMatrix;
use orf_core::{errors::Result, Error, Real, Time, DAYS_PER_YEAR};

/// An American call or put, exercisable at every day between now and
/// expiry.
///
/// Fixings are at `i / 365.25` for each whole day strictly before expiry,
/// plus expiry itself; each fixing is also a payment date.
#[derive(Debug, Clone)]
pub struct AmericanCallPut {
    option_type: OptionType,
    strike: Real,
    expiry: Time,
    fixings: Vec<Time>,
}

impl AmericanCallPut {
    /// Create a new American option.
    pub fn new(option_type: OptionType, strike: Real, expiry: Time) -> Result<Self> {
        check_strike_and_expiry("AmericanCallPut", strike, expiry)?;
        let n = (expiry * DAYS_PER_YEAR) as usize + 1;
        let mut fixings: Vec<Time> = (0..n - 1).map(|i| i as Real / DAYS_PER_YEAR).collect();
        fixings.push(expiry);
        Ok(Self {
            option_type,
            strike,
            expiry,
            fixings,
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
}

impl Product for AmericanCallPut {
    fn fixing_times(&self) -> &[Time] {
        &self.fixings
    }

    fn payment_times(&self) -> &[Time] {
        &self.fixings
    }

    fn n_factors(&self) -> usize {
        1
    }

    /// Without a continuation estimate along a single path the contract is
    /// held to expiry: only the last payment is non-zero.
    fn eval_on_path(&self, path: &DMatrix<Real>) -> Result<Vec<Real>> {
        let n = self.fixings.len();
        check_path(path, n)?;
        let mut amounts = vec![0.0; n];
        amounts[n - 1] = self.option_type.payoff(path[(n - 1, 0)], self.strike);
        Ok(amounts)
    }

    fn eval_at_step(&self, idx: usize, spots: &[Real], continuation: Real) -> Result<Real> {
        let n = self.fixings.len();
        if idx >= n {
            return Err(Error::IndexOutOfRange { index: idx, size: n });
        }
        let intrinsic = self.option_type.payoff(first_spot(spots)?, self.strike);
        if idx == n - 1 {
            Ok(intrinsic)
        } else {
            Ok(continuation.max(intrinsic))
        }
    }
}
