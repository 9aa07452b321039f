//! Discretely monitored knock-out call/put.

use crate::european::{check_path, check_strike_and_expiry, first_spot};
use crate::{option_type::OptionType, product::Product};
use nalgebra::DMatrix;
use orf_core::{errors::Result, Error, Real, Time};
use std::fmt;

/// Side of the spot on which the barrier sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierDirection {
    /// Knocked out when the spot is at or above the barrier.
    Up,
    /// Knocked out when the spot is at or below the barrier.
    Down,
}

impl fmt::Display for BarrierDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BarrierDirection::Up => write!(f, "Up"),
            BarrierDirection::Down => write!(f, "Down"),
        }
    }
}

/// How often the barrier is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitoringFrequency {
    /// 12 observations per year.
    Monthly,
    /// 52 observations per year.
    Weekly,
    /// 365 observations per year.
    Daily,
}

impl MonitoringFrequency {
    /// Observations per year.
    pub fn per_year(self) -> Real {
        match self {
            MonitoringFrequency::Monthly => 12.0,
            MonitoringFrequency::Weekly => 52.0,
            MonitoringFrequency::Daily => 365.0,
        }
    }
}

/// A knock-out call or put with a discretely monitored barrier.
///
/// With `f` observations per year there are `n = floor(T·f)` fixings.
/// The fractional remainder `stub = T·f − n` offsets the schedule:
/// fixing `i < n − 1` sits at `(i + stub) / f` and the last one at expiry.
#[derive(Debug, Clone)]
pub struct BarrierCallPut {
    option_type: OptionType,
    strike: Real,
    expiry: Time,
    direction: BarrierDirection,
    barrier: Real,
    frequency: MonitoringFrequency,
    fixings: Vec<Time>,
}

impl BarrierCallPut {
    /// Create a new knock-out option.
    ///
    /// # Errors
    /// `InvalidArgument` for a non-positive strike, expiry or barrier, or
    /// an expiry shorter than one monitoring period.
    pub fn new(
        option_type: OptionType,
        strike: Real,
        expiry: Time,
        direction: BarrierDirection,
        barrier: Real,
        frequency: MonitoringFrequency,
    ) -> Result<Self> {
        check_strike_and_expiry("BarrierCallPut", strike, expiry)?;
        orf_core::ensure_arg!(
            barrier > 0.0,
            "BarrierCallPut: the barrier must be positive, got {barrier}"
        );
        let f = frequency.per_year();
        orf_core::ensure_arg!(
            expiry >= 1.0 / f,
            "BarrierCallPut: time to expiration must be at least one monitoring period"
        );
        let periods = expiry * f;
        let n = periods.floor() as usize;
        orf_core::ensure_arg!(n > 0, "BarrierCallPut: the option has expired");
        let stub = periods - periods.floor();

        let mut fixings: Vec<Time> = (0..n - 1).map(|i| (i as Real + stub) / f).collect();
        fixings.push(expiry);

        Ok(Self {
            option_type,
            strike,
            expiry,
            direction,
            barrier,
            frequency,
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

    /// Up or down.
    pub fn direction(&self) -> BarrierDirection {
        self.direction
    }

    /// The barrier level.
    pub fn barrier(&self) -> Real {
        self.barrier
    }

    /// The monitoring frequency.
    pub fn frequency(&self) -> MonitoringFrequency {
        self.frequency
    }

    /// `true` if `spot` is on the knocked-out side of the barrier.
    pub fn is_breached(&self, spot: Real) -> bool {
        match self.direction {
            BarrierDirection::Up => spot >= self.barrier,
            BarrierDirection::Down => spot <= self.barrier,
        }
    }
}

impl Product for BarrierCallPut {
    fn fixing_times(&self) -> &[Time] {
        &self.fixings
    }

    fn payment_times(&self) -> &[Time] {
        &self.fixings
    }

    fn n_factors(&self) -> usize {
        1
    }

    fn eval_on_path(&self, path: &DMatrix<Real>) -> Result<Vec<Real>> {
        let n = self.fixings.len();
        check_path(path, n)?;
        let mut amounts = vec![0.0; n];
        let alive = (0..n).all(|i| !self.is_breached(path[(i, 0)]));
        if alive {
            amounts[n - 1] = self.option_type.payoff(path[(n - 1, 0)], self.strike);
        }
        Ok(amounts)
    }

    fn eval_at_step(&self, idx: usize, spots: &[Real], continuation: Real) -> Result<Real> {
        let n = self.fixings.len();
        if idx >= n {
            return Err(Error::IndexOutOfRange { index: idx, size: n });
        }
        let spot = first_spot(spots)?;
        if self.is_breached(spot) {
            return Ok(0.0);
        }
        if idx == n - 1 {
            Ok(self.option_type.payoff(spot, self.strike))
        } else {
            Ok(continuation.max(0.0))
        }
    }
}
