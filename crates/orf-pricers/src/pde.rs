//! PDE pricing of European, American and barrier options in a
//! Black–Scholes market with term-structure rates and vols.

use orf_core::{errors::Result, Real, Time};
use orf_market::{VolTermStructure, YieldTermStructure};
use orf_methods::pde::{Pde1DSolver, PdeParams, PdeResults};
use orf_products::{
    AmericanCallPut, BarrierCallPut, BarrierDirection, EuropeanCallPut, MonitoringFrequency,
    OptionType, Product,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// The market an option is priced in.
#[derive(Debug, Clone)]
pub struct BsMarket {
    /// Spot level of the underlying.
    pub spot: Real,
    /// Discount curve, also used for the drift of the underlying.
    pub discount_curve: Arc<dyn YieldTermStructure>,
    /// Continuous dividend yield.
    pub div_yield: Real,
    /// Volatility term structure.
    pub vol: Arc<dyn VolTermStructure>,
}

impl BsMarket {
    /// Bundle the market inputs.
    pub fn new(
        spot: Real,
        discount_curve: Arc<dyn YieldTermStructure>,
        div_yield: Real,
        vol: Arc<dyn VolTermStructure>,
    ) -> Self {
        Self {
            spot,
            discount_curve,
            div_yield,
            vol,
        }
    }

    fn solver(&self, product: Arc<dyn Product>) -> Result<Pde1DSolver> {
        Pde1DSolver::new(
            product,
            Arc::clone(&self.discount_curve),
            self.spot,
            self.div_yield,
            Arc::clone(&self.vol),
        )
    }
}

/// Barrier style: direction and knock-out or knock-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BarrierKind {
    /// Dies when the spot is observed at or above the barrier.
    UpOut,
    /// Comes alive when the spot is observed at or above the barrier.
    UpIn,
    /// Dies when the spot is observed at or below the barrier.
    DownOut,
    /// Comes alive when the spot is observed at or below the barrier.
    DownIn,
}

impl BarrierKind {
    /// Direction of the barrier.
    pub fn direction(self) -> BarrierDirection {
        match self {
            BarrierKind::UpOut | BarrierKind::UpIn => BarrierDirection::Up,
            BarrierKind::DownOut | BarrierKind::DownIn => BarrierDirection::Down,
        }
    }

    /// `true` for the knock-in styles.
    pub fn is_knock_in(self) -> bool {
        matches!(self, BarrierKind::UpIn | BarrierKind::DownIn)
    }
}

impl fmt::Display for BarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BarrierKind::UpOut => "up-and-out",
            BarrierKind::UpIn => "up-and-in",
            BarrierKind::DownOut => "down-and-out",
            BarrierKind::DownIn => "down-and-in",
        };
        f.write_str(s)
    }
}

fn spot_aligned(params: &PdeParams) -> PdeParams {
    let mut p = params.clone();
    p.align_to_barrier = false;
    p
}

/// PDE price of a European call or put. The grid is aligned to the spot.
pub fn euro_bs_pde(
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    market: &BsMarket,
    params: &PdeParams,
) -> Result<PdeResults> {
    let product = Arc::new(EuropeanCallPut::new(option_type, strike, time_to_expiry)?);
    market.solver(product)?.solve(&spot_aligned(params))
}

/// PDE price of an American call or put, exercisable daily. The grid is
/// aligned to the spot.
pub fn amer_bs_pde(
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    market: &BsMarket,
    params: &PdeParams,
) -> Result<PdeResults> {
    let product = Arc::new(AmericanCallPut::new(option_type, strike, time_to_expiry)?);
    market.solver(product)?.solve(&spot_aligned(params))
}

/// PDE price of a discretely monitored barrier call or put.
///
/// Knock-outs are solved directly, with the grid aligned to the barrier
/// when `params.align_to_barrier` is set. Knock-ins are priced by parity
/// as European minus knock-out, floored at zero; the two solves use
/// different grids, so no snapshots are returned for them.
///
/// # Errors
/// `InvalidArgument` if the spot is already beyond the barrier, plus any
/// failure of the product constructor or the solver.
#[allow(clippy::too_many_arguments)]
pub fn barrier_bs_pde(
    option_type: OptionType,
    strike: Real,
    time_to_expiry: Time,
    barrier: Real,
    frequency: MonitoringFrequency,
    kind: BarrierKind,
    market: &BsMarket,
    params: &PdeParams,
) -> Result<PdeResults> {
    match kind.direction() {
        BarrierDirection::Up => orf_core::ensure_arg!(
            market.spot < barrier,
            "the barrier ({barrier}) must be above the spot ({}) for an up option",
            market.spot
        ),
        BarrierDirection::Down => orf_core::ensure_arg!(
            market.spot > barrier,
            "the barrier ({barrier}) must be below the spot ({}) for a down option",
            market.spot
        ),
    }
    let knock_out = Arc::new(BarrierCallPut::new(
        option_type,
        strike,
        time_to_expiry,
        kind.direction(),
        barrier,
        frequency,
    )?);

    if !kind.is_knock_in() {
        return market.solver(knock_out)?.with_barrier(barrier)?.solve(params);
    }

    let mut params = params.clone();
    if params.store_full_grid {
        warn!(%kind, "grid snapshots are not available for knock-in options");
        params.store_full_grid = false;
    }
    let out = market.solver(knock_out)?.with_barrier(barrier)?.solve(&params)?;
    let european = euro_bs_pde(option_type, strike, time_to_expiry, market, &params)?;

    let prices: Vec<Real> = european
        .prices
        .iter()
        .zip(&out.prices)
        .map(|(e, o)| (e - o).max(0.0))
        .collect();
    debug!(%kind, ?prices, "knock-in priced by parity");
    Ok(PdeResults {
        prices,
        grid_axes: out.grid_axes,
        ..PdeResults::default()
    })
}
