use approx::assert_abs_diff_eq;
use orflib::market::{VolatilityCurve, YieldCurve};
use orflib::methods::PdeParams;
use orflib::pricers::{amer_bs_pde, barrier_bs_pde, euro_bs, euro_bs_pde, BarrierKind, BsMarket};
use orflib::products::{MonitoringFrequency, OptionType};
use std::sync::Arc;

fn market() -> BsMarket {
    BsMarket::new(
        100.0,
        Arc::new(YieldCurve::flat(0.04).unwrap()),
        0.01,
        Arc::new(VolatilityCurve::flat(0.25).unwrap()),
    )
}

#[test]
fn put_prices_are_ordered() {
    let p = PdeParams::from_pairs([("NTIMESTEPS", "100"), ("NSPOTNODES", "80")]).unwrap();
    let m = market();
    let euro = euro_bs_pde(OptionType::Put, 100.0, 1.0, &m, &p).unwrap().price().unwrap();
    let amer = amer_bs_pde(OptionType::Put, 100.0, 1.0, &m, &p).unwrap().price().unwrap();
    let out = barrier_bs_pde(
        OptionType::Put,
        100.0,
        1.0,
        80.0,
        MonitoringFrequency::Weekly,
        BarrierKind::DownOut,
        &m,
        &p,
    )
    .unwrap()
    .price()
    .unwrap();

    let exact = euro_bs(OptionType::Put, 100.0, 100.0, 1.0, 0.04, 0.01, 0.25).unwrap().price;
    assert_abs_diff_eq!(euro, exact, epsilon = 0.05);
    assert!(out < euro && euro < amer, "{out} {euro} {amer}");
}
