//! Property-based tests for smile calibration and strike inversion.

use fxsmile_core::market_data::smiles::{DeltaType, FxDeltaVolSmile, OptionType};
use fxsmile_core::math::distributions::norm_cdf;
use fxsmile_core::types::{AdOrder, Date, Number};
use proptest::prelude::*;

fn build(vols: [f64; 3], days: i64) -> FxDeltaVolSmile {
    let eval = Date::from_ymd(2024, 1, 1).unwrap();
    let expiry = Date::from_ymd(2024, 1, 1)
        .unwrap()
        .into_inner()
        .checked_add_signed(chrono::Duration::days(days))
        .map(Date::from)
        .unwrap();
    FxDeltaVolSmile::new(
        vec![(0.25, vols[0]), (0.5, vols[1]), (0.75, vols[2])],
        eval,
        expiry,
        DeltaType::Forward,
        AdOrder::Zero,
    )
    .unwrap()
}

proptest! {
    #[test]
    fn prop_nodes_are_interpolated(
        v0 in 5.0..30.0f64,
        v1 in 5.0..30.0f64,
        v2 in 5.0..30.0f64,
        days in 7i64..730,
    ) {
        let smile = build([v0, v1, v2], days);
        for &(k, v) in smile.nodes() {
            let got = smile.lookup(k).unwrap().real();
            prop_assert!((got - v).abs() < 1e-9, "node {}: {} vs {}", k, got, v);
        }
    }

    #[test]
    fn prop_natural_boundary(
        v0 in 5.0..30.0f64,
        v1 in 5.0..30.0f64,
        v2 in 5.0..30.0f64,
    ) {
        let smile = build([v0, v1, v2], 365);
        let s = smile.spline();
        prop_assert!(s.ppdnev_single(0.0, 2).unwrap().real().abs() < 1e-8);
        prop_assert!(s.ppdnev_single(1.0, 2).unwrap().real().abs() < 1e-8);
    }

    #[test]
    fn prop_forward_strike_round_trip(
        v in 8.0..20.0f64,
        skew in -1.5..1.5f64,
        moneyness in 0.98..1.02f64,
        days in 90i64..730,
    ) {
        let smile = build([v + skew, v, v - skew], days);
        let t = smile.t_expiry();
        let f = 1.0;
        let k = moneyness;
        let res = smile
            .get_from_strike(&Number::Float(k), OptionType::Call, &Number::Float(f), None)
            .unwrap();

        let vst = res.vol.real() / 100.0 * t.sqrt();
        let call = norm_cdf(-(k / f).ln() / vst + 0.5 * vst);
        prop_assert!((1.0 - res.delta_index.real() - call).abs() < 1e-9);
    }
}
