use proptest::prelude::*;

use templ_curve::{
    CurveSegment, FeeCurve, ENTRY_FEE_DENOMINATION, MAX_ENTRY_FEE, MIN_ENTRY_FEE,
};

proptest! {
    /// With zero paid joins the price is the (normalized) base.
    #[test]
    fn price_at_zero_joins_is_base(
        units in 1u128..1_000_000_000_000,
        rate in 1u32..50_000,
        exponential in any::<bool>(),
    ) {
        let base = units * ENTRY_FEE_DENOMINATION;
        let segment = if exponential {
            CurveSegment::exponential(rate, 0)
        } else {
            CurveSegment::linear(rate, 0)
        };
        let curve = FeeCurve::new(vec![segment]).unwrap();
        prop_assert_eq!(curve.price_at(base, 0), base);
    }

    /// Linear re-anchoring recovers the base exactly when the forward step is exact.
    #[test]
    fn linear_roundtrip_exact(
        k in 1u128..1_000_000,
        rate in 1u32..1_000,
        joins in 0u64..1_000,
    ) {
        // base a multiple of 10 * 10_000 keeps every forward product integral
        let base = k * 100_000;
        let curve = FeeCurve::new(vec![CurveSegment::linear(rate, 0)]).unwrap();
        let price = curve.price_at(base, joins);
        prop_assert_eq!(curve.base_for(joins, price), base);
    }

    /// Re-anchoring at the current price reproduces that price exactly.
    #[test]
    fn exponential_roundtrip_keeps_price(
        units in 1u128..100_000_000_000,
        rate in 1u32..20_000,
        joins in 0u64..20,
    ) {
        let base = units * ENTRY_FEE_DENOMINATION;
        let curve = FeeCurve::new(vec![CurveSegment::exponential(rate, 0)]).unwrap();
        let price = curve.price_at(base, joins);
        let recovered = curve.base_for(joins, price);
        prop_assert_eq!(curve.price_at(recovered, joins), price,
            "base {} recovered {}", base, recovered);
    }

    /// Same for multi-segment curves and targets the old anchor never produced.
    #[test]
    fn segmented_reanchor_hits_any_reachable_price(
        target_units in 1u128..10_000_000,
        len in 1u64..10,
        head_rate in 1u32..2_000,
        tail_rate in 5_000u32..15_000,
        joins in 0u64..30,
    ) {
        let curve = FeeCurve::new(vec![
            CurveSegment::linear(head_rate, len),
            CurveSegment::exponential(tail_rate, 0),
        ]).unwrap();
        let target = curve.price_at(target_units * ENTRY_FEE_DENOMINATION, joins);
        let base = curve.base_for(joins, target);
        prop_assert_eq!(base % ENTRY_FEE_DENOMINATION, 0);
        prop_assert_eq!(curve.price_at(base, joins), target);
    }

    /// A decaying curve never prices below the minimum.
    #[test]
    fn decaying_curve_respects_floor(
        base_units in 1u128..1_000_000,
        rate in 1u32..10_000,
        joins in 0u64..u64::MAX,
    ) {
        let curve = FeeCurve::new(vec![CurveSegment::exponential(rate, 0)]).unwrap();
        let price = curve.price_at(base_units * ENTRY_FEE_DENOMINATION, joins);
        prop_assert!(price >= MIN_ENTRY_FEE);
        prop_assert_eq!(price % ENTRY_FEE_DENOMINATION, 0);
    }

    /// A growing curve never exceeds the ceiling nor drops below its base.
    #[test]
    fn growing_curve_stays_within_bounds(
        base_units in 1u128..1_000_000,
        rate in 10_001u32..100_000,
        joins in 0u64..10_000,
    ) {
        let curve = FeeCurve::new(vec![CurveSegment::exponential(rate, 0)]).unwrap();
        let base = base_units * ENTRY_FEE_DENOMINATION;
        let price = curve.price_at(base, joins);
        prop_assert!(price <= MAX_ENTRY_FEE);
        prop_assert!(price >= base);
    }

    /// Multi-segment curves only ever read the segments the join count reaches.
    #[test]
    fn later_segments_do_not_affect_earlier_prices(
        len in 1u64..50,
        joins in 0u64..50,
        tail_rate in 1u32..5_000,
    ) {
        let head = CurveSegment::linear(200, len);
        let a = FeeCurve::new(vec![head, CurveSegment::flat()]).unwrap();
        let b = FeeCurve::new(vec![head, CurveSegment::exponential(tail_rate, 0)]).unwrap();
        if joins <= len {
            prop_assert_eq!(a.price_at(1_000_000, joins), b.price_at(1_000_000, joins));
        }
    }
}
