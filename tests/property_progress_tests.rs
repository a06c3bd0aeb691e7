use proptest::prelude::*;
use scroll_stage::core::{ScrollRange, boundary_progress, local_progress};

proptest! {
    #[test]
    fn local_progress_is_monotonic_and_clamped(
        start in -10_000.0f64..10_000.0,
        span in 0.001f64..10_000.0,
        a in -20_000.0f64..30_000.0,
        b in -20_000.0f64..30_000.0
    ) {
        let range = ScrollRange::new(start, start + span).expect("valid range");
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let p_low = local_progress(low, range);
        let p_high = local_progress(high, range);

        prop_assert!((0.0..=1.0).contains(&p_low));
        prop_assert!((0.0..=1.0).contains(&p_high));
        prop_assert!(p_low <= p_high);
    }

    #[test]
    fn boundaries_are_exact(
        start in -10_000.0f64..10_000.0,
        span in 0.001f64..10_000.0,
        overshoot in 0.001f64..10_000.0
    ) {
        let range = ScrollRange::new(start, start + span).expect("valid range");
        prop_assert_eq!(local_progress(range.start(), range), 0.0);
        prop_assert_eq!(local_progress(range.end(), range), 1.0);
        prop_assert_eq!(boundary_progress(range.start() - overshoot, range), Some(0.0));
        prop_assert_eq!(boundary_progress(range.end() + overshoot, range), Some(1.0));
        prop_assert_eq!(boundary_progress(range.center(), range), None);
    }

    #[test]
    fn degenerate_range_is_always_zero(
        at in -10_000.0f64..10_000.0,
        offset in -20_000.0f64..20_000.0
    ) {
        let range = ScrollRange::new(at, at).expect("degenerate range");
        prop_assert_eq!(local_progress(offset, range), 0.0);
    }
}
