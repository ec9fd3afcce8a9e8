//! Property tests for viseme scheduling and blending

use proptest::prelude::*;
use visage_core::{Marker, MarkerSequence};
use visage_me::{active_marker, active_viseme, blend, Smoothing, VisemeMap};

const SYMBOLS: [&str; 12] = ["p", "t", "S", "i", "u", "a", "@", "e", "E", "o", "sil", "k"];

fn marker_sequence() -> impl Strategy<Value = MarkerSequence> {
    prop::collection::vec((0u64..400, 0usize..SYMBOLS.len()), 1..20).prop_map(|steps| {
        let mut time = 0;
        let markers = steps
            .into_iter()
            .map(|(gap, symbol)| {
                time += gap;
                Marker::new(time, SYMBOLS[symbol])
            })
            .collect();
        MarkerSequence::new(markers).unwrap()
    })
}

proptest! {
    #[test]
    fn prop_before_first_marker_is_none(markers in marker_sequence(), offset in 1u64..1000) {
        let first = markers.first().unwrap().time_ms as f64;
        let t = first - offset as f64;
        prop_assert!(active_marker(&markers, t, None).is_none());
    }

    #[test]
    fn prop_interval_maps_to_its_marker(markers in marker_sequence(), idx in 0usize..20, frac in 0.0f64..1.0) {
        let slice = markers.as_slice();
        prop_assume!(slice.len() >= 2);
        let i = idx % (slice.len() - 1);
        let start = slice[i].time_ms as f64;
        let end = slice[i + 1].time_ms as f64;
        prop_assume!(end > start);
        let t = start + (end - start) * frac;
        prop_assume!(t < end);

        let found = active_marker(&markers, t, None).unwrap();
        // With duplicate timestamps at `start`, the last duplicate owns the interval
        let owner = slice.iter().rposition(|m| m.time_ms as f64 <= t).unwrap();
        prop_assert_eq!(found, &slice[owner]);
        prop_assert_eq!(found.time_ms, slice[i].time_ms);
        if slice.iter().filter(|m| m.time_ms == slice[i].time_ms).count() == 1 {
            prop_assert_eq!(found, &slice[i]);
        }
    }

    #[test]
    fn prop_last_marker_runs_to_duration(markers in marker_sequence(), tail in 0u64..2000, frac in 0.0f64..=1.0) {
        let last = markers.last().unwrap();
        let end = (last.time_ms + tail) as f64;
        let t = last.time_ms as f64 + (end - last.time_ms as f64) * frac;
        prop_assert_eq!(active_marker(&markers, t, Some(end)), Some(last));
        prop_assert_eq!(active_marker(&markers, end, Some(end)), Some(last));
        prop_assert!(active_marker(&markers, end + 1.0, Some(end)).is_none());
    }

    #[test]
    fn prop_empty_sequence_is_none(t in -1e6f64..1e6, end in proptest::option::of(0.0f64..1e6)) {
        prop_assert!(active_marker(&MarkerSequence::empty(), t, end).is_none());
    }

    #[test]
    fn prop_unmapped_symbol_is_none(markers in marker_sequence(), t in 0.0f64..8000.0) {
        let map = VisemeMap::new();
        let marker = active_marker(&markers, t, None);
        let viseme = active_viseme(&map, &markers, t, None);
        match marker {
            Some(m) if m.symbol == "sil" || m.symbol == "k" => prop_assert!(viseme.is_none()),
            Some(_) => prop_assert!(viseme.is_some()),
            None => prop_assert!(viseme.is_none()),
        }
    }

    #[test]
    fn prop_blend_fixed_point(x in 0.0f32..=1.0, f in 0.01f32..0.99) {
        prop_assert_eq!(blend(x, x, Smoothing::Lerp(f)), x);
        prop_assert_eq!(blend(x, x, Smoothing::Off), x);
    }

    #[test]
    fn prop_blend_converges_without_overshoot(start in 0.0f32..=1.0, target in prop::bool::ANY, f in 0.01f32..0.99) {
        let target = if target { 1.0 } else { 0.0 };
        let mut current = start;
        let mut gap = (target - current).abs();
        for _ in 0..2000 {
            let next = blend(current, target, Smoothing::Lerp(f));
            let next_gap = (target - next).abs();
            prop_assert!(next_gap <= gap);
            if target == 1.0 {
                prop_assert!(next >= current && next <= 1.0);
            } else {
                prop_assert!(next <= current && next >= 0.0);
            }
            current = next;
            gap = next_gap;
        }
        prop_assert!(gap < 1e-3);
    }
}
