//! Viseme scheduling: which marker is active at a given playback time

use crate::visemes::{Viseme, VisemeMap};
use visage_core::{Marker, MarkerSequence};

/// Find the marker whose interval contains `current_ms`
///
/// Marker `i` covers `[markers[i].time_ms, markers[i + 1].time_ms)`. The last
/// marker covers `[time_ms, end_ms]`, or runs forever when `end_ms` is `None`.
/// Returns `None` before the first marker, after `end_ms`, for an empty
/// sequence and for a non-finite time.
pub fn active_marker(markers: &MarkerSequence, current_ms: f64, end_ms: Option<f64>) -> Option<&Marker> {
    if !current_ms.is_finite() {
        return None;
    }

    let slice = markers.as_slice();
    // Markers are ascending, so this counts every marker that has started.
    // A time equal to a start lands on that marker; with duplicate timestamps
    // the last duplicate wins since the earlier ones cover an empty interval.
    let started = slice.partition_point(|m| m.time_ms as f64 <= current_ms);
    if started == 0 {
        return None;
    }

    if started == slice.len() {
        if let Some(end_ms) = end_ms {
            if current_ms > end_ms {
                return None;
            }
        }
    }

    slice.get(started - 1)
}

/// Viseme to show at `current_ms`; unmapped symbols yield `None`
pub fn active_viseme(
    map: &VisemeMap,
    markers: &MarkerSequence,
    current_ms: f64,
    end_ms: Option<f64>,
) -> Option<Viseme> {
    active_marker(markers, current_ms, end_ms).and_then(|marker| map.lookup(&marker.symbol))
}
