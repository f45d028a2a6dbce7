use std::collections::HashSet;

use crate::geo;
use crate::models::{GeoPoint, SignalCandidate, SignalId, WaypointList};

/// Build the ordered waypoint list from `start` to `destination`, routing
/// through pedestrian-signal crossings where they make progress.
///
/// Greedy walk: from the current point, hop to the nearest unvisited signal
/// that is strictly closer to the destination than the current point is.
/// Stops when no signal qualifies. Ties keep the first candidate in slice
/// order. Each hop consumes one unvisited identity, so the loop runs at most
/// `candidates.len() + 1` times, duplicate coordinates included.
pub fn compose(
    start: GeoPoint,
    destination: GeoPoint,
    candidates: &[SignalCandidate],
) -> WaypointList {
    let mut current = start;
    let mut visited: HashSet<&SignalId> = HashSet::new();
    let mut points = vec![start];
    let mut signals = Vec::new();

    while let Some(next) = next_signal(current, destination, candidates, &visited) {
        tracing::trace!(signal = %next.id, point = %next.point, "waypoint via signal");
        visited.insert(&next.id);
        signals.push(next.id.clone());
        points.push(next.point);
        current = next.point;
    }

    points.push(destination);
    WaypointList::from_parts(points, signals)
}

/// Nearest unvisited candidate that makes progress towards `destination`.
fn next_signal<'a>(
    current: GeoPoint,
    destination: GeoPoint,
    candidates: &'a [SignalCandidate],
    visited: &HashSet<&SignalId>,
) -> Option<&'a SignalCandidate> {
    let remaining = geo::distance_m(current, destination);
    let mut best: Option<(&SignalCandidate, f64)> = None;

    for candidate in candidates {
        if visited.contains(&candidate.id) {
            continue;
        }
        if geo::distance_m(candidate.point, destination) >= remaining {
            continue;
        }
        let hop = geo::distance_m(current, candidate.point);
        // strict: an equal hop keeps the earlier candidate
        if best.is_none_or(|(_, best_hop)| hop < best_hop) {
            best = Some((candidate, hop));
        }
    }

    best.map(|(candidate, _)| candidate)
}
