//! Route session: turns (start, destination, signals) changes into route
//! requests and their results into exactly one overlay.
//!
//! The session never awaits. [`RouteSession::update`] hands back a
//! [`RouteTicket`]; the caller resolves the ticket's waypoints however it likes
//! and reports back through [`RouteSession::complete`]. Each ticket carries the
//! sequence number it was issued under, and only the latest sequence may touch
//! the overlay. Older answers are dropped as stale.

use crate::error::RoutingBackendError;
use crate::models::{GeoPoint, RouteResult, SignalCandidate, WaypointList};
use crate::overlay::{MapSurface, OverlayHandle, RouteOverlayManager};
use crate::waypoints;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Composing,
    Requesting { sequence: u64 },
    Displayed { sequence: u64 },
}

/// A request the caller must resolve and report back.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTicket {
    pub sequence: u64,
    pub waypoints: WaypointList,
}

/// What happened to a reported result.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Displayed(OverlayHandle),
    Failed(RoutingBackendError),
    /// A newer request was issued, or the session was cancelled.
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
struct RouteInputs {
    start: GeoPoint,
    destination: GeoPoint,
    candidates: Vec<SignalCandidate>,
}

pub struct RouteSession<S: MapSurface> {
    overlay: RouteOverlayManager<S>,
    state: SessionState,
    sequence: u64,
    inputs: Option<RouteInputs>,
    last_error: Option<RoutingBackendError>,
}

impl<S: MapSurface> RouteSession<S> {
    pub fn new(surface: S) -> Self {
        RouteSession {
            overlay: RouteOverlayManager::new(surface),
            state: SessionState::Idle,
            sequence: 0,
            inputs: None,
            last_error: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Sequence number of the newest issued request.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn overlay(&self) -> &RouteOverlayManager<S> {
        &self.overlay
    }

    pub fn last_error(&self) -> Option<&RoutingBackendError> {
        self.last_error.as_ref()
    }

    /// React to a change of the route inputs.
    ///
    /// Returns a ticket when a new request must be resolved. An endpoint
    /// becoming undefined cancels back to `Idle`; an unchanged triple is a
    /// no-op; any other change supersedes the current route from scratch.
    pub fn update(
        &mut self,
        start: Option<GeoPoint>,
        destination: Option<GeoPoint>,
        candidates: &[SignalCandidate],
    ) -> Option<RouteTicket> {
        let (Some(start), Some(destination)) = (start, destination) else {
            if self.inputs.is_some() || self.state != SessionState::Idle {
                self.teardown();
            }
            return None;
        };

        let inputs = RouteInputs {
            start,
            destination,
            candidates: candidates.to_vec(),
        };
        if self.inputs.as_ref() == Some(&inputs) {
            return None;
        }

        // Superseded: the old route no longer matches what the user asked for.
        self.overlay.clear();
        self.inputs = Some(inputs);
        self.issue()
    }

    /// Re-issue the current request. The displayed route, if any, stays up
    /// until the new answer replaces it.
    pub fn retry(&mut self) -> Option<RouteTicket> {
        self.issue()
    }

    fn issue(&mut self) -> Option<RouteTicket> {
        let inputs = self.inputs.as_ref()?;

        self.state = SessionState::Composing;
        let waypoints = waypoints::compose(inputs.start, inputs.destination, &inputs.candidates);

        self.sequence += 1;
        self.last_error = None;
        self.state = SessionState::Requesting {
            sequence: self.sequence,
        };
        tracing::debug!(
            sequence = self.sequence,
            waypoints = waypoints.len(),
            signals = waypoints.signals().len(),
            "route request issued"
        );

        Some(RouteTicket {
            sequence: self.sequence,
            waypoints,
        })
    }

    /// Report the outcome of the request issued under `sequence`.
    pub fn complete(
        &mut self,
        sequence: u64,
        outcome: Result<RouteResult, RoutingBackendError>,
    ) -> Completion {
        if self.state != (SessionState::Requesting { sequence }) {
            tracing::debug!(
                sequence,
                current = self.sequence,
                "dropping stale route response"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(result) => {
                let handle = self.overlay.display(&result);
                self.state = SessionState::Displayed { sequence };
                Completion::Displayed(handle)
            }
            Err(err) => {
                tracing::warn!(sequence, error = %err, "route request failed");
                self.state = match self.overlay.handle() {
                    // keep showing the last good route
                    Some(_) => SessionState::Displayed { sequence },
                    None => SessionState::Idle,
                };
                self.last_error = Some(err.clone());
                Completion::Failed(err)
            }
        }
    }

    /// The user closed the overlay. Inputs are remembered so the same triple
    /// does not route again until it changes.
    pub fn dismiss(&mut self) {
        self.cancel();
        tracing::debug!(sequence = self.sequence, "route dismissed");
    }

    /// The owning view is going away, or an endpoint became undefined.
    pub fn teardown(&mut self) {
        self.cancel();
        self.inputs = None;
        tracing::debug!(sequence = self.sequence, "route session torn down");
    }

    fn cancel(&mut self) {
        self.overlay.clear();
        // Any in-flight response now fails the sequence check.
        if matches!(self.state, SessionState::Requesting { .. }) {
            self.sequence += 1;
        }
        self.state = SessionState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstructionStep;
    use crate::overlay::OverlayScene;

    const START: GeoPoint = GeoPoint::new(40.7000, -74.0000);
    const DEST: GeoPoint = GeoPoint::new(40.7100, -74.0000);
    const OTHER_DEST: GeoPoint = GeoPoint::new(40.7200, -73.9950);

    fn route_to(end: GeoPoint, steps: usize) -> RouteResult {
        RouteResult {
            geometry: vec![START, end],
            instructions: (0..steps)
                .map(|_| InstructionStep {
                    maneuver: Some("continue".to_string()),
                    ..Default::default()
                })
                .collect(),
        }
    }

    fn session() -> RouteSession<OverlayScene> {
        RouteSession::new(OverlayScene::default())
    }

    fn displayed_end(s: &RouteSession<OverlayScene>) -> Option<GeoPoint> {
        s.overlay()
            .surface()
            .route_geometry()
            .and_then(|g| g.last().copied())
    }

    #[test]
    fn test_idle_until_both_endpoints_defined() {
        let mut s = session();
        assert!(s.update(Some(START), None, &[]).is_none());
        assert!(s.update(None, Some(DEST), &[]).is_none());
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.sequence(), 0);
    }

    #[test]
    fn test_happy_path() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        assert_eq!(ticket.waypoints.points(), &[START, DEST]);
        assert_eq!(
            s.state(),
            SessionState::Requesting {
                sequence: ticket.sequence
            }
        );

        let completion = s.complete(ticket.sequence, Ok(route_to(DEST, 2)));
        assert!(matches!(completion, Completion::Displayed(_)));
        assert_eq!(
            s.state(),
            SessionState::Displayed {
                sequence: ticket.sequence
            }
        );
        assert_eq!(displayed_end(&s), Some(DEST));
    }

    #[test]
    fn test_unchanged_inputs_do_not_reissue() {
        let mut s = session();
        let candidates = vec![SignalCandidate::new("s1", GeoPoint::new(40.705, -74.0))];
        let ticket = s.update(Some(START), Some(DEST), &candidates).unwrap();
        s.complete(ticket.sequence, Ok(route_to(DEST, 1)));
        assert!(s.update(Some(START), Some(DEST), &candidates).is_none());
        assert!(s.overlay().is_displayed());
    }

    #[test]
    fn test_candidate_change_recomposes() {
        let mut s = session();
        let first = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(first.sequence, Ok(route_to(DEST, 1)));

        let candidates = vec![SignalCandidate::new("s1", GeoPoint::new(40.705, -74.0))];
        let second = s.update(Some(START), Some(DEST), &candidates).unwrap();
        assert_eq!(second.waypoints.len(), 3);
        assert!(second.sequence > first.sequence);
    }

    #[test]
    fn test_slow_first_response_cannot_clobber_newer_route() {
        let mut s = session();
        let first = s.update(Some(START), Some(DEST), &[]).unwrap();
        let second = s.update(Some(START), Some(OTHER_DEST), &[]).unwrap();

        // fast second answer lands first
        let c2 = s.complete(second.sequence, Ok(route_to(OTHER_DEST, 1)));
        assert!(matches!(c2, Completion::Displayed(_)));
        let handle = s.overlay().handle();

        // slow first answer arrives late
        let c1 = s.complete(first.sequence, Ok(route_to(DEST, 1)));
        assert_eq!(c1, Completion::Stale);
        assert_eq!(displayed_end(&s), Some(OTHER_DEST));
        assert_eq!(s.overlay().handle(), handle);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut s = session();
        let first = s.update(Some(START), Some(DEST), &[]).unwrap();
        let second = s.update(Some(START), Some(OTHER_DEST), &[]).unwrap();
        let c = s.complete(first.sequence, Err(RoutingBackendError::MissingGeometry));
        assert_eq!(c, Completion::Stale);
        assert!(s.last_error().is_none());
        assert_eq!(
            s.state(),
            SessionState::Requesting {
                sequence: second.sequence
            }
        );
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(ticket.sequence, Ok(route_to(DEST, 1)));
        assert_eq!(
            s.complete(ticket.sequence, Ok(route_to(OTHER_DEST, 1))),
            Completion::Stale
        );
        assert_eq!(displayed_end(&s), Some(DEST));
    }

    #[test]
    fn test_superseding_clears_displayed_route() {
        let mut s = session();
        let first = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(first.sequence, Ok(route_to(DEST, 1)));
        assert!(s.overlay().is_displayed());

        s.update(Some(START), Some(OTHER_DEST), &[]).unwrap();
        assert!(!s.overlay().is_displayed());
        assert!(s.overlay().surface().is_empty());
    }

    #[test]
    fn test_failure_without_prior_route_returns_to_idle() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        let err = RoutingBackendError::Transport("connection refused".to_string());
        assert_eq!(
            s.complete(ticket.sequence, Err(err.clone())),
            Completion::Failed(err.clone())
        );
        assert_eq!(s.state(), SessionState::Idle);
        assert_eq!(s.last_error(), Some(&err));
        assert!(s.overlay().surface().is_empty());
    }

    #[test]
    fn test_failed_retry_keeps_last_good_route() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(ticket.sequence, Ok(route_to(DEST, 1)));

        let retry = s.retry().unwrap();
        assert!(s.overlay().is_displayed());
        let c = s.complete(
            retry.sequence,
            Err(RoutingBackendError::Timeout { millis: 10_000 }),
        );
        assert!(matches!(c, Completion::Failed(_)));
        assert_eq!(
            s.state(),
            SessionState::Displayed {
                sequence: retry.sequence
            }
        );
        assert_eq!(displayed_end(&s), Some(DEST));
    }

    #[test]
    fn test_retry_after_failure() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(ticket.sequence, Err(RoutingBackendError::Status { status: 502 }));

        let retry = s.retry().unwrap();
        assert!(s.last_error().is_none());
        assert!(matches!(
            s.complete(retry.sequence, Ok(route_to(DEST, 0))),
            Completion::Displayed(_)
        ));
    }

    #[test]
    fn test_retry_without_inputs() {
        let mut s = session();
        assert!(s.retry().is_none());
    }

    #[test]
    fn test_endpoint_becoming_undefined_clears_and_cancels() {
        let mut s = session();
        let first = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(first.sequence, Ok(route_to(DEST, 1)));
        let pending = s.update(Some(START), Some(OTHER_DEST), &[]).unwrap();

        assert!(s.update(Some(START), None, &[]).is_none());
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.overlay().surface().is_empty());
        assert_eq!(
            s.complete(pending.sequence, Ok(route_to(OTHER_DEST, 1))),
            Completion::Stale
        );
        assert!(s.overlay().surface().is_empty());

        // same endpoints again route anew
        assert!(s.update(Some(START), Some(OTHER_DEST), &[]).is_some());
    }

    #[test]
    fn test_dismiss_clears_and_remembers_inputs() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.complete(ticket.sequence, Ok(route_to(DEST, 1)));

        s.dismiss();
        assert_eq!(s.state(), SessionState::Idle);
        assert!(s.overlay().surface().is_empty());
        assert!(s.update(Some(START), Some(DEST), &[]).is_none());
        assert!(s.update(Some(START), Some(OTHER_DEST), &[]).is_some());
    }

    #[test]
    fn test_teardown_cancels_in_flight_request() {
        let mut s = session();
        let ticket = s.update(Some(START), Some(DEST), &[]).unwrap();
        s.teardown();
        assert_eq!(
            s.complete(ticket.sequence, Ok(route_to(DEST, 1))),
            Completion::Stale
        );
        assert!(s.overlay().surface().is_empty());
    }
}
