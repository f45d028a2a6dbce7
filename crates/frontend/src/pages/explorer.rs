use dioxus::logger::tracing;
use dioxus::prelude::*;

use accessable_shared::center::{MapCenterController, RecenterTrigger};
use accessable_shared::geo::NYC;
use accessable_shared::models::{self, CatalogLocation, LocationType, NEARBY_RADIUS_M};
use accessable_shared::overlay::OverlayScene;
use accessable_shared::session::{Completion, RouteSession, RouteTicket, SessionState};
use accessable_shared::GeoPoint;

use crate::api;
use crate::components::error_toast::{toast_text, ErrorToast, Toast};
use crate::components::filter_bar::FilterBar;
use crate::components::map_view::{MapView, PlacementMode};
use crate::components::route_panel::RoutePanel;
use crate::components::search_box::SearchBox;
use crate::projection::Viewport;

const INITIAL_ZOOM: u8 = 13;

/// Markers to draw: the category filter, then the nearby restriction when active.
fn visible_markers(
    locations: &[CatalogLocation],
    filter: Option<LocationType>,
    nearby: Option<&[CatalogLocation]>,
) -> Vec<CatalogLocation> {
    locations
        .iter()
        .filter(|l| filter.is_none_or(|t| l.location_type == t))
        .filter(|l| nearby.is_none_or(|set| set.iter().any(|n| n.id == l.id)))
        .cloned()
        .collect()
}

fn nearby_trigger(members: &[CatalogLocation]) -> RecenterTrigger {
    RecenterTrigger::NearbySetChanged(members.iter().map(CatalogLocation::point).collect())
}

/// Resolve `ticket` in the background and report the outcome to the session.
fn dispatch(
    mut session: Signal<RouteSession<OverlayScene>>,
    mut toast: Signal<Option<Toast>>,
    ticket: RouteTicket,
) {
    spawn(async move {
        let outcome = api::resolve_route(&ticket.waypoints).await;
        let completion = session.write().complete(ticket.sequence, outcome);
        match completion {
            Completion::Displayed(_) => {
                tracing::debug!(sequence = ticket.sequence, "route displayed");
            }
            Completion::Failed(err) => {
                toast.set(Some(Toast {
                    id: ticket.sequence,
                    text: toast_text(&err),
                }));
            }
            Completion::Stale => {}
        }
    });
}

#[component]
pub fn Explorer() -> Element {
    let locations_resource = use_resource(|| api::fetch_locations());

    let mut viewport = use_signal(|| Viewport::new(NYC.fallback_center, INITIAL_ZOOM));
    let mut placement_mode = use_signal(|| PlacementMode::Start);
    let mut start = use_signal(|| None::<GeoPoint>);
    let mut destination = use_signal(|| None::<GeoPoint>);
    let filter = use_signal(|| None::<LocationType>);
    let mut nearby_only = use_signal(|| false);
    let mut selected_location = use_signal(|| None::<CatalogLocation>);
    let mut session = use_signal(|| RouteSession::new(OverlayScene::default()));
    let toast = use_signal(|| None::<Toast>);

    let locations = use_memo(move || match &*locations_resource.read() {
        Some(Ok(all)) => all.clone(),
        Some(Err(e)) => {
            tracing::error!(error = %e, "failed to load locations");
            Vec::new()
        }
        None => Vec::new(),
    });
    let candidates = use_memo(move || models::signal_candidates(&locations.read()));
    let nearby_set = use_memo(move || {
        let origin = (*start.read())?;
        let all = locations.read();
        Some(
            models::nearby(&all, origin, NEARBY_RADIUS_M)
                .into_iter()
                .cloned()
                .collect::<Vec<_>>(),
        )
    });

    // Any change of the route inputs supersedes the current route.
    use_effect(move || {
        let start = *start.read();
        let destination = *destination.read();
        let candidates = candidates.read();
        let ticket = session.write().update(start, destination, &candidates);
        if let Some(ticket) = ticket {
            dispatch(session, toast, ticket);
        }
    });

    use_effect(move || {
        if let Some(members) = nearby_set.read().as_ref() {
            let trigger = nearby_trigger(members);
            MapCenterController::new(NYC).recenter(&mut *viewport.write(), &trigger);
        }
    });

    use_drop(move || {
        if let Ok(mut s) = session.try_write() {
            s.teardown();
        }
    });

    let nearby_members = nearby_set.read().clone();
    let nearby_filter = if *nearby_only.read() {
        nearby_members.as_deref()
    } else {
        None
    };
    let markers = visible_markers(&locations.read(), *filter.read(), nearby_filter);

    let (route_geometry, panel, dismissable, requesting, can_retry) = {
        let s = session.read();
        let scene = s.overlay().surface();
        (
            scene.route_geometry().map(<[GeoPoint]>::to_vec),
            scene.panel().cloned(),
            scene.has_dismiss_control(),
            matches!(s.state(), SessionState::Requesting { .. }),
            s.last_error().is_some(),
        )
    };

    let mode = *placement_mode.read();
    let has_endpoints = start.read().is_some() || destination.read().is_some();

    rsx! {
        div { class: "app",
            div { class: "header",
                h1 { "AccessAble Map" }
                div { class: "placement-mode",
                    button {
                        class: if mode == PlacementMode::Start { "active-start" } else { "" },
                        onclick: move |_| placement_mode.set(PlacementMode::Start),
                        "Start"
                    }
                    button {
                        class: if mode == PlacementMode::Destination { "active-destination" } else { "" },
                        onclick: move |_| placement_mode.set(PlacementMode::Destination),
                        "Destination"
                    }
                    if has_endpoints {
                        button {
                            class: "secondary",
                            onclick: move |_| {
                                start.set(None);
                                destination.set(None);
                                placement_mode.set(PlacementMode::Start);
                            },
                            "Clear route"
                        }
                    }
                }
            }

            div { class: "sidebar",
                SearchBox {
                    on_select: move |loc: CatalogLocation| {
                        nearby_only.set(false);
                        if let Some(point) = loc.point() {
                            let trigger = RecenterTrigger::SearchLocationChanged(point);
                            MapCenterController::new(NYC).recenter(&mut *viewport.write(), &trigger);
                        }
                        selected_location.set(Some(loc));
                    },
                    on_clear: move |_| selected_location.set(None),
                }

                FilterBar {
                    filter: filter,
                    nearby_only: nearby_only,
                    nearby_available: nearby_members.is_some(),
                }

                if let Some(loc) = selected_location.read().clone() {
                    div { class: "panel selected-location",
                        h3 { "{loc.name}" }
                        div { class: "muted", "{loc.location_type}" }
                        if let Some(borough) = &loc.borough {
                            div { "{borough}" }
                        }
                        if let Some(accessible) = &loc.accessible {
                            div { "Accessible: {accessible}" }
                        }
                        if let Some(point) = loc.point() {
                            button {
                                onclick: move |_| destination.set(Some(point)),
                                "Walk here"
                            }
                        }
                    }
                }

                RoutePanel {
                    panel: panel,
                    dismissable: dismissable,
                    requesting: requesting,
                    can_retry: can_retry,
                    on_dismiss: move |_| session.write().dismiss(),
                    on_retry: move |_| {
                        let ticket = session.write().retry();
                        if let Some(ticket) = ticket {
                            dispatch(session, toast, ticket);
                        }
                    },
                }
            }

            MapView {
                viewport: viewport,
                markers: markers,
                placement_mode: placement_mode,
                start: start,
                destination: destination,
                selected_location: selected_location,
                route_geometry: route_geometry,
            }

            ErrorToast { toast: toast }
        }
    }
}
