use dioxus::html::geometry::WheelDelta;
use dioxus::html::input_data::MouseButton;
use dioxus::prelude::*;

use accessable_shared::models::{CatalogLocation, LocationType};
use accessable_shared::GeoPoint;

use crate::projection::{self, Viewport};

const MAP_CONTAINER_ID: &str = "accessable-map-container";

/// Drag threshold in pixels; movement below this is a click.
const DRAG_THRESHOLD: f64 = 3.0;

/// A click within this many screen pixels of a marker selects it.
const MARKER_HIT_PX: f64 = 14.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementMode {
    Start,
    Destination,
}

fn marker_color(kind: LocationType) -> &'static str {
    match kind {
        LocationType::Beach => "#e0a526",
        LocationType::Playground => "#3fa34d",
        LocationType::PedestrianSignal => "#d9480f",
        LocationType::SubwayStop => "#1c6fd1",
        LocationType::Restroom => "#8e44ad",
        LocationType::Other => "#6c757d",
    }
}

fn marker_glyph(kind: LocationType) -> &'static str {
    match kind {
        LocationType::Beach => "B",
        LocationType::Playground => "P",
        LocationType::PedestrianSignal => "S",
        LocationType::SubwayStop => "M",
        LocationType::Restroom => "R",
        LocationType::Other => "?",
    }
}

/// Get the bounding client rect of the map container element.
fn container_rect() -> Option<web_sys::DomRect> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(MAP_CONTAINER_ID)?;
    Some(element.get_bounding_client_rect())
}

/// Keep the viewport's size in step with the container.
fn sync_size(viewport: &mut Signal<Viewport>) {
    if let Some(rect) = container_rect() {
        let (w, h) = (rect.width(), rect.height());
        let current = *viewport.peek();
        if (current.width - w).abs() > 0.5 || (current.height - h).abs() > 0.5 {
            viewport.write().resize(w, h);
        }
    }
}

/// Convert a wheel delta (pixels / lines / pages) to a uniform pixel-like value.
fn wheel_delta_y(delta: WheelDelta) -> f64 {
    match delta {
        WheelDelta::Pixels(d) => d.y,
        WheelDelta::Lines(d) => d.y * 40.0,
        WheelDelta::Pages(d) => d.y * 400.0,
    }
}

/// Find the index of the nearest position within `threshold` (Euclidean distance).
fn find_nearest(positions: &[(f64, f64)], click: (f64, f64), threshold: f64) -> Option<usize> {
    let mut best_idx = None;
    let mut best_dist = threshold;
    for (i, pos) in positions.iter().enumerate() {
        let dx = pos.0 - click.0;
        let dy = pos.1 - click.1;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < best_dist {
            best_dist = dist;
            best_idx = Some(i);
        }
    }
    best_idx
}

/// Screen positions of the markers that have coordinates, paired with their index.
fn marker_positions(
    viewport: &Viewport,
    markers: &[CatalogLocation],
) -> Vec<(usize, (f64, f64))> {
    markers
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.point().map(|p| (i, viewport.screen_position(p))))
        .collect()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn build_overlay_svg(
    viewport: &Viewport,
    markers: &[CatalogLocation],
    start: Option<GeoPoint>,
    destination: Option<GeoPoint>,
    route: Option<&[GeoPoint]>,
    selected_id: Option<&str>,
) -> String {
    let mut svg = String::with_capacity(4096);
    if let Some(path) = route {
        build_route_line(&mut svg, viewport, path);
    }
    build_location_markers(&mut svg, viewport, markers, selected_id);
    if let Some(p) = start {
        build_endpoint(&mut svg, viewport, p, "A", "#2b8a3e");
    }
    if let Some(p) = destination {
        build_endpoint(&mut svg, viewport, p, "B", "#c92a2a");
    }
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" style="position:absolute;top:0;left:0;pointer-events:none;">{svg}</svg>"#,
        w = viewport.width,
        h = viewport.height,
    )
}

fn build_route_line(svg: &mut String, viewport: &Viewport, path: &[GeoPoint]) {
    if path.len() < 2 {
        return;
    }
    let points = path
        .iter()
        .map(|p| {
            let (x, y) = viewport.screen_position(*p);
            format!("{x:.1},{y:.1}")
        })
        .collect::<Vec<_>>()
        .join(" ");
    svg.push_str(&format!(
        r##"<polyline points="{points}" fill="none" stroke="white" stroke-width="9" stroke-linejoin="round" stroke-linecap="round" opacity="0.8"/>"##
    ));
    svg.push_str(&format!(
        r##"<polyline points="{points}" fill="none" stroke="#1971c2" stroke-width="5" stroke-linejoin="round" stroke-linecap="round"/>"##
    ));
}

fn build_location_markers(
    svg: &mut String,
    viewport: &Viewport,
    markers: &[CatalogLocation],
    selected_id: Option<&str>,
) {
    for m in markers {
        let Some(p) = m.point() else { continue };
        let (x, y) = viewport.screen_position(p);
        if x < -20.0 || y < -20.0 || x > viewport.width + 20.0 || y > viewport.height + 20.0 {
            continue;
        }
        let color = marker_color(m.location_type);
        let glyph = marker_glyph(m.location_type);
        let title = escape_xml(&m.name);
        let ty = y + 4.0;
        svg.push_str(&format!(r##"<g role="img"><title>{title}</title>"##));
        svg.push_str(&format!(
            r##"<circle cx="{x:.1}" cy="{y:.1}" r="10" fill="{color}" stroke="white" stroke-width="2"/>"##
        ));
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="{ty:.1}" fill="white" font-size="11" font-family="sans-serif" font-weight="700" text-anchor="middle">{glyph}</text>"##
        ));
        if selected_id == Some(m.id.as_str()) {
            svg.push_str(&format!(
                r##"<circle cx="{x:.1}" cy="{y:.1}" r="15" fill="none" stroke="#ffd43b" stroke-width="3"/>"##
            ));
        }
        svg.push_str("</g>");
    }
}

fn build_endpoint(svg: &mut String, viewport: &Viewport, p: GeoPoint, label: &str, color: &str) {
    let (x, y) = viewport.screen_position(p);
    let head = y - 22.0;
    let ty = head + 5.0;
    svg.push_str(&format!(
        r##"<g role="img"><title>{label}</title><path d="M{x:.1},{y:.1} L{lx:.1},{head:.1} A12,12 0 1,1 {rx:.1},{head:.1} Z" fill="{color}" stroke="white" stroke-width="2"/><text x="{x:.1}" y="{ty:.1}" fill="white" font-size="13" font-family="sans-serif" font-weight="700" text-anchor="middle">{label}</text></g>"##,
        lx = x - 10.0,
        rx = x + 10.0,
    ));
}

#[component]
pub fn MapView(
    viewport: Signal<Viewport>,
    markers: Vec<CatalogLocation>,
    placement_mode: Signal<PlacementMode>,
    start: Signal<Option<GeoPoint>>,
    destination: Signal<Option<GeoPoint>>,
    selected_location: Signal<Option<CatalogLocation>>,
    route_geometry: Option<Vec<GeoPoint>>,
) -> Element {
    use_effect(move || sync_size(&mut viewport));

    let mut is_dragging = use_signal(|| false);
    let mut did_drag = use_signal(|| false);
    let mut drag_last = use_signal(|| (0.0_f64, 0.0_f64));

    let vp = *viewport.read();
    let tiles = vp.visible_tiles();
    let selected_id = selected_location.read().as_ref().map(|l| l.id.clone());
    let svg_html = build_overlay_svg(
        &vp,
        &markers,
        *start.read(),
        *destination.read(),
        route_geometry.as_deref(),
        selected_id.as_deref(),
    );

    let container_class = if *is_dragging.read() && *did_drag.read() {
        "map-container dragging"
    } else {
        "map-container"
    };

    rsx! {
        div {
            id: MAP_CONTAINER_ID,
            class: "{container_class}",

            onwheel: move |evt: Event<WheelData>| {
                evt.prevent_default();
                sync_size(&mut viewport);

                let delta_y = wheel_delta_y(evt.data().delta());
                if delta_y == 0.0 {
                    return;
                }
                let Some(rect) = container_rect() else { return };
                let client = evt.data().client_coordinates();
                let (cx, cy) =
                    projection::client_to_container(client.x, client.y, rect.left(), rect.top());

                let current = viewport.peek().zoom;
                let next = if delta_y < 0.0 {
                    current.saturating_add(1)
                } else {
                    current.saturating_sub(1)
                };
                viewport.write().zoom_at(next, cx, cy);
            },

            onmousedown: move |evt: Event<MouseData>| {
                if evt.trigger_button() != Some(MouseButton::Primary) {
                    return;
                }
                sync_size(&mut viewport);
                let client = evt.client_coordinates();
                is_dragging.set(true);
                did_drag.set(false);
                drag_last.set((client.x, client.y));
            },

            onmousemove: move |evt: Event<MouseData>| {
                if !*is_dragging.read() {
                    return;
                }
                let client = evt.client_coordinates();
                let (lx, ly) = *drag_last.read();
                let (dx, dy) = (client.x - lx, client.y - ly);

                if !*did_drag.read() && (dx.abs() > DRAG_THRESHOLD || dy.abs() > DRAG_THRESHOLD) {
                    did_drag.set(true);
                }
                if *did_drag.read() {
                    viewport.write().pan_by(dx, dy);
                    drag_last.set((client.x, client.y));
                }
            },

            onmouseup: move |evt: Event<MouseData>| {
                let was_dragging = *is_dragging.read();
                let was_drag = *did_drag.read();
                is_dragging.set(false);

                // A mouseup without drag movement = a click
                if !was_dragging || was_drag {
                    return;
                }
                let Some(rect) = container_rect() else { return };
                let client = evt.client_coordinates();
                let click =
                    projection::client_to_container(client.x, client.y, rect.left(), rect.top());
                let vp = *viewport.peek();

                let hits = marker_positions(&vp, &markers);
                let screen: Vec<(f64, f64)> = hits.iter().map(|(_, pos)| *pos).collect();
                if let Some(hit) = find_nearest(&screen, click, MARKER_HIT_PX) {
                    let location = markers[hits[hit].0].clone();
                    if let Some(point) = location.point() {
                        dioxus::logger::tracing::debug!(id = %location.id, "marker selected as destination");
                        destination.set(Some(point));
                        selected_location.set(Some(location));
                    }
                    return;
                }

                let point = vp.geo_at(click.0, click.1);
                let mode = *placement_mode.read();
                match mode {
                    PlacementMode::Start => {
                        start.set(Some(point));
                        placement_mode.set(PlacementMode::Destination);
                    }
                    PlacementMode::Destination => destination.set(Some(point)),
                }
            },

            onmouseleave: move |_| {
                is_dragging.set(false);
            },

            div { class: "map-tiles",
                for tile in tiles {
                    img {
                        key: "{tile.url}:{tile.left}",
                        src: "{tile.url}",
                        draggable: "false",
                        style: "left:{tile.left}px;top:{tile.top}px;",
                    }
                }
            }

            div {
                class: "map-overlay",
                dangerous_inner_html: "{svg_html}",
            }

            div { class: "map-attribution",
                "© OpenStreetMap contributors"
            }
        }
    }
}
