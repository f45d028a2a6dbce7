//! Route overlay lifecycle on a map surface.
//!
//! An overlay is three surface elements (path layer, instruction panel,
//! dismiss control) that live and die together. [`RouteOverlayManager`] owns
//! its surface, so nothing else can add or remove them, and every `display`
//! replaces whatever was there before.

use crate::instructions;
use crate::models::{GeoPoint, RouteResult};

/// Identifier of one element added to a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub u64);

/// The map-rendering collaborator, as far as route overlays are concerned.
pub trait MapSurface {
    fn add_route_layer(&mut self, geometry: &[GeoPoint]) -> ElementId;
    fn remove_route_layer(&mut self, id: ElementId);
    fn add_instruction_panel(&mut self, panel: InstructionPanel) -> ElementId;
    fn remove_instruction_panel(&mut self, id: ElementId);
    fn add_dismiss_control(&mut self) -> ElementId;
    fn remove_dismiss_control(&mut self, id: ElementId);
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructionPanel {
    pub summary: String,
    pub lines: Vec<String>,
}

impl InstructionPanel {
    pub fn for_route(result: &RouteResult) -> Self {
        InstructionPanel {
            summary: instructions::summary(result),
            lines: instructions::panel_lines(result),
        }
    }
}

/// The elements of the currently displayed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayHandle {
    /// Increases with every `display` on the same manager.
    pub generation: u64,
    pub layer: ElementId,
    pub panel: ElementId,
    pub control: ElementId,
}

pub struct RouteOverlayManager<S: MapSurface> {
    surface: S,
    current: Option<OverlayHandle>,
    generation: u64,
}

impl<S: MapSurface> RouteOverlayManager<S> {
    pub fn new(surface: S) -> Self {
        RouteOverlayManager {
            surface,
            current: None,
            generation: 0,
        }
    }

    /// Replace any existing overlay with one for `result`.
    pub fn display(&mut self, result: &RouteResult) -> OverlayHandle {
        self.clear();

        self.generation += 1;
        let handle = OverlayHandle {
            generation: self.generation,
            layer: self.surface.add_route_layer(&result.geometry),
            panel: self
                .surface
                .add_instruction_panel(InstructionPanel::for_route(result)),
            control: self.surface.add_dismiss_control(),
        };
        tracing::debug!(
            generation = handle.generation,
            points = result.geometry.len(),
            steps = result.instructions.len(),
            "route overlay displayed"
        );
        self.current = Some(handle);
        handle
    }

    /// Remove the overlay if there is one. Returns whether anything was removed.
    pub fn clear(&mut self) -> bool {
        let Some(handle) = self.current.take() else {
            return false;
        };
        self.surface.remove_route_layer(handle.layer);
        self.surface.remove_instruction_panel(handle.panel);
        self.surface.remove_dismiss_control(handle.control);
        tracing::debug!(generation = handle.generation, "route overlay cleared");
        true
    }

    pub fn is_displayed(&self) -> bool {
        self.current.is_some()
    }

    pub fn handle(&self) -> Option<OverlayHandle> {
        self.current
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

impl<S: MapSurface> Drop for RouteOverlayManager<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// In-memory surface: the render model a view draws from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayScene {
    next_id: u64,
    pub route_layers: Vec<(ElementId, Vec<GeoPoint>)>,
    pub panels: Vec<(ElementId, InstructionPanel)>,
    pub dismiss_controls: Vec<ElementId>,
}

impl OverlayScene {
    fn allocate(&mut self) -> ElementId {
        self.next_id += 1;
        ElementId(self.next_id)
    }

    pub fn route_geometry(&self) -> Option<&[GeoPoint]> {
        self.route_layers.first().map(|(_, g)| g.as_slice())
    }

    pub fn panel(&self) -> Option<&InstructionPanel> {
        self.panels.first().map(|(_, p)| p)
    }

    pub fn has_dismiss_control(&self) -> bool {
        !self.dismiss_controls.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.route_layers.is_empty() && self.panels.is_empty() && self.dismiss_controls.is_empty()
    }
}

impl MapSurface for OverlayScene {
    fn add_route_layer(&mut self, geometry: &[GeoPoint]) -> ElementId {
        let id = self.allocate();
        self.route_layers.push((id, geometry.to_vec()));
        id
    }

    fn remove_route_layer(&mut self, id: ElementId) {
        self.route_layers.retain(|(l, _)| *l != id);
    }

    fn add_instruction_panel(&mut self, panel: InstructionPanel) -> ElementId {
        let id = self.allocate();
        self.panels.push((id, panel));
        id
    }

    fn remove_instruction_panel(&mut self, id: ElementId) {
        self.panels.retain(|(p, _)| *p != id);
    }

    fn add_dismiss_control(&mut self) -> ElementId {
        let id = self.allocate();
        self.dismiss_controls.push(id);
        id
    }

    fn remove_dismiss_control(&mut self, id: ElementId) {
        self.dismiss_controls.retain(|c| *c != id);
    }
}
