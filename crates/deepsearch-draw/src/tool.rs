use std::mem;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::{self, LatLng, Ring};
use crate::surface::{
    ListenerHandle, MapEventKind, MapOptions, MapSurface, OverlayHandle, PointerEvent,
};

/// Fewer vertices than this cannot enclose an area.
pub const MIN_RING_VERTICES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawState {
    Idle,
    Arming,
    Stroking,
}

/// Listener registrations owned by the current state. Leaving a state always
/// removes the handles it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Arming {
        down: ListenerHandle,
    },
    Stroking {
        moves: ListenerHandle,
        up: ListenerHandle,
    },
}

/// What a pointer event did to the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// Not expected in the current state, or no usable position.
    Ignored,
    Started,
    Extended,
    /// The stroke became committed ring number `n`.
    Committed(usize),
    /// Too short to be a polygon; drawing is armed again.
    Discarded,
}

/// Drawing state of one map session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrawSession {
    pub active: bool,
    pub current_stroke: Vec<LatLng>,
    pub committed: Vec<Ring>,
}

/// Result handed to the caller by [`PolygonDrawTool::apply_selection`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DrawnArea {
    pub rings: Vec<Ring>,
    pub centroid: LatLng,
    pub ring_count: usize,
}

/// Freehand polygon capture: `Idle -> Arming -> Stroking -> Arming ... -> Idle`.
///
/// The tool never keeps a listener registered past the state that asked for
/// it; events of a kind it holds no registration for are ignored.
#[derive(Debug)]
pub struct PolygonDrawTool {
    phase: Phase,
    session: DrawSession,
    overlays: Vec<OverlayHandle>,
}

impl Default for PolygonDrawTool {
    fn default() -> Self {
        Self::new()
    }
}

impl PolygonDrawTool {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            session: DrawSession::default(),
            overlays: Vec::new(),
        }
    }

    pub fn state(&self) -> DrawState {
        match self.phase {
            Phase::Idle => DrawState::Idle,
            Phase::Arming { .. } => DrawState::Arming,
            Phase::Stroking { .. } => DrawState::Stroking,
        }
    }

    pub fn session(&self) -> &DrawSession {
        &self.session
    }

    pub fn is_active(&self) -> bool {
        self.session.active
    }

    pub fn committed_rings(&self) -> &[Ring] {
        &self.session.committed
    }

    pub fn current_stroke(&self) -> &[LatLng] {
        &self.session.current_stroke
    }

    /// Enters draw mode. Returns `false` when already drawing.
    pub fn begin_draw_mode(&mut self, surface: &mut dyn MapSurface) -> bool {
        if self.phase != Phase::Idle {
            return false;
        }
        surface.set_options(MapOptions::drawing());
        self.arm(surface);
        self.session.active = true;
        debug!(committed = self.session.committed.len(), "draw mode armed");
        true
    }

    pub fn handle_pointer(
        &mut self,
        surface: &mut dyn MapSurface,
        event: PointerEvent,
    ) -> StrokeOutcome {
        match (self.phase, event.kind) {
            (Phase::Arming { down }, MapEventKind::PointerDown) => {
                let Some(point) = locate(surface, &event) else {
                    return StrokeOutcome::Ignored;
                };
                surface.remove_listener(down);
                let moves = surface.add_listener(MapEventKind::PointerMove);
                let up = surface.add_listener(MapEventKind::PointerUp);
                self.session.current_stroke = vec![point];
                surface.draw_stroke(&self.session.current_stroke);
                self.phase = Phase::Stroking { moves, up };
                StrokeOutcome::Started
            }
            (Phase::Stroking { .. }, MapEventKind::PointerMove) => {
                let Some(point) = locate(surface, &event) else {
                    return StrokeOutcome::Ignored;
                };
                self.session.current_stroke.push(point);
                surface.draw_stroke(&self.session.current_stroke);
                StrokeOutcome::Extended
            }
            (Phase::Stroking { moves, up }, MapEventKind::PointerUp) => {
                surface.remove_listener(moves);
                surface.remove_listener(up);
                surface.clear_stroke();
                let stroke = mem::take(&mut self.session.current_stroke);
                self.arm(surface);
                if stroke.len() < MIN_RING_VERTICES {
                    debug!(points = stroke.len(), "stroke too short, discarded");
                    return StrokeOutcome::Discarded;
                }
                let overlay = surface.add_polygon(&stroke);
                self.overlays.push(overlay);
                self.session.committed.push(stroke);
                let index = self.session.committed.len() - 1;
                debug!(ring = index, "polygon committed");
                StrokeOutcome::Committed(index)
            }
            _ => StrokeOutcome::Ignored,
        }
    }

    /// Drops every polygon and the stroke in progress, then gives the map back.
    pub fn cancel(&mut self, surface: &mut dyn MapSurface) {
        let removed = self.reset(surface);
        debug!(removed, "draw mode cancelled");
    }

    /// Finishes drawing and reports the area. The polygons stay on the map.
    /// Returns `None`, leaving the tool untouched, when nothing was committed.
    pub fn apply_selection(&mut self, surface: &mut dyn MapSurface) -> Option<DrawnArea> {
        let centroid = geo::centroid(&self.session.committed)?;
        self.detach(surface);
        surface.set_options(MapOptions::interactive());
        self.session.active = false;
        debug!(rings = self.session.committed.len(), "drawn area applied");
        Some(DrawnArea {
            rings: self.session.committed.clone(),
            centroid,
            ring_count: self.session.committed.len(),
        })
    }

    /// Clears an applied boundary. Returns how many rings were removed.
    pub fn remove_boundaries(&mut self, surface: &mut dyn MapSurface) -> usize {
        self.reset(surface)
    }

    fn arm(&mut self, surface: &mut dyn MapSurface) {
        let down = surface.add_listener(MapEventKind::PointerDown);
        self.phase = Phase::Arming { down };
    }

    fn detach(&mut self, surface: &mut dyn MapSurface) {
        match mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Arming { down } => surface.remove_listener(down),
            Phase::Stroking { moves, up } => {
                surface.remove_listener(moves);
                surface.remove_listener(up);
                surface.clear_stroke();
            }
        }
        self.session.current_stroke.clear();
    }

    fn reset(&mut self, surface: &mut dyn MapSurface) -> usize {
        self.detach(surface);
        for overlay in self.overlays.drain(..) {
            surface.remove_overlay(overlay);
        }
        surface.set_options(MapOptions::interactive());
        let removed = self.session.committed.len();
        self.session = DrawSession::default();
        removed
    }
}

fn locate(surface: &dyn MapSurface, event: &PointerEvent) -> Option<LatLng> {
    let viewport = surface.viewport();
    event.position.map(|position| position.resolve(&viewport))
}
