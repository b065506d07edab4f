use std::collections::BTreeMap;

use crate::geo::{LatLng, Ring, Viewport};
use crate::surface::{
    ListenerHandle, MapEventKind, MapOptions, MapSurface, OverlayHandle, PointerEvent,
};
use crate::tool::{PolygonDrawTool, StrokeOutcome};

/// Headless map surface. Records listener registrations, options and overlays
/// so hosts without a real map (tests, previews) can drive the draw tool.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    viewport: Viewport,
    options: MapOptions,
    listeners: BTreeMap<ListenerHandle, MapEventKind>,
    stroke: Option<Vec<LatLng>>,
    polygons: BTreeMap<OverlayHandle, Ring>,
    next_id: u64,
}

impl MemorySurface {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            options: MapOptions::interactive(),
            listeners: BTreeMap::new(),
            stroke: None,
            polygons: BTreeMap::new(),
            next_id: 0,
        }
    }

    pub fn options(&self) -> MapOptions {
        self.options
    }

    pub fn is_listening(&self, kind: MapEventKind) -> bool {
        self.listeners.values().any(|registered| *registered == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn stroke(&self) -> Option<&[LatLng]> {
        self.stroke.as_deref()
    }

    pub fn polygons(&self) -> Vec<&Ring> {
        self.polygons.values().collect()
    }

    /// Delivers `event` the way a map provider would: only when some listener
    /// for its kind is registered.
    pub fn dispatch(&mut self, tool: &mut PolygonDrawTool, event: PointerEvent) -> StrokeOutcome {
        if !self.is_listening(event.kind) {
            return StrokeOutcome::Ignored;
        }
        tool.handle_pointer(self, event)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MapSurface for MemorySurface {
    fn add_listener(&mut self, kind: MapEventKind) -> ListenerHandle {
        let handle = ListenerHandle(self.next_id());
        self.listeners.insert(handle, kind);
        handle
    }

    fn remove_listener(&mut self, handle: ListenerHandle) {
        self.listeners.remove(&handle);
    }

    fn set_options(&mut self, options: MapOptions) {
        self.options = options;
    }

    fn pan_to(&mut self, center: LatLng) {
        self.viewport.center = center;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.viewport.zoom = zoom;
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn draw_stroke(&mut self, points: &[LatLng]) {
        self.stroke = Some(points.to_vec());
    }

    fn clear_stroke(&mut self) {
        self.stroke = None;
    }

    fn add_polygon(&mut self, ring: &[LatLng]) -> OverlayHandle {
        let handle = OverlayHandle(self.next_id());
        self.polygons.insert(handle, ring.to_vec());
        handle
    }

    fn remove_overlay(&mut self, handle: OverlayHandle) {
        self.polygons.remove(&handle);
    }
}
