use serde::{Deserialize, Serialize};

use crate::geo::{LatLng, Viewport};

/// Registration returned by [`MapSurface::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerHandle(pub u64);

/// A stroke or polygon drawn on top of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapEventKind {
    PointerDown,
    PointerMove,
    PointerUp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cursor {
    #[default]
    Grab,
    Crosshair,
}

/// Interaction switches of the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOptions {
    pub draggable: bool,
    pub zoom_control: bool,
    pub scrollwheel: bool,
    pub double_click_zoom_disabled: bool,
    pub cursor: Cursor,
}

impl MapOptions {
    /// Default map behaviour: pan, zoom and scroll all enabled.
    pub fn interactive() -> Self {
        Self {
            draggable: true,
            zoom_control: true,
            scrollwheel: true,
            double_click_zoom_disabled: false,
            cursor: Cursor::Grab,
        }
    }

    /// Everything that would move the map under a freehand stroke is switched off.
    pub fn drawing() -> Self {
        Self {
            draggable: false,
            zoom_control: false,
            scrollwheel: false,
            double_click_zoom_disabled: true,
            cursor: Cursor::Crosshair,
        }
    }
}

impl Default for MapOptions {
    fn default() -> Self {
        Self::interactive()
    }
}

/// Where a pointer event happened. Screen positions are pixels from the
/// viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "space", rename_all = "snake_case")]
pub enum PointerPosition {
    Geo(LatLng),
    Screen { x: f64, y: f64 },
}

impl PointerPosition {
    pub fn resolve(&self, viewport: &Viewport) -> LatLng {
        match *self {
            PointerPosition::Geo(point) => point,
            PointerPosition::Screen { x, y } => viewport.unproject(x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: MapEventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PointerPosition>,
}

impl PointerEvent {
    pub fn at(kind: MapEventKind, point: LatLng) -> Self {
        Self {
            kind,
            position: Some(PointerPosition::Geo(point)),
        }
    }

    pub fn at_pixel(kind: MapEventKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            position: Some(PointerPosition::Screen { x, y }),
        }
    }

    /// An event the map could not place, e.g. released outside the canvas.
    pub fn unplaced(kind: MapEventKind) -> Self {
        Self {
            kind,
            position: None,
        }
    }
}

/// Minimal map provider contract. The host forwards pointer events for every
/// registered listener kind to the tool that registered it.
pub trait MapSurface {
    fn add_listener(&mut self, kind: MapEventKind) -> ListenerHandle;
    fn remove_listener(&mut self, handle: ListenerHandle);
    fn set_options(&mut self, options: MapOptions);
    fn pan_to(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: f64);
    fn viewport(&self) -> Viewport;

    /// Shows (or replaces) the live polyline of the stroke in progress.
    fn draw_stroke(&mut self, points: &[LatLng]);
    fn clear_stroke(&mut self);
    fn add_polygon(&mut self, ring: &[LatLng]) -> OverlayHandle;
    fn remove_overlay(&mut self, handle: OverlayHandle);
}
