#![allow(missing_docs)]

pub mod geo;
pub mod memory;
pub mod surface;
pub mod tool;

pub use geo::{LatLng, Ring, Viewport, centroid};
pub use memory::MemorySurface;
pub use surface::{
    Cursor, ListenerHandle, MapEventKind, MapOptions, MapSurface, OverlayHandle, PointerEvent,
    PointerPosition,
};
pub use tool::{
    DrawSession, DrawState, DrawnArea, MIN_RING_VERTICES, PolygonDrawTool, StrokeOutcome,
};
