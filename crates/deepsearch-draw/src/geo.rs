use std::f64::consts::PI;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const TILE_SIZE: f64 = 256.0;
const MAX_SIN_LAT: f64 = 0.9999;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A closed boundary. The last vertex connects back to the first implicitly.
pub type Ring = Vec<LatLng>;

/// Arithmetic mean of every vertex across `rings`, each axis averaged on its own.
///
/// Not geodesically exact; good enough to centre a preview. Returns `None`
/// when there are no vertices at all.
pub fn centroid(rings: &[Ring]) -> Option<LatLng> {
    let (count, lat, lng) = rings
        .iter()
        .flatten()
        .fold((0usize, 0.0, 0.0), |(count, lat, lng), point| {
            (count + 1, lat + point.lat, lng + point.lng)
        });
    if count == 0 {
        return None;
    }
    Some(LatLng::new(lat / count as f64, lng / count as f64))
}

/// Visible window of a Web-Mercator map: centre, zoom and pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Pixel position of `point` relative to the top-left corner of the viewport.
    pub fn project(&self, point: LatLng) -> (f64, f64) {
        let scale = self.scale();
        let (x, y) = world(point, scale);
        let (cx, cy) = world(self.center, scale);
        (x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    /// Coordinate under the pixel `(x, y)` of the viewport.
    pub fn unproject(&self, x: f64, y: f64) -> LatLng {
        let scale = self.scale();
        let (cx, cy) = world(self.center, scale);
        let wx = cx + x - self.width / 2.0;
        let wy = cy + y - self.height / 2.0;
        let lng = wx / scale * 360.0 - 180.0;
        let n = PI - 2.0 * PI * wy / scale;
        LatLng::new(n.sinh().atan().to_degrees(), lng)
    }

    fn scale(&self) -> f64 {
        TILE_SIZE * self.zoom.exp2()
    }
}

fn world(point: LatLng, scale: f64) -> (f64, f64) {
    let x = (point.lng + 180.0) / 360.0 * scale;
    let sin = point.lat.to_radians().sin().clamp(-MAX_SIN_LAT, MAX_SIN_LAT);
    let y = (0.5 - ((1.0 + sin) / (1.0 - sin)).ln() / (4.0 * PI)) * scale;
    (x, y)
}
