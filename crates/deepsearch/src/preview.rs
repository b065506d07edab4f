use deepsearch_draw::LatLng;
use serde::{Deserialize, Serialize};

/// Radius of the neighbourhood preview around a chosen location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewRadius {
    #[default]
    Km5,
    Km10,
    Km15,
}

impl PreviewRadius {
    pub const ALL: [PreviewRadius; 3] = [
        PreviewRadius::Km5,
        PreviewRadius::Km10,
        PreviewRadius::Km15,
    ];

    pub fn from_km(km: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|radius| radius.km() == km)
    }

    pub fn km(&self) -> u32 {
        match self {
            PreviewRadius::Km5 => 5,
            PreviewRadius::Km10 => 10,
            PreviewRadius::Km15 => 15,
        }
    }

    /// Map zoom that fits the radius on screen.
    pub fn zoom(&self) -> u8 {
        match self {
            PreviewRadius::Km5 => 12,
            PreviewRadius::Km10 => 11,
            PreviewRadius::Km15 => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapPreview {
    pub center: LatLng,
    pub radius: PreviewRadius,
}

impl MapPreview {
    pub fn zoom(&self) -> u8 {
        self.radius.zoom()
    }
}
