use serde::{Deserialize, Serialize};

/// Stacking layers of a waterfall viewport, bottom to top.
///
/// Cursor and selection layers are the only ones touched by the overlay tick
/// and pointer handling; everything below is owned by render passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanvasLayerKind {
    Background,
    Grid,
    Series,
    Overlay,
    Selection,
    Cursor,
}

impl CanvasLayerKind {
    pub const ALL: [Self; 6] = [
        Self::Background,
        Self::Grid,
        Self::Series,
        Self::Overlay,
        Self::Selection,
        Self::Cursor,
    ];

    /// Base z-value of the layer. Shapes inside a layer may add a fraction
    /// below 1.0 to order themselves without crossing into the next layer.
    #[must_use]
    pub const fn z(self) -> f64 {
        match self {
            Self::Background => 0.0,
            Self::Grid => 10.0,
            Self::Series => 20.0,
            Self::Overlay => 30.0,
            Self::Selection => 40.0,
            Self::Cursor => 50.0,
        }
    }

    /// Layer owning a z-value, if any.
    #[must_use]
    pub fn from_z(z: f64) -> Option<Self> {
        Self::ALL
            .into_iter()
            .rev()
            .find(|layer| z >= layer.z() && z < layer.z() + 10.0)
    }
}
