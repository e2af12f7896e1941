//! Habitat envelope: the outer pressurized shell and its enclosed volume.
//!
//! ```
//! use habitat_logic::envelope::{Envelope, EnvelopeShape};
//!
//! let hull = Envelope {
//!     shape: EnvelopeShape::Cylinder,
//!     length: 12.0,
//!     diameter: 8.0,
//!     height: 4.0,
//! };
//! assert!((hull.enclosed_volume() - 603.19).abs() < 0.01);
//! ```

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Envelope shape. Older design files use `cylindrical`, `spherical` and
/// `modular`; those keys are still accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeShape {
    #[serde(alias = "cylindrical")]
    Cylinder,
    #[serde(alias = "spherical")]
    Sphere,
    /// Hemispherical cap on a cylindrical base of the same radius.
    Dome,
    /// Rectangular shell; `diameter` is its width.
    #[serde(alias = "modular")]
    Box,
}

impl EnvelopeShape {
    pub fn all() -> &'static [EnvelopeShape] {
        &[Self::Cylinder, Self::Sphere, Self::Dome, Self::Box]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cylinder => "Cylinder",
            Self::Sphere => "Sphere",
            Self::Dome => "Dome",
            Self::Box => "Box",
        }
    }
}

/// Outer habitat shell. Dimensions are meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub shape: EnvelopeShape,
    pub length: f64,
    /// Diameter for round shapes, width for the box.
    pub diameter: f64,
    pub height: f64,
}

impl Default for Envelope {
    fn default() -> Self {
        Self {
            shape: EnvelopeShape::Cylinder,
            length: 12.0,
            diameter: 8.0,
            height: 4.0,
        }
    }
}

impl Envelope {
    /// Enclosed volume in m³. Negative dimensions count as zero.
    pub fn enclosed_volume(&self) -> f64 {
        let length = self.length.max(0.0);
        let r = self.diameter.max(0.0) / 2.0;
        let height = self.height.max(0.0);
        match self.shape {
            EnvelopeShape::Cylinder => PI * r * r * length,
            EnvelopeShape::Sphere => (4.0 / 3.0) * PI * r.powi(3),
            EnvelopeShape::Dome => (2.0 / 3.0) * PI * r.powi(3) + PI * r * r * height,
            EnvelopeShape::Box => length * self.diameter.max(0.0) * height,
        }
    }
}
