//! Module solids and their closed-form volumes.
//!
//! Each placed module may carry an explicit solid. The solid is a tagged
//! variant with its own named dimensions, so every shape has a formula and
//! there is no "unknown shape" path once a [`ModuleShape`] exists. Unknown
//! shape keys are rejected where names are parsed ([`ShapeKind::from_key`]).
//!
//! All dimensions are meters. Negative values are treated as zero.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Edge length of the cube a freshly added module starts as.
pub const DEFAULT_CUBE_SIDE: f64 = 3.0;

/// Solid shape of a placed module with its dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ModuleShape {
    Cube {
        side: f64,
    },
    Sphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Cone {
        radius: f64,
        height: f64,
    },
    /// Regular hexagonal prism.
    HexagonalPrism {
        side: f64,
        height: f64,
    },
    RectangularBox {
        length: f64,
        width: f64,
        height: f64,
    },
    /// Rhombic prism described by the two diagonals of its base.
    DiamondPrism {
        diagonal1: f64,
        diagonal2: f64,
        height: f64,
    },
    /// Equilateral triangular prism.
    TriangularPrism {
        side: f64,
        height: f64,
    },
}

impl Default for ModuleShape {
    fn default() -> Self {
        Self::Cube {
            side: DEFAULT_CUBE_SIDE,
        }
    }
}

fn nn(x: f64) -> f64 {
    x.max(0.0)
}

impl ModuleShape {
    /// Volume of one unit of this solid in m³.
    pub fn volume(&self) -> f64 {
        match *self {
            Self::Cube { side } => nn(side).powi(3),
            Self::Sphere { radius } => (4.0 / 3.0) * PI * nn(radius).powi(3),
            Self::Cylinder { radius, height } => PI * nn(radius).powi(2) * nn(height),
            Self::Cone { radius, height } => (1.0 / 3.0) * PI * nn(radius).powi(2) * nn(height),
            Self::HexagonalPrism { side, height } => {
                (3.0 * 3f64.sqrt() / 2.0) * nn(side).powi(2) * nn(height)
            }
            Self::RectangularBox {
                length,
                width,
                height,
            } => nn(length) * nn(width) * nn(height),
            Self::DiamondPrism {
                diagonal1,
                diagonal2,
                height,
            } => 0.5 * nn(diagonal1) * nn(diagonal2) * nn(height),
            Self::TriangularPrism { side, height } => {
                (3f64.sqrt() / 4.0) * nn(side).powi(2) * nn(height)
            }
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::Cube { .. } => ShapeKind::Cube,
            Self::Sphere { .. } => ShapeKind::Sphere,
            Self::Cylinder { .. } => ShapeKind::Cylinder,
            Self::Cone { .. } => ShapeKind::Cone,
            Self::HexagonalPrism { .. } => ShapeKind::HexagonalPrism,
            Self::RectangularBox { .. } => ShapeKind::RectangularBox,
            Self::DiamondPrism { .. } => ShapeKind::DiamondPrism,
            Self::TriangularPrism { .. } => ShapeKind::TriangularPrism,
        }
    }

    /// Build a solid from a name → value map. Missing dimensions become 0.
    pub fn from_params(kind: ShapeKind, params: &BTreeMap<String, f64>) -> Self {
        let get = |name: &str| match params.get(name) {
            Some(v) if v.is_finite() => *v,
            _ => {
                log::warn!("{} is missing {name:?}; using 0", kind.key());
                0.0
            }
        };
        match kind {
            ShapeKind::Cube => Self::Cube { side: get("side") },
            ShapeKind::Sphere => Self::Sphere {
                radius: get("radius"),
            },
            ShapeKind::Cylinder => Self::Cylinder {
                radius: get("radius"),
                height: get("height"),
            },
            ShapeKind::Cone => Self::Cone {
                radius: get("radius"),
                height: get("height"),
            },
            ShapeKind::HexagonalPrism => Self::HexagonalPrism {
                side: get("side"),
                height: get("height"),
            },
            ShapeKind::RectangularBox => Self::RectangularBox {
                length: get("length"),
                width: get("width"),
                height: get("height"),
            },
            ShapeKind::DiamondPrism => Self::DiamondPrism {
                diagonal1: get("diagonal1"),
                diagonal2: get("diagonal2"),
                height: get("height"),
            },
            ShapeKind::TriangularPrism => Self::TriangularPrism {
                side: get("side"),
                height: get("height"),
            },
        }
    }

    /// Dimensions as a name → value map, keyed by [`ShapeKind::param_names`].
    pub fn params(&self) -> BTreeMap<String, f64> {
        let values: Vec<f64> = match *self {
            Self::Cube { side } => vec![side],
            Self::Sphere { radius } => vec![radius],
            Self::Cylinder { radius, height } | Self::Cone { radius, height } => {
                vec![radius, height]
            }
            Self::HexagonalPrism { side, height } | Self::TriangularPrism { side, height } => {
                vec![side, height]
            }
            Self::RectangularBox {
                length,
                width,
                height,
            } => vec![length, width, height],
            Self::DiamondPrism {
                diagonal1,
                diagonal2,
                height,
            } => vec![diagonal1, diagonal2, height],
        };
        self.kind()
            .param_names()
            .iter()
            .zip(values)
            .map(|(name, v)| (name.to_string(), v))
            .collect()
    }
}

/// Shape name without dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
    HexagonalPrism,
    RectangularBox,
    DiamondPrism,
    TriangularPrism,
}

impl ShapeKind {
    pub fn all() -> &'static [ShapeKind] {
        &[
            Self::Cube,
            Self::Sphere,
            Self::Cylinder,
            Self::Cone,
            Self::HexagonalPrism,
            Self::RectangularBox,
            Self::DiamondPrism,
            Self::TriangularPrism,
        ]
    }

    /// Canonical key used in design files.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Cube => "cube",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Cone => "cone",
            Self::HexagonalPrism => "hexagonal_prism",
            Self::RectangularBox => "rectangular_box",
            Self::DiamondPrism => "diamond_prism",
            Self::TriangularPrism => "triangular_prism",
        }
    }

    /// Parse a shape key. Short keys written by older files are accepted.
    pub fn from_key(key: &str) -> Result<Self, ConfigurationError> {
        match key.trim().to_ascii_lowercase().as_str() {
            "cube" => Ok(Self::Cube),
            "sphere" => Ok(Self::Sphere),
            "cylinder" => Ok(Self::Cylinder),
            "cone" => Ok(Self::Cone),
            "hexagonal_prism" | "hexagonal" => Ok(Self::HexagonalPrism),
            "rectangular_box" | "rectangular" => Ok(Self::RectangularBox),
            "diamond_prism" | "diamond" => Ok(Self::DiamondPrism),
            "triangular_prism" | "triangle" => Ok(Self::TriangularPrism),
            _ => Err(ConfigurationError::UnknownShape(key.to_string())),
        }
    }

    pub fn param_names(&self) -> &'static [&'static str] {
        match self {
            Self::Cube => &["side"],
            Self::Sphere => &["radius"],
            Self::Cylinder | Self::Cone => &["radius", "height"],
            Self::HexagonalPrism | Self::TriangularPrism => &["side", "height"],
            Self::RectangularBox => &["length", "width", "height"],
            Self::DiamondPrism => &["diagonal1", "diagonal2", "height"],
        }
    }

    /// Solid of this kind with every dimension set to `size`.
    pub fn uniform(&self, size: f64) -> ModuleShape {
        let params = self
            .param_names()
            .iter()
            .map(|name| (name.to_string(), size))
            .collect();
        ModuleShape::from_params(*self, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cube_side_three() {
        assert_eq!(ModuleShape::Cube { side: 3.0 }.volume(), 27.0);
    }

    #[test]
    fn cylinder_radius_two_height_five() {
        let v = ModuleShape::Cylinder {
            radius: 2.0,
            height: 5.0,
        }
        .volume();
        assert!((v - 62.83).abs() < 0.01);
    }

    #[test]
    fn standard_formulas() {
        assert!(close(
            ModuleShape::Sphere { radius: 1.0 }.volume(),
            4.0 / 3.0 * PI
        ));
        assert!(close(
            ModuleShape::Cone {
                radius: 3.0,
                height: 2.0
            }
            .volume(),
            6.0 * PI
        ));
        assert!(close(
            ModuleShape::HexagonalPrism {
                side: 2.0,
                height: 1.0
            }
            .volume(),
            6.0 * 3f64.sqrt()
        ));
        assert_eq!(
            ModuleShape::RectangularBox {
                length: 2.0,
                width: 3.0,
                height: 4.0
            }
            .volume(),
            24.0
        );
        assert_eq!(
            ModuleShape::DiamondPrism {
                diagonal1: 4.0,
                diagonal2: 2.0,
                height: 3.0
            }
            .volume(),
            12.0
        );
        assert!(close(
            ModuleShape::TriangularPrism {
                side: 2.0,
                height: 1.0
            }
            .volume(),
            3f64.sqrt()
        ));
    }

    #[test]
    fn cone_is_third_of_cylinder() {
        let cyl = ModuleShape::Cylinder {
            radius: 1.5,
            height: 4.0,
        };
        let cone = ModuleShape::Cone {
            radius: 1.5,
            height: 4.0,
        };
        assert!(close(cone.volume() * 3.0, cyl.volume()));
    }

    #[test]
    fn zero_and_negative_dimensions_give_zero() {
        for kind in ShapeKind::all() {
            assert_eq!(kind.uniform(0.0).volume(), 0.0, "{kind:?}");
            assert_eq!(kind.uniform(-2.0).volume(), 0.0, "{kind:?}");
        }
    }

    #[test]
    fn monotonic_in_every_parameter() {
        for kind in ShapeKind::all() {
            let base = kind.uniform(2.0);
            let v0 = base.volume();
            for name in kind.param_names() {
                let mut params = base.params();
                params.insert(name.to_string(), 2.5);
                let grown = ModuleShape::from_params(*kind, &params);
                assert!(
                    grown.volume() > v0,
                    "{kind:?} should grow with {name}: {} vs {v0}",
                    grown.volume()
                );
            }
        }
    }

    #[test]
    fn missing_params_default_to_zero() {
        let mut params = BTreeMap::new();
        params.insert("radius".to_string(), 2.0);
        let shape = ModuleShape::from_params(ShapeKind::Cylinder, &params);
        assert_eq!(
            shape,
            ModuleShape::Cylinder {
                radius: 2.0,
                height: 0.0
            }
        );
        assert_eq!(shape.volume(), 0.0);
    }

    #[test]
    fn params_round_trip_through_map() {
        for kind in ShapeKind::all() {
            let shape = kind.uniform(1.25);
            let rebuilt = ModuleShape::from_params(*kind, &shape.params());
            assert_eq!(rebuilt, shape);
            assert_eq!(shape.params().len(), kind.param_names().len());
        }
    }

    #[test]
    fn legacy_keys_accepted() {
        assert_eq!(
            ShapeKind::from_key("hexagonal"),
            Ok(ShapeKind::HexagonalPrism)
        );
        assert_eq!(
            ShapeKind::from_key("triangle"),
            Ok(ShapeKind::TriangularPrism)
        );
        assert_eq!(ShapeKind::from_key("Diamond"), Ok(ShapeKind::DiamondPrism));
        assert_eq!(
            ShapeKind::from_key("rectangular"),
            Ok(ShapeKind::RectangularBox)
        );
    }

    #[test]
    fn unknown_key_rejected() {
        assert_eq!(
            ShapeKind::from_key("torus"),
            Err(ConfigurationError::UnknownShape("torus".to_string()))
        );
    }

    #[test]
    fn canonical_keys_parse_back() {
        for kind in ShapeKind::all() {
            assert_eq!(ShapeKind::from_key(kind.key()), Ok(*kind));
        }
    }

    #[test]
    fn default_is_three_meter_cube() {
        assert_eq!(ModuleShape::default().volume(), 27.0);
    }
}
