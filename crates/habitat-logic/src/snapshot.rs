//! Save/load of designs as flat JSON snapshots.
//!
//! The snapshot carries the envelope and mission, the ordered module list,
//! and the derived statistics and life-support balance at the time of
//! export. Derived blocks are informational: on load they are ignored and
//! recomputed from the design.
//!
//! Files written before snapshots were versioned have no `version` field.
//! They are still accepted. Their `mission_duration` is read as days, except
//! for files whose statistics carry `gas_stats`: that designer counted the
//! mission in months of 30 days. Older designers also wrote crew size and
//! duration as floats (`6.0`); any JSON number is accepted and rounded.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Deserializer, Serialize};

use crate::balance::{compute_balance, ResourceBalance};
use crate::catalog::Catalog;
use crate::config::DesignRules;
use crate::design::{Design, DesignStatistics, PlacedModule, Position};
use crate::envelope::{Envelope, EnvelopeShape};
use crate::error::ConfigurationError;
use crate::geometry::{ModuleShape, ShapeKind};
use crate::mission::MissionParams;

/// Version number for the snapshot format (increment when the format changes).
pub const SNAPSHOT_VERSION: u32 = 1;

/// Month length used by designers that counted the mission in months.
pub const DAYS_PER_MONTH: u32 = 30;

/// Read a count from any JSON number, rounded and floored at 0.
fn whole_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(value.round().clamp(0.0, u32::MAX as f64) as u32)
}

/// Envelope and mission fields, flattened as the designer writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitatRecord {
    pub shape: EnvelopeShape,
    pub length: f64,
    pub diameter: f64,
    pub height: f64,
    #[serde(deserialize_with = "whole_number")]
    pub crew_size: u32,
    /// Days, or months in month-based legacy files.
    #[serde(alias = "mission_duration_days", deserialize_with = "whole_number")]
    pub mission_duration: u32,
    pub location: String,
}

impl Default for HabitatRecord {
    fn default() -> Self {
        Self::from_parts(&Envelope::default(), &MissionParams::default())
    }
}

impl HabitatRecord {
    fn from_parts(envelope: &Envelope, mission: &MissionParams) -> Self {
        Self {
            shape: envelope.shape,
            length: envelope.length,
            diameter: envelope.diameter,
            height: envelope.height,
            crew_size: mission.crew_size,
            mission_duration: mission.mission_duration_days,
            location: mission.location.clone(),
        }
    }

    fn envelope(&self) -> Envelope {
        Envelope {
            shape: self.shape,
            length: self.length,
            diameter: self.diameter,
            height: self.height,
        }
    }

    fn mission(&self, duration_in_months: bool) -> MissionParams {
        let mission_duration_days = if duration_in_months {
            self.mission_duration.saturating_mul(DAYS_PER_MONTH)
        } else {
            self.mission_duration
        };
        MissionParams {
            crew_size: self.crew_size,
            mission_duration_days,
            location: self.location.clone(),
        }
    }
}

fn one() -> u32 {
    1
}

/// One placed module. An absent or empty `params` map means the module has
/// no explicit solid and uses its catalog baseline volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    /// Module id; 0 (or absent) means "assign one on load".
    #[serde(default)]
    pub id: u32,
    #[serde(alias = "kind")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, alias = "geometry", skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "one")]
    pub count: u32,
}

impl ModuleRecord {
    fn geometry(&self) -> Result<Option<ModuleShape>, ConfigurationError> {
        let Some(key) = &self.shape else {
            return Ok(None);
        };
        let kind = ShapeKind::from_key(key)?;
        if self.params.is_empty() {
            return Ok(None);
        }
        Ok(Some(ModuleShape::from_params(kind, &self.params)))
    }
}

/// The exported `statistics` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsRecord {
    #[serde(flatten)]
    pub stats: DesignStatistics,
    /// Mission gas totals written by the month-based designer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_stats: Option<serde_json::Value>,
}

/// Complete snapshot of a design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSnapshot {
    /// Snapshot format version; absent in legacy files.
    #[serde(default)]
    pub version: Option<u32>,
    pub habitat: HabitatRecord,
    #[serde(default)]
    pub modules: Vec<ModuleRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<StatisticsRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub life_support: Option<ResourceBalance>,
}

impl DesignSnapshot {
    /// Capture a design together with its current statistics and balance.
    pub fn capture(
        design: &Design,
        catalog: &Catalog,
        rules: &DesignRules,
    ) -> Result<Self, ConfigurationError> {
        let modules = design
            .modules()
            .iter()
            .map(|m| ModuleRecord {
                id: m.id,
                name: m.kind.clone(),
                shape: m.geometry.map(|g| g.kind().key().to_string()),
                params: m.geometry.map(|g| g.params()).unwrap_or_default(),
                x: m.position.x,
                y: m.position.y,
                count: m.count,
            })
            .collect();

        Ok(Self {
            version: Some(SNAPSHOT_VERSION),
            habitat: HabitatRecord::from_parts(&design.envelope, &design.mission),
            modules,
            statistics: Some(StatisticsRecord {
                stats: design.statistics(catalog)?,
                gas_stats: None,
            }),
            life_support: Some(compute_balance(design, catalog, &rules.crew_rates)?),
        })
    }

    /// Whether `mission_duration` counts months rather than days.
    pub fn duration_in_months(&self) -> bool {
        self.version.is_none()
            && self
                .statistics
                .as_ref()
                .is_some_and(|s| s.gas_stats.is_some())
    }

    /// Rebuild the design, checking every kind and shape against `catalog`.
    pub fn restore(&self, catalog: &Catalog) -> Result<Design, SnapshotError> {
        match self.version {
            None => log::warn!("snapshot has no version; reading as legacy format"),
            Some(found) if found > SNAPSHOT_VERSION => {
                return Err(SnapshotError::VersionMismatch {
                    expected: SNAPSHOT_VERSION,
                    found,
                });
            }
            Some(_) => {}
        }

        let modules = self
            .modules
            .iter()
            .map(|r| -> Result<_, ConfigurationError> {
                Ok(PlacedModule {
                    id: r.id,
                    kind: r.name.clone(),
                    geometry: r.geometry()?,
                    count: r.count,
                    position: Position { x: r.x, y: r.y },
                })
            })
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        let months = self.duration_in_months();
        if months {
            log::warn!(
                "mission duration of {} months converted to days",
                self.habitat.mission_duration
            );
        }
        let design = Design::from_parts(
            catalog,
            self.habitat.envelope(),
            self.habitat.mission(months),
            modules,
        )?;
        Ok(design)
    }
}

/// Save a design as pretty-printed JSON.
pub fn save_design<W: Write>(
    writer: W,
    design: &Design,
    catalog: &Catalog,
    rules: &DesignRules,
) -> Result<(), SnapshotError> {
    let snapshot = DesignSnapshot::capture(design, catalog, rules)?;
    serde_json::to_writer_pretty(writer, &snapshot)?;
    log::info!(
        "saved design: {} modules, {:.1} m³ enclosed",
        snapshot.modules.len(),
        design.enclosed_volume()
    );
    Ok(())
}

/// Load a design from JSON.
pub fn load_design<R: Read>(reader: R, catalog: &Catalog) -> Result<Design, SnapshotError> {
    let snapshot: DesignSnapshot = serde_json::from_reader(reader)?;
    let design = snapshot.restore(catalog)?;
    log::info!(
        "loaded design: {} modules for {}",
        design.modules().len(),
        design.mission.location
    );
    Ok(design)
}

/// Errors that can occur during save/load
#[derive(Debug)]
pub enum SnapshotError {
    Io(std::io::Error),
    Json(serde_json::Error),
    VersionMismatch { expected: u32, found: u32 },
    Configuration(ConfigurationError),
}

impl From<std::io::Error> for SnapshotError {
    fn from(e: std::io::Error) -> Self {
        SnapshotError::Io(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            SnapshotError::Io(e.into())
        } else {
            SnapshotError::Json(e)
        }
    }
}

impl From<ConfigurationError> for SnapshotError {
    fn from(e: ConfigurationError) -> Self {
        SnapshotError::Configuration(e)
    }
}

impl std::fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotError::Io(e) => write!(f, "IO error: {}", e),
            SnapshotError::Json(e) => write!(f, "Malformed design file: {}", e),
            SnapshotError::VersionMismatch { expected, found } => write!(
                f,
                "Snapshot version mismatch: supports up to {}, found {}",
                expected, found
            ),
            SnapshotError::Configuration(e) => write!(f, "Invalid design: {}", e),
        }
    }
}

impl std::error::Error for SnapshotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SnapshotError::Io(e) => Some(e),
            SnapshotError::Json(e) => Some(e),
            SnapshotError::Configuration(e) => Some(e),
            SnapshotError::VersionMismatch { .. } => None,
        }
    }
}
