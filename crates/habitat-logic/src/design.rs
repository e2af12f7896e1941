//! The design aggregate: one envelope, one mission and an ordered list of
//! placed modules, plus the volume figures derived from it.
//!
//! A [`Design`] is owned by whatever session or controller edits it. All
//! computations take it by reference together with the [`Catalog`] and
//! return immediately; nothing here keeps global state.
//!
//! ```
//! use habitat_logic::catalog::{kinds, Catalog};
//! use habitat_logic::design::{Design, Position};
//!
//! let catalog = Catalog::standard();
//! let mut design = Design::default();
//! let id = design
//!     .add_module(&catalog, kinds::LIFE_SUPPORT, Position::default())
//!     .unwrap();
//! assert_eq!(design.module_volume(&catalog, id).unwrap().unwrap(), 27.0);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::envelope::Envelope;
use crate::error::ConfigurationError;
use crate::geometry::ModuleShape;
use crate::mission::MissionParams;

/// Canvas placement. Only the presentation layer reads it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A catalog module placed in the design.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedModule {
    pub id: u32,
    /// Catalog kind name.
    pub kind: String,
    /// Explicit solid. `None` falls back to the catalog baseline volume.
    pub geometry: Option<ModuleShape>,
    /// Multiplicity applied to volume and to quarters accounting.
    pub count: u32,
    pub position: Position,
}

impl PlacedModule {
    /// Volume in m³: solid (or catalog baseline) × `count`.
    pub fn volume(&self, catalog: &Catalog) -> Result<f64, ConfigurationError> {
        let entry = catalog.get(&self.kind)?;
        let unit = match &self.geometry {
            Some(shape) => shape.volume(),
            None => entry.baseline_volume.max(0.0),
        };
        Ok(unit * self.count as f64)
    }
}

#[derive(Debug, Clone)]
pub struct Design {
    pub envelope: Envelope,
    pub mission: MissionParams,
    modules: Vec<PlacedModule>,
    next_id: u32,
}

/// Designs compare by envelope, mission and modules. The id counter is not
/// part of the design.
impl PartialEq for Design {
    fn eq(&self, other: &Self) -> bool {
        self.envelope == other.envelope
            && self.mission == other.mission
            && self.modules == other.modules
    }
}

impl Default for Design {
    fn default() -> Self {
        Self::new(Envelope::default(), MissionParams::default())
    }
}

impl Design {
    pub fn new(envelope: Envelope, mission: MissionParams) -> Self {
        Self {
            envelope,
            mission,
            modules: Vec::new(),
            next_id: 1,
        }
    }

    /// Rebuild a design from stored modules, keeping their order.
    ///
    /// Stored ids are kept; a zero or repeated id gets a fresh one. Every kind
    /// must exist in the catalog.
    pub fn from_parts(
        catalog: &Catalog,
        envelope: Envelope,
        mission: MissionParams,
        modules: impl IntoIterator<Item = PlacedModule>,
    ) -> Result<Self, ConfigurationError> {
        let mut design = Self::new(envelope, mission);
        for module in modules {
            catalog.get(&module.kind)?;
            design.modules.push(module);
        }
        let highest = design.modules.iter().map(|m| m.id).max().unwrap_or(0);
        design.next_id = highest.saturating_add(1);

        let mut seen = BTreeSet::new();
        for i in 0..design.modules.len() {
            let id = design.modules[i].id;
            if id == 0 || !seen.insert(id) {
                let fresh = design.allocate_id();
                log::debug!("module #{id} renumbered to #{fresh}");
                design.modules[i].id = fresh;
                seen.insert(fresh);
            }
        }
        Ok(design)
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn modules(&self) -> &[PlacedModule] {
        &self.modules
    }

    pub fn module(&self, id: u32) -> Option<&PlacedModule> {
        self.modules.iter().find(|m| m.id == id)
    }

    fn module_mut(&mut self, id: u32) -> Option<&mut PlacedModule> {
        self.modules.iter_mut().find(|m| m.id == id)
    }

    /// Place one unit of `kind` as a default 3 m cube. Returns the new id.
    pub fn add_module(
        &mut self,
        catalog: &Catalog,
        kind: &str,
        position: Position,
    ) -> Result<u32, ConfigurationError> {
        catalog.get(kind)?;
        let id = self.allocate_id();
        self.modules.push(PlacedModule {
            id,
            kind: kind.to_string(),
            geometry: Some(ModuleShape::default()),
            count: 1,
            position,
        });
        log::debug!("added {kind} as module #{id}");
        Ok(id)
    }

    /// Remove a module. Returns it if it existed.
    pub fn remove_module(&mut self, id: u32) -> Option<PlacedModule> {
        let idx = self.modules.iter().position(|m| m.id == id)?;
        log::debug!("removed module #{id}");
        Some(self.modules.remove(idx))
    }

    pub fn move_module(&mut self, id: u32, position: Position) -> bool {
        match self.module_mut(id) {
            Some(m) => {
                m.position = position;
                true
            }
            None => false,
        }
    }

    /// Replace a module's solid. `None` reverts to the catalog baseline.
    pub fn set_geometry(&mut self, id: u32, geometry: Option<ModuleShape>) -> bool {
        match self.module_mut(id) {
            Some(m) => {
                log::debug!("module #{id} geometry -> {geometry:?}");
                m.geometry = geometry;
                true
            }
            None => false,
        }
    }

    pub fn set_count(&mut self, id: u32, count: u32) -> bool {
        match self.module_mut(id) {
            Some(m) => {
                m.count = count;
                true
            }
            None => false,
        }
    }

    pub fn clear_modules(&mut self) {
        log::debug!("cleared {} modules", self.modules.len());
        self.modules.clear();
    }

    pub fn enclosed_volume(&self) -> f64 {
        self.envelope.enclosed_volume()
    }

    pub fn module_volume(
        &self,
        catalog: &Catalog,
        id: u32,
    ) -> Option<Result<f64, ConfigurationError>> {
        self.module(id).map(|m| m.volume(catalog))
    }

    /// Sum of all module volumes in m³.
    pub fn used_volume(&self, catalog: &Catalog) -> Result<f64, ConfigurationError> {
        self.modules.iter().map(|m| m.volume(catalog)).sum()
    }

    /// Used ÷ enclosed volume × 100. Zero when the envelope encloses nothing.
    pub fn utilization_pct(&self, catalog: &Catalog) -> Result<f64, ConfigurationError> {
        let used = self.used_volume(catalog)?;
        Ok(utilization(used, self.enclosed_volume()))
    }

    /// Number of placed units of `kind`, counting multiplicity.
    pub fn count_of(&self, kind: &str) -> u32 {
        self.modules
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| m.count)
            .sum()
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.modules.iter().any(|m| m.kind == kind)
    }

    pub fn statistics(&self, catalog: &Catalog) -> Result<DesignStatistics, ConfigurationError> {
        let total_volume = self.enclosed_volume();
        let used_volume = self.used_volume(catalog)?;
        Ok(DesignStatistics {
            total_volume,
            used_volume,
            free_volume: (total_volume - used_volume).max(0.0),
            utilization: utilization(used_volume, total_volume),
            volume_per_crew: total_volume / self.mission.crew_divisor(),
            module_count: self.modules.len(),
        })
    }
}

fn utilization(used: f64, total: f64) -> f64 {
    if total > 0.0 {
        used / total * 100.0
    } else {
        0.0
    }
}

/// Volume figures for a design, as shown in the stats panel and exported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesignStatistics {
    /// Enclosed envelope volume in m³.
    pub total_volume: f64,
    pub used_volume: f64,
    pub free_volume: f64,
    /// Percent of the envelope occupied by modules.
    pub utilization: f64,
    pub volume_per_crew: f64,
    pub module_count: usize,
}
