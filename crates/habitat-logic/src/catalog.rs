//! Module catalog: the fixed reference table of module kinds.
//!
//! Each entry defines a kind's baseline volume, what it supplies
//! (`provides`) and what it draws (`consumes`), plus display metadata for
//! the presentation layer. The catalog is immutable configuration data:
//! build it once with [`Catalog::standard`] (or load one with
//! [`Catalog::from_json`]) and pass it into the model explicitly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Kind names referenced by the default design rules.
pub mod kinds {
    pub const LIFE_SUPPORT: &str = "Life Support";
    pub const WASTE_MANAGEMENT: &str = "Waste Management";
    pub const THERMAL_CONTROL: &str = "Thermal Control";
    pub const COMMUNICATIONS: &str = "Communications";
    pub const POWER_SYSTEMS: &str = "Power Systems";
    pub const STOWAGE: &str = "Stowage";
    pub const FOOD_STORAGE: &str = "Food Storage";
    pub const MEDICAL_BAY: &str = "Medical Bay";
    pub const CREW_QUARTERS: &str = "Crew Quarters";
    pub const EXERCISE_AREA: &str = "Exercise Area";
}

/// A supply or demand a module can have.
///
/// The first five are balanced against crew demand; the rest are
/// capacities shown to the user but not balanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// kg O2 per day.
    Oxygen,
    /// kg CO2 scrubbed per day.
    Co2Removal,
    /// Liters of water per day.
    #[serde(alias = "water_recycling")]
    Water,
    /// Watts.
    Power,
    /// kg of waste processed per day.
    WasteProcessing,
    Cooling,
    Heating,
    Bandwidth,
    Storage,
    FoodCapacity,
    MedicalCapacity,
    Sleeping,
    Exercise,
}

impl Resource {
    /// Resources compared between supply and demand.
    pub const TRACKED: [Resource; 5] = [
        Resource::Oxygen,
        Resource::Co2Removal,
        Resource::Water,
        Resource::Power,
        Resource::WasteProcessing,
    ];

    pub fn is_tracked(&self) -> bool {
        Self::TRACKED.contains(self)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Oxygen => "O2",
            Self::Co2Removal => "CO2 removal",
            Self::Water => "Water",
            Self::Power => "Power",
            Self::WasteProcessing => "Waste processing",
            Self::Cooling => "Cooling",
            Self::Heating => "Heating",
            Self::Bandwidth => "Bandwidth",
            Self::Storage => "Storage",
            Self::FoodCapacity => "Food capacity",
            Self::MedicalCapacity => "Medical capacity",
            Self::Sleeping => "Sleeping",
            Self::Exercise => "Exercise",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Self::Oxygen | Self::Co2Removal | Self::WasteProcessing => "kg/day",
            Self::Water => "L/day",
            Self::Power | Self::Cooling | Self::Heating => "W",
            Self::Bandwidth => "Mbps",
            Self::Storage => "m³",
            Self::FoodCapacity => "kg",
            Self::MedicalCapacity | Self::Sleeping | Self::Exercise => "crew",
        }
    }
}

/// Grouping used to color and sort the module palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleCategory {
    Critical,
    Operations,
    Crew,
}

/// One module kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    /// Volume of one unit in m³ when no explicit geometry is given.
    pub baseline_volume: f64,
    pub category: ModuleCategory,
    /// Display color (`#rrggbb`).
    pub color: String,
    pub icon: String,
    #[serde(default)]
    pub provides: BTreeMap<Resource, f64>,
    #[serde(default)]
    pub consumes: BTreeMap<Resource, f64>,
}

impl CatalogEntry {
    pub fn provided(&self, resource: Resource) -> f64 {
        self.provides.get(&resource).copied().unwrap_or(0.0)
    }

    pub fn consumed(&self, resource: Resource) -> f64 {
        self.consumes.get(&resource).copied().unwrap_or(0.0)
    }
}

/// Immutable table of module kinds, in palette order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a catalog from JSON (`{"entries": [...]}`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Look up a kind. Unknown kinds are a configuration error.
    pub fn get(&self, kind: &str) -> Result<&CatalogEntry, ConfigurationError> {
        self.entries
            .iter()
            .find(|e| e.name == kind)
            .ok_or_else(|| ConfigurationError::UnknownModuleKind(kind.to_string()))
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.entries.iter().any(|e| e.name == kind)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stock ten-kind catalog.
    pub fn standard() -> Self {
        use kinds::*;
        use ModuleCategory::*;
        use Resource::*;

        Self::new(vec![
            entry(
                LIFE_SUPPORT,
                15.2,
                Critical,
                "#ff6b6b",
                "🫁",
                &[(Oxygen, 10.0), (Co2Removal, 12.0)],
                &[(Power, 2000.0)],
            ),
            entry(
                WASTE_MANAGEMENT,
                8.1,
                Critical,
                "#8b4513",
                "🚽",
                &[(WasteProcessing, 5.0), (Water, 3.0)],
                &[(Power, 800.0)],
            ),
            entry(
                THERMAL_CONTROL,
                12.5,
                Critical,
                "#ff8c42",
                "🌡️",
                &[(Cooling, 5000.0), (Heating, 3000.0)],
                &[(Power, 1500.0)],
            ),
            entry(
                COMMUNICATIONS,
                6.2,
                Operations,
                "#4ecdc4",
                "📡",
                &[(Bandwidth, 100.0)],
                &[(Power, 500.0)],
            ),
            entry(
                POWER_SYSTEMS,
                18.7,
                Critical,
                "#ffe66d",
                "⚡",
                &[(Power, 10000.0)],
                &[],
            ),
            entry(
                STOWAGE,
                25.8,
                Operations,
                "#a8e6cf",
                "📦",
                &[(Storage, 50.0)],
                &[],
            ),
            entry(
                FOOD_STORAGE,
                20.4,
                Crew,
                "#ff8b94",
                "🍽️",
                &[(FoodCapacity, 1000.0)],
                &[(Power, 200.0)],
            ),
            entry(
                MEDICAL_BAY,
                16.3,
                Critical,
                "#ff9a8b",
                "🏥",
                &[(MedicalCapacity, 2.0)],
                &[(Power, 600.0)],
            ),
            entry(
                CREW_QUARTERS,
                2.5,
                Crew,
                "#a8dadc",
                "🛏️",
                &[(Sleeping, 1.0)],
                &[(Power, 50.0)],
            ),
            entry(
                EXERCISE_AREA,
                35.2,
                Crew,
                "#457b9d",
                "🏃",
                &[(Exercise, 4.0)],
                &[(Power, 300.0)],
            ),
        ])
    }
}

fn entry(
    name: &str,
    baseline_volume: f64,
    category: ModuleCategory,
    color: &str,
    icon: &str,
    provides: &[(Resource, f64)],
    consumes: &[(Resource, f64)],
) -> CatalogEntry {
    CatalogEntry {
        name: name.to_string(),
        baseline_volume,
        category,
        color: color.to_string(),
        icon: icon.to_string(),
        provides: provides.iter().copied().collect(),
        consumes: consumes.iter().copied().collect(),
    }
}
