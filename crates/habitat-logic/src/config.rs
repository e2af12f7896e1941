//! Design rules: the thresholds and per-crew rates the model checks against.
//!
//! Stock values come from [`DesignRules::default`]. A rule set can also be
//! loaded from JSON so a mission profile can tighten or relax them without
//! touching code.

use serde::{Deserialize, Serialize};

use crate::catalog::{kinds, Resource};

/// Daily demand of one crew member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRates {
    /// kg O2 per person per day.
    pub oxygen_consumption: f64,
    /// kg CO2 per person per day.
    pub co2_production: f64,
    /// Liters per person per day.
    pub water_consumption: f64,
    /// kg waste per person per day.
    pub waste_production: f64,
}

impl Default for CrewRates {
    fn default() -> Self {
        Self {
            oxygen_consumption: 0.84,
            co2_production: 1.0,
            water_consumption: 3.5,
            waste_production: 0.15,
        }
    }
}

impl CrewRates {
    /// Per-person daily demand for a crew-driven resource.
    ///
    /// Power and the capacity-only resources are not crew-driven and return `None`.
    pub fn per_person(&self, resource: Resource) -> Option<f64> {
        match resource {
            Resource::Oxygen => Some(self.oxygen_consumption),
            Resource::Co2Removal => Some(self.co2_production),
            Resource::Water => Some(self.water_consumption),
            Resource::WasteProcessing => Some(self.waste_production),
            _ => None,
        }
    }
}

/// Thresholds used by [`crate::validation::validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignRules {
    /// Minimum enclosed volume per crew member in m³.
    pub min_volume_per_crew: f64,
    /// Kinds that must be present at least once, checked in this order.
    pub critical_systems: Vec<String>,
    /// Kind whose total count must cover the crew.
    pub quarters_kind: String,
    pub crew_rates: CrewRates,
}

impl Default for DesignRules {
    fn default() -> Self {
        Self {
            min_volume_per_crew: 10.0,
            critical_systems: vec![
                kinds::LIFE_SUPPORT.to_string(),
                kinds::WASTE_MANAGEMENT.to_string(),
                kinds::MEDICAL_BAY.to_string(),
                kinds::POWER_SYSTEMS.to_string(),
            ],
            quarters_kind: kinds::CREW_QUARTERS.to_string(),
            crew_rates: CrewRates::default(),
        }
    }
}

impl DesignRules {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_critical_order() {
        let rules = DesignRules::default();
        assert_eq!(
            rules.critical_systems,
            vec![
                "Life Support",
                "Waste Management",
                "Medical Bay",
                "Power Systems"
            ]
        );
        assert_eq!(rules.quarters_kind, "Crew Quarters");
        assert_eq!(rules.min_volume_per_crew, 10.0);
    }

    #[test]
    fn power_is_not_crew_driven() {
        let rates = CrewRates::default();
        assert_eq!(rates.per_person(Resource::Power), None);
        assert_eq!(rates.per_person(Resource::Oxygen), Some(0.84));
        assert_eq!(rates.per_person(Resource::Cooling), None);
    }

    #[test]
    fn rules_load_from_json() {
        let mut rules = DesignRules::default();
        rules.min_volume_per_crew = 25.0;
        let json = serde_json::to_string(&rules).unwrap();
        let back = DesignRules::from_json(&json).unwrap();
        assert_eq!(back, rules);
    }
}
