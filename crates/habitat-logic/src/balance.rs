//! Life-support balance: aggregate supply vs. demand per tracked resource.
//!
//! Demand for oxygen, CO2 removal, water and waste processing is crew-driven:
//! a fixed per-person daily rate × crew size. Power demand is the sum of each
//! placed module's catalog draw. Supply is the sum of each placed module's
//! catalog `provides` rate.
//!
//! Rates are per placed module and ignore `count`: a Life Support module
//! with `count = 3` supplies the same 10 kg O2/day as one with `count = 1`.
//! Only volume and quarters accounting use the multiplier.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Resource};
use crate::config::CrewRates;
use crate::design::Design;
use crate::error::ConfigurationError;

/// One figure per tracked resource. Units follow [`Resource::unit`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTotals {
    pub oxygen: f64,
    pub co2_removal: f64,
    #[serde(alias = "water_recycling")]
    pub water: f64,
    pub power: f64,
    pub waste_processing: f64,
}

impl ResourceTotals {
    /// Value for a tracked resource; capacity-only resources read as 0.
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Oxygen => self.oxygen,
            Resource::Co2Removal => self.co2_removal,
            Resource::Water => self.water,
            Resource::Power => self.power,
            Resource::WasteProcessing => self.waste_processing,
            _ => 0.0,
        }
    }

    fn add(&mut self, resource: Resource, amount: f64) {
        match resource {
            Resource::Oxygen => self.oxygen += amount,
            Resource::Co2Removal => self.co2_removal += amount,
            Resource::Water => self.water += amount,
            Resource::Power => self.power += amount,
            Resource::WasteProcessing => self.waste_processing += amount,
            _ => {}
        }
    }
}

/// Required and provided rates for one design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceBalance {
    pub required: ResourceTotals,
    pub provided: ResourceTotals,
}

/// A tracked resource whose supply does not cover demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Shortfall {
    pub resource: Resource,
    pub provided: f64,
    pub required: f64,
}

impl Shortfall {
    pub fn deficit(&self) -> f64 {
        self.required - self.provided
    }
}

/// Compute the daily balance of a design.
pub fn compute_balance(
    design: &Design,
    catalog: &Catalog,
    rates: &CrewRates,
) -> Result<ResourceBalance, ConfigurationError> {
    let crew = design.mission.crew_size as f64;
    let mut required = ResourceTotals::default();
    let mut provided = ResourceTotals::default();

    for resource in Resource::TRACKED {
        if let Some(per_person) = rates.per_person(resource) {
            required.add(resource, per_person * crew);
        }
    }

    for module in design.modules() {
        let entry = catalog.get(&module.kind)?;
        required.add(Resource::Power, entry.consumed(Resource::Power));
        for resource in Resource::TRACKED {
            provided.add(resource, entry.provided(resource));
        }
    }

    Ok(ResourceBalance { required, provided })
}

impl ResourceBalance {
    pub fn is_satisfied(&self, resource: Resource) -> bool {
        self.provided.get(resource) >= self.required.get(resource)
    }

    /// Every tracked resource with supply below demand, in tracked order.
    pub fn shortfalls(&self) -> Vec<Shortfall> {
        Resource::TRACKED
            .iter()
            .filter(|r| !self.is_satisfied(**r))
            .map(|r| Shortfall {
                resource: *r,
                provided: self.provided.get(*r),
                required: self.required.get(*r),
            })
            .collect()
    }

    /// Spare power as a fraction of demand. `None` when nothing draws power.
    pub fn power_margin(&self) -> Option<f64> {
        if self.required.power > 0.0 {
            Some((self.provided.power - self.required.power) / self.required.power)
        } else {
            None
        }
    }
}

/// Crew-driven consumables projected over the whole mission.
pub const PROJECTED: [Resource; 4] = [
    Resource::Oxygen,
    Resource::Co2Removal,
    Resource::Water,
    Resource::WasteProcessing,
];

/// Cumulative totals of one consumable over the mission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectedResource {
    pub resource: Resource,
    pub required_total: f64,
    pub provided_total: f64,
}

impl ProjectedResource {
    /// Provided minus required over the mission. Negative means a deficit.
    pub fn net_total(&self) -> f64 {
        self.provided_total - self.required_total
    }
}

/// The daily balance scaled by mission length.
///
/// Power is a rate, not a stock, and is left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionProjection {
    pub mission_days: u32,
    pub resources: Vec<ProjectedResource>,
}

impl MissionProjection {
    pub fn new(balance: &ResourceBalance, mission_days: u32) -> Self {
        let days = mission_days as f64;
        let resources = PROJECTED
            .iter()
            .map(|r| ProjectedResource {
                resource: *r,
                required_total: balance.required.get(*r) * days,
                provided_total: balance.provided.get(*r) * days,
            })
            .collect();
        Self {
            mission_days,
            resources,
        }
    }

    pub fn get(&self, resource: Resource) -> Option<&ProjectedResource> {
        self.resources.iter().find(|p| p.resource == resource)
    }

    /// kg of O2 short over the mission, if any.
    pub fn oxygen_deficit(&self) -> Option<f64> {
        self.get(Resource::Oxygen)
            .map(ProjectedResource::net_total)
            .filter(|net| *net < 0.0)
            .map(|net| -net)
    }

    /// kg of CO2 produced but not scrubbed over the mission, if any.
    pub fn co2_excess(&self) -> Option<f64> {
        self.get(Resource::Co2Removal)
            .map(ProjectedResource::net_total)
            .filter(|net| *net < 0.0)
            .map(|net| -net)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::kinds;
    use crate::design::Position;

    fn design_with(placed: &[&str], crew: u32) -> (Design, Catalog) {
        let catalog = Catalog::standard();
        let mut design = Design::default();
        design.mission.crew_size = crew;
        for k in placed {
            design.add_module(&catalog, k, Position::default()).unwrap();
        }
        (design, catalog)
    }

    #[test]
    fn empty_design_requires_crew_rates_only() {
        let (d, c) = design_with(&[], 6);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert!((b.required.oxygen - 5.04).abs() < 1e-9);
        assert!((b.required.co2_removal - 6.0).abs() < 1e-9);
        assert!((b.required.water - 21.0).abs() < 1e-9);
        assert!((b.required.waste_processing - 0.9).abs() < 1e-9);
        assert_eq!(b.required.power, 0.0);
        assert_eq!(b.provided, ResourceTotals::default());
    }

    #[test]
    fn power_satisfied_with_one_plant() {
        // Everything except Communications: 5950 - 500 = 5450 W of draw.
        let (d, c) = design_with(
            &[
                kinds::LIFE_SUPPORT,
                kinds::WASTE_MANAGEMENT,
                kinds::THERMAL_CONTROL,
                kinds::POWER_SYSTEMS,
                kinds::STOWAGE,
                kinds::FOOD_STORAGE,
                kinds::MEDICAL_BAY,
                kinds::CREW_QUARTERS,
                kinds::EXERCISE_AREA,
            ],
            6,
        );
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert_eq!(b.required.power, 5450.0);
        assert_eq!(b.provided.power, 10000.0);
        assert!(b.is_satisfied(Resource::Power));
        let margin = b.power_margin().unwrap();
        assert!((margin - (10000.0 - 5450.0) / 5450.0).abs() < 1e-12);
    }

    #[test]
    fn rates_ignore_count() {
        let (mut d, c) = design_with(&[kinds::LIFE_SUPPORT], 6);
        let id = d.modules()[0].id;
        let before = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        d.set_count(id, 5);
        let after = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert_eq!(before, after);
        assert_eq!(after.provided.oxygen, 10.0);
    }

    #[test]
    fn each_placed_module_contributes() {
        let (d, c) = design_with(&[kinds::LIFE_SUPPORT, kinds::LIFE_SUPPORT], 6);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert_eq!(b.provided.oxygen, 20.0);
        assert_eq!(b.provided.co2_removal, 24.0);
        assert_eq!(b.required.power, 4000.0);
    }

    #[test]
    fn waste_management_supplies_water() {
        let (d, c) = design_with(&[kinds::WASTE_MANAGEMENT], 1);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert_eq!(b.provided.water, 3.0);
        assert_eq!(b.provided.waste_processing, 5.0);
    }

    #[test]
    fn shortfalls_in_tracked_order() {
        let (d, c) = design_with(&[kinds::LIFE_SUPPORT], 20);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        let short: Vec<Resource> = b.shortfalls().iter().map(|s| s.resource).collect();
        // 20 crew need 16.8 kg O2 and 20 kg CO2 removal; no water, waste or power supply.
        assert_eq!(
            short,
            vec![
                Resource::Oxygen,
                Resource::Co2Removal,
                Resource::Water,
                Resource::Power,
                Resource::WasteProcessing
            ]
        );
        let o2 = &b.shortfalls()[0];
        assert!((o2.deficit() - 6.8).abs() < 1e-9);
    }

    #[test]
    fn zero_crew_zero_modules_is_balanced() {
        let (d, c) = design_with(&[], 0);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        assert!(b.shortfalls().is_empty());
        assert_eq!(b.power_margin(), None);
    }

    #[test]
    fn unknown_kind_fails() {
        let c = Catalog::standard();
        let d = Design::default();
        let tiny = Catalog::new(Vec::new());
        let mut d2 = d.clone();
        d2.add_module(&c, kinds::STOWAGE, Position::default()).unwrap();
        assert!(compute_balance(&d, &tiny, &CrewRates::default()).is_ok());
        assert_eq!(
            compute_balance(&d2, &tiny, &CrewRates::default()),
            Err(ConfigurationError::UnknownModuleKind("Stowage".to_string()))
        );
    }

    #[test]
    fn projection_flags_oxygen_and_co2() {
        let (d, c) = design_with(&[], 6);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        let p = MissionProjection::new(&b, 540);
        let deficit = p.oxygen_deficit().unwrap();
        assert!((deficit - 6.0 * 0.84 * 540.0).abs() < 1e-6);
        let excess = p.co2_excess().unwrap();
        assert!((excess - 6.0 * 540.0).abs() < 1e-6);
        assert!(p.get(Resource::Power).is_none());
    }

    #[test]
    fn projection_clear_when_supplied() {
        let (d, c) = design_with(&[kinds::LIFE_SUPPORT], 6);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        let p = MissionProjection::new(&b, 365);
        assert_eq!(p.oxygen_deficit(), None);
        assert_eq!(p.co2_excess(), None);
        let o2 = p.get(Resource::Oxygen).unwrap();
        assert!((o2.net_total() - (10.0 - 5.04) * 365.0).abs() < 1e-6);
    }

    #[test]
    fn zero_day_mission_projects_nothing() {
        let (d, c) = design_with(&[], 6);
        let b = compute_balance(&d, &c, &CrewRates::default()).unwrap();
        let p = MissionProjection::new(&b, 0);
        assert_eq!(p.oxygen_deficit(), None);
        assert!(p.resources.iter().all(|r| r.net_total() == 0.0));
    }
}
