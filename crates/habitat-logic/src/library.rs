//! One saved design per destination.
//!
//! Switching location in the designer stores the current design under the
//! old label and brings back whatever was last stored under the new one.

use std::collections::BTreeMap;

use crate::design::Design;

#[derive(Debug, Clone, Default)]
pub struct DesignLibrary {
    designs: BTreeMap<String, Design>,
}

impl DesignLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `design` under its own mission location, replacing any previous
    /// design for that label. Returns the replaced design.
    pub fn store(&mut self, design: Design) -> Option<Design> {
        let location = design.mission.location.clone();
        log::debug!(
            "storing design for {location} ({} modules)",
            design.modules().len()
        );
        self.designs.insert(location, design)
    }

    pub fn recall(&self, location: &str) -> Option<&Design> {
        self.designs.get(location)
    }

    pub fn remove(&mut self, location: &str) -> Option<Design> {
        self.designs.remove(location)
    }

    /// Store `current` and return the design saved for `location`, or a fresh
    /// copy of `current` retargeted to `location` when none was saved.
    pub fn switch_location(&mut self, current: Design, location: &str) -> Design {
        let mut next = match self.designs.get(location) {
            Some(saved) => saved.clone(),
            None => {
                let mut fresh = Design::new(current.envelope.clone(), current.mission.clone());
                fresh.mission.location = location.to_string();
                fresh
            }
        };
        next.mission.location = location.to_string();
        self.store(current);
        next
    }

    /// Stored location labels in sorted order.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.designs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.designs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.designs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{kinds, Catalog};
    use crate::design::Position;
    use crate::mission::MissionParams;

    fn design_at(location: &str, catalog: &Catalog, kinds: &[&str]) -> Design {
        let mut d = Design::default();
        d.mission = MissionParams {
            location: location.to_string(),
            ..MissionParams::default()
        };
        for k in kinds {
            d.add_module(catalog, k, Position::default()).unwrap();
        }
        d
    }

    #[test]
    fn store_and_recall_by_location() {
        let c = Catalog::standard();
        let mut lib = DesignLibrary::new();
        assert!(lib.is_empty());
        lib.store(design_at("Mars", &c, &[kinds::LIFE_SUPPORT]));
        lib.store(design_at("Moon", &c, &[kinds::FOOD_STORAGE, kinds::STOWAGE]));

        assert_eq!(lib.len(), 2);
        assert_eq!(lib.recall("Mars").unwrap().modules().len(), 1);
        assert_eq!(lib.recall("Moon").unwrap().modules().len(), 2);
        assert!(lib.recall("Outer Space").is_none());
        assert_eq!(lib.locations().collect::<Vec<_>>(), vec!["Mars", "Moon"]);
    }

    #[test]
    fn store_replaces_previous() {
        let c = Catalog::standard();
        let mut lib = DesignLibrary::new();
        assert!(lib.store(design_at("Mars", &c, &[])).is_none());
        let old = lib.store(design_at("Mars", &c, &[kinds::MEDICAL_BAY]));
        assert_eq!(old.unwrap().modules().len(), 0);
        assert_eq!(lib.len(), 1);
    }

    #[test]
    fn switch_to_unsaved_location_keeps_shell() {
        let c = Catalog::standard();
        let mut lib = DesignLibrary::new();
        let mars = design_at("Mars", &c, &[kinds::LIFE_SUPPORT, kinds::FOOD_STORAGE]);
        let moon = lib.switch_location(mars.clone(), "Moon");

        assert_eq!(moon.mission.location, "Moon");
        assert_eq!(moon.envelope, mars.envelope);
        assert_eq!(moon.mission.crew_size, mars.mission.crew_size);
        assert!(moon.modules().is_empty());
        assert_eq!(lib.recall("Mars"), Some(&mars));
    }

    #[test]
    fn switch_back_restores_saved_design() {
        let c = Catalog::standard();
        let mut lib = DesignLibrary::new();
        let mars = design_at("Mars", &c, &[kinds::POWER_SYSTEMS]);
        let moon = lib.switch_location(mars.clone(), "Moon");
        let back = lib.switch_location(moon, "Mars");
        assert_eq!(back, mars);
        assert!(lib.recall("Moon").is_some());
    }

    #[test]
    fn remove_forgets_location() {
        let c = Catalog::standard();
        let mut lib = DesignLibrary::new();
        lib.store(design_at("Moon", &c, &[]));
        assert!(lib.remove("Moon").is_some());
        assert!(lib.remove("Moon").is_none());
        assert!(lib.is_empty());
    }
}
