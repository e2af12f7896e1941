//! Advisory design validation.
//!
//! Rules run in a fixed order and every failing rule is reported; nothing
//! short-circuits and nothing here blocks an edit. The only hard failure is a
//! module kind missing from the catalog, which means the design itself is
//! corrupt.
//!
//! 1. Enclosed volume per crew member below the minimum.
//! 2. Each critical system kind absent.
//! 3. Fewer quarters than crew.
//! 4. Oxygen, power, then CO2 removal supply below demand.

use std::fmt;

use crate::balance::compute_balance;
use crate::catalog::{Catalog, Resource};
use crate::config::DesignRules;
use crate::design::Design;
use crate::error::ConfigurationError;

/// Resources whose shortfall is reported, in report order.
const CHECKED_RESOURCES: [Resource; 3] = [Resource::Oxygen, Resource::Power, Resource::Co2Removal];

/// One soft problem with a design.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignIssue {
    VolumePerCrew { volume_per_crew: f64, minimum: f64 },
    MissingCriticalSystem(String),
    QuartersShortfall { kind: String, have: u32, need: u32 },
    ResourceShortfall { resource: Resource, provided: f64, required: f64 },
}

impl fmt::Display for DesignIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignIssue::VolumePerCrew {
                volume_per_crew,
                minimum,
            } => write!(
                f,
                "Volume per crew: {volume_per_crew:.1} m³ (min: {minimum} m³)"
            ),
            DesignIssue::MissingCriticalSystem(kind) => {
                write!(f, "Missing critical system: {kind}")
            }
            DesignIssue::QuartersShortfall { kind, have, need } => {
                write!(f, "{kind}: {have}/{need} needed")
            }
            DesignIssue::ResourceShortfall {
                resource,
                provided,
                required,
            } => {
                let unit = resource.unit();
                if *resource == Resource::Power {
                    write!(
                        f,
                        "{}: {provided:.0}/{required:.0} {unit}",
                        resource.label()
                    )
                } else {
                    write!(
                        f,
                        "{}: {provided:.1}/{required:.1} {unit}",
                        resource.label()
                    )
                }
            }
        }
    }
}

/// Run every rule against `design`. An empty list means the design is valid.
pub fn validate(
    design: &Design,
    catalog: &Catalog,
    rules: &DesignRules,
) -> Result<Vec<DesignIssue>, ConfigurationError> {
    let mut issues = Vec::new();

    let volume_per_crew = design.enclosed_volume() / design.mission.crew_divisor();
    if volume_per_crew < rules.min_volume_per_crew {
        issues.push(DesignIssue::VolumePerCrew {
            volume_per_crew,
            minimum: rules.min_volume_per_crew,
        });
    }

    for kind in &rules.critical_systems {
        if !design.has_kind(kind) {
            issues.push(DesignIssue::MissingCriticalSystem(kind.clone()));
        }
    }

    let quarters = design.count_of(&rules.quarters_kind);
    if quarters < design.mission.crew_size {
        issues.push(DesignIssue::QuartersShortfall {
            kind: rules.quarters_kind.clone(),
            have: quarters,
            need: design.mission.crew_size,
        });
    }

    let balance = compute_balance(design, catalog, &rules.crew_rates)?;
    for resource in CHECKED_RESOURCES {
        if !balance.is_satisfied(resource) {
            issues.push(DesignIssue::ResourceShortfall {
                resource,
                provided: balance.provided.get(resource),
                required: balance.required.get(resource),
            });
        }
    }

    Ok(issues)
}

/// [`validate`] rendered as human-readable lines.
pub fn validate_messages(
    design: &Design,
    catalog: &Catalog,
    rules: &DesignRules,
) -> Result<Vec<String>, ConfigurationError> {
    Ok(validate(design, catalog, rules)?
        .iter()
        .map(ToString::to_string)
        .collect())
}
