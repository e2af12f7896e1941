//! Habitat Headless Harness
//!
//! Drives the habitat resource model end-to-end against the bundled sample
//! design and a set of reference scenarios. Runs entirely in-process.
//!
//! Usage:
//!   cargo run -p habitat-simtest
//!   cargo run -p habitat-simtest -- --verbose

use std::f64::consts::PI;

use habitat_logic::balance::{compute_balance, MissionProjection};
use habitat_logic::catalog::{kinds, Catalog, Resource};
use habitat_logic::config::DesignRules;
use habitat_logic::design::{Design, Position};
use habitat_logic::envelope::{Envelope, EnvelopeShape};
use habitat_logic::geometry::{ModuleShape, ShapeKind};
use habitat_logic::library::DesignLibrary;
use habitat_logic::mission::MissionParams;
use habitat_logic::snapshot::{load_design, save_design, DesignSnapshot};
use habitat_logic::validation::{validate, validate_messages, DesignIssue};
use tracing_subscriber::EnvFilter;

// ── Bundled sample design (same format the designer exports) ────────────
const SAMPLE_JSON: &str = include_str!("../../../data/sample_design.json");

const TOLERANCE: f64 = 0.01;

// ── Logging ─────────────────────────────────────────────────────────────

/// Route the library's `log` records through a stderr subscriber.
/// `RUST_LOG` overrides the level picked by `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("logging disabled: {}", e);
    }
}

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < TOLERANCE
}

/// Place one of each kind. A kind missing from the catalog fails `check`.
fn place_all(
    design: &mut Design,
    catalog: &Catalog,
    kinds: &[&str],
    check: &str,
) -> Result<(), TestResult> {
    for kind in kinds {
        design
            .add_module(catalog, kind, Position::default())
            .map_err(|e| TestResult {
                name: check.into(),
                passed: false,
                detail: format!("setup failed: {}", e),
            })?;
    }
    Ok(())
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    init_logging(verbose);
    println!("=== Habitat Model Harness ===\n");

    let catalog = Catalog::standard();
    let rules = DesignRules::default();
    let mut results = Vec::new();

    // 1. Envelope volumes
    results.extend(validate_envelopes(verbose));

    // 2. Module solids
    results.extend(validate_module_geometry(verbose));

    // 3. Catalog consistency
    results.extend(validate_catalog(&catalog, &rules, verbose));

    // 4. Design rules
    results.extend(validate_design_rules(&catalog, &rules, verbose));

    // 5. Power budget
    results.extend(validate_power_budget(&catalog, &rules, verbose));

    // 6. Bundled sample design
    results.extend(validate_sample_design(&catalog, &rules, verbose));

    // 7. Per-location library
    results.extend(validate_library(&catalog, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Envelopes ────────────────────────────────────────────────────────

fn validate_envelopes(verbose: bool) -> Vec<TestResult> {
    println!("--- Envelopes ---");
    let mut results = Vec::new();

    let cylinder = Envelope::default().enclosed_volume();
    results.push(TestResult {
        name: "envelope_cylinder_12x8".into(),
        passed: close(cylinder, 603.19),
        detail: format!("{:.2} m³", cylinder),
    });

    let sphere = Envelope {
        shape: EnvelopeShape::Sphere,
        ..Envelope::default()
    }
    .enclosed_volume();
    results.push(TestResult {
        name: "envelope_sphere_d8".into(),
        passed: close(sphere, 268.08),
        detail: format!("{:.2} m³", sphere),
    });

    // Every shape: zero at zero diameter (box at zero height), non-negative always
    let mut bad = Vec::new();
    for shape in EnvelopeShape::all() {
        let zeroed = Envelope {
            shape: *shape,
            diameter: 0.0,
            height: 0.0,
            ..Envelope::default()
        };
        let negative = Envelope {
            shape: *shape,
            length: -5.0,
            diameter: -5.0,
            height: -5.0,
        };
        if zeroed.enclosed_volume() != 0.0 || negative.enclosed_volume() != 0.0 {
            bad.push(shape.label());
        }
    }
    results.push(TestResult {
        name: "envelope_degenerate_zero".into(),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            format!("{} shapes clamp to zero", EnvelopeShape::all().len())
        } else {
            format!("non-zero degenerate volume: {:?}", bad)
        },
    });

    // Growing any dimension never shrinks the envelope
    let mut regressions = 0;
    for shape in EnvelopeShape::all() {
        let base = Envelope {
            shape: *shape,
            length: 10.0,
            diameter: 6.0,
            height: 3.0,
        };
        let v = base.enclosed_volume();
        for grown in [
            Envelope {
                length: 20.0,
                ..base.clone()
            },
            Envelope {
                diameter: 12.0,
                ..base.clone()
            },
            Envelope {
                height: 6.0,
                ..base.clone()
            },
        ] {
            if grown.enclosed_volume() < v {
                regressions += 1;
            }
        }
    }
    results.push(TestResult {
        name: "envelope_monotonic".into(),
        passed: regressions == 0,
        detail: format!("{} regressions", regressions),
    });

    if verbose {
        for shape in EnvelopeShape::all() {
            let v = Envelope {
                shape: *shape,
                ..Envelope::default()
            }
            .enclosed_volume();
            println!("  {:<12} {:>8.2} m³", shape.label(), v);
        }
    }

    results
}

// ── 2. Module Geometry ──────────────────────────────────────────────────

fn validate_module_geometry(verbose: bool) -> Vec<TestResult> {
    println!("--- Module Geometry ---");
    let mut results = Vec::new();

    let cube = ModuleShape::Cube { side: 3.0 }.volume();
    results.push(TestResult {
        name: "geometry_default_cube".into(),
        passed: cube == 27.0,
        detail: format!("{:.2} m³", cube),
    });

    let cone = ModuleShape::Cone {
        radius: 3.0,
        height: 1.0,
    }
    .volume();
    results.push(TestResult {
        name: "geometry_cone_is_third_of_cylinder".into(),
        passed: close(cone, PI * 9.0 / 3.0),
        detail: format!("{:.3} m³", cone),
    });

    let mut bad = Vec::new();
    for kind in ShapeKind::all() {
        let unit = kind.uniform(1.0).volume();
        let zero = kind.uniform(0.0).volume();
        let roundtrip = ShapeKind::from_key(kind.key()).ok() == Some(*kind);
        if unit <= 0.0 || zero != 0.0 || !roundtrip {
            bad.push(kind.key());
        }
        if verbose {
            println!("  {:<16} unit volume {:>7.3} m³", kind.key(), unit);
        }
    }
    results.push(TestResult {
        name: "geometry_all_kinds_sane".into(),
        passed: bad.is_empty(),
        detail: if bad.is_empty() {
            format!("{} shape kinds checked", ShapeKind::all().len())
        } else {
            format!("bad kinds: {:?}", bad)
        },
    });

    let unknown = ShapeKind::from_key("dodecahedron");
    results.push(TestResult {
        name: "geometry_unknown_key_rejected".into(),
        passed: unknown.is_err(),
        detail: match unknown {
            Ok(k) => format!("unexpectedly parsed as {:?}", k),
            Err(e) => e.to_string(),
        },
    });

    results
}

// ── 3. Catalog ──────────────────────────────────────────────────────────

fn validate_catalog(catalog: &Catalog, rules: &DesignRules, verbose: bool) -> Vec<TestResult> {
    println!("--- Catalog ---");
    let mut results = Vec::new();

    results.push(TestResult {
        name: "catalog_ten_kinds".into(),
        passed: catalog.len() == 10,
        detail: format!("{} kinds", catalog.len()),
    });

    let bad_volume: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|e| e.baseline_volume <= 0.0)
        .map(|e| e.name.as_str())
        .collect();
    results.push(TestResult {
        name: "catalog_positive_baselines".into(),
        passed: bad_volume.is_empty(),
        detail: if bad_volume.is_empty() {
            "all baselines positive".into()
        } else {
            format!("non-positive baseline: {:?}", bad_volume)
        },
    });

    let draw: f64 = catalog
        .entries()
        .iter()
        .map(|e| e.consumed(Resource::Power))
        .sum();
    results.push(TestResult {
        name: "catalog_total_power_draw".into(),
        passed: draw == 5950.0,
        detail: format!("{:.0} W", draw),
    });

    let missing: Vec<_> = rules
        .critical_systems
        .iter()
        .chain(std::iter::once(&rules.quarters_kind))
        .filter(|k| !catalog.contains(k))
        .collect();
    results.push(TestResult {
        name: "catalog_covers_rules".into(),
        passed: missing.is_empty(),
        detail: if missing.is_empty() {
            format!(
                "{} critical systems + quarters present",
                rules.critical_systems.len()
            )
        } else {
            format!("rules name unknown kinds: {:?}", missing)
        },
    });

    if verbose {
        for e in catalog.entries() {
            println!(
                "  {:<18} {:>5.1} m³  {:>6.0} W  {:?}",
                e.name,
                e.baseline_volume,
                e.consumed(Resource::Power),
                e.category
            );
        }
    }

    results
}

// ── 4. Design Rules ─────────────────────────────────────────────────────

fn validate_design_rules(
    catalog: &Catalog,
    rules: &DesignRules,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Design Rules ---");
    let mut results = Vec::new();

    // Empty 4 × 3 × 2.5 box for six crew: every rule except power fires
    let cramped = Design::new(
        Envelope {
            shape: EnvelopeShape::Box,
            length: 4.0,
            diameter: 3.0,
            height: 2.5,
        },
        MissionParams {
            crew_size: 6,
            ..MissionParams::default()
        },
    );
    match validate_messages(&cramped, catalog, rules) {
        Ok(messages) => {
            let expected = [
                "Volume per crew: 5.0 m³ (min: 10 m³)",
                "Missing critical system: Life Support",
                "Missing critical system: Waste Management",
                "Missing critical system: Medical Bay",
                "Missing critical system: Power Systems",
                "Crew Quarters: 0/6 needed",
                "O2: 0.0/5.0 kg/day",
                "CO2 removal: 0.0/6.0 kg/day",
            ];
            if verbose {
                for m in &messages {
                    println!("  {}", m);
                }
            }
            results.push(TestResult {
                name: "rules_cramped_box_report".into(),
                passed: messages == expected,
                detail: format!("{} issues", messages.len()),
            });
        }
        Err(e) => results.push(TestResult {
            name: "rules_cramped_box_report".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    // Adding modules never changes the volume-per-crew verdict
    let mut furnished = cramped.clone();
    let furnishings = [kinds::STOWAGE, kinds::EXERCISE_AREA, kinds::FOOD_STORAGE];
    if let Err(failed) = place_all(
        &mut furnished,
        catalog,
        &furnishings,
        "rules_volume_ignores_modules",
    ) {
        results.push(failed);
        return results;
    }
    let still_flagged = validate(&furnished, catalog, rules)
        .map(|issues| {
            issues
                .iter()
                .any(|i| matches!(i, DesignIssue::VolumePerCrew { .. }))
        })
        .unwrap_or(false);
    results.push(TestResult {
        name: "rules_volume_ignores_modules".into(),
        passed: still_flagged,
        detail: format!("{} modules placed", furnished.modules().len()),
    });

    results
}

// ── 5. Power Budget ─────────────────────────────────────────────────────

fn validate_power_budget(
    catalog: &Catalog,
    rules: &DesignRules,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Power Budget ---");
    let mut results = Vec::new();

    // One of every kind except Communications
    let mut design = Design::default();
    let powered: Vec<&str> = catalog
        .entries()
        .iter()
        .map(|e| e.name.as_str())
        .filter(|name| *name != kinds::COMMUNICATIONS)
        .collect();
    if let Err(failed) = place_all(&mut design, catalog, &powered, "power_required_sum") {
        results.push(failed);
        return results;
    }

    match compute_balance(&design, catalog, &rules.crew_rates) {
        Ok(balance) => {
            results.push(TestResult {
                name: "power_required_sum".into(),
                passed: balance.required.power == 5450.0,
                detail: format!("{:.0} W required", balance.required.power),
            });
            results.push(TestResult {
                name: "power_single_plant_covers".into(),
                passed: balance.provided.power == 10000.0
                    && balance.is_satisfied(Resource::Power),
                detail: format!(
                    "{:.0} W provided, margin {:.1}%",
                    balance.provided.power,
                    balance.power_margin().unwrap_or(0.0) * 100.0
                ),
            });

            // Remove the plant: power joins the shortfalls
            let mut unpowered = design.clone();
            let plant = unpowered
                .modules()
                .iter()
                .find(|m| m.kind == kinds::POWER_SYSTEMS)
                .map(|m| m.id);
            if let Some(id) = plant {
                unpowered.remove_module(id);
            }
            let shortfalls = compute_balance(&unpowered, catalog, &rules.crew_rates)
                .map(|b| b.shortfalls())
                .unwrap_or_default();
            if verbose {
                for s in &shortfalls {
                    println!(
                        "  short {:<12} {:>8.1} {}",
                        s.resource.label(),
                        s.deficit(),
                        s.resource.unit()
                    );
                }
            }
            let powered_ok = !balance
                .shortfalls()
                .iter()
                .any(|s| s.resource == Resource::Power);
            results.push(TestResult {
                name: "power_shortfall_without_plant".into(),
                passed: powered_ok && shortfalls.iter().any(|s| s.resource == Resource::Power),
                detail: format!("{} shortfalls", shortfalls.len()),
            });
        }
        Err(e) => results.push(TestResult {
            name: "power_required_sum".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    results
}

// ── 6. Sample Design ────────────────────────────────────────────────────

fn validate_sample_design(
    catalog: &Catalog,
    rules: &DesignRules,
    verbose: bool,
) -> Vec<TestResult> {
    println!("--- Sample Design ---");
    let mut results = Vec::new();

    let design = match load_design(SAMPLE_JSON.as_bytes(), catalog) {
        Ok(d) => d,
        Err(e) => {
            results.push(TestResult {
                name: "sample_load".into(),
                passed: false,
                detail: format!("load error: {}", e),
            });
            return results;
        }
    };
    results.push(TestResult {
        name: "sample_load".into(),
        passed: design.modules().len() == 7,
        detail: format!(
            "{} modules at {}",
            design.modules().len(),
            design.mission.location
        ),
    });

    match design.statistics(catalog) {
        Ok(stats) => {
            results.push(TestResult {
                name: "sample_fits_envelope".into(),
                passed: stats.used_volume < stats.total_volume && stats.free_volume > 0.0,
                detail: format!(
                    "{:.1}/{:.1} m³ ({:.1}%)",
                    stats.used_volume, stats.total_volume, stats.utilization
                ),
            });
        }
        Err(e) => results.push(TestResult {
            name: "sample_fits_envelope".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    let issues =
        validate_messages(&design, catalog, rules).unwrap_or_else(|e| vec![e.to_string()]);
    results.push(TestResult {
        name: "sample_passes_rules".into(),
        passed: issues.is_empty(),
        detail: if issues.is_empty() {
            "no issues".into()
        } else {
            issues.join("; ")
        },
    });

    match compute_balance(&design, catalog, &rules.crew_rates) {
        Ok(balance) => {
            let days = design.mission.mission_duration_days;
            let projection = MissionProjection::new(&balance, days);
            if verbose {
                for p in &projection.resources {
                    println!(
                        "  {:<12} need {:>9.1}  have {:>9.1}  net {:>+9.1}",
                        p.resource.label(),
                        p.required_total,
                        p.provided_total,
                        p.net_total()
                    );
                }
            }
            results.push(TestResult {
                name: "sample_mission_projection".into(),
                passed: projection.oxygen_deficit().is_none()
                    && projection.co2_excess().is_none(),
                detail: format!("{} days, no O2 deficit", projection.mission_days),
            });
        }
        Err(e) => results.push(TestResult {
            name: "sample_mission_projection".into(),
            passed: false,
            detail: e.to_string(),
        }),
    }

    // Save and reload reproduces the design
    let mut buffer = Vec::new();
    let roundtrip = save_design(&mut buffer, &design, catalog, rules)
        .and_then(|()| load_design(buffer.as_slice(), catalog));
    results.push(TestResult {
        name: "sample_roundtrip".into(),
        passed: roundtrip.as_ref().map(|d| *d == design).unwrap_or(false),
        detail: match &roundtrip {
            Ok(_) => format!("{} bytes", buffer.len()),
            Err(e) => e.to_string(),
        },
    });

    // Exported statistics match a fresh computation
    let exported = serde_json::from_slice::<DesignSnapshot>(&buffer)
        .ok()
        .and_then(|s| s.statistics)
        .map(|r| r.stats);
    results.push(TestResult {
        name: "sample_exported_statistics".into(),
        passed: exported.is_some() && exported == design.statistics(catalog).ok(),
        detail: match &exported {
            Some(s) => format!(
                "{} modules, {:.1} m³ per crew",
                s.module_count, s.volume_per_crew
            ),
            None => "statistics missing from export".into(),
        },
    });

    results
}

// ── 7. Design Library ───────────────────────────────────────────────────

fn validate_library(catalog: &Catalog, _verbose: bool) -> Vec<TestResult> {
    println!("--- Design Library ---");
    let mut results = Vec::new();

    let mut library = DesignLibrary::new();
    let mut mars = Design::default();
    if let Err(failed) = place_all(
        &mut mars,
        catalog,
        &[kinds::LIFE_SUPPORT],
        "library_fresh_location",
    ) {
        results.push(failed);
        return results;
    }

    let moon = library.switch_location(mars.clone(), "Moon");
    results.push(TestResult {
        name: "library_fresh_location".into(),
        passed: moon.modules().is_empty() && moon.mission.location == "Moon",
        detail: format!("{} modules at {}", moon.modules().len(), moon.mission.location),
    });

    let back = library.switch_location(moon, "Mars");
    results.push(TestResult {
        name: "library_restores_saved".into(),
        passed: back == mars,
        detail: format!(
            "{} locations stored: {:?}",
            library.len(),
            library.locations().collect::<Vec<_>>()
        ),
    });

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_all_reports_unknown_kind_as_failure() {
        let catalog = Catalog::standard();
        let mut design = Design::default();
        let failed = place_all(
            &mut design,
            &catalog,
            &[kinds::STOWAGE, "Hydroponics"],
            "furnish",
        )
        .err()
        .unwrap();
        assert!(!failed.passed);
        assert_eq!(failed.name, "furnish");
        assert!(failed.detail.contains("Hydroponics"));
        assert_eq!(design.modules().len(), 1);
    }

    #[test]
    fn place_all_places_every_kind() {
        let catalog = Catalog::standard();
        let mut design = Design::default();
        assert!(place_all(
            &mut design,
            &catalog,
            &[kinds::STOWAGE, kinds::MEDICAL_BAY],
            "furnish"
        )
        .is_ok());
        assert_eq!(design.modules().len(), 2);
    }
}
