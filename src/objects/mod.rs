//! Natural body synthesis: planets, at most one large asteroid, and moons
//! for every system in the star catalog.
//!
//! Each system is generated by a pure function of its own row and the
//! global seed, so systems can be produced in any order (or in parallel)
//! with identical results.

pub mod layout;
pub mod naming;
pub mod scoring;

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ObjectsConfig;
use crate::error::PipelineError;
use crate::keyed::{choose_weighted, jitter, probability_for};
use crate::parser::read_star_catalog;
use crate::schema::{CelestialObject, ObjectClass, SpectralClass, StarSystem};
use crate::ui::{Phase, Ui};
use crate::writer::{write_system_objects, StagedFile};

pub use layout::{moon_position, primary_position};
pub use scoring::{score_object, Scores};

/// Primary objects per system (planets + asteroid), by weight
pub const PRIMARY_COUNT_WEIGHTS: [(u32, u32); 6] = [(0, 10), (1, 25), (2, 30), (3, 20), (4, 10), (5, 5)];

pub const PLANET_CLASS_WEIGHTS: [(ObjectClass, u32); 4] = [
    (ObjectClass::RockyPlanet, 60),
    (ObjectClass::DesertPlanet, 15),
    (ObjectClass::IcePlanet, 15),
    (ObjectClass::GasGiant, 10),
];

/// Chance that a system with two or more primaries trades one for an asteroid
pub const ASTEROID_CHANCE: f64 = 0.20;

const SYSTEM_SEED_MULTIPLIER: u64 = 0x9E37_79B1;

const GAS_GIANT_MOONS: [(u32, u32); 4] = [(0, 20), (1, 40), (2, 30), (3, 10)];
const SOLID_PLANET_MOONS: [(u32, u32); 2] = [(0, 50), (1, 50)];
const GAS_GIANT_MOON_CLASSES: [(ObjectClass, u32); 2] =
    [(ObjectClass::RockyMoon, 50), (ObjectClass::IcyMoon, 50)];
const SOLID_PLANET_MOON_CLASSES: [(ObjectClass, u32); 2] =
    [(ObjectClass::RockyMoon, 70), (ObjectClass::IcyMoon, 30)];

/// Per-system seed every structural decision of that system is keyed on
pub fn system_seed(seed: u64, system_id: u32) -> u64 {
    seed ^ (system_id as u64).wrapping_mul(SYSTEM_SEED_MULTIPLIER)
}

pub fn max_moons(class: ObjectClass) -> u32 {
    match class {
        ObjectClass::RockyPlanet | ObjectClass::DesertPlanet | ObjectClass::IcePlanet => 1,
        ObjectClass::GasGiant => 3,
        _ => 0,
    }
}

fn moon_count(key: &str, parent: ObjectClass) -> u32 {
    let cap = max_moons(parent);
    if cap == 0 {
        return 0;
    }
    let table: &[(u32, u32)] = if parent == ObjectClass::GasGiant {
        &GAS_GIANT_MOONS
    } else {
        &SOLID_PLANET_MOONS
    };
    let allowed: Vec<(u32, u32)> = table.iter().copied().filter(|(n, _)| *n <= cap).collect();
    choose_weighted(key, &allowed)
}

fn moon_class(key: &str, parent: ObjectClass) -> ObjectClass {
    if parent == ObjectClass::GasGiant {
        choose_weighted(key, &GAS_GIANT_MOON_CLASSES)
    } else {
        choose_weighted(key, &SOLID_PLANET_MOON_CLASSES)
    }
}

/// Structural decisions for one body before naming, layout and scoring
struct Draft {
    class: ObjectClass,
    parent: Option<u32>,
}

fn draft_system(system_id: u32, config: &ObjectsConfig) -> Vec<Draft> {
    let ss = system_seed(config.seed, system_id);

    let count = choose_weighted(&format!("{}:count", ss), &PRIMARY_COUNT_WEIGHTS)
        .min(config.max_objects_per_system);

    let mut drafts: Vec<Draft> = (0..count)
        .map(|slot| Draft {
            class: choose_weighted(&format!("{}:class:{}", ss, slot), &PLANET_CLASS_WEIGHTS),
            parent: None,
        })
        .collect();

    if drafts.len() >= 2 && probability_for(&format!("{}:asteroid", ss)) < ASTEROID_CHANCE {
        let candidates: Vec<usize> = drafts
            .iter()
            .enumerate()
            .filter(|(_, d)| d.class != ObjectClass::GasGiant)
            .map(|(i, _)| i)
            .collect();
        if !candidates.is_empty() {
            let pick = jitter(&format!("{}:asteroid-slot", ss), 0, candidates.len() as i32 - 1);
            drafts[candidates[pick as usize]].class = ObjectClass::LargeAsteroid;
        }
    }

    let primaries = drafts.len() as u32;
    for parent_id in 0..primaries {
        let parent_class = drafts[parent_id as usize].class;
        let moons = moon_count(&format!("{}:moons:{}", ss, parent_id), parent_class);
        for _ in 0..moons {
            let moon_id = drafts.len() as u32;
            drafts.push(Draft {
                class: moon_class(&format!("{}:moon-class:{}", ss, moon_id), parent_class),
                parent: Some(parent_id),
            });
        }
    }

    drafts
}

/// Name, place and score drafted bodies. Object ids are draft indices.
fn finish_system(system: &StarSystem, drafts: &[Draft], names: &[String]) -> Vec<CelestialObject> {
    let spectral = SpectralClass::from_spect(&system.spectral_type);
    let mut objects: Vec<CelestialObject> = Vec::with_capacity(drafts.len());
    let mut primary_index = 0usize;

    for (object_id, draft) in drafts.iter().enumerate() {
        let object_id = object_id as u32;
        let position = match draft.parent {
            None => {
                let pos = primary_position(system.id, primary_index);
                primary_index += 1;
                pos
            }
            Some(parent) => {
                let p = &objects[parent as usize];
                moon_position(system.id, object_id, (p.local_x, p.local_y))
            }
        };
        let scores = score_object(system.id, object_id, draft.class, spectral);

        objects.push(CelestialObject {
            system_id: system.id,
            object_id,
            name: names[object_id as usize].clone(),
            class: draft.class,
            parent_object_id: draft.parent,
            is_moon: draft.parent.is_some(),
            local_x: position.0,
            local_y: position.1,
            ore_richness: scores.ore_richness,
            fuel_richness: scores.fuel_richness,
            habitability: scores.habitability,
            risk: scores.risk,
            artifact: None,
        });
    }

    objects
}

fn draft_names(system_name: &str, drafts: &[Draft]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(drafts.len());
    let mut moons_per_parent: Vec<usize> = vec![0; drafts.len()];

    // Primaries come first, so a primary's index is its slot among primaries.
    // The asteroid keeps its slot: planets after it skip that numeral.
    for (index, draft) in drafts.iter().enumerate() {
        let name = match draft.parent {
            None if draft.class == ObjectClass::LargeAsteroid => naming::asteroid_name(system_name),
            None => naming::planet_name(system_name, index + 1),
            Some(parent) => {
                let moon_index = moons_per_parent[parent as usize];
                moons_per_parent[parent as usize] += 1;
                naming::moon_name(&names[parent as usize], moon_index)
            }
        };
        names.push(name);
    }

    names
}

/// The home system's fixed bodies: Earth, Luna (moon of Earth), Mars, Ceres
fn sol_system(system: &StarSystem) -> Vec<CelestialObject> {
    let drafts = [
        Draft {
            class: ObjectClass::RockyPlanet,
            parent: None,
        },
        Draft {
            class: ObjectClass::RockyMoon,
            parent: Some(0),
        },
        Draft {
            class: ObjectClass::RockyPlanet,
            parent: None,
        },
        Draft {
            class: ObjectClass::LargeAsteroid,
            parent: None,
        },
    ];
    let names: Vec<String> = ["Earth", "Luna", "Mars", "Ceres"]
        .iter()
        .map(|n| n.to_string())
        .collect();
    finish_system(system, &drafts, &names)
}

/// Every natural body of one system
pub fn generate_system(system: &StarSystem, config: &ObjectsConfig) -> Vec<CelestialObject> {
    if system.is_home() {
        return sol_system(system);
    }
    let drafts = draft_system(system.id, config);
    let names = draft_names(&system.name, &drafts);
    finish_system(system, &drafts, &names)
}

/// Generate bodies for a whole catalog, ordered by `(system_id, object_id)`.
///
/// The catalog must contain the home system and no duplicate ids.
pub fn generate_objects(
    systems: &[StarSystem],
    config: &ObjectsConfig,
    ui: &mut impl Ui,
) -> Result<Vec<CelestialObject>> {
    let mut seen = HashSet::with_capacity(systems.len());
    for system in systems {
        if !seen.insert(system.id) {
            return Err(PipelineError::consistency(format!(
                "star catalog lists system id {} more than once",
                system.id
            ))
            .into());
        }
    }
    if !seen.contains(&0) {
        return Err(PipelineError::consistency("star catalog has no home system (id 0)").into());
    }

    ui.set_phase(Phase::Generating);
    let total = systems.len() as u64;
    let mut objects = Vec::new();
    for (i, system) in systems.iter().enumerate() {
        let generated = generate_system(system, config);
        debug!(system_id = system.id, objects = generated.len(), "generated system");
        objects.extend(generated);
        ui.set_progress(i as u64 + 1, total, system.name.as_str());
    }
    ui.clear_progress();

    objects.sort_by_key(|o| (o.system_id, o.object_id));
    info!(
        systems = systems.len(),
        objects = objects.len(),
        seed = config.seed,
        "generated natural objects"
    );
    Ok(objects)
}

/// Read `star_catalog.csv`, generate bodies and write `system_objects.csv`
pub fn build_system_objects(
    input_stars: &Path,
    output_objects: &Path,
    config: &ObjectsConfig,
    ui: &mut impl Ui,
) -> Result<Vec<CelestialObject>> {
    ui.set_phase(Phase::Loading);
    let systems = read_star_catalog(input_stars)
        .with_context(|| format!("Failed to load star catalog {:?}", input_stars))?;
    ui.log(format!("Loaded {} systems", systems.len()));

    let objects = generate_objects(&systems, config, ui)?;

    ui.set_phase(Phase::Writing);
    let mut out = StagedFile::new(output_objects)?;
    write_system_objects(&mut out, &objects, false)?;
    out.commit()?;
    ui.log(format!(
        "Generated {} natural objects across {} systems into {:?}",
        objects.len(),
        systems.len(),
        output_objects
    ));

    Ok(objects)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::SilentUi;

    fn system(id: u32, name: &str, spect: &str) -> StarSystem {
        StarSystem {
            id,
            name: name.to_string(),
            distance_ly: id as f64,
            grid_x: 50,
            grid_y: 50,
            spectral_type: spect.to_string(),
        }
    }

    #[test]
    fn test_sol_has_fixed_bodies() {
        let objects = generate_system(&system(0, "Sol", "G2V"), &ObjectsConfig::default());
        let summary: Vec<(&str, ObjectClass, Option<u32>, bool)> = objects
            .iter()
            .map(|o| (o.name.as_str(), o.class, o.parent_object_id, o.is_moon))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Earth", ObjectClass::RockyPlanet, None, false),
                ("Luna", ObjectClass::RockyMoon, Some(0), true),
                ("Mars", ObjectClass::RockyPlanet, None, false),
                ("Ceres", ObjectClass::LargeAsteroid, None, false),
            ]
        );
    }

    #[test]
    fn test_sol_ignores_seed_and_cap_for_structure() {
        let config = ObjectsConfig {
            max_objects_per_system: 0,
            seed: 99,
        };
        let a = generate_system(&system(0, "Sol", "G2V"), &config);
        let b = generate_system(&system(0, "Sol", "G2V"), &ObjectsConfig::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_structure_invariants_across_many_systems() {
        let config = ObjectsConfig::default();
        let mut saw_gas_giant_moons = false;
        let mut saw_asteroid = false;

        for id in 1..400 {
            let objects = generate_system(&system(id, "Test", "K2V"), &config);
            let primaries: Vec<&CelestialObject> = objects.iter().filter(|o| !o.is_moon).collect();
            assert!(primaries.len() <= 5);
            assert!(
                objects
                    .iter()
                    .filter(|o| o.class == ObjectClass::LargeAsteroid)
                    .count()
                    <= 1
            );

            for (i, o) in objects.iter().enumerate() {
                assert_eq!(o.object_id, i as u32);
                assert!(o.local_x < 50 && o.local_y < 50);
                if let Some(parent) = o.parent_object_id {
                    let parent = &objects[parent as usize];
                    assert!(!parent.is_moon);
                    assert!(o.class.is_moon_class());
                    assert_ne!(parent.class, ObjectClass::LargeAsteroid);
                    if parent.class == ObjectClass::GasGiant {
                        saw_gas_giant_moons = true;
                    }
                } else {
                    assert!(!o.class.is_moon_class());
                }
                if o.class == ObjectClass::GasGiant {
                    assert_eq!(o.ore_richness, 0);
                }
                saw_asteroid |= o.class == ObjectClass::LargeAsteroid;
            }

            for p in &primaries {
                let moons = objects
                    .iter()
                    .filter(|o| o.parent_object_id == Some(p.object_id))
                    .count() as u32;
                assert!(moons <= max_moons(p.class));
            }
        }

        assert!(saw_gas_giant_moons);
        assert!(saw_asteroid);
    }

    #[test]
    fn test_cap_limits_primaries() {
        let config = ObjectsConfig {
            max_objects_per_system: 1,
            seed: 0,
        };
        for id in 1..200 {
            let objects = generate_system(&system(id, "Capped", "M3V"), &config);
            assert!(objects.iter().filter(|o| !o.is_moon).count() <= 1);
        }
    }

    #[test]
    fn test_names_follow_parents() {
        let config = ObjectsConfig::default();
        let objects: Vec<CelestialObject> = (1..100)
            .flat_map(|id| generate_system(&system(id, "Ross 128", "M4V"), &config))
            .collect();

        for o in objects.iter().filter(|o| o.is_moon) {
            let parent = objects
                .iter()
                .find(|p| p.system_id == o.system_id && Some(p.object_id) == o.parent_object_id)
                .unwrap();
            assert!(o.name.starts_with(&format!("{}-", parent.name)));
        }
        assert!(objects.iter().any(|o| o.name == "Ross 128 I"));
        for o in objects.iter().filter(|o| o.class == ObjectClass::LargeAsteroid) {
            assert_eq!(o.name, "Ross 128 Asteroid");
        }
    }

    #[test]
    fn test_planet_numerals_follow_primary_slots() {
        let config = ObjectsConfig::default();
        let mut saw_skipped_numeral = false;

        for id in 1..2000 {
            let objects = generate_system(&system(id, "T", "G2V"), &config);
            for o in objects.iter().filter(|o| !o.is_moon) {
                if o.class == ObjectClass::LargeAsteroid {
                    assert_eq!(o.name, "T Asteroid");
                } else {
                    assert_eq!(o.name, naming::planet_name("T", o.object_id as usize + 1));
                }
            }
            saw_skipped_numeral |= objects
                .iter()
                .any(|o| o.class == ObjectClass::LargeAsteroid && o.object_id == 0);
        }
        assert!(saw_skipped_numeral);
    }

    #[test]
    fn test_seed_changes_layout_but_is_deterministic() {
        let s = system(42, "Lalande", "M2V");
        let a = generate_system(&s, &ObjectsConfig::default());
        let again = generate_system(&s, &ObjectsConfig::default());
        assert_eq!(a, again);

        let differs = (1..50).any(|seed| {
            let config = ObjectsConfig {
                seed,
                ..Default::default()
            };
            generate_system(&s, &config) != a
        });
        assert!(differs);
    }

    #[test]
    fn test_order_independent_generation() {
        let systems: Vec<StarSystem> = (0..30).map(|id| system(id, "S", "G0V")).collect();
        let mut reversed = systems.clone();
        reversed.reverse();

        let config = ObjectsConfig::default();
        let a = generate_objects(&systems, &config, &mut SilentUi::new()).unwrap();
        let b = generate_objects(&reversed, &config, &mut SilentUi::new()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_missing_home_system_is_rejected() {
        let systems = vec![system(1, "Lonely", "K0V")];
        let err = generate_objects(&systems, &ObjectsConfig::default(), &mut SilentUi::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::Consistency(_))
        ));
    }

    #[test]
    fn test_duplicate_system_ids_are_rejected() {
        let systems = vec![system(0, "Sol", "G2V"), system(0, "Sol again", "G2V")];
        assert!(generate_objects(&systems, &ObjectsConfig::default(), &mut SilentUi::new()).is_err());
    }
}
