//! Invariant checks over generated files.
//!
//! These re-derive nothing; they only confirm that what was written obeys
//! the file contract the game client relies on.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::objects::layout::LOCAL_MAP_SIZE;
use crate::projector::GRID_SIZE;
use crate::schema::{CelestialObject, ObjectClass, StarSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub subject: String,
    pub message: String,
}

impl Violation {
    fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

pub fn verify_catalog(systems: &[StarSystem]) -> Vec<Violation> {
    let mut violations = Vec::new();

    match systems.iter().find(|s| s.id == 0) {
        None => violations.push(Violation::new("catalog", "no home system with id 0")),
        Some(sol) => {
            if let Some(nearer) = systems.iter().find(|s| s.distance_ly < sol.distance_ly) {
                violations.push(Violation::new(
                    format!("system {}", nearer.id),
                    "is nearer than the home system",
                ));
            }
        }
    }

    let mut ids = HashSet::new();
    let mut cells: HashMap<(u8, u8), u32> = HashMap::new();
    for system in systems {
        let subject = format!("system {}", system.id);
        if !ids.insert(system.id) {
            violations.push(Violation::new(&subject, "duplicate id"));
        }
        if system.grid_x >= GRID_SIZE || system.grid_y >= GRID_SIZE {
            violations.push(Violation::new(&subject, "grid position off the map"));
        }
        if let Some(other) = cells.insert((system.grid_x, system.grid_y), system.id) {
            violations.push(Violation::new(
                &subject,
                format!(
                    "shares cell ({}, {}) with system {}",
                    system.grid_x, system.grid_y, other
                ),
            ));
        }
        if !(system.distance_ly >= 0.0) {
            violations.push(Violation::new(&subject, "negative distance"));
        }
    }

    for pair in systems.windows(2) {
        if pair[1].distance_ly < pair[0].distance_ly {
            violations.push(Violation::new(
                format!("system {}", pair[1].id),
                "catalog is not sorted by distance",
            ));
            break;
        }
    }

    violations
}

const SOL_PATTERN: [(u32, &str, ObjectClass, Option<u32>); 4] = [
    (0, "Earth", ObjectClass::RockyPlanet, None),
    (1, "Luna", ObjectClass::RockyMoon, Some(0)),
    (2, "Mars", ObjectClass::RockyPlanet, None),
    (3, "Ceres", ObjectClass::LargeAsteroid, None),
];

pub fn verify_objects(systems: &[StarSystem], objects: &[CelestialObject]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let system_ids: HashSet<u32> = systems.iter().map(|s| s.id).collect();
    let by_key: HashMap<(u32, u32), &CelestialObject> = objects
        .iter()
        .map(|o| ((o.system_id, o.object_id), o))
        .collect();

    if by_key.len() != objects.len() {
        violations.push(Violation::new("objects", "duplicate (system_id, object_id) pairs"));
    }

    for object in objects {
        let subject = format!("object {}:{}", object.system_id, object.object_id);

        if !system_ids.contains(&object.system_id) {
            violations.push(Violation::new(&subject, "refers to an unknown system"));
        }
        if object.local_x >= LOCAL_MAP_SIZE || object.local_y >= LOCAL_MAP_SIZE {
            violations.push(Violation::new(&subject, "local position off the system map"));
        }
        if object.ore_richness > 3 || object.fuel_richness > 3 {
            violations.push(Violation::new(&subject, "richness outside 0..=3"));
        }
        if object.habitability > 100 || object.risk > 100 {
            violations.push(Violation::new(&subject, "habitability or risk outside 0..=100"));
        }
        if object.class == ObjectClass::GasGiant {
            if object.ore_richness != 0 {
                violations.push(Violation::new(&subject, "gas giant with ore"));
            }
            if object.artifact.is_some() {
                violations.push(Violation::new(&subject, "gas giant with an artifact"));
            }
        }

        match (object.is_moon, object.parent_object_id) {
            (true, Some(parent_id)) => match by_key.get(&(object.system_id, parent_id)) {
                None => violations.push(Violation::new(&subject, "parent does not exist")),
                Some(parent) if parent.is_moon => {
                    violations.push(Violation::new(&subject, "parent is itself a moon"))
                }
                Some(_) => {}
            },
            (true, None) => violations.push(Violation::new(&subject, "moon without a parent")),
            (false, Some(_)) => violations.push(Violation::new(&subject, "non-moon with a parent")),
            (false, None) => {}
        }
    }

    let mut sol: Vec<&CelestialObject> = objects.iter().filter(|o| o.system_id == 0).collect();
    sol.sort_by_key(|o| o.object_id);
    let matches_pattern = sol.len() == SOL_PATTERN.len()
        && sol.iter().zip(SOL_PATTERN.iter()).all(|(o, (id, name, class, parent))| {
            o.object_id == *id
                && o.name == *name
                && o.class == *class
                && o.parent_object_id == *parent
        });
    if !matches_pattern {
        violations.push(Violation::new(
            "system 0",
            "home system must hold exactly Earth, Luna, Mars and Ceres",
        ));
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ObjectsConfig;
    use crate::objects::generate_objects;
    use crate::schema::ArtifactType;
    use crate::ui::SilentUi;

    fn systems() -> Vec<StarSystem> {
        (0..5)
            .map(|id| StarSystem {
                id,
                name: format!("S{}", id),
                distance_ly: id as f64 * 3.0,
                grid_x: 50 + id as u8,
                grid_y: 50,
                spectral_type: "G2V".into(),
            })
            .collect()
    }

    #[test]
    fn test_generated_data_is_clean() {
        let systems = systems();
        let objects = generate_objects(&systems, &ObjectsConfig::default(), &mut SilentUi::new()).unwrap();
        assert!(verify_catalog(&systems).is_empty());
        assert!(verify_objects(&systems, &objects).is_empty());
    }

    #[test]
    fn test_catalog_violations() {
        let mut systems = systems();
        systems[2].grid_x = systems[1].grid_x;
        systems[3].distance_ly = 1.0;
        let violations = verify_catalog(&systems);
        assert!(violations.iter().any(|v| v.message.starts_with("shares cell")));
        assert!(violations.iter().any(|v| v.message.contains("not sorted")));
    }

    #[test]
    fn test_object_violations() {
        let systems = systems();
        let mut objects =
            generate_objects(&systems, &ObjectsConfig::default(), &mut SilentUi::new()).unwrap();
        objects[1].parent_object_id = Some(3);
        objects[3].class = ObjectClass::GasGiant;
        objects[3].artifact = Some(ArtifactType::Relic);
        objects[3].ore_richness = 2;

        let messages: Vec<String> = verify_objects(&systems, &objects)
            .into_iter()
            .map(|v| v.to_string())
            .collect();
        assert!(messages.contains(&"object 0:3: gas giant with ore".to_string()));
        assert!(messages.contains(&"object 0:3: gas giant with an artifact".to_string()));
        assert!(messages.iter().any(|m| m.starts_with("system 0:")));
    }
}
