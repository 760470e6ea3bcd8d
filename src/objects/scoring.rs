//! Resource and hazard scores for natural bodies.
//!
//! Scores are keyed on `(system_id, object_id, class)` only, so they do not
//! move when the global seed changes the rest of a system.

use crate::keyed::{jitter, probability_for};
use crate::schema::{ObjectClass, SpectralClass};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scores {
    pub habitability: u8,
    pub risk: u8,
    pub ore_richness: u8,
    pub fuel_richness: u8,
}

fn star_habitability(spectral: SpectralClass) -> i32 {
    match spectral {
        SpectralClass::O | SpectralClass::B => 5,
        SpectralClass::A => 15,
        SpectralClass::F => 30,
        SpectralClass::G => 50,
        SpectralClass::K => 45,
        SpectralClass::M => 35,
        SpectralClass::D => 10,
        SpectralClass::Unknown => 30,
    }
}

fn star_risk(spectral: SpectralClass) -> i32 {
    match spectral {
        SpectralClass::O | SpectralClass::B => 25,
        SpectralClass::A => 15,
        SpectralClass::F => 10,
        SpectralClass::G => 0,
        SpectralClass::K => -5,
        SpectralClass::M => -10,
        SpectralClass::D => 15,
        SpectralClass::Unknown => 0,
    }
}

fn class_habitability(class: ObjectClass) -> i32 {
    match class {
        ObjectClass::RockyPlanet => 30,
        ObjectClass::DesertPlanet => 10,
        ObjectClass::IcePlanet => 0,
        ObjectClass::GasGiant => -25,
        ObjectClass::RockyMoon => 20,
        ObjectClass::IcyMoon => 0,
        ObjectClass::LargeAsteroid => -10,
    }
}

fn class_risk(class: ObjectClass) -> i32 {
    match class {
        ObjectClass::RockyPlanet => 40,
        ObjectClass::DesertPlanet => 60,
        ObjectClass::IcePlanet => 50,
        ObjectClass::GasGiant => 80,
        ObjectClass::RockyMoon => 45,
        ObjectClass::IcyMoon => 55,
        ObjectClass::LargeAsteroid => 65,
    }
}

/// 0..=255 drawn from a key
fn byte_for(key: &str) -> u32 {
    (probability_for(key) * 256.0) as u32
}

/// Tier 0..=3 from a byte and three ascending thresholds
fn tier(byte: u32, thresholds: [u32; 3]) -> u8 {
    thresholds.iter().filter(|t| byte >= **t).count() as u8
}

fn ore_richness(class: ObjectClass, byte: u32) -> u8 {
    match class {
        ObjectClass::RockyPlanet
        | ObjectClass::DesertPlanet
        | ObjectClass::RockyMoon
        | ObjectClass::LargeAsteroid => tier(byte, [25, 100, 200]),
        ObjectClass::IcePlanet | ObjectClass::IcyMoon => tier(byte, [80, 180, 230]),
        ObjectClass::GasGiant => 0,
    }
}

fn fuel_richness(class: ObjectClass, byte: u32) -> u8 {
    match class {
        ObjectClass::GasGiant if byte < 128 => 2,
        ObjectClass::GasGiant => 3,
        _ => tier(byte, [40, 160, 230]),
    }
}

/// Score one body orbiting a star of the given spectral type
pub fn score_object(
    system_id: u32,
    object_id: u32,
    class: ObjectClass,
    spectral: SpectralClass,
) -> Scores {
    let key = format!("{}:{}:{}", system_id, object_id, class.code());

    let habitability = star_habitability(spectral)
        + class_habitability(class)
        + jitter(&format!("{}:habitability", key), -8, 7);
    let risk = class_risk(class) + star_risk(spectral) + jitter(&format!("{}:risk", key), -8, 7);

    Scores {
        habitability: habitability.clamp(0, 100) as u8,
        risk: risk.clamp(0, 100) as u8,
        ore_richness: ore_richness(class, byte_for(&format!("{}:ore", key))),
        fuel_richness: fuel_richness(class, byte_for(&format!("{}:fuel", key))),
    }
}
