use serde::{Deserialize, Serialize};
use std::fmt;

/// Natural body classes.
///
/// The CSV carries the short wire code (`RP`, `GG`, ...) the game client
/// reads; parsing also accepts the full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectClass {
    RockyPlanet,
    DesertPlanet,
    IcePlanet,
    GasGiant,
    RockyMoon,
    IcyMoon,
    LargeAsteroid,
}

impl ObjectClass {
    pub const ALL: [ObjectClass; 7] = [
        ObjectClass::RockyPlanet,
        ObjectClass::DesertPlanet,
        ObjectClass::IcePlanet,
        ObjectClass::GasGiant,
        ObjectClass::RockyMoon,
        ObjectClass::IcyMoon,
        ObjectClass::LargeAsteroid,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ObjectClass::RockyPlanet => "RP",
            ObjectClass::DesertPlanet => "DP",
            ObjectClass::IcePlanet => "IC",
            ObjectClass::GasGiant => "GG",
            ObjectClass::RockyMoon => "RM",
            ObjectClass::IcyMoon => "IM",
            ObjectClass::LargeAsteroid => "AS",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s) || c.to_string() == s)
    }

    pub fn is_moon_class(self) -> bool {
        matches!(self, ObjectClass::RockyMoon | ObjectClass::IcyMoon)
    }

    /// Everything but gas giants can host an artifact
    pub fn is_artifact_eligible(self) -> bool {
        self != ObjectClass::GasGiant
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectClass::RockyPlanet => "RockyPlanet",
            ObjectClass::DesertPlanet => "DesertPlanet",
            ObjectClass::IcePlanet => "IcePlanet",
            ObjectClass::GasGiant => "GasGiant",
            ObjectClass::RockyMoon => "RockyMoon",
            ObjectClass::IcyMoon => "IcyMoon",
            ObjectClass::LargeAsteroid => "LargeAsteroid",
        };
        write!(f, "{}", name)
    }
}

/// Ancient-civilization artifact categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArtifactType {
    Relic,
    Ruins,
    Facility,
    Beacon,
    EnergyNode,
    TechCache,
}

impl ArtifactType {
    pub const ALL: [ArtifactType; 6] = [
        ArtifactType::Relic,
        ArtifactType::Ruins,
        ArtifactType::Facility,
        ArtifactType::Beacon,
        ArtifactType::EnergyNode,
        ArtifactType::TechCache,
    ];

    pub fn code(self) -> &'static str {
        match self {
            ArtifactType::Relic => "ARC",
            ArtifactType::Ruins => "RUI",
            ArtifactType::Facility => "FAC",
            ArtifactType::Beacon => "BEA",
            ArtifactType::EnergyNode => "ENG",
            ArtifactType::TechCache => "TEC",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.code().eq_ignore_ascii_case(s) || t.to_string() == s)
    }

    pub fn description(self) -> &'static str {
        match self {
            ArtifactType::Relic => "Alien relic or data crystal",
            ArtifactType::Ruins => "Ruined surface complex",
            ArtifactType::Facility => "Abandoned orbital facility",
            ArtifactType::Beacon => "Beacon or signal source",
            ArtifactType::EnergyNode => "Exotic energy node",
            ArtifactType::TechCache => "Technology cache",
        }
    }
}

impl fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArtifactType::Relic => "Relic",
            ArtifactType::Ruins => "Ruins",
            ArtifactType::Facility => "Facility",
            ArtifactType::Beacon => "Beacon",
            ArtifactType::EnergyNode => "EnergyNode",
            ArtifactType::TechCache => "TechCache",
        };
        write!(f, "{}", name)
    }
}

/// Leading spectral letter of a star, used for habitability/risk baselines
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpectralClass {
    O,
    B,
    A,
    F,
    G,
    K,
    M,
    /// White dwarf
    D,
    Unknown,
}

impl SpectralClass {
    /// First alphabetic character of a catalog spectral string ("G2V" -> G)
    pub fn from_spect(spect: &str) -> Self {
        let letter = spect
            .chars()
            .find(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_uppercase());

        match letter {
            Some('O') => SpectralClass::O,
            Some('B') => SpectralClass::B,
            Some('A') => SpectralClass::A,
            Some('F') => SpectralClass::F,
            Some('G') => SpectralClass::G,
            Some('K') => SpectralClass::K,
            Some('M') => SpectralClass::M,
            Some('D') => SpectralClass::D,
            _ => SpectralClass::Unknown,
        }
    }
}

/// One retained stellar system as written to `star_catalog.csv`
#[derive(Debug, Clone, PartialEq)]
pub struct StarSystem {
    pub id: u32,
    pub name: String,
    pub distance_ly: f64,
    pub grid_x: u8,
    pub grid_y: u8,
    pub spectral_type: String,
}

impl StarSystem {
    pub fn is_home(&self) -> bool {
        self.id == 0
    }
}

/// A star as read from the source catalog, before projection
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStar {
    /// Stable identifier: catalog id, else HIP number, else coordinates
    pub catalog_id: String,
    pub proper: Option<String>,
    pub distance_ly: f64,
    pub x_ly: f64,
    pub y_ly: f64,
    pub z_ly: f64,
    pub spectral_type: String,
    pub magnitude: Option<f64>,
    pub luminosity: Option<f64>,
}

impl CatalogStar {
    pub fn is_named(&self) -> bool {
        self.proper.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// A natural body within a system
#[derive(Debug, Clone, PartialEq)]
pub struct CelestialObject {
    pub system_id: u32,
    pub object_id: u32,
    pub name: String,
    pub class: ObjectClass,
    pub parent_object_id: Option<u32>,
    pub is_moon: bool,
    pub local_x: u8,
    pub local_y: u8,
    pub ore_richness: u8,
    pub fuel_richness: u8,
    pub habitability: u8,
    pub risk: u8,
    /// Filled in by artifact placement; `None` until then
    pub artifact: Option<ArtifactType>,
}

impl CelestialObject {
    pub fn artifact_flag(&self) -> bool {
        self.artifact.is_some()
    }
}
