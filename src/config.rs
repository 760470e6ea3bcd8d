//! Generation parameters for each stage.
//!
//! The CLI builds these directly from flags; `run` can also load them from a
//! JSON file where every field is optional.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PipelineError;
use crate::schema::ArtifactType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Maximum distance from Sol in light-years
    pub radius_ly: f64,
    /// Maximum number of systems kept, nearest first
    pub max_stars: usize,
    /// Light-years per grid cell
    pub scale: f64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            radius_ly: 50.0,
            max_stars: 150,
            scale: 1.0,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale > 0.0) || !self.scale.is_finite() {
            return Err(PipelineError::config("scale must be > 0").into());
        }
        if !(self.radius_ly >= 0.0) || !self.radius_ly.is_finite() {
            return Err(PipelineError::config("radius_ly must be >= 0").into());
        }
        if self.max_stars == 0 {
            return Err(PipelineError::config("max_stars must be at least 1").into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectsConfig {
    /// Cap on primaries (planets + asteroid) per system; moons come on top
    pub max_objects_per_system: u32,
    pub seed: u64,
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            max_objects_per_system: 5,
            seed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Per-eligible-object probability of hosting an artifact
    pub rate: f64,
    pub weights: Vec<(ArtifactType, u32)>,
    pub seed: u64,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            rate: 0.02,
            weights: vec![
                (ArtifactType::Relic, 40),
                (ArtifactType::Ruins, 25),
                (ArtifactType::Facility, 15),
                (ArtifactType::Beacon, 10),
                (ArtifactType::EnergyNode, 7),
                (ArtifactType::TechCache, 3),
            ],
            seed: 0,
        }
    }
}

impl ArtifactConfig {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rate) {
            return Err(PipelineError::config("artifact rate must be between 0.0 and 1.0").into());
        }
        if self.weights.iter().map(|(_, w)| *w as u64).sum::<u64>() == 0 {
            return Err(PipelineError::config("artifact type weights must not all be zero").into());
        }
        Ok(())
    }
}

/// Parameters for a full `run`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub catalog: CatalogConfig,
    pub objects: ObjectsConfig,
    pub artifacts: ArtifactConfig,
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {:?}", path))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;
        self.artifacts.validate()
    }
}
