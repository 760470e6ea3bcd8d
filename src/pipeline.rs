//! All three stages in one run

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::artifacts::place_artifacts;
use crate::config::PipelineConfig;
use crate::objects::generate_objects;
use crate::parser::load_catalog;
use crate::projector::project_catalog;
use crate::schema::STAR_CATALOG;
use crate::ui::{Phase, Ui};
use crate::writer::{commit_all, render_star_map, write_star_catalog, write_system_objects, StagedFile};

pub const STAR_MAP_FILE: &str = "star_map.txt";
pub const OBJECTS_FILE: &str = "system_objects.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub systems: usize,
    pub objects: usize,
    pub artifacts: usize,
    pub star_catalog: PathBuf,
    pub star_map: PathBuf,
    pub system_objects: PathBuf,
}

/// Build the catalog, map and augmented objects file into `out_dir`.
///
/// Nothing is moved into place until every stage has succeeded.
pub fn run_pipeline(
    input_csv: &Path,
    out_dir: &Path,
    config: &PipelineConfig,
    ui: &mut impl Ui,
) -> Result<RunSummary> {
    config.validate()?;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create output directory: {:?}", out_dir))?;

    ui.set_phase(Phase::Loading);
    let stars = load_catalog(input_csv)?;
    ui.log(format!("Loaded {} stars from {:?}", stars.len(), input_csv));

    let systems = project_catalog(stars, &config.catalog, ui)?;
    let mut objects = generate_objects(&systems, &config.objects, ui)?;

    ui.set_phase(Phase::PlacingArtifacts);
    let artifacts = place_artifacts(&mut objects, &config.artifacts)?;
    ui.log(format!("Placed {} artifacts", artifacts));

    ui.set_phase(Phase::Writing);
    let summary = RunSummary {
        systems: systems.len(),
        objects: objects.len(),
        artifacts,
        star_catalog: out_dir.join(STAR_CATALOG.name),
        star_map: out_dir.join(STAR_MAP_FILE),
        system_objects: out_dir.join(OBJECTS_FILE),
    };

    let mut catalog_file = StagedFile::new(&summary.star_catalog)?;
    write_star_catalog(&mut catalog_file, &systems)?;

    let mut map_file = StagedFile::new(&summary.star_map)?;
    map_file.write_all(
        render_star_map(&systems, config.catalog.radius_ly, config.catalog.scale).as_bytes(),
    )?;

    let mut objects_file = StagedFile::new(&summary.system_objects)?;
    write_system_objects(&mut objects_file, &objects, true)?;

    commit_all(vec![catalog_file, map_file, objects_file])?;
    ui.set_phase(Phase::Complete);

    Ok(summary)
}
