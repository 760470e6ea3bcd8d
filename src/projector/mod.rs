//! Star catalog construction: from a 3-D stellar catalog to the 100x100
//! galaxy grid the game plays on.

pub mod collision;
pub mod naming;

use anyhow::Result;
use std::path::Path;
use tracing::{debug, info};

use crate::config::CatalogConfig;
use crate::error::PipelineError;
use crate::parser::load_catalog;
use crate::schema::{CatalogStar, StarSystem};
use crate::ui::{Phase, Ui};
use crate::writer::{commit_all, render_star_map, write_star_catalog, StagedFile};

pub use collision::{cell_priority, resolve_collisions, ProjectedStar};
pub use naming::synthetic_name;

/// Cells per side of the galaxy grid
pub const GRID_SIZE: u8 = 100;
/// Sol's cell on both axes
pub const GRID_CENTER: f64 = 50.0;

/// Grid cell for a planar offset from Sol, or `None` if it falls off the map
pub fn project_offset(dx_ly: f64, dy_ly: f64, scale: f64) -> Option<(u8, u8)> {
    let gx = (GRID_CENTER + dx_ly / scale).round();
    let gy = (GRID_CENTER + dy_ly / scale).round();
    let max = (GRID_SIZE - 1) as f64;

    if (0.0..=max).contains(&gx) && (0.0..=max).contains(&gy) {
        Some((gx as u8, gy as u8))
    } else {
        None
    }
}

fn nearest_first(a: &CatalogStar, b: &CatalogStar) -> std::cmp::Ordering {
    a.distance_ly
        .total_cmp(&b.distance_ly)
        .then_with(|| a.catalog_id.cmp(&b.catalog_id))
}

/// Turn catalog stars into the final, id-numbered system table.
///
/// Fails with an empty-result error when the radius leaves no stars or
/// projection leaves nothing on the map.
pub fn project_catalog(
    stars: Vec<CatalogStar>,
    config: &CatalogConfig,
    ui: &mut impl Ui,
) -> Result<Vec<StarSystem>> {
    config.validate()?;
    ui.set_phase(Phase::Projecting);

    let loaded = stars.len();
    let within: Vec<CatalogStar> = stars
        .into_iter()
        .filter(|s| s.distance_ly <= config.radius_ly)
        .collect();
    info!(loaded, within = within.len(), radius_ly = config.radius_ly, "radius filter");

    let sol = within
        .iter()
        .min_by(|a, b| nearest_first(a, b))
        .cloned()
        .ok_or_else(|| {
            PipelineError::empty(format!(
                "no stars within {} ly; either the catalog is wrong or the radius is too small",
                config.radius_ly
            ))
        })?;
    debug!(catalog_id = %sol.catalog_id, "pinned home system");

    let mut projected = Vec::with_capacity(within.len());
    let mut off_map = 0usize;
    for star in within {
        let is_sol = star.catalog_id == sol.catalog_id && star.distance_ly == sol.distance_ly;
        let cell = if is_sol {
            Some((GRID_CENTER as u8, GRID_CENTER as u8))
        } else {
            project_offset(star.x_ly - sol.x_ly, star.y_ly - sol.y_ly, config.scale)
        };

        match cell {
            Some((grid_x, grid_y)) => projected.push(ProjectedStar {
                star,
                grid_x,
                grid_y,
                is_sol,
            }),
            None => off_map += 1,
        }
    }
    if off_map > 0 {
        ui.log(format!("Pruned {} stars that projected outside the grid", off_map));
    }

    let resolved = resolve_collisions(projected);
    if resolved.dropped > 0 {
        ui.log(format!(
            "Pruned {} stars due to grid cell collisions",
            resolved.dropped
        ));
    }

    let mut survivors = resolved.survivors;
    survivors.sort_by(|a, b| {
        b.is_sol
            .cmp(&a.is_sol)
            .then_with(|| nearest_first(&a.star, &b.star))
    });
    survivors.truncate(config.max_stars);

    if survivors.is_empty() {
        return Err(PipelineError::empty(
            "all stars were pruned during projection; the radius and scale leave nothing on the map",
        )
        .into());
    }

    let total = survivors.len() as u64;
    let systems: Vec<StarSystem> = survivors
        .into_iter()
        .enumerate()
        .map(|(i, p)| {
            ui.set_progress(i as u64 + 1, total, "naming systems");
            let name = match &p.star.proper {
                Some(proper) if !proper.trim().is_empty() => proper.trim().to_string(),
                _ if p.is_sol => "Sol".to_string(),
                _ => synthetic_name(&p.star.catalog_id),
            };
            StarSystem {
                id: i as u32,
                name,
                distance_ly: p.star.distance_ly,
                grid_x: p.grid_x,
                grid_y: p.grid_y,
                spectral_type: p.star.spectral_type,
            }
        })
        .collect();
    ui.clear_progress();

    info!(systems = systems.len(), "star catalog projected");
    Ok(systems)
}

/// Load a catalog, project it and write `star_catalog.csv` plus the ASCII map.
///
/// Both files are staged and only moved into place once both are complete.
pub fn build_star_catalog(
    input_csv: &Path,
    csv_out: &Path,
    map_out: &Path,
    config: &CatalogConfig,
    ui: &mut impl Ui,
) -> Result<Vec<StarSystem>> {
    config.validate()?;

    ui.set_phase(Phase::Loading);
    ui.set_info(format!("Loading catalog from {:?}", input_csv));
    let stars = load_catalog(input_csv)?;
    ui.log(format!("Loaded {} stars", stars.len()));

    let systems = project_catalog(stars, config, ui)?;

    ui.set_phase(Phase::Writing);
    let mut csv_file = StagedFile::new(csv_out)?;
    write_star_catalog(&mut csv_file, &systems)?;

    let mut map_file = StagedFile::new(map_out)?;
    let map = render_star_map(&systems, config.radius_ly, config.scale);
    std::io::Write::write_all(&mut map_file, map.as_bytes())?;

    commit_all(vec![csv_file, map_file])?;
    ui.log(format!("Wrote {:?} and {:?}", csv_out, map_out));

    Ok(systems)
}
