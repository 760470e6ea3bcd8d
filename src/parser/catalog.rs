//! HYG-style star catalog loading

use anyhow::{Context, Result};
use csv::StringRecord;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::PipelineError;
use crate::schema::CatalogStar;

/// Light-years per parsec
pub const PC_TO_LY: f64 = 3.26156;

/// Column indices resolved from a catalog header, accepting the aliases used
/// across HYG releases
#[derive(Debug, Default)]
struct CatalogColumns {
    id: Option<usize>,
    hip: Option<usize>,
    proper: Option<usize>,
    dist: Option<usize>,
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
    spect: Option<usize>,
    mag: Option<usize>,
    lum: Option<usize>,
}

impl CatalogColumns {
    fn resolve(headers: &StringRecord) -> Self {
        let find = |aliases: &[&str]| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h.trim() == *alias))
        };

        Self {
            id: find(&["id", "ID"]),
            hip: find(&["hip", "HIP"]),
            proper: find(&["proper", "ProperName", "name"]),
            dist: find(&["dist", "Distance", "dist_pc"]),
            x: find(&["x", "X"]),
            y: find(&["y", "Y"]),
            z: find(&["z", "Z"]),
            spect: find(&["spect", "SpectralType"]),
            mag: find(&["mag", "Mag"]),
            lum: find(&["lum", "Lum"]),
        }
    }

    fn has_position(&self) -> bool {
        self.dist.is_some() || (self.x.is_some() && self.y.is_some() && self.z.is_some())
    }
}

fn field<'a>(record: &'a StringRecord, idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parse an optional numeric field; present-but-garbage is an error
fn number(record: &StringRecord, idx: Option<usize>) -> Result<Option<f64>, String> {
    match field(record, idx) {
        None => Ok(None),
        Some(s) => s
            .parse::<f64>()
            .map(Some)
            .map_err(|_| format!("not a number: {:?}", s)),
    }
}

/// Parse one catalog row into a star, or explain why it is unusable
fn parse_row(record: &StringRecord, cols: &CatalogColumns) -> Result<Option<CatalogStar>, String> {
    let xyz = match (number(record, cols.x)?, number(record, cols.y)?, number(record, cols.z)?) {
        (Some(x), Some(y), Some(z)) => Some((x, y, z)),
        _ => None,
    };

    let dist_pc = match (number(record, cols.dist)?, xyz) {
        (Some(d), _) => d,
        (None, Some((x, y, z))) => (x * x + y * y + z * z).sqrt(),
        (None, None) => return Ok(None),
    };
    if !dist_pc.is_finite() || dist_pc < 0.0 {
        return Err(format!("invalid distance {}", dist_pc));
    }

    // Stars without coordinates sit on the x axis at their distance
    let (x_pc, y_pc, z_pc) = xyz.unwrap_or((dist_pc, 0.0, 0.0));

    let catalog_id = field(record, cols.id)
        .or_else(|| field(record, cols.hip))
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "{:.5},{:.5},{:.5}",
                x_pc * PC_TO_LY,
                y_pc * PC_TO_LY,
                z_pc * PC_TO_LY
            )
        });

    Ok(Some(CatalogStar {
        catalog_id,
        proper: field(record, cols.proper).map(str::to_string),
        distance_ly: dist_pc * PC_TO_LY,
        x_ly: x_pc * PC_TO_LY,
        y_ly: y_pc * PC_TO_LY,
        z_ly: z_pc * PC_TO_LY,
        spectral_type: field(record, cols.spect).unwrap_or_default().to_string(),
        magnitude: number(record, cols.mag)?,
        luminosity: number(record, cols.lum)?,
    }))
}

/// Load every usable star from a HYG CSV.
///
/// Rows with malformed numbers are skipped and counted; a header without any
/// position columns is rejected outright.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogStar>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open catalog: {:?}", path))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read catalog header: {:?}", path))?
        .clone();
    let cols = CatalogColumns::resolve(&headers);

    if !cols.has_position() {
        return Err(PipelineError::missing_columns(
            path.display().to_string(),
            &["dist (or x, y, z)"],
        )
        .into());
    }

    let mut stars = Vec::new();
    let mut skipped = 0usize;

    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("Failed to read catalog row {}", line + 2))?;
        match parse_row(&record, &cols) {
            Ok(Some(star)) => stars.push(star),
            Ok(None) => skipped += 1,
            Err(reason) => {
                debug!(row = line + 2, %reason, "skipping catalog row");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "skipped catalog rows with missing or malformed position data");
    }
    if stars.is_empty() {
        return Err(PipelineError::input(format!(
            "loaded 0 stars from {:?}; check that it is a valid HYG CSV",
            path
        ))
        .into());
    }

    Ok(stars)
}
