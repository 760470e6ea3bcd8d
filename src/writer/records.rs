use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use crate::schema::{CelestialObject, StarSystem, ARTIFACT_COLUMNS, STAR_CATALOG, SYSTEM_OBJECTS};

pub fn csv_writer<W: Write>(out: W) -> csv::Writer<W> {
    csv_writer_with(out, csv::Terminator::Any(b'\n'))
}

pub fn csv_writer_with<W: Write>(out: W, terminator: csv::Terminator) -> csv::Writer<W> {
    csv::WriterBuilder::new().terminator(terminator).from_writer(out)
}

/// Line terminator of an existing CSV, judged by its first line
pub fn detect_terminator(path: &Path) -> Result<csv::Terminator> {
    let file = std::fs::File::open(path).with_context(|| format!("Failed to open: {:?}", path))?;
    let mut first = Vec::new();
    BufReader::new(file)
        .read_until(b'\n', &mut first)
        .with_context(|| format!("Failed to read: {:?}", path))?;
    Ok(if first.ends_with(b"\r\n") {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    })
}

pub fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Write `star_catalog.csv` rows in the order given
pub fn write_star_catalog<W: Write>(out: W, systems: &[StarSystem]) -> Result<()> {
    let mut writer = csv_writer(out);
    writer.write_record(STAR_CATALOG.columns)?;

    for system in systems {
        writer
            .write_record([
                system.id.to_string(),
                system.name.clone(),
                format!("{:.4}", system.distance_ly),
                system.grid_x.to_string(),
                system.grid_y.to_string(),
                system.spectral_type.clone(),
            ])
            .with_context(|| format!("Failed to write system {}", system.id))?;
    }

    writer.flush().context("Failed to flush star catalog")?;
    Ok(())
}

fn object_fields(object: &CelestialObject) -> Vec<String> {
    vec![
        object.system_id.to_string(),
        object.object_id.to_string(),
        object.name.clone(),
        object.class.code().to_string(),
        object
            .parent_object_id
            .map(|p| p.to_string())
            .unwrap_or_default(),
        flag(object.is_moon).to_string(),
        object.local_x.to_string(),
        object.local_y.to_string(),
        object.ore_richness.to_string(),
        object.fuel_richness.to_string(),
        object.habitability.to_string(),
        object.risk.to_string(),
    ]
}

/// Write `system_objects.csv`; artifact columns are appended when
/// `with_artifacts` is set
pub fn write_system_objects<W: Write>(
    out: W,
    objects: &[CelestialObject],
    with_artifacts: bool,
) -> Result<()> {
    let mut writer = csv_writer(out);

    let mut header: Vec<&str> = SYSTEM_OBJECTS.columns.to_vec();
    if with_artifacts {
        header.extend_from_slice(ARTIFACT_COLUMNS);
    }
    writer.write_record(&header)?;

    for object in objects {
        let mut fields = object_fields(object);
        if with_artifacts {
            fields.push(flag(object.artifact_flag()).to_string());
            fields.push(object.artifact.map(|a| a.code().to_string()).unwrap_or_default());
        }
        writer.write_record(&fields).with_context(|| {
            format!(
                "Failed to write object {}:{}",
                object.system_id, object.object_id
            )
        })?;
    }

    writer.flush().context("Failed to flush system objects")?;
    Ok(())
}
