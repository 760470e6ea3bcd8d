use anyhow::{anyhow, Context, Result};
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::error::PipelineError;
use crate::schema::{
    ArtifactType, CelestialObject, FileSchema, ObjectClass, StarSystem, STAR_CATALOG,
    STAR_CATALOG_COMPLETE, SYSTEM_OBJECTS,
};

/// Header name -> column index for one CSV file
pub struct HeaderIndex {
    file: String,
    columns: HashMap<String, usize>,
}

impl HeaderIndex {
    /// Build the index and fail if `schema` requires columns the header lacks
    pub fn new(file: &Path, headers: &StringRecord, schema: &FileSchema) -> Result<Self> {
        let names: Vec<&str> = headers.iter().collect();
        let missing = schema.missing_columns(&names);
        if !missing.is_empty() {
            return Err(PipelineError::missing_columns(file.display().to_string(), &missing).into());
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();

        Ok(Self {
            file: file.display().to_string(),
            columns,
        })
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.columns.get(column).copied()
    }

    /// Trimmed text of a column; absent columns read as empty
    pub fn text<'a>(&self, record: &'a StringRecord, column: &str) -> &'a str {
        self.position(column)
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }

    /// Parse a required column, naming the file, row and column on failure
    pub fn parse<T: FromStr>(&self, record: &StringRecord, column: &str, row: usize) -> Result<T> {
        let raw = self.text(record, column);
        raw.parse::<T>().map_err(|_| {
            PipelineError::consistency(format!(
                "{} row {}: column {} has invalid value {:?}",
                self.file, row, column, raw
            ))
            .into()
        })
    }

    /// Like `parse`, but an empty field is `None`
    pub fn parse_opt<T: FromStr>(
        &self,
        record: &StringRecord,
        column: &str,
        row: usize,
    ) -> Result<Option<T>> {
        if self.text(record, column).is_empty() {
            Ok(None)
        } else {
            self.parse(record, column, row).map(Some)
        }
    }

    /// `0`/`1` flag column (also accepts true/false)
    pub fn flag(&self, record: &StringRecord, column: &str, row: usize) -> Result<bool> {
        match self.text(record, column) {
            "1" | "true" | "True" => Ok(true),
            "0" | "false" | "False" | "" => Ok(false),
            other => Err(PipelineError::consistency(format!(
                "{} row {}: column {} is not a 0/1 flag: {:?}",
                self.file, row, column, other
            ))
            .into()),
        }
    }

    pub fn class(&self, record: &StringRecord, row: usize) -> Result<ObjectClass> {
        let raw = self.text(record, "class");
        ObjectClass::from_code(raw).ok_or_else(|| {
            PipelineError::consistency(format!(
                "{} row {}: unknown object class {:?}",
                self.file, row, raw
            ))
            .into()
        })
    }
}

fn open_csv(path: &Path) -> Result<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .from_path(path)
        .with_context(|| format!("Failed to open: {:?}", path))
}

/// Read a `star_catalog.csv` produced by the projector.
///
/// Only `id`, `proper` and `spect` are required; an empty name becomes
/// `"System <id>"`. Object generation never looks at `dist_ly`, `grid_x` or
/// `grid_y`, so a file without those columns still loads (they read as 0).
/// A position column that is present must hold a valid value on every row.
pub fn read_star_catalog(path: &Path) -> Result<Vec<StarSystem>> {
    read_stars(path, &STAR_CATALOG)
}

/// Read a `star_catalog.csv` with every column required, for checks that
/// look at distances and grid cells
pub fn read_complete_star_catalog(path: &Path) -> Result<Vec<StarSystem>> {
    read_stars(path, &STAR_CATALOG_COMPLETE)
}

/// A position column: absent reads as the default, present must parse
fn position_field<T: FromStr + Default>(
    index: &HeaderIndex,
    record: &StringRecord,
    column: &str,
    row: usize,
) -> Result<T> {
    match index.position(column) {
        None => Ok(T::default()),
        Some(_) => index.parse(record, column, row),
    }
}

fn read_stars(path: &Path, schema: &FileSchema) -> Result<Vec<StarSystem>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header: {:?}", path))?
        .clone();
    let index = HeaderIndex::new(path, &headers, schema)?;

    let mut systems = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.with_context(|| format!("Failed to read row {} of {:?}", row, path))?;

        let id: u32 = index.parse(&record, "id", row)?;
        let name = match index.text(&record, "proper") {
            "" => format!("System {}", id),
            name => name.to_string(),
        };

        systems.push(StarSystem {
            id,
            name,
            distance_ly: position_field(&index, &record, "dist_ly", row)?,
            grid_x: position_field(&index, &record, "grid_x", row)?,
            grid_y: position_field(&index, &record, "grid_y", row)?,
            spectral_type: index.text(&record, "spect").to_string(),
        });
    }

    Ok(systems)
}

/// Parse one `system_objects.csv` row, including artifact columns when the
/// file already carries them
pub fn parse_object(index: &HeaderIndex, record: &StringRecord, row: usize) -> Result<CelestialObject> {
    let artifact = if index.flag(record, "artifact_flag", row)? {
        let raw = index.text(record, "artifact_type");
        Some(ArtifactType::from_code(raw).ok_or_else(|| {
            anyhow!(PipelineError::consistency(format!(
                "row {}: artifact_flag set but artifact_type is {:?}",
                row, raw
            )))
        })?)
    } else {
        None
    };

    Ok(CelestialObject {
        system_id: index.parse(record, "system_id", row)?,
        object_id: index.parse(record, "object_id", row)?,
        name: index.text(record, "name").to_string(),
        class: index.class(record, row)?,
        parent_object_id: index.parse_opt(record, "parent_object_id", row)?,
        is_moon: index.flag(record, "is_moon", row)?,
        local_x: index.parse(record, "local_x", row)?,
        local_y: index.parse(record, "local_y", row)?,
        ore_richness: index.parse(record, "ore_richness", row)?,
        fuel_richness: index.parse(record, "fuel_richness", row)?,
        habitability: index.parse(record, "habitability", row)?,
        risk: index.parse(record, "risk", row)?,
        artifact,
    })
}

/// Read a `system_objects.csv`, with or without artifact columns
pub fn read_system_objects(path: &Path) -> Result<Vec<CelestialObject>> {
    let mut reader = open_csv(path)?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read header: {:?}", path))?
        .clone();
    let index = HeaderIndex::new(path, &headers, &SYSTEM_OBJECTS)?;

    let mut objects = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let row = i + 2;
        let record = record.with_context(|| format!("Failed to read row {} of {:?}", row, path))?;
        let object = parse_object(&index, &record, row)
            .with_context(|| format!("Failed to parse object in {:?}", path))?;
        objects.push(object);
    }

    Ok(objects)
}
