//! Column layouts of every file the pipeline reads or writes

/// Column layout of a CSV file exchanged between stages
#[derive(Debug, Clone)]
pub struct FileSchema {
    pub name: &'static str,
    /// Columns in output order
    pub columns: &'static [&'static str],
    /// Columns a reader refuses to work without
    pub required: &'static [&'static str],
}

impl FileSchema {
    /// Required columns absent from `headers`
    pub fn missing_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<&'static str> {
        self.required
            .iter()
            .copied()
            .filter(|col| !headers.iter().any(|h| h.as_ref().trim() == *col))
            .collect()
    }
}

pub static STAR_CATALOG: FileSchema = FileSchema {
    name: "star_catalog.csv",
    columns: &["id", "proper", "dist_ly", "grid_x", "grid_y", "spect"],
    required: &["id", "proper", "spect"],
};

/// `star_catalog.csv` as checked by `verify`: positions must be present
pub static STAR_CATALOG_COMPLETE: FileSchema = FileSchema {
    name: "star_catalog.csv",
    columns: &["id", "proper", "dist_ly", "grid_x", "grid_y", "spect"],
    required: &["id", "proper", "dist_ly", "grid_x", "grid_y", "spect"],
};

pub static SYSTEM_OBJECTS: FileSchema = FileSchema {
    name: "system_objects.csv",
    columns: &[
        "system_id",
        "object_id",
        "name",
        "class",
        "parent_object_id",
        "is_moon",
        "local_x",
        "local_y",
        "ore_richness",
        "fuel_richness",
        "habitability",
        "risk",
    ],
    required: &[
        "system_id",
        "object_id",
        "name",
        "class",
        "parent_object_id",
        "is_moon",
        "local_x",
        "local_y",
        "ore_richness",
        "fuel_richness",
        "habitability",
        "risk",
    ],
};

/// What artifact placement needs from an objects file
pub static ARTIFACT_INPUT: FileSchema = FileSchema {
    name: "system_objects.csv",
    columns: &["system_id", "object_id", "class"],
    required: &["system_id", "object_id", "class"],
};

/// Columns appended by artifact placement
pub const ARTIFACT_COLUMNS: &[&str] = &["artifact_flag", "artifact_type"];
