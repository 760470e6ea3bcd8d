//! Ancient-civilization artifacts: a sparse, additive layer over the natural
//! objects. Placement reads only `(system_id, object_id, class)` and never
//! touches any other field.

use anyhow::{Context, Result};
use csv::StringRecord;
use std::path::Path;
use tracing::info;

use crate::config::ArtifactConfig;
use crate::keyed::{choose_weighted, probability_for};
use crate::parser::HeaderIndex;
use crate::schema::{ArtifactType, CelestialObject, ObjectClass, ARTIFACT_COLUMNS, ARTIFACT_INPUT};
use crate::ui::{Phase, Ui};
use crate::writer::{csv_writer_with, detect_terminator, flag, StagedFile};

/// Hash key for one object's artifact roll. A zero seed gives the unsalted
/// `<system_id>:<object_id>:artifact` layout.
pub fn artifact_key(seed: u64, system_id: u32, object_id: u32) -> String {
    if seed == 0 {
        format!("{}:{}:artifact", system_id, object_id)
    } else {
        format!("{}:{}:{}:artifact", seed, system_id, object_id)
    }
}

/// The artifact an object hosts, if any
pub fn artifact_for(
    config: &ArtifactConfig,
    system_id: u32,
    object_id: u32,
    class: ObjectClass,
) -> Option<ArtifactType> {
    if !class.is_artifact_eligible() {
        return None;
    }
    let key = artifact_key(config.seed, system_id, object_id);
    if probability_for(&key) < config.rate {
        Some(choose_weighted(&format!("{}:type", key), &config.weights))
    } else {
        None
    }
}

/// Set `artifact` on every object; returns how many received one
pub fn place_artifacts(objects: &mut [CelestialObject], config: &ArtifactConfig) -> Result<usize> {
    config.validate()?;
    let mut placed = 0;
    for object in objects.iter_mut() {
        object.artifact = artifact_for(config, object.system_id, object.object_id, object.class);
        if object.artifact.is_some() {
            placed += 1;
        }
    }
    Ok(placed)
}

/// Counts from one CSV augmentation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub objects: usize,
    pub eligible: usize,
    pub artifacts: usize,
}

/// Add `artifact_flag,artifact_type` to a `system_objects.csv`.
///
/// Every other column's values are copied through untouched. If the artifact
/// columns already exist they are overwritten where they stand, so running
/// this on its own output reproduces it. With no `output` the input is
/// replaced atomically.
///
/// Rows are re-serialised: the input's line terminator (LF or CRLF) is kept,
/// but quoting is normalised to quote only fields that need it. Output of
/// the objects stage round-trips byte for byte.
pub fn augment_objects_csv(
    input: &Path,
    output: Option<&Path>,
    config: &ArtifactConfig,
    ui: &mut impl Ui,
) -> Result<ArtifactSummary> {
    config.validate()?;
    ui.set_phase(Phase::Loading);

    let mut reader = csv::ReaderBuilder::new()
        .from_path(input)
        .with_context(|| format!("Failed to open: {:?}", input))?;
    let mut headers = reader
        .headers()
        .with_context(|| format!("Failed to read header: {:?}", input))?
        .clone();
    let index = HeaderIndex::new(input, &headers, &ARTIFACT_INPUT)?;

    let rows: Vec<StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .with_context(|| format!("Failed to read rows of {:?}", input))?;

    let mut artifact_positions = [0usize; 2];
    for (slot, column) in ARTIFACT_COLUMNS.iter().enumerate() {
        artifact_positions[slot] = match index.position(column) {
            Some(pos) => pos,
            None => {
                headers.push_field(column);
                headers.len() - 1
            }
        };
    }

    ui.set_phase(Phase::PlacingArtifacts);
    let mut summary = ArtifactSummary {
        objects: rows.len(),
        eligible: 0,
        artifacts: 0,
    };
    let total = rows.len() as u64;
    let mut out_rows = Vec::with_capacity(rows.len());

    for (i, record) in rows.iter().enumerate() {
        let row = i + 2;
        let system_id: u32 = index.parse(record, "system_id", row)?;
        let object_id: u32 = index.parse(record, "object_id", row)?;
        let class = index.class(record, row)?;

        if class.is_artifact_eligible() {
            summary.eligible += 1;
        }
        let artifact = artifact_for(config, system_id, object_id, class);
        if artifact.is_some() {
            summary.artifacts += 1;
        }

        let mut fields: Vec<String> = record.iter().map(str::to_string).collect();
        fields.resize(headers.len(), String::new());
        fields[artifact_positions[0]] = flag(artifact.is_some()).to_string();
        fields[artifact_positions[1]] = artifact.map(|a| a.code().to_string()).unwrap_or_default();
        out_rows.push(fields);

        if i % 256 == 0 || i + 1 == rows.len() {
            ui.set_progress(i as u64 + 1, total, "objects");
        }
    }
    ui.clear_progress();

    ui.set_phase(Phase::Writing);
    let target = output.unwrap_or(input);
    let terminator = detect_terminator(input)?;
    let mut staged = StagedFile::new(target)?;
    {
        let mut writer = csv_writer_with(&mut staged, terminator);
        writer.write_record(&headers)?;
        for fields in &out_rows {
            writer.write_record(fields)?;
        }
        writer
            .flush()
            .with_context(|| format!("Failed to write {:?}", target))?;
    }
    staged.commit()?;

    info!(
        objects = summary.objects,
        eligible = summary.eligible,
        artifacts = summary.artifacts,
        rate = config.rate,
        "placed artifacts"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::ui::SilentUi;
    use std::io::Write;

    #[test]
    fn test_gas_giants_never_get_artifacts() {
        let config = ArtifactConfig {
            rate: 1.0,
            ..Default::default()
        };
        for object_id in 0..100 {
            assert_eq!(artifact_for(&config, 1, object_id, ObjectClass::GasGiant), None);
            assert!(artifact_for(&config, 1, object_id, ObjectClass::IcyMoon).is_some());
        }
    }

    #[test]
    fn test_rate_zero_places_nothing() {
        let config = ArtifactConfig {
            rate: 0.0,
            ..Default::default()
        };
        assert!((0..1000).all(|i| artifact_for(&config, i, 0, ObjectClass::RockyPlanet).is_none()));
    }

    #[test]
    fn test_rarity_near_rate() {
        let config = ArtifactConfig::default();
        let hits = (0..500u32)
            .flat_map(|sid| (0..4u32).map(move |oid| (sid, oid)))
            .filter(|(sid, oid)| artifact_for(&config, *sid, *oid, ObjectClass::RockyPlanet).is_some())
            .count();
        // 2000 trials at 2%: mean 40, sd ~6.3
        assert!((15..=70).contains(&hits), "hits = {}", hits);
    }

    #[test]
    fn test_type_weights_favor_relics() {
        let config = ArtifactConfig {
            rate: 1.0,
            ..Default::default()
        };
        let relics = (0..2000)
            .filter(|i| artifact_for(&config, *i, 0, ObjectClass::RockyPlanet) == Some(ArtifactType::Relic))
            .count();
        assert!((700..=900).contains(&relics), "relics = {}", relics);
    }

    #[test]
    fn test_seed_salts_the_key() {
        assert_eq!(artifact_key(0, 3, 4), "3:4:artifact");
        assert_eq!(artifact_key(7, 3, 4), "7:3:4:artifact");
    }

    fn objects_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_augment_passes_columns_through_and_is_idempotent() {
        let input = objects_file(
            "system_id,object_id,name,class,extra\n\
             1,0,\"Alpha, Prime I\",GG,keep me\n\
             1,1,Alpha Prime I-a,RM,\n",
        );
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.csv");
        let second = dir.path().join("second.csv");
        let config = ArtifactConfig {
            rate: 1.0,
            ..Default::default()
        };

        let summary = augment_objects_csv(input.path(), Some(&first), &config, &mut SilentUi::new()).unwrap();
        assert_eq!(summary.objects, 2);
        assert_eq!(summary.eligible, 1);
        assert_eq!(summary.artifacts, 1);

        let text = std::fs::read_to_string(&first).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "system_id,object_id,name,class,extra,artifact_flag,artifact_type");
        assert_eq!(lines[1], "1,0,\"Alpha, Prime I\",GG,keep me,0,");
        assert!(lines[2].starts_with("1,1,Alpha Prime I-a,RM,,1,"));

        augment_objects_csv(&first, Some(&second), &config, &mut SilentUi::new()).unwrap();
        assert_eq!(text, std::fs::read_to_string(&second).unwrap());
    }

    #[test]
    fn test_augment_in_place() {
        let input = objects_file("system_id,object_id,class\n2,0,RP\n");
        augment_objects_csv(input.path(), None, &ArtifactConfig::default(), &mut SilentUi::new())
            .unwrap();
        let text = std::fs::read_to_string(input.path()).unwrap();
        assert!(text.starts_with("system_id,object_id,class,artifact_flag,artifact_type\n"));
    }

    #[test]
    fn test_augment_keeps_crlf_line_endings() {
        let input = objects_file("system_id,object_id,class,note\r\n2,0,RP,\"a, b\"\r\n2,1,GG,plain\r\n");
        augment_objects_csv(input.path(), None, &ArtifactConfig::default(), &mut SilentUi::new())
            .unwrap();
        let text = std::fs::read_to_string(input.path()).unwrap();
        let lines: Vec<&str> = text.split_terminator("\r\n").collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "system_id,object_id,class,note,artifact_flag,artifact_type");
        assert!(lines[1].starts_with("2,0,RP,\"a, b\","));
        assert_eq!(lines[2], "2,1,GG,plain,0,");
        assert!(!text.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn test_augment_requires_class() {
        let input = objects_file("system_id,object_id,name\n2,0,Foo\n");
        let err = augment_objects_csv(input.path(), None, &ArtifactConfig::default(), &mut SilentUi::new())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingColumns { .. })
        ));
        // input untouched
        assert_eq!(
            std::fs::read_to_string(input.path()).unwrap(),
            "system_id,object_id,name\n2,0,Foo\n"
        );
    }
}
