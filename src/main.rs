use anyhow::{bail, Result};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use universe_builder::{
    artifacts::augment_objects_csv,
    cli::{Cli, Commands},
    config::{ArtifactConfig, CatalogConfig, ObjectsConfig, PipelineConfig},
    objects::build_system_objects,
    parser::{read_complete_star_catalog, read_system_objects},
    pipeline::run_pipeline,
    projector::build_star_catalog,
    schema::{ArtifactType, ObjectClass},
    verify::{verify_catalog, verify_objects},
    ConsoleUi, SilentUi, Ui,
};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if cli.quiet {
        execute(cli.command, &mut SilentUi::new())
    } else {
        execute(cli.command, &mut ConsoleUi::new())
    }
}

fn execute(command: Commands, ui: &mut impl Ui) -> Result<()> {
    match command {
        Commands::Catalog {
            input_csv,
            radius_ly,
            max_stars,
            scale,
            csv_out,
            map_out,
        } => {
            let start = Instant::now();
            let config = CatalogConfig {
                radius_ly,
                max_stars,
                scale,
            };
            let systems = build_star_catalog(&input_csv, &csv_out, &map_out, &config, ui)?;

            println!(
                "\nWrote {} systems to {:?} and {:?} in {:.1}s",
                systems.len(),
                csv_out,
                map_out,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Objects {
            input_stars,
            output_objects,
            max_objects_per_system,
            seed,
        } => {
            let start = Instant::now();
            let config = ObjectsConfig {
                max_objects_per_system,
                seed,
            };
            let objects = build_system_objects(&input_stars, &output_objects, &config, ui)?;

            println!(
                "\nWrote {} objects to {:?} in {:.1}s",
                objects.len(),
                output_objects,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Artifacts {
            input_objects,
            output_objects,
            artifact_rate,
            seed,
        } => {
            let config = ArtifactConfig {
                rate: artifact_rate,
                seed,
                ..Default::default()
            };
            let target = output_objects.clone().unwrap_or_else(|| input_objects.clone());
            let summary = augment_objects_csv(&input_objects, output_objects.as_deref(), &config, ui)?;

            println!(
                "\nPlaced {} artifacts on {} eligible of {} objects in {:?}",
                summary.artifacts, summary.eligible, summary.objects, target
            );
        }

        Commands::Run {
            input_csv,
            out_dir,
            config,
        } => {
            let start = Instant::now();
            let config = match config {
                Some(path) => PipelineConfig::load(&path)?,
                None => PipelineConfig::default(),
            };
            let summary = run_pipeline(&input_csv, &out_dir, &config, ui)?;

            println!(
                "\nGenerated {} systems, {} objects and {} artifacts into {:?} in {:.1}s",
                summary.systems,
                summary.objects,
                summary.artifacts,
                out_dir,
                start.elapsed().as_secs_f64()
            );
        }

        Commands::Verify { stars, objects } => {
            let systems = read_complete_star_catalog(&stars)?;
            let bodies = read_system_objects(&objects)?;

            let mut violations = verify_catalog(&systems);
            violations.extend(verify_objects(&systems, &bodies));

            if !violations.is_empty() {
                for violation in &violations {
                    eprintln!("  {}", violation);
                }
                bail!("{} violation(s) found", violations.len());
            }
            println!(
                "OK: {} systems, {} objects",
                systems.len(),
                bodies.len()
            );
        }

        Commands::ListClasses => {
            println!("Object classes:\n");
            for class in ObjectClass::ALL {
                println!("  {:<3} {}", class.code(), class);
            }
            println!("\nArtifact types:\n");
            for artifact in ArtifactType::ALL {
                println!(
                    "  {:<3} {:<12} {}",
                    artifact.code(),
                    artifact.to_string(),
                    artifact.description()
                );
            }
        }
    }

    Ok(())
}
