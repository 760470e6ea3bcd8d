use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "universe-builder")]
#[command(version, about = "Build a deterministic galaxy from the HYG star catalog")]
pub struct Cli {
    /// Hide progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project a HYG catalog onto the galaxy grid
    Catalog {
        /// HYG CSV file
        #[arg(long)]
        input_csv: PathBuf,

        /// Maximum distance from Sol in light-years
        #[arg(long, default_value_t = 50.0)]
        radius_ly: f64,

        /// Maximum number of systems to keep, nearest first
        #[arg(long, default_value_t = 150)]
        max_stars: usize,

        /// Light-years per grid cell
        #[arg(long, default_value_t = 1.0)]
        scale: f64,

        /// Star catalog CSV output
        #[arg(long, default_value = "star_catalog.csv")]
        csv_out: PathBuf,

        /// ASCII map output
        #[arg(long, default_value = "star_map.txt")]
        map_out: PathBuf,
    },

    /// Generate planets, moons and asteroids for every system
    Objects {
        /// star_catalog.csv from the catalog stage
        #[arg(long)]
        input_stars: PathBuf,

        /// System objects CSV output
        #[arg(long, default_value = "system_objects.csv")]
        output_objects: PathBuf,

        /// Maximum primaries (planets + asteroid) per system; moons come on top
        #[arg(long, default_value_t = 5)]
        max_objects_per_system: u32,

        /// Global generation seed
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Add artifact_flag/artifact_type columns to a system objects CSV
    Artifacts {
        /// system_objects.csv from the objects stage
        #[arg(long)]
        input_objects: PathBuf,

        /// Output path (default: rewrite the input in place)
        #[arg(long)]
        output_objects: Option<PathBuf>,

        /// Per-object chance for eligible bodies to host an artifact
        #[arg(long, default_value_t = 0.02)]
        artifact_rate: f64,

        /// Seed mixed into artifact placement
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },

    /// Run every stage from a HYG catalog into one directory
    Run {
        /// HYG CSV file
        #[arg(long)]
        input_csv: PathBuf,

        /// Directory for star_catalog.csv, star_map.txt and system_objects.csv
        #[arg(long)]
        out_dir: PathBuf,

        /// JSON file with catalog/objects/artifacts parameters
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Check generated files against the file contract
    Verify {
        /// star_catalog.csv
        #[arg(long)]
        stars: PathBuf,

        /// system_objects.csv, with or without artifact columns
        #[arg(long)]
        objects: PathBuf,
    },

    /// List object classes and artifact types with their CSV codes
    ListClasses,
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
