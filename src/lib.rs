pub mod artifacts;
pub mod cli;
pub mod config;
pub mod error;
pub mod keyed;
pub mod objects;
pub mod parser;
pub mod pipeline;
pub mod projector;
pub mod schema;
pub mod ui;
pub mod verify;
pub mod writer;

pub use cli::{Cli, Commands};
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use ui::{ConsoleUi, Phase, SilentUi, Ui};
