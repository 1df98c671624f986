pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::pipelines::AssemblyPipeline;
pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::AssemblyEngine, injector::TemplateParameterInjector, layout::PlateLayoutGenerator,
    reservoir::ReservoirPlanner,
};
pub use domain::model::{
    CombinationRow, GeneratedScript, LayoutTable, ParamValue, ParameterSet, PartList,
    PlateGeometry, TemplateText, WellCoordinate,
};
pub use utils::error::{AssemblyError, Result};
