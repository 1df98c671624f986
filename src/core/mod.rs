pub mod engine;
pub mod injector;
pub mod layout;
pub mod reservoir;

pub use crate::domain::model::{AssemblyArtifacts, AssemblyInputs};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
