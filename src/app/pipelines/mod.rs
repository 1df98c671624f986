pub mod assembly_pipeline;

pub use assembly_pipeline::AssemblyPipeline;
