use crate::adapters::tabular::{read_part_list, write_layout_csv};
use crate::config::cli::file_name;
use crate::config::toml_config::TomlConfig;
use crate::core::injector::TemplateParameterInjector;
use crate::core::layout::PlateLayoutGenerator;
use crate::core::reservoir::ReservoirPlanner;
use crate::core::{AssemblyArtifacts, AssemblyInputs, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{RunSummary, TemplateText};
use crate::utils::error::{AssemblyError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// Parts file + template in, plate map + protocol (+ summary, archive) out.
pub struct AssemblyPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    settings: TomlConfig,
    generator: PlateLayoutGenerator,
    planner: ReservoirPlanner,
    injector: TemplateParameterInjector,
}

impl<S: Storage, C: ConfigProvider> AssemblyPipeline<S, C> {
    pub fn new(storage: S, config: C, settings: TomlConfig) -> Result<Self> {
        let geometry = settings.geometry()?;
        Ok(Self {
            generator: PlateLayoutGenerator::new(geometry.clone()),
            planner: ReservoirPlanner::new(geometry),
            injector: TemplateParameterInjector::new(
                settings.template.definition_prefixes.iter().cloned(),
            ),
            storage,
            config,
            settings,
        })
    }

    fn build_archive(&self, artifacts: &AssemblyArtifacts, summary_json: &[u8]) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        zip.start_file::<_, ()>(file_name(self.config.platemap_path()), FileOptions::default())?;
        zip.write_all(&artifacts.layout_csv)?;

        zip.start_file::<_, ()>(file_name(self.config.protocol_path()), FileOptions::default())?;
        zip.write_all(artifacts.script.to_text().as_bytes())?;

        zip.start_file::<_, ()>("summary.json", FileOptions::default())?;
        zip.write_all(summary_json)?;

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AssemblyPipeline<S, C> {
    async fn extract(&self) -> Result<AssemblyInputs> {
        tracing::debug!("Loading parts from: {}", self.config.parts_path());
        let parts_data = self.storage.read_file(self.config.parts_path()).await?;
        let parts = read_part_list(
            &parts_data,
            &self.settings.parts.column_a,
            &self.settings.parts.column_b,
        )?;

        tracing::debug!("Loading template from: {}", self.config.template_path());
        let template_data = self.storage.read_file(self.config.template_path()).await?;
        let template_text = String::from_utf8(template_data).map_err(|e| {
            AssemblyError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        Ok(AssemblyInputs {
            parts,
            template: TemplateText::parse(&template_text),
        })
    }

    async fn transform(&self, inputs: AssemblyInputs) -> Result<AssemblyArtifacts> {
        let (count_a, count_b) = inputs.parts.counts();
        if count_a == 0 || count_b == 0 {
            tracing::warn!(
                "Empty part category ({} x {}); the plate map will have no wells",
                count_a,
                count_b
            );
        }

        let layout = self.generator.generate_for(&inputs.parts)?;
        let plan = match self.planner.plan(&inputs.parts, &layout) {
            Ok(plan) => Some(plan),
            Err(e @ AssemblyError::SourcePlateOverflow { .. }) => {
                tracing::warn!("⚠️ {}; writing plate map and protocol without it", e);
                None
            }
            Err(e) => return Err(e),
        };
        let parameters = self.settings.parameter_set(count_a, count_b)?;
        let script = self.injector.inject(&inputs.template, &parameters)?;
        let layout_csv = write_layout_csv(&layout, &self.settings.output)?;

        let summary = RunSummary {
            generated_at: chrono::Utc::now(),
            count_a,
            count_b,
            total_wells: layout.len(),
            plate_capacity: self.generator.geometry().capacity(),
            parameters: parameters.clone(),
            plan: plan.clone(),
        };

        Ok(AssemblyArtifacts {
            layout,
            layout_csv,
            parameters,
            script,
            plan,
            summary,
        })
    }

    async fn load(&self, artifacts: AssemblyArtifacts) -> Result<String> {
        if self.config.dry_run() {
            tracing::info!(
                "🔍 Dry run: would write {} ({} bytes) and {} ({} lines)",
                self.config.platemap_path(),
                artifacts.layout_csv.len(),
                self.config.protocol_path(),
                artifacts.script.len()
            );
            for (name, value) in artifacts.parameters.iter() {
                tracing::info!("🔍 Dry run parameter: {} = {}", name, value);
            }
            return Ok("dry run, nothing written".to_string());
        }

        self.storage
            .write_file(self.config.platemap_path(), &artifacts.layout_csv)
            .await?;
        tracing::info!("📁 Plate map saved to: {}", self.config.platemap_path());

        self.storage
            .write_file(
                self.config.protocol_path(),
                artifacts.script.to_text().as_bytes(),
            )
            .await?;
        tracing::info!("📁 Protocol saved to: {}", self.config.protocol_path());

        let summary_json = serde_json::to_vec_pretty(&artifacts.summary)?;

        if let Some(summary_path) = self.config.summary_path() {
            self.storage.write_file(summary_path, &summary_json).await?;
            tracing::info!("📁 Run summary saved to: {}", summary_path);
        }

        if let Some(archive_path) = self.config.archive_path() {
            let archive = self.build_archive(&artifacts, &summary_json)?;
            tracing::debug!("Writing archive ({} bytes)", archive.len());
            self.storage.write_file(archive_path, &archive).await?;
            tracing::info!("📦 Archive saved to: {}", archive_path);
        }

        Ok(format!(
            "{}, {}",
            self.config.platemap_path(),
            self.config.protocol_path()
        ))
    }
}
