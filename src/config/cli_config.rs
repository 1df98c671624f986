use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_extension, validate_path, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "plate-assembler")]
#[command(about = "Lay out part combinations on a 96-well plate and generate the matching robot protocol")]
pub struct CliConfig {
    /// CSV file listing the parts to combine
    #[arg(long)]
    pub parts: String,

    /// Protocol template to splice the run parameters into
    #[arg(long)]
    pub template: String,

    #[arg(long, default_value = "platemap.csv")]
    pub platemap_out: String,

    #[arg(long, default_value = "protocol.py")]
    pub protocol_out: String,

    /// TOML file with plate, column and template settings
    #[arg(long)]
    pub config: Option<String>,

    /// Also bundle every output into this zip archive
    #[arg(long)]
    pub archive: Option<String>,

    /// Write a JSON run summary to this path
    #[arg(long)]
    pub summary: Option<String>,

    /// Compute everything but write nothing
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines on stderr")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn parts_path(&self) -> &str {
        &self.parts
    }

    fn template_path(&self) -> &str {
        &self.template
    }

    fn platemap_path(&self) -> &str {
        &self.platemap_out
    }

    fn protocol_path(&self) -> &str {
        &self.protocol_out
    }

    fn archive_path(&self) -> Option<&str> {
        self.archive.as_deref()
    }

    fn summary_path(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("parts", &self.parts)?;
        validate_file_extension("parts", &self.parts, &["csv"])?;
        validate_path("template", &self.template)?;
        validate_path("platemap_out", &self.platemap_out)?;
        validate_path("protocol_out", &self.protocol_out)?;

        if let Some(archive) = &self.archive {
            validate_path("archive", archive)?;
            validate_file_extension("archive", archive, &["zip"])?;
        }
        if let Some(summary) = &self.summary {
            validate_path("summary", summary)?;
        }
        Ok(())
    }
}
