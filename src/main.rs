use anyhow::Context;
use clap::Parser;
use plate_assembler::utils::error::ErrorSeverity;
use plate_assembler::utils::{logger, validation::Validate};
use plate_assembler::{AssemblyEngine, AssemblyPipeline, CliConfig, LocalStorage, TomlConfig};

fn load_settings(path: Option<&str>) -> anyhow::Result<TomlConfig> {
    let settings = match path {
        Some(path) => TomlConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => TomlConfig::default(),
    };
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("🚀 Starting plate-assembler");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let settings = match load_settings(config.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "🧪 Plate {} x {}, columns '{}' x '{}'",
        settings.plate.rows,
        settings.plate.columns,
        settings.parts.column_a,
        settings.parts.column_b
    );

    let storage = LocalStorage::default();
    let pipeline = match AssemblyPipeline::new(storage, config, settings) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!("❌ {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let engine = AssemblyEngine::new(pipeline);

    match engine.run().await {
        Ok(output) => {
            tracing::info!("✅ Plate map and protocol completed");
            println!("✅ Plate map and protocol completed");
            println!("📁 {}", output);
        }
        Err(e) => {
            tracing::error!(
                "❌ Assembly failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }

    Ok(())
}
