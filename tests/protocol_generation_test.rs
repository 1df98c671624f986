use anyhow::Result;
use plate_assembler::{
    AssemblyEngine, AssemblyError, AssemblyPipeline, CliConfig, LocalStorage, ParameterSet,
    TemplateParameterInjector, TemplateText, TomlConfig,
};
use std::io::Read;
use tempfile::TempDir;

const PARTS_CSV: &str = "Promoters,3UTRs\nJ23100,UTR_A\nJ23106,UTR_B\nJ23114,\n";

const TEMPLATE: &str = "\
from opentrons import protocol_api

metadata = {'apiLevel': '2.8'}

def run(protocol: protocol_api.ProtocolContext):
    n_promoters = prom_utr[0]
    n_utr = prom_utr[1]
";

fn cli_config(dir: &TempDir) -> CliConfig {
    let path = |name: &str| dir.path().join(name).to_str().unwrap().to_string();
    CliConfig {
        parts: path("parts.csv"),
        template: path("template.py"),
        platemap_out: path("out/platemap.csv"),
        protocol_out: path("out/protocol.py"),
        config: None,
        archive: None,
        summary: None,
        dry_run: false,
        verbose: false,
        log_json: false,
    }
}

#[test]
fn test_injector_matches_documented_example() {
    let injector = TemplateParameterInjector::default();
    let template = TemplateText::from_lines(["x=1\n", "def run():\n", "  pass\n"]);
    let params = ParameterSet::new().with("a", 5i64).with("b", "hi");

    let script = injector.inject(&template, &params).unwrap();
    assert_eq!(
        script.lines(),
        &["x=1\n", "a = 5\n", "b = hi\n", "\n", "def run():\n", "  pass\n"]
    );
}

#[tokio::test]
async fn test_end_to_end_writes_platemap_and_protocol() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("parts.csv"), PARTS_CSV)?;
    std::fs::write(temp_dir.path().join("template.py"), TEMPLATE)?;

    let config = cli_config(&temp_dir);
    let pipeline = AssemblyPipeline::new(LocalStorage::default(), config, TomlConfig::default())?;
    let engine = AssemblyEngine::new(pipeline);
    engine.run().await?;

    let platemap = std::fs::read_to_string(temp_dir.path().join("out/platemap.csv"))?;
    assert_eq!(
        platemap,
        "Platemap Coordinates,Promoters,3'UTRs\n\
         A1,J23100,UTR_A\nB1,J23106,UTR_A\nC1,J23114,UTR_A\n\
         D1,J23100,UTR_B\nE1,J23106,UTR_B\nF1,J23114,UTR_B\n"
    );

    let protocol = std::fs::read_to_string(temp_dir.path().join("out/protocol.py"))?;
    assert!(protocol.starts_with(
        "from opentrons import protocol_api\n\nmetadata = {'apiLevel': '2.8'}\n\nprom_utr = (3, 2)\n\ndef run("
    ));
    assert!(protocol.ends_with("    n_utr = prom_utr[1]\n"));
    assert_eq!(protocol.lines().count(), TEMPLATE.lines().count() + 2);

    Ok(())
}

#[tokio::test]
async fn test_archive_and_summary_with_toml_settings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("parts.csv"),
        "Promoter,Terminator\nP1,T1\nP2,T2\n",
    )?;
    std::fs::write(temp_dir.path().join("template.py"), TEMPLATE)?;

    let settings = TomlConfig::from_toml_str(
        r#"
[parts]
column_a = "Promoter"
column_b = "Terminator"

[template]
count_parameter = "counts"

[parameters]
transfer_volume = 2
"#,
    )?;

    let mut config = cli_config(&temp_dir);
    config.archive = Some(temp_dir.path().join("out/run.zip").to_str().unwrap().to_string());
    config.summary = Some(temp_dir.path().join("out/summary.json").to_str().unwrap().to_string());

    let engine = AssemblyEngine::new(AssemblyPipeline::new(
        LocalStorage::default(),
        config,
        settings,
    )?);
    engine.run().await?;

    let summary: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        temp_dir.path().join("out/summary.json"),
    )?)?;
    assert_eq!(summary["count_a"], 2);
    assert_eq!(summary["count_b"], 2);
    assert_eq!(summary["plate_capacity"], 96);
    assert_eq!(summary["parameters"]["counts"], "(2, 2)");
    assert_eq!(summary["parameters"]["transfer_volume"], "2");

    let archive_data = std::fs::read(temp_dir.path().join("out/run.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive_data))?;
    assert_eq!(archive.len(), 3);

    let mut protocol = String::new();
    archive.by_name("protocol.py")?.read_to_string(&mut protocol)?;
    assert!(protocol.contains("counts = (2, 2)\ntransfer_volume = 2\n\ndef run("));

    let mut platemap = String::new();
    archive.by_name("platemap.csv")?.read_to_string(&mut platemap)?;
    assert!(platemap.contains("A1,P1,T1"));

    Ok(())
}

#[tokio::test]
async fn test_oversized_library_writes_nothing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut parts = String::from("Promoters,3UTRs\n");
    for i in 1..=10 {
        parts.push_str(&format!("p{},u{}\n", i, i));
    }
    std::fs::write(temp_dir.path().join("parts.csv"), parts)?;
    std::fs::write(temp_dir.path().join("template.py"), TEMPLATE)?;

    let engine = AssemblyEngine::new(AssemblyPipeline::new(
        LocalStorage::default(),
        cli_config(&temp_dir),
        TomlConfig::default(),
    )?);

    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, AssemblyError::InvalidCount { count_a: 10, count_b: 10, .. }));
    assert!(!temp_dir.path().join("out/platemap.csv").exists());
    assert!(!temp_dir.path().join("out/protocol.py").exists());

    Ok(())
}

#[tokio::test]
async fn test_full_plate_of_one_category_writes_outputs() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let mut parts = String::from("Promoters,3UTRs\n");
    for i in 1..=96 {
        if i == 1 {
            parts.push_str("p1,u1\n");
        } else {
            parts.push_str(&format!("p{},\n", i));
        }
    }
    std::fs::write(temp_dir.path().join("parts.csv"), parts)?;
    std::fs::write(temp_dir.path().join("template.py"), TEMPLATE)?;

    let mut config = cli_config(&temp_dir);
    config.summary = Some(temp_dir.path().join("out/summary.json").to_str().unwrap().to_string());

    let engine = AssemblyEngine::new(AssemblyPipeline::new(
        LocalStorage::default(),
        config,
        TomlConfig::default(),
    )?);
    engine.run().await?;

    let platemap = std::fs::read_to_string(temp_dir.path().join("out/platemap.csv"))?;
    let rows: Vec<&str> = platemap.lines().collect();
    assert_eq!(rows.len(), 97);
    assert_eq!(rows[1], "A1,p1,u1");
    assert_eq!(rows[96], "H12,p96,u1");

    let protocol = std::fs::read_to_string(temp_dir.path().join("out/protocol.py"))?;
    assert!(protocol.contains("prom_utr = (96, 1)\n\ndef run("));

    let summary: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        temp_dir.path().join("out/summary.json"),
    )?)?;
    assert_eq!(summary["total_wells"], 96);
    assert!(summary["plan"].is_null());

    Ok(())
}
