/// End-to-end analysis of G-code files on disk
use anyhow::Result;
use deltapath::{analysis::analyze, config::Config};
use std::{fs, process::Command};

const PROGRAM: &str = "; test job
G28
G1 F1500 X50 E10
G1 X50 E10
G1 Q1
G1 X0 Y-200
G28
M220 S200
G1 X10
";

#[test]
fn test_analyze_program_with_defaults() -> Result<()> {
    let analysis = analyze(PROGRAM, &Config::default().processor_config())?;

    let commands = &analysis.commands;
    assert_eq!(commands.command_count, 8);
    assert_eq!(commands.signatures.get("G28"), Some(&2));
    assert_eq!(commands.signatures.get("G1EFX"), Some(&1));
    assert_eq!(commands.signatures.get("G1Q"), Some(&1));
    assert_eq!(commands.signatures.get("M220S"), Some(&1));
    assert_eq!(analysis.skipped_lines, 1);

    let run = &analysis.run;
    assert_eq!(run.moves_processed, 2);
    assert_eq!(run.moves_skipped, 1);
    assert_eq!(run.degenerate_moves, 1);
    // 400 steps for the first move, 40 for the 10 mm move at 200%
    assert_eq!(run.total_steps_naive, 401 + 41);
    assert!(run.total_steps_adaptive < run.total_steps_naive);
    assert!(run.max_deviation_adaptive > run.max_deviation_naive);
    Ok(())
}

#[test]
fn test_config_file_changes_the_analysis() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("deltapath.toml");
    fs::write(
        &config_path,
        "[segmentation]\nsegments_per_second = 100.0\n\n[motion]\nfeed_rate = 3000.0\n",
    )?;

    let config = Config::from_file(&config_path)?;
    config.validate()?;
    let analysis = analyze("G1 X50 E10\n", &config.processor_config())?;

    // 6000 * 50 / 3000 / 100 = 1s at 100 segments per second
    assert_eq!(analysis.run.total_steps_naive, 101);
    Ok(())
}

#[test]
fn test_config_without_extension_falls_back_to_json() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config_path = dir.path().join("deltapath.conf");
    fs::write(&config_path, r#"{ "segmentation": { "max_depth": 3 } }"#)?;

    let config = Config::from_file(&config_path)?;
    assert_eq!(config.segmentation.max_depth, 3);
    Ok(())
}

#[test]
fn test_binary_prints_json_report() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("job.gcode");
    fs::write(&input, PROGRAM)?;

    let output = Command::new(env!("CARGO_BIN_EXE_deltapath"))
        .arg("analyze")
        .arg(&input)
        .args(["--format", "json"])
        .output()?;
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(report["run"]["moves_processed"], 2);
    assert_eq!(report["commands"]["command_count"], 8);
    assert_eq!(report["skipped_lines"], 1);
    Ok(())
}

#[test]
fn test_binary_rejects_invalid_config() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("job.gcode");
    let config = dir.path().join("bad.toml");
    fs::write(&input, PROGRAM)?;
    fs::write(&config, "[geometry]\nradius = -1.0\n")?;

    let output = Command::new(env!("CARGO_BIN_EXE_deltapath"))
        .arg("analyze")
        .arg(&input)
        .arg("--config")
        .arg(&config)
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("geometry.radius"));
    Ok(())
}
