#![allow(non_snake_case)]

use super::*;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("protomap.toml");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn ConfigArgs___load___rebases_roots_on_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"source_roots = ["service", "shared"]"#);
    let args = ConfigArgs {
        config: Some(path),
        ..ConfigArgs::default()
    };

    let config = args.load().unwrap();

    assert_eq!(
        config.source_roots,
        vec![dir.path().join("service"), dir.path().join("shared")]
    );
}

#[test]
fn ConfigArgs___load___flag_roots_replace_configured_roots() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"source_roots = ["service"]"#);
    let args = ConfigArgs {
        config: Some(path),
        roots: vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")],
        runtime_classes: Some(PathBuf::from("/srv/classes.toml")),
    };

    let config = args.load().unwrap();

    assert_eq!(
        config.source_roots,
        vec![PathBuf::from("/srv/a"), PathBuf::from("/srv/b")]
    );
    assert_eq!(
        config.runtime_classes,
        Some(PathBuf::from("/srv/classes.toml"))
    );
}

#[test]
fn ConfigArgs___load___missing_file_is_error() {
    let dir = TempDir::new().unwrap();
    let args = ConfigArgs {
        config: Some(dir.path().join("absent.toml")),
        ..ConfigArgs::default()
    };

    let err = args.load().unwrap_err();

    assert!(err.to_string().contains("Failed to load config"));
}

#[test]
fn ConfigArgs___load___invalid_toml_is_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "source_roots = [");
    let args = ConfigArgs {
        config: Some(path),
        ..ConfigArgs::default()
    };

    assert!(args.load().is_err());
}

#[test]
fn check___valid_config___succeeds() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    let path = write_config(&dir, r#"source_roots = ["src"]"#);
    let args = ConfigArgs {
        config: Some(path),
        ..ConfigArgs::default()
    };

    assert!(check(&args).is_ok());
}

#[test]
fn check___no_roots___fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, r#"log_level = "debug""#);
    let args = ConfigArgs {
        config: Some(path),
        ..ConfigArgs::default()
    };

    let err = check(&args).unwrap_err();

    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn check___missing_registry___fails() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "source_roots = [\"src\"]\nruntime_classes = \"classes.toml\"",
    );
    let args = ConfigArgs {
        config: Some(path),
        ..ConfigArgs::default()
    };

    let err = check(&args).unwrap_err();

    assert!(err.to_string().contains("registry not found"));
}

#[test]
fn FormatArg___converts_to_output_format() {
    assert_eq!(OutputFormat::from(FormatArg::Json), OutputFormat::Json);
    assert_eq!(OutputFormat::from(FormatArg::Text), OutputFormat::Text);
}
