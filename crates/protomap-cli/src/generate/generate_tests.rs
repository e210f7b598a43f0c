#![allow(non_snake_case)]

use super::*;
use protomap_core::OutputFormat;
use protomap_core::testing;
use std::fs;
use tempfile::TempDir;

const ORDER_PROTO: &str = r#"
syntax = "proto3";

package shop;

import "protomap/options.proto";

message GrpcOrder {
  string id = 1;
  int32 size = 2;
  bytes legacy = 3 [(protomap.unused) = true];
}

message GrpcCustomer {
  string name = 1;
}
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let descriptor_set = testing::encode_descriptor_set(&[("order.proto", ORDER_PROTO)]).unwrap();
        fs::write(dir.path().join("schema.pb"), descriptor_set).unwrap();
        fs::create_dir_all(dir.path().join("src/shop")).unwrap();
        fs::write(
            dir.path().join("src/shop/Order.java"),
            "package shop;\nimport java.util.ArrayList;\npublic class Order extends ArrayList<String> { private String id; }",
        )
        .unwrap();
        fs::write(
            dir.path().join("src/shop/Customer.java"),
            "package shop;\npublic class Customer { private String name; }",
        )
        .unwrap();
        Self { dir }
    }

    fn schema(&self) -> PathBuf {
        self.dir.path().join("schema.pb")
    }

    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            source_roots: vec![self.dir.path().join("src")],
            ..GeneratorConfig::default()
        }
    }

    fn args(&self) -> GenerateArgs {
        GenerateArgs {
            schema: self.schema(),
            config: ConfigArgs::default(),
            format: None,
            output: None,
            messages: Vec::new(),
        }
    }
}

#[test]
fn build_report___maps_every_message() {
    let ws = Workspace::new();

    let report = build_report(&ws.schema(), &ws.config(), &[]).unwrap();

    assert_eq!(report.summary.messages, 2);
    assert_eq!(report.summary.fields, 3);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.errors, 0);
}

#[test]
fn build_report___only_named_message() {
    let ws = Workspace::new();

    let report = build_report(&ws.schema(), &ws.config(), &["shop.GrpcCustomer".to_string()]).unwrap();

    assert_eq!(report.messages.len(), 1);
    assert_eq!(report.messages[0].domain_class, "Customer");
}

#[test]
fn build_report___unknown_message___fails() {
    let ws = Workspace::new();

    let err = build_report(&ws.schema(), &ws.config(), &["shop.GrpcMissing".to_string()]).unwrap_err();

    assert!(err.to_string().contains("Unknown message: shop.GrpcMissing"));
}

#[test]
fn build_report___missing_schema___fails() {
    let ws = Workspace::new();

    let err = build_report(&ws.dir.path().join("absent.pb"), &ws.config(), &[]).unwrap_err();

    assert!(err.to_string().contains("Failed to load schema"));
}

#[test]
fn build_report___jdk_superclass_field___resolved_through_registry() {
    let ws = Workspace::new();

    let report = build_report(&ws.schema(), &ws.config(), &["shop.GrpcOrder".to_string()]).unwrap();
    let size = report.messages[0]
        .fields
        .iter()
        .find(|f| f.field == "size")
        .unwrap();

    // ArrayList declares `size` as private
    assert!(size.needs_accessor);
    assert_eq!(size.to_wire.code(), "builder.setSize(getSize());");
}

#[test]
fn build_report___registry_file_overrides_jdk_entry() {
    let ws = Workspace::new();
    let registry = ws.dir.path().join("classes.toml");
    fs::write(
        &registry,
        r#"
[[class]]
name = "java.util.ArrayList"
superclass = "java.lang.Object"
fields = [{ name = "size", visibility = "public" }]
"#,
    )
    .unwrap();
    let config = GeneratorConfig {
        runtime_classes: Some(registry),
        ..ws.config()
    };

    let report = build_report(&ws.schema(), &config, &["shop.GrpcOrder".to_string()]).unwrap();
    let size = report.messages[0]
        .fields
        .iter()
        .find(|f| f.field == "size")
        .unwrap();

    assert!(!size.needs_accessor);
}

#[test]
fn build_resolver___missing_registry___fails() {
    let ws = Workspace::new();
    let config = GeneratorConfig {
        runtime_classes: Some(ws.dir.path().join("absent.toml")),
        ..ws.config()
    };

    let err = build_resolver(&config).unwrap_err();

    assert!(err.to_string().contains("Failed to load runtime classes"));
}

#[test]
fn run___writes_text_report_to_file() {
    let ws = Workspace::new();
    let output = ws.dir.path().join("report.txt");
    let args = GenerateArgs {
        format: Some(FormatArg::Text),
        output: Some(output.clone()),
        ..ws.args()
    };

    let outcome = run(&args, ws.config()).unwrap();

    assert_eq!(outcome, Outcome::Clean);
    let text = fs::read_to_string(output).unwrap();
    assert!(text.starts_with("message shop.GrpcOrder -> Order"));
    assert!(text.contains("summary: 2 messages"));
}

#[test]
fn run___json_is_default_format() {
    let ws = Workspace::new();
    let output = ws.dir.path().join("report.json");
    let args = GenerateArgs {
        output: Some(output.clone()),
        ..ws.args()
    };

    run(&args, ws.config()).unwrap();

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(output).unwrap()).unwrap();
    assert_eq!(json["summary"]["messages"], 2);
    assert_eq!(ws.config().output.format, OutputFormat::Json);
}

#[test]
fn run___no_source_roots___invalid_configuration() {
    let ws = Workspace::new();

    let err = run(&ws.args(), GeneratorConfig::default()).unwrap_err();

    assert!(err.to_string().contains("Invalid configuration"));
}

#[test]
fn run___cyclic_domain_class___reports_errors() {
    let ws = Workspace::new();
    fs::write(
        ws.dir.path().join("src/shop/Customer.java"),
        "package shop;\npublic class Customer extends Customer { }",
    )
    .unwrap();
    let args = GenerateArgs {
        output: Some(ws.dir.path().join("report.json")),
        ..ws.args()
    };

    let outcome = run(&args, ws.config()).unwrap();

    assert_eq!(outcome, Outcome::WithErrors);
}
