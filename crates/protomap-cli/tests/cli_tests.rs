//! Integration tests for the protomap binary.
//!
//! Each test lays out a schema, a config and domain sources in a temporary
//! directory and runs the built binary against it.

#![allow(non_snake_case)]

use protomap_core::testing;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ORDER_PROTO: &str = r#"
syntax = "proto3";

package shop;

message GrpcOrder {
  string id = 1;
  string tenant = 2;
}
"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// Project with a service root and a shared root holding the base class.
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let descriptor_set = testing::encode_descriptor_set(&[("order.proto", ORDER_PROTO)]).unwrap();
    fs::write(dir.path().join("schema.pb"), descriptor_set).unwrap();
    write(
        dir.path(),
        "protomap.toml",
        r#"
source_roots = ["service", "shared"]

[output]
format = "json"
"#,
    );
    write(
        dir.path(),
        "service/com/acme/shop/Order.java",
        r#"
package com.acme.shop;

import com.acme.common.BaseEntity;

public class Order extends BaseEntity {
}
"#,
    );
    write(
        dir.path(),
        "shared/com/acme/common/BaseEntity.java",
        r#"
package com.acme.common;

public abstract class BaseEntity {
    private String id;
    public String tenant;
}
"#,
    );
    dir
}

fn protomap(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_protomap"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

// =============================================================================
// generate
// =============================================================================

#[test]
fn generate___json_report_on_stdout() {
    let dir = project();

    let output = protomap(dir.path(), &["generate", "--schema", "schema.pb"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let fields = &json["messages"][0]["fields"];
    assert_eq!(fields[0]["identifier"]["name"], "getId");
    assert_eq!(fields[0]["to_wire"]["code"], "builder.setId(getId());");
    assert_eq!(fields[1]["to_wire"]["code"], "builder.setTenant(tenant);");
}

#[test]
fn generate___text_format_flag_overrides_config() {
    let dir = project();

    let output = protomap(
        dir.path(),
        &["generate", "--schema", "schema.pb", "--format", "text"],
    );

    assert!(output.status.success());
    assert!(stdout(&output).contains("message shop.GrpcOrder -> Order"));
}

#[test]
fn generate___root_flag_replaces_configured_roots() {
    let dir = project();

    let output = protomap(
        dir.path(),
        &["generate", "--schema", "schema.pb", "--root", "service"],
    );

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json["messages"][0]["fields"][0]["to_wire"]["code"],
        "builder.setId(id);"
    );
}

#[test]
fn generate___cyclic_hierarchy___non_zero_exit() {
    let dir = project();
    write(
        dir.path(),
        "service/com/acme/shop/Order.java",
        "package com.acme.shop;\npublic class Order extends Order { }",
    );

    let output = protomap(dir.path(), &["generate", "--schema", "schema.pb"]);

    assert!(!output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["summary"]["errors"], 2);
}

#[test]
fn generate___missing_schema___fails_with_context() {
    let dir = project();

    let output = protomap(dir.path(), &["generate", "--schema", "absent.pb"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Failed to load schema"));
}

// =============================================================================
// resolve and check
// =============================================================================

#[test]
fn resolve___prints_resolution() {
    let dir = project();

    let output = protomap(dir.path(), &["resolve", "Order", "id"]);

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["needs_accessor"], true);
    assert_eq!(json["getter"], "getId");
    assert_eq!(json["origin"]["kind"], "source");
}

#[test]
fn resolve___unknown_class___fails() {
    let dir = project();

    let output = protomap(dir.path(), &["resolve", "Invoice", "id"]);

    assert!(!output.status.success());
}

#[test]
fn check___valid_config___succeeds() {
    let dir = project();

    let output = protomap(dir.path(), &["check"]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("Config is valid!"));
}

#[test]
fn check___config_without_roots___fails() {
    let dir = project();
    write(dir.path(), "protomap.toml", "log_level = \"info\"\n");

    let output = protomap(dir.path(), &["check"]);

    assert!(!output.status.success());
}
