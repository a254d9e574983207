//! Unit tests for CLI commands
#![allow(clippy::unwrap_used, clippy::expect_used)]

use crate::cli::{run, Cli, Commands};
use clap::Parser;
use std::fs;

const WIDGET: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
spec:
  group: example.com
  names: {kind: Widget}
  versions:
    - name: v1
      schema:
        openAPIV3Schema:
          type: object
          properties:
            spec:
              type: object
              properties:
                size: {type: integer}
                createdAt: {type: string, format: date-time}
"#;

#[test]
fn test_generate_command_parses() {
    let cli = Cli::try_parse_from([
        "crd-typegen",
        "generate",
        "--input",
        "crds.yaml",
        "--output",
        "out.go",
        "--version",
        "v1",
    ])
    .unwrap();

    match cli.command {
        Commands::Generate {
            input,
            output,
            version,
            package,
            config,
        } => {
            assert_eq!(input.to_string_lossy(), "crds.yaml");
            assert_eq!(output.unwrap().to_string_lossy(), "out.go");
            assert_eq!(version.as_deref(), Some("v1"));
            assert!(package.is_none());
            assert!(config.is_none());
        }
        _ => panic!("Expected Generate command"),
    }
}

#[test]
fn test_inspect_command_parses() {
    let cli = Cli::try_parse_from(["crd-typegen", "-vv", "inspect", "-i", "crds.yaml"]).unwrap();
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Commands::Inspect { input, json } => {
            assert_eq!(input.to_string_lossy(), "crds.yaml");
            assert!(!json);
        }
        _ => panic!("Expected Inspect command"),
    }
}

#[test]
fn test_generate_requires_input() {
    assert!(Cli::try_parse_from(["crd-typegen", "generate"]).is_err());
}

#[test]
fn test_generate_writes_wrapped_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("crds.yaml");
    let output = dir.path().join("zz_generated.go");
    fs::write(&input, WIDGET).unwrap();

    let cli = Cli::try_parse_from([
        "crd-typegen",
        "generate",
        "--input",
        input.to_str().unwrap(),
        "--output",
        output.to_str().unwrap(),
        "--package",
        "v1",
    ])
    .unwrap();
    run(cli).unwrap();

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.starts_with("package v1\n\nimport (\n\tmetav1 \"k8s.io/apimachinery/pkg/apis/meta/v1\"\n)\n\n"));
    assert!(text.contains("\tCreatedAt metav1.Time `json:\"createdAt,omitempty\"`"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_generate_uses_detected_config() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("crds.yaml");
    let output = dir.path().join("out.go");
    fs::write(&input, WIDGET).unwrap();
    fs::write(
        dir.path().join("crd-typegen.toml"),
        "package = \"api\"\n\n[renames]\n",
    )
    .unwrap();

    let cli = Cli::try_parse_from([
        "crd-typegen",
        "generate",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ])
    .unwrap();
    run(cli).unwrap();
    assert!(fs::read_to_string(&output)
        .unwrap()
        .starts_with("package api\n"));
}

#[test]
fn test_failed_generation_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("crds.yaml");
    let output = dir.path().join("out.go");
    fs::write(&input, WIDGET).unwrap();

    let cli = Cli::try_parse_from([
        "crd-typegen",
        "generate",
        "-i",
        input.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--version",
        "v9",
    ])
    .unwrap();
    let err = run(cli).unwrap_err();
    assert!(format!("{err:#}").contains("v9"));
    assert!(!output.exists());
}

#[test]
fn test_missing_explicit_config_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("crds.yaml");
    fs::write(&input, WIDGET).unwrap();
    let missing = dir.path().join("nope.toml");

    let cli = Cli::try_parse_from([
        "crd-typegen",
        "generate",
        "-i",
        input.to_str().unwrap(),
        "--config",
        missing.to_str().unwrap(),
    ])
    .unwrap();
    assert!(run(cli).is_err());
}
