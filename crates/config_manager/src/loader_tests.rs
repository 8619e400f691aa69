//! Tests for settings file loading.

use super::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

const YAML_SETTINGS: &str = r#"
branches:
  main:
    protection:
      required_pull_request_reviews:
        required_approving_review_count: 2
      required_status_checks:
        strict: true
        checks:
          - context: ci/build
repositories:
  - name: payments-api
    branches:
      main:
        protection:
          required_pull_request_reviews:
            required_approving_review_count: 1
"#;

const TOML_SETTINGS: &str = r#"
[branches.main.protection]
enforce_admins = true

[branches.main.protection.required_pull_request_reviews]
required_approving_review_count = 2

[[repositories]]
name = "payments-api"

[repositories.branches.main.protection.required_pull_request_reviews]
required_approving_review_count = 1
"#;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create file");
    file.write_all(content.as_bytes())
        .expect("Failed to write file");
    path
}

#[test]
fn test_format_from_path() {
    assert_eq!(
        ConfigFormat::from_path(Path::new("settings.yaml")),
        Ok(ConfigFormat::Yaml)
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("settings.YML")),
        Ok(ConfigFormat::Yaml)
    );
    assert_eq!(
        ConfigFormat::from_path(Path::new("dir/settings.toml")),
        Ok(ConfigFormat::Toml)
    );
    assert!(matches!(
        ConfigFormat::from_path(Path::new("settings.json")),
        Err(ConfigurationError::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        ConfigFormat::from_path(Path::new("settings")),
        Err(ConfigurationError::UnsupportedFormat { .. })
    ));
}

#[test]
fn test_load_yaml_settings() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_file(&dir, "branch-protection-rules.yaml", YAML_SETTINGS);

    let config = load_governance_config(&path).expect("Settings should load");

    assert!(config.branches.contains_key("main"));
    assert_eq!(config.repositories.len(), 1);
    assert_eq!(config.repositories[0].name, "payments-api");
}

#[test]
fn test_load_toml_settings() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_file(&dir, "governance.toml", TOML_SETTINGS);

    let config = load_governance_config(&path).expect("Settings should load");

    let main = config.branches["main"]
        .protection
        .as_ref()
        .expect("main should be protected");
    assert_eq!(main.enforce_admins, Some(true));
    assert_eq!(config.repositories[0].name, "payments-api");
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("missing.yaml");

    let result = load_governance_config(&path);

    assert!(matches!(
        result,
        Err(ConfigurationError::FileNotFound { .. })
    ));
}

#[test]
fn test_load_invalid_yaml() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = write_file(&dir, "broken.yaml", "branches: [unclosed");

    let result = load_governance_config(&path);

    match result {
        Err(ConfigurationError::ParseError { reason }) => {
            assert!(reason.starts_with("Invalid YAML"))
        }
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_misspelled_setting() {
    let content = "branches:\n  main:\n    protection:\n      enforce_admin: true\n";

    let result = parse_governance_config(content, ConfigFormat::Yaml);

    assert!(matches!(result, Err(ConfigurationError::ParseError { .. })));
}

#[test]
fn test_parse_rejects_misspelled_repositories_key() {
    let content = r#"
branches:
  main:
    protection:
      enforce_admins: true
repositorys:
  - name: payments-api
"#;

    let result = parse_governance_config(content, ConfigFormat::Yaml);

    match result {
        Err(ConfigurationError::ParseError { reason }) => assert!(reason.contains("repositorys")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_misspelled_protection_key() {
    let content = "branches:\n  main:\n    protecton:\n      enforce_admins: true\n";

    let result = parse_governance_config(content, ConfigFormat::Yaml);

    match result {
        Err(ConfigurationError::ParseError { reason }) => assert!(reason.contains("protecton")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_parse_rejects_misspelled_override_key() {
    let content = r#"
[[repositories]]
name = "payments-api"

[repositories.branchs.main.protection]
enforce_admins = true
"#;

    let result = parse_governance_config(content, ConfigFormat::Toml);

    match result {
        Err(ConfigurationError::ParseError { reason }) => assert!(reason.contains("branchs")),
        other => panic!("Expected ParseError, got {other:?}"),
    }
}

#[test]
fn test_parse_accepts_branch_without_protection() {
    let content = "branches:\n  main: {}\n";

    let config = parse_governance_config(content, ConfigFormat::Yaml)
        .expect("A branch entry without protection should be accepted");

    assert!(config.branches["main"].protection.is_none());
}

#[test]
fn test_parse_runs_validation() {
    let content = r#"
repositories:
  - name: web
  - name: web
"#;

    let result = parse_governance_config(content, ConfigFormat::Yaml);

    assert_eq!(
        result,
        Err(ConfigurationError::DuplicateRepositoryOverride {
            name: "web".to_string()
        })
    );
}
