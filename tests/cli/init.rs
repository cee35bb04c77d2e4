use anyhow::{Context, Result};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, run};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(
        parsed["includes"],
        serde_json::json!(["models", "backend/models", "app/models"])
    );
    assert_eq!(parsed["roles"], serde_json::json!([]));
    assert_eq!(parsed["defaultRoles"], Value::Bool(true));
    assert_eq!(parsed["substringFallback"], Value::Bool(false));
    assert_eq!(parsed["ignoreTestFiles"], Value::Bool(true));

    assert!(
        content.contains("\n  \""),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Created .ormdoctorrc.json\n");
    assert!(test.root().join(".ormdoctorrc.json").exists());

    let content = test.read_file(".ormdoctorrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_refuses_to_overwrite() -> Result<()> {
    let test = CliTest::with_file(".ormdoctorrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert_eq!(out.stderr, "Error: .ormdoctorrc.json already exists\n");
    assert_eq!(test.read_file(".ormdoctorrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_invalid_config_is_an_error() -> Result<()> {
    let test = CliTest::with_file(
        ".ormdoctorrc.json",
        r#"{ "roles": [{ "role": "buyer", "stem": "" }] }"#,
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stderr.contains("Invalid entry in 'roles'"), "stderr:\n{}", out.stderr);

    Ok(())
}
