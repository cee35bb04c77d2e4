use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, run};

#[test]
fn test_resolve_alias_id() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.resolve_command();
    cmd.args(["author", "--candidates", "author_id,editor_id"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ author -> author_id  (alias-id rule)\n");
    Ok(())
}

#[test]
fn test_resolve_through_inverse() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.resolve_command();
    cmd.args([
        "referrals_made",
        "--candidates",
        "referrer_id,referred_user_id",
        "--inverse",
        "referrer",
    ]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ referrals_made -> referrer_id  (inverse-alias rule)\n");
    Ok(())
}

#[test]
fn test_resolve_unresolvable() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.resolve_command();
    cmd.args(["unknown_role", "--candidates", "col_a,col_b"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert!(
        out.stdout
            .starts_with("✘ no naming rule matched `unknown_role` (candidates: col_a, col_b)\n")
    );
    assert!(out.stdout.contains("map `unknown_role` in `roles` of .ormdoctorrc.json"));
    Ok(())
}

#[test]
fn test_resolve_uses_configured_roles() -> Result<()> {
    let test = CliTest::with_file(
        ".ormdoctorrc.json",
        r#"{ "roles": [{ "role": "buyer", "stem": "customer" }] }"#,
    )?;

    let mut cmd = test.resolve_command();
    cmd.args(["buyer", "--candidates", "customer_id,seller_id"]);
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ buyer -> customer_id  (role-stem rule)\n");
    Ok(())
}

#[test]
fn test_resolve_substring_is_opt_in() -> Result<()> {
    let test = CliTest::new()?;

    let mut cmd = test.resolve_command();
    cmd.args(["contact", "--candidates", "primary_contact_id,billing_ref"]);
    assert_eq!(run(cmd)?.code, Some(1));

    let mut cmd = test.resolve_command();
    cmd.args([
        "contact",
        "--candidates",
        "primary_contact_id,billing_ref",
        "--substring-fallback",
    ]);
    let out = run(cmd)?;
    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ contact -> primary_contact_id  (substring rule)\n");
    Ok(())
}
