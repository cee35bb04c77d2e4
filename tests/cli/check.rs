use anyhow::Result;
use pretty_assertions::assert_eq;

use crate::{CliTest, POST_MODEL, USER_MODEL, run};

#[test]
fn test_check_reports_ambiguous_relationships() -> Result<()> {
    let test = CliTest::with_post_models()?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(
        out.stdout.contains(
            "warning: \"Post.author -> User\"  ambiguous-relationship\n  --> ./models/post.py:14:5\n"
        ),
        "stdout:\n{}",
        out.stdout
    );
    assert!(out.stdout.contains("14 |     author: Mapped[\"User\"] = relationship(\"User\")"));
    assert!(out.stdout.contains("= note: candidates on Post: author_id, editor_id"));
    assert!(out.stdout.contains("= hint: add `foreign_keys=[author_id]` (matched by alias-id rule)"));
    assert!(out.stdout.contains("= hint: add `foreign_keys=[editor_id]` (matched by alias-id rule)"));
    assert!(out.stdout.contains("✘ 2 problems (0 errors, 2 warnings)"));
    Ok(())
}

#[test]
fn test_check_reports_unresolvable_relationship() -> Result<()> {
    let test = CliTest::with_file("models/user.py", USER_MODEL)?;
    test.write_file(
        "models/post.py",
        &format!("{}    watcher: Mapped[\"User\"] = relationship(\"User\")\n", POST_MODEL),
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("error: \"Post.watcher -> User\"  unresolvable-relationship"));
    assert!(out.stdout.contains(
        "= note: no naming rule matched `watcher` (candidates: author_id, editor_id); candidates on Post: author_id, editor_id"
    ));
    assert!(out.stdout.contains("✘ 3 problems (1 error, 2 warnings)"));
    Ok(())
}

#[test]
fn test_check_clean_project() -> Result<()> {
    let test = CliTest::with_file("models/user.py", USER_MODEL)?;
    test.write_file(
        "models/post.py",
        &POST_MODEL
            .replace(
                "relationship(\"User\")\n    editor",
                "relationship(\"User\", foreign_keys=[author_id])\n    editor",
            )
            .replace(
                "editor: Mapped[\"User\"] = relationship(\"User\")",
                "editor: Mapped[\"User\"] = relationship(\"User\", foreign_keys=[editor_id])",
            ),
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "✓ Checked 2 model files - no issues found\n");
    Ok(())
}

#[test]
fn test_check_secondary_relationship_is_skipped() -> Result<()> {
    let test = CliTest::with_file("models/user.py", USER_MODEL)?;
    test.write_file(
        "models/post.py",
        &POST_MODEL
            .replace(
                "author: Mapped[\"User\"] = relationship(\"User\")",
                "author: Mapped[\"User\"] = relationship(\"User\", secondary=\"post_authors\")",
            )
            .replace(
                "    editor: Mapped[\"User\"] = relationship(\"User\")\n",
                "",
            ),
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(0));
    Ok(())
}

#[test]
fn test_check_parse_error_exits_with_error() -> Result<()> {
    let test = CliTest::with_post_models()?;
    test.write_file(
        "models/broken.py",
        "class Broken(Base):\n    __tablename__ = \"broken\"\n    owner = relationship(\"User\",\n",
    )?;

    let out = run(test.check_command())?;

    assert_eq!(out.code, Some(2));
    assert!(out.stdout.contains("parse-error"));
    assert!(out.stdout.contains("  --> ./models/broken.py\n"));
    assert!(out.stderr.contains("1 file(s) could not be parsed (use -v for details)"));
    Ok(())
}

#[test]
fn test_check_substring_fallback_flag() -> Result<()> {
    let test = CliTest::with_file("models/user.py", USER_MODEL)?;
    test.write_file(
        "models/invite.py",
        r#"class Invite(Base):
    __tablename__ = "invites"

    id = Column(Integer, primary_key=True)
    primary_contact_id = Column(Integer, ForeignKey("users.id"))
    billing_ref = Column(Integer, ForeignKey("users.id"))

    contact = relationship("User")
"#,
    )?;

    let out = run(test.check_command())?;
    assert!(out.stdout.contains("unresolvable-relationship"));

    let mut cmd = test.check_command();
    cmd.arg("--substring-fallback");
    let out = run(cmd)?;
    assert!(
        out.stdout
            .contains("= hint: add `foreign_keys=[primary_contact_id]` (matched by substring rule)"),
        "stdout:\n{}",
        out.stdout
    );
    Ok(())
}

#[test]
fn test_check_source_root_and_config_includes() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file("service/.ormdoctorrc.json", r#"{ "includes": ["db"] }"#)?;
    test.write_file("service/db/user.py", USER_MODEL)?;
    test.write_file("service/db/post.py", POST_MODEL)?;

    let mut cmd = test.check_command();
    cmd.arg("--source-root").arg("service");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(1));
    assert!(out.stdout.contains("--> service/db/post.py:14:5"));
    Ok(())
}
