use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{CliTest, USER_MODEL, run};

#[test]
fn test_map_lists_foreign_keys_and_pairs() -> Result<()> {
    let test = CliTest::with_post_models()?;

    let out = run(test.map_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(
        out.stdout,
        "posts (Post)  ./models/post.py
  author_id -> users(id)
  editor_id -> users(id)

Entity pairs with several references:
  posts (Post) -> users: author_id, editor_id
"
    );
    Ok(())
}

#[test]
fn test_map_json() -> Result<()> {
    let test = CliTest::with_post_models()?;

    let mut cmd = test.map_command();
    cmd.arg("--json");
    let out = run(cmd)?;

    assert_eq!(out.code, Some(0));
    let parsed: Value = serde_json::from_str(&out.stdout)?;
    assert_eq!(parsed["entities"][0]["entity"], "Post");
    assert_eq!(parsed["entities"][0]["foreignKeys"][1]["field"], "editor_id");
    assert_eq!(parsed["entities"][0]["foreignKeys"][1]["line"], 12);
    assert_eq!(
        parsed["multiReferences"][0]["fields"],
        serde_json::json!(["author_id", "editor_id"])
    );
    Ok(())
}

#[test]
fn test_map_without_foreign_keys() -> Result<()> {
    let test = CliTest::with_file("models/user.py", USER_MODEL)?;

    let out = run(test.map_command())?;

    assert_eq!(out.code, Some(0));
    assert_eq!(out.stdout, "No foreign keys found in 1 model file(s).\n");
    Ok(())
}
