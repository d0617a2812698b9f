//! Integration tests for the trellis binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CONFIG: &str = r#"
theme:
  stylesheet_dir: theme
site:
  show_on_front: page
  page_on_front: 5
enhancement:
  rules:
    - tag: html
      set_attribute:
        lang: es
styles:
  - handle: footer
    src: /footer.css
    late: true
"#;

const TEMPLATE: &str = "<html lang=\"en\"><head><!-- trellis:head --></head><body><h1>Hi</h1><!-- trellis:footer --></body></html>";

fn setup_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let trellis_dir = temp.path().join(".trellis");
    fs::create_dir_all(&trellis_dir).unwrap();
    fs::write(trellis_dir.join("config.yml"), CONFIG).unwrap();

    let theme = temp.path().join("theme");
    fs::create_dir_all(&theme).unwrap();
    fs::write(theme.join("front-page.php"), TEMPLATE).unwrap();
    fs::write(theme.join("index.php"), TEMPLATE).unwrap();

    fs::write(
        temp.path().join("front.yml"),
        "queried:\n  type: singular\n  id: 5\n  slug: welcome\n  post_type: page\n",
    )
    .unwrap();
    fs::write(
        temp.path().join("missing.yml"),
        "queried:\n  type: term\n  id: 3\n  slug: news\n  taxonomy: category\n",
    )
    .unwrap();
    temp
}

fn trellis(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("trellis"));
    cmd.current_dir(temp.path()).env("NO_COLOR", "1");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("trellis"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("hierarchy"))
        .stdout(predicate::str::contains("render"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("trellis"));
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::new(cargo_bin("trellis"));
    cmd.assert().failure();
    Ok(())
}

#[test]
fn hierarchy_uses_site_options() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    trellis(&temp)
        .args(["hierarchy", "front.yml", "--merged"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "front-page.php\npage-welcome.php\npage-5.php\npage.php\nsingular.php\n",
        ));
    Ok(())
}

#[test]
fn hierarchy_json() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    let output = trellis(&temp)
        .args(["hierarchy", "missing.yml", "--json"])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["kind"], "category");
    assert_eq!(value[0]["checkpoint"], "category_template_hierarchy");
    assert_eq!(value[1]["kind"], "archive");
    Ok(())
}

#[test]
fn locate_prints_template_path() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    trellis(&temp)
        .args(["locate", "front.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("front-page.php"));
    Ok(())
}

#[test]
fn locate_falls_back_to_index() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    trellis(&temp)
        .args(["locate", "missing.yml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("index.php"));
    Ok(())
}

#[test]
fn locate_fails_without_templates() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    let empty = TempDir::new()?;
    trellis(&temp)
        .args(["locate", "missing.yml", "--theme"])
        .arg(empty.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No template found"));
    Ok(())
}

#[test]
fn render_applies_rules_and_hoists() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    let output = trellis(&temp).args(["render", "front.yml"]).output()?;
    assert!(output.status.success());

    let html = String::from_utf8(output.stdout)?;
    assert!(html.starts_with("<html lang=\"es\">"));
    let (head, body) = html.split_once("</head>").unwrap();
    assert!(head.contains("id='footer-css'"));
    assert!(!body.contains("footer-css"));
    Ok(())
}

#[test]
fn render_to_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    trellis(&temp)
        .args(["render", "front.yml", "-o", "out.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rendered front-page.php"));

    let html = fs::read_to_string(temp.path().join("out.html"))?;
    assert!(html.contains("<h1>Hi</h1>"));
    Ok(())
}

#[test]
fn render_quiet_to_file_prints_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    trellis(&temp)
        .args(["--quiet", "render", "front.yml", "-o", "out.html"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    Ok(())
}

#[test]
fn explicit_config_file() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    fs::write(
        temp.path().join("alt.yml"),
        "theme:\n  stylesheet_dir: theme\nenhancement:\n  buffer: block\n",
    )?;

    let output = trellis(&temp)
        .args(["render", "missing.yml", "--json", "--config", "alt.yml"])
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value["buffered"], false);
    assert_eq!(value["selection"]["name"], "index.php");
    Ok(())
}

#[test]
fn invalid_context_reports_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    fs::write(temp.path().join("bad.yml"), "queried:\n  type: nonsense\n")?;
    trellis(&temp)
        .args(["hierarchy", "bad.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse query context"));
    Ok(())
}

#[test]
fn invalid_config_reports_error() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    fs::write(
        temp.path().join(".trellis/config.yml"),
        "enhancement:\n  buffer: sometimes\n",
    )?;
    trellis(&temp)
        .args(["locate", "front.yml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
    Ok(())
}

#[test]
fn project_flag_sets_root() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project();
    let elsewhere = TempDir::new()?;
    let mut cmd = Command::new(cargo_bin("trellis"));
    cmd.current_dir(elsewhere.path())
        .arg("--project")
        .arg(temp.path())
        .arg("locate")
        .arg(temp.path().join("front.yml"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("front-page.php"));
    Ok(())
}
