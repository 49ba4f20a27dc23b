use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn compiles_story_into_directory() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("cave.tw")).arg("--out").arg(out.path());
    cmd.assert().success();

    let list = fs::read_to_string(out.path().join("Script.list.txt")).unwrap();
    assert_eq!(list, "Start.twsam\nCave.twsam\nOutside.twsam\n");
    assert_eq!(
        fs::read_to_string(out.path().join("Images.txt")).unwrap(),
        "cave\n"
    );
    assert_eq!(
        fs::read_to_string(out.path().join("Music.list.txt")).unwrap(),
        "outside.epsgmod\n"
    );

    let start = fs::read_to_string(out.path().join("Start.twsam")).unwrap();
    assert!(start.starts_with("\"You wake up in a cave.\"\n1 C.\n!\n0i\n"));
    assert!(start.ends_with("A:B:=[1j]B:1+B.\nA:B:=[2j]B:1+B.\n"));

    let outside = fs::read_to_string(out.path().join("Outside.twsam")).unwrap();
    assert!(outside.ends_with("C:\"\\#\"\n!\n1[1]\n"));
}

#[test]
fn missing_start_exits_with_two() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("no_start.tw")).arg("--out").arg(out.path());
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("\"Start\" passage not found"));
    assert!(!out.path().join("Script.list.txt").exists());
}

#[test]
fn unresolved_link_writes_nothing() {
    let out = tempfile::tempdir().unwrap();
    let dest = out.path().join("build");
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("broken_link.tw")).arg("--out").arg(&dest);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("Nowhere"));
    assert!(!dest.exists());
}

#[test]
fn unreadable_source_exits_with_one() {
    let out = tempfile::tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("does_not_exist.tw"))
        .arg("--out")
        .arg(out.path());
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn config_file_changes_naming() {
    let out = tempfile::tempdir().unwrap();
    let config = out.path().join("twsam.toml");
    fs::write(&config, "[output]\nscript_extension = \"sam\"\n").unwrap();

    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("cave.tw"))
        .arg("--out")
        .arg(out.path())
        .arg("--config")
        .arg(&config);
    cmd.assert().success();

    assert!(out.path().join("Start.sam").exists());
    assert_eq!(
        fs::read_to_string(out.path().join("Script.list.txt")).unwrap(),
        "Start.sam\nCave.sam\nOutside.sam\n"
    );
}

#[test]
fn invalid_config_exits_with_one() {
    let out = tempfile::tempdir().unwrap();
    let config = out.path().join("twsam.toml");
    fs::write(&config, "[compiler]\nfirst_register = 0\n").unwrap();

    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("cave.tw"))
        .arg("--out")
        .arg(out.path())
        .arg("--config")
        .arg(&config);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("first_register"));
}

#[test]
fn dump_tokens_prints_json() {
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("cave.tw")).arg("--dump").arg("tokens");

    let output_pred = predicate::str::contains("\"title\": \"Start\"")
        .and(predicate::str::contains("\"kind\": \"list\""));
    cmd.assert().success().stdout(output_pred);
}

#[test]
fn dump_commands_prints_json() {
    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(fixture_path("cave.tw")).arg("--dump").arg("commands");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"set\""));
}

#[test]
fn diagnostics_go_to_stderr() {
    let out = tempfile::tempdir().unwrap();
    let story = out.path().join("story.tw");
    fs::write(&story, ":: Start\n<<call Nowhere>>\n").unwrap();

    let mut cmd = cargo_bin_cmd!("twsam");
    cmd.arg(&story).arg("--out").arg(out.path().join("build"));
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Warning on Start"));
}
