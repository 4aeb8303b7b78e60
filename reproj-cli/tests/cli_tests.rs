use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const SLN: &str = "\
Microsoft Visual Studio Solution File, Format Version 12.00
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Foo\", \"Foo\\Foo.csproj\", \"{11111111-1111-1111-1111-111111111111}\"
EndProject
Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Util\", \"Util\\Util.csproj\", \"{22222222-2222-2222-2222-222222222222}\"
EndProject
Global
EndGlobal
";

fn solution() -> TempDir {
    let temp = TempDir::new().unwrap();
    temp.child("App.sln").write_str(SLN).unwrap();
    temp.child("Foo/Foo.csproj")
        .write_str("<Project>\n  <PropertyGroup>\n    <RootNamespace>Foo</RootNamespace>\n  </PropertyGroup>\n</Project>\n")
        .unwrap();
    temp.child("Foo/Models/FooService.cs")
        .write_str("namespace Foo.Models\n{\n    public class FooService {}\n}\n")
        .unwrap();
    temp.child("Util/Util.csproj").write_str("<Project />\n").unwrap();
    temp
}

fn reproj(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("reproj").unwrap();
    cmd.current_dir(dir.path()).env_remove("REPROJ_YES");
    cmd
}

#[test]
fn test_help_command() {
    Command::cargo_bin("reproj")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename projects inside a solution"));
}

#[test]
fn test_version_subcommand() {
    Command::cargo_bin("reproj")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("reproj 0.1.0"));
}

#[test]
fn test_version_subcommand_json() {
    Command::cargo_bin("reproj")
        .unwrap()
        .args(["version", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r#"\{"name":"reproj","version":"0\.1\.0"\}"#).unwrap());
}

#[test]
fn test_list_projects() {
    let temp = solution();
    reproj(&temp)
        .args(["list", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foo"))
        .stdout(predicate::str::contains("Util\\Util.csproj"))
        .stdout(predicate::str::contains("2 project(s)"));
}

#[test]
fn test_list_json() {
    let temp = solution();
    let output = reproj(&temp)
        .args(["list", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["projects"][0]["name"], "Foo");
    assert_eq!(parsed["projects"][1]["id"], "{22222222-2222-2222-2222-222222222222}");
}

#[test]
fn test_directory_flag() {
    let temp = solution();
    Command::cargo_bin("reproj")
        .unwrap()
        .arg("-C")
        .arg(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Util"));
}

#[test]
fn test_missing_solution_is_usage_error() {
    let temp = TempDir::new().unwrap();
    reproj(&temp)
        .arg("list")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No .sln file found"));
}

#[test]
fn test_rename_project() {
    let temp = solution();
    reproj(&temp)
        .args(["rename", "Foo", "Bar", "--yes", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed project Foo -> Bar"))
        .stdout(predicate::str::contains("Manifest saved"));

    temp.child("Foo").assert(predicate::path::missing());
    temp.child("Bar/Bar.csproj")
        .assert(predicate::str::contains("<RootNamespace>Bar</RootNamespace>"));
    temp.child("Bar/Models/FooService.cs")
        .assert(predicate::str::starts_with("namespace Bar.Models"));
    temp.child("App.sln")
        .assert(predicate::str::contains("\"Bar\", \"Bar/Bar.csproj\""))
        .assert(predicate::str::contains("\"Util\", \"Util\\Util.csproj\""));
    temp.child(".reproj/rename.log")
        .assert(predicate::str::contains("Rename Foo -> Bar completed"));
    temp.child(".reproj/reproj.lock").assert(predicate::path::missing());
}

#[test]
fn test_rename_conflict_exits_with_failure() {
    let temp = solution();
    temp.child("Bar").create_dir_all().unwrap();

    reproj(&temp)
        .args(["rename", "Foo", "Bar", "--yes"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Rename Foo -> Bar failed"));

    temp.child("Foo/Foo.csproj").assert(predicate::path::exists());
    temp.child("App.sln").assert(SLN);
}

#[test]
fn test_rename_dry_run_changes_nothing() {
    let temp = solution();
    reproj(&temp)
        .args(["rename", "Foo", "Bar", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rename plan: Foo -> Bar"))
        .stdout(predicate::str::contains("Dry run"));

    temp.child("Foo/Foo.csproj").assert(predicate::path::exists());
    temp.child("App.sln").assert(SLN);
}

#[test]
fn test_rename_declined_at_prompt() {
    let temp = solution();
    reproj(&temp)
        .args(["rename", "Foo", "Bar"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Aborted"));

    temp.child("Foo").assert(predicate::path::is_dir());
}

#[test]
fn test_rename_prompts_for_names() {
    let temp = solution();
    reproj(&temp)
        .arg("rename")
        .write_stdin("1\nBar\ny\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("1. Foo"));

    temp.child("Bar").assert(predicate::path::is_dir());
}

#[test]
fn test_rename_unknown_project() {
    let temp = solution();
    reproj(&temp)
        .args(["rename", "Missing", "Bar", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_rename_with_backup() {
    let temp = solution();
    let output = reproj(&temp)
        .args(["rename", "Foo", "Bar", "--yes", "--backup", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["success"], true);
    let backup = std::path::PathBuf::from(parsed["backup"].as_str().unwrap());
    assert!(backup.join("Foo.csproj").is_file());
    assert!(backup.join("Models/FooService.cs").is_file());
}

#[test]
fn test_config_output_default() {
    let temp = solution();
    temp.child(".reproj/config.toml")
        .write_str("[defaults]\noutput = \"json\"\n")
        .unwrap();

    let output = reproj(&temp).arg("list").output().unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["operation"], "list");
}

#[test]
fn test_rename_entry_only_touches_manifest() {
    let temp = solution();
    reproj(&temp)
        .args(["rename-entry", "Util", "Common"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated entry Util -> Common"));

    temp.child("Util").assert(predicate::path::is_dir());
    temp.child("App.sln")
        .assert(predicate::str::contains("\"Common\", \"Common/Common.csproj\""));
}

#[test]
fn test_set_path() {
    let temp = solution();
    reproj(&temp)
        .args(["set-path", "Util\\Util.csproj", "src/Util/Util.csproj"])
        .assert()
        .success();

    temp.child("App.sln")
        .assert(predicate::str::contains("\"Util\", \"src/Util/Util.csproj\""));
}

#[test]
fn test_add_project() {
    let temp = solution();
    reproj(&temp)
        .args([
            "add",
            "Tools",
            "Tools\\Tools.csproj",
            "--id",
            "{33333333-3333-3333-3333-333333333333}",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added project Tools"));

    temp.child("App.sln").assert(predicate::str::contains(
        "Project(\"{FAE04EC0-301F-11D3-BF4B-00C04F79EFBC}\") = \"Tools\", \"Tools/Tools.csproj\", \"{33333333-3333-3333-3333-333333333333}\"\nEndProject\nGlobal",
    ));
}

#[test]
fn test_rename_solution() {
    let temp = solution();
    reproj(&temp)
        .args(["rename-solution", "Product"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Product.sln"));

    temp.child("App.sln").assert(predicate::path::missing());
    temp.child("Product.sln").assert(SLN);
}

#[test]
fn test_rename_solution_conflict() {
    let temp = solution();
    temp.child("Product.sln").write_str("").unwrap();

    reproj(&temp)
        .args(["--solution", "App.sln", "rename-solution", "Product.sln"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already exists"));
}
