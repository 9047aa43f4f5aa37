// tests/config_test.rs
use git_release::cli::Workspace;
use git_release::config::{load_config, Config, CONFIG_FILE_NAME};
use serial_test::serial;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::{NamedTempFile, TempDir};

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
[files]
version_file = "release/VERSION"
manifest = "app/Cargo.toml"
manifest_section = "package"
delegating_manifests = ["cli/Cargo.toml"]

[release]
tag_prefix = "app-v"
commit_message = "release: {version}"

[lockfile]
command = []
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let root = TempDir::new().unwrap();
    let config = load_config(Some(temp_file.path()), root.path()).unwrap();

    assert_eq!(config.files.version_file, PathBuf::from("release/VERSION"));
    assert_eq!(config.files.manifest_section, "package");
    assert_eq!(
        config.files.delegating_manifests,
        vec![PathBuf::from("cli/Cargo.toml")]
    );
    assert_eq!(config.release.tag_prefix, "app-v");
    assert_eq!(config.release.remote, "origin");
    assert!(config.lockfile.command.is_empty());
}

#[test]
fn test_root_config_is_discovered() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join(CONFIG_FILE_NAME),
        "[release]\nremote = \"upstream\"\n",
    )
    .unwrap();

    let config = load_config(None, root.path()).unwrap();
    assert_eq!(config.release.remote, "upstream");
    assert_eq!(config.files, Config::default().files);
}

#[test]
fn test_invalid_toml_is_a_config_error() {
    let root = TempDir::new().unwrap();
    fs::write(root.path().join(CONFIG_FILE_NAME), "[release\n").unwrap();

    let err = load_config(None, root.path()).unwrap_err();
    assert!(err.to_string().contains("Cannot parse"));
}

#[test]
fn test_template_without_version_is_rejected() {
    let root = TempDir::new().unwrap();
    fs::write(
        root.path().join(CONFIG_FILE_NAME),
        "[release]\ncommit_message = \"release\"\n",
    )
    .unwrap();

    assert!(load_config(None, root.path()).is_err());
}

#[test]
fn test_missing_explicit_config_fails() {
    let root = TempDir::new().unwrap();
    let missing = root.path().join("nope.toml");
    assert!(load_config(Some(&missing), root.path()).is_err());
}

#[test]
#[serial]
fn test_workspace_defaults_to_current_directory() {
    let root = TempDir::new().unwrap();
    let previous = env::current_dir().unwrap();
    env::set_current_dir(root.path()).unwrap();

    let result = Workspace::resolve(None, None);
    env::set_current_dir(previous).unwrap();

    let workspace = result.unwrap();
    assert_eq!(
        workspace.root.canonicalize().unwrap(),
        root.path().canonicalize().unwrap()
    );
}

#[test]
#[serial]
fn test_workspace_finds_git_work_tree_from_subdirectory() {
    let root = TempDir::new().unwrap();
    git2::Repository::init(root.path()).unwrap();
    let nested = root.path().join("crates").join("core");
    fs::create_dir_all(&nested).unwrap();

    let previous = env::current_dir().unwrap();
    env::set_current_dir(&nested).unwrap();

    let result = Workspace::resolve(None, None);
    env::set_current_dir(previous).unwrap();

    let workspace = result.unwrap();
    assert_eq!(
        workspace.root.canonicalize().unwrap(),
        root.path().canonicalize().unwrap()
    );
}

#[test]
fn test_delegating_manifests_are_opt_in() {
    use git_release::advisory::Advisory;
    use git_release::project::Project;

    let root = TempDir::new().unwrap();
    fs::write(root.path().join("VERSION"), "0.0.6\n").unwrap();
    fs::write(
        root.path().join("Cargo.toml"),
        "[workspace]\nmembers = [\"cli\"]\n\n[workspace.package]\nversion = \"0.0.6\"\n",
    )
    .unwrap();
    fs::create_dir(root.path().join("cli")).unwrap();
    fs::write(
        root.path().join("cli").join("Cargo.toml"),
        "[package]\nname = \"cli\"\nversion = \"0.0.5\"\n",
    )
    .unwrap();

    let defaults = load_config(None, root.path()).unwrap();
    assert!(defaults.files.delegating_manifests.is_empty());
    let report = Project::open(root.path(), &defaults.files).check(None).unwrap();
    assert!(report.advisories.is_empty());

    fs::write(
        root.path().join(CONFIG_FILE_NAME),
        "[files]\ndelegating_manifests = [\"cli/Cargo.toml\"]\n",
    )
    .unwrap();
    let configured = load_config(None, root.path()).unwrap();
    let report = Project::open(root.path(), &configured.files)
        .check(None)
        .unwrap();

    assert!(report.passed());
    assert!(matches!(
        report.advisories.as_slice(),
        [Advisory::DuplicatedVersion { value, .. }] if value == "0.0.5"
    ));
}
