//! End-to-end tests of the `efr` binary
//!
//! Every remote resource points at a local mock server through the config
//! file, and PlatformIO lives in a temporary directory.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use efr_test_utils::boards::BoardSourceFixture;
use efr_test_utils::git::git_repo_with_origin;
use efr_test_utils::platformio::FakePlatformIo;
use predicates::prelude::*;
use tempfile::TempDir;

const BOARD_INDEX: &str =
    r#"{"boards": [{"name": "MotorGo Plink", "identifier": "motorgo_plink"}]}"#;

/// Config directory plus a working directory for one test.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new(config: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("efr").join("config.toml");
        fs::create_dir_all(config_path.parent().unwrap()).unwrap();
        fs::create_dir_all(dir.path().join("work")).unwrap();
        fs::write(&config_path, config).unwrap();
        Self {
            dir,
            config: config_path,
        }
    }

    fn work(&self) -> PathBuf {
        self.dir.path().join("work")
    }

    fn efr(&self) -> Command {
        let mut cmd = Command::cargo_bin("efr").unwrap();
        cmd.arg("--config")
            .arg(&self.config)
            .current_dir(self.work())
            .env("NO_COLOR", "1")
            .env("HOME", self.dir.path())
            .env_remove("EFR_LOG")
            .env_remove("EFR_CONFIG")
            .env_remove("GITHUB_TOKEN")
            .env_remove("PLATFORMIO_CORE_DIR");
        cmd
    }

    fn manifest(&self) -> PathBuf {
        self.config.with_file_name("plugins.toml")
    }
}

fn config(server_url: &str, pio_home: Option<&Path>) -> String {
    let mut config = format!(
        r#"
[github]
org = "efr-test"
api_url = "{server_url}"

[motorgo]
board_index_url = "{server_url}/boards.json"
boards_repo = "{server_url}/boards.git"

[plugins]
registry_url = "{server_url}/registry.json"
"#
    );
    if let Some(home) = pio_home {
        config.push_str(&format!("\n[platformio]\nhome = '{}'\n", home.display()));
    }
    config
}

#[test]
fn test_banner_lists_builtin_plugins() {
    let workspace = Workspace::new("");

    workspace
        .efr()
        .assert()
        .success()
        .stdout(predicate::str::contains("Every Flavor Robotics Command Line Tool"))
        .stdout(predicate::str::contains("Installed plugins:"))
        .stdout(predicate::str::contains("gh"))
        .stdout(predicate::str::contains("motorgo"))
        .stdout(predicate::str::contains("plugins"));
}

#[test]
fn test_banner_survives_unparsable_manifest() {
    let workspace = Workspace::new("");
    fs::write(workspace.manifest(), "[[plugin]\nname = ").unwrap();

    workspace
        .efr()
        .assert()
        .success()
        .stdout(predicate::str::contains("gh"))
        .stdout(predicate::str::contains("motorgo"))
        .stdout(predicate::str::contains("plugins"))
        .stderr(predicate::str::contains("Ignoring plugin manifest"));
}

#[test]
fn test_help_lists_plugins_after_options() {
    let workspace = Workspace::new("");

    workspace
        .efr()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--config"))
        .stdout(predicate::str::contains("Plugins:"))
        .stdout(predicate::str::contains("motorgo"));
}

#[test]
fn test_version_exits_zero() {
    Workspace::new("")
        .efr()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_group_help_lists_children() {
    Workspace::new("")
        .efr()
        .args(["gh", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("toggle-protocol"));
}

#[test]
fn test_unknown_command_is_a_user_error() {
    Workspace::new("")
        .efr()
        .arg("nope")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown command 'nope'"))
        .stderr(predicate::str::contains("motorgo"));
}

#[test]
fn test_invalid_config_is_an_environment_error() {
    Workspace::new("[github\norg = ")
        .efr()
        .arg("gh")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    Workspace::new("[motorgo]\nboard_idx = \"x\"\n")
        .efr()
        .assert()
        .code(2);
}

#[test]
fn test_boards_list_prints_index() {
    let mut server = mockito::Server::new();
    let _index = server
        .mock("GET", "/boards.json")
        .with_status(200)
        .with_body(BOARD_INDEX)
        .create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["motorgo", "boards", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("MotorGo Plink: motorgo_plink"));
}

#[test]
fn test_boards_summary_survives_unreachable_index() {
    let mut server = mockito::Server::new();
    let _index = server.mock("GET", "/boards.json").with_status(500).create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["motorgo", "boards"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Available Boards:"))
        .stdout(predicate::str::contains("Error fetching board list"));
}

#[test]
fn test_board_install_from_local_checkout() {
    let mut server = mockito::Server::new();
    let _index = server
        .mock("GET", "/boards.json")
        .with_status(200)
        .with_body(BOARD_INDEX)
        .create();
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_framework("3.0.7")
        .with_platform("latest");
    let boards = BoardSourceFixture::new().with_board("motorgo_plink");
    let workspace = Workspace::new(&config(&server.url(), Some(pio.home())));

    workspace
        .efr()
        .args(["motorgo", "boards", "install", "--board-name", "motorgo_plink", "--all"])
        .arg("--custom-board-path")
        .arg(boards.root())
        .assert()
        .success()
        .stdout(predicate::str::contains("Installing board 'motorgo_plink'"));

    for version in ["latest", "3.0.7"] {
        assert!(pio.variant_dir(version, "motorgo_plink").join("pins_arduino.h").is_file());
    }
    assert!(pio.board_json("latest", "motorgo_plink").is_file());

    // Second run without --force keeps what is there
    workspace
        .efr()
        .args(["motorgo", "boards", "install", "--board-name", "motorgo_plink", "-a"])
        .arg("--custom-board-path")
        .arg(boards.root())
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists"));

    workspace
        .efr()
        .args(["motorgo", "boards", "uninstall", "--board-name", "motorgo_plink", "-a"])
        .assert()
        .success();
    assert!(!pio.variant_dir("latest", "motorgo_plink").exists());
    assert!(!pio.board_json("latest", "motorgo_plink").exists());
}

#[test]
fn test_board_install_skips_index_check_when_offline_with_local_checkout() {
    let mut server = mockito::Server::new();
    let _index = server.mock("GET", "/boards.json").with_status(503).create();
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_platform("latest");
    let boards = BoardSourceFixture::new().with_board("motorgo_dev");
    let workspace = Workspace::new(&config(&server.url(), Some(pio.home())));

    workspace
        .efr()
        .args(["motorgo", "boards", "install", "--board-name", "motorgo_dev", "-a"])
        .arg("--custom-board-path")
        .arg(boards.root())
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping the board check"));

    assert!(pio.variant_dir("latest", "motorgo_dev").is_dir());
}

#[test]
fn test_board_install_rejects_unknown_board() {
    let mut server = mockito::Server::new();
    let _index = server
        .mock("GET", "/boards.json")
        .with_status(200)
        .with_body(BOARD_INDEX)
        .create();
    let pio = FakePlatformIo::new().with_framework("latest").with_platform("latest");
    let boards = BoardSourceFixture::new().with_board("motorgo_plink");
    let workspace = Workspace::new(&config(&server.url(), Some(pio.home())));

    workspace
        .efr()
        .args(["motorgo", "boards", "install", "--board-name", "no_such_board", "-a"])
        .arg("--custom-board-path")
        .arg(boards.root())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("efr motorgo boards list"));
}

#[test]
fn test_board_install_missing_assets_is_an_environment_error() {
    let mut server = mockito::Server::new();
    let _index = server
        .mock("GET", "/boards.json")
        .with_status(200)
        .with_body(BOARD_INDEX)
        .create();
    let pio = FakePlatformIo::new().with_framework("latest").with_platform("latest");
    let boards = BoardSourceFixture::new().with_board_json("motorgo_plink");
    let workspace = Workspace::new(&config(&server.url(), Some(pio.home())));

    workspace
        .efr()
        .args(["motorgo", "boards", "install", "--board-name", "motorgo_plink", "-a"])
        .arg("--custom-board-path")
        .arg(boards.root())
        .assert()
        .code(2);

    assert!(!pio.variant_dir("latest", "motorgo_plink").exists());
    assert!(!pio.board_json("latest", "motorgo_plink").exists());
}

#[test]
fn test_plugins_list_marks_installed_plugins() {
    let mut server = mockito::Server::new();
    let _registry = server
        .mock("GET", "/registry.json")
        .with_status(200)
        .with_body(
            r#"{
                "gh": {"description": "GitHub helpers", "install_url": "https://example.com/gh/install.sh"},
                "blink": {"description": "Blink an LED", "install_url": "https://example.com/blink/install.sh"}
            }"#,
        )
        .create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["plugins", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("blink"))
        .stdout(predicate::str::contains("Blink an LED"))
        .stdout(predicate::str::contains("yes"))
        .stdout(predicate::str::contains("no"));
}

#[test]
fn test_plugins_list_network_failure() {
    let mut server = mockito::Server::new();
    let _registry = server.mock("GET", "/registry.json").with_status(500).create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["plugins", "list"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error fetching registry"));
}

#[test]
fn test_plugins_install_refuses_unknown_and_installed_plugins() {
    let mut server = mockito::Server::new();
    let _registry = server
        .mock("GET", "/registry.json")
        .with_status(200)
        .with_body(
            r#"{"motorgo": {"description": "MotorGo tools", "install_url": "https://example.com/motorgo/install.sh"}}"#,
        )
        .create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["plugins", "install", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("available: motorgo"));

    workspace
        .efr()
        .args(["plugins", "install", "motorgo"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--upgrade"));
}

#[test]
fn test_plugins_init_outside_repository_skips_install_scripts() {
    let workspace = Workspace::new("");

    workspace
        .efr()
        .args(["plugins", "init", "blink", "--description", "Blink an LED"])
        .assert()
        .success()
        .stderr(predicate::str::contains("install scripts were not generated"));

    let project = workspace.work().join("efr-blink");
    assert!(project.join("Cargo.toml").is_file());
    assert!(project.join("src").join("main.rs").is_file());
    assert!(!project.join("install.sh").exists());

    // A second init refuses to touch the existing project
    workspace
        .efr()
        .args(["plugins", "init", "blink", "--description", "Again"])
        .assert()
        .code(1);
}

#[test]
fn test_plugins_init_and_registry_info_inside_repository() {
    let workspace = Workspace::new("");
    let repo = workspace.work().join("tools");
    fs::create_dir_all(repo.join("plugins")).unwrap();
    git_repo_with_origin(&repo, "git@github.com:org/tools.git");

    workspace
        .efr()
        .args(["plugins", "init", "blink", "--description", "Blink an LED", "--path"])
        .arg(repo.join("plugins"))
        .assert()
        .success();
    assert!(repo.join("plugins/efr-blink/install.sh").is_file());
    assert!(repo.join("plugins/efr-blink/install.ps1").is_file());

    workspace
        .efr()
        .args(["plugins", "get-registry-info", "--path"])
        .arg(repo.join("plugins/efr-blink"))
        .assert()
        .success()
        .stdout(predicate::str::contains("\"blink\""))
        .stdout(predicate::str::contains("\"description\": \"Blink an LED\""))
        .stdout(predicate::str::contains(
            "https://raw.githubusercontent.com/org/tools/refs/heads/main/plugins/efr-blink/install.sh",
        ));
}

#[test]
fn test_registry_info_outside_plugin_project() {
    let workspace = Workspace::new("");

    workspace
        .efr()
        .args(["plugins", "get-registry-info"])
        .assert()
        .code(1);
}

#[test]
fn test_gh_list_filters_repositories() {
    let mut server = mockito::Server::new();
    let _repos = server
        .mock("GET", "/orgs/efr-test/repos")
        .with_status(200)
        .with_body(
            r#"[{"name": "motorgo-firmware", "description": "Firmware"}, {"name": "website", "description": null}]"#,
        )
        .create();
    let workspace = Workspace::new(&config(&server.url(), None));

    workspace
        .efr()
        .args(["gh", "list", "motorgo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("motorgo-firmware"))
        .stdout(predicate::str::contains("website").not());
}

fn init_config(server_url: &str) -> String {
    format!(
        "[github]\norg = \"efr-test\"\nlicense_url = \"{server_url}/licenses\"\ngitignore_url = \"{server_url}/gitignore\"\n"
    )
}

fn gh_init(workspace: &Workspace) -> Command {
    let mut cmd = workspace.efr();
    cmd.args([
        "gh",
        "init",
        "--name",
        "widget",
        "--description",
        "A widget",
        "--emoji",
        "🤖",
        "--project-type",
        "software",
        "--gitignore",
        "python",
    ]);
    cmd
}

#[test]
fn test_gh_init_skips_existing_files_without_force() {
    let mut server = mockito::Server::new();
    let _license = server
        .mock("GET", "/licenses/software_license.md")
        .with_body("MIT License")
        .create();
    let _gitignore = server
        .mock("GET", "/gitignore/python")
        .with_body("__pycache__/\n")
        .create();
    let workspace = Workspace::new(&init_config(&server.url()));
    git_repo_with_origin(&workspace.work(), "git@github.com:efr-test/widget.git");
    for name in ["README.md", "LICENSE", ".gitignore"] {
        fs::write(workspace.work().join(name), "keep me").unwrap();
    }

    gh_init(&workspace)
        .assert()
        .success()
        .stderr(predicate::str::contains("already exists, skipping"));

    for name in ["README.md", "LICENSE", ".gitignore"] {
        assert_eq!(
            fs::read_to_string(workspace.work().join(name)).unwrap(),
            "keep me"
        );
    }
}

#[test]
fn test_gh_init_force_overwrites_existing_files() {
    let mut server = mockito::Server::new();
    let _license = server
        .mock("GET", "/licenses/software_license.md")
        .with_body("MIT License")
        .create();
    let _gitignore = server
        .mock("GET", "/gitignore/python")
        .with_body("__pycache__/\n")
        .create();
    let workspace = Workspace::new(&init_config(&server.url()));
    git_repo_with_origin(&workspace.work(), "git@github.com:efr-test/widget.git");
    for name in ["README.md", "LICENSE", ".gitignore"] {
        fs::write(workspace.work().join(name), "stale").unwrap();
    }

    gh_init(&workspace).arg("--force").assert().success();

    let readme = fs::read_to_string(workspace.work().join("README.md")).unwrap();
    assert!(readme.contains("widget"));
    assert!(readme.contains("A widget"));
    assert_eq!(
        fs::read_to_string(workspace.work().join("LICENSE")).unwrap(),
        "MIT License"
    );
    assert_eq!(
        fs::read_to_string(workspace.work().join(".gitignore")).unwrap(),
        "__pycache__/\n"
    );
}

#[test]
fn test_gh_init_failed_license_fetch_writes_nothing() {
    let mut server = mockito::Server::new();
    let _license = server
        .mock("GET", "/licenses/software_license.md")
        .with_status(500)
        .create();
    let _gitignore = server
        .mock("GET", "/gitignore/python")
        .with_body("__pycache__/\n")
        .create();
    let workspace = Workspace::new(&init_config(&server.url()));
    git_repo_with_origin(&workspace.work(), "git@github.com:efr-test/widget.git");

    gh_init(&workspace).assert().code(2);

    for name in ["README.md", "LICENSE", ".gitignore"] {
        assert!(!workspace.work().join(name).exists(), "{name} was written");
    }
}

#[test]
fn test_gh_clone_ssh_uses_ssh_url() {
    let workspace = Workspace::new("[github]\norg = \"efr-test\"\n");

    // A failing ssh transport stops the clone before any network access
    workspace
        .efr()
        .args(["gh", "clone", "widget", "--ssh"])
        .env("GIT_SSH_COMMAND", "false")
        .env("GIT_TERMINAL_PROMPT", "0")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Cloning repository 'efr-test/widget'"))
        .stderr(predicate::str::contains(
            "git clone git@github.com:efr-test/widget.git",
        ));
    assert!(!workspace.work().join("widget").exists());
}

#[cfg(unix)]
mod external {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, body).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn test_manifest_plugin_runs_with_remaining_args() {
        let workspace = Workspace::new("");
        let script = workspace.dir.path().join("efr-hello");
        write_script(&script, "#!/bin/sh\necho \"hello $*\"\n");
        fs::write(
            workspace.manifest(),
            format!(
                "[[plugin]]\nname = \"hello\"\ncommand = '{}'\n\n[[plugin]]\nname = \"broken\"\ncommand = '/nonexistent/efr-broken'\n",
                script.display()
            ),
        )
        .unwrap();

        workspace
            .efr()
            .args(["hello", "world", "--loud"])
            .assert()
            .success()
            .stdout(predicate::str::contains("hello world --loud"));

        workspace
            .efr()
            .assert()
            .success()
            .stdout(predicate::str::contains("hello"))
            .stdout(predicate::str::contains("Plugins that failed to load:"))
            .stdout(predicate::str::contains("broken"));
    }

    #[test]
    fn test_failing_external_plugin_exits_2() {
        let workspace = Workspace::new("");
        let script = workspace.dir.path().join("efr-fail");
        write_script(&script, "#!/bin/sh\nexit 3\n");
        fs::write(
            workspace.manifest(),
            format!("[[plugin]]\nname = \"fail\"\ncommand = '{}'\n", script.display()),
        )
        .unwrap();

        workspace
            .efr()
            .arg("fail")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("exited with"));
    }

    #[test]
    fn test_uninstall_drops_manifest_entry() {
        let workspace = Workspace::new("[plugins]\npackage_manager = \"true\"\n");
        let script = workspace.dir.path().join("efr-hello");
        write_script(&script, "#!/bin/sh\necho hello\n");
        fs::write(
            workspace.manifest(),
            format!("[[plugin]]\nname = \"hello\"\ncommand = '{}'\n", script.display()),
        )
        .unwrap();

        workspace
            .efr()
            .args(["plugins", "uninstall", "hello"])
            .assert()
            .success();

        let manifest = fs::read_to_string(workspace.manifest()).unwrap();
        assert!(!manifest.contains("hello"));
    }

    #[test]
    fn test_uninstall_tolerates_unparsable_manifest() {
        let workspace = Workspace::new("[plugins]\npackage_manager = \"true\"\n");
        fs::write(workspace.manifest(), "[[plugin]\nname = ").unwrap();

        workspace
            .efr()
            .args(["plugins", "uninstall", "hello"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Uninstalled plugin 'hello'"))
            .stderr(predicate::str::contains("ignoring plugin manifest"));
    }
}
