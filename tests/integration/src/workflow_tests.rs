//! Workflow tests across crates
//!
//! Each module covers one user-facing workflow end to end at the library
//! level: plugin composition, the plugin registry, and plugin scaffolding.

use std::fs;
use std::path::Path;

use efr_plugin::{
    CommandGroup, CommandLeaf, CommandNode, Discovery, Dispatch, ExtensionPoint, Invocation,
    LoadError, PluginEntry, RunError, compose, load,
};
use efr_registry::{InstalledPackages, Registry, RegistryEntry};
use efr_test_utils::git::git_repo_with_origin;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Error type of the test command tree.
#[derive(Debug)]
struct TestError(String);

impl From<RunError> for TestError {
    fn from(e: RunError) -> Self {
        TestError(e.to_string())
    }
}

/// Records which handlers ran, with their arguments.
#[derive(Default)]
struct Calls(Vec<String>);

type Node = CommandNode<Calls, TestError>;
type Root = CommandGroup<Calls, TestError>;

fn record(calls: &mut Calls, invocation: &Invocation) -> Result<(), TestError> {
    calls.0.push(format!(
        "{} {}",
        invocation.display_path(),
        invocation.args.join(" ")
    ));
    Ok(())
}

fn alpha() -> Result<Node, LoadError> {
    Ok(CommandGroup::new("alpha", "Alpha tools")
        .with_child(CommandLeaf::new("run", "Run alpha", record))
        .into())
}

fn beta() -> Result<Node, LoadError> {
    Ok(CommandLeaf::new("beta", "Beta tool", record).into())
}

fn broken() -> Result<Node, LoadError> {
    panic!("constructor blew up")
}

fn discover(manifest: Option<&Path>) -> Vec<PluginEntry<Calls, TestError>> {
    let mut discovery = Discovery::new(ExtensionPoint::default())
        .with_builtin(PluginEntry::builtin("alpha", "efr-alpha", alpha))
        .with_builtin(PluginEntry::builtin("broken", "efr-broken", broken))
        .with_builtin(PluginEntry::builtin("beta", "efr-beta", beta));
    if let Some(manifest) = manifest {
        discovery = discovery.with_manifest(manifest);
    }
    discovery.discover().unwrap()
}

mod composition {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failing_plugin_does_not_block_the_others() {
        let entries = discover(None);
        let mut root = Root::new("efr", "test");
        let report = compose(&mut root, entries.iter().map(load));

        assert_eq!(root.child_names(), vec!["alpha", "beta"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "broken");

        let mut calls = Calls::default();
        let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        root.dispatch(&mut calls, &args(&["alpha", "run", "--fast"]))
            .unwrap();
        root.dispatch(&mut calls, &args(&["beta", "x"])).unwrap();
        assert_eq!(calls.0, vec!["efr alpha run --fast", "efr beta x"]);
    }

    #[test]
    fn test_bare_group_without_fallback_prints_help() {
        let entries = discover(None);
        let mut root = Root::new("efr", "test");
        compose(&mut root, entries.iter().map(load));

        let mut calls = Calls::default();
        let outcome = root.dispatch(&mut calls, &["alpha".to_string()]).unwrap();
        let Dispatch::Help(text) = outcome else {
            panic!("expected help output");
        };
        assert!(text.contains("run"));
        assert!(calls.0.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_manifest_plugin_overrides_builtin() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let script = temp.path().join("efr-beta");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        let manifest = temp.path().join("plugins.toml");
        fs::write(
            &manifest,
            format!(
                "[[plugin]]\nname = \"beta\"\ncommand = '{}'\npackage = \"beta-ng\"\n",
                script.display()
            ),
        )
        .unwrap();

        let entries = discover(Some(&manifest));
        let mut root = Root::new("efr", "test");
        let report = compose(&mut root, entries.iter().map(load));

        assert_eq!(report.overridden.len(), 1);
        assert_eq!(report.overridden[0].name, "beta");
        assert_eq!(report.overridden[0].replaced.as_deref(), Some("efr-beta"));
        assert_eq!(report.overridden[0].package, "beta-ng");

        let mut calls = Calls::default();
        root.dispatch(&mut calls, &["beta".to_string()]).unwrap();
        // The external script ran instead of the built-in handler
        assert!(calls.0.is_empty());
    }
}

mod registry {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(description: &str) -> RegistryEntry {
        RegistryEntry {
            description: description.to_string(),
            install_url: format!("https://example.com/{description}/install.sh"),
        }
    }

    #[test]
    fn test_installed_state_follows_discovered_packages() {
        let entries = discover(None);
        let packages: Vec<String> = entries.iter().map(|e| e.package.clone()).collect();
        let registry = Registry::from_entries([
            ("alpha".to_string(), entry("alpha")),
            ("gamma".to_string(), entry("gamma")),
        ]);

        let statuses = InstalledPackages::new("efr-", &packages).classify(&registry);
        let installed: Vec<(&str, bool)> = statuses
            .iter()
            .map(|s| (s.name.as_str(), s.installed))
            .collect();
        assert_eq!(installed, vec![("alpha", true), ("gamma", false)]);
    }
}

mod scaffolding {
    use super::*;
    use pretty_assertions::assert_eq;
    use efr_scaffold::{InstallScripts, TemplateSet, create_plugin_project, registry_info};

    #[test]
    fn test_scaffolded_plugin_round_trips_through_the_registry() {
        let temp = TempDir::new().unwrap();
        let repo = temp.path().join("tools");
        fs::create_dir_all(repo.join("plugins")).unwrap();
        git_repo_with_origin(&repo, "https://github.com/org/tools.git");

        let templates = TemplateSet::embedded().unwrap();
        let scaffold =
            create_plugin_project(&templates, &repo.join("plugins"), "blink", "Blink \"an\" LED")
                .unwrap();
        assert_eq!(scaffold.install_scripts, InstallScripts::Written);

        let install_sh = fs::read_to_string(scaffold.dir.join("install.sh")).unwrap();
        assert!(install_sh.contains("https://github.com/org/tools.git"));
        assert!(install_sh.contains("plugins/efr-blink"));

        let info = registry_info(&scaffold.dir).unwrap();
        assert_eq!(info.name, "blink");
        assert_eq!(info.entry.description, "Blink \"an\" LED");

        // Serve the printed entry as a registry and read it back
        let mut server = mockito::Server::new();
        let _mock = server
            .mock("GET", "/registry.json")
            .with_status(200)
            .with_body(info.to_json().unwrap())
            .create();
        let client = efr_http::HttpClient::new("test").unwrap();
        let registry = Registry::fetch(&client, &format!("{}/registry.json", server.url())).unwrap();

        assert_eq!(registry.get("blink").unwrap(), &info.entry);
        assert_eq!(
            info.entry.install_url,
            "https://raw.githubusercontent.com/org/tools/refs/heads/main/plugins/efr-blink/install.sh"
        );
    }

    #[test]
    fn test_protocol_toggle_round_trip_keeps_raw_urls_stable() {
        let temp = TempDir::new().unwrap();
        git_repo_with_origin(temp.path(), "git@github.com:org/tools.git");

        let first = efr_git::toggle_origin_protocol(temp.path()).unwrap();
        assert_eq!(first.new_url, "https://github.com/org/tools.git");
        let second = efr_git::toggle_origin_protocol(temp.path()).unwrap();
        assert_eq!(second.new_url, "git@github.com:org/tools.git");

        let details = efr_git::git_details(temp.path()).unwrap();
        assert_eq!(
            details.https_remote_url().unwrap(),
            "https://github.com/org/tools.git"
        );
    }
}
