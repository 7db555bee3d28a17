//! End-to-end integration test for the board workflow
//!
//! Exercises the complete flow: board source -> version scan -> install ->
//! uninstall, against a fake PlatformIO home.

use std::fs;

use efr_boards::{
    BoardSource, Installer, Note, PlatformIoLayout, Selection, StepStatus, Target,
    VersionSelector,
};
use efr_test_utils::boards::BoardSourceFixture;
use efr_test_utils::platformio::FakePlatformIo;
use efr_test_utils::snapshot_tree;
use pretty_assertions::assert_eq;

const BOARD: &str = "motorgo_plink";

fn installer(pio: &FakePlatformIo) -> Installer {
    Installer::new(PlatformIoLayout::new(pio.home()))
}

/// Picks only the versions it was built with.
struct Pick(&'static [&'static str]);

impl VersionSelector for Pick {
    fn select(&self, _target: Target, available: &[String]) -> efr_boards::Result<Vec<String>> {
        Ok(available
            .iter()
            .filter(|v| self.0.contains(&v.as_str()))
            .cloned()
            .collect())
    }
}

#[test]
fn test_install_into_every_version_then_uninstall() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_framework("2.0.17")
        .with_framework("3.0.7")
        .with_platform("latest")
        .with_platform("6.9.0");
    let source = BoardSourceFixture::new().with_board(BOARD);
    let assets = BoardSource::new(source.root()).resolve(BOARD).unwrap();

    let report = installer(&pio).install(&assets, Selection::All, false).unwrap();
    assert!(!report.has_failures());
    assert_eq!(report.count(&StepStatus::Installed), 5);
    for version in ["latest", "2.0.17", "3.0.7"] {
        assert_eq!(
            snapshot_tree(&pio.variant_dir(version, BOARD)),
            snapshot_tree(&source.variant_dir(BOARD))
        );
    }
    for version in ["latest", "6.9.0"] {
        assert_eq!(
            fs::read(pio.board_json(version, BOARD)).unwrap(),
            fs::read(source.board_json(BOARD)).unwrap()
        );
    }

    let report = installer(&pio).uninstall(BOARD, Selection::All).unwrap();
    assert_eq!(report.count(&StepStatus::Removed), 5);
    assert!(!pio.variant_dir("3.0.7", BOARD).exists());
    assert!(!pio.board_json("6.9.0", BOARD).exists());

    let again = installer(&pio).uninstall(BOARD, Selection::All).unwrap();
    assert_eq!(again.count(&StepStatus::NotPresent), 5);
}

#[test]
fn test_install_without_force_leaves_existing_board_untouched() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_platform("latest");
    let existing = pio.variant_dir("latest", BOARD);
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("pins_arduino.h"), "// hand edited\n").unwrap();
    let before = snapshot_tree(&existing);

    let source = BoardSourceFixture::new().with_board(BOARD);
    let assets = BoardSource::new(source.root()).resolve(BOARD).unwrap();
    let report = installer(&pio).install(&assets, Selection::All, false).unwrap();

    let framework: Vec<_> = report.steps_for(Target::Framework).collect();
    assert_eq!(framework.len(), 1);
    assert_eq!(framework[0].status, StepStatus::Skipped);
    assert_eq!(snapshot_tree(&existing), before);
    // The JSON was not present yet and is still installed
    assert!(pio.board_json("latest", BOARD).is_file());
}

#[test]
fn test_forced_install_replaces_stale_files() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_platform("latest");
    let existing = pio.variant_dir("latest", BOARD);
    fs::create_dir_all(&existing).unwrap();
    fs::write(existing.join("stale.h"), "old").unwrap();

    let source = BoardSourceFixture::new().with_board(BOARD);
    let assets = BoardSource::new(source.root()).resolve(BOARD).unwrap();
    let report = installer(&pio).install(&assets, Selection::All, true).unwrap();

    assert_eq!(report.count(&StepStatus::Replaced), 1);
    assert!(!existing.join("stale.h").exists());
    assert_eq!(snapshot_tree(&existing), snapshot_tree(&source.variant_dir(BOARD)));
}

#[test]
fn test_chosen_versions_only() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_framework("3.0.7")
        .with_platform("latest");
    let source = BoardSourceFixture::new().with_board(BOARD);
    let assets = BoardSource::new(source.root()).resolve(BOARD).unwrap();

    let pick = Pick(&["3.0.7"]);
    let report = installer(&pio)
        .install(&assets, Selection::Choose(&pick), false)
        .unwrap();

    assert!(pio.variant_dir("3.0.7", BOARD).is_dir());
    assert!(!pio.variant_dir("latest", BOARD).exists());
    assert!(!pio.board_json("latest", BOARD).exists());
    assert!(report.notes.contains(&Note::NothingSelected(Target::Platform)));
}

#[test]
fn test_missing_variant_fails_before_copying() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_platform("latest");
    let source = BoardSourceFixture::new().with_board_json(BOARD);
    let before = snapshot_tree(pio.home());

    let result = BoardSource::new(source.root()).resolve(BOARD);
    assert!(matches!(result, Err(efr_boards::Error::AssetNotFound { .. })));
    assert_eq!(snapshot_tree(pio.home()), before);
}

#[test]
fn test_broken_framework_version_does_not_stop_the_rest() {
    let pio = FakePlatformIo::new()
        .with_framework("latest")
        .with_broken_framework("1.0.6")
        .with_platform("latest");
    let source = BoardSourceFixture::new().with_board(BOARD);
    let assets = BoardSource::new(source.root()).resolve(BOARD).unwrap();

    let report = installer(&pio).install(&assets, Selection::All, false).unwrap();

    assert!(report.has_failures());
    assert!(pio.variant_dir("latest", BOARD).is_dir());
    assert!(pio.board_json("latest", BOARD).is_file());
}
