//! MotorGo board definitions for PlatformIO
//!
//! A board ships as two assets in the boards repository: a variant
//! directory and a board JSON. Installing copies the variant into every
//! selected version of the Arduino-ESP32 framework package and the JSON into
//! every selected version of the espressif32 platform.

pub mod error;
pub mod index;
pub mod install;
pub mod layout;
pub mod scan;
pub mod source;

pub use error::{Error, Result};
pub use index::{BoardIndex, BoardIndexEntry};
pub use install::{
    InstallReport, Installer, Note, Selection, Step, StepStatus, Target, VersionSelector,
};
pub use layout::PlatformIoLayout;
pub use scan::{LATEST, ToolchainVersions, compare_labels};
pub use source::{AssetKind, BoardAssets, BoardSource};
