//! Board assets inside a boards repository checkout

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::{Error, Result};

pub const DEFAULT_VARIANTS_PATH: &str = "motorgo_experimental/variants";
pub const DEFAULT_BOARD_JSON_PATH: &str = "platformio_tools/board_jsons";

/// Which board asset is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Variant,
    BoardJson,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Variant => write!(f, "Variant directory"),
            AssetKind::BoardJson => write!(f, "Board JSON file"),
        }
    }
}

/// Both assets of one board, verified to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardAssets {
    pub board: String,
    pub variant_dir: PathBuf,
    pub board_json: PathBuf,
}

impl BoardAssets {
    /// File name the board JSON is installed under.
    pub fn json_file_name(&self) -> String {
        format!("{}.json", self.board)
    }
}

/// A boards repository checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSource {
    pub root: PathBuf,
    pub variants_path: PathBuf,
    pub board_json_path: PathBuf,
}

impl BoardSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            variants_path: PathBuf::from(DEFAULT_VARIANTS_PATH),
            board_json_path: PathBuf::from(DEFAULT_BOARD_JSON_PATH),
        }
    }

    /// Override the repository-relative asset directories.
    pub fn with_paths(mut self, variants: impl Into<PathBuf>, board_jsons: impl Into<PathBuf>) -> Self {
        self.variants_path = variants.into();
        self.board_json_path = board_jsons.into();
        self
    }

    pub fn variant_dir(&self, board: &str) -> PathBuf {
        self.root.join(&self.variants_path).join(board)
    }

    pub fn board_json(&self, board: &str) -> PathBuf {
        self.root
            .join(&self.board_json_path)
            .join(format!("{board}.json"))
    }

    /// Locate both assets of `board`.
    ///
    /// Fails with [`Error::AssetNotFound`] naming the first missing asset,
    /// variant before JSON.
    pub fn resolve(&self, board: &str) -> Result<BoardAssets> {
        efr_fs::validate_identifier("board name", board)?;

        let variant_dir = self.variant_dir(board);
        if !variant_dir.is_dir() {
            return Err(Error::AssetNotFound {
                kind: AssetKind::Variant,
                path: variant_dir,
            });
        }

        let board_json = self.board_json(board);
        if !board_json.is_file() {
            return Err(Error::AssetNotFound {
                kind: AssetKind::BoardJson,
                path: board_json,
            });
        }

        debug!(board, variant = %variant_dir.display(), json = %board_json.display(), "Resolved board assets");
        Ok(BoardAssets {
            board: board.to_string(),
            variant_dir,
            board_json,
        })
    }
}
