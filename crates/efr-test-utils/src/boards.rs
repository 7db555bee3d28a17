//! A fake checkout of the motorgo boards repository.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Temporary boards source laid out as
/// `motorgo_experimental/variants/<board>/` and
/// `platformio_tools/board_jsons/<board>.json`.
pub struct BoardSourceFixture {
    temp_dir: TempDir,
}

impl Default for BoardSourceFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSourceFixture {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new()
                .unwrap_or_else(|e| panic!("BoardSourceFixture: temp dir: {e}")),
        }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a complete board: a variant with `pins_arduino.h` plus a nested
    /// file, and a board JSON.
    pub fn with_board(self, board: &str) -> Self {
        self.with_variant(board).with_board_json(board)
    }

    /// Add only the variant directory of `board`.
    pub fn with_variant(self, board: &str) -> Self {
        let dir = self.variant_dir(board);
        write(
            &dir.join("pins_arduino.h"),
            &format!("// pins for {board}\n#define LED_BUILTIN 2\n"),
        );
        write(&dir.join("extra").join("board.cfg"), "flash=4MB\n");
        self
    }

    /// Add only the board JSON of `board`.
    pub fn with_board_json(self, board: &str) -> Self {
        write(
            &self.board_json(board),
            &format!("{{\"name\": \"{board}\", \"build\": {{\"variant\": \"{board}\"}}}}\n"),
        );
        self
    }

    pub fn variant_dir(&self, board: &str) -> PathBuf {
        self.root()
            .join("motorgo_experimental")
            .join("variants")
            .join(board)
    }

    pub fn board_json(&self, board: &str) -> PathBuf {
        self.root()
            .join("platformio_tools")
            .join("board_jsons")
            .join(format!("{board}.json"))
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .unwrap_or_else(|e| panic!("BoardSourceFixture: create {}: {e}", parent.display()));
    }
    fs::write(path, contents)
        .unwrap_or_else(|e| panic!("BoardSourceFixture: write {}: {e}", path.display()));
}
