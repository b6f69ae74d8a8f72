// ABOUTME: Layout session persistence for tab restoration.
// ABOUTME: Saves the tab list and each tab's split shape to disk.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::PathBuf;

use crate::Direction;

/// Shape of a split tree with surfaces replaced by slot numbers.
///
/// Slots are assigned in leaf order across the whole session; on restore each
/// slot is given a freshly created surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSnapshot {
    Leaf {
        slot: usize,
    },
    Split {
        direction: Direction,
        ratio: f32,
        left: Box<NodeSnapshot>,
        right: Box<NodeSnapshot>,
    },
}

impl NodeSnapshot {
    pub fn leaf_count(&self) -> usize {
        match self {
            NodeSnapshot::Leaf { .. } => 1,
            NodeSnapshot::Split { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }
}

/// One tab and the tabs joined into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabSnapshot {
    pub title: String,
    /// None for an empty tree
    pub tree: Option<NodeSnapshot>,
    /// Slot of the focused surface
    pub focused: Option<usize>,
    /// Slot of the surface the tab tracks its title from
    pub original: Option<usize>,
    #[serde(default)]
    pub children: Vec<TabSnapshot>,
}

/// Complete tab arrangement for a window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSession {
    pub version: u32,
    /// Index into `tabs` of the selected tab
    pub selected: Option<usize>,
    pub tabs: Vec<TabSnapshot>,
}

impl LayoutSession {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            selected: None,
            tabs: Vec::new(),
        }
    }

    /// Get the default session file path (~/.local/state/paneweave/layout.bin)
    pub fn default_path() -> Option<PathBuf> {
        dirs::state_dir()
            .or_else(dirs::data_local_dir)
            .map(|p| p.join("paneweave").join("layout.bin"))
    }

    /// Save session data to disk
    pub fn save(&self, path: &std::path::Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Serialize to JSON then compress with zstd
        let json = serde_json::to_vec(self)?;
        let mut encoder = zstd::Encoder::new(Vec::new(), 3)?;
        encoder.write_all(&json)?;
        let compressed = encoder.finish()?;

        std::fs::write(path, compressed)?;
        Ok(())
    }

    /// Save session to default path
    pub fn save_to_default(&self) -> Result<PathBuf, SessionError> {
        let path = Self::default_path().ok_or(SessionError::NoStatePath)?;
        self.save(&path)?;
        Ok(path)
    }

    /// Load session data from disk
    pub fn load(path: &std::path::Path) -> Result<Self, SessionError> {
        let compressed = std::fs::read(path)?;

        let mut decoder = zstd::Decoder::new(&compressed[..])?;
        let mut json = Vec::new();
        decoder.read_to_end(&mut json)?;

        let session: LayoutSession = serde_json::from_slice(&json)?;

        if session.version > Self::CURRENT_VERSION {
            return Err(SessionError::UnsupportedVersion(session.version));
        }

        Ok(session)
    }

    /// Load session from default path, returns None if not found or invalid
    pub fn load_from_default() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load(&path).ok()
    }

    /// Delete the session file
    pub fn clear_default() -> Result<(), SessionError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}

impl Default for LayoutSession {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not determine state directory")]
    NoStatePath,

    #[error("Unsupported session version: {0}")]
    UnsupportedVersion(u32),
}
