//! Core dialog types
//!
//! Identifiers, result values and the error type shared by the dialog manager,
//! the host seam and the template registry.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Stable identity of a view-model instance.
///
/// Two view-models of the same type carry different ids, so the custom dialog
/// cache keeps one entry per instance rather than per type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewModelId(Uuid);

impl ViewModelId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ViewModelId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ViewModelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a visual produced by a template factory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisualId(Uuid);

impl VisualId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for VisualId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for VisualId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of an OK/Cancel confirmation dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDialogResult {
    /// The user confirmed
    Ok,
    /// The user declined or dismissed the dialog
    Cancel,
}

impl MessageDialogResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

/// Buttons offered by a message dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageDialogStyle {
    /// Single acknowledge button
    Affirmative,
    /// OK and Cancel buttons
    AffirmativeAndNegative,
}

/// Outcome of a file or folder pick.
///
/// A declined pick always leaves `paths` empty, never the data of an
/// earlier successful pick.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionResult {
    confirmed: bool,
    paths: Vec<PathBuf>,
}

impl SelectionResult {
    /// A confirmed selection. Single-select keeps only the first path.
    pub fn confirmed(mut paths: Vec<PathBuf>, allow_multi_select: bool) -> Self {
        if !allow_multi_select {
            paths.truncate(1);
        }
        Self {
            confirmed: true,
            paths,
        }
    }

    pub fn declined() -> Self {
        Self::default()
    }

    /// Build a result from a host answer, `None` meaning the user cancelled
    pub fn from_pick(picked: Option<Vec<PathBuf>>, allow_multi_select: bool) -> Self {
        match picked {
            Some(paths) if !paths.is_empty() => Self::confirmed(paths, allow_multi_select),
            _ => Self::declined(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    /// First selected path, or the empty path when nothing is selected
    pub fn first(&self) -> &Path {
        self.paths
            .first()
            .map(PathBuf::as_path)
            .unwrap_or_else(|| Path::new(""))
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

/// Result type for dialog operations
pub type DialogResult<T> = std::result::Result<T, DialogError>;

/// Dialog-specific error types.
///
/// User declination is never an error; these cover a misconfigured or
/// vanished host only.
#[derive(Debug, thiserror::Error)]
pub enum DialogError {
    #[error("No main window is available to anchor the dialog")]
    NoMainWindow,

    #[error("Dialog host disconnected before answering")]
    HostDisconnected,

    #[error("A progress dialog is already open")]
    ProgressAlreadyActive,

    #[error("Dialog host error: {0}")]
    Host(String),
}
