//! Error types for the build tally plugin.

use std::io::Error as IoError;
use std::path::PathBuf;
use tally_events::{EventError, PlayerId};
use thiserror::Error;

/// Configuration loading errors.
///
/// A missing config file is not among these: absent files fall back to the
/// documented defaults. Only a file that exists but cannot be read or
/// parsed is an error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .0.display(), .1)]
    Read(PathBuf, IoError),

    #[error("failed to parse config {}: {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),

    #[error("failed to write default config {}: {}", .0.display(), .1)]
    WriteDefault(PathBuf, IoError),
}

/// Count-file storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The count file does not exist yet. Callers treat this as "start
    /// with empty counts", so it is kept distinguishable from real
    /// read failures.
    #[error("count file {} not found", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read count file {}: {}", .0.display(), .1)]
    Read(PathBuf, IoError),

    #[error("failed to create file {}: {}", .0.display(), .1)]
    FileCreate(PathBuf, IoError),

    #[error("failed to write to file {}: {}", .0.display(), .1)]
    FileWrite(PathBuf, IoError),

    #[error("failed to sync file {}: {}", .0.display(), .1)]
    FileSync(PathBuf, IoError),

    #[error("failed to rename file from {} to {}: {}", .0.display(), .1.display(), .2)]
    FileRename(PathBuf, PathBuf, IoError),
}

impl StorageError {
    /// True when the failure is just an absent count file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Failures pushing leaderboard state to one viewer's sidebar.
///
/// Always non-fatal: the service logs them and keeps serving the other
/// viewers and the authoritative counts.
#[derive(Debug, Error)]
pub enum SidebarError {
    #[error("no leaderboard objective registered for viewer {0}")]
    MissingObjective(PlayerId),

    #[error("viewer {0} is no longer connected")]
    ViewerGone(PlayerId),

    #[error("sidebar backend error: {0}")]
    Backend(String),
}

/// Plugin load-time errors.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("event system error: {0}")]
    Events(#[from] EventError),
}
