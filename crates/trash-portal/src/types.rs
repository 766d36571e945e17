use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PORTAL_BUS_NAME: &str = "org.freedesktop.portal.Desktop";
pub const PORTAL_OBJECT_PATH: &str = "/org/freedesktop/portal/desktop";
pub const TRASH_INTERFACE: &str = "org.freedesktop.portal.Trash";
pub const TRASH_FILE_METHOD: &str = "TrashFile";

/// Status the portal returns when the item was left in place.
pub const TRASH_FAILED_STATUS: u32 = 0;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalConfig {
    pub destination: String,
    pub object_path: String,
    pub interface: String,
    /// `None` waits for the portal reply indefinitely.
    pub call_timeout_ms: Option<u64>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            destination: PORTAL_BUS_NAME.to_string(),
            object_path: PORTAL_OBJECT_PATH.to_string(),
            interface: TRASH_INTERFACE.to_string(),
            call_timeout_ms: None,
        }
    }
}

impl PortalConfig {
    pub(crate) fn normalized(&self) -> Self {
        Self {
            destination: self.destination.clone(),
            object_path: self.object_path.clone(),
            interface: self.interface.clone(),
            call_timeout_ms: self.call_timeout_ms.filter(|timeout_ms| *timeout_ms > 0),
        }
    }

    pub(crate) fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }
}

/// Reply of `TrashFile`, validated at the transport boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrashFileReply {
    pub status: Option<u32>,
}

impl TrashFileReply {
    pub fn with_status(status: u32) -> Self {
        Self {
            status: Some(status),
        }
    }

    pub fn empty() -> Self {
        Self { status: None }
    }

    pub fn is_success(&self) -> bool {
        self.status != Some(TRASH_FAILED_STATUS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Created,
    ConnectionPending,
    ConnectionEstablished,
    ConnectionFailed,
    CallPending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrashErrorKind {
    Connection,
    FileAccess,
    Rejected,
    Transport,
    Abandoned,
}

#[derive(Debug, Error)]
pub enum TrashError {
    #[error("trash portal is unavailable: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("failed to open {path}: {source}")]
    FileAccess {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("the item could not be moved to the trash: {path}")]
    Rejected { path: String },

    #[error("trash portal call failed: {source}")]
    Transport {
        #[source]
        source: BoxError,
    },

    #[error("trash request ended without reporting an outcome")]
    Abandoned,
}

impl TrashError {
    pub fn kind(&self) -> TrashErrorKind {
        match self {
            Self::Connection { .. } => TrashErrorKind::Connection,
            Self::FileAccess { .. } => TrashErrorKind::FileAccess,
            Self::Rejected { .. } => TrashErrorKind::Rejected,
            Self::Transport { .. } => TrashErrorKind::Transport,
            Self::Abandoned => TrashErrorKind::Abandoned,
        }
    }

    pub(crate) fn connection(reason: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    pub(crate) fn transport(source: impl Into<BoxError>) -> Self {
        Self::Transport {
            source: source.into(),
        }
    }
}
