use std::fs::File;

use async_trait::async_trait;

use crate::types::{TrashError, TrashFileReply};

/// Establishes the connection a [`crate::TrashRequest`] calls through.
///
/// `Ok(None)` stands for a connection layer that produced no handle; the
/// request reports it as [`TrashError::Connection`].
#[async_trait]
pub trait PortalConnector: Send + Sync {
    async fn connect(&self) -> Result<Option<Box<dyn TrashPortal>>, TrashError>;
}

/// A live handle to the trash portal.
#[async_trait]
pub trait TrashPortal: Send + Sync {
    /// Sends `file` as the first entry of the call's descriptor list. The
    /// descriptor is owned by the transport from here on.
    async fn trash_file(&self, file: File) -> Result<TrashFileReply, TrashError>;
}
