//! Moves files to the trash through the freedesktop Trash portal.

mod portal;
mod request;
mod scheduler;
mod session;
mod types;

#[cfg(test)]
mod test_support;

pub use portal::{PortalConnector, TrashPortal};
pub use request::{trash_file, CompletionFn, ErrorFn, TrashRequest};
pub use scheduler::{IdleScheduler, IdleTask, QueuedIdleScheduler, TokioIdleScheduler};
pub use session::{SessionPortalConnector, ZbusTrashPortal};
pub use types::{
    BoxError, PortalConfig, RequestState, TrashError, TrashErrorKind, TrashFileReply,
    PORTAL_BUS_NAME, PORTAL_OBJECT_PATH, TRASH_FAILED_STATUS, TRASH_FILE_METHOD, TRASH_INTERFACE,
};
