use std::{fs::File, os::fd::AsFd};

use async_trait::async_trait;
use zbus::{zvariant::Fd, Connection, Proxy};

use crate::{
    portal::{PortalConnector, TrashPortal},
    types::{PortalConfig, TrashError, TrashFileReply, TRASH_FILE_METHOD},
};

/// Connects to the trash portal on the user's session bus.
#[derive(Debug, Clone, Default)]
pub struct SessionPortalConnector {
    config: PortalConfig,
}

impl SessionPortalConnector {
    pub fn new(config: PortalConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }
}

#[async_trait]
impl PortalConnector for SessionPortalConnector {
    async fn connect(&self) -> Result<Option<Box<dyn TrashPortal>>, TrashError> {
        let connection = Connection::session().await.map_err(|error| {
            TrashError::connection("failed to connect to the session bus", error)
        })?;

        let proxy = Proxy::new(
            &connection,
            self.config.destination.clone(),
            self.config.object_path.clone(),
            self.config.interface.clone(),
        )
        .await
        .map_err(|error| {
            TrashError::connection(
                format!(
                    "failed to create proxy for {} at {}",
                    self.config.destination, self.config.object_path
                ),
                error,
            )
        })?;

        Ok(Some(Box::new(ZbusTrashPortal {
            proxy,
            config: self.config.clone(),
        })))
    }
}

pub struct ZbusTrashPortal {
    proxy: Proxy<'static>,
    config: PortalConfig,
}

#[async_trait]
impl TrashPortal for ZbusTrashPortal {
    async fn trash_file(&self, file: File) -> Result<TrashFileReply, TrashError> {
        // The descriptor goes out as handle index 0; `file` closes when this returns.
        let args = (Fd::from(file.as_fd()),);
        let call = self.proxy.call_method(TRASH_FILE_METHOD, &args);

        let reply = match self.config.call_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, call)
                .await
                .map_err(TrashError::transport)?,
            None => call.await,
        }
        .map_err(TrashError::transport)?;

        parse_reply(&reply)
    }
}

fn parse_reply(reply: &zbus::Message) -> Result<TrashFileReply, TrashError> {
    let body = reply.body();
    match body.deserialize::<u32>() {
        Ok(status) => Ok(TrashFileReply::with_status(status)),
        Err(error) => match body.deserialize::<()>() {
            Ok(()) => Ok(TrashFileReply::empty()),
            Err(_) => Err(TrashError::transport(error)),
        },
    }
}
