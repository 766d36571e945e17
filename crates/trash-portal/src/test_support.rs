use std::{
    fs::File,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use tracing_subscriber::fmt::MakeWriter;

use crate::{
    portal::{PortalConnector, TrashPortal},
    types::{TrashError, TrashFileReply},
};

#[derive(Clone)]
pub(crate) enum PortalReply {
    Status(TrashFileReply),
    TransportFailure(&'static str),
}

#[derive(Clone)]
pub(crate) struct FakePortal {
    reply: PortalReply,
    calls: Arc<AtomicUsize>,
}

impl FakePortal {
    pub(crate) fn replying(reply: PortalReply) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrashPortal for FakePortal {
    async fn trash_file(&self, _file: File) -> Result<TrashFileReply, TrashError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            PortalReply::Status(reply) => Ok(*reply),
            PortalReply::TransportFailure(message) => Err(TrashError::transport(*message)),
        }
    }
}

pub(crate) enum ConnectOutcome {
    Portal(FakePortal),
    NoHandle,
    BusUnavailable,
}

pub(crate) struct FakeConnector {
    outcome: ConnectOutcome,
    connects: AtomicUsize,
}

impl FakeConnector {
    pub(crate) fn new(outcome: ConnectOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            connects: AtomicUsize::new(0),
        })
    }

    pub(crate) fn connects(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PortalConnector for FakeConnector {
    async fn connect(&self) -> Result<Option<Box<dyn TrashPortal>>, TrashError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            ConnectOutcome::Portal(portal) => Ok(Some(Box::new(portal.clone()))),
            ConnectOutcome::NoHandle => Ok(None),
            ConnectOutcome::BusUnavailable => Err(TrashError::connection(
                "failed to connect to the session bus",
                "no session bus address",
            )),
        }
    }
}

/// A file that exists for the lifetime of the test.
pub(crate) struct ScratchFile {
    _dir: tempfile::TempDir,
    pub(crate) path: PathBuf,
}

impl ScratchFile {
    pub(crate) fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join(name);
        std::fs::write(&path, "scratch").expect("scratch file should be written");
        Self { _dir: dir, path }
    }
}

/// Collects formatted tracing output.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn contents(&self) -> String {
        let bytes = self.0.lock().expect("log buffer lock").clone();
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("log buffer lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
