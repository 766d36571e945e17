use std::path::PathBuf;

use clap::Parser;
use trash_portal::PortalConfig;

/// Move a file or folder to the trash through the desktop portal.
#[derive(Debug, Parser)]
#[command(name = "portal-trash", version)]
pub struct Cli {
    /// File or folder to move to the trash.
    pub path: PathBuf,

    /// Give up on the portal reply after this many milliseconds (0 waits forever).
    #[arg(long, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Log request state changes.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn portal_config(&self) -> PortalConfig {
        PortalConfig {
            call_timeout_ms: self.timeout_ms,
            ..PortalConfig::default()
        }
    }
}
