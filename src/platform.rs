// Platform selection for hotspot orchestration

//! Per-platform hotspot implementations behind one enable/disable
//! surface, selected once at startup. Windows and anything else is
//! refused before any work is attempted.

use crate::error::HotspotError;
use crate::exec::{CommandBackend, Executor};
use crate::{linux, macos};

/// Options for an enable invocation, merged from command-line flags and
/// the configuration file. Constructed fresh per invocation, never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct EnableOptions {
    /// Explicit interface override; resolved when absent.
    pub interface: Option<String>,
    /// SSID override; the fixed default applies when absent.
    pub ssid: Option<String>,
    /// Password; prompted for interactively when absent.
    pub password: Option<String>,
    /// Whether prompting on the terminal is allowed.
    pub interactive: bool,
}

/// Supported host platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    /// Linux: NetworkManager + iw + nftables.
    Linux,
    /// macOS: networksetup + airport helper, best-effort.
    Macos,
}

impl Platform {
    /// Identify the running platform, or refuse outright.
    pub fn detect() -> Result<Self, HotspotError> {
        if cfg!(target_os = "linux") {
            Ok(Self::Linux)
        } else if cfg!(target_os = "macos") {
            Ok(Self::Macos)
        } else {
            Err(HotspotError::UnsupportedPlatform {
                os: std::env::consts::OS.to_string(),
            })
        }
    }

    /// Bring the hotspot up and route its traffic into the tunnel.
    pub async fn enable<B: CommandBackend>(
        self,
        exec: &Executor<B>,
        opts: &EnableOptions,
    ) -> Result<(), HotspotError> {
        match self {
            Self::Linux => linux::enable(exec, opts).await,
            Self::Macos => macos::enable(exec, opts).await,
        }
    }

    /// Tear the hotspot down.
    pub async fn disable<B: CommandBackend>(
        self,
        exec: &Executor<B>,
    ) -> Result<(), HotspotError> {
        match self {
            Self::Linux => linux::disable(exec).await,
            Self::Macos => macos::disable(exec).await,
        }
    }
}
