// Error taxonomy for the hotspot orchestrator

//! Fatal error taxonomy.
//!
//! Every fatal path maps to exactly one variant; the Display form carries
//! the full user-facing message including any remediation hint. The binary
//! prints the message and exits non-zero. Best-effort command failures
//! never reach this type; they are logged and tolerated by the execution
//! engine.

use thiserror::Error;

/// Errors that abort the current subcommand.
#[derive(Debug, Error)]
pub enum HotspotError {
    /// The host OS has no hotspot support in this tool.
    #[error("unsupported platform '{os}': hotspot orchestration supports Linux and macOS only")]
    UnsupportedPlatform {
        /// OS name as reported by the standard library.
        os: String,
    },

    /// A required external tool is not installed.
    #[error("'{tool}' command not found. Please install it.\n{hint}")]
    MissingTool {
        /// Name of the missing tool.
        tool: &'static str,
        /// Install hint keyed by the detected distribution family.
        hint: String,
    },

    /// The tunnel component's nftables table is missing.
    #[error("missing 'inet {table}' nftables table.\n   Please enable 'Tun Mode' in the Throne/NekoRay GUI settings.")]
    MissingFirewallTable {
        /// Name of the required table.
        table: &'static str,
    },

    /// A specific interface was requested but is not a known Wi-Fi device.
    #[error("Wi-Fi interface not found: {name}")]
    InterfaceNotFound {
        /// The requested interface name.
        name: String,
    },

    /// No Wi-Fi capable device is present on the system.
    #[error("no Wi-Fi interface found")]
    NoWifiInterface,

    /// An interface name contains characters unsafe to embed in commands.
    #[error("invalid interface name '{name}': only alphanumeric characters, hyphens, and underscores are allowed")]
    InvalidInterfaceName {
        /// The offending name.
        name: String,
    },

    /// A programmatically supplied password is below the minimum length.
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length, in characters.
        min: usize,
    },

    /// No password was supplied and there is no terminal to prompt on.
    #[error("a hotspot password is required: pass --password or run interactively")]
    PasswordRequired,

    /// The platform refused to create the access point.
    #[error("failed to start hotspot: {detail}")]
    HotspotCreationFailed {
        /// stderr of the creation command, or a generic explanation.
        detail: String,
    },

    /// A mandatory external command failed.
    #[error("command `{command}` failed: {stderr}")]
    CommandFailed {
        /// The command line, with any secrets redacted.
        command: String,
        /// Exit code, when the process ran at all.
        code: Option<i32>,
        /// Captured stderr, or the spawn error.
        stderr: String,
    },

    /// The configuration file exists but could not be loaded.
    #[error("configuration error: {0:#}")]
    Config(anyhow::Error),

    /// Terminal or prompt I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
