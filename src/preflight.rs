// Preconditions for hotspot creation

//! Tool and firewall-table preconditions.
//!
//! Both checks run once per enable invocation and are never cached: the
//! tool set and the tunnel component's table can change between runs.
//! Missing tools carry an install hint keyed by the distribution family
//! read from `/etc/os-release`; a missing tunnel table is fatal because
//! the hotspot cannot safely forward traffic without it.

use std::collections::HashMap;
use std::fs;

use crate::error::HotspotError;
use crate::exec::{CommandBackend, Executor};
use crate::REQUIRED_INET_TABLE;

/// Distribution families install hints are keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistroFamily {
    /// Debian, Ubuntu, and derivatives.
    Debian,
    /// Fedora, RHEL, CentOS, and derivatives.
    Fedora,
    /// Arch and derivatives.
    Arch,
    /// Anything else; receives every hint.
    Unknown,
}

struct ToolPackages {
    tool: &'static str,
    debian: &'static str,
    fedora: &'static str,
    arch: &'static str,
}

const LINUX_TOOLS: [ToolPackages; 3] = [
    ToolPackages {
        tool: "nmcli",
        debian: "network-manager",
        fedora: "NetworkManager",
        arch: "networkmanager",
    },
    ToolPackages {
        tool: "iw",
        debian: "iw",
        fedora: "iw",
        arch: "iw",
    },
    ToolPackages {
        tool: "nft",
        debian: "nftables",
        fedora: "nftables",
        arch: "nftables",
    },
];

/// Parse `KEY=value` lines of an os-release file. Quotes are stripped,
/// malformed lines skipped.
pub(crate) fn parse_os_release(contents: &str) -> HashMap<String, String> {
    let mut data = HashMap::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((key, value)) = line.split_once('=') {
            data.insert(key.to_string(), value.trim_matches('"').to_string());
        }
    }
    data
}

/// Family derived from the `ID` and `ID_LIKE` fields.
pub(crate) fn family_from_os_release(data: &HashMap<String, String>) -> DistroFamily {
    let mut haystack = String::new();
    for key in ["ID", "ID_LIKE"] {
        if let Some(value) = data.get(key) {
            haystack.push_str(&value.to_lowercase());
            haystack.push(' ');
        }
    }
    if haystack.contains("debian") || haystack.contains("ubuntu") {
        DistroFamily::Debian
    } else if haystack.contains("fedora") || haystack.contains("rhel") || haystack.contains("centos")
    {
        DistroFamily::Fedora
    } else if haystack.contains("arch") {
        DistroFamily::Arch
    } else {
        DistroFamily::Unknown
    }
}

/// Family of the running distribution, from `/etc/os-release`.
pub fn detect_distro_family() -> DistroFamily {
    match fs::read_to_string("/etc/os-release") {
        Ok(contents) => family_from_os_release(&parse_os_release(&contents)),
        Err(_) => DistroFamily::Unknown,
    }
}

fn install_hint(packages: &ToolPackages, family: DistroFamily) -> String {
    match family {
        DistroFamily::Debian => format!("   Debian/Ubuntu: sudo apt install {}", packages.debian),
        DistroFamily::Fedora => format!("   Fedora:        sudo dnf install {}", packages.fedora),
        DistroFamily::Arch => format!("   Arch:          sudo pacman -S {}", packages.arch),
        DistroFamily::Unknown => format!(
            "   Debian/Ubuntu: sudo apt install {}\n   Fedora:        sudo dnf install {}\n   Arch:          sudo pacman -S {}",
            packages.debian, packages.fedora, packages.arch
        ),
    }
}

/// Verify the Linux tool set (`nmcli`, `iw`, `nft`) is installed.
pub fn ensure_tools<B: CommandBackend>(
    backend: &B,
    family: DistroFamily,
) -> Result<(), HotspotError> {
    for packages in &LINUX_TOOLS {
        if backend.find_tool(packages.tool).is_none() {
            return Err(HotspotError::MissingTool {
                tool: packages.tool,
                hint: install_hint(packages, family),
            });
        }
    }
    Ok(())
}

/// Verify the tunnel component's `inet` table exists. Read-only probe;
/// runs in dry-run mode too.
pub async fn ensure_tunnel_table<B: CommandBackend>(
    exec: &Executor<B>,
) -> Result<(), HotspotError> {
    let output = exec
        .capture(&["sudo", "nft", "list", "table", "inet", REQUIRED_INET_TABLE])
        .await?;
    if output.success() {
        Ok(())
    } else {
        Err(HotspotError::MissingFirewallTable {
            table: REQUIRED_INET_TABLE,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecOutput;
    use crate::test_support::MockBackend;

    #[test]
    fn test_parse_os_release() {
        let contents = "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\n\n# comment\nBROKEN\n";
        let data = parse_os_release(contents);
        assert_eq!(data.get("NAME").map(String::as_str), Some("Ubuntu"));
        assert_eq!(data.get("ID").map(String::as_str), Some("ubuntu"));
        assert_eq!(data.get("ID_LIKE").map(String::as_str), Some("debian"));
        assert!(!data.contains_key("BROKEN"));
    }

    #[test]
    fn test_family_detection() {
        let ubuntu = parse_os_release("ID=ubuntu\nID_LIKE=debian\n");
        assert_eq!(family_from_os_release(&ubuntu), DistroFamily::Debian);

        let fedora = parse_os_release("ID=fedora\n");
        assert_eq!(family_from_os_release(&fedora), DistroFamily::Fedora);

        let rocky = parse_os_release("ID=rocky\nID_LIKE=\"rhel centos fedora\"\n");
        assert_eq!(family_from_os_release(&rocky), DistroFamily::Fedora);

        let manjaro = parse_os_release("ID=manjaro\nID_LIKE=arch\n");
        assert_eq!(family_from_os_release(&manjaro), DistroFamily::Arch);

        let other = parse_os_release("ID=nixos\n");
        assert_eq!(family_from_os_release(&other), DistroFamily::Unknown);
        assert_eq!(family_from_os_release(&HashMap::new()), DistroFamily::Unknown);
    }

    #[test]
    fn test_ensure_tools_all_present() {
        let backend = MockBackend::new();
        assert!(ensure_tools(&backend, DistroFamily::Debian).is_ok());
    }

    #[test]
    fn test_ensure_tools_missing_nft_keyed_hint() {
        let backend = MockBackend::new().without_tool("nft");
        let err = ensure_tools(&backend, DistroFamily::Debian).unwrap_err();
        match err {
            HotspotError::MissingTool { tool, hint } => {
                assert_eq!(tool, "nft");
                assert!(hint.contains("sudo apt install nftables"));
                assert!(!hint.contains("pacman"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_ensure_tools_unknown_family_gets_all_hints() {
        let backend = MockBackend::new().without_tool("nmcli");
        let err = ensure_tools(&backend, DistroFamily::Unknown).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("apt install network-manager"));
        assert!(message.contains("dnf install NetworkManager"));
        assert!(message.contains("pacman -S networkmanager"));
    }

    #[tokio::test]
    async fn test_ensure_tunnel_table_present() {
        let exec = Executor::new(MockBackend::new(), false);
        assert!(ensure_tunnel_table(&exec).await.is_ok());
        assert_eq!(
            exec.backend().calls(),
            vec!["sudo nft list table inet sing-box"]
        );
    }

    #[tokio::test]
    async fn test_ensure_tunnel_table_missing() {
        let backend = MockBackend::new().respond("sudo nft list table", ExecOutput::failed(1));
        let exec = Executor::new(backend, false);
        let err = ensure_tunnel_table(&exec).await.unwrap_err();
        assert!(matches!(
            err,
            HotspotError::MissingFirewallTable { table: "sing-box" }
        ));
    }
}
