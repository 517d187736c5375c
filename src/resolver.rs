// Wi-Fi interface discovery via NetworkManager

//! Wi-Fi interface resolution.
//!
//! Interfaces are queried fresh from NetworkManager on every operation.
//! Radios and connections can change between invocations, so nothing is
//! cached. Resolution is read-only; no mutating command is ever issued
//! from this module.

use crate::error::HotspotError;
use crate::exec::{validate_interface_name, CommandBackend, Executor};

/// First device reported as type `wifi` in `nmcli device status` output.
pub(crate) fn first_wifi_device(stdout: &str) -> Option<String> {
    for line in stdout.lines() {
        let mut parts = line.split_whitespace();
        if let (Some(device), Some(kind)) = (parts.next(), parts.next()) {
            if kind == "wifi" {
                return Some(device.to_string());
            }
        }
    }
    None
}

/// Whether terse `nmcli -t -f DEVICE,TYPE device` output lists `name` as
/// a wifi device.
pub(crate) fn is_wifi_device(stdout: &str, name: &str) -> bool {
    stdout.lines().any(|line| match line.split_once(':') {
        Some((device, kind)) => device == name && kind == "wifi",
        None => false,
    })
}

/// Resolve the Wi-Fi interface that will host the access point.
///
/// A requested name must be listed by NetworkManager as a wifi device;
/// with no request, the first wifi device wins.
pub async fn resolve_interface<B: CommandBackend>(
    exec: &Executor<B>,
    requested: Option<&str>,
) -> Result<String, HotspotError> {
    match requested {
        Some(name) => {
            validate_interface_name(name)?;
            let output = exec
                .capture(&["nmcli", "-t", "-f", "DEVICE,TYPE", "device"])
                .await?;
            if output.success() && is_wifi_device(&output.stdout, name) {
                Ok(name.to_string())
            } else {
                Err(HotspotError::InterfaceNotFound {
                    name: name.to_string(),
                })
            }
        }
        None => {
            let output = exec.capture(&["nmcli", "device", "status"]).await?;
            if !output.success() {
                return Err(HotspotError::NoWifiInterface);
            }
            let name = first_wifi_device(&output.stdout).ok_or(HotspotError::NoWifiInterface)?;
            validate_interface_name(&name)?;
            Ok(name)
        }
    }
}
