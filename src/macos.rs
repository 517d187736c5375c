// macOS hotspot support

//! macOS enable/disable flows, best-effort.
//!
//! The platform has no supported hotspot API: creation goes through the
//! private airport helper and Internet Sharing is toggled via its launchd
//! service descriptor. Creation failures are advisory, not fatal, and the
//! operator is pointed at System Settings to verify the result.

use std::path::Path;

use crate::error::HotspotError;
use crate::exec::{
    validate_interface_name, CommandBackend, Executor, Invocation, RunStatus, Tolerance,
};
use crate::password::{self, validate_password};
use crate::platform::EnableOptions;
use crate::{AIRPORT_TOOL, DEFAULT_SSID, INTERNET_SHARING_PLIST};

/// Device name of the first Wi-Fi/AirPort hardware port in
/// `networksetup -listallhardwareports` output. The device line follows
/// its port line within the next two lines.
pub(crate) fn wifi_device_from_hardware_ports(stdout: &str) -> Option<String> {
    let lines: Vec<&str> = stdout.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let Some(port) = line.strip_prefix("Hardware Port:") else {
            continue;
        };
        let port = port.trim().to_ascii_lowercase();
        if port != "wi-fi" && port != "airport" {
            continue;
        }
        for next in lines.iter().skip(idx + 1).take(2) {
            if let Some(device) = next.strip_prefix("Device:") {
                return Some(device.trim().to_string());
            }
        }
    }
    None
}

fn ensure_tools<B: CommandBackend>(backend: &B) -> Result<(), HotspotError> {
    if backend.find_tool("networksetup").is_none() {
        return Err(HotspotError::MissingTool {
            tool: "networksetup",
            hint: "   macOS hotspot is unavailable without it".to_string(),
        });
    }
    if !backend.file_exists(Path::new(AIRPORT_TOOL)) {
        return Err(HotspotError::MissingTool {
            tool: "airport",
            hint: format!("   expected at {AIRPORT_TOOL}"),
        });
    }
    Ok(())
}

async fn resolve_interface<B: CommandBackend>(
    exec: &Executor<B>,
    requested: Option<&str>,
) -> Result<String, HotspotError> {
    if let Some(name) = requested {
        validate_interface_name(name)?;
        return Ok(name.to_string());
    }
    let output = exec
        .capture(&["networksetup", "-listallhardwareports"])
        .await?;
    if !output.success() {
        return Err(HotspotError::NoWifiInterface);
    }
    wifi_device_from_hardware_ports(&output.stdout).ok_or(HotspotError::NoWifiInterface)
}

/// Best-effort hotspot bring-up.
pub async fn enable<B: CommandBackend>(
    exec: &Executor<B>,
    opts: &EnableOptions,
) -> Result<(), HotspotError> {
    if let Some(pw) = opts.password.as_deref() {
        if !validate_password(pw) {
            return Err(HotspotError::PasswordTooShort {
                min: password::MIN_PASSWORD_LEN,
            });
        }
    }

    ensure_tools(exec.backend())?;

    let iface = resolve_interface(exec, opts.interface.as_deref()).await?;
    log::info!("Wi-Fi interface: {iface}");

    let ssid = opts.ssid.clone().unwrap_or_else(|| DEFAULT_SSID.to_string());
    let pw = password::obtain_password(opts.password.clone(), opts.interactive)?;

    exec.run(
        Invocation::argv(["networksetup", "-setairportpower", iface.as_str(), "on"]),
        Tolerance::BestEffort,
    )
    .await?;

    log::info!("attempting to create hotspot");
    let create = Invocation::argv([AIRPORT_TOOL, "--create", ssid.as_str(), pw.as_str()])
        .redacted(format!("{AIRPORT_TOOL} --create \"{ssid}\" ********"));
    if exec.run(create, Tolerance::BestEffort).await? == RunStatus::Tolerated {
        log::warn!("failed to create hotspot via 'airport'; setup can require manual configuration");
    }

    if exec.file_exists(Path::new(INTERNET_SHARING_PLIST)) {
        log::info!("attempting to enable Internet Sharing");
        exec.run(
            Invocation::argv(["sudo", "launchctl", "load", "-w", INTERNET_SHARING_PLIST]),
            Tolerance::BestEffort,
        )
        .await?;
    } else {
        log::warn!("Internet Sharing plist not found");
    }

    println!("Hotspot command completed (best-effort).");
    println!("SSID: {ssid}");
    println!("Password: {pw}");
    println!("Verify in System Settings > General > Sharing > Internet Sharing.");
    Ok(())
}

/// Best-effort teardown: unload the Internet Sharing service.
pub async fn disable<B: CommandBackend>(exec: &Executor<B>) -> Result<(), HotspotError> {
    if exec.file_exists(Path::new(INTERNET_SHARING_PLIST)) {
        log::info!("attempting to disable Internet Sharing");
        exec.run(
            Invocation::argv(["sudo", "launchctl", "unload", "-w", INTERNET_SHARING_PLIST]),
            Tolerance::BestEffort,
        )
        .await?;
    } else {
        log::warn!("Internet Sharing plist not found");
    }
    println!("Hotspot stop command completed (best-effort).");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecOutput;
    use crate::test_support::MockBackend;

    const HARDWARE_PORTS: &str = "\
Hardware Port: Ethernet
Device: en0
Ethernet Address: aa:bb:cc:dd:ee:00

Hardware Port: Wi-Fi
Device: en1
Ethernet Address: aa:bb:cc:dd:ee:01
";

    fn opts(password: &str) -> EnableOptions {
        EnableOptions {
            interface: None,
            ssid: None,
            password: Some(password.to_string()),
            interactive: false,
        }
    }

    #[test]
    fn test_wifi_device_parsing() {
        assert_eq!(
            wifi_device_from_hardware_ports(HARDWARE_PORTS).as_deref(),
            Some("en1")
        );
    }

    #[test]
    fn test_wifi_device_parsing_airport_label() {
        let out = "Hardware Port: AirPort\nDevice: en2\n";
        assert_eq!(wifi_device_from_hardware_ports(out).as_deref(), Some("en2"));
    }

    #[test]
    fn test_wifi_device_parsing_no_wifi_port() {
        let out = "Hardware Port: Ethernet\nDevice: en0\n";
        assert_eq!(wifi_device_from_hardware_ports(out), None);
        assert_eq!(wifi_device_from_hardware_ports(""), None);
    }

    #[test]
    fn test_wifi_device_must_follow_port_closely() {
        // A device line more than two lines after the port line is not
        // attributed to it.
        let out = "Hardware Port: Wi-Fi\nEthernet Address: x\nVLAN: n\nDevice: en1\n";
        assert_eq!(wifi_device_from_hardware_ports(out), None);
    }

    #[tokio::test]
    async fn test_enable_continues_past_airport_failure() {
        let backend = MockBackend::new()
            .respond(
                "networksetup -listallhardwareports",
                ExecOutput::with_stdout(HARDWARE_PORTS),
            )
            .respond(AIRPORT_TOOL, ExecOutput::failed(1));
        let exec = Executor::new(backend, false);
        enable(&exec, &opts("abcdefgh")).await.unwrap();
        let calls = exec.backend().calls();
        // The sharing service is still loaded after the failed create.
        assert!(calls
            .iter()
            .any(|c| c.starts_with("sudo launchctl load -w")));
    }

    #[tokio::test]
    async fn test_enable_command_sequence() {
        let backend = MockBackend::new().respond(
            "networksetup -listallhardwareports",
            ExecOutput::with_stdout(HARDWARE_PORTS),
        );
        let exec = Executor::new(backend, false);
        enable(&exec, &opts("abcdefgh")).await.unwrap();
        assert_eq!(
            exec.backend().calls(),
            vec![
                "networksetup -listallhardwareports".to_string(),
                "networksetup -setairportpower en1 on".to_string(),
                format!("{AIRPORT_TOOL} --create thronetools abcdefgh"),
                format!("sudo launchctl load -w {INTERNET_SHARING_PLIST}"),
            ]
        );
    }

    #[tokio::test]
    async fn test_enable_missing_airport_tool() {
        let backend = MockBackend::new().without_file(AIRPORT_TOOL);
        let exec = Executor::new(backend, false);
        let err = enable(&exec, &opts("abcdefgh")).await.unwrap_err();
        assert!(matches!(err, HotspotError::MissingTool { tool: "airport", .. }));
        assert!(exec.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_enable_short_password_issues_no_commands() {
        let exec = Executor::new(MockBackend::new(), false);
        let err = enable(&exec, &opts("short")).await.unwrap_err();
        assert!(matches!(err, HotspotError::PasswordTooShort { .. }));
        assert!(exec.backend().calls().is_empty());
    }

    #[tokio::test]
    async fn test_enable_skips_missing_sharing_plist() {
        let backend = MockBackend::new()
            .respond(
                "networksetup -listallhardwareports",
                ExecOutput::with_stdout(HARDWARE_PORTS),
            )
            .without_file(INTERNET_SHARING_PLIST);
        let exec = Executor::new(backend, false);
        enable(&exec, &opts("abcdefgh")).await.unwrap();
        assert!(!exec
            .backend()
            .calls()
            .iter()
            .any(|c| c.contains("launchctl")));
    }

    #[tokio::test]
    async fn test_disable_unloads_sharing_service() {
        let exec = Executor::new(MockBackend::new(), false);
        disable(&exec).await.unwrap();
        assert_eq!(
            exec.backend().calls(),
            vec![format!("sudo launchctl unload -w {INTERNET_SHARING_PLIST}")]
        );
    }

    #[tokio::test]
    async fn test_disable_dry_run_issues_nothing() {
        let exec = Executor::new(MockBackend::new(), true);
        disable(&exec).await.unwrap();
        assert!(exec.backend().calls().is_empty());
    }
}
