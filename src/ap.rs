// Access point control via nmcli and iw

//! Access-point lifecycle: radio power, AP-mode detection, creation, and
//! teardown. State is never persisted; the live OS is re-queried on every
//! run.

use crate::error::HotspotError;
use crate::exec::{CommandBackend, Executor, Invocation, Tolerance};
use crate::NM_HOTSPOT_CONNECTION;

/// Turn the Wi-Fi radio on. Best-effort; a failure here is not fatal.
pub async fn radio_on<B: CommandBackend>(exec: &Executor<B>) -> Result<(), HotspotError> {
    exec.run(
        Invocation::argv(["nmcli", "radio", "wifi", "on"]),
        Tolerance::BestEffort,
    )
    .await?;
    Ok(())
}

/// Whether the interface currently reports access-point mode.
pub async fn is_ap_active<B: CommandBackend>(
    exec: &Executor<B>,
    iface: &str,
) -> Result<bool, HotspotError> {
    let output = exec.capture(&["iw", "dev", iface, "info"]).await?;
    Ok(output.success() && output.stdout.contains("type AP"))
}

/// Create the hotspot connection on `iface`.
pub async fn create_hotspot<B: CommandBackend>(
    exec: &Executor<B>,
    iface: &str,
    ssid: &str,
    password: &str,
) -> Result<(), HotspotError> {
    let invocation = Invocation::argv([
        "nmcli", "dev", "wifi", "hotspot", "ifname", iface, "ssid", ssid, "password", password,
    ])
    .redacted(format!(
        "nmcli dev wifi hotspot ifname \"{iface}\" ssid \"{ssid}\" password \"********\""
    ));
    match exec.run(invocation, Tolerance::Mandatory).await {
        Ok(_) => Ok(()),
        Err(HotspotError::CommandFailed { stderr, .. }) => {
            let detail = if stderr.is_empty() {
                "AP mode may be unsupported".to_string()
            } else {
                stderr
            };
            Err(HotspotError::HotspotCreationFailed { detail })
        }
        Err(other) => Err(other),
    }
}

/// Tear down the hotspot connection. Both steps tolerate a connection
/// that does not exist.
pub async fn teardown<B: CommandBackend>(exec: &Executor<B>) -> Result<(), HotspotError> {
    exec.run(
        Invocation::argv(["nmcli", "connection", "down", NM_HOTSPOT_CONNECTION]),
        Tolerance::BestEffort,
    )
    .await?;
    exec.run(
        Invocation::argv(["nmcli", "connection", "delete", NM_HOTSPOT_CONNECTION]),
        Tolerance::BestEffort,
    )
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::ExecOutput;
    use crate::test_support::MockBackend;

    const IW_INFO_AP: &str = "\
Interface wlan0
\taddr aa:bb:cc:dd:ee:ff
\ttype AP
\tchannel 6 (2437 MHz)
";

    const IW_INFO_MANAGED: &str = "\
Interface wlan0
\taddr aa:bb:cc:dd:ee:ff
\ttype managed
";

    #[tokio::test]
    async fn test_ap_mode_detection() {
        let backend = MockBackend::new().respond("iw dev", ExecOutput::with_stdout(IW_INFO_AP));
        let exec = Executor::new(backend, false);
        assert!(is_ap_active(&exec, "wlan0").await.unwrap());
    }

    #[tokio::test]
    async fn test_managed_mode_is_not_active() {
        let backend =
            MockBackend::new().respond("iw dev", ExecOutput::with_stdout(IW_INFO_MANAGED));
        let exec = Executor::new(backend, false);
        assert!(!is_ap_active(&exec, "wlan0").await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_probe_is_not_active() {
        let backend = MockBackend::new().respond("iw dev", ExecOutput::failed(255));
        let exec = Executor::new(backend, false);
        assert!(!is_ap_active(&exec, "wlan0").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_hotspot_command_shape() {
        let exec = Executor::new(MockBackend::new(), false);
        create_hotspot(&exec, "wlan0", "thronetools", "abcdefgh")
            .await
            .unwrap();
        assert_eq!(
            exec.backend().calls(),
            vec!["nmcli dev wifi hotspot ifname wlan0 ssid thronetools password abcdefgh"]
        );
    }

    #[tokio::test]
    async fn test_create_hotspot_failure_is_fatal() {
        let backend = MockBackend::new().respond(
            "nmcli dev wifi hotspot",
            ExecOutput {
                code: Some(1),
                stdout: String::new(),
                stderr: "Error: Connection activation failed".to_string(),
            },
        );
        let exec = Executor::new(backend, false);
        let err = create_hotspot(&exec, "wlan0", "thronetools", "abcdefgh")
            .await
            .unwrap_err();
        match err {
            HotspotError::HotspotCreationFailed { detail } => {
                assert!(detail.contains("activation failed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_teardown_tolerates_missing_connection() {
        let backend = MockBackend::new().respond("nmcli connection", ExecOutput::failed(10));
        let exec = Executor::new(backend, false);
        teardown(&exec).await.unwrap();
        assert_eq!(
            exec.backend().calls(),
            vec![
                "nmcli connection down Hotspot",
                "nmcli connection delete Hotspot"
            ]
        );
    }
}
