// Linux hotspot orchestration

//! Linux enable/disable flows.
//!
//! Enable runs preconditions, resolves the Wi-Fi interface, turns the
//! radio on, short-circuits if an access point is already active on the
//! interface (its ownership is unknown, so rules are skipped too), then
//! creates the hotspot and applies the forwarding rules. Disable stops
//! the hotspot connection and removes the forwarding table. There is no
//! rollback; a partial failure is recovered by running disable, then
//! enable again.

use crate::error::HotspotError;
use crate::exec::{CommandBackend, Executor};
use crate::password::{self, validate_password};
use crate::platform::EnableOptions;
use crate::{ap, firewall, preflight, resolver};
use crate::{DEFAULT_SSID, NFT_TABLE, TUNNEL_IFACE};

/// Bring up the hotspot and forward its traffic into the tunnel.
pub async fn enable<B: CommandBackend>(
    exec: &Executor<B>,
    opts: &EnableOptions,
) -> Result<(), HotspotError> {
    // A programmatically supplied password is rejected before any command
    // is issued; interactive prompting happens later, after the
    // already-active short-circuit.
    if let Some(password) = opts.password.as_deref() {
        if !validate_password(password) {
            return Err(HotspotError::PasswordTooShort {
                min: password::MIN_PASSWORD_LEN,
            });
        }
    }

    preflight::ensure_tools(exec.backend(), preflight::detect_distro_family())?;
    preflight::ensure_tunnel_table(exec).await?;

    let iface = resolver::resolve_interface(exec, opts.interface.as_deref()).await?;
    log::info!("Wi-Fi interface: {iface}");

    ap::radio_on(exec).await?;

    if ap::is_ap_active(exec, &iface).await? {
        log::warn!("a Wi-Fi hotspot is already active on {iface}, skipping creation");
        return Ok(());
    }

    let ssid = opts.ssid.clone().unwrap_or_else(|| DEFAULT_SSID.to_string());
    let password = password::obtain_password(opts.password.clone(), opts.interactive)?;

    log::info!("starting hotspot");
    ap::create_hotspot(exec, &iface, &ssid, &password).await?;

    log::info!("setting up nftables rules");
    firewall::apply_rules(exec, NFT_TABLE, TUNNEL_IFACE, &iface).await?;
    if !exec.dry_run() {
        match firewall::verify_rules(exec, NFT_TABLE).await {
            Ok(true) => {}
            Ok(false) => log::warn!(
                "nftables table '{NFT_TABLE}' did not materialize; run disable, then enable again"
            ),
            Err(err) => log::warn!("could not verify nftables table '{NFT_TABLE}': {err}"),
        }
    }

    println!("Hotspot is ready and running.");
    println!("SSID: {ssid}");
    println!("Password: {password}");
    Ok(())
}

/// Stop the hotspot connection and remove the forwarding table. Both
/// halves are best-effort; the connection or table may not exist.
pub async fn disable<B: CommandBackend>(exec: &Executor<B>) -> Result<(), HotspotError> {
    log::info!("stopping hotspot");
    ap::teardown(exec).await?;

    log::info!("removing nftables table");
    firewall::remove_rules(exec, NFT_TABLE).await?;

    println!("Hotspot stopped and nftables rules removed.");
    Ok(())
}
