// nftables rule management for hotspot forwarding

//! Firewall rule manager.
//!
//! Owns the `ip` table that bridges hotspot clients into the tunnel: a
//! nat postrouting chain masquerading traffic leaving via the tunnel
//! interface, and a filter forward chain accepting hotspot-to-tunnel
//! traffic plus established/related return traffic only.
//!
//! Apply deletes any previous table first, so re-applying converges to
//! the same state. Every step is attempted regardless of earlier
//! failures; ordering is fixed because chains need their table and rules
//! need their chain. All identifiers are shell-quoted before being
//! embedded in the command strings.

use crate::error::HotspotError;
use crate::exec::{shell_quote, CommandBackend, Executor, Invocation, Tolerance};

/// Create the table, chains, and rules forwarding `hotspot_iface` into
/// `tunnel_iface`. Individual failures are logged, never fatal.
pub async fn apply_rules<B: CommandBackend>(
    exec: &Executor<B>,
    table: &str,
    tunnel_iface: &str,
    hotspot_iface: &str,
) -> Result<(), HotspotError> {
    let table = shell_quote(table);
    let tun = shell_quote(tunnel_iface);
    let hs = shell_quote(hotspot_iface);

    let steps = [
        format!("sudo nft delete table ip {table} 2>/dev/null || true"),
        format!("sudo nft add table ip {table}"),
        format!(
            "sudo nft add chain ip {table} postrouting {{ type nat hook postrouting priority srcnat; policy accept; }}"
        ),
        format!("sudo nft add rule ip {table} postrouting oifname \"{tun}\" masquerade"),
        format!(
            "sudo nft add chain ip {table} forward {{ type filter hook forward priority filter; policy accept; }}"
        ),
        format!("sudo nft add rule ip {table} forward iifname \"{hs}\" oifname \"{tun}\" accept"),
        format!(
            "sudo nft add rule ip {table} forward iifname \"{tun}\" oifname \"{hs}\" ct state established,related accept"
        ),
    ];
    for step in steps {
        exec.run(Invocation::shell(step), Tolerance::BestEffort)
            .await?;
    }
    Ok(())
}

/// Delete the table by name. A table that does not exist counts as
/// success.
pub async fn remove_rules<B: CommandBackend>(
    exec: &Executor<B>,
    table: &str,
) -> Result<(), HotspotError> {
    let table = shell_quote(table);
    exec.run(
        Invocation::shell(format!(
            "sudo nft delete table ip {table} 2>/dev/null || true"
        )),
        Tolerance::BestEffort,
    )
    .await?;
    Ok(())
}

/// Probe whether the table materialized. Advisory post-apply check.
pub async fn verify_rules<B: CommandBackend>(
    exec: &Executor<B>,
    table: &str,
) -> Result<bool, HotspotError> {
    let output = exec
        .capture(&["sudo", "nft", "list", "table", "ip", table])
        .await?;
    Ok(output.success())
}
