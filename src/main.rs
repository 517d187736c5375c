// Throne hotspot orchestration CLI

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use throne_hotspot::config;
use throne_hotspot::error::HotspotError;
use throne_hotspot::exec::{Executor, SystemBackend};
use throne_hotspot::platform::{EnableOptions, Platform};

#[derive(Parser)]
#[command(name = "throne-hotspot")]
#[command(about = "Wi-Fi hotspot bridged into Throne/NekoRay tunnel mode", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage the Wi-Fi hotspot
    Hotspot {
        #[command(subcommand)]
        action: HotspotAction,
    },
}

#[derive(Subcommand)]
enum HotspotAction {
    /// Enable the hotspot and forward its traffic into the tunnel
    Enable(EnableArgs),
    /// Disable the hotspot and remove its forwarding rules
    Disable(DisableArgs),
}

#[derive(Args)]
struct EnableArgs {
    /// Wi-Fi interface to use
    #[arg(long)]
    iface: Option<String>,

    /// Hotspot SSID (optional)
    #[arg(long)]
    ssid: Option<String>,

    /// Hotspot password (min 8 chars)
    #[arg(long)]
    password: Option<String>,

    /// Print commands instead of executing them
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct DisableArgs {
    /// Print commands instead of executing them
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match config::load_config_or_default(&cli.config) {
        Ok(config) => config,
        Err(err) => exit_with(HotspotError::Config(err)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(&config.general.log_level),
    )
    .init();

    if let Err(err) = run(cli, config).await {
        exit_with(err);
    }
}

fn exit_with(err: HotspotError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

async fn run(cli: Cli, config: config::Config) -> Result<(), HotspotError> {
    let platform = Platform::detect()?;

    match cli.command {
        Command::Hotspot { action } => match action {
            HotspotAction::Enable(args) => {
                let dry_run = resolve_dry_run(args.dry_run)?;
                let exec = Executor::new(SystemBackend, dry_run);
                let opts = EnableOptions {
                    interface: args.iface.or(config.general.interface),
                    ssid: args.ssid.or(config.general.ssid),
                    password: args.password,
                    interactive: std::io::stdin().is_terminal(),
                };
                platform.enable(&exec, &opts).await
            }
            HotspotAction::Disable(args) => {
                let dry_run = resolve_dry_run(args.dry_run)?;
                let exec = Executor::new(SystemBackend, dry_run);
                platform.disable(&exec).await
            }
        },
    }
}

/// Without `--dry-run`, an interactive session is asked (defaulting to
/// no); a non-interactive session runs for real.
fn resolve_dry_run(flag: bool) -> Result<bool, HotspotError> {
    let dry_run = if flag {
        true
    } else if std::io::stdin().is_terminal() {
        dialoguer::Confirm::new()
            .with_prompt("Run in dry-run mode?")
            .default(false)
            .interact()
            .map_err(|err| {
                HotspotError::Io(std::io::Error::new(std::io::ErrorKind::Other, err))
            })?
    } else {
        false
    };
    if dry_run {
        log::warn!("dry-run mode: no changes will be made");
    }
    Ok(dry_run)
}
