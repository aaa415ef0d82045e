//! sanwactl - diagnostics for the Sanwa two-port adapter.

#![deny(static_mut_refs)]
#![deny(clippy::unwrap_used)]

mod hid;
mod sink;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use hidapi::HidApi;
use sanwa_adapter::{AdapterConfig, SanwaAdapter};
use sanwa_hid_protocol::{HardwareRevision, PortIndex, PRODUCT_ID, VENDOR_ID, is_sanwa};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::hid::{HidapiTransport, identity_of};
use crate::sink::TracingSink;

const READ_TIMEOUT_MS: i32 = 50;
const MAX_REPORT_LEN: usize = 64;

/// Inspect and exercise a Sanwa two-port DualShock adapter.
#[derive(Parser)]
#[command(name = "sanwactl", version)]
struct Cli {
    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RevisionArg {
    Original,
    Rumble,
}

impl From<RevisionArg> for HardwareRevision {
    fn from(arg: RevisionArg) -> Self {
        match arg {
            RevisionArg::Original => HardwareRevision::Original,
            RevisionArg::Rumble => HardwareRevision::Rumble,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List HID devices, marking recognized adapters with '*'
    List,
    /// Decode live input from both ports and log changes
    Monitor {
        /// Stop after this many seconds (runs until interrupted if omitted)
        #[arg(long)]
        duration: Option<u64>,
        /// JSON adapter configuration
        #[arg(long, env = "SANWACTL_CONFIG")]
        config: Option<PathBuf>,
        /// Override the configured hardware revision
        #[arg(long, value_enum)]
        revision: Option<RevisionArg>,
    },
    /// Drive the rumble motors of one port
    Rumble {
        /// Port number printed on the adapter
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=2))]
        port: u8,
        /// Large motor level, 0-65535
        #[arg(long, default_value = "0")]
        strong: u16,
        /// Small motor level, 0-65535
        #[arg(long, default_value = "0")]
        weak: u16,
        /// Send an explicit stop after holding this long
        #[arg(long)]
        hold_ms: Option<u64>,
        /// JSON adapter configuration
        #[arg(long, env = "SANWACTL_CONFIG")]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>, revision: Option<RevisionArg>) -> Result<AdapterConfig> {
    let mut config = match path {
        Some(path) => AdapterConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => AdapterConfig::default(),
    };
    if let Some(revision) = revision {
        config.revision = revision.into();
    }
    Ok(config)
}

fn list_devices(api: &HidApi) -> Result<()> {
    let devices: Vec<_> = api.device_list().collect();
    if devices.is_empty() {
        println!("No HID devices found.");
        return Ok(());
    }
    println!("  {:<8} {:<8} {:<20} Product", "VID", "PID", "Manufacturer");
    println!("{}", "-".repeat(72));
    for dev in devices {
        let marker = if is_sanwa(dev.vendor_id(), dev.product_id()) {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} 0x{:04X}   0x{:04X}   {:<20} {}",
            dev.vendor_id(),
            dev.product_id(),
            dev.manufacturer_string().unwrap_or("(unknown)"),
            dev.product_string().unwrap_or("(unknown)"),
        );
    }
    Ok(())
}

fn open_adapter(
    api: &HidApi,
    config: &AdapterConfig,
) -> Result<SanwaAdapter<HidapiTransport, TracingSink>> {
    let info = api
        .device_list()
        .find(|dev| is_sanwa(dev.vendor_id(), dev.product_id()))
        .ok_or_else(|| anyhow!("No adapter found (VID=0x{VENDOR_ID:04X} PID=0x{PRODUCT_ID:04X})"))?;
    let identity = identity_of(info);
    let device = info
        .open_device(api)
        .with_context(|| format!("Failed to open {}", identity.path))?;

    SanwaAdapter::probe(
        identity,
        Arc::new(HidapiTransport::new(device)),
        TracingSink::new(),
        config,
    )
    .context("Failed to bring up adapter")
}

fn monitor(api: &HidApi, config: &AdapterConfig, duration: Option<Duration>) -> Result<()> {
    let mut adapter = open_adapter(api, config)?;
    let transport = Arc::clone(adapter.transport());
    let start = Instant::now();
    let mut buf = [0u8; MAX_REPORT_LEN];
    let mut reports = 0usize;

    info!("Monitoring {:?} adapter", adapter.revision());
    while duration.is_none_or(|limit| start.elapsed() < limit) {
        let len = transport
            .read_timeout(&mut buf, READ_TIMEOUT_MS)
            .context("Failed to read report")?;
        let Some(report) = buf.get(..len).filter(|report| !report.is_empty()) else {
            continue;
        };
        match adapter.on_report(report) {
            Ok(Some(_)) => reports = reports.saturating_add(1),
            Ok(None) => {}
            Err(err) => warn!("Skipping report {report:02X?}: {err}"),
        }
    }

    adapter.shutdown();
    println!("Decoded {reports} report(s).");
    Ok(())
}

fn rumble(
    api: &HidApi,
    config: &AdapterConfig,
    port: u8,
    strong: u16,
    weak: u16,
    hold: Option<Duration>,
) -> Result<()> {
    let port = PortIndex::from_number(port).ok_or_else(|| anyhow!("No port {port}"))?;
    if !config.revision.supports_rumble() {
        bail!("{:?} adapters have no rumble motors", config.revision);
    }
    let mut adapter = open_adapter(api, config)?;
    let dispatcher = adapter.rumble();

    let report = dispatcher
        .play(port, strong, weak)
        .with_context(|| format!("Failed to send rumble to {port}"))?;
    println!(
        "{port}: strong={} weak={} ({:02X?})",
        report.strong(),
        report.weak(),
        report.to_wire()
    );

    if let Some(hold) = hold {
        std::thread::sleep(hold);
        dispatcher
            .stop(port)
            .with_context(|| format!("Failed to stop rumble on {port}"))?;
        println!("{port}: stopped");
    }

    adapter.shutdown();
    Ok(())
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("sanwactl={log_level},sanwa_adapter={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let api = HidApi::new().context("Failed to initialize HidApi")?;

    match cli.command {
        Commands::List => list_devices(&api),
        Commands::Monitor {
            duration,
            config,
            revision,
        } => {
            let config = load_config(config.as_deref(), revision)?;
            monitor(&api, &config, duration.map(Duration::from_secs))
        }
        Commands::Rumble {
            port,
            strong,
            weak,
            hold_ms,
            config,
        } => {
            let config = load_config(config.as_deref(), None)?;
            rumble(
                &api,
                &config,
                port,
                strong,
                weak,
                hold_ms.map(Duration::from_millis),
            )
        }
    }
}

// ── BDD-style scenario tests ────────────────────────────────────────────────
