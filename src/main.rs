use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use devwipe::bridge::AdbBridge;
use devwipe::discovery::{DeviceListing, TargetDiscovery};
use devwipe::verification::Verifier;
use devwipe::*;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "devwipe")]
#[command(about = "Discover Android devices and local volumes, wipe them and verify the result")]
#[command(version = "1.0.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Device-bridge executable
    #[arg(long, global = true, env = "DEVWIPE_BRIDGE", default_value = "adb")]
    bridge: String,

    /// Bridge command timeout in milliseconds
    #[arg(long, global = true, env = "DEVWIPE_TIMEOUT_MS", default_value = "10000")]
    timeout_ms: u64,

    /// Directory cleared by a safe wipe of a host target (defaults to the system temp dir)
    #[arg(long, global = true, env = "DEVWIPE_TEMP_ROOT")]
    temp_root: Option<PathBuf>,

    /// Device storage root removed by a full device wipe
    #[arg(long, global = true, env = "DEVWIPE_DEVICE_ROOT", default_value = "/sdcard")]
    device_root: String,

    /// Always report local volumes alongside bridge devices
    #[arg(long, global = true, env = "DEVWIPE_MERGE_LISTING")]
    merge_listing: bool,

    /// Query each authorized device for its model and shell availability
    #[arg(long, global = true, env = "DEVWIPE_PROBE")]
    probe: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List bridge devices and local volumes
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Wipe a device serial or host path
    Wipe {
        /// Device serial, drive root or directory
        target: String,

        /// Wipe level (safe, full)
        #[arg(short, long, default_value = "safe")]
        level: WipeLevel,

        /// Skip the confirmation prompt for full wipes
        #[arg(long)]
        yes: bool,
    },

    /// Report files remaining under a path
    Verify {
        /// Path to scan
        target: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Serve the HTTP API
    Serve {
        /// Address to bind
        #[arg(long, env = "DEVWIPE_BIND", default_value = server::DEFAULT_BIND)]
        bind: SocketAddr,
    },
}

impl Cli {
    fn wipe_config(&self) -> WipeConfig {
        let defaults = WipeConfig::default();
        WipeConfig {
            bridge_program: self.bridge.clone(),
            command_timeout: Duration::from_millis(self.timeout_ms),
            temp_root: self.temp_root.clone().unwrap_or(defaults.temp_root),
            device_public_root: self.device_root.clone(),
            listing_policy: if self.merge_listing {
                ListingPolicy::Merge
            } else {
                ListingPolicy::Fallback
            },
            probe_capabilities: self.probe,
            ..defaults
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "devwipe=debug,tower_http=debug" } else { "devwipe=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.wipe_config();

    match &cli.command {
        Commands::List { json } => {
            let listing = tokio::task::spawn_blocking(move || {
                let bridge = Arc::new(AdbBridge::from_config(&config));
                TargetDiscovery::new(config, bridge).listing()
            })
            .await
            .context("discovery task failed")?;
            print_listing(&listing, *json)?;
        }
        Commands::Wipe { target, level, yes } => {
            if *level == WipeLevel::Full && !yes && !confirm_full_wipe(target)? {
                println!("Operation cancelled.");
                return Ok(());
            }

            let request = WipeRequest {
                target_id: target.clone(),
                level: *level,
            };
            let result = tokio::task::spawn_blocking(move || {
                WipeOrchestrator::new(config).execute(&request)
            })
            .await
            .context("wipe task failed")?;

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Verify { target, json } => {
            let path = target.clone();
            let result = tokio::task::spawn_blocking(move || Verifier::verify(&path))
                .await
                .context("verification task failed")?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                for file in &result.remaining_files {
                    println!("{}", file);
                }
                println!("{} file(s) remaining under {}", result.files_remaining, target);
            }
        }
        Commands::Serve { bind } => {
            server::serve(*bind, config).await?;
        }
    }

    Ok(())
}

fn confirm_full_wipe(target: &str) -> Result<bool> {
    println!(
        "\nWARNING: This will permanently delete ALL user data on {}",
        target
    );
    print!("Type 'YES' to confirm: ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim() == "YES")
}

fn print_listing(listing: &DeviceListing, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
        return Ok(());
    }

    if listing.phones.is_empty() {
        println!("No bridge devices detected.");
    } else {
        println!("{:<24} {:<24} {:<14} {:<8}", "Serial", "Name", "State", "Wipe");
        println!("{}", "-".repeat(72));
        for phone in &listing.phones {
            println!(
                "{:<24} {:<24} {:<14} {:<8}",
                truncate_string(&phone.serial, 24),
                truncate_string(&phone.name, 24),
                format!("{:?}", phone.adb_status),
                if phone.adb_status.can_wipe() { "yes" } else { "no" }
            );
            if !phone.adb_status.can_wipe() {
                println!("    {}", phone.details);
            }
        }
    }

    if let Some(drives) = &listing.drives {
        if let Some(pc_name) = &listing.pc_name {
            println!("\nHost: {}", pc_name);
        }
        if drives.is_empty() {
            println!("No local volumes detected.");
        } else {
            println!(
                "{:<20} {:<24} {:<10} {:<16} {:<10}",
                "Device", "Mountpoint", "FS", "Label", "Size"
            );
            println!("{}", "-".repeat(84));
            for drive in drives {
                println!(
                    "{:<20} {:<24} {:<10} {:<16} {:<10}",
                    truncate_string(&drive.device, 20),
                    truncate_string(&drive.mountpoint, 24),
                    drive.fstype,
                    truncate_string(&drive.name, 16),
                    format!("{}GB", drive.total_bytes / (1024 * 1024 * 1024))
                );
            }
        }
    }

    Ok(())
}

fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
