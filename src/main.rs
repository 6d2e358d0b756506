use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::{info, warn, LevelFilter};
use serde::Serialize;
use serde_json::json;
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use device_snapshot::config::{load_or_create_config, SnapshotConfig};
use device_snapshot::privileges;
use device_snapshot::report::{
    AndroidReport, HardwareReport, IosReport, OperatingSystemReport, SnapshotReport,
};
use device_snapshot::snapshot::{DesktopInfo, DeviceSnapshot, PlatformInfo};

mod cli;

use cli::{Args, Commands};

fn main() -> Result<()> {
    let args = Args::parse();

    initialize_logging(args.verbose)?;

    let command = args.command.as_ref().unwrap_or(&Commands::Summary);
    if let Commands::InitConfig { path } = command {
        info!("Creating default configuration file at {}", path.display());
        SnapshotConfig::create_default_config_file(path)?;
        info!("Configuration created successfully");
        return Ok(());
    }

    let config = load_or_create_config(args.config.as_deref())?;
    check_privileges();

    let snapshot = DeviceSnapshot::from_config(&config);
    let output = render(command, &snapshot)?;
    write_output(args.output.as_deref(), &output)
}

/// Initialize logging with the specified verbosity level.
///
/// Log lines go to stderr so that stdout carries only JSON.
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

fn check_privileges() {
    if !privileges::is_elevated() {
        warn!("Running without elevated privileges; some process details may be missing");
        warn!("{}", privileges::elevation_instructions());
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")
}

fn desktop(snapshot: &DeviceSnapshot) -> Result<&DesktopInfo> {
    snapshot.info().as_desktop().ok_or_else(|| {
        anyhow!(
            "this command needs a desktop operating system, not {:?}",
            snapshot.platform()
        )
    })
}

/// Run the query behind `command` and render it as pretty JSON
fn render(command: &Commands, snapshot: &DeviceSnapshot) -> Result<String> {
    match command {
        Commands::Summary => SnapshotReport::collect(snapshot).to_json(),
        Commands::Os => {
            let (section, errors) =
                OperatingSystemReport::collect(desktop(snapshot)?.operating_system());
            to_json(&json!({ "operating_system": section, "errors": errors }))
        }
        Commands::Processes { pid } => {
            let os = desktop(snapshot)?.operating_system();
            let processes = if pid.is_empty() {
                os.processes()?
            } else {
                os.processes_by_pid(pid)?
            };
            info!("Read {} processes", processes.len());
            to_json(&processes)
        }
        Commands::Process { pid } => to_json(&desktop(snapshot)?.operating_system().process(*pid)?),
        Commands::Services => to_json(&desktop(snapshot)?.operating_system().services()?),
        Commands::Sessions => to_json(&desktop(snapshot)?.operating_system().sessions()?),
        Commands::Windows { visible_only } => to_json(
            &desktop(snapshot)?
                .operating_system()
                .desktop_windows(*visible_only)?,
        ),
        Commands::Network => {
            let desktop = desktop(snapshot)?;
            to_json(&json!({
                "network_params": desktop.operating_system().network_params()?,
                "interfaces": desktop.hardware().network_interfaces()?,
            }))
        }
        Commands::Protocols => to_json(
            desktop(snapshot)?
                .operating_system()
                .internet_protocol_stats()?,
        ),
        Commands::Hardware => {
            let (section, errors) = HardwareReport::collect(desktop(snapshot)?.hardware());
            to_json(&json!({ "hardware": section, "errors": errors }))
        }
        Commands::Device => match snapshot.info() {
            PlatformInfo::Android(android) => {
                let (section, errors) = AndroidReport::collect(android);
                to_json(&json!({ "android": section, "errors": errors }))
            }
            PlatformInfo::Ios(ios) => {
                let (section, errors) = IosReport::collect(ios);
                to_json(&json!({ "ios": section, "errors": errors }))
            }
            PlatformInfo::Desktop(_) => Err(anyhow!(
                "device details are only available on Android and iOS"
            )),
        },
        Commands::InitConfig { .. } => Err(anyhow!("init-config does not produce a snapshot")),
    }
}

fn write_output(path: Option<&Path>, output: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
            fs::write(path, output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Wrote snapshot to {}", path.display());
        }
        None => println!("{}", output),
    }
    Ok(())
}
