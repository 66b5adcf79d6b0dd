// Inputinfo CLI
// Lists input devices and optionally watches hotplug events

use std::io::Read;
use std::os::raw::c_int;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::path::PathBuf;
use std::sync::mpsc::Receiver;

use anyhow::Context;
use clap::Parser;

use inputinfo_core::{
    DeviceEvent, DeviceSource, EventLoop, InputDevice, InputInfoManager, Settings, UdevSource,
};

/// Linux input device inventory
#[derive(Parser, Debug)]
#[command(name = "inputinfo")]
#[command(version)]
#[command(about = "List and watch Linux input devices", long_about = None)]
struct Args {
    /// TOML settings file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Only track these devices, by path or name (can be used multiple times)
    #[arg(short, long, value_name = "DEVICE")]
    devices: Vec<String>,

    /// Keep running and report hot-plugged devices
    #[arg(short, long)]
    watch: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

/// Load settings with precedence: CLI --devices > settings [devices].only
fn load_settings(args: &Args) -> anyhow::Result<Settings> {
    let mut settings = match &args.config {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => Settings::load_default().context("Failed to load default settings")?,
    };

    if !args.devices.is_empty() {
        settings.filter.only = args.devices.clone();
    }

    Ok(settings)
}

fn format_device(device: &InputDevice) -> String {
    let mut line = format!("{}: {} [{}]", device.path, device.name, device.types);
    if let (Some(vendor), Some(product)) = (device.vendor_id, device.product_id) {
        line.push_str(&format!(" {:04x}:{:04x}", vendor, product));
    }
    line
}

fn print_devices<S: DeviceSource>(manager: &InputInfoManager<S>) {
    let devices = manager.devices();
    println!("Found {} input device(s):", devices.len());
    for device in &devices {
        println!("  {}", format_device(device));
    }
}

fn print_notifications<S: DeviceSource>(
    manager: &InputInfoManager<S>,
    notifications: &Receiver<DeviceEvent>,
) {
    while let Ok(event) = notifications.try_recv() {
        match event {
            DeviceEvent::Added(path) => match manager.device(&path) {
                Some(device) => println!("+ {}", format_device(&device)),
                // Removed again within the same drain
                None => println!("+ {}", path),
            },
            DeviceEvent::Removed(path) => println!("- {}", path),
            DeviceEvent::Ready { .. } => {}
        }
    }
}

/// Signal self-pipe: the handler writes a byte, the event loop polls the read end
fn signal_pipe(signals: &[c_int]) -> anyhow::Result<UnixStream> {
    let (read_end, write_end) = UnixStream::pair().context("Failed to create signal pipe")?;
    read_end.set_nonblocking(true)?;
    write_end.set_nonblocking(true)?;
    for &signal in signals {
        signal_hook::low_level::pipe::register(signal, write_end.try_clone()?)
            .with_context(|| format!("Failed to install handler for signal {}", signal))?;
    }
    Ok(read_end)
}

/// Consume pending wakeup bytes so the next poll blocks again
fn drain_pipe(mut pipe: &UnixStream) {
    let mut buf = [0u8; 32];
    while let Ok(n) = pipe.read(&mut buf) {
        if n == 0 {
            break;
        }
    }
}

fn watch<S: DeviceSource>(manager: &mut InputInfoManager<S>, settings: &Settings) -> anyhow::Result<()> {
    use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};

    let stop = signal_pipe(&[SIGINT, SIGTERM])?;
    let rescan = signal_pipe(&[SIGHUP])?;

    let notifications = manager.subscribe();
    let event_loop = EventLoop::from_settings(&settings.monitor);
    log::debug!("Watching for hotplug events (timeout {}ms)", event_loop.timeout_ms());

    loop {
        let outcome =
            event_loop.poll_with_wakers(manager, &[stop.as_raw_fd(), rescan.as_raw_fd()])?;

        if outcome.woke(rescan.as_raw_fd()) {
            drain_pipe(&rescan);
            log::info!("Rescanning input devices");
            if let Err(e) = manager.rescan() {
                log::warn!("Rescan failed: {}", e);
            }
        }

        print_notifications(manager, &notifications);

        if outcome.woke(stop.as_raw_fd()) {
            break;
        }
    }

    println!("Shutting down");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let settings = load_settings(&args)?;
    if let Some(path) = settings.source_path() {
        log::debug!("Loaded settings from {}", path.display());
    }

    let source = UdevSource::with_settings(&settings.monitor);
    let mut manager = InputInfoManager::with_settings(source, &settings);
    manager
        .initialize()
        .context("Failed to start input device monitor")?;

    print_devices(&manager);

    if args.watch {
        watch(&mut manager, &settings)?;
    }

    Ok(())
}
