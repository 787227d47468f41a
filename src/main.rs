use anyhow::Result;
use clap::Parser;
use log::{info, warn};
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use sensord_hal::config::HalConfig;
use sensord_hal::node::Resolver;
use sensord_hal::{create_devices, BoxedSensorDevice};
use std::os::fd::BorrowedFd;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// sensord-hal - sensor device probe and monitor for Linux mobile devices
#[derive(Parser, Debug, Clone)]
#[command(name = "sensord-hal")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Calibration file to load instead of the system default
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Root of the device tree to scan (for testing against a fake tree)
    #[arg(short = 'r', long = "root", value_name = "DIR", default_value = "/")]
    root: PathBuf,

    /// List detected sensors and exit
    #[arg(short = 'l', long = "list")]
    list: bool,

    /// Enable all sensors and print samples for the given number of seconds
    #[arg(short = 'W', long = "watch", value_name = "SECONDS")]
    watch: Option<u64>,

    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Level 0 (default): warn only; RUST_LOG overrides the CLI setting.
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("starting sensord-hal v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => HalConfig::load_from_path(path)?,
        None => HalConfig::load()?,
    };

    let resolver = Resolver::with_root(&cli.root);
    let mut devices = create_devices(&resolver, &config);
    if devices.is_empty() {
        warn!("no sensor devices found under {}", cli.root.display());
    }

    list_sensors(&devices);
    if cli.list {
        return Ok(());
    }

    if let Some(seconds) = cli.watch {
        watch(&mut devices, Duration::from_secs(seconds));
    }

    Ok(())
}

/// Print every detected sensor descriptor to stdout.
fn list_sensors(devices: &[BoxedSensorDevice]) {
    for device in devices {
        for sensor in device.sensors() {
            println!(
                "{:#010x}  {:<24} {:<20} {:<20} range [{}, {}] res {} min_interval {}ms{}",
                sensor.id,
                sensor.name,
                sensor.model_name,
                sensor.vendor,
                sensor.min_range,
                sensor.max_range,
                sensor.resolution,
                sensor.min_interval,
                if sensor.wakeup_supported { " wakeup" } else { "" },
            );
        }
    }
}

/// Enable every sensor, poll all device descriptors and print each sample
/// until the deadline passes.
fn watch(devices: &mut [BoxedSensorDevice], duration: Duration) {
    for device in devices.iter_mut() {
        for sensor in device.sensors() {
            if !device.enable(sensor.id) {
                warn!("could not enable {:#x} ({})", sensor.id, sensor.name);
            }
        }
    }

    let deadline = Instant::now() + duration;
    while Instant::now() < deadline {
        let fds: Vec<_> = devices.iter().map(|d| d.poll_fd()).collect();
        let mut poll_fds: Vec<PollFd> = fds
            .iter()
            .filter(|&&fd| fd >= 0)
            // The fds stay open for the life of `devices`, which outlives
            // this poll call.
            .map(|&fd| PollFd::new(unsafe { BorrowedFd::borrow_raw(fd) }, PollFlags::POLLIN))
            .collect();
        if poll_fds.is_empty() {
            break;
        }

        match poll(&mut poll_fds, PollTimeout::from(1000u16)) {
            Ok(0) | Err(_) => continue,
            Ok(_) => {}
        }

        for device in devices.iter_mut() {
            for id in device.read_fd() {
                if let Some(sample) = device.get_data(id) {
                    println!(
                        "{:#010x} t={} acc={} {:?}",
                        id,
                        sample.timestamp,
                        sample.accuracy.code(),
                        &sample.values[..sample.value_count],
                    );
                }
            }
        }
    }

    for device in devices.iter_mut() {
        for sensor in device.sensors() {
            device.disable(sensor.id);
        }
    }
}
