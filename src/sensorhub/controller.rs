//! Owner of the sensorhub combined device node.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::{Path, PathBuf};

use log::{error, info, warn};
use sensord_hal_core::HubTransport;

const HUB_DATA_NODE: &str = "dev/ssp_sensorhub";

/// Controller for the sensorhub coprocessor.
///
/// Owns the combined data-node descriptor for its lifetime and mediates all
/// traffic with the hub: the host polls [`poll_fd`](Self::poll_fd), the
/// owning device pulls combined buffers through
/// [`read_stream`](Self::read_stream), and sub-sensors send firmware
/// commands through the [`HubTransport`] it implements.
pub struct SensorhubController {
    data_node: PathBuf,
    file: Option<File>,
    writable: bool,
    enabled: bool,
}

impl SensorhubController {
    /// Open the hub data node under a filesystem root. A missing node is
    /// not fatal here; the factory checks [`is_available`](Self::is_available)
    /// before building the hub device.
    pub fn open(root: impl AsRef<Path>) -> Self {
        let data_node = root.as_ref().join(HUB_DATA_NODE);

        let (file, writable) = match OpenOptions::new().read(true).write(true).open(&data_node) {
            Ok(file) => (Some(file), true),
            Err(_) => match File::open(&data_node) {
                Ok(file) => {
                    warn!("hub node {} is read-only", data_node.display());
                    (Some(file), false)
                }
                Err(e) => {
                    info!("no sensorhub node at {}: {}", data_node.display(), e);
                    (None, false)
                }
            },
        };

        Self {
            data_node,
            file,
            writable,
            enabled: false,
        }
    }

    /// Whether the hub data node was present and opened.
    pub fn is_available(&self) -> bool {
        self.file.is_some()
    }

    /// Descriptor of the combined data node, or -1 without one.
    pub fn poll_fd(&self) -> RawFd {
        self.file.as_ref().map_or(-1, |f| f.as_raw_fd())
    }

    pub fn enable(&mut self) -> bool {
        self.enabled = true;
        info!("sensorhub enabled");
        true
    }

    pub fn disable(&mut self) -> bool {
        self.enabled = false;
        info!("sensorhub disabled");
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Read one combined byte stream from the hub into `buf`. Returns the
    /// declared length, or `None` on a transient read failure (the next
    /// poll cycle reads fresh data).
    pub fn read_stream(&mut self, buf: &mut [u8]) -> Option<usize> {
        let file = self.file.as_mut()?;
        match file.read(buf) {
            Ok(0) => None,
            Ok(n) => Some(n),
            Err(e) => {
                error!("hub read failed on {}: {}", self.data_node.display(), e);
                None
            }
        }
    }
}

impl HubTransport for SensorhubController {
    fn send_command(&mut self, data: &[u8]) -> bool {
        if !self.writable {
            warn!("hub command dropped, {} not writable", self.data_node.display());
            return false;
        }
        let Some(file) = self.file.as_mut() else {
            return false;
        };
        match file.write_all(data) {
            Ok(()) => true,
            Err(e) => {
                error!("hub command write failed: {}", e);
                false
            }
        }
    }
}
