//! Buffered IIO wire format decoding.
//!
//! IIO drivers deliver one fixed-width little-endian binary record per read.
//! The layout is a strict byte contract with the kernel driver: field widths,
//! offsets and byte order must match exactly, and a read of any other length
//! is a decode failure.

use std::fs::File;
use std::io::Read;
use std::os::fd::AsFd;

use log::error;
use nix::poll::{poll, PollFd, PollFlags, PollTimeout};
use sensord_hal_types::RawSample;

/// Fixed record layout of the resolved IIO data node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IioLayout {
    /// Three signed 16-bit axes followed by a 64-bit timestamp (14 bytes).
    TriAxis16,
    /// One signed 16-bit state value followed by a 64-bit timestamp (10 bytes).
    Scalar16,
}

impl IioLayout {
    /// Exact record size in bytes.
    pub fn record_size(self) -> usize {
        match self {
            IioLayout::TriAxis16 => 14,
            IioLayout::Scalar16 => 10,
        }
    }
}

/// Extract axis values and the hardware timestamp from one complete record.
///
/// Fails unless `buf` is exactly one record. Pure, so the byte contract is
/// testable without a device node.
pub fn parse_iio_record(layout: IioLayout, buf: &[u8], sample: &mut RawSample) -> bool {
    if buf.len() != layout.record_size() {
        error!(
            "iio record length mismatch: read {} bytes, expected {}",
            buf.len(),
            layout.record_size()
        );
        return false;
    }

    sample.begin_cycle();
    let ts_offset = match layout {
        IioLayout::TriAxis16 => {
            sample.set_axis(0, i16::from_le_bytes([buf[0], buf[1]]).into());
            sample.set_axis(1, i16::from_le_bytes([buf[2], buf[3]]).into());
            sample.set_axis(2, i16::from_le_bytes([buf[4], buf[5]]).into());
            6
        }
        IioLayout::Scalar16 => {
            sample.set_axis(0, i16::from_le_bytes([buf[0], buf[1]]).into());
            2
        }
    };

    let ts = i64::from_le_bytes(
        buf[ts_offset..ts_offset + 8]
            .try_into()
            .expect("timestamp slice"),
    );
    sample.fired_time = ts as u64;
    true
}

/// Run one buffered-IIO decode cycle against the open data node.
///
/// Waits indefinitely for readiness (the surrounding event loop has already
/// confirmed the descriptor is readable, so the wait returns immediately in
/// practice), then reads and parses exactly one record. Poll errors and
/// short reads are transient failures for this cycle.
pub fn decode_iio(file: &mut File, layout: IioLayout, sample: &mut RawSample) -> bool {
    let mut fds = [PollFd::new(
        file.as_fd(),
        PollFlags::POLLIN | PollFlags::POLLERR,
    )];

    match poll(&mut fds, PollTimeout::NONE) {
        Ok(0) => {
            error!("poll timeout on iio node");
            return false;
        }
        Ok(_) => {}
        Err(e) => {
            error!("poll error on iio node: {}", e);
            return false;
        }
    }

    let revents = fds[0].revents().unwrap_or(PollFlags::empty());
    if revents.contains(PollFlags::POLLERR) {
        error!("poll exception on iio node");
        return false;
    }
    if !revents.contains(PollFlags::POLLIN) {
        error!("iio node not readable after poll");
        return false;
    }

    let mut buf = [0u8; 14];
    let record = &mut buf[..layout.record_size()];
    match file.read(record) {
        Ok(n) if n == layout.record_size() => {
            let mut scratch = *sample;
            if parse_iio_record(layout, record, &mut scratch) {
                *sample = scratch;
                true
            } else {
                false
            }
        }
        Ok(n) => {
            error!("short iio read: {} of {} bytes", n, layout.record_size());
            false
        }
        Err(e) => {
            error!("iio read failed: {}", e);
            false
        }
    }
}
