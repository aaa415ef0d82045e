//! hidapi-backed transport.

use hidapi::{DeviceInfo, HidDevice};
use parking_lot::Mutex;
use sanwa_adapter::{Transport, TransportError};
use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{OutputChannel, RUMBLE_REPORT_LEN};
use tracing::trace;

/// Raw HID session with the adapter. Reads and writes share one handle.
pub struct HidapiTransport {
    device: Mutex<HidDevice>,
}

impl HidapiTransport {
    pub fn new(device: HidDevice) -> Self {
        Self {
            device: Mutex::new(device),
        }
    }

    /// Read one input report, waiting at most `timeout_ms`. Returns 0 on timeout.
    pub fn read_timeout(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        self.device
            .lock()
            .read_timeout(buf, timeout_ms)
            .map_err(|err| TransportError::Read(err.to_string()))
    }
}

impl Transport for HidapiTransport {
    fn write(&self, channel: OutputChannel, payload: &[u8]) -> Result<(), TransportError> {
        let mut report = Vec::with_capacity(RUMBLE_REPORT_LEN.saturating_add(1));
        report.push(channel.report_id());
        report.extend_from_slice(payload);
        trace!("hid write {report:02X?}");

        let written = self
            .device
            .lock()
            .write(&report)
            .map_err(|err| TransportError::Write {
                report_id: channel.report_id(),
                reason: err.to_string(),
            })?;
        if written < report.len() {
            return Err(TransportError::Write {
                report_id: channel.report_id(),
                reason: format!("short write: {written} of {} bytes", report.len()),
            });
        }
        Ok(())
    }
}

/// Identity record for an enumerated hidapi device.
pub fn identity_of(info: &DeviceInfo) -> HidDeviceInfo {
    let mut identity = HidDeviceInfo::new(
        info.vendor_id(),
        info.product_id(),
        info.path().to_string_lossy(),
    )
    .with_version(info.release_number());
    if let Some(serial) = info.serial_number() {
        identity = identity.with_serial(serial);
    }
    if let Some(manufacturer) = info.manufacturer_string() {
        identity = identity.with_manufacturer(manufacturer);
    }
    if let Some(product) = info.product_string() {
        identity = identity.with_product_name(product);
    }
    identity
}
