//! Sanwa rumble output report encoding.
//!
//! All functions are pure and allocation-free.
//!
//! # Protocol notes
//!
//! Each port owns one output report definition, addressed by the same report
//! ID as its input report. The payload is four bytes:
//!
//! ```text
//! Byte 0: mode      (0x01 = set motors)
//! Byte 1: reserved  (0x00)
//! Byte 2: strong    (large motor, 0x00–0xFF)
//! Byte 3: weak      (small motor, 0x00–0xFF)
//! ```
//!
//! The host expresses magnitudes on a 16-bit scale; they are truncated to
//! eight bits with `value * 255 / 65535`. A report with both motors at zero
//! is the stop command and is always sent, never elided.

use crate::types::PortIndex;

/// Wire size of the rumble payload (report id excluded).
pub const RUMBLE_REPORT_LEN: usize = 4;

/// Mode byte selecting "set motor levels".
pub const RUMBLE_MODE: u8 = 0x01;

/// Output report slot of one port on the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct OutputChannel {
    port: PortIndex,
}

impl OutputChannel {
    pub fn for_port(port: PortIndex) -> Self {
        Self { port }
    }

    /// Zero-based index into the device's output report definitions.
    pub fn index(self) -> usize {
        self.port.index()
    }

    /// Report ID to prefix when writing through a raw HID interface.
    pub fn report_id(self) -> u8 {
        self.port.report_id()
    }

    pub fn port(self) -> PortIndex {
        self.port
    }
}

/// Encoded rumble command bound to its output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RumbleReport {
    channel: OutputChannel,
    payload: [u8; RUMBLE_REPORT_LEN],
}

impl RumbleReport {
    pub fn channel(&self) -> OutputChannel {
        self.channel
    }

    pub fn as_bytes(&self) -> &[u8; RUMBLE_REPORT_LEN] {
        &self.payload
    }

    pub fn strong(&self) -> u8 {
        let [_, _, strong, _] = self.payload;
        strong
    }

    pub fn weak(&self) -> u8 {
        let [_, _, _, weak] = self.payload;
        weak
    }

    pub fn is_stop(&self) -> bool {
        self.strong() == 0 && self.weak() == 0
    }

    /// Payload prefixed with the channel's report id.
    pub fn to_wire(&self) -> [u8; RUMBLE_REPORT_LEN + 1] {
        let [mode, reserved, strong, weak] = self.payload;
        [self.channel.report_id(), mode, reserved, strong, weak]
    }
}

/// Rescale a 16-bit magnitude to the adapter's 8-bit range, truncating.
pub fn scale_magnitude(value: u16) -> u8 {
    let scaled = u32::from(value) * 255 / u32::from(u16::MAX);
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

/// Encode a rumble request for `port`, bound to that port's output channel.
pub fn encode_rumble(port: PortIndex, strong: u16, weak: u16) -> RumbleReport {
    RumbleReport {
        channel: OutputChannel::for_port(port),
        payload: [
            RUMBLE_MODE,
            0x00,
            scale_magnitude(strong),
            scale_magnitude(weak),
        ],
    }
}

/// Explicit stop command: mode 1 with both motors at zero.
pub fn encode_stop(port: PortIndex) -> RumbleReport {
    encode_rumble(port, 0, 0)
}
