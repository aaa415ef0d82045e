//! Raw input report builders.
//!
//! Fixtures speak bytes only, so they can feed both the protocol decoder
//! and the adapter without depending on either.

use sanwa_hid_common::ReportBuilder;

/// Hat code for "released".
pub const HAT_RELEASED: u8 = 0x08;

/// Builder for an 8-byte adapter input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputReportFixture {
    pub report_id: u8,
    pub axes: [u8; 4],
    pub hat: u8,
    pub face: u8,
    pub byte1: u8,
}

impl InputReportFixture {
    /// Neutral report for the given socket: sticks centred, nothing pressed.
    pub fn neutral(report_id: u8) -> Self {
        Self {
            report_id,
            axes: [0x80; 4],
            hat: HAT_RELEASED,
            face: 0,
            byte1: 0,
        }
    }

    pub fn axes(mut self, axes: [u8; 4]) -> Self {
        self.axes = axes;
        self
    }

    pub fn hat(mut self, code: u8) -> Self {
        self.hat = code;
        self
    }

    /// Set the face nibble (bit 0 = face A ... bit 3 = face D).
    pub fn face(mut self, nibble: u8) -> Self {
        self.face = nibble;
        self
    }

    pub fn byte1(mut self, bits: u8) -> Self {
        self.byte1 = bits;
        self
    }

    /// Set the whole first button byte, overriding hat and face.
    pub fn byte0(mut self, value: u8) -> Self {
        self.hat = value & 0x0F;
        self.face = value >> 4;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut builder = ReportBuilder::with_capacity(8);
        builder
            .write_u8(self.report_id)
            .write_bytes(&self.axes)
            .write_u8((self.face << 4) | (self.hat & 0x0F))
            .write_u8(self.byte1)
            .write_u8(0x00);
        builder.into_inner()
    }
}
