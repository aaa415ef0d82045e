//! Sanwa input report parsing and normalisation.
//!
//! # Report layout
//! | Offset | Size | Field          | Encoding                                   |
//! |--------|------|----------------|--------------------------------------------|
//! | 0      | u8   | report id      | 1 = port 1, 2 = port 2                     |
//! | 1–4    | 4×u8 | axes           | 0–255 each, meaning set by [`AxisLayout`]  |
//! | 5      | u8   | buttons 0      | bits 0–3 hat code, bits 4–7 face A–D       |
//! | 6      | u8   | buttons 1      | L1, L2, R1, R2, Select, Start, L3, R3      |
//! | 7      | u8   | buttons 2      | unused                                     |
//!
//! Axis bytes pass through untouched: no scaling, no deadzone.

use crate::hat::{HAT_MASK, HatDirection};
use crate::types::{
    AXIS_BYTES, AxisId, AxisLayout, BUTTON_COUNT, ButtonId, ButtonMap, HardwareRevision, PortIndex,
};
use crate::{SanwaError, SanwaResult};
use sanwa_hid_common::ReportParser;
use serde::{Deserialize, Serialize};

/// Full input report length in bytes, report id included.
pub const REPORT_LEN: usize = 8;

/// Number of button bytes following the axes.
pub const BUTTON_BYTES: usize = 3;

const FACE_SHIFT: u32 = 4;

/// Raw fields of one input report, before any mapping is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanwaInputReport {
    pub port: PortIndex,
    pub axes: [u8; AXIS_BYTES],
    pub buttons: [u8; BUTTON_BYTES],
}

impl SanwaInputReport {
    /// Raw hat code (low nibble of the first button byte), not yet clamped.
    pub fn hat_code(&self) -> u8 {
        let [byte0, _, _] = self.buttons;
        byte0 & HAT_MASK
    }

    /// The 12 logical button bits packed into a `u16`, bit `i` matching
    /// entry `i` of a [`ButtonMap`].
    pub fn button_bits(&self) -> u16 {
        let [byte0, byte1, _] = self.buttons;
        u16::from(byte0 >> FACE_SHIFT) | (u16::from(byte1) << FACE_SHIFT)
    }
}

/// Parse a raw input report.
///
/// The report id is checked before the length so that traffic for an
/// unknown port is always classified as [`SanwaError::UnknownPort`].
pub fn parse_input_report(data: &[u8]) -> SanwaResult<SanwaInputReport> {
    let mut parser = ReportParser::new(data);
    let Ok(report_id) = parser.peek_u8() else {
        return Err(SanwaError::ReportTooShort {
            expected: REPORT_LEN,
            actual: 0,
        });
    };
    let port = PortIndex::from_report_id(report_id).ok_or(SanwaError::UnknownPort(report_id))?;
    parser.skip(1);

    if data.len() < REPORT_LEN {
        return Err(SanwaError::ReportTooShort {
            expected: REPORT_LEN,
            actual: data.len(),
        });
    }

    let axes = parser.read_array::<AXIS_BYTES>()?;
    let buttons = parser.read_array::<BUTTON_BYTES>()?;

    Ok(SanwaInputReport {
        port,
        axes,
        buttons,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSample {
    pub axis: AxisId,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSample {
    pub button: ButtonId,
    pub pressed: bool,
}

/// A single normalised input event, in host terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InputEvent {
    Axis { axis: AxisId, value: i32 },
    Button { button: ButtonId, pressed: bool },
}

/// Complete observable state of one port after a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSnapshot {
    pub axes: [AxisSample; AXIS_BYTES],
    pub hat: HatDirection,
    pub buttons: [ButtonSample; BUTTON_COUNT],
}

impl PortSnapshot {
    pub fn axis(&self, axis: AxisId) -> Option<u8> {
        self.axes
            .iter()
            .find(|sample| sample.axis == axis)
            .map(|sample| sample.value)
    }

    pub fn is_pressed(&self, button: ButtonId) -> bool {
        self.buttons
            .iter()
            .any(|sample| sample.button == button && sample.pressed)
    }

    pub fn pressed_count(&self) -> usize {
        self.buttons.iter().filter(|sample| sample.pressed).count()
    }

    /// Events describing this snapshot: payload axes in layout order, the
    /// two hat axes, then every button in bit order.
    pub fn events(&self) -> impl Iterator<Item = InputEvent> + '_ {
        let (hat_x, hat_y) = self.hat.axes();
        let axes = self.axes.iter().map(|sample| InputEvent::Axis {
            axis: sample.axis,
            value: i32::from(sample.value),
        });
        let hat = [
            InputEvent::Axis {
                axis: AxisId::Hat0X,
                value: i32::from(hat_x),
            },
            InputEvent::Axis {
                axis: AxisId::Hat0Y,
                value: i32::from(hat_y),
            },
        ];
        let buttons = self.buttons.iter().map(|sample| InputEvent::Button {
            button: sample.button,
            pressed: sample.pressed,
        });
        axes.chain(hat).chain(buttons)
    }
}

/// Report decoded and attributed to a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedReport {
    pub port: PortIndex,
    pub snapshot: PortSnapshot,
}

/// Turns raw reports into [`PortSnapshot`]s for one adapter revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputDecoder {
    layout: AxisLayout,
    buttons: ButtonMap,
}

impl InputDecoder {
    pub fn new(revision: HardwareRevision) -> Self {
        Self {
            layout: revision.axis_layout(),
            buttons: ButtonMap::default(),
        }
    }

    pub fn with_axis_layout(mut self, layout: AxisLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_button_map(mut self, buttons: ButtonMap) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn axis_layout(&self) -> &AxisLayout {
        &self.layout
    }

    pub fn button_map(&self) -> &ButtonMap {
        &self.buttons
    }

    /// Parse and normalise one report into a fully populated snapshot.
    pub fn decode(&self, data: &[u8]) -> SanwaResult<DecodedReport> {
        let report = parse_input_report(data)?;
        Ok(DecodedReport {
            port: report.port,
            snapshot: self.normalize(&report),
        })
    }

    pub fn normalize(&self, report: &SanwaInputReport) -> PortSnapshot {
        let axis_ids = self.layout.axes();
        let axes = core::array::from_fn(|i| AxisSample {
            axis: axis_ids.get(i).copied().unwrap_or(AxisId::X),
            value: report.axes.get(i).copied().unwrap_or(0),
        });

        let bits = report.button_bits();
        let button_ids = self.buttons.buttons();
        let buttons = core::array::from_fn(|i| ButtonSample {
            button: button_ids.get(i).copied().unwrap_or(ButtonId::South),
            pressed: bits & (1u16 << i) != 0,
        });

        PortSnapshot {
            axes,
            hat: HatDirection::from_code(report.hat_code()),
            buttons,
        }
    }
}

impl Default for InputDecoder {
    fn default() -> Self {
        Self::new(HardwareRevision::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: u8, axes: [u8; 4], b0: u8, b1: u8) -> [u8; REPORT_LEN] {
        [id, axes[0], axes[1], axes[2], axes[3], b0, b1, 0x00]
    }

    #[test]
    fn parse_too_short() {
        assert_eq!(
            parse_input_report(&[]),
            Err(SanwaError::ReportTooShort {
                expected: REPORT_LEN,
                actual: 0
            })
        );
        assert_eq!(
            parse_input_report(&[0x01, 0x80, 0x80]),
            Err(SanwaError::ReportTooShort {
                expected: REPORT_LEN,
                actual: 3
            })
        );
    }

    #[test]
    fn parse_unknown_port_checked_before_length() {
        assert_eq!(parse_input_report(&[0x03]), Err(SanwaError::UnknownPort(3)));
        assert_eq!(
            parse_input_report(&report(0x00, [0; 4], 0x08, 0)),
            Err(SanwaError::UnknownPort(0))
        );
    }

    #[test]
    fn parse_skips_report_id() -> SanwaResult<()> {
        let parsed = parse_input_report(&report(0x02, [1, 2, 3, 4], 0xA5, 0x5A))?;
        assert_eq!(parsed.port, PortIndex::Two);
        assert_eq!(parsed.axes, [1, 2, 3, 4]);
        assert_eq!(parsed.buttons, [0xA5, 0x5A, 0x00]);
        assert_eq!(parsed.hat_code(), 0x05);
        assert_eq!(parsed.button_bits(), 0x5AA);
        Ok(())
    }

    #[test]
    fn trailing_bytes_are_ignored() -> SanwaResult<()> {
        let mut data = report(0x01, [9, 8, 7, 6], 0x08, 0).to_vec();
        data.extend_from_slice(&[0xFF; 8]);
        let parsed = parse_input_report(&data)?;
        assert_eq!(parsed.axes, [9, 8, 7, 6]);
        Ok(())
    }

    #[test]
    fn axes_pass_through_verbatim() -> SanwaResult<()> {
        let decoder = InputDecoder::new(HardwareRevision::Rumble);
        let decoded = decoder.decode(&report(0x01, [0x00, 0xFF, 0x80, 0x7F], 0x08, 0))?;
        assert_eq!(decoded.snapshot.axis(AxisId::X), Some(0x00));
        assert_eq!(decoded.snapshot.axis(AxisId::Y), Some(0xFF));
        assert_eq!(decoded.snapshot.axis(AxisId::Rx), Some(0x80));
        assert_eq!(decoded.snapshot.axis(AxisId::Ry), Some(0x7F));
        assert_eq!(decoded.snapshot.axis(AxisId::Z), None);
        Ok(())
    }

    #[test]
    fn original_revision_routes_second_pair_to_z_rz() -> SanwaResult<()> {
        let decoder = InputDecoder::new(HardwareRevision::Original);
        let decoded = decoder.decode(&report(0x01, [1, 2, 3, 4], 0x08, 0))?;
        assert_eq!(decoded.snapshot.axis(AxisId::Z), Some(3));
        assert_eq!(decoded.snapshot.axis(AxisId::Rz), Some(4));
        assert_eq!(decoded.snapshot.axis(AxisId::Rx), None);
        Ok(())
    }

    #[test]
    fn hat_code_above_eight_is_centered() -> SanwaResult<()> {
        let decoder = InputDecoder::default();
        for code in 9u8..=15 {
            let decoded = decoder.decode(&report(0x01, [0; 4], code, 0))?;
            assert_eq!(decoded.snapshot.hat, HatDirection::Centered);
        }
        Ok(())
    }

    #[test]
    fn face_button_c_with_hat_up_right() -> SanwaResult<()> {
        let decoder = InputDecoder::default();
        let decoded = decoder.decode(&report(0x01, [0x80; 4], 0b0100_0001, 0b0000_0001))?;
        let snapshot = decoded.snapshot;

        assert_eq!(decoded.port, PortIndex::One);
        assert_eq!(snapshot.hat.axes(), (1, -1));
        // face C is bit 6 -> BTN_EAST under the default map
        assert!(snapshot.is_pressed(ButtonId::East));
        assert!(!snapshot.is_pressed(ButtonId::West));
        assert!(!snapshot.is_pressed(ButtonId::North));
        assert!(!snapshot.is_pressed(ButtonId::South));
        assert!(snapshot.is_pressed(ButtonId::Tl));
        assert_eq!(snapshot.pressed_count(), 2);
        Ok(())
    }

    #[test]
    fn cross_wired_face_buttons() -> SanwaResult<()> {
        let default = InputDecoder::default();
        let literal = InputDecoder::default().with_button_map(ButtonMap::literal());
        // face B only
        let data = report(0x01, [0; 4], 0b0010_1000, 0);

        assert!(default.decode(&data)?.snapshot.is_pressed(ButtonId::North));
        assert!(literal.decode(&data)?.snapshot.is_pressed(ButtonId::South));
        Ok(())
    }

    #[test]
    fn events_follow_emission_order() -> SanwaResult<()> {
        let decoder = InputDecoder::new(HardwareRevision::Rumble);
        let decoded = decoder.decode(&report(0x02, [10, 20, 30, 40], 0x06, 0x80))?;
        let events: Vec<InputEvent> = decoded.snapshot.events().collect();

        assert_eq!(events.len(), 4 + 2 + BUTTON_COUNT);
        assert_eq!(
            events.first(),
            Some(&InputEvent::Axis {
                axis: AxisId::X,
                value: 10
            })
        );
        assert_eq!(
            events.get(4..6),
            Some(
                &[
                    InputEvent::Axis {
                        axis: AxisId::Hat0X,
                        value: -1
                    },
                    InputEvent::Axis {
                        axis: AxisId::Hat0Y,
                        value: 0
                    },
                ][..]
            )
        );
        assert_eq!(
            events.last(),
            Some(&InputEvent::Button {
                button: ButtonId::ThumbR,
                pressed: true
            })
        );
        Ok(())
    }
}
