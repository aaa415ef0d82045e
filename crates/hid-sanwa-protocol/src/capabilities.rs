//! Per-port capability declaration.
//!
//! The host is told once, before a port goes live, every axis, button and
//! force-feedback effect the port will ever report. The declaration is a
//! pure function of the hardware revision and the port.

use crate::output::OutputChannel;
use crate::types::{AxisId, BUTTON_COUNT, ButtonId, ButtonMap, HardwareRevision, PortIndex};
use serde::{Deserialize, Serialize};

/// Range of the raw analog axes.
pub const AXIS_MIN: i32 = 0;
pub const AXIS_MAX: i32 = 255;

/// Range of each hat axis.
pub const HAT_MIN: i32 = -1;
pub const HAT_MAX: i32 = 1;

/// Absolute axis parameters in `input_absinfo` terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsAxisInfo {
    pub axis: AxisId,
    pub min: i32,
    pub max: i32,
    pub fuzz: i32,
    pub flat: i32,
}

impl AbsAxisInfo {
    /// Axis with no fuzz and no flat zone.
    pub const fn exact(axis: AxisId, min: i32, max: i32) -> Self {
        Self {
            axis,
            min,
            max,
            fuzz: 0,
            flat: 0,
        }
    }
}

/// Rumble effect support bound to one port's output channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RumbleCapability {
    pub channel: OutputChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub port: PortIndex,
    pub revision: HardwareRevision,
    pub axes: Vec<AbsAxisInfo>,
    pub buttons: [ButtonId; BUTTON_COUNT],
    pub force_feedback: Option<RumbleCapability>,
}

impl CapabilityDescriptor {
    pub fn for_port(revision: HardwareRevision, port: PortIndex, buttons: &ButtonMap) -> Self {
        let axes = revision
            .declared_axes()
            .iter()
            .map(|&axis| AbsAxisInfo::exact(axis, AXIS_MIN, AXIS_MAX))
            .chain([
                AbsAxisInfo::exact(AxisId::Hat0X, HAT_MIN, HAT_MAX),
                AbsAxisInfo::exact(AxisId::Hat0Y, HAT_MIN, HAT_MAX),
            ])
            .collect();

        let force_feedback = revision.supports_rumble().then(|| RumbleCapability {
            channel: OutputChannel::for_port(port),
        });

        Self {
            port,
            revision,
            axes,
            buttons: *buttons.buttons(),
            force_feedback,
        }
    }

    pub fn declares_axis(&self, axis: AxisId) -> bool {
        self.axes.iter().any(|info| info.axis == axis)
    }

    pub fn declares_button(&self, button: ButtonId) -> bool {
        self.buttons.contains(&button)
    }

    pub fn supports_rumble(&self) -> bool {
        self.force_feedback.is_some()
    }
}
