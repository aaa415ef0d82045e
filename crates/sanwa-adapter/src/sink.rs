//! Host input subsystem collaborator.

use std::fmt;

use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{AxisId, ButtonId, CapabilityDescriptor, InputEvent, PortIndex};
use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;

/// Opaque identifier the host hands back for a registered port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortHandle(u32);

impl PortHandle {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PortHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything the host needs to expose one port as a gamepad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortRegistration {
    pub port: PortIndex,
    /// Host-visible name, e.g. `"Sanwa Dualshock Adapter Port 1"`.
    pub name: String,
    /// Identity inherited from the physical adapter.
    pub identity: HidDeviceInfo,
    pub capabilities: CapabilityDescriptor,
}

/// Receiver of normalized input for registered ports.
pub trait InputSink: Send {
    /// Register a port with the capabilities it will ever report.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError`] if the host refuses the device.
    fn register_port(
        &mut self,
        registration: &PortRegistration,
    ) -> Result<PortHandle, RegistrationError>;

    fn unregister_port(&mut self, handle: PortHandle);

    fn report_axis(&mut self, handle: PortHandle, axis: AxisId, value: i32);

    fn report_button(&mut self, handle: PortHandle, button: ButtonId, pressed: bool);

    /// Flush the events reported since the last sync as one frame.
    fn sync(&mut self, handle: PortHandle);

    /// Forward a normalized event to the matching `report_*` call.
    fn report_event(&mut self, handle: PortHandle, event: InputEvent) {
        match event {
            InputEvent::Axis { axis, value } => self.report_axis(handle, axis, value),
            InputEvent::Button { button, pressed } => self.report_button(handle, button, pressed),
        }
    }
}
