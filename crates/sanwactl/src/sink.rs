//! Input sink that logs normalized events instead of feeding a host device.

use std::collections::HashMap;

use sanwa_adapter::{InputSink, PortHandle, PortRegistration, RegistrationError};
use sanwa_hid_protocol::{AxisId, ButtonId};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Control {
    Axis(AxisId),
    Button(ButtonId),
}

#[derive(Debug, Default)]
struct PortLog {
    name: String,
    last: HashMap<Control, i32>,
    pending: Vec<String>,
}

/// Logs only controls whose value changed since the previous frame.
#[derive(Debug, Default)]
pub struct TracingSink {
    next_handle: u32,
    ports: HashMap<PortHandle, PortLog>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, handle: PortHandle, control: Control, value: i32) {
        let Some(port) = self.ports.get_mut(&handle) else {
            return;
        };
        if port.last.insert(control, value) == Some(value) {
            return;
        }
        let label = match control {
            Control::Axis(axis) => format!("{axis:?}={value}"),
            Control::Button(button) => format!("{button:?}={}", if value != 0 { "down" } else { "up" }),
        };
        port.pending.push(label);
    }

    /// Changes reported for `handle` and not yet flushed by `sync`.
    pub fn pending(&self, handle: PortHandle) -> &[String] {
        self.ports
            .get(&handle)
            .map(|port| port.pending.as_slice())
            .unwrap_or_default()
    }
}

impl InputSink for TracingSink {
    fn register_port(
        &mut self,
        registration: &PortRegistration,
    ) -> Result<PortHandle, RegistrationError> {
        self.next_handle = self.next_handle.saturating_add(1);
        let handle = PortHandle::new(self.next_handle);
        info!(
            "{} ({} axes, rumble: {})",
            registration.name,
            registration.capabilities.axes.len(),
            registration.capabilities.supports_rumble()
        );
        self.ports.insert(
            handle,
            PortLog {
                name: registration.name.clone(),
                ..PortLog::default()
            },
        );
        Ok(handle)
    }

    fn unregister_port(&mut self, handle: PortHandle) {
        if let Some(port) = self.ports.remove(&handle) {
            debug!("{} removed", port.name);
        }
    }

    fn report_axis(&mut self, handle: PortHandle, axis: AxisId, value: i32) {
        self.record(handle, Control::Axis(axis), value);
    }

    fn report_button(&mut self, handle: PortHandle, button: ButtonId, pressed: bool) {
        self.record(handle, Control::Button(button), i32::from(pressed));
    }

    fn sync(&mut self, handle: PortHandle) {
        let Some(port) = self.ports.get_mut(&handle) else {
            return;
        };
        if !port.pending.is_empty() {
            info!("{}: {}", port.name, port.pending.join(" "));
            port.pending.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sanwa_hid_common::HidDeviceInfo;
    use sanwa_hid_protocol::{ButtonMap, CapabilityDescriptor, HardwareRevision, PortIndex};

    fn register(sink: &mut TracingSink) -> Result<PortHandle, RegistrationError> {
        sink.register_port(&PortRegistration {
            port: PortIndex::One,
            name: "Pad Port 1".to_string(),
            identity: HidDeviceInfo::new(0x0d9d, 0x3012, "test"),
            capabilities: CapabilityDescriptor::for_port(
                HardwareRevision::Rumble,
                PortIndex::One,
                &ButtonMap::default(),
            ),
        })
    }

    #[test]
    fn only_changes_are_pending() -> Result<(), RegistrationError> {
        let mut sink = TracingSink::new();
        let handle = register(&mut sink)?;

        sink.report_axis(handle, AxisId::X, 128);
        sink.report_button(handle, ButtonId::South, false);
        sink.sync(handle);
        assert!(sink.pending(handle).is_empty());

        sink.report_axis(handle, AxisId::X, 128);
        sink.report_button(handle, ButtonId::South, true);
        assert_eq!(sink.pending(handle), ["South=down"]);
        Ok(())
    }

    #[test]
    fn unknown_handle_is_ignored() {
        let mut sink = TracingSink::new();
        sink.report_axis(PortHandle::new(7), AxisId::Y, 3);
        sink.sync(PortHandle::new(7));
        assert!(sink.pending(PortHandle::new(7)).is_empty());
    }
}
