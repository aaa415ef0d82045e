//! One logical gamepad per adapter socket.

use sanwa_hid_protocol::{CapabilityDescriptor, PortIndex, PortSnapshot};

use crate::sink::PortHandle;

/// A registered adapter socket and its last committed input state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Port {
    index: PortIndex,
    handle: PortHandle,
    name: String,
    capabilities: CapabilityDescriptor,
    state: Option<PortSnapshot>,
}

impl Port {
    pub(crate) fn new(
        index: PortIndex,
        handle: PortHandle,
        name: String,
        capabilities: CapabilityDescriptor,
    ) -> Self {
        Self {
            index,
            handle,
            name,
            capabilities,
            state: None,
        }
    }

    pub fn index(&self) -> PortIndex {
        self.index
    }

    pub fn handle(&self) -> PortHandle {
        self.handle
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capabilities declared at registration. Fixed for the port's lifetime.
    pub fn capabilities(&self) -> &CapabilityDescriptor {
        &self.capabilities
    }

    /// Last committed snapshot; `None` until the first report arrives.
    pub fn state(&self) -> Option<&PortSnapshot> {
        self.state.as_ref()
    }

    /// Replace the whole observable state in one step.
    pub(crate) fn commit(&mut self, snapshot: PortSnapshot) {
        self.state = Some(snapshot);
    }
}
