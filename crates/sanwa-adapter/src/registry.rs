//! Ownership and routing for the adapter's two ports.

use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{ButtonMap, CapabilityDescriptor, HardwareRevision, PortIndex, PortSnapshot};
use tracing::{debug, info, warn};

use crate::error::{AdapterError, RoutingError};
use crate::port::Port;
use crate::sink::{InputSink, PortHandle, PortRegistration};

/// Both ports of one adapter. Either both are registered with the host or
/// neither is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRegistry {
    ports: [Port; 2],
}

impl PortRegistry {
    /// Register port 1 then port 2 with `sink`.
    ///
    /// Each port is named `"<base_name> Port N"` and inherits `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Registration`] if the host refuses either
    /// port. When port 2 fails, port 1 is unregistered before returning.
    pub fn create<S: InputSink + ?Sized>(
        sink: &mut S,
        identity: &HidDeviceInfo,
        base_name: &str,
        revision: HardwareRevision,
        buttons: &ButtonMap,
    ) -> Result<Self, AdapterError> {
        let first = register(sink, PortIndex::One, identity, base_name, revision, buttons)?;
        let second = match register(sink, PortIndex::Two, identity, base_name, revision, buttons) {
            Ok(port) => port,
            Err(err) => {
                warn!(
                    "Unwinding {} after failed sibling registration",
                    first.name()
                );
                sink.unregister_port(first.handle());
                return Err(err);
            }
        };
        Ok(Self {
            ports: [first, second],
        })
    }

    pub fn port(&self, index: PortIndex) -> &Port {
        let [one, two] = &self.ports;
        match index {
            PortIndex::One => one,
            PortIndex::Two => two,
        }
    }

    fn port_mut(&mut self, index: PortIndex) -> &mut Port {
        let [one, two] = &mut self.ports;
        match index {
            PortIndex::One => one,
            PortIndex::Two => two,
        }
    }

    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter()
    }

    pub fn port_for_handle(&self, handle: PortHandle) -> Option<PortIndex> {
        self.ports
            .iter()
            .find(|port| port.handle() == handle)
            .map(Port::index)
    }

    /// Commit `snapshot` to the port addressed by `report_id` and emit it
    /// to the host, followed by a sync for that port only.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::UnknownPort`] for ids other than 1 and 2;
    /// neither port is touched in that case.
    pub fn route_state<S: InputSink + ?Sized>(
        &mut self,
        sink: &mut S,
        report_id: u8,
        snapshot: PortSnapshot,
    ) -> Result<PortIndex, RoutingError> {
        let index =
            PortIndex::from_report_id(report_id).ok_or(RoutingError::UnknownPort(report_id))?;
        let port = self.port_mut(index);
        port.commit(snapshot);

        let handle = port.handle();
        for event in snapshot.events() {
            sink.report_event(handle, event);
        }
        sink.sync(handle);
        Ok(index)
    }

    /// Unregister both ports, port 2 first.
    pub fn release<S: InputSink + ?Sized>(self, sink: &mut S) {
        for port in self.ports.iter().rev() {
            debug!("Unregistering {}", port.name());
            sink.unregister_port(port.handle());
        }
    }
}

fn register<S: InputSink + ?Sized>(
    sink: &mut S,
    port: PortIndex,
    identity: &HidDeviceInfo,
    base_name: &str,
    revision: HardwareRevision,
    buttons: &ButtonMap,
) -> Result<Port, AdapterError> {
    let registration = PortRegistration {
        port,
        name: format!("{base_name} {port}"),
        identity: identity.clone(),
        capabilities: CapabilityDescriptor::for_port(revision, port, buttons),
    };
    let handle = sink
        .register_port(&registration)
        .map_err(|source| AdapterError::Registration { port, source })?;
    info!("Registered {} as {handle}", registration.name);
    Ok(Port::new(
        port,
        handle,
        registration.name,
        registration.capabilities,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{RecordingSink, SinkEvent};
    use sanwa_hid_protocol::InputDecoder;

    fn identity() -> HidDeviceInfo {
        HidDeviceInfo::new(0x0d9d, 0x3012, "/dev/hidraw3").with_serial("A1")
    }

    fn snapshot(report: &[u8]) -> Result<PortSnapshot, AdapterError> {
        Ok(InputDecoder::default().decode(report)?.snapshot)
    }

    #[test]
    fn creates_ports_in_index_order() -> Result<(), AdapterError> {
        let mut sink = RecordingSink::new();
        let registry = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Rumble,
            &ButtonMap::default(),
        )?;

        let names: Vec<&str> = sink.registrations().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Pad Port 1", "Pad Port 2"]);
        assert_eq!(registry.port(PortIndex::Two).name(), "Pad Port 2");
        assert!(sink.registrations().iter().all(|r| r.identity == identity()));
        Ok(())
    }

    #[test]
    fn second_registration_failure_unwinds_first() {
        let mut sink = RecordingSink::new().failing_on(2);
        let result = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Rumble,
            &ButtonMap::default(),
        );

        assert!(matches!(
            result,
            Err(AdapterError::Registration {
                port: PortIndex::Two,
                ..
            })
        ));
        assert!(sink.live_handles().is_empty());
        assert_eq!(
            sink.events().last(),
            Some(&SinkEvent::Unregistered(PortHandle::new(1)))
        );
    }

    #[test]
    fn first_registration_failure_registers_nothing() {
        let mut sink = RecordingSink::new().failing_on(1);
        let result = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Original,
            &ButtonMap::default(),
        );

        assert!(matches!(
            result,
            Err(AdapterError::Registration {
                port: PortIndex::One,
                ..
            })
        ));
        assert_eq!(sink.registrations().len(), 0);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn route_state_touches_only_addressed_port() -> Result<(), AdapterError> {
        let mut sink = RecordingSink::new();
        let mut registry = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Rumble,
            &ButtonMap::default(),
        )?;
        let state = snapshot(&[0x02, 1, 2, 3, 4, 0x08, 0x01, 0x00])?;
        sink.clear_events();

        assert_eq!(registry.route_state(&mut sink, 2, state)?, PortIndex::Two);
        assert_eq!(registry.port(PortIndex::Two).state(), Some(&state));
        assert_eq!(registry.port(PortIndex::One).state(), None);

        let two = registry.port(PortIndex::Two).handle();
        assert!(sink.events().iter().all(|event| event.handle() == two));
        assert_eq!(sink.events().last(), Some(&SinkEvent::Sync(two)));
        Ok(())
    }

    #[test]
    fn route_state_rejects_unknown_id() -> Result<(), AdapterError> {
        let mut sink = RecordingSink::new();
        let mut registry = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Rumble,
            &ButtonMap::default(),
        )?;
        let state = snapshot(&[0x01, 0, 0, 0, 0, 0x08, 0x00, 0x00])?;
        sink.clear_events();

        assert_eq!(
            registry.route_state(&mut sink, 3, state),
            Err(RoutingError::UnknownPort(3))
        );
        assert!(registry.ports().all(|port| port.state().is_none()));
        assert!(sink.events().is_empty());
        Ok(())
    }

    #[test]
    fn release_unregisters_in_reverse_order() -> Result<(), AdapterError> {
        let mut sink = RecordingSink::new();
        let registry = PortRegistry::create(
            &mut sink,
            &identity(),
            "Pad",
            HardwareRevision::Rumble,
            &ButtonMap::default(),
        )?;
        let one = registry.port(PortIndex::One).handle();
        let two = registry.port(PortIndex::Two).handle();
        sink.clear_events();

        registry.release(&mut sink);
        assert_eq!(
            sink.events(),
            [SinkEvent::Unregistered(two), SinkEvent::Unregistered(one)]
        );
        Ok(())
    }
}
