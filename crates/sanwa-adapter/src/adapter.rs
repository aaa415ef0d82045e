//! Adapter lifecycle: probe, report routing, rumble requests, teardown.

use std::sync::Arc;

use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{
    CapabilityDescriptor, HardwareRevision, InputDecoder, PortIndex, PortSnapshot, RumbleReport,
    SanwaError, is_sanwa,
};
use tracing::{debug, info, warn};

use crate::config::AdapterConfig;
use crate::error::{AdapterError, AdapterResult, RoutingError};
use crate::registry::PortRegistry;
use crate::rumble::RumbleDispatcher;
use crate::sink::{InputSink, PortHandle};
use crate::transport::Transport;

/// One recognized adapter with both ports registered.
///
/// Inbound reports must be delivered in order from a single context
/// ([`on_report`](Self::on_report) takes `&mut self`). Rumble may be driven
/// concurrently through [`rumble`](Self::rumble).
pub struct SanwaAdapter<T: Transport, S: InputSink> {
    identity: HidDeviceInfo,
    revision: HardwareRevision,
    decoder: InputDecoder,
    transport: Arc<T>,
    sink: S,
    registry: Option<PortRegistry>,
    rumble: RumbleDispatcher<T>,
}

impl<T: Transport, S: InputSink> SanwaAdapter<T, S> {
    /// Bring up the adapter: check identity, start and open the transport,
    /// then register port 1 and port 2.
    ///
    /// # Errors
    ///
    /// Fails with [`AdapterError::UnknownDevice`] for a foreign signature,
    /// [`AdapterError::Config`] for an invalid mapping,
    /// [`AdapterError::Transport`] if the session cannot be started or
    /// opened, and [`AdapterError::Registration`] if the host refuses a
    /// port. Every step already taken is undone before returning.
    pub fn probe(
        identity: HidDeviceInfo,
        transport: Arc<T>,
        mut sink: S,
        config: &AdapterConfig,
    ) -> AdapterResult<Self> {
        if !is_sanwa(identity.vendor_id, identity.product_id) {
            return Err(AdapterError::UnknownDevice {
                vendor_id: identity.vendor_id,
                product_id: identity.product_id,
            });
        }
        let decoder = config.decoder()?;
        let buttons = config.button_map()?;
        let name = config.device_name(&identity);

        transport.start()?;
        if let Err(err) = transport.open() {
            warn!("Failed to open {}: {err}", identity.path);
            transport.stop();
            return Err(err.into());
        }

        let registry =
            match PortRegistry::create(&mut sink, &identity, &name, config.revision, &buttons) {
                Ok(registry) => registry,
                Err(err) => {
                    warn!("Port registration failed for {}: {err}", identity.path);
                    transport.close();
                    transport.stop();
                    return Err(err);
                }
            };

        info!(
            "Sanwa adapter ready at {} ({:?} revision, rumble: {})",
            identity.path,
            config.revision,
            config.revision.supports_rumble()
        );

        let rumble = RumbleDispatcher::new(Arc::clone(&transport), config.revision);
        Ok(Self {
            identity,
            revision: config.revision,
            decoder,
            transport,
            sink,
            registry: Some(registry),
            rumble,
        })
    }

    /// Decode one inbound report and deliver it to its port.
    ///
    /// Returns the port that was updated, or `None` when the report names
    /// no port; such reports are dropped without emitting anything.
    ///
    /// # Errors
    ///
    /// [`AdapterError::Closed`] after shutdown, [`AdapterError::Decode`]
    /// for reports too short to carry a full payload.
    pub fn on_report(&mut self, data: &[u8]) -> AdapterResult<Option<PortIndex>> {
        let Some(registry) = self.registry.as_mut() else {
            return Err(AdapterError::Closed);
        };

        let decoded = match self.decoder.decode(data) {
            Ok(decoded) => decoded,
            Err(SanwaError::UnknownPort(report_id)) => {
                debug!("Dropping report for unknown port (report id {report_id})");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        match registry.route_state(&mut self.sink, decoded.port.report_id(), decoded.snapshot) {
            Ok(port) => Ok(Some(port)),
            Err(RoutingError::UnknownPort(report_id)) => {
                debug!("Dropping report for unknown port (report id {report_id})");
                Ok(None)
            }
        }
    }

    /// Handle a force-feedback request the host issued for `handle`.
    ///
    /// # Errors
    ///
    /// [`AdapterError::UnknownHandle`] if `handle` is not one of this
    /// adapter's ports, otherwise as [`RumbleDispatcher::play`].
    pub fn on_rumble_request(
        &self,
        handle: PortHandle,
        strong: u16,
        weak: u16,
    ) -> AdapterResult<RumbleReport> {
        let registry = self.registry.as_ref().ok_or(AdapterError::Closed)?;
        let port = registry
            .port_for_handle(handle)
            .ok_or(AdapterError::UnknownHandle(handle))?;
        self.rumble.play(port, strong, weak)
    }

    /// Cloneable rumble handle for use from other threads.
    pub fn rumble(&self) -> RumbleDispatcher<T> {
        self.rumble.clone()
    }

    pub fn identity(&self) -> &HidDeviceInfo {
        &self.identity
    }

    pub fn revision(&self) -> HardwareRevision {
        self.revision
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn is_active(&self) -> bool {
        self.registry.is_some()
    }

    pub fn handle(&self, port: PortIndex) -> Option<PortHandle> {
        self.registry
            .as_ref()
            .map(|registry| registry.port(port).handle())
    }

    pub fn port_state(&self, port: PortIndex) -> Option<&PortSnapshot> {
        self.registry
            .as_ref()
            .and_then(|registry| registry.port(port).state())
    }

    pub fn capabilities(&self, port: PortIndex) -> Option<&CapabilityDescriptor> {
        self.registry
            .as_ref()
            .map(|registry| registry.port(port).capabilities())
    }

    /// Tear the adapter down: refuse new work, let in-flight rumble writes
    /// finish, unregister port 2 then port 1, close and stop the transport.
    ///
    /// Idempotent; also run on drop.
    pub fn shutdown(&mut self) {
        let Some(registry) = self.registry.take() else {
            return;
        };
        info!("Shutting down Sanwa adapter at {}", self.identity.path);
        self.rumble.close();
        registry.release(&mut self.sink);
        self.transport.close();
        self.transport.stop();
    }
}

impl<T: Transport, S: InputSink> Drop for SanwaAdapter<T, S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<T: Transport, S: InputSink> std::fmt::Debug for SanwaAdapter<T, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanwaAdapter")
            .field("identity", &self.identity)
            .field("revision", &self.revision)
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}
