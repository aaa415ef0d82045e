//! Per-port serialized rumble output.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use sanwa_hid_protocol::{HardwareRevision, PortIndex, RumbleReport, encode_rumble, encode_stop};
use tracing::{debug, trace, warn};

use crate::error::{AdapterError, AdapterResult};
use crate::transport::Transport;

struct Shared<T> {
    transport: Arc<T>,
    revision: HardwareRevision,
    closed: AtomicBool,
    channels: [Mutex<()>; 2],
}

/// Cloneable handle for the host's force-feedback path.
///
/// Requests for different ports proceed in parallel; requests for the same
/// port are written one at a time. Nothing is retried: a failed write is
/// returned to the caller and the next request re-sends full levels.
pub struct RumbleDispatcher<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for RumbleDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> std::fmt::Debug for RumbleDispatcher<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RumbleDispatcher")
            .field("revision", &self.shared.revision)
            .field("closed", &self.shared.closed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RumbleDispatcher<T> {
    pub fn new(transport: Arc<T>, revision: HardwareRevision) -> Self {
        Self {
            shared: Arc::new(Shared {
                transport,
                revision,
                closed: AtomicBool::new(false),
                channels: [Mutex::new(()), Mutex::new(())],
            }),
        }
    }

    pub fn supports_rumble(&self) -> bool {
        self.shared.revision.supports_rumble()
    }

    pub fn is_closed(&self) -> bool {
        self.shared.closed.load(Ordering::Acquire)
    }

    /// Encode and send motor levels for `port`.
    ///
    /// # Errors
    ///
    /// - [`AdapterError::RumbleUnsupported`] on revisions without motors
    /// - [`AdapterError::Closed`] once [`close`](Self::close) has run
    /// - [`AdapterError::Transport`] if the write fails
    pub fn play(&self, port: PortIndex, strong: u16, weak: u16) -> AdapterResult<RumbleReport> {
        self.send(port, encode_rumble(port, strong, weak))
    }

    /// Send the explicit stop report for `port`.
    ///
    /// # Errors
    ///
    /// Same as [`play`](Self::play).
    pub fn stop(&self, port: PortIndex) -> AdapterResult<RumbleReport> {
        self.send(port, encode_stop(port))
    }

    fn send(&self, port: PortIndex, report: RumbleReport) -> AdapterResult<RumbleReport> {
        if !self.supports_rumble() {
            return Err(AdapterError::RumbleUnsupported(port));
        }
        let Some(channel) = self.shared.channels.get(port.index()) else {
            return Err(AdapterError::RumbleUnsupported(port));
        };

        debug_assert_eq!(
            report.channel().port(),
            port,
            "rumble report for {port} bound to a foreign output channel"
        );

        let _guard = channel.lock();
        if self.is_closed() {
            debug!("Dropping rumble for {port}: adapter closed");
            return Err(AdapterError::Closed);
        }

        trace!(
            "Rumble {port}: strong={} weak={}",
            report.strong(),
            report.weak()
        );
        if let Err(err) = self
            .shared
            .transport
            .write(report.channel(), report.as_bytes())
        {
            warn!("Rumble write for {port} failed: {err}");
            return Err(err.into());
        }
        Ok(report)
    }

    /// Refuse further requests and wait for in-flight writes to finish.
    pub fn close(&self) {
        self.shared.closed.store(true, Ordering::Release);
        for channel in &self.shared.channels {
            drop(channel.lock());
        }
    }
}
