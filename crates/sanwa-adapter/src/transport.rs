//! Transport session collaborator.

use sanwa_hid_protocol::OutputChannel;

use crate::error::TransportError;

/// Link to the physical adapter.
///
/// Inbound reports are pushed to [`SanwaAdapter::on_report`] by whoever owns
/// the read loop; the adapter only drives the outbound side and the session
/// lifecycle. Writes may be issued from several threads at once, but never
/// concurrently for the same channel.
///
/// [`SanwaAdapter::on_report`]: crate::SanwaAdapter::on_report
pub trait Transport: Send + Sync {
    /// Begin the hardware session.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Start`] if the session cannot be started.
    fn start(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Open the session for I/O.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Open`] if the device cannot be opened.
    fn open(&self) -> Result<(), TransportError> {
        Ok(())
    }

    /// Write one output report payload (report id excluded) to `channel`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the write did not reach the device.
    fn write(&self, channel: OutputChannel, payload: &[u8]) -> Result<(), TransportError>;

    fn close(&self) {}

    fn stop(&self) {}
}
