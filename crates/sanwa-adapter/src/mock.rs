//! Recording collaborators for tests.
//!
//! [`MockTransport`] logs every lifecycle call and write and can be told to
//! fail; [`RecordingSink`] hands out sequential handles and logs every
//! event it receives.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use sanwa_hid_protocol::{AxisId, ButtonId, OutputChannel, PortIndex};

use crate::error::{RegistrationError, TransportError};
use crate::sink::{InputSink, PortHandle, PortRegistration};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Start,
    Open,
    Write {
        channel: OutputChannel,
        payload: Vec<u8>,
    },
    Close,
    Stop,
}

#[derive(Debug, Default)]
pub struct MockTransport {
    events: Mutex<Vec<TransportEvent>>,
    fail_start: bool,
    fail_open: bool,
    fail_writes: AtomicBool,
    write_delay: Option<Duration>,
    in_flight: [AtomicUsize; 2],
    overlapped: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_start(mut self) -> Self {
        self.fail_start = true;
        self
    }

    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    /// Hold each write for `delay`, to widen overlap windows in
    /// concurrency tests.
    pub fn with_write_delay(mut self, delay: Duration) -> Self {
        self.write_delay = Some(delay);
        self
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn events(&self) -> Vec<TransportEvent> {
        self.events.lock().clone()
    }

    /// Successful writes in order, as `(channel, payload)`.
    pub fn writes(&self) -> Vec<(OutputChannel, Vec<u8>)> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                TransportEvent::Write { channel, payload } => Some((*channel, payload.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn writes_for(&self, port: PortIndex) -> Vec<Vec<u8>> {
        self.writes()
            .into_iter()
            .filter(|(channel, _)| channel.port() == port)
            .map(|(_, payload)| payload)
            .collect()
    }

    /// Whether two writes to the same channel were ever in progress at once.
    pub fn saw_overlapping_writes(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }

    fn record(&self, event: TransportEvent) {
        self.events.lock().push(event);
    }
}

impl Transport for MockTransport {
    fn start(&self) -> Result<(), TransportError> {
        if self.fail_start {
            return Err(TransportError::Start("mock start failure".to_string()));
        }
        self.record(TransportEvent::Start);
        Ok(())
    }

    fn open(&self) -> Result<(), TransportError> {
        if self.fail_open {
            return Err(TransportError::Open("mock open failure".to_string()));
        }
        self.record(TransportEvent::Open);
        Ok(())
    }

    fn write(&self, channel: OutputChannel, payload: &[u8]) -> Result<(), TransportError> {
        let Some(in_flight) = self.in_flight.get(channel.index()) else {
            return Err(TransportError::Disconnected);
        };
        if in_flight.fetch_add(1, Ordering::SeqCst) != 0 {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        if let Some(delay) = self.write_delay {
            std::thread::sleep(delay);
        }
        in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TransportError::Write {
                report_id: channel.report_id(),
                reason: "mock write failure".to_string(),
            });
        }
        self.record(TransportEvent::Write {
            channel,
            payload: payload.to_vec(),
        });
        Ok(())
    }

    fn close(&self) {
        self.record(TransportEvent::Close);
    }

    fn stop(&self) {
        self.record(TransportEvent::Stop);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkEvent {
    Registered { handle: PortHandle, port: PortIndex },
    Unregistered(PortHandle),
    Axis {
        handle: PortHandle,
        axis: AxisId,
        value: i32,
    },
    Button {
        handle: PortHandle,
        button: ButtonId,
        pressed: bool,
    },
    Sync(PortHandle),
}

impl SinkEvent {
    pub fn handle(&self) -> PortHandle {
        match self {
            SinkEvent::Registered { handle, .. }
            | SinkEvent::Axis { handle, .. }
            | SinkEvent::Button { handle, .. } => *handle,
            SinkEvent::Unregistered(handle) | SinkEvent::Sync(handle) => *handle,
        }
    }
}

/// Input sink that records everything and assigns handles `#1`, `#2`, ...
#[derive(Debug, Default)]
pub struct RecordingSink {
    next_handle: u32,
    attempts: usize,
    fail_on: Option<usize>,
    registrations: Vec<PortRegistration>,
    live: Vec<PortHandle>,
    events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse the `nth` registration attempt (1-based).
    pub fn failing_on(mut self, nth: usize) -> Self {
        self.fail_on = Some(nth);
        self
    }

    pub fn registrations(&self) -> &[PortRegistration] {
        &self.registrations
    }

    /// Handles registered and not yet unregistered.
    pub fn live_handles(&self) -> &[PortHandle] {
        &self.live
    }

    pub fn events(&self) -> &[SinkEvent] {
        &self.events
    }

    pub fn events_for(&self, handle: PortHandle) -> Vec<SinkEvent> {
        self.events
            .iter()
            .filter(|event| event.handle() == handle)
            .cloned()
            .collect()
    }

    pub fn sync_count(&self, handle: PortHandle) -> usize {
        self.events
            .iter()
            .filter(|event| **event == SinkEvent::Sync(handle))
            .count()
    }

    pub fn clear_events(&mut self) {
        self.events.clear();
    }
}

impl InputSink for RecordingSink {
    fn register_port(
        &mut self,
        registration: &PortRegistration,
    ) -> Result<PortHandle, RegistrationError> {
        self.attempts = self.attempts.saturating_add(1);
        if self.fail_on == Some(self.attempts) {
            return Err(RegistrationError::new(
                registration.name.clone(),
                "refused by recording sink",
            ));
        }
        self.next_handle = self.next_handle.saturating_add(1);
        let handle = PortHandle::new(self.next_handle);
        self.registrations.push(registration.clone());
        self.live.push(handle);
        self.events.push(SinkEvent::Registered {
            handle,
            port: registration.port,
        });
        Ok(handle)
    }

    fn unregister_port(&mut self, handle: PortHandle) {
        self.live.retain(|live| *live != handle);
        self.events.push(SinkEvent::Unregistered(handle));
    }

    fn report_axis(&mut self, handle: PortHandle, axis: AxisId, value: i32) {
        self.events.push(SinkEvent::Axis {
            handle,
            axis,
            value,
        });
    }

    fn report_button(&mut self, handle: PortHandle, button: ButtonId, pressed: bool) {
        self.events.push(SinkEvent::Button {
            handle,
            button,
            pressed,
        });
    }

    fn sync(&mut self, handle: PortHandle) {
        self.events.push(SinkEvent::Sync(handle));
    }
}
