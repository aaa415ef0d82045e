//! Feeds arbitrary report streams through a probed adapter with mock
//! collaborators. Reports for one port must never touch the other.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_sanwa_adapter
#![no_main]
use std::sync::Arc;

use libfuzzer_sys::fuzz_target;
use sanwa_adapter::mock::{MockTransport, RecordingSink};
use sanwa_adapter::{AdapterConfig, SanwaAdapter};
use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::PortIndex;

fuzz_target!(|data: &[u8]| {
    let Ok(mut adapter) = SanwaAdapter::probe(
        HidDeviceInfo::new(0x0d9d, 0x3012, "fuzz"),
        Arc::new(MockTransport::new()),
        RecordingSink::new(),
        &AdapterConfig::default(),
    ) else {
        return;
    };

    for chunk in data.chunks(8) {
        let other = match chunk.first() {
            Some(1) => Some(PortIndex::Two),
            Some(2) => Some(PortIndex::One),
            _ => None,
        };
        let before = other.and_then(|port| adapter.port_state(port).copied());
        let _ = adapter.on_report(chunk);
        if let Some(port) = other {
            assert_eq!(adapter.port_state(port).copied(), before);
        }
    }
    adapter.shutdown();
});
