//! Fuzzes Sanwa input report parsing and normalisation for both revisions.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_sanwa_input
#![no_main]
use libfuzzer_sys::fuzz_target;
use sanwa_hid_protocol::{HardwareRevision, InputDecoder, parse_input_report};

fuzz_target!(|data: &[u8]| {
    // Must never panic on arbitrary bytes; errors are expected, panics are not.
    let _ = parse_input_report(data);
    for revision in [HardwareRevision::Original, HardwareRevision::Rumble] {
        if let Ok(decoded) = InputDecoder::new(revision).decode(data) {
            assert_eq!(decoded.snapshot.events().count(), 18);
        }
    }
});
