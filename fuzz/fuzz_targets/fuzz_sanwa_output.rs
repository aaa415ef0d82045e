//! Fuzzes the Sanwa rumble encoder with arbitrary motor levels.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_sanwa_output
#![no_main]
use libfuzzer_sys::fuzz_target;
use sanwa_hid_protocol::{PortIndex, encode_rumble};

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }
    let port = if data[0] & 1 == 0 {
        PortIndex::One
    } else {
        PortIndex::Two
    };
    let strong = u16::from_le_bytes([data[1], data[2]]);
    let weak = u16::from_le_bytes([data[3], data[4]]);
    let report = encode_rumble(port, strong, weak);

    assert_eq!(report.as_bytes()[0], 0x01);
    assert_eq!(report.channel().port(), port);
    assert_eq!(report.is_stop(), strong < 257 && weak < 257);
});
