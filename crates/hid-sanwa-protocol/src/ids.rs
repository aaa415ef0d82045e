//! Sanwa USB vendor/product ID constants and report addressing.
//!
//! The adapter enumerates as a single HID device and multiplexes both
//! controller sockets over one interface. Input and output reports are
//! addressed by a 1-based report ID equal to the socket number.

/// Sanwa Supply USB Vendor ID.
pub const VENDOR_ID: u16 = 0x0D9D;

/// Two-port DualShock-to-USB adapter product ID.
pub const PRODUCT_ID: u16 = 0x3012;

/// Report IDs used on the wire.
pub mod report_ids {
    /// Reports carrying state for (or commands to) the first socket.
    pub const PORT_ONE: u8 = 0x01;
    /// Reports carrying state for (or commands to) the second socket.
    pub const PORT_TWO: u8 = 0x02;
}

/// Returns `true` if the VID/PID pair identifies the Sanwa adapter.
pub fn is_sanwa(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && pid == PRODUCT_ID
}

/// Returns the product name for a known Sanwa PID, or `None`.
pub fn product_name(pid: u16) -> Option<&'static str> {
    match pid {
        PRODUCT_ID => Some("Sanwa Dualshock Adapter"),
        _ => None,
    }
}
