//! Device information types for HID devices

use serde::{Deserialize, Serialize};

/// Identity of an enumerated HID device, as reported by the host.
///
/// Logical devices derived from this one (the adapter's two ports) copy
/// the bus, vendor, product, version and unique id fields verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidDeviceInfo {
    pub vendor_id: u16,
    pub product_id: u16,
    pub bus_type: u16,
    pub version: u16,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub path: String,
}

/// `BUS_USB` from `linux/input.h`.
pub const BUS_USB: u16 = 0x03;

impl HidDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, path: impl Into<String>) -> Self {
        Self {
            vendor_id,
            product_id,
            bus_type: BUS_USB,
            version: 0,
            serial_number: None,
            manufacturer: None,
            product_name: None,
            path: path.into(),
        }
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial_number = Some(serial.into());
        self
    }

    pub fn with_manufacturer(mut self, manufacturer: impl Into<String>) -> Self {
        self.manufacturer = Some(manufacturer.into());
        self
    }

    pub fn with_product_name(mut self, name: impl Into<String>) -> Self {
        self.product_name = Some(name.into());
        self
    }

    pub fn with_version(mut self, version: u16) -> Self {
        self.version = version;
        self
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }

    pub fn display_name(&self) -> String {
        match (&self.manufacturer, &self.product_name) {
            (Some(manufacturer), Some(product)) => format!("{manufacturer} {product}"),
            (None, Some(product)) => product.clone(),
            (Some(manufacturer), None) => manufacturer.clone(),
            (None, None) => format!("{:04x}:{:04x}", self.vendor_id, self.product_id),
        }
    }
}

impl Default for HidDeviceInfo {
    fn default() -> Self {
        Self::new(0, 0, String::new())
    }
}
