//! Cross-check the device signature against the values the adapter enumerates with.

use sanwa_hid_protocol as sanwa;

#[test]
fn vendor_and_product_ids() {
    assert_eq!(sanwa::VENDOR_ID, 0x0d9d);
    assert_eq!(sanwa::PRODUCT_ID, 0x3012);
}

#[test]
fn only_the_adapter_signature_is_recognised() {
    assert!(sanwa::is_sanwa(0x0d9d, 0x3012));
    for (vid, pid) in [(0x0d9d, 0x0000), (0x046d, 0x3012), (0x054c, 0x0268)] {
        assert!(!sanwa::is_sanwa(vid, pid), "{vid:04x}:{pid:04x}");
    }
}

#[test]
fn report_ids_match_port_numbers() {
    for port in sanwa::PortIndex::ALL {
        assert_eq!(port.report_id(), port.number());
        assert_eq!(sanwa::PortIndex::from_report_id(port.report_id()), Some(port));
    }
}
