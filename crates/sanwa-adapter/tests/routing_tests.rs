//! Inbound report routing through a probed adapter.

use std::sync::Arc;

use proptest::prelude::*;
use sanwa_adapter::mock::{MockTransport, RecordingSink, SinkEvent};
use sanwa_adapter::{
    AdapterConfig, AdapterError, ButtonMapConfig, ButtonMapPreset, ConfigError, SanwaAdapter,
};
use sanwa_hid_common::HidDeviceInfo;
use sanwa_hid_protocol::{AxisId, ButtonId, HardwareRevision, HatDirection, PortIndex, SanwaError};
use sanwa_test_helpers::prelude::*;

type TestAdapter = SanwaAdapter<MockTransport, RecordingSink>;

fn adapter_with(config: &AdapterConfig) -> Result<TestAdapter, AdapterError> {
    let mut adapter = SanwaAdapter::probe(
        HidDeviceInfo::new(0x0d9d, 0x3012, "/dev/hidraw1"),
        Arc::new(MockTransport::new()),
        RecordingSink::new(),
        config,
    )?;
    adapter.sink_mut().clear_events();
    Ok(adapter)
}

fn adapter() -> Result<TestAdapter, AdapterError> {
    adapter_with(&AdapterConfig::default())
}

#[test]
fn report_for_port_one_updates_only_port_one() -> Result<(), AdapterError> {
    let mut adapter = adapter()?;
    let data = InputReportFixture::neutral(1)
        .axes([0x10, 0x20, 0x30, 0x40])
        .byte0(0b0100_0001)
        .byte1(0b0000_0001)
        .build();

    assert_eq!(adapter.on_report(&data)?, Some(PortIndex::One));

    let state = must_some(adapter.port_state(PortIndex::One), "port 1 state");
    assert_eq!(state.hat, HatDirection::UpRight);
    assert!(state.is_pressed(ButtonId::East));
    assert!(state.is_pressed(ButtonId::Tl));
    assert_eq!(state.pressed_count(), 2);
    assert_eq!(state.axis(AxisId::Ry), Some(0x40));
    assert!(adapter.port_state(PortIndex::Two).is_none());

    let two = must_some(adapter.handle(PortIndex::Two), "handle 2");
    assert!(adapter.sink().events_for(two).is_empty());
    Ok(())
}

#[test]
fn emission_order_ends_with_single_sync() -> Result<(), AdapterError> {
    let mut adapter = adapter()?;
    adapter.on_report(&InputReportFixture::neutral(2).hat(6).build())?;
    let two = must_some(adapter.handle(PortIndex::Two), "handle 2");

    let events = adapter.sink().events();
    assert_eq!(events.len(), 4 + 2 + 12 + 1);
    assert_eq!(
        events.first(),
        Some(&SinkEvent::Axis {
            handle: two,
            axis: AxisId::X,
            value: 0x80
        })
    );
    assert_eq!(
        events.get(4),
        Some(&SinkEvent::Axis {
            handle: two,
            axis: AxisId::Hat0X,
            value: -1
        })
    );
    assert_eq!(
        events.get(5),
        Some(&SinkEvent::Axis {
            handle: two,
            axis: AxisId::Hat0Y,
            value: 0
        })
    );
    assert_eq!(events.last(), Some(&SinkEvent::Sync(two)));
    assert_eq!(adapter.sink().sync_count(two), 1);
    Ok(())
}

/// Every axis that reaches the host was declared when the port registered,
/// for both revisions and for remapped layouts.
#[test]
fn emitted_axes_are_always_declared() -> Result<(), AdapterError> {
    let configs = [
        AdapterConfig::for_revision(HardwareRevision::Original),
        AdapterConfig::for_revision(HardwareRevision::Rumble),
        AdapterConfig {
            axis_layout: Some([AxisId::Rx, AxisId::Ry, AxisId::X, AxisId::Y]),
            ..AdapterConfig::for_revision(HardwareRevision::Rumble)
        },
        AdapterConfig {
            axis_layout: Some([AxisId::Rz, AxisId::Z, AxisId::Ry, AxisId::Rx]),
            ..AdapterConfig::for_revision(HardwareRevision::Original)
        },
    ];

    for config in &configs {
        let mut adapter = adapter_with(config)?;
        for port in PortIndex::ALL {
            adapter.on_report(&InputReportFixture::neutral(port.report_id()).build())?;

            let handle = must_some(adapter.handle(port), "port handle");
            let caps = must_some(adapter.capabilities(port), "port capabilities");
            let undeclared: Vec<AxisId> = adapter
                .sink()
                .events_for(handle)
                .into_iter()
                .filter_map(|event| match event {
                    SinkEvent::Axis { axis, .. } if !caps.declares_axis(axis) => Some(axis),
                    _ => None,
                })
                .collect();
            assert!(undeclared.is_empty(), "{config:?} {port}: {undeclared:?}");
        }
    }
    Ok(())
}

#[test]
fn layout_with_undeclared_axes_is_refused_at_probe() {
    let config = AdapterConfig {
        axis_layout: Some([AxisId::X, AxisId::Y, AxisId::Z, AxisId::Rz]),
        ..AdapterConfig::for_revision(HardwareRevision::Rumble)
    };
    assert!(matches!(
        adapter_with(&config),
        Err(AdapterError::Config(ConfigError::Invalid(
            SanwaError::InvalidMapping(_)
        )))
    ));
}

#[test]
fn unknown_report_id_is_dropped_silently() -> Result<(), AdapterError> {
    let mut adapter = adapter()?;
    for report_id in [0u8, 3, 0x7F, 0xFF] {
        let data = InputReportFixture::neutral(report_id).build();
        assert_eq!(adapter.on_report(&data)?, None);
    }
    assert!(adapter.sink().events().is_empty());
    assert!(adapter.port_state(PortIndex::One).is_none());
    assert!(adapter.port_state(PortIndex::Two).is_none());
    Ok(())
}

#[test]
fn truncated_report_is_an_error_and_emits_nothing() -> Result<(), AdapterError> {
    let mut adapter = adapter()?;
    let result = adapter.on_report(&[0x01, 0x80, 0x80]);
    assert!(matches!(
        result,
        Err(AdapterError::Decode(SanwaError::ReportTooShort {
            expected: 8,
            actual: 3
        }))
    ));
    assert!(adapter.sink().events().is_empty());
    Ok(())
}

#[test]
fn later_report_replaces_whole_state() -> Result<(), AdapterError> {
    let mut adapter = adapter()?;
    adapter.on_report(&InputReportFixture::neutral(1).face(0x0F).byte1(0xFF).hat(0).build())?;
    adapter.on_report(&InputReportFixture::neutral(1).build())?;

    let state = must_some(adapter.port_state(PortIndex::One), "port 1 state");
    assert_eq!(state.pressed_count(), 0);
    assert_eq!(state.hat, HatDirection::Centered);
    Ok(())
}

#[test]
fn configured_literal_map_is_applied() -> Result<(), AdapterError> {
    let config = AdapterConfig {
        button_map: ButtonMapConfig::Preset(ButtonMapPreset::Literal),
        ..AdapterConfig::default()
    };
    let mut adapter = adapter_with(&config)?;
    // face B
    adapter.on_report(&InputReportFixture::neutral(2).face(0b0010).build())?;

    let state = must_some(adapter.port_state(PortIndex::Two), "port 2 state");
    assert!(state.is_pressed(ButtonId::South));
    assert!(!state.is_pressed(ButtonId::North));
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Reports for one port never change the other port's state or events.
    #[test]
    fn prop_ports_never_alias(
        first in proptest::collection::vec(any::<u8>(), 7),
        second in proptest::collection::vec(any::<u8>(), 7),
    ) {
        let mut adapter = must(adapter());
        let mut one = vec![1u8];
        one.extend_from_slice(&first);
        let mut two = vec![2u8];
        two.extend_from_slice(&second);

        must(adapter.on_report(&one));
        let before = adapter.port_state(PortIndex::One).copied();
        let handle_one = must_some(adapter.handle(PortIndex::One), "handle 1");
        let events_before = adapter.sink().events_for(handle_one).len();

        must(adapter.on_report(&two));
        prop_assert_eq!(adapter.port_state(PortIndex::One).copied(), before);
        prop_assert_eq!(adapter.sink().events_for(handle_one).len(), events_before);
    }

    /// Delivering the same report twice yields the same snapshot.
    #[test]
    fn prop_redelivery_is_idempotent(
        port in 1u8..=2,
        payload in proptest::collection::vec(any::<u8>(), 7),
    ) {
        let mut adapter = must(adapter());
        let mut data = vec![port];
        data.extend_from_slice(&payload);
        let index = must_some(PortIndex::from_report_id(port), "valid port");

        must(adapter.on_report(&data));
        let first = adapter.port_state(index).copied();
        must(adapter.on_report(&data));
        prop_assert_eq!(adapter.port_state(index).copied(), first);
    }
}
